pub mod token;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gatectl")]
#[command(about = "Warehouse gate CLI - local token minting and inspection")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Token management")]
    Token {
        #[command(subcommand)]
        cmd: token::TokenCommands,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Token { cmd } => token::handle(cmd),
    }
}
