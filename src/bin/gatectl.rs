use clap::Parser;
use warehouse_gate::cli::Cli;

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(e) = warehouse_gate::cli::run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}
