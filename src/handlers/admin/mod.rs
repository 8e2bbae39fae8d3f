pub mod tokens;

pub use tokens::tokens_post;
