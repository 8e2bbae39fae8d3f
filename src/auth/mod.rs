pub mod identity;
pub mod roles;
pub mod token;

pub use identity::Identity;
pub use roles::Role;
pub use token::{Claims, TokenError};
