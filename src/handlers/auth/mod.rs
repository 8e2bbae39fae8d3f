pub mod refresh;
pub mod role;
pub mod whoami;

pub use refresh::refresh_post;
pub use role::{role_delete, role_post};
pub use whoami::whoami_get;
