pub mod authenticate;
pub mod authorize;
pub mod response;

pub use authenticate::{authenticate, TEST_BYPASS_HEADER};
pub use authorize::{authorize_roles, require_admin, require_picker, require_supervisor};
pub use response::ApiResponse;
