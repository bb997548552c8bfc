pub mod auth;
pub mod guard;
pub mod validation;

pub use auth::AuthUser;
pub use guard::Ownable;
pub use validation::{QueryParams, ValidatedJson};
