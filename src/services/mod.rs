mod article_service;
mod auth_service;
mod comment_service;
mod email_service;
mod follow_service;
mod reaction_service;
mod tag_service;
mod user_service;

pub use article_service::*;
pub use auth_service::*;
pub use comment_service::*;
pub use email_service::EmailService;
pub use follow_service::*;
pub use reaction_service::*;
pub use tag_service::*;
pub use user_service::*;

pub(crate) use email_service::log_send_failure;
