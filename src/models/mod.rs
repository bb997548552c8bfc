mod article;
mod comment;
mod follow;
mod reaction;
mod tag;
mod user;

pub use article::*;
pub use comment::*;
pub use follow::*;
pub use reaction::*;
pub use tag::*;
pub use user::*;
