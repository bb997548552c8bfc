pub mod password;
pub mod token;

pub use password::{hash_password, verify_password};
pub use token::{decode_token, generate_secret_token, issue_token, secret_token_matches, Claims};
