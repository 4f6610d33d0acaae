pub mod gravatar;
pub mod password;
pub mod token;

pub use token::{Claims, TokenKeys};
