mod audit;
mod data_stores;
mod email;
mod email_client;
mod emails;
mod error;
mod otp_code;
mod password;
mod pending_secret;
mod reset_token;
mod role;
mod user;
mod user_id;
mod user_password_hash;

pub use audit::*;
pub use data_stores::*;
pub use email::*;
pub use email_client::*;
pub use emails::*;
pub use error::*;
pub use otp_code::*;
pub use password::*;
pub use pending_secret::*;
pub use reset_token::*;
pub use role::*;
pub use user::*;
pub use user_id::*;
pub use user_password_hash::*;
