mod health;
mod login;
mod me;
mod register;
mod request_reset;
mod resend_otp;
mod reset_password;
mod verify_otp;

pub use health::*;
pub use login::*;
pub use me::*;
pub use register::*;
pub use request_reset::*;
pub use resend_otp::*;
pub use reset_password::*;
pub use verify_otp::*;
