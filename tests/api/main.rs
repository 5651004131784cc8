mod register;
mod request_reset;
mod resend_otp;
mod verify_otp;
