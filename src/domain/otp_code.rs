use color_eyre::eyre::{eyre, Result};
use rand::Rng;
use secrecy::{ExposeSecret, Secret};

/// Six-digit one-time passcode delivered by email to prove control of an
/// address.
#[derive(Clone, Debug)]
pub struct OtpCode(Secret<String>);

impl OtpCode {
    pub fn parse(code: Secret<String>) -> Result<Self> {
        let regex = regex::Regex::new(r"^\d{6}$")
            .expect("Regex for OtpCode parser is invalid");
        if regex.is_match(code.expose_secret()) {
            Ok(Self(code))
        } else {
            Err(eyre!("Code is invalid"))
        }
    }

    /// Uniformly random in 100000..=999999, so every code has six
    /// significant digits.
    pub fn generate() -> Self {
        let code = rand::thread_rng().gen_range(100_000..=999_999u32);
        Self(Secret::new(code.to_string()))
    }
}

impl PartialEq for OtpCode {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}

impl AsRef<Secret<String>> for OtpCode {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}
