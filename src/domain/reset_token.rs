use color_eyre::eyre::{eyre, Result};
use rand::RngCore;
use secrecy::{ExposeSecret, Secret};

/// High-entropy single-use credential proving the holder received the
/// password-reset email. 32 random bytes, hex-encoded.
#[derive(Clone, Debug)]
pub struct ResetToken(Secret<String>);

impl ResetToken {
    pub fn parse(token: Secret<String>) -> Result<Self> {
        let regex = regex::Regex::new(r"^[0-9a-f]{64}$")
            .expect("Regex for ResetToken parser is invalid");
        if regex.is_match(token.expose_secret()) {
            Ok(Self(token))
        } else {
            Err(eyre!("Token is invalid"))
        }
    }

    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(Secret::new(hex::encode(bytes)))
    }
}

impl PartialEq for ResetToken {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}

impl AsRef<Secret<String>> for ResetToken {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}
