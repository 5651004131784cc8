use color_eyre::eyre::Result;

use super::Email;

/// Outbound mail capability. Delivery failures are recoverable errors the
/// caller decides how to surface; implementations must bound how long a send
/// can take.
#[async_trait::async_trait]
pub trait EmailClient {
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<()>;
}
