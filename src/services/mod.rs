pub mod data_stores;
pub mod mock_email_client;
pub mod postmark_email_client;
pub mod recording_audit_sink;
pub mod tracing_audit_sink;

pub use mock_email_client::*;
pub use postmark_email_client::*;
pub use recording_audit_sink::*;
pub use tracing_audit_sink::*;
