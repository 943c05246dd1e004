/// Core error type for textline.
///
/// Adapter crates map their specific errors into this type so the service and
/// the HTTP layer can tell client mistakes, delivery failures and internal
/// faults apart.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or blank required request field.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The gateway could not deliver the message. Carries the caller-safe detail.
    #[error("delivery failed: {0}")]
    Delivery(String),

    /// The gateway answered with a non-success status.
    #[error("gateway rejected request: {status}: {body}")]
    GatewayRejected { status: u16, body: String },

    /// The request never got a response (DNS, connect, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    #[error("external error: {0}")]
    External(String),
}

impl Error {
    /// True for errors caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidInput(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
