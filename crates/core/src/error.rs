use thiserror::Error;

pub type CrmResult<T> = Result<T, CrmError>;

#[derive(Error, Debug)]
pub enum CrmError {
    /// Covers both a missing row and a row failing a status/role
    /// precondition; the two are indistinguishable to callers.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Storage error: {0}")]
    Storage(String),

    /// Raised by mail transports. Swallowed and logged by the email
    /// service; never escapes an admin operation.
    #[error("Mail delivery error: {0}")]
    Delivery(String),
}
