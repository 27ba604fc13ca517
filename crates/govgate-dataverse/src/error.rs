/// Dataverse query and governance resolution errors.
#[derive(Debug, thiserror::Error)]
pub enum DataverseError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("contract {address} query failed: {message}")]
    Contract { address: String, message: String },

    #[error("no result found in binding")]
    NoResult,

    #[error("variable not found in binding result: {0}")]
    VarNotFound(String),

    #[error("variable result type mismatch in binding result: {0}")]
    TypeMismatch(String),

    #[error("failed to decode contract response: {0}")]
    Decode(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<reqwest::Error> for DataverseError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            DataverseError::Decode(e.to_string())
        } else {
            DataverseError::Transport(e.to_string())
        }
    }
}
