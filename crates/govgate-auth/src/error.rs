use govgate_core::CoreError;
use govgate_credentials::CredentialError;
use govgate_dataverse::DataverseError;

/// Authentication and authorization errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("failed to parse credential: {0}")]
    Credential(#[from] CredentialError),

    #[error("credential not intended for this service: `{service}` (target: `{target}`)")]
    ServiceMismatch { service: String, target: String },

    #[error("governance query failed: {0}")]
    Governance(#[from] DataverseError),

    #[error("{did} is not permitted to {action} {resource}")]
    Unauthorized {
        did: String,
        action: String,
        resource: String,
    },

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    TokenExpired,

    #[error("couldn't find bearer token")]
    MissingBearerToken,

    #[error("failed to issue token: {0}")]
    TokenIssue(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}
