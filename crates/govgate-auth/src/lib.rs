//! Govgate Auth: Turn a verified authentication credential into an
//! identity, carry it across requests in a session token, and authorize
//! resource access against on-chain governance.

pub mod bearer;
pub mod error;
pub mod guard;
pub mod identity;
pub mod proxy;
pub mod token;

pub use bearer::{parse_bearer, BEARER_PREFIX};
pub use error::AuthError;
pub use guard::ResourceGuard;
pub use identity::Identity;
pub use proxy::AuthProxy;
pub use token::{Permissions, SessionClaims, SessionTokenIssuer};
