//! Govgate Credentials: Key resolution, proof suites, credential
//! verification and authentication claim extraction.

pub mod auth;
pub mod document;
pub mod error;
pub mod issuer;
pub mod resolver;
pub mod suite;
pub mod verifier;

pub use auth::{AuthClaim, AuthClaimParser, ClaimParser, CLAIM_TO_SERVICE};
pub use document::{Credential, CredentialSubject, Proof};
pub use error::{CredentialError, KeyResolutionError};
pub use issuer::{sign_credential, AuthCredentialBuilder, AuthCredentialConfig, ProofOptions};
pub use resolver::{
    DidKeyDocumentStrategy, KeyResolutionStrategy, KeyResolver, Resolution,
    Secp256k1DidKeyStrategy,
};
pub use suite::{canonicalize, default_suites, LinkedDataSuite, ProofSuite};
pub use verifier::{CredentialVerifier, VerifiedCredential};
