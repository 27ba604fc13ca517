//! Govgate Core: Fundamental types, errors, and configuration shared by
//! every Govgate crate.

pub mod auth_state;
pub mod config;
pub mod error;
pub mod types;

pub use auth_state::{AuthEvent, AuthState, AuthStateMachine};
pub use config::{DataverseConfig, TokenConfig};
pub use error::CoreError;
pub use types::{Did, PROOF_PURPOSE_AUTHENTICATION};
