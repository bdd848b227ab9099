//! Platform client plumbing shared by the identity and document clients

pub mod credentials;
pub mod http;

pub use credentials::{CredentialError, ServiceCredentials};
pub use http::{ApiClient, ApiError};
