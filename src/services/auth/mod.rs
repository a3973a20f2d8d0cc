pub mod access_jwt;
pub mod context;
pub mod factory;
pub mod pipeline;
pub mod revocation;

pub use access_jwt::TokenVerifier;
pub use context::{AuthContext, Authentication, RequestDetails};
pub use factory::{build_auth_pipeline, build_revocation_store};
pub use pipeline::{AuthFailure, AuthOutcome, AuthPipeline};
pub use revocation::{CacheRevocationStore, RevocationStore};
