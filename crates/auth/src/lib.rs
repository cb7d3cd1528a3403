//! Session resolution for the Teamdesk API
//!
//! Provides JWT validation and an axum extractor that works with any
//! domain state implementing `FromRef<S>` for `SessionResolver`.

mod claims;
mod config;
mod error;
mod extractors;
mod jwt;
mod resolver;
mod session;

pub use claims::SessionClaims;
pub use config::AuthConfig;
pub use error::AuthError;
pub use extractors::MaybeSession;
pub use resolver::SessionResolver;
pub use session::{Session, SessionUser};
