//! Authorization flow for Trellis.
//!
//! [`Authorizer`] resolves an [`trellis_core::AuthorizationResult`] for a
//! widget identity in strict priority order: an injected preview override,
//! then the TTL cache ([`AuthCache`] over a [`CacheStore`] backend), then a
//! bounded network retry loop against the platform's
//! `/api/auth/widget` endpoint ([`AuthTransport`]).

pub mod authorizer;
pub mod cache;
pub mod error;
pub mod store;
pub mod transport;

pub use authorizer::Authorizer;
pub use cache::{AuthCache, CachedAuthorization};
pub use error::{AuthError, StoreError};
pub use store::{CacheStore, DiskStore, MemoryStore};
pub use transport::{AuthTransport, HttpTransport, ScriptedOutcome, ScriptedTransport};
