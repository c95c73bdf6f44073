//! The contract between connection establishment and pluggable authentication mechanisms.
//!
//! Each mechanism is an [`AuthProvider`]. The [`AuthProviderRegistry`] picks the provider that
//! matches a connection's [`Credentials`], lets it augment the initial handshake, and then runs its
//! challenge/response conversation. No mechanism is implemented in this crate.

mod auth_context;
mod auth_error;
mod auth_provider;
mod credentials;

pub use auth_context::*;
pub use auth_error::*;
pub use auth_provider::*;
pub use credentials::*;
