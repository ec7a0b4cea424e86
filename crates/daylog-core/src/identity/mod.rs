//! Identity domain module.
//!
//! # Module Structure
//!
//! - `model`: The externally issued user profile (`Identity`)
//! - `provider`: Identity provider trait, session-change subscriptions
//!
//! # Usage
//!
//! ```ignore
//! use daylog_core::identity::{Identity, IdentityProvider, Subscription};
//! ```

mod model;
mod provider;

// Re-export public API
pub use model::Identity;
pub use provider::{IdentityProvider, SessionChangeHandler, SessionListeners, Subscription};
