//! Runtime core: the bundle of contexts tasks run and deliver on.
//!
//! The public API from this module is [`Runtime`] and its [`RuntimeBuilder`].
//!
//! Internal modules:
//! - [`runtime`]: context lookup by [`ThreadModel`](crate::ThreadModel), shutdown;
//! - [`builder`]: wiring supplied dispatchers and spawning the missing ones.

mod builder;
mod runtime;

pub use builder::RuntimeBuilder;
pub use runtime::Runtime;
