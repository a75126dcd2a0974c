//! Resilience primitives.
//!
//! The client issues exactly one attempt per call; the only guard it applies is a
//! caller-visible deadline.
//!
//! ```rust
//! use forge_fetch::resilience::with_timeout;
//!
//! # async fn demo() -> forge_fetch::Result<()> {
//! let value: u32 = with_timeout(async { Ok::<_, forge_fetch::Error>(42) }, Some(500)).await?;
//! assert_eq!(value, 42);
//! # Ok(())
//! # }
//! ```

pub mod timeout;

pub use timeout::{effective_limit, with_timeout, TimeoutError};
