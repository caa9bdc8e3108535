//! Fixed-delay retry engine
//!
//! Used wherever an external operation gets more than one attempt, such as
//! backend project creation.
//!
//! # Example
//!
//! ```rust,no_run
//! use projwiz_core::retry::{RetryExecutorBuilder, TracingObserver};
//! use projwiz_core::types::RetryPolicy;
//!
//! async fn example() {
//!     let executor = RetryExecutorBuilder::new()
//!         .with_policy(RetryPolicy::fixed(3, 2000))
//!         .with_observer(TracingObserver::new("create-project"))
//!         .build();
//!
//!     let result = executor
//!         .execute(|| async { Ok::<_, std::io::Error>("created") })
//!         .await;
//!     assert!(result.is_ok());
//! }
//! ```

mod error;
mod executor;
mod observer;

pub use error::RetryError;
pub use executor::{RetryExecutor, RetryExecutorBuilder};
pub use observer::{RetryObserver, StatsObserver, TracingObserver};
