//! # projwiz-core
//!
//! Core library for the projwiz scaffolding wizard providing:
//! - The persisted wizard configuration (`config`)
//! - An external command adapter with timeouts (`process`)
//! - A policy-based retry engine (`retry`)
//! - Shared domain types (`types`)
//!
//! # Example
//!
//! ```no_run
//! use projwiz_core::config::ConfigStore;
//!
//! let store = ConfigStore::new("config.json");
//! let config = store.load();
//! println!("default org: {}", config.default_org);
//! ```

pub mod config;
pub mod error;
pub mod process;
pub mod retry;
pub mod types;

pub use error::{Error, Result};
