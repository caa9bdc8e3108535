//! # projwiz-projects
//!
//! Project creation for projwiz providing:
//! - Git operations (clone, commit, remotes, push, tags)
//! - Template identifier rewriting
//! - The end-to-end project pipeline
//!
//! # Example
//!
//! ```no_run
//! use projwiz_core::config::WizardConfig;
//! use projwiz_core::process::SystemCommandRunner;
//! use projwiz_projects::{ProjectPipeline, ProjectRequest};
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let pipeline = ProjectPipeline::new(WizardConfig::default(), Arc::new(SystemCommandRunner::new()));
//! let request = ProjectRequest::new("demo-app", "acme", "acme/flutter-template", "main");
//! let result = pipeline.run(&request).await;
//! for line in &result.step_log {
//!     println!("{}", line);
//! }
//! # }
//! ```

pub mod error;
pub mod git;
pub mod pipeline;
pub mod rewrite;

pub use error::{Error, Result};
pub use pipeline::{is_valid_project_name, PipelineResult, ProjectPipeline, ProjectRequest};
pub use rewrite::{IdentifierRewriter, ProjectIdentity, RewriteReport, SubstringRewriter};
