//! # rerun-core
//!
//! Restart loop for development workflows.
//!
//! Reads one trigger per line from an input stream and keeps exactly one
//! invocation of a command current: each line cancels the previous child and
//! starts a fresh one. Pairs with any file watcher that prints a line per change.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use rerun_core::{CancelPolicy, CommandSpec, Supervisor, SupervisorConfig};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let sup = Supervisor::new(SupervisorConfig {
//!     command: CommandSpec::from_argv(["cargo", "run"]).unwrap(),
//!     cancel: CancelPolicy::default(),
//! });
//!
//! let summary = sup.run_stream(tokio::io::stdin()).await;
//! eprintln!("started {} children", summary.started);
//! # }
//! ```

pub mod child;
pub mod error;
pub mod supervisor;
pub mod trigger;
pub mod types;

pub use error::Error;
pub use supervisor::{Supervisor, SupervisorConfig};
pub use types::*;
