//! # Engine Module
//!
//! The boundary between the library and the external engine executable.
//!
//! ## Overview
//!
//! Nothing in this layer understands the input language or the result
//! documents; it only knows how to launch the engine on an input file inside a
//! working directory and report what happened. [`runner::EngineRunner`] is the
//! seam: [`runner::ProcessRunner`] spawns the real binary, while tests and
//! embedding applications can supply their own implementation.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Executable path, extra arguments, environment and output capture
//! - **Execution** ([`runner`]) - The runner trait, run requests and outcomes, and the process-backed runner
//! - **Progress Monitoring** ([`progress`]) - Callback-based reporting of run milestones
//! - **Error Handling** ([`error`]) - Launch, I/O and configuration failures

pub mod config;
pub mod error;
pub mod progress;
pub mod runner;

pub use config::{RunnerConfig, RunnerConfigBuilder};
pub use error::EngineError;
pub use progress::{Progress, ProgressCallback, ProgressReporter};
pub use runner::{EngineRunner, ProcessRunner, RunOutcome, RunRequest};
