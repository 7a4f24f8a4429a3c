//! # orcabind
//!
//! A typed binding layer for the ORCA quantum-chemistry engine: it compiles strongly
//! typed calculation settings into the engine's plain-text input format, and decodes
//! the engine's JSON result documents into validated record trees.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture so that each concern can be
//! tested in isolation.
//!
//! - **[`core`]: The Foundation.** Stateless data models: keyword tokens and their
//!   catalogues, schema-checked `%block` sections, the input document compiler,
//!   molecular structures with their file formats, and the strict result decoder.
//!
//! - **[`engine`]: The Execution Boundary.** Launching the external engine binary,
//!   its configuration, progress reporting and the errors a run can raise. The
//!   [`engine::EngineRunner`] trait is the seam that lets tests stand in for the
//!   real executable.
//!
//! - **[`workflows`]: The Public API.** Ties `core` and `engine` together into a
//!   complete calculation: write the input, run the engine, decode its results.

pub mod core;
pub mod engine;
pub mod workflows;
