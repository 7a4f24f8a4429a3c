//! # Workflows Module
//!
//! High-level entry points that tie an input document, a working directory and
//! an engine runner together.
//!
//! ## Overview
//!
//! A workflow owns the file layout of one engine run: where the input is
//! written, which files the engine is expected to leave behind, and how those
//! files are decoded. Callers only describe the calculation and pick a runner.
//!
//! - **Single Calculation** ([`calculation`]) - Write input, run the engine, load property and wavefunction documents

pub mod calculation;

pub use calculation::{Calculation, CalculationError};
