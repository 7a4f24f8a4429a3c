//! # Core Module
//!
//! Stateless building blocks for describing an engine calculation and reading
//! back what it produced.
//!
//! ## Architecture
//!
//! - **Keywords** ([`tokens`]) - Directive tokens, parameterized tokens and the keyword catalogues
//! - **Blocks** ([`sections`]) - `%name ... end` sections validated against static field schemas
//! - **Value Domains** ([`constraints`]) - Numeric predicates shared by sections and result decoding
//! - **Input Compiler** ([`document`]) - Assembles tokens, blocks, settings and geometry into input text
//! - **Geometry** ([`structure`]) - Atoms, charge and multiplicity, with element and unit tables
//! - **File I/O** ([`io`]) - Reading and writing coordinate files
//! - **Result Decoding** ([`results`]) - Strict, constraint-checked decoding of JSON result documents

pub mod constraints;
pub mod document;
pub mod io;
pub mod results;
pub mod sections;
pub mod structure;
pub mod tokens;
