//! Reading and writing molecular structure files.
//!
//! Structures can be embedded into an input document directly, but most
//! workflows start from a file on disk. Formats implement [`traits::StructureFile`].

pub mod traits;
pub mod xyz;
