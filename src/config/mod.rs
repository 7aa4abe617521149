//! Configuration loaded from the vault directory.

pub mod settings;

pub use settings::{Backend, KdfAlgorithm, Settings};
