//! Store implementations.

pub mod local;

pub use local::LocalRepository;
