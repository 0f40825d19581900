//! Development tools for jdopt.
//!
//! - [`logging`]: installs the `tracing` subscriber from `JDOPT_*` variables
//! - [`memory`]: resident-memory snapshots around model and solve stages

pub mod logging;
pub mod memory;

pub use logging::{LoggingError, init_logging};
pub use memory::{MemoryError, MemoryProbe, MemorySnapshot};
