//! Runtime infrastructure - thread pool for CPU-bound searches

mod pool;

pub use pool::{race_first_success, CancellationToken};
