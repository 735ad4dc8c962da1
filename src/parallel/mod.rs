pub mod batch;
pub mod pool;

pub use batch::{resolve_batch, MIN_REQUESTS_PER_TASK};
pub use pool::WorkerPool;
