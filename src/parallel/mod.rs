pub mod batch;
pub mod pool;

pub use batch::archetype_batches;
pub use pool::WorkerPool;
