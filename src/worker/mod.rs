//! Background work: the in-memory job queue, the pool draining it, and the
//! handler that executes each job.

pub mod handler;
pub mod pool;
pub mod queue;
