pub mod scheduler;

pub use scheduler::{PipelineScheduler, RunGate};
