pub mod builder;
pub mod classifier;

pub use builder::{build_schedule, ScheduleBuild};
pub use classifier::classify;
