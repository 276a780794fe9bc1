pub mod core;
pub mod scheduler;
pub mod sim;

pub use scheduler::Scheduler;
pub use sim::{Job, PolicyKind, RunReport, Sim, SimConfig, SimError, simulate, simulate_with};
