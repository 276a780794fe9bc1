pub mod config;
pub mod driver;
pub mod error;
pub mod job;
pub mod report;

pub use config::{PolicyKind, SimConfig};
pub use driver::{Sim, validate_workload};
pub use error::SimError;
pub use job::{Job, JobOutcome};
pub use report::RunReport;

use crate::core::{SimCtx, SimEvent};
use crate::scheduler::{
    CfsScheduler, EdfScheduler, FcfsScheduler, MfqScheduler, MlqScheduler,
    PreemptivePriorityScheduler, PriorityScheduler, RoundRobinScheduler, Scheduler, SjfScheduler,
    SrtfScheduler,
};

/// Replay `jobs` under the policy named by `config` and report the outcome.
pub fn simulate(jobs: &[Job], config: &SimConfig) -> Result<RunReport, SimError> {
    simulate_with(jobs, config, |_, _| {})
}

/// Like [`simulate`], handing every driver event to `on_event` together with
/// the state right after the step that produced it.
pub fn simulate_with<F>(
    jobs: &[Job],
    config: &SimConfig,
    on_event: F,
) -> Result<RunReport, SimError>
where
    F: FnMut(&SimCtx, &SimEvent),
{
    match config.policy {
        PolicyKind::Fcfs => run::<FcfsScheduler, F>(jobs, config, on_event),
        PolicyKind::Sjf => run::<SjfScheduler, F>(jobs, config, on_event),
        PolicyKind::Srtf => run::<SrtfScheduler, F>(jobs, config, on_event),
        PolicyKind::RoundRobin => run::<RoundRobinScheduler, F>(jobs, config, on_event),
        PolicyKind::Priority => run::<PriorityScheduler, F>(jobs, config, on_event),
        PolicyKind::PriorityPreemptive => {
            run::<PreemptivePriorityScheduler, F>(jobs, config, on_event)
        }
        PolicyKind::Mlq => run::<MlqScheduler, F>(jobs, config, on_event),
        PolicyKind::Mfq => run::<MfqScheduler, F>(jobs, config, on_event),
        PolicyKind::Cfs => run::<CfsScheduler, F>(jobs, config, on_event),
        PolicyKind::Edf => run::<EdfScheduler, F>(jobs, config, on_event),
    }
}

fn run<S, F>(jobs: &[Job], config: &SimConfig, mut on_event: F) -> Result<RunReport, SimError>
where
    S: Scheduler,
    F: FnMut(&SimCtx, &SimEvent),
{
    let mut sim = Sim::<S>::new(jobs, config)?;
    while !sim.all_jobs_completed() {
        for event in sim.step() {
            on_event(&sim.core.ctx, &event);
        }
    }
    Ok(sim.finish())
}
