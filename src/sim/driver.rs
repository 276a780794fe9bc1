use rustc_hash::FxHashSet;

use super::{
    config::SimConfig,
    error::SimError,
    job::{Job, JobOutcome},
    report::RunReport,
};
use crate::{
    core::{Metrics, SimEvent, Ticks, driver::SchedCore},
    scheduler::Scheduler,
};

/// One run of policy `S` over a fixed workload.
pub struct Sim<S: Scheduler> {
    pub core: SchedCore<S>,
}

impl<S: Scheduler> Sim<S> {
    /// Validates `config` and `jobs` before building any run-state.
    pub fn new(jobs: &[Job], config: &SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        validate_workload(jobs)?;

        log::info!(
            "starting {} over {} processes (quantum {}, aging {})",
            S::KIND,
            jobs.len(),
            config.quantum,
            config.aging_interval
        );

        Ok(Self {
            core: SchedCore::<S>::new(jobs, config),
        })
    }

    pub fn step(&mut self) -> Vec<SimEvent> {
        self.core.step()
    }

    pub fn all_jobs_completed(&self) -> bool {
        self.core.is_done()
    }

    /// Step until every process has finished, then build the report.
    pub fn run(mut self) -> RunReport {
        while !self.all_jobs_completed() {
            self.step();
        }
        self.finish()
    }

    /// Build the report from the current state; call once all jobs completed.
    pub fn finish(self) -> RunReport {
        debug_assert!(self.all_jobs_completed(), "Report built before run ended");
        let steps = self.core.observer().steps();
        let (ctx, scheduler, trace) = self.core.into_parts();

        let jobs: Vec<JobOutcome> = ctx
            .procs
            .iter()
            .map(|proc| JobOutcome {
                id: proc.name.clone(),
                arrival_time: proc.arrival_time,
                burst_time: proc.burst_time,
                priority: proc.priority,
                deadline: proc.deadline,
                completion_time: proc.completion_time.unwrap_or(ctx.now),
                waiting_time: proc.waiting_time,
                turnaround_time: proc.turnaround_time,
            })
            .collect();
        let metrics = Metrics::compute(&jobs, ctx.now);
        debug_assert_eq!(
            trace.busy_time() + ctx.idle_time,
            ctx.now,
            "Trace and idle time do not cover the run"
        );

        log::info!(
            "{} finished at t={} after {steps} steps ({} idle)",
            S::KIND,
            ctx.now,
            ctx.idle_time
        );

        RunReport {
            policy: S::KIND,
            total_time: ctx.now,
            idle_time: ctx.idle_time,
            trace: trace.into_segments(),
            jobs,
            metrics,
            missed_deadlines: scheduler.missed_deadlines(),
        }
    }
}

/// Reject workloads the core cannot replay: empty, zero bursts, repeated ids,
/// unsorted arrivals, or a schedule longer than `Ticks` can count.
pub fn validate_workload(jobs: &[Job]) -> Result<(), SimError> {
    if jobs.is_empty() {
        return Err(SimError::EmptyWorkload);
    }

    let mut seen = FxHashSet::default();
    let mut last_arrival = 0;
    // Latest possible finish of everything seen so far
    let mut horizon: Ticks = 0;
    for job in jobs {
        if job.burst_time == 0 {
            return Err(SimError::ZeroBurst { id: job.id.clone() });
        }
        if !seen.insert(job.id.as_str()) {
            return Err(SimError::DuplicateId { id: job.id.clone() });
        }
        if job.arrival_time < last_arrival {
            return Err(SimError::UnsortedWorkload { id: job.id.clone() });
        }
        last_arrival = job.arrival_time;
        horizon = horizon
            .max(job.arrival_time)
            .checked_add(job.burst_time)
            .ok_or_else(|| SimError::HorizonOverflow { id: job.id.clone() })?;
    }
    Ok(())
}
