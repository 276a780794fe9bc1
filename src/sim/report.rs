use std::fmt;

use super::{config::PolicyKind, job::JobOutcome};
use crate::core::{Metrics, Segment, Ticks};

/// Read-only result of one finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub policy: PolicyKind,
    pub total_time: Ticks,
    pub idle_time: Ticks,
    pub trace: Vec<Segment>,
    /// In workload order.
    pub jobs: Vec<JobOutcome>,
    pub metrics: Metrics,
    /// Only reported by deadline-aware policies.
    pub missed_deadlines: Option<usize>,
}

impl RunReport {
    pub fn job(&self, id: &str) -> Option<&JobOutcome> {
        self.jobs.iter().find(|job| job.id == id)
    }

    /// The trace as `(process, duration)` pairs.
    pub fn gantt(&self) -> Vec<(&str, Ticks)> {
        self.trace
            .iter()
            .map(|segment| (segment.proc.as_str(), segment.duration))
            .collect()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Gantt Chart:")?;
        for segment in &self.trace {
            write!(f, " {}({})", segment.proc, segment.duration)?;
        }
        writeln!(f)?;

        for job in &self.jobs {
            writeln!(
                f,
                "  {:<6} arrival {:>4}  burst {:>4}  waiting {:>4}  turnaround {:>4}",
                job.id, job.arrival_time, job.burst_time, job.waiting_time, job.turnaround_time
            )?;
        }

        writeln!(f, "Average Waiting Time: {:.2}", self.metrics.avg_waiting_time)?;
        writeln!(
            f,
            "Average Turnaround Time: {:.2}",
            self.metrics.avg_turnaround_time
        )?;
        writeln!(f, "CPU Utilization: {:.2}%", self.metrics.cpu_utilization)?;
        write!(
            f,
            "Throughput: {:.2} processes/unit time",
            self.metrics.throughput
        )?;
        if let Some(missed) = self.missed_deadlines {
            write!(f, "\nMissed Deadlines: {missed}")?;
        }
        Ok(())
    }
}
