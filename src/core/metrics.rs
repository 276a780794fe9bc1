use average::{Estimate, Mean};

use super::state::Ticks;
use crate::sim::JobOutcome;

/// Aggregate performance of one finished run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub avg_waiting_time: f64,
    pub avg_turnaround_time: f64,
    /// Percent of elapsed time spent executing.
    pub cpu_utilization: f64,
    /// Completed processes per unit of time.
    pub throughput: f64,
}

impl Metrics {
    /// Utilization and throughput are NaN when `total_time` is zero.
    pub fn compute(jobs: &[JobOutcome], total_time: Ticks) -> Self {
        let total_burst: Ticks = jobs.iter().map(|j| j.burst_time).sum();
        let (cpu_utilization, throughput) = if total_time == 0 {
            (f64::NAN, f64::NAN)
        } else {
            (
                total_burst as f64 / total_time as f64 * 100.0,
                jobs.len() as f64 / total_time as f64,
            )
        };

        Self {
            avg_waiting_time: avg(jobs.iter().map(|j| j.waiting_time as f64)),
            avg_turnaround_time: avg(jobs.iter().map(|j| j.turnaround_time as f64)),
            cpu_utilization,
            throughput,
        }
    }
}

fn avg(iter: impl Iterator<Item = f64>) -> f64 {
    iter.collect::<Mean>().estimate()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(id: &str, burst: Ticks, waiting: Ticks) -> JobOutcome {
        JobOutcome {
            id: id.to_owned(),
            arrival_time: 0,
            burst_time: burst,
            priority: 0,
            deadline: 2 * burst,
            completion_time: waiting + burst,
            waiting_time: waiting,
            turnaround_time: waiting + burst,
        }
    }

    #[test]
    fn averages_and_utilization() {
        let jobs = [outcome("a", 2, 0), outcome("b", 4, 2)];
        let m = Metrics::compute(&jobs, 8);
        assert_eq!(m.avg_waiting_time, 1.0);
        assert_eq!(m.avg_turnaround_time, 4.0);
        assert_eq!(m.cpu_utilization, 75.0);
        assert_eq!(m.throughput, 0.25);
    }

    #[test]
    fn zero_elapsed_time_is_undefined() {
        let m = Metrics::compute(&[], 0);
        assert!(m.cpu_utilization.is_nan());
        assert!(m.throughput.is_nan());
    }
}
