use crate::core::state::Ticks;

/// Workload facts for one process, as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: String,
    pub arrival_time: Ticks,
    pub burst_time: Ticks,
    /// Lower is more urgent.
    pub priority: i32,
    /// Absolute deadline; see [`Job::effective_deadline`].
    pub deadline: Option<Ticks>,
}

impl Job {
    pub fn new(id: impl Into<String>, arrival_time: Ticks, burst_time: Ticks, priority: i32) -> Self {
        Self {
            id: id.into(),
            arrival_time,
            burst_time,
            priority,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Ticks) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// The explicit deadline, or `arrival_time + 2 * burst_time` saturated at
    /// `Ticks::MAX`.
    pub fn effective_deadline(&self) -> Ticks {
        self.deadline.unwrap_or_else(|| {
            self.arrival_time
                .saturating_add(self.burst_time.saturating_mul(2))
        })
    }
}

/// Final accounting for one job after a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    pub id: String,
    pub arrival_time: Ticks,
    pub burst_time: Ticks,
    pub priority: i32,
    pub deadline: Ticks,
    pub completion_time: Ticks,
    pub waiting_time: Ticks,
    pub turnaround_time: Ticks,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_deadline_is_twice_the_burst_past_arrival() {
        assert_eq!(Job::new("A", 3, 5, 1).effective_deadline(), 13);
        assert_eq!(Job::new("A", 3, 5, 1).with_deadline(4).effective_deadline(), 4);
    }

    #[test]
    fn default_deadline_saturates() {
        let job = Job::new("A", 7, Ticks::MAX / 2 + 1, 1);
        assert_eq!(job.effective_deadline(), Ticks::MAX);
    }
}
