//! Gantt trace accumulation.

use super::state::Ticks;

/// One uninterrupted stretch of execution by a single process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub proc: String,
    pub start: Ticks,
    pub duration: Ticks,
}

impl Segment {
    pub fn end(&self) -> Ticks {
        self.start + self.duration
    }
}

/// Coalesces back-to-back dispatches of the same process into one [`Segment`].
///
/// Idle gaps are not recorded; callers [`close`](TraceRecorder::close) the
/// open segment when the CPU goes idle so the next dispatch starts a new one.
#[derive(Debug, Default)]
pub struct TraceRecorder {
    segments: Vec<Segment>,
    open: bool,
}

impl TraceRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, proc: &str, start: Ticks, duration: Ticks) {
        if self.open {
            if let Some(last) = self.segments.last_mut() {
                if last.proc == proc && last.end() == start {
                    last.duration += duration;
                    return;
                }
            }
        }

        self.segments.push(Segment {
            proc: proc.to_owned(),
            start,
            duration,
        });
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn busy_time(&self) -> Ticks {
        self.segments.iter().map(|s| s.duration).sum()
    }

    pub fn into_segments(mut self) -> Vec<Segment> {
        self.close();
        self.segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consecutive_runs_of_one_process_coalesce() {
        let mut trace = TraceRecorder::new();
        trace.extend("P1", 0, 1);
        trace.extend("P1", 1, 1);
        trace.extend("P2", 2, 3);
        trace.extend("P1", 5, 2);

        let durations: Vec<(&str, Ticks)> = trace
            .segments()
            .iter()
            .map(|s| (s.proc.as_str(), s.duration))
            .collect();
        assert_eq!(durations, [("P1", 2), ("P2", 3), ("P1", 2)]);
        assert_eq!(trace.busy_time(), 7);
    }

    #[test]
    fn close_splits_same_process() {
        let mut trace = TraceRecorder::new();
        trace.extend("A", 0, 2);
        trace.close();
        trace.extend("A", 2, 2);
        assert_eq!(trace.into_segments().len(), 2);
    }
}
