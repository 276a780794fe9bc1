use super::state::{ProcState, SimCtx, Ticks};

#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
    last_remaining: Vec<Ticks>,
}

impl Observer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn observe(&mut self, ctx: &SimCtx) {
        self.step += 1;

        if self.last_remaining.len() != ctx.procs.len() {
            self.last_remaining = ctx.procs.iter().map(|p| p.burst_time).collect();
        }

        for proc in &ctx.procs {
            let id = proc.id;
            debug_assert!(
                proc.remaining_time <= self.last_remaining[id],
                "Remaining time of process {id} went up"
            );
            debug_assert!(
                proc.state == ProcState::Pending || proc.arrival_time <= ctx.now,
                "Process {id} admitted before its arrival"
            );
            if proc.state == ProcState::Completed {
                debug_assert_eq!(proc.remaining_time, 0);
                debug_assert_eq!(
                    proc.turnaround_time,
                    proc.waiting_time + proc.burst_time,
                    "Process {id} breaks turnaround == waiting + burst"
                );
            } else {
                debug_assert!(proc.remaining_time > 0, "Unfinished process {id} has no work");
            }
            self.last_remaining[id] = proc.remaining_time;
        }

        if let Some(id) = ctx.running {
            debug_assert_eq!(
                ctx.proc(id).state,
                ProcState::Running,
                "ctx.running process {id} must be Running"
            );
        }

        for (&proc_id, &dsq_id) in &ctx.proc_to_dsq {
            let proc = ctx.proc(proc_id);
            debug_assert_eq!(
                proc.state,
                ProcState::Ready,
                "Process {proc_id} in DSQ {dsq_id:?} must be Ready"
            );
            if let Some(dsq) = ctx.dsqs.get(dsq_id) {
                debug_assert!(
                    dsq.contains(proc_id),
                    "proc_to_dsq claims process {proc_id} in DSQ {dsq_id:?}, but queue does not contain it"
                );
            } else {
                debug_assert!(false, "proc_to_dsq references unknown DSQ {dsq_id:?}");
            }
        }
    }
}
