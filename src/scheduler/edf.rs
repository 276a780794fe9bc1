use super::{Dispatch, EnqueueFlags, PolicyKind, ProcId, Scheduler, SimConfig, SimCtx};
use crate::core::DsqId;

/// Earliest deadline first, re-evaluated every tick.
pub struct EdfScheduler {
    priq: DsqId,
    missed: usize,
}

impl Scheduler for EdfScheduler {
    const KIND: PolicyKind = PolicyKind::Edf;

    fn init(ctx: &mut SimCtx, _config: &SimConfig) -> Self {
        Self {
            priq: ctx.create_dsq_priq(),
            missed: 0,
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, proc: ProcId, _flags: EnqueueFlags) {
        let deadline = ctx.proc(proc).deadline;
        let key = ctx.sort_key(proc, i64::try_from(deadline).unwrap_or(i64::MAX));
        ctx.dsq_push_priq(self.priq, proc, key);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<Dispatch> {
        let proc = ctx.dsq_pop(self.priq)?;
        Some(Dispatch::new(proc, 1))
    }

    fn stopping(&mut self, ctx: &mut SimCtx, proc: ProcId, runnable: bool) {
        if runnable {
            return;
        }
        let task = ctx.proc(proc);
        if task.completion_time.is_some_and(|done| done > task.deadline) {
            log::debug!(
                "edf: {} missed deadline {} (finished at {})",
                task.name,
                task.deadline,
                ctx.now
            );
            self.missed += 1;
        }
    }

    fn missed_deadlines(&self) -> Option<usize> {
        Some(self.missed)
    }
}
