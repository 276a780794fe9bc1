use super::{Dispatch, EnqueueFlags, PolicyKind, ProcId, Scheduler, SimConfig, SimCtx};
use crate::core::DsqId;

/// Shortest remaining time first, re-evaluated after every tick.
pub struct SrtfScheduler {
    priq: DsqId,
}

impl Scheduler for SrtfScheduler {
    const KIND: PolicyKind = PolicyKind::Srtf;

    fn init(ctx: &mut SimCtx, _config: &SimConfig) -> Self {
        Self {
            priq: ctx.create_dsq_priq(),
        }
    }

    // Preempted processes come back with their reduced remaining time as key
    fn enqueue(&mut self, ctx: &mut SimCtx, proc: ProcId, _flags: EnqueueFlags) {
        let remaining = ctx.proc(proc).remaining_time;
        let key = ctx.sort_key(proc, i64::try_from(remaining).unwrap_or(i64::MAX));
        ctx.dsq_push_priq(self.priq, proc, key);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<Dispatch> {
        let proc = ctx.dsq_pop(self.priq)?;
        Some(Dispatch::new(proc, 1))
    }
}
