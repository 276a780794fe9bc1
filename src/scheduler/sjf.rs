use super::{
    Dispatch, EnqueueFlags, PolicyKind, ProcId, SLICE_FULL_BURST, Scheduler, SimConfig, SimCtx,
};
use crate::core::DsqId;

/// Non-preemptive shortest job first, keyed on total burst time.
pub struct SjfScheduler {
    priq: DsqId,
}

impl Scheduler for SjfScheduler {
    const KIND: PolicyKind = PolicyKind::Sjf;

    fn init(ctx: &mut SimCtx, _config: &SimConfig) -> Self {
        Self {
            priq: ctx.create_dsq_priq(),
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, proc: ProcId, _flags: EnqueueFlags) {
        let burst = ctx.proc(proc).burst_time;
        let key = ctx.sort_key(proc, i64::try_from(burst).unwrap_or(i64::MAX));
        ctx.dsq_push_priq(self.priq, proc, key);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<Dispatch> {
        let proc = ctx.dsq_pop(self.priq)?;
        Some(Dispatch::new(proc, SLICE_FULL_BURST))
    }
}
