use super::{
    Dispatch, EnqueueFlags, PolicyKind, ProcId, SLICE_FULL_BURST, Scheduler, SimConfig, SimCtx,
};
use crate::core::DsqId;

pub struct FcfsScheduler {
    fifo: DsqId,
}

impl Scheduler for FcfsScheduler {
    const KIND: PolicyKind = PolicyKind::Fcfs;

    fn init(ctx: &mut SimCtx, _config: &SimConfig) -> Self {
        Self {
            fifo: ctx.create_dsq_fifo(),
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, proc: ProcId, _flags: EnqueueFlags) {
        ctx.dsq_push_fifo(self.fifo, proc);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<Dispatch> {
        let proc = ctx.dsq_pop(self.fifo)?;
        Some(Dispatch::new(proc, SLICE_FULL_BURST))
    }
}
