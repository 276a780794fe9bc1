use super::{Dispatch, EnqueueFlags, PolicyKind, ProcId, Scheduler, SimConfig, SimCtx};
use crate::core::{DsqId, Ticks};

pub struct RoundRobinScheduler {
    fifo: DsqId,
    quantum: Ticks,
}

impl Scheduler for RoundRobinScheduler {
    const KIND: PolicyKind = PolicyKind::RoundRobin;

    fn init(ctx: &mut SimCtx, config: &SimConfig) -> Self {
        Self {
            fifo: ctx.create_dsq_fifo(),
            quantum: config.quantum,
        }
    }

    // Arrivals and preempted processes both go to the tail
    fn enqueue(&mut self, ctx: &mut SimCtx, proc: ProcId, _flags: EnqueueFlags) {
        ctx.dsq_push_fifo(self.fifo, proc);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<Dispatch> {
        let proc = ctx.dsq_pop(self.fifo)?;
        Some(Dispatch::new(proc, self.quantum))
    }
}
