use super::{Dispatch, ENQ_ARRIVAL, EnqueueFlags, PolicyKind, ProcId, Scheduler, SimConfig, SimCtx};
use crate::core::{DsqId, Ticks};

pub const MFQ_LEVELS: usize = 3;

/// Multilevel feedback queue.
///
/// Arrivals enter level 0. A process that uses its whole slice without
/// finishing drops one level, bottoming out at the last one. With
/// `mfq_boost_after` set, a process that has sat in a lower level for that
/// long moves back up one level before the next pick.
pub struct MfqScheduler {
    levels: [DsqId; MFQ_LEVELS],
    quanta: [Ticks; MFQ_LEVELS],
    boost_after: Option<Ticks>,
}

impl MfqScheduler {
    fn boost_starved(&mut self, ctx: &mut SimCtx, boost_after: Ticks) {
        for level in 1..MFQ_LEVELS {
            let members = ctx.dsq_members(self.levels[level]);
            while ctx.dsq_pop(self.levels[level]).is_some() {}

            for proc in members {
                let starved = ctx.now - ctx.proc(proc).last_executed_time >= boost_after;
                let target = if starved { level - 1 } else { level };
                if starved {
                    log::trace!("mfq: boosting {} to level {target}", ctx.proc(proc).name);
                }
                ctx.proc_mut(proc).level = target;
                ctx.dsq_push_fifo(self.levels[target], proc);
            }
        }
    }
}

impl Scheduler for MfqScheduler {
    const KIND: PolicyKind = PolicyKind::Mfq;

    fn init(ctx: &mut SimCtx, config: &SimConfig) -> Self {
        Self {
            levels: std::array::from_fn(|_| ctx.create_dsq_fifo()),
            quanta: config.mfq_quanta(),
            boost_after: config.mfq_boost_after,
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, proc: ProcId, flags: EnqueueFlags) {
        if flags & ENQ_ARRIVAL != 0 {
            ctx.proc_mut(proc).level = 0;
        }
        let level = ctx.proc(proc).level;
        ctx.dsq_push_fifo(self.levels[level], proc);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<Dispatch> {
        if let Some(boost_after) = self.boost_after {
            self.boost_starved(ctx, boost_after);
        }

        let proc = self.levels.iter().find_map(|&dsq| ctx.dsq_pop(dsq))?;
        let level = ctx.proc(proc).level;
        Some(Dispatch::new(proc, self.quanta[level]))
    }

    fn stopping(&mut self, ctx: &mut SimCtx, proc: ProcId, runnable: bool) {
        if runnable {
            let task = ctx.proc_mut(proc);
            task.level = (task.level + 1).min(MFQ_LEVELS - 1);
        }
    }
}
