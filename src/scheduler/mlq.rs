use super::{Dispatch, EnqueueFlags, PolicyKind, ProcId, Scheduler, SimConfig, SimCtx};
use crate::core::{DsqId, Ticks};

pub const MLQ_LEVELS: usize = 3;

/// Static multilevel queue: a process's level is fixed by its priority, levels
/// are served in strict order and each level is round robin.
pub struct MlqScheduler {
    levels: [DsqId; MLQ_LEVELS],
    slice: Ticks,
}

/// Priorities 1-2 map to level 0, 3-4 to level 1, everything above to level 2.
pub fn mlq_level(priority: i32) -> usize {
    // Truncating division keeps priority 0 on level 0
    ((priority - 1) / 2).clamp(0, MLQ_LEVELS as i32 - 1) as usize
}

impl Scheduler for MlqScheduler {
    const KIND: PolicyKind = PolicyKind::Mlq;

    fn init(ctx: &mut SimCtx, config: &SimConfig) -> Self {
        Self {
            levels: std::array::from_fn(|_| ctx.create_dsq_fifo()),
            slice: config.base_slice(),
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, proc: ProcId, _flags: EnqueueFlags) {
        let level = mlq_level(ctx.proc(proc).priority);
        ctx.proc_mut(proc).level = level;
        ctx.dsq_push_fifo(self.levels[level], proc);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<Dispatch> {
        let proc = self.levels.iter().find_map(|&dsq| ctx.dsq_pop(dsq))?;
        Some(Dispatch::new(proc, self.slice))
    }
}

#[cfg(test)]
mod tests {
    use super::mlq_level;

    #[test]
    fn priority_bands() {
        let levels: Vec<usize> = (-1..=7).map(mlq_level).collect();
        assert_eq!(levels, [0, 0, 0, 0, 1, 1, 2, 2, 2]);
    }
}
