use super::{Dispatch, ENQ_ARRIVAL, EnqueueFlags, PolicyKind, ProcId, Scheduler, SimConfig, SimCtx};
use crate::core::{DsqId, Ticks};

pub const NICE_0_WEIGHT: u64 = 1024;

// Virtual runtime is kept in 1/1024 of a tick at nice 0
const VRUNTIME_SCALE: u64 = 1024;

/// Linux's nice-to-weight table, nice -20 through 19.
const PRIO_TO_WEIGHT: [u64; 40] = [
    88761, 71755, 56483, 46273, 36291, //
    29154, 23254, 18705, 14949, 11916, //
    9548, 7620, 6100, 4904, 3906, //
    3121, 2501, 1991, 1586, 1277, //
    1024, 820, 655, 526, 423, //
    335, 272, 215, 172, 137, //
    110, 87, 70, 56, 45, //
    36, 29, 23, 18, 15,
];

/// Weight for a priority read as a nice value, clamped to -20..=19.
pub fn prio_to_weight(priority: i32) -> u64 {
    let index = priority.clamp(-20, 19) + 20;
    PRIO_TO_WEIGHT[index as usize]
}

pub fn vruntime_delta(ran: Ticks, weight: u64) -> u64 {
    ran.saturating_mul(NICE_0_WEIGHT * VRUNTIME_SCALE) / weight
}

/// Simplified completely fair scheduler: the ready process with the smallest
/// virtual runtime runs for one tick. Heavier (more urgent) processes accrue
/// virtual runtime more slowly.
pub struct CfsScheduler {
    priq: DsqId,
    min_vruntime: u64,
    newcomer_floor: bool,
}

impl Scheduler for CfsScheduler {
    const KIND: PolicyKind = PolicyKind::Cfs;

    fn init(ctx: &mut SimCtx, config: &SimConfig) -> Self {
        for proc in &mut ctx.procs {
            proc.weight = prio_to_weight(proc.priority);
            proc.vruntime = 0;
        }
        Self {
            priq: ctx.create_dsq_priq(),
            min_vruntime: 0,
            newcomer_floor: config.cfs_newcomer_floor,
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, proc: ProcId, flags: EnqueueFlags) {
        // Arrivals start at zero unless floored to the queue minimum
        if self.newcomer_floor && flags & ENQ_ARRIVAL != 0 {
            ctx.proc_mut(proc).vruntime = self.min_vruntime;
        }
        let vruntime = ctx.proc(proc).vruntime;
        let key = ctx.sort_key(proc, i64::try_from(vruntime).unwrap_or(i64::MAX));
        ctx.dsq_push_priq(self.priq, proc, key);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<Dispatch> {
        let proc = ctx.dsq_pop(self.priq)?;
        Some(Dispatch::new(proc, 1))
    }

    fn elapsed(&mut self, ctx: &mut SimCtx, running: ProcId, from: Ticks, to: Ticks) {
        let task = ctx.proc_mut(running);
        task.vruntime = task
            .vruntime
            .saturating_add(vruntime_delta(to - from, task.weight));
    }

    // Progress min_vruntime
    fn stopping(&mut self, ctx: &mut SimCtx, proc: ProcId, runnable: bool) {
        let current = runnable.then(|| ctx.proc(proc).vruntime);
        let leftmost = ctx.dsq_peek(self.priq).map(|id| ctx.proc(id).vruntime);
        let floor = match (current, leftmost) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        if let Some(floor) = floor {
            self.min_vruntime = self.min_vruntime.max(floor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nice_zero_accrues_one_tick_per_tick() {
        assert_eq!(prio_to_weight(0), NICE_0_WEIGHT);
        assert_eq!(vruntime_delta(1, NICE_0_WEIGHT), VRUNTIME_SCALE);
    }

    #[test]
    fn less_urgent_priority_accrues_faster() {
        assert!(prio_to_weight(5) < prio_to_weight(1));
        assert!(vruntime_delta(1, prio_to_weight(5)) > vruntime_delta(1, prio_to_weight(1)));
        assert_eq!(prio_to_weight(-40), 88761);
        assert_eq!(prio_to_weight(99), 15);
    }
}
