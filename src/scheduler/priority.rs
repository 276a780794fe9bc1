//! Priority scheduling. Lower numbers are more urgent.

use super::{
    Dispatch, EnqueueFlags, PolicyKind, ProcId, SLICE_FULL_BURST, Scheduler, SimConfig, SimCtx,
};
use crate::core::{DsqId, Ticks};

/// Non-preemptive priority scheduling with aging.
///
/// Every `aging_interval` units a queued process has waited since arrival,
/// its effective priority improves by one, down to 0. The priority reported
/// for the process is left untouched.
pub struct PriorityScheduler {
    priq: DsqId,
    aging_interval: Ticks,
}

impl Scheduler for PriorityScheduler {
    const KIND: PolicyKind = PolicyKind::Priority;

    fn init(ctx: &mut SimCtx, config: &SimConfig) -> Self {
        Self {
            priq: ctx.create_dsq_priq(),
            aging_interval: config.aging_interval,
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, proc: ProcId, _flags: EnqueueFlags) {
        let key = ctx.sort_key(proc, ctx.proc(proc).effective_priority.into());
        ctx.dsq_push_priq(self.priq, proc, key);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<Dispatch> {
        let proc = ctx.dsq_pop(self.priq)?;
        Some(Dispatch::new(proc, SLICE_FULL_BURST))
    }

    fn elapsed(&mut self, ctx: &mut SimCtx, _running: ProcId, from: Ticks, to: Ticks) {
        for proc in ctx.dsq_members(self.priq) {
            let steps = aging_steps(ctx.proc(proc).arrival_time, from, to, self.aging_interval);
            if steps == 0 {
                continue;
            }

            let current = ctx.proc(proc).effective_priority;
            let aged = if current <= 0 {
                current
            } else {
                current
                    .saturating_sub(i32::try_from(steps).unwrap_or(i32::MAX))
                    .max(0)
            };
            ctx.proc_mut(proc).effective_priority = aged;

            let key = ctx.sort_key(proc, aged.into());
            let rekeyed = ctx.dsq_set_key(self.priq, proc, key);
            debug_assert!(rekeyed, "Aged process {proc} missing from priority DSQ");
        }
    }
}

/// Number of instants `t` in `(from, to]` at which a process that arrived at
/// `arrival` has waited a positive multiple of `interval`.
fn aging_steps(arrival: Ticks, from: Ticks, to: Ticks, interval: Ticks) -> Ticks {
    if to <= arrival {
        return 0;
    }
    let lo = from.max(arrival);
    (to - arrival) / interval - (lo - arrival) / interval
}

/// Preemptive priority scheduling, re-evaluated every tick. No aging.
pub struct PreemptivePriorityScheduler {
    priq: DsqId,
}

impl Scheduler for PreemptivePriorityScheduler {
    const KIND: PolicyKind = PolicyKind::PriorityPreemptive;

    fn init(ctx: &mut SimCtx, _config: &SimConfig) -> Self {
        Self {
            priq: ctx.create_dsq_priq(),
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, proc: ProcId, _flags: EnqueueFlags) {
        let key = ctx.sort_key(proc, ctx.proc(proc).priority.into());
        ctx.dsq_push_priq(self.priq, proc, key);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<Dispatch> {
        let proc = ctx.dsq_pop(self.priq)?;
        Some(Dispatch::new(proc, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::aging_steps;

    #[test]
    fn aging_counts_multiples_of_interval_inside_span() {
        // Waited 1..=9 over the span; multiples of 2 are 2, 4, 6, 8
        assert_eq!(aging_steps(1, 0, 10, 2), 4);
        // Arrived at 9, waited at most 1 unit
        assert_eq!(aging_steps(9, 0, 10, 2), 0);
        // Waited 6..=10, only 10 is a multiple of 5
        assert_eq!(aging_steps(2, 8, 12, 5), 1);
        assert_eq!(aging_steps(4, 0, 4, 1), 0);
    }
}
