pub mod cfs;
pub mod edf;
pub mod fcfs;
pub mod mfq;
pub mod mlq;
pub mod priority;
pub mod rr;
pub mod sjf;
pub mod srtf;

use crate::{
    core::{
        Ticks,
        state::{ProcId, SimCtx},
    },
    sim::{PolicyKind, SimConfig},
};
pub use cfs::CfsScheduler;
pub use edf::EdfScheduler;
pub use fcfs::FcfsScheduler;
pub use mfq::MfqScheduler;
pub use mlq::MlqScheduler;
pub use priority::{PreemptivePriorityScheduler, PriorityScheduler};
pub use rr::RoundRobinScheduler;
pub use sjf::SjfScheduler;
pub use srtf::SrtfScheduler;

pub type EnqueueFlags = u64;

/// The process just arrived.
pub const ENQ_ARRIVAL: EnqueueFlags = 1 << 0;
/// The process used up its slice and still has work left.
pub const ENQ_PREEMPT: EnqueueFlags = 1 << 1;

/// Slice meaning "until the process finishes".
pub const SLICE_FULL_BURST: Ticks = Ticks::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub proc: ProcId,
    /// Upper bound on the run; the core clamps it to the remaining time.
    pub slice: Ticks,
}

impl Dispatch {
    pub fn new(proc: ProcId, slice: Ticks) -> Self {
        Self { proc, slice }
    }
}

/// A scheduling policy driven by [`SchedCore`](crate::core::SchedCore).
///
/// The core owns time and the process arena; a policy only decides which
/// ready process runs next and for how long, keeping its ready processes in
/// DSQs it creates on the [`SimCtx`]. Every ready process must be reachable
/// from `dispatch()`, otherwise the run stalls.
pub trait Scheduler {
    const KIND: PolicyKind;

    fn init(ctx: &mut SimCtx, config: &SimConfig) -> Self;

    /// Accept a ready process, either newly arrived or preempted.
    fn enqueue(&mut self, ctx: &mut SimCtx, proc: ProcId, flags: EnqueueFlags);

    /// Pick the next process. `None` leaves the CPU idle until the next arrival.
    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<Dispatch>;

    /// `running` executed over `(from, to]`; arrivals in that span are already enqueued.
    fn elapsed(&mut self, _ctx: &mut SimCtx, _running: ProcId, _from: Ticks, _to: Ticks) {}

    /// Called when `proc` leaves the CPU, before it is re-enqueued if `runnable`.
    fn stopping(&mut self, _ctx: &mut SimCtx, _proc: ProcId, _runnable: bool) {}

    /// Deadline misses, for policies that track deadlines.
    fn missed_deadlines(&self) -> Option<usize> {
        None
    }
}
