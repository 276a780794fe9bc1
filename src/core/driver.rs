use super::{
    event::SimEvent,
    observer::Observer,
    state::{ProcId, SimCtx},
    trace::TraceRecorder,
};
use crate::{
    scheduler::{ENQ_ARRIVAL, ENQ_PREEMPT, Scheduler},
    sim::{Job, SimConfig},
};

/// Single-CPU dispatch loop: owns time, the process arena and the trace, and
/// asks the policy `S` what to run at each decision point.
pub struct SchedCore<S: Scheduler> {
    pub ctx: SimCtx,
    pub scheduler: S,
    trace: TraceRecorder,
    observer: Observer,
}

impl<S: Scheduler> SchedCore<S> {
    /// `jobs` must already be validated and arrival-sorted.
    pub fn new(jobs: &[Job], config: &SimConfig) -> Self {
        let mut ctx = SimCtx::new(jobs);
        let scheduler = S::init(&mut ctx, config);
        Self {
            ctx,
            scheduler,
            trace: TraceRecorder::new(),
            observer: Observer::new(),
        }
    }

    /// Advance to the next decision point: run one dispatch, or idle until the
    /// next arrival.
    ///
    /// # Panics
    ///
    /// Panics if processes remain unfinished while the policy has nothing to
    /// dispatch and nothing else will arrive.
    pub fn step(&mut self) -> Vec<SimEvent> {
        let mut events = Vec::new();
        if self.ctx.all_completed() {
            return events;
        }

        self.handle_arrivals(&mut events);

        let Some(decision) = self.scheduler.dispatch(&mut self.ctx) else {
            let until = self
                .ctx
                .next_arrival_time()
                .expect("Scheduler left ready processes undispatched with no arrivals pending");
            log::debug!("t={} cpu idle until {until}", self.ctx.now);
            self.ctx.idle_until(until);
            self.trace.close();
            events.push(SimEvent::CpuIdle { until });
            self.observer.observe(&self.ctx);
            return events;
        };

        let proc = decision.proc;
        let slice = decision.slice.min(self.ctx.proc(proc).remaining_time);
        debug_assert!(slice > 0, "Scheduler dispatched a zero-length slice");

        let start = self.ctx.now;
        self.ctx.set_running(proc);
        log::debug!(
            "t={start} dispatch {} for {slice}",
            self.ctx.proc(proc).name
        );
        events.push(SimEvent::Dispatch { proc, slice });

        self.ctx.advance_time(slice);
        self.ctx.consume(proc, slice);
        self.trace.extend(&self.ctx.proc(proc).name, start, slice);

        // Arrivals during the slice queue up ahead of the preempted process
        self.handle_arrivals(&mut events);
        let end = self.ctx.now;
        self.scheduler.elapsed(&mut self.ctx, proc, start, end);

        if self.ctx.proc(proc).remaining_time == 0 {
            self.complete(proc, &mut events);
        } else {
            self.preempt(proc, &mut events);
        }

        self.observer.observe(&self.ctx);
        events
    }

    fn handle_arrivals(&mut self, events: &mut Vec<SimEvent>) {
        for proc in self.ctx.take_arrivals() {
            log::debug!("t={} arrival {}", self.ctx.now, self.ctx.proc(proc).name);
            self.scheduler.enqueue(&mut self.ctx, proc, ENQ_ARRIVAL);
            events.push(SimEvent::Arrival { proc });
        }
    }

    fn complete(&mut self, proc: ProcId, events: &mut Vec<SimEvent>) {
        let now = self.ctx.now;
        self.ctx.mark_completed(proc, now);
        self.scheduler.stopping(&mut self.ctx, proc, false);
        log::debug!("t={now} complete {}", self.ctx.proc(proc).name);
        events.push(SimEvent::Complete { proc });
    }

    fn preempt(&mut self, proc: ProcId, events: &mut Vec<SimEvent>) {
        self.ctx.mark_ready(proc);
        self.scheduler.stopping(&mut self.ctx, proc, true);
        self.scheduler.enqueue(&mut self.ctx, proc, ENQ_PREEMPT);

        let remaining = self.ctx.proc(proc).remaining_time;
        log::trace!(
            "t={} preempt {} ({remaining} left)",
            self.ctx.now,
            self.ctx.proc(proc).name
        );
        events.push(SimEvent::Preempt { proc, remaining });
    }

    pub fn is_done(&self) -> bool {
        self.ctx.all_completed()
    }

    /// Hand back the finished trace, consuming the core.
    pub fn into_parts(self) -> (SimCtx, S, TraceRecorder) {
        (self.ctx, self.scheduler, self.trace)
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }
}
