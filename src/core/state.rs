use keyed_priority_queue::KeyedPriorityQueue;
use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};
use std::collections::VecDeque;

use crate::sim::Job;

// Index into Process Vec
pub type ProcId = usize;
pub type Ticks = u64;
new_key_type! {
    pub struct DsqId;
}

/// Ordering key for priority DSQs: smallest `primary` first, then smallest `rank`.
#[derive(PartialEq, Eq, Hash, Debug, Copy, Clone)]
pub struct SortKey {
    pub primary: i64,
    pub rank: usize,
}

impl SortKey {
    pub fn new(primary: i64, rank: usize) -> Self {
        Self { primary, rank }
    }
}

// KeyedPriorityQueue is a max-heap, so we need to flip-flop SortKey's Ord
impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .primary
            .cmp(&self.primary)
            .then_with(|| other.rank.cmp(&self.rank))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcState {
    /// Not yet arrived.
    Pending,
    Ready,
    Running,
    Completed,
}

#[derive(Debug)]
pub struct Process {
    pub id: ProcId,
    pub name: String,
    pub arrival_time: Ticks,
    pub burst_time: Ticks,
    /// Priority as given by the workload; never aged.
    pub priority: i32,
    pub deadline: Ticks,
    /// Position in (arrival_time, name) order, used to break ties.
    pub rank: usize,
    pub state: ProcState,
    pub remaining_time: Ticks,
    pub waiting_time: Ticks,
    pub turnaround_time: Ticks,
    pub last_executed_time: Ticks,
    pub completion_time: Option<Ticks>,

    // Policy-owned scheduling state
    pub effective_priority: i32,
    pub vruntime: u64,
    pub weight: u64,
    pub level: usize,
}

impl Process {
    fn from_job(id: ProcId, job: &Job) -> Self {
        Self {
            id,
            name: job.id.clone(),
            arrival_time: job.arrival_time,
            burst_time: job.burst_time,
            priority: job.priority,
            deadline: job.effective_deadline(),
            rank: 0,
            state: ProcState::Pending,
            remaining_time: job.burst_time,
            waiting_time: 0,
            turnaround_time: 0,
            last_executed_time: job.arrival_time,
            completion_time: None,
            effective_priority: job.priority,
            vruntime: 0,
            weight: 0,
            level: 0,
        }
    }

    pub fn has_started(&self) -> bool {
        self.remaining_time < self.burst_time
    }
}

#[derive(Debug)]
pub enum Dsq {
    Fifo {
        procs: VecDeque<ProcId>,
    },
    Priq {
        procs: KeyedPriorityQueue<ProcId, SortKey>,
    },
}

impl Dsq {
    pub fn new_fifo() -> Self {
        Self::Fifo {
            procs: VecDeque::new(),
        }
    }

    pub fn new_priq() -> Self {
        Self::Priq {
            procs: KeyedPriorityQueue::new(),
        }
    }

    pub fn contains(&self, proc_id: ProcId) -> bool {
        match self {
            Self::Fifo { procs } => procs.contains(&proc_id),
            Self::Priq { procs } => procs.get_priority(&proc_id).is_some(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Fifo { procs } => procs.len(),
            Self::Priq { procs } => procs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Run-state for one simulation: the process arena, the ready queues and the clock.
#[derive(Debug)]
pub struct SimCtx {
    pub now: Ticks,
    pub idle_time: Ticks,
    pub running: Option<ProcId>,
    pub procs: Vec<Process>,
    pub dsqs: SlotMap<DsqId, Dsq>,
    pub proc_to_dsq: FxHashMap<ProcId, DsqId>,

    // Procs are arrival-sorted, so everything before the cursor has arrived
    arrival_cursor: usize,
}

impl SimCtx {
    /// Build the arena from arrival-sorted, validated jobs.
    pub fn new(jobs: &[Job]) -> Self {
        let mut procs: Vec<Process> = jobs
            .iter()
            .enumerate()
            .map(|(id, job)| Process::from_job(id, job))
            .collect();

        let mut order: Vec<ProcId> = (0..procs.len()).collect();
        order.sort_by(|&a, &b| {
            procs[a]
                .arrival_time
                .cmp(&procs[b].arrival_time)
                .then_with(|| procs[a].name.cmp(&procs[b].name))
        });
        for (rank, id) in order.into_iter().enumerate() {
            procs[id].rank = rank;
        }

        Self {
            now: 0,
            idle_time: 0,
            running: None,
            procs,
            dsqs: SlotMap::with_key(),
            proc_to_dsq: FxHashMap::default(),
            arrival_cursor: 0,
        }
    }

    pub fn advance_time(&mut self, delta: Ticks) {
        self.now = self.now.saturating_add(delta);
    }

    /// Jump the clock forward over a span with nothing to run.
    pub fn idle_until(&mut self, until: Ticks) {
        debug_assert!(until > self.now, "Idle span must move time forward");
        self.idle_time += until - self.now;
        self.now = until;
    }

    /// Mark every process with `arrival_time <= now` as ready and return them
    /// in tie-break order.
    pub fn take_arrivals(&mut self) -> Vec<ProcId> {
        let start = self.arrival_cursor;
        while self.arrival_cursor < self.procs.len()
            && self.procs[self.arrival_cursor].arrival_time <= self.now
        {
            self.procs[self.arrival_cursor].state = ProcState::Ready;
            self.arrival_cursor += 1;
        }

        let mut arrived: Vec<ProcId> = (start..self.arrival_cursor).collect();
        arrived.sort_by_key(|&id| self.procs[id].rank);
        arrived
    }

    pub fn next_arrival_time(&self) -> Option<Ticks> {
        self.procs
            .get(self.arrival_cursor)
            .map(|proc| proc.arrival_time)
    }

    pub fn all_completed(&self) -> bool {
        self.procs
            .iter()
            .all(|proc| proc.state == ProcState::Completed)
    }

    pub fn create_dsq_fifo(&mut self) -> DsqId {
        self.dsqs.insert(Dsq::new_fifo())
    }

    pub fn create_dsq_priq(&mut self) -> DsqId {
        self.dsqs.insert(Dsq::new_priq())
    }

    fn dsq_push(&mut self, dsq_id: DsqId, proc_id: ProcId, key: Option<SortKey>) {
        assert!(
            !self.proc_to_dsq.contains_key(&proc_id),
            "Process {proc_id} already present in some DSQ"
        );
        debug_assert_eq!(
            self.proc(proc_id).state,
            ProcState::Ready,
            "Process {proc_id} must be Ready when enqueued"
        );

        let dsq = self.dsqs.get_mut(dsq_id).expect("Unknown DSQ");
        match dsq {
            Dsq::Fifo { procs } => procs.push_back(proc_id),
            Dsq::Priq { procs } => {
                procs.push(
                    proc_id,
                    key.expect("Attempted to push to a priority DSQ with no key"),
                );
            }
        };

        self.proc_to_dsq.insert(proc_id, dsq_id);
    }

    pub fn dsq_push_fifo(&mut self, dsq_id: DsqId, proc_id: ProcId) {
        self.dsq_push(dsq_id, proc_id, None);
    }

    pub fn dsq_push_priq(&mut self, dsq_id: DsqId, proc_id: ProcId, key: SortKey) {
        self.dsq_push(dsq_id, proc_id, Some(key));
    }

    pub fn dsq_pop(&mut self, dsq_id: DsqId) -> Option<ProcId> {
        let dsq = self.dsqs.get_mut(dsq_id)?;
        let proc_id = match dsq {
            Dsq::Fifo { procs } => procs.pop_front(),
            Dsq::Priq { procs } => procs.pop().map(|p| p.0),
        }?;

        let removed = self.proc_to_dsq.remove(&proc_id);
        debug_assert!(removed.is_some(), "Process {proc_id} missing DSQ membership");

        Some(proc_id)
    }

    /// Re-key a process already queued on a priority DSQ. Returns false if it is not there.
    pub fn dsq_set_key(&mut self, dsq_id: DsqId, proc_id: ProcId, key: SortKey) -> bool {
        match self.dsqs.get_mut(dsq_id) {
            Some(Dsq::Priq { procs }) => procs.set_priority(&proc_id, key).is_ok(),
            _ => false,
        }
    }

    /// The process `dsq_pop` would return next, left in place.
    pub fn dsq_peek(&self, dsq_id: DsqId) -> Option<ProcId> {
        match self.dsqs.get(dsq_id)? {
            Dsq::Fifo { procs } => procs.front().copied(),
            Dsq::Priq { procs } => procs.peek().map(|(id, _)| *id),
        }
    }

    /// Snapshot of a DSQ's members. FIFO order is preserved; priority DSQs are unordered.
    pub fn dsq_members(&self, dsq_id: DsqId) -> Vec<ProcId> {
        match self.dsqs.get(dsq_id) {
            Some(Dsq::Fifo { procs }) => procs.iter().copied().collect(),
            Some(Dsq::Priq { procs }) => procs.iter().map(|(id, _)| *id).collect(),
            None => Vec::new(),
        }
    }

    pub fn dsq_is_empty(&self, dsq_id: DsqId) -> bool {
        self.dsqs.get(dsq_id).is_none_or(Dsq::is_empty)
    }

    pub fn proc(&self, proc_id: ProcId) -> &Process {
        &self.procs[proc_id]
    }

    pub fn proc_mut(&mut self, proc_id: ProcId) -> &mut Process {
        &mut self.procs[proc_id]
    }

    /// Tie-breaking key for `proc_id` with the given primary value.
    pub fn sort_key(&self, proc_id: ProcId, primary: i64) -> SortKey {
        SortKey::new(primary, self.proc(proc_id).rank)
    }

    /// Put a ready process on the CPU, charging the time it spent waiting since
    /// it arrived or last ran.
    pub fn set_running(&mut self, proc_id: ProcId) {
        debug_assert!(
            !self.proc_to_dsq.contains_key(&proc_id),
            "Running process {proc_id} must not be enqueued"
        );
        debug_assert!(self.running.is_none(), "CPU already running a process");

        let now = self.now;
        let proc = self.proc_mut(proc_id);
        debug_assert_eq!(proc.state, ProcState::Ready);

        let since = if proc.has_started() {
            proc.last_executed_time
        } else {
            proc.arrival_time
        };
        proc.waiting_time += now - since;
        proc.state = ProcState::Running;
        self.running = Some(proc_id);
    }

    /// Charge `ran` units of execution to the running process.
    pub fn consume(&mut self, proc_id: ProcId, ran: Ticks) {
        let now = self.now;
        let proc = self.proc_mut(proc_id);
        debug_assert!(ran <= proc.remaining_time, "Process {proc_id} overran");
        proc.remaining_time -= ran;
        proc.last_executed_time = now;
    }

    pub fn mark_ready(&mut self, proc_id: ProcId) {
        if self.running == Some(proc_id) {
            self.running = None;
        }
        let proc = self.proc_mut(proc_id);
        debug_assert!(
            proc.state != ProcState::Completed,
            "Completed process {} cannot be ready",
            proc.id
        );
        proc.state = ProcState::Ready;
    }

    pub fn mark_completed(&mut self, proc_id: ProcId, completion_time: Ticks) {
        debug_assert!(
            !self.proc_to_dsq.contains_key(&proc_id),
            "Completing process {proc_id} that is still enqueued"
        );
        if self.running == Some(proc_id) {
            self.running = None;
        }

        let proc = &mut self.procs[proc_id];
        debug_assert_eq!(
            proc.remaining_time, 0,
            "Process {proc_id} completed with work left"
        );

        proc.state = ProcState::Completed;
        proc.completion_time = Some(completion_time);
        proc.turnaround_time = completion_time - proc.arrival_time;
        let waiting = proc.turnaround_time - proc.burst_time;
        debug_assert_eq!(
            proc.waiting_time, waiting,
            "Accumulated waiting time of process {proc_id} disagrees with turnaround"
        );
        proc.waiting_time = waiting;
    }
}
