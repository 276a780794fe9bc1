use crate::core::{ProcId, Ticks};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEvent {
    Arrival {
        proc: ProcId,
    },
    Dispatch {
        proc: ProcId,
        slice: Ticks,
    },
    // Slice ended with work left; the process went back to the policy
    Preempt {
        proc: ProcId,
        remaining: Ticks,
    },
    Complete {
        proc: ProcId,
    },
    // Nothing ready even after dispatch()
    CpuIdle {
        until: Ticks,
    },
}
