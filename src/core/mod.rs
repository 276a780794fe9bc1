pub mod driver;
pub mod event;
pub mod metrics;
pub mod observer;
pub mod state;
pub mod trace;

pub use driver::SchedCore;
pub use event::SimEvent;
pub use metrics::Metrics;
pub use state::{Dsq, DsqId, ProcId, ProcState, Process, SimCtx, SortKey, Ticks};
pub use trace::{Segment, TraceRecorder};
