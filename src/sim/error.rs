use std::fmt;

use super::config::PolicyKind;

/// Everything that can stop a run from starting. Runs themselves cannot fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    UnknownPolicy(String),
    InvalidQuantum(u64),
    InvalidAgingInterval(u64),
    InvalidBoostInterval(u64),
    EmptyWorkload,
    ZeroBurst { id: String },
    DuplicateId { id: String },
    UnsortedWorkload { id: String },
    /// The workload cannot finish before `Ticks::MAX`.
    HorizonOverflow { id: String },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPolicy(token) => {
                write!(f, "unknown scheduler `{token}` (available: ")?;
                for (i, kind) in PolicyKind::ALL.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{kind}")?;
                }
                f.write_str(")")
            }
            Self::InvalidQuantum(q) => write!(f, "quantum must be positive, got {q}"),
            Self::InvalidAgingInterval(n) => {
                write!(f, "aging interval must be positive, got {n}")
            }
            Self::InvalidBoostInterval(n) => {
                write!(f, "mfq boost interval must be positive, got {n}")
            }
            Self::EmptyWorkload => f.write_str("workload has no processes"),
            Self::ZeroBurst { id } => write!(f, "process {id} has a zero burst time"),
            Self::DuplicateId { id } => write!(f, "process id {id} appears more than once"),
            Self::UnsortedWorkload { id } => {
                write!(f, "process {id} arrives earlier than the process before it")
            }
            Self::HorizonOverflow { id } => {
                write!(f, "process {id} would finish past the largest representable time")
            }
        }
    }
}

impl std::error::Error for SimError {}
