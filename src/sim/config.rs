use std::{fmt, str::FromStr};

use super::error::SimError;
use crate::{core::Ticks, scheduler::mfq::MFQ_LEVELS};

pub const DEFAULT_QUANTUM: Ticks = 4;
pub const DEFAULT_AGING_INTERVAL: Ticks = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    Fcfs,
    Sjf,
    Srtf,
    RoundRobin,
    Priority,
    PriorityPreemptive,
    Mlq,
    Mfq,
    Cfs,
    Edf,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 10] = [
        Self::Fcfs,
        Self::Sjf,
        Self::Srtf,
        Self::RoundRobin,
        Self::Priority,
        Self::PriorityPreemptive,
        Self::Mlq,
        Self::Mfq,
        Self::Cfs,
        Self::Edf,
    ];

    pub fn token(self) -> &'static str {
        match self {
            Self::Fcfs => "fcfs",
            Self::Sjf => "sjf",
            Self::Srtf => "srtf",
            Self::RoundRobin => "rr",
            Self::Priority => "priority",
            Self::PriorityPreemptive => "priority-preemptive",
            Self::Mlq => "mlq",
            Self::Mfq => "mfq",
            Self::Cfs => "cfs",
            Self::Edf => "edf",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for PolicyKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.token() == s)
            .ok_or_else(|| SimError::UnknownPolicy(s.to_owned()))
    }
}

/// Policy selection plus the knobs individual policies read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    pub policy: PolicyKind,
    /// Round robin slice, and the base of the multilevel slice tables.
    pub quantum: Ticks,
    /// Units of waiting per priority step under `priority`.
    pub aging_interval: Ticks,
    /// Move `mfq` processes up a level after this long without running.
    pub mfq_boost_after: Option<Ticks>,
    /// Start `cfs` arrivals at the queue's minimum virtual runtime instead
    /// of zero.
    pub cfs_newcomer_floor: bool,
}

impl SimConfig {
    pub fn new(policy: PolicyKind) -> Self {
        Self {
            policy,
            quantum: DEFAULT_QUANTUM,
            aging_interval: DEFAULT_AGING_INTERVAL,
            mfq_boost_after: None,
            cfs_newcomer_floor: false,
        }
    }

    pub fn with_quantum(mut self, quantum: Ticks) -> Self {
        self.quantum = quantum;
        self
    }

    pub fn with_aging_interval(mut self, aging_interval: Ticks) -> Self {
        self.aging_interval = aging_interval;
        self
    }

    pub fn with_mfq_boost_after(mut self, boost_after: Ticks) -> Self {
        self.mfq_boost_after = Some(boost_after);
        self
    }

    pub fn with_cfs_newcomer_floor(mut self) -> Self {
        self.cfs_newcomer_floor = true;
        self
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.quantum == 0 {
            return Err(SimError::InvalidQuantum(self.quantum));
        }
        if self.aging_interval == 0 {
            return Err(SimError::InvalidAgingInterval(self.aging_interval));
        }
        if self.mfq_boost_after == Some(0) {
            return Err(SimError::InvalidBoostInterval(0));
        }
        Ok(())
    }

    /// Slice used by `mlq` and by level 0 of `mfq`.
    pub fn base_slice(&self) -> Ticks {
        (self.quantum / 2).max(1)
    }

    pub fn mfq_quanta(&self) -> [Ticks; MFQ_LEVELS] {
        [self.base_slice(), self.quantum, self.quantum.saturating_mul(2)]
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new(PolicyKind::Fcfs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_token_parses_back() {
        for kind in PolicyKind::ALL {
            assert_eq!(kind.token().parse::<PolicyKind>(), Ok(kind));
        }
    }

    #[test]
    fn unknown_token_is_rejected() {
        let err = "lottery".parse::<PolicyKind>().unwrap_err();
        assert_eq!(err, SimError::UnknownPolicy("lottery".into()));
        assert!(err.to_string().contains("priority-preemptive"));
    }

    #[test]
    fn zero_parameters_are_rejected() {
        let config = SimConfig::new(PolicyKind::RoundRobin).with_quantum(0);
        assert_eq!(config.validate(), Err(SimError::InvalidQuantum(0)));

        let config = SimConfig::new(PolicyKind::Priority).with_aging_interval(0);
        assert_eq!(config.validate(), Err(SimError::InvalidAgingInterval(0)));

        let config = SimConfig::new(PolicyKind::Mfq).with_mfq_boost_after(0);
        assert_eq!(config.validate(), Err(SimError::InvalidBoostInterval(0)));
    }

    #[test]
    fn level_tables_follow_quantum() {
        let config = SimConfig::new(PolicyKind::Mfq);
        assert_eq!(config.base_slice(), 2);
        assert_eq!(config.mfq_quanta(), [2, 4, 8]);
        assert_eq!(config.clone().with_quantum(1).mfq_quanta(), [1, 1, 2]);
    }

    #[test]
    fn huge_quantum_saturates_top_level() {
        let config = SimConfig::new(PolicyKind::Mfq).with_quantum(Ticks::MAX);
        assert_eq!(
            config.mfq_quanta(),
            [Ticks::MAX / 2, Ticks::MAX, Ticks::MAX]
        );
    }
}
