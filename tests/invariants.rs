use rand::prelude::*;
use rustc_hash::FxHashMap;
use sched_model::{Job, PolicyKind, RunReport, SimConfig, simulate};

fn random_workload(seed: u64) -> Vec<Job> {
    let mut rng = StdRng::seed_from_u64(seed);
    let count = rng.random_range(1..=12);
    let mut jobs: Vec<Job> = (0..count)
        .map(|i| {
            let job = Job::new(
                format!("J{i}"),
                rng.random_range(0..30),
                rng.random_range(1..=10),
                rng.random_range(0..=6),
            );
            if rng.random_bool(0.3) {
                let slack = rng.random_range(0..15);
                let deadline = job.arrival_time + job.burst_time + slack;
                job.with_deadline(deadline)
            } else {
                job
            }
        })
        .collect();
    jobs.sort_by_key(|job| job.arrival_time);
    jobs
}

fn configs() -> Vec<SimConfig> {
    let mut configs = Vec::new();
    for policy in PolicyKind::ALL {
        for quantum in [1, 3, 4] {
            configs.push(SimConfig::new(policy).with_quantum(quantum));
        }
    }
    configs.push(SimConfig::new(PolicyKind::Priority).with_aging_interval(1));
    configs.push(SimConfig::new(PolicyKind::Mfq).with_mfq_boost_after(3));
    configs.push(SimConfig::new(PolicyKind::Cfs).with_cfs_newcomer_floor());
    configs
}

fn check(jobs: &[Job], config: &SimConfig, report: &RunReport) {
    let label = format!("{} q={}", config.policy, config.quantum);

    let burst_total: u64 = jobs.iter().map(|j| j.burst_time).sum();
    let traced: u64 = report.trace.iter().map(|s| s.duration).sum();
    assert_eq!(traced + report.idle_time, report.total_time, "{label}");
    assert_eq!(traced, burst_total, "{label}");

    let mut per_proc: FxHashMap<&str, u64> = FxHashMap::default();
    for segment in &report.trace {
        *per_proc.entry(segment.proc.as_str()).or_default() += segment.duration;
    }

    for (job, outcome) in jobs.iter().zip(&report.jobs) {
        assert_eq!(job.id, outcome.id, "{label}");
        assert_eq!(
            outcome.turnaround_time,
            outcome.waiting_time + outcome.burst_time,
            "{label}: {}",
            job.id
        );
        assert_eq!(
            outcome.completion_time,
            job.arrival_time + outcome.turnaround_time,
            "{label}: {}",
            job.id
        );
        assert_eq!(per_proc.get(job.id.as_str()), Some(&job.burst_time), "{label}");
        assert_eq!(outcome.deadline, job.effective_deadline(), "{label}");
        assert_eq!(outcome.priority, job.priority, "{label}");
    }

    let arrival: FxHashMap<&str, u64> = jobs
        .iter()
        .map(|j| (j.id.as_str(), j.arrival_time))
        .collect();
    for segment in &report.trace {
        assert!(
            segment.start >= arrival[segment.proc.as_str()],
            "{label}: {} dispatched before arrival",
            segment.proc
        );
    }

    for pair in report.trace.windows(2) {
        assert!(pair[0].end() <= pair[1].start, "{label}: overlapping segments");
        if pair[0].proc == pair[1].proc {
            assert!(
                pair[0].end() < pair[1].start,
                "{label}: contiguous runs of {} not coalesced",
                pair[0].proc
            );
        }
    }

    if let Some(last) = report.trace.last() {
        assert_eq!(last.end(), report.total_time, "{label}");
    }
}

#[test]
fn every_policy_conserves_time_and_work() {
    for seed in 0..40 {
        let jobs = random_workload(seed);
        for config in configs() {
            let report = simulate(&jobs, &config).unwrap();
            check(&jobs, &config, &report);
        }
    }
}

#[test]
fn non_preemptive_policies_run_each_process_once() {
    for seed in 0..20 {
        let jobs = random_workload(seed);
        for policy in [PolicyKind::Fcfs, PolicyKind::Sjf, PolicyKind::Priority] {
            let report = simulate(&jobs, &SimConfig::new(policy)).unwrap();
            assert_eq!(report.trace.len(), jobs.len(), "{policy} seed {seed}");
        }
    }
}

#[test]
fn runs_are_deterministic() {
    for seed in 0..10 {
        let jobs = random_workload(seed);
        for config in configs() {
            let first = simulate(&jobs, &config).unwrap();
            let second = simulate(&jobs, &config).unwrap();
            assert_eq!(first, second, "{} seed {seed}", config.policy);
        }
    }
}

#[test]
fn only_edf_reports_missed_deadlines() {
    for seed in 0..20 {
        let jobs = random_workload(seed);
        for policy in PolicyKind::ALL {
            let report = simulate(&jobs, &SimConfig::new(policy)).unwrap();
            if policy == PolicyKind::Edf {
                let late = report
                    .jobs
                    .iter()
                    .filter(|j| j.completion_time > j.deadline)
                    .count();
                assert_eq!(report.missed_deadlines, Some(late), "seed {seed}");
            } else {
                assert_eq!(report.missed_deadlines, None, "{policy}");
            }
        }
    }
}
