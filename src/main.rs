use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, bail};
use clap::Parser;
use rand::prelude::*;
use sched_model::{
    Job, PolicyKind, RunReport, SimConfig,
    core::{SimCtx, SimEvent},
    simulate_with,
};

/// Replay a process workload under a CPU scheduling policy
#[derive(Parser, Debug)]
#[command(name = "sched_model", about, long_about = None)]
struct Args {
    /// Policy token: fcfs, sjf, srtf, rr, priority, priority-preemptive, mlq, mfq, cfs, edf
    #[arg(short, long, default_value = "fcfs")]
    scheduler: String,

    /// Round robin quantum; also the base of the mlq/mfq slice tables
    #[arg(short, long, default_value_t = 4)]
    quantum: u64,

    /// Waiting units per priority step for `priority`
    #[arg(long, default_value_t = 5)]
    aging: u64,

    /// Boost mfq processes one level after this many units without running
    #[arg(long)]
    mfq_boost: Option<u64>,

    /// Start cfs arrivals at the queue's minimum virtual runtime
    #[arg(long, default_value_t = false)]
    cfs_floor: bool,

    /// Workload file, one `id arrival burst priority [deadline]` per line
    #[arg(short, long, conflicts_with = "random")]
    input: Option<PathBuf>,

    /// Generate this many random processes instead of reading a workload
    #[arg(short, long)]
    random: Option<usize>,

    /// Seed for --random
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Run every policy over the workload and print a comparison
    #[arg(long, default_value_t = false)]
    compare: bool,

    /// Print every driver event
    #[arg(long, default_value_t = false)]
    events: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    // Reject bad tokens before building anything
    let policy: PolicyKind = args.scheduler.parse()?;
    let mut config = SimConfig::new(policy)
        .with_quantum(args.quantum)
        .with_aging_interval(args.aging);
    if let Some(boost) = args.mfq_boost {
        config = config.with_mfq_boost_after(boost);
    }
    if args.cfs_floor {
        config = config.with_cfs_newcomer_floor();
    }
    config.validate()?;

    let jobs = if let Some(n) = args.random {
        random_jobs(n, args.seed)
    } else if let Some(path) = &args.input {
        load_jobs(path)?
    } else {
        default_jobs()
    };

    if args.compare {
        let reports = PolicyKind::ALL
            .into_iter()
            .map(|policy| {
                let config = SimConfig {
                    policy,
                    ..config.clone()
                };
                simulate_with(&jobs, &config, |_, _| {})
            })
            .collect::<Result<Vec<_>, _>>()?;
        print_comparison(&reports);
        return Ok(());
    }

    println!("Running {policy} scheduler...");
    let report = simulate_with(&jobs, &config, |ctx, event| {
        if args.events {
            print_event(ctx, event);
        }
    })?;
    println!("{report}");
    Ok(())
}

fn print_event(ctx: &SimCtx, event: &SimEvent) {
    let t = ctx.now;
    match *event {
        SimEvent::Arrival { proc } => println!("t={t} arrival {}", ctx.proc(proc).name),
        SimEvent::Dispatch { proc, slice } => {
            println!("t={t} dispatch {} slice={slice}", ctx.proc(proc).name)
        }
        SimEvent::Preempt { proc, remaining } => {
            println!("t={t} preempt {} remaining={remaining}", ctx.proc(proc).name)
        }
        SimEvent::Complete { proc } => println!("t={t} complete {}", ctx.proc(proc).name),
        SimEvent::CpuIdle { until } => println!("t={t} idle until {until}"),
    }
}

fn print_comparison(reports: &[RunReport]) {
    println!(
        "{:<20} {:>8} {:>10} {:>8} {:>10} {:>7}",
        "policy", "avg wait", "avg turn", "cpu %", "thruput", "missed"
    );
    for report in reports {
        let m = &report.metrics;
        let missed = report
            .missed_deadlines
            .map_or_else(|| "-".to_owned(), |n| n.to_string());
        println!(
            "{:<20} {:>8.2} {:>10.2} {:>8.2} {:>10.3} {:>7}",
            report.policy.to_string(),
            m.avg_waiting_time,
            m.avg_turnaround_time,
            m.cpu_utilization,
            m.throughput,
            missed
        );
    }
}

fn default_jobs() -> Vec<Job> {
    vec![
        Job::new("P1", 0, 8, 2),
        Job::new("P2", 1, 4, 1),
        Job::new("P3", 2, 9, 3),
        Job::new("P4", 3, 5, 4),
    ]
}

fn load_jobs(path: &Path) -> anyhow::Result<Vec<Job>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Error opening file: {}", path.display()))?;

    let mut jobs = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let job = parse_job(line)
            .with_context(|| format!("{}:{}: bad process line", path.display(), lineno + 1))?;
        jobs.push(job);
    }
    Ok(jobs)
}

fn parse_job(line: &str) -> anyhow::Result<Job> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [id, arrival, burst, priority, rest @ ..] = fields.as_slice() else {
        bail!("expected `id arrival burst priority [deadline]`, got `{line}`");
    };

    let mut job = Job::new(
        *id,
        arrival.parse().context("arrival time")?,
        burst.parse().context("burst time")?,
        priority.parse().context("priority")?,
    );
    match rest {
        [] => {}
        [deadline] => job = job.with_deadline(deadline.parse().context("deadline")?),
        _ => bail!("trailing fields after deadline in `{line}`"),
    }
    Ok(job)
}

fn random_jobs(num: usize, seed: u64) -> Vec<Job> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut jobs: Vec<Job> = (0..num)
        .map(|i| {
            Job::new(
                format!("P{}", i + 1),
                rng.random_range(0..20),
                rng.random_range(1..=10),
                rng.random_range(1..=5),
            )
        })
        .collect();

    jobs.sort_by_key(|job| job.arrival_time);
    jobs
}
