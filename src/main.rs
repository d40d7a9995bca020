use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use sched_model::{
    Criterion, SimConfig,
    sim::{GanttChart, STANDARD_SUITE, Variant, WorkloadGen, run_suite},
};

#[derive(Parser, Debug)]
#[command(name = "sched-model")]
#[command(about = "Compare CPU scheduling algorithms over a synthetic workload", long_about = None)]
struct Args {
    /// JSON config file; flags below are ignored when given
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of processes to generate
    #[arg(short = 'n', long, default_value_t = 10)]
    processes: usize,

    /// Maximum CPU burst per process
    #[arg(long, default_value_t = 20)]
    burst_scale: u64,

    /// Maximum I/O burst per process
    #[arg(long, default_value_t = 2)]
    io_scale: u64,

    /// Arrival spread; process i arrives within [0, i * arrival_scale]
    #[arg(long, default_value_t = 5)]
    arrival_scale: u64,

    /// Idle ticks charged when the CPU switches between processes
    #[arg(long, default_value_t = 0)]
    context_switch_cost: u64,

    /// Round-robin time slice
    #[arg(short, long, default_value_t = 10)]
    quantum: u64,

    /// fcfs, sjf, priority, aging, rr, dynamic
    #[arg(long, default_value = "fcfs")]
    criterion: Criterion,

    #[arg(short, long)]
    preemptive: bool,

    /// Seed for workload generation and priority perturbation
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Run the full comparison suite instead of a single criterion
    #[arg(short, long)]
    all: bool,

    /// Print a Gantt chart per run
    #[arg(long)]
    chart: bool,

    /// Write the reports as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Args {
    fn sim_config(&self) -> SimConfig {
        SimConfig {
            process_count: self.processes,
            burst_scale: self.burst_scale,
            io_scale: self.io_scale,
            arrival_scale: self.arrival_scale,
            context_switch_cost: self.context_switch_cost,
            round_robin_quantum: self.quantum,
            preemptive: self.preemptive,
            criterion: self.criterion,
            seed: self.seed,
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => {
            let config = args.sim_config();
            config.validate()?;
            config
        }
    };
    info!(?config, "configuration loaded");

    let processes = WorkloadGen::new(config.seed).generate(&config)?;
    println!("Initial processes:");
    for p in &processes {
        println!(
            "  [#{:03}: CPU burst {:03}, I/O burst {:03}, arrival {:03}, priority {:03}]",
            p.id, p.burst, p.io_burst, p.arrival_time, p.given_priority
        );
    }

    let variants: Vec<Variant> = if args.all {
        STANDARD_SUITE.to_vec()
    } else {
        vec![Variant::single(config.criterion, config.preemptive)]
    };

    let runs = run_suite(&processes, &config, &variants)?;
    for run in &runs {
        println!("\n{}", "-".repeat(80));
        if args.chart {
            println!("Gantt chart for {}:\n{}", run.report.label, GanttChart(&run.outcome.timeline));
        }
        println!("{}", run.report);
    }
    println!("\nRound robin quantum = {}", config.round_robin_quantum);

    if let Some(path) = &args.output {
        let writer = BufWriter::new(File::create(path)?);
        let reports: Vec<_> = runs.iter().map(|run| &run.report).collect();
        serde_json::to_writer_pretty(writer, &reports)?;
        info!(path = %path.display(), "reports written");
    }

    Ok(())
}
