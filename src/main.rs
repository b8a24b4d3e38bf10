//! Command-line runner.
//!
//! ```text
//! u-simsched [INPUT] [--config PATH] [--seed N] [--print-queue] [--json] [-v]
//! ```
//!
//! `INPUT` defaults to `tasks.txt`.

use std::process::ExitCode;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, Level};

use u_simsched::config::SimulationConfig;
use u_simsched::loader;
use u_simsched::queue::TaskQueue;
use u_simsched::simulation::{SimulationKpi, SimulationReport, Simulator};
use u_simsched::validation;
use u_simsched::{SchedError, SchedResult};

const DEFAULT_INPUT: &str = "tasks.txt";

const USAGE: &str =
    "usage: u-simsched [INPUT] [--config PATH] [--seed N] [--print-queue] [--json] [-v]";

#[derive(Debug, Default)]
struct Args {
    input: Option<String>,
    config: Option<String>,
    seed: Option<u64>,
    print_queue: bool,
    json: bool,
    verbose: bool,
    help: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> SchedResult<Args> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                parsed.config = Some(
                    args.next()
                        .ok_or_else(|| SchedError::invalid("--config needs a path"))?,
                );
            }
            "--seed" => {
                let value = args
                    .next()
                    .ok_or_else(|| SchedError::invalid("--seed needs a value"))?;
                parsed.seed = Some(
                    value
                        .parse()
                        .map_err(|_| SchedError::invalid(format!("bad seed '{value}'")))?,
                );
            }
            "--print-queue" => parsed.print_queue = true,
            "--json" => parsed.json = true,
            "-v" | "--verbose" => parsed.verbose = true,
            "-h" | "--help" => parsed.help = true,
            flag if flag.starts_with('-') => {
                return Err(SchedError::invalid(format!("unknown option '{flag}'")));
            }
            _ if parsed.input.is_none() => parsed.input = Some(arg.clone()),
            _ => return Err(SchedError::invalid(format!("unexpected argument '{arg}'"))),
        }
    }
    Ok(parsed)
}

fn print_queue(queue: &TaskQueue) {
    println!("Printing a task queue with {} tasks!", queue.size());
    for level in queue.levels() {
        let line: Vec<String> = level.iter().map(ToString::to_string).collect();
        println!("{}", line.join(" "));
    }
}

/// Text trace of a run. The closing line is only printed once the pool drains.
fn trace_lines(report: &SimulationReport, completed: bool) -> Vec<String> {
    let mut lines: Vec<String> = report.events.iter().map(ToString::to_string).collect();
    if completed {
        lines.push(format!(
            "Task pool is now empty! Process took {} time units",
            report.total_time
        ));
    }
    lines
}

fn run(args: Args) -> SchedResult<()> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }

    let input = args.input.as_deref().unwrap_or(DEFAULT_INPUT);
    let tasks = loader::load_file(input)?;

    validation::validate_input(&tasks, &config).map_err(|errors| {
        let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
        SchedError::Config(messages.join("; "))
    })?;

    let mut queue = TaskQueue::from_tasks(tasks, config.capacity)?;
    if args.print_queue {
        print_queue(&queue);
    }

    let seed = config.seed.unwrap_or_else(rand::random);
    info!(seed, input, "seeded random source");

    let mut simulator = Simulator::new(&config, StdRng::seed_from_u64(seed))?;
    if !args.json {
        println!("Started running!");
    }
    let outcome = simulator.run(&mut queue);

    if args.json {
        let report = outcome?;
        let output = serde_json::json!({
            "seed": seed,
            "kpi": SimulationKpi::calculate(&report),
            "report": report,
        });
        let text = serde_json::to_string_pretty(&output)
            .map_err(|e| SchedError::Invariant(format!("report serialization failed: {e}")))?;
        println!("{text}");
    } else {
        // An aborted run still shows what happened before the failure
        for line in trace_lines(simulator.report(), outcome.is_ok()) {
            println!("{line}");
        }
        outcome?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };
    if args.help {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("FAILED: {e}");
            ExitCode::FAILURE
        }
    }
}
