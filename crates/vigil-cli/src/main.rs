use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use vigil_core::{
    replay, run_via_monitor, state_hash, Automaton, MonitorConfig, MonitorError, MonitorInstance,
    Policy, ReplayLog, Snapshot,
};

#[derive(Parser)]
#[command(name = "vigil", about = "Tick-driven runtime enforcement monitor demos")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// One-tick boolean delay policy with actuator enforcement.
    Latch {
        #[arg(long, default_value_t = 40)]
        ticks: u64,
        /// Drive the input with a seeded random stream instead of the
        /// built-in schedule.
        #[arg(long)]
        random: bool,
        #[arg(long, default_value_t = 7)]
        seed: u64,
        /// Inject a wrong actuator value at this tick to show enforcement.
        #[arg(long)]
        fault_tick: Option<u64>,
    },
    /// Two-phase cooling-window policy over a temperature stream.
    Pizza {
        #[arg(long, default_value_t = 100)]
        ticks: u64,
        /// TOML file overriding the default thresholds.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print the default configuration as TOML and exit.
        #[arg(long)]
        dump_config: bool,
    },
    /// Bounded-response policy: every request answered within the deadline.
    Response {
        #[arg(long, default_value_t = 40)]
        ticks: u64,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Latch {
            ticks,
            random,
            seed,
            fault_tick,
        } => run_latch(ticks, random, seed, fault_tick),
        Command::Pizza {
            ticks,
            config,
            dump_config,
        } => run_pizza(ticks, config.as_deref(), dump_config),
        Command::Response { ticks } => run_response(ticks),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_state_hash(instance: &MonitorInstance) {
    println!(
        "final state hash ({}): {}",
        instance.policy_name(),
        hex::encode(state_hash(instance))
    );
}

fn run_latch(ticks: u64, random: bool, seed: u64, fault_tick: Option<u64>) -> Result<(), MonitorError> {
    let policy = Policy::latch();
    let mut instance = MonitorInstance::init(&policy)?;
    let mut snapshot = Snapshot::logic();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut prev = false;

    info!("latch: {ticks} ticks, random={random}");
    for tick in 1..=ticks {
        let a = if random {
            rng.gen_bool(0.5)
        } else {
            matches!(tick, 3 | 7 | 11 | 12)
        };
        if let Snapshot::Logic { a: input, .. } = &mut snapshot {
            *input = a;
        }
        let faulty = fault_tick == Some(tick);
        let verdict = run_via_monitor(
            |s| {
                if let Snapshot::Logic { a, b } = s {
                    *b = if faulty { !prev } else { prev };
                    prev = *a;
                }
            },
            &mut instance,
            &mut snapshot,
        )?;
        if let Snapshot::Logic { a, b } = snapshot {
            println!(
                "Tick {tick:>4}: A:{}, B:{}, STATUS:{verdict}",
                u8::from(a),
                u8::from(b)
            );
        }
    }
    print_state_hash(&instance);
    Ok(())
}

/// Temperature schedule of the cooling demo: heat the pizza, pull it out,
/// let it cool into the safe window, then wait until it expires.
fn demo_temp(tick: u64) -> i64 {
    match tick {
        1 => 0,
        2..=4 => 5,
        5..=14 => 10,
        15..=19 => 30,
        20..=24 => 60,
        25..=29 => 180,
        30..=34 => 140,
        _ => 40,
    }
}

fn run_pizza(ticks: u64, config: Option<&std::path::Path>, dump_config: bool) -> Result<(), MonitorError> {
    if dump_config {
        print!("{}", MonitorConfig::template());
        return Ok(());
    }
    let cfg = MonitorConfig::load(config)?;
    let policy = Policy::cooling(cfg.cooling)?;
    let mut instance = MonitorInstance::init(&policy)?;
    let mut log = ReplayLog::new();

    info!("pizza: {ticks} ticks, params {:?}", cfg.cooling);
    for tick in 1..=ticks {
        let mut snapshot = Snapshot::Thermal { t: demo_temp(tick) };
        let verdict = run_via_monitor(|_| {}, &mut instance, &mut snapshot)?;
        log.record(tick as i64 * 1_000, snapshot, verdict);
        if let (Snapshot::Thermal { t }, Automaton::Cooling(m)) = (snapshot, instance.automaton()) {
            println!(
                "Tick {tick:>4}: temp:{t:>5} C, STATE: ({:>2}, {:>4}, {:>4}), STATUS (Can Eat?): {verdict}",
                m.phase().code(),
                m.since_hot(),
                m.window_age()
            );
        }
    }

    let replayed = replay(&policy, log.snapshots())?;
    let matches = replayed
        .iter()
        .zip(log.records.iter())
        .all(|(v, r)| *v == r.verdict);
    println!(
        "replay check: {} ticks, verdicts {}",
        log.len(),
        if matches { "match" } else { "DIVERGE" }
    );
    print_state_hash(&instance);
    Ok(())
}

fn run_response(ticks: u64) -> Result<(), MonitorError> {
    let policy = Policy::bounded_response(5)?;
    let mut instance = MonitorInstance::init(&policy)?;

    info!("response: {ticks} ticks");
    for tick in 1..=ticks {
        // one answered request, then one that misses its deadline
        let a = matches!(tick, 3 | 11);
        let b = tick == 5;
        let mut snapshot = Snapshot::Logic { a, b };
        let verdict = run_via_monitor(|_| {}, &mut instance, &mut snapshot)?;
        println!(
            "Tick {tick:>4}: A:{}, B:{}, STATUS:{verdict}",
            u8::from(a),
            u8::from(b)
        );
    }
    print_state_hash(&instance);
    Ok(())
}
