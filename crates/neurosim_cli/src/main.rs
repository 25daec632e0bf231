use clap::Parser;
use std::io::{self, Write};
use tracing::info;
use tracing_subscriber::EnvFilter;

use neurosim_engine::{ActivationReport, NeuroSimulator, SimulationState, SimulatorConfig};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable autism-specific neural patterns
    #[arg(long)]
    autism: bool,

    /// Enable the PTSD flashback overlay
    #[arg(long)]
    ptsd: bool,

    /// Print the full JSON activation report instead of the response line
    #[arg(long)]
    json: bool,

    /// Seed for deterministic noise sequences
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to run in batch mode
    #[arg(long, default_value_t = 1)]
    ticks: u32,

    /// Scenario text to process; runs the interactive prompt when omitted
    scenario: Option<String>,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays clean for responses and reports
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let config = SimulatorConfig {
        autism_mode: args.autism,
        ptsd_overlay: args.ptsd,
        ..Default::default()
    };

    info!(
        autism = config.autism_mode,
        ptsd = config.ptsd_overlay,
        "starting simulator"
    );
    let mut sim = match args.seed {
        Some(seed) => NeuroSimulator::with_seed(config, seed),
        None => NeuroSimulator::new(config),
    };

    match args.scenario {
        Some(scenario) => run_batch(&mut sim, &scenario, args.ticks, args.json),
        None => run_interactive(&mut sim, args.json),
    }
}

/// Drive the scenario text for the requested number of ticks and print the
/// final state.
fn run_batch(
    sim: &mut NeuroSimulator,
    scenario: &str,
    ticks: u32,
    json: bool,
) -> anyhow::Result<()> {
    let mut state = SimulationState::default();
    for _ in 0..ticks.max(1) {
        state = sim.process_text(scenario);
    }
    print_state(&state, json)
}

fn run_interactive(sim: &mut NeuroSimulator, json: bool) -> anyhow::Result<()> {
    println!("NeuroSim online. Type 'quit' to exit, 'report' for the last JSON report, 'reset' to restart.");
    print!("> ");
    io::stdout().flush()?;

    let stdin = io::stdin();
    let mut input = String::new();
    let mut last_state: Option<SimulationState> = None;

    loop {
        input.clear();
        if stdin.read_line(&mut input)? == 0 {
            break;
        }
        let trimmed = input.trim();

        match trimmed {
            "quit" | "exit" => break,
            "" => {}
            "report" | "state" => match &last_state {
                Some(state) => print_state(state, true)?,
                None => println!("Nothing processed yet."),
            },
            "reset" => {
                sim.reset();
                last_state = None;
                println!("Simulation reset.");
            }
            _ => {
                let state = sim.process_text(trimmed);
                print_state(&state, json)?;
                last_state = Some(state);
            }
        }

        print!("> ");
        io::stdout().flush()?;
    }

    Ok(())
}

fn print_state(state: &SimulationState, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", ActivationReport::from_state(state).to_json_string()?);
    } else {
        println!("{}", state.response_text);
    }
    Ok(())
}
