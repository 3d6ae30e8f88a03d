use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::error;

use ascent_sim::constants::EARTH_RADIUS;
use ascent_sim::io::{csv, FlightSummary};
use ascent_sim::{logging, Environment, ParameterSearch, Scenario, SimError, StopReason};

/// Point-mass rocket ascent and rendezvous: search design and guidance
/// parameters, then replay the best configuration.
#[derive(Parser, Debug)]
#[command(name = "ascent-sim", version, about)]
struct Args {
    /// Scenario file (.yaml); built-in defaults when omitted.
    #[arg(short, long, value_name = "FILE")]
    scenario: Option<PathBuf>,

    /// Override the scenario's search iteration count.
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Seed the parameter search for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Write the best run's telemetry to a CSV file.
    #[arg(short, long, value_name = "FILE")]
    trajectory: Option<PathBuf>,

    /// Write the best configuration to a YAML file.
    #[arg(short, long, value_name = "FILE")]
    best_out: Option<PathBuf>,

    /// Verbosity (-v: debug, -vv: trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            let mut source = std::error::Error::source(&err);
            while let Some(cause) = source {
                error!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), SimError> {
    let mut scenario = match &args.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::default(),
    };
    if let Some(iterations) = args.iterations {
        scenario.iterations = iterations;
    }
    if let Some(seed) = args.seed {
        scenario.seed = Some(seed);
    }
    scenario.validate()?;

    let environment = Environment::new();
    let destination = scenario.destination_vector();

    // -----------------------------------------------------------------------
    // Parameter search
    // -----------------------------------------------------------------------
    let mut search = ParameterSearch::new(&environment, destination)
        .with_ranges(scenario.ranges)
        .with_timestep(scenario.dt);
    match scenario.seed {
        Some(seed) => search.optimize_with(scenario.iterations, &mut StdRng::seed_from_u64(seed)),
        None => search.optimize(scenario.iterations),
    }

    let best = *search.best().ok_or_else(|| {
        SimError::InvalidScenario("search found no viable configuration".into())
    })?;
    let mut trial = search.build_best().ok_or_else(|| {
        SimError::InvalidScenario("best configuration failed to rebuild".into())
    })?;

    // -----------------------------------------------------------------------
    // Replay the best configuration with telemetry
    // -----------------------------------------------------------------------
    let twr = trial.rocket().twr();
    let delta_v = trial.rocket().ideal_delta_v();
    let (reason, trajectory) = trial.run_recorded(scenario.dt, 100);
    let summary = FlightSummary::from_trajectory(&trajectory, &trial.destination());

    // -----------------------------------------------------------------------
    // Report
    // -----------------------------------------------------------------------
    println!();
    println!("====================================================================");
    println!("  ASCENT PARAMETER SEARCH — {}", scenario.name);
    println!("====================================================================");
    println!();
    println!("  Search");
    println!("  ──────────────────────────────────────────────────────────────────");
    let seed_text = scenario
        .seed
        .map_or_else(|| "random".into(), |s| s.to_string());
    println!(
        "  Iterations:    {:>8}      Seed:          {}",
        scenario.iterations, seed_text
    );
    println!("  Best score:    {:>12.1}", best.score);
    println!();

    println!("  Best Rocket");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Dry mass:      {:>8.0} kg    Fuel:         {:>8.0} kg",
        best.rocket.dry_mass, best.rocket.fuel_mass
    );
    println!(
        "  Burn rate:     {:>8.1} kg/s  Isp:          {:>8.0} s",
        best.rocket.burn_rate, best.rocket.specific_impulse
    );
    println!(
        "  Cd:            {:>8.2}       Area:         {:>8.1} m^2",
        best.rocket.drag_coefficient, best.rocket.cross_section_area
    );
    println!(
        "  TWR:           {:>8.2}       Delta-v:      {:>8.0} m/s",
        twr, delta_v
    );
    println!();

    println!("  Best Guidance");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Target alt:    {:>8.0} m     Turn start:   {:>8.0} m",
        best.guidance.target_altitude, best.guidance.turn_start_altitude
    );
    println!(
        "  Turn rate:     {:>8.2} deg/s Max slew:     {:>8.1} deg/s",
        best.guidance.turn_rate, best.guidance.max_angular_velocity
    );
    println!();

    println!("  Replay");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  Outcome:       {}", describe(reason));
    println!(
        "  Closest:       {:>8.0} m     Final miss:   {:>8.0} m",
        trial.min_distance(),
        trial.miss_distance()
    );
    if let Some(summary) = &summary {
        println!(
            "  Peak alt:      {:>8.0} m     Max speed:    {:>8.1} m/s",
            summary.peak_altitude, summary.max_speed
        );
        println!(
            "  Fuel used:     {:>8.0} kg    Flight time:  {:>8.1} s",
            summary.fuel_consumed, summary.flight_time
        );
    }
    println!(
        "  Destination:   ({:.0}, {:.0}, {:.0}) — altitude {:.0} m",
        destination.x,
        destination.y,
        destination.z,
        destination.norm() - EARTH_RADIUS
    );
    println!("====================================================================");
    println!();

    // -----------------------------------------------------------------------
    // Optional outputs
    // -----------------------------------------------------------------------
    if let Some(path) = &args.trajectory {
        csv::write_trajectory_file(path, &trajectory).map_err(|source| SimError::OutputIo {
            path: path.clone(),
            source,
        })?;
        println!("  Trajectory written to {}", path.display());
    }
    if let Some(path) = &args.best_out {
        let yaml =
            serde_yaml::to_string(&best).map_err(|source| SimError::Encode { source })?;
        fs::write(path, yaml).map_err(|source| SimError::OutputIo {
            path: path.clone(),
            source,
        })?;
        println!("  Best configuration written to {}", path.display());
    }

    Ok(())
}

fn describe(reason: StopReason) -> &'static str {
    match reason {
        StopReason::Arrived => "ARRIVED — closest approach within tolerance",
        StopReason::OutOfFuel => "OUT OF FUEL before reaching the target",
        StopReason::TimeLimit => "TIME LIMIT reached",
    }
}
