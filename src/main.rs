//! Demo driver — plays the external clock for one site's digital twin.
//!
//! Generates mock irradiance and ambient readings per tick, advances the
//! core, and prints each snapshot. The core itself never sleeps, polls,
//! or persists anything; this binary is the caller the library expects.

use std::f64::consts::PI;
use std::path::Path;
use std::process;

use rand::{Rng, SeedableRng, rngs::StdRng};

use twin_sim::config::{DEFAULT_SITE, ProfileRegistry, SiteId};
use twin_sim::insights::generate_insight;
use twin_sim::sim::{SimulationCore, StepInput};

/// Parsed CLI arguments.
struct CliArgs {
    site: String,
    profiles_path: Option<String>,
    steps: usize,
    step_seconds: f64,
    seed: u64,
    initial_soc: f64,
    initial_temp: f64,
}

fn print_help() {
    eprintln!("twin-sim — digital twin physics core for solar + battery sites");
    eprintln!();
    eprintln!("Usage: twin-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --site <code>          Site identifier (default: {DEFAULT_SITE})");
    eprintln!("  --profiles <path>      Load site profiles from a TOML file");
    eprintln!("  --steps <n>            Number of ticks to run (default: 24)");
    eprintln!("  --step-seconds <s>     Tick duration in seconds (default: 3600)");
    eprintln!("  --seed <u64>           Random seed for mock telemetry (default: 42)");
    eprintln!("  --soc <percent>        Initial battery SOC (default: 50)");
    eprintln!("  --temp <celsius>       Initial battery temperature (default: 25)");
    eprintln!("  --help                 Show this help message");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        site: DEFAULT_SITE.to_string(),
        profiles_path: None,
        steps: 24,
        step_seconds: 3600.0,
        seed: 42,
        initial_soc: 50.0,
        initial_temp: 25.0,
    };

    fn value<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
        match args.get(i) {
            Some(v) => v,
            None => {
                eprintln!("error: {flag} requires a value");
                process::exit(1);
            }
        }
    }

    fn parse<T: std::str::FromStr>(raw: &str, flag: &str) -> T {
        match raw.parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                eprintln!("error: {flag} value \"{raw}\" is invalid");
                process::exit(1);
            }
        }
    }

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--site" => {
                i += 1;
                cli.site = value(&args, i, "--site").to_string();
            }
            "--profiles" => {
                i += 1;
                cli.profiles_path = Some(value(&args, i, "--profiles").to_string());
            }
            "--steps" => {
                i += 1;
                cli.steps = parse(value(&args, i, "--steps"), "--steps");
            }
            "--step-seconds" => {
                i += 1;
                cli.step_seconds = parse(value(&args, i, "--step-seconds"), "--step-seconds");
            }
            "--seed" => {
                i += 1;
                cli.seed = parse(value(&args, i, "--seed"), "--seed");
            }
            "--soc" => {
                i += 1;
                cli.initial_soc = parse(value(&args, i, "--soc"), "--soc");
            }
            "--temp" => {
                i += 1;
                cli.initial_temp = parse(value(&args, i, "--temp"), "--temp");
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

/// Mock clear-sky irradiance: half-sine between 06:00 and 18:00, with a
/// small multiplicative cloud jitter.
fn mock_irradiance(hour_of_day: f64, rng: &mut StdRng) -> f64 {
    if !(6.0..18.0).contains(&hour_of_day) {
        return 0.0;
    }
    let shape = (PI * (hour_of_day - 6.0) / 12.0).sin();
    let jitter: f64 = rng.random_range(0.9..1.0);
    900.0 * shape * jitter
}

/// Mock ambient temperature around a fixed daily mean.
fn mock_ambient_c(rng: &mut StdRng) -> f64 {
    24.5 + rng.random_range(-1.5..1.5)
}

fn main() {
    let cli = parse_args();

    let registry = if let Some(ref path) = cli.profiles_path {
        match ProfileRegistry::from_toml_file(Path::new(path)) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ProfileRegistry::builtin()
    };

    let site = SiteId::new(cli.site.as_str());
    let mut core = match SimulationCore::new(
        site,
        cli.initial_soc,
        cli.initial_temp,
        cli.seed,
        &registry,
    ) {
        Ok(core) => core,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    println!(
        "site {} | capacity {:.0} kWh | panel {:.0} m² @ {:.0}% | {} ticks of {:.0}s",
        core.site(),
        core.profile().battery_capacity_kwh,
        core.profile().panel_area_m2,
        core.profile().panel_efficiency * 100.0,
        cli.steps,
        cli.step_seconds,
    );

    let mut env_rng = StdRng::seed_from_u64(cli.seed);
    let mut last: Option<(twin_sim::sim::StepResult, f64)> = None;

    for t in 0..cli.steps {
        let hour = (t as f64 * cli.step_seconds / 3600.0) % 24.0;
        let irradiance = mock_irradiance(hour, &mut env_rng);
        let ambient = mock_ambient_c(&mut env_rng);

        let result = core.run_step(&StepInput::new(cli.step_seconds, irradiance, ambient));
        println!("t={t:>3} ({hour:>4.1}h) | {result}");
        last = Some((result, irradiance));
    }

    if let Some((result, irradiance)) = last {
        println!("\ninsight: {}", generate_insight(&result, irradiance));
    }
    let clamps = core.clamp_counters();
    println!(
        "odometer: {:.4} kWh | clamp events: rate={} floor={} ceiling={} temp={}",
        core.throughput_kwh(),
        clamps.discharge_rate_caps,
        clamps.energy_floor_clamps,
        clamps.energy_ceiling_clamps,
        clamps.temp_caps,
    );
}
