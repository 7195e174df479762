//! Archery Range headless runner
//!
//! Plays one scripted round and prints the final snapshot as JSON.
//!
//! Usage: `archery-range [--config PATH] [AIM_DEGREES] [POWER]`

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

#[cfg(not(target_arch = "wasm32"))]
use archery_range::{
    FixedStepDriver, RangeConfig,
    consts::{DEFAULT_AIM_DEGREES, DEFAULT_POWER},
    sim::{AimSettings, Outcome, Round, RoundEvent, RoundSnapshot, TickInput},
};
#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

/// Give up if a round hasn't come back to idle after this many ticks
#[cfg(not(target_arch = "wasm32"))]
const MAX_TICKS: u32 = 100_000;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(name = "archery-range")]
#[command(about = "Shoot one arrow at the moving target and report the outcome")]
#[command(allow_negative_numbers = true)]
struct Args {
    /// JSON range config (missing fields keep their defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Aim in degrees, 0..=180 with 90 horizontal
    #[arg(default_value_t = DEFAULT_AIM_DEGREES)]
    aim_degrees: f64,

    /// Launch power in pixels/s, 1..=1000
    #[arg(default_value_t = DEFAULT_POWER)]
    power: f64,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Archery Range (headless) starting...");

    let args = Args::parse();
    if let Err(e) = run(args) {
        log::error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless runner on the web; a host page drives the library directly
}

#[cfg(not(target_arch = "wasm32"))]
fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => RangeConfig::load(path)?,
        None => RangeConfig::default(),
    };

    // Surface a bad aim now rather than as a dropped tick input
    AimSettings::from_inputs(args.aim_degrees, args.power)?;

    let mut round = Round::new(config);
    let mut driver = FixedStepDriver::new(config.timing);
    driver.queue(TickInput {
        aim_degrees: Some(args.aim_degrees),
        power: Some(args.power),
        shoot: true,
        ..Default::default()
    });

    let mut resolved = None;
    for _ in 0..MAX_TICKS {
        for event in driver.update(&mut round, driver.step_secs())? {
            log::info!("Event: {event:?}");
            match event {
                RoundEvent::Resolved(outcome) => {
                    resolved = Some((outcome, round.snapshot()));
                }
                RoundEvent::Rearmed => {
                    return report(resolved);
                }
                RoundEvent::Launched => {}
            }
        }
    }

    Err(format!("round did not finish within {MAX_TICKS} ticks").into())
}

#[cfg(not(target_arch = "wasm32"))]
fn report(resolved: Option<(Outcome, RoundSnapshot)>) -> Result<(), Box<dyn std::error::Error>> {
    let Some((outcome, snapshot)) = resolved else {
        return Err("round rearmed without resolving".into());
    };
    println!("{outcome:?}");
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["archery-range"]).unwrap();
        assert!(args.config.is_none());
        assert_eq!(args.aim_degrees, DEFAULT_AIM_DEGREES);
        assert_eq!(args.power, DEFAULT_POWER);
    }

    #[test]
    fn test_args_config_forms() {
        let argv = ["archery-range", "--config=range.json", "135", "500"];
        let args = Args::try_parse_from(argv).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("range.json")));
        assert_eq!(args.aim_degrees, 135.0);
        assert_eq!(args.power, 500.0);

        let argv = ["archery-range", "90", "--config", "range.json"];
        let args = Args::try_parse_from(argv).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("range.json")));
        assert_eq!(args.aim_degrees, 90.0);
    }

    #[test]
    fn test_args_help_is_not_a_number() {
        let err = Args::try_parse_from(["archery-range", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_negative_aim_parses_then_fails_range_check() {
        let args = Args::try_parse_from(["archery-range", "-10"]).unwrap();
        assert_eq!(args.aim_degrees, -10.0);
        assert!(run(args).is_err());
    }

    #[test]
    fn test_run_default_round() {
        let args = Args::try_parse_from(["archery-range", "90", "1000"]).unwrap();
        assert!(run(args).is_ok());
    }
}
