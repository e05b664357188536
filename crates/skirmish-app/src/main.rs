use std::fs;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use tracing::info;

use skirmish_app::logging;
use skirmish_app::runner;
use skirmish_app::state::AppState;
use skirmish_core::arena::Arena;
use skirmish_core::commands::BattleCommand;
use skirmish_core::enums::TargetingRule;
use skirmish_sim::{SimConfig, SimulationEngine};

fn main() -> Result<()> {
    let matches = Command::new("skirmish")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Deterministic two-team robot battle simulation")
        .arg(
            Arg::new("seconds")
                .short('s')
                .long("seconds")
                .value_name("SECS")
                .value_parser(clap::value_parser!(f64))
                .default_value("120")
                .help("Simulated seconds to run"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("SEED")
                .value_parser(clap::value_parser!(u64))
                .help("RNG seed (overrides the config file)"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Simulation config JSON"),
        )
        .arg(
            Arg::new("arena")
                .short('a')
                .long("arena")
                .value_name("FILE")
                .help("Arena layout JSON"),
        )
        .arg(
            Arg::new("targeting")
                .long("targeting")
                .value_name("RULE")
                .value_parser(["nearest", "weapon-advantage"])
                .help("Target selection rule (overrides the config file)"),
        )
        .arg(
            Arg::new("realtime")
                .long("realtime")
                .action(ArgAction::SetTrue)
                .help("Pace the run on the wall clock through the game loop thread"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Log verbosity (-v info, -vv debug, -vvv trace)"),
        )
        .get_matches();

    logging::init_logging(matches.get_count("verbose"))?;

    let mut config = match matches.get_one::<String>("config") {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
            serde_json::from_str::<SimConfig>(&text).with_context(|| format!("parsing {path}"))?
        }
        None => SimConfig::default(),
    };
    if let Some(seed) = matches.get_one::<u64>("seed") {
        config.seed = *seed;
    }
    if let Some(rule) = matches.get_one::<String>("targeting") {
        config.targeting = match rule.as_str() {
            "weapon-advantage" => TargetingRule::WeaponAdvantage,
            _ => TargetingRule::Nearest,
        };
    }

    let engine = match matches.get_one::<String>("arena") {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
            let arena = Arena::from_json_str(&text).with_context(|| format!("loading {path}"))?;
            SimulationEngine::with_arena(config.clone(), arena)?
        }
        None => SimulationEngine::new(config.clone()),
    };

    let seconds = *matches.get_one::<f64>("seconds").unwrap_or(&120.0);
    info!(seed = config.seed, seconds, "starting skirmish");

    let output = if matches.get_flag("realtime") {
        let app = AppState::new();
        app.start(engine)?;
        app.send_command(BattleCommand::StartBattle)?;
        std::thread::sleep(Duration::from_secs_f64(seconds.max(0.0)));
        let snapshot = app.snapshot()?;
        app.shutdown()?;
        serde_json::to_string_pretty(&snapshot)?
    } else {
        let mut engine = engine;
        let report = runner::run_fast(&mut engine, seconds);
        serde_json::to_string_pretty(&report)?
    };

    println!("{output}");
    Ok(())
}
