//! Headless game runner
//!
//! Plays one game to the final buzzer and prints the summary (text or JSON).

use basketball_sim::{
    write_events_csv, EventSink, GameEvent, GameSummary, PersonalFouls, Preset, RuleSet,
    SimulationInstance, TeamId,
};
use clap::Parser;
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

/// Headless basketball simulator - compare rule sets from the command line
#[derive(Parser, Debug)]
#[command(name = "simulate")]
#[command(about = "Simulate one game under a rule preset or TOML rule file")]
struct Args {
    /// Built-in preset: nba, fiba, ncaa or experimental
    #[arg(long, default_value = "nba")]
    preset: String,

    /// TOML rule file (overrides --preset)
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Call personal fouls and free throws
    #[arg(long)]
    fouls: bool,

    /// Print every event as it happens
    #[arg(long)]
    play_by_play: bool,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Write the event log to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

/// Prints each event line to stdout as it is logged.
struct PlayByPlay;

impl EventSink for PlayByPlay {
    fn add_event(&mut self, event: &GameEvent) {
        println!("{event}");
    }
}

fn load_rules(args: &Args) -> Result<RuleSet, Box<dyn Error>> {
    match &args.rules {
        Some(path) => {
            let source = std::fs::read_to_string(path)?;
            Ok(RuleSet::from_toml_str(&source)?)
        }
        None => Ok(Preset::from_name(&args.preset)?.rules()),
    }
}

fn print_summary(summary: &GameSummary, seed: u64) {
    println!();
    println!("Final (seed {seed}): Team A {} - {} Team B", summary.final_score.a, summary.final_score.b);
    println!(
        "{:<8} {:>5} {:>7} {:>7} {:>7} {:>5} {:>5} {:>5}",
        "Team", "PTS", "FG%", "3P%", "FT%", "REB", "STL", "TOV"
    );
    for team in TeamId::ALL {
        let stats = &summary.stats[team];
        let pct = &summary.shooting_percentages[team];
        println!(
            "{:<8} {:>5} {:>6.1}% {:>6.1}% {:>6.1}% {:>5} {:>5} {:>5}",
            team.display_name(),
            summary.final_score[team],
            pct.fg * 100.0,
            pct.three * 100.0,
            pct.ft * 100.0,
            stats.rebounds,
            stats.steals,
            stats.turnovers
        );
    }
    let impact = &summary.rule_impact;
    println!();
    println!(
        "Rule impact: pace {:?}, scoring {:?}, length {:?}, fatigue {:?}, comebacks {:?}",
        impact.pace, impact.scoring, impact.length, impact.fatigue, impact.comeback
    );
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));
    let args = Args::parse();

    let rules = load_rules(&args)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut sim = SimulationInstance::seeded(rules, seed)?;
    if args.fouls {
        sim = sim.with_fouls(PersonalFouls::default());
    }
    if args.play_by_play {
        sim = sim.with_sink(PlayByPlay);
    }
    log::info!("Simulating with seed {seed}");

    let summary = sim.run_to_completion();

    if let Some(path) = &args.csv {
        write_events_csv(sim.events(), BufWriter::new(File::create(path)?))?;
        log::info!("Wrote {} events to {}", sim.events().len(), path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary, seed);
    }
    Ok(())
}
