//! Combat Sim - headless element_core scenario runner
//!
//! Spawns the scenario's combatants into an Arena, fires the scenario weapon
//! at the first living enemy on a fixed interval and prints what happened.

mod scenario;
mod simulation;

use clap::Parser;
use element_core::TICKS_PER_SECOND;
use scenario::Scenario;
use simulation::Simulation;
use std::path::PathBuf;
use std::process::ExitCode;

/// Headless combat simulation for element_core
#[derive(Parser, Debug)]
#[command(name = "combat_sim")]
#[command(about = "Run an elemental combat scenario and print a damage summary")]
struct Args {
    /// Scenario TOML file (built-in scenario when omitted)
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Ticks to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u32,

    /// Ticks between weapon hits
    #[arg(long, default_value_t = 10)]
    attack_interval: u32,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let scenario = match &args.scenario {
        Some(path) => Scenario::load(path),
        None => Scenario::builtin(),
    };
    let scenario = match scenario {
        Ok(scenario) => scenario,
        Err(e) => {
            tracing::error!("Failed to load scenario: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(
        "Running '{}' for {} ticks (seed {})",
        scenario.name,
        args.ticks,
        seed
    );

    let name = scenario.name.clone();
    let mut sim = Simulation::new(scenario, seed);
    let report = sim.run(args.ticks, args.attack_interval);

    println!("=== {} ===", name);
    println!(
        "Simulated:   {} ticks ({:.1}s)",
        report.ticks,
        report.ticks as f64 / TICKS_PER_SECOND as f64
    );
    println!("Hits:        {}", report.hit_count);
    for (tier, count) in &report.crit_tiers {
        println!("  tier {}:    {}", tier, count);
    }
    println!("Crit rate:   {:.1}%", report.crit_rate());
    println!("Avg hit:     {:.1}", report.avg_hit());
    println!("Triggers:    {}", report.triggers_applied);
    println!("Detonations: {}", report.detonations);
    println!("Direct:      {:.1}", report.direct_damage);
    for (kind, damage) in &report.effect_damage {
        println!("  {:<9}  {:.1}", kind.to_string(), damage);
    }
    println!("Effects:     {:.1}", report.total_effect_damage());
    println!("DPS:         {:.1}", report.dps());
    println!("Kills:       {}", report.kills.len());
    for kill in &report.kills {
        println!("  {} at tick {} by {}", kill.name, kill.tick, kill.kind);
    }

    for combatant in sim.arena().iter().filter(|c| c.is_alive()) {
        println!(
            "{} survives at {:.0}% health",
            combatant.name,
            combatant.health_percent()
        );
    }

    ExitCode::SUCCESS
}
