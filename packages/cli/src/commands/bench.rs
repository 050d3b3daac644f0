use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use tessera_engine::benchmarks::{self, BenchmarkReport, Suite};

#[derive(Debug, Args)]
pub struct BenchArgs {
    /// Rounds per suite (overrides config)
    #[arg(short, long)]
    pub iterations: Option<u32>,

    /// Print the reports as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run_suites(iterations: u32) -> Result<Vec<BenchmarkReport>> {
    [Suite::Component, Suite::Vanilla]
        .into_iter()
        .map(|suite| benchmarks::run(suite, iterations).map_err(anyhow::Error::from))
        .collect()
}

fn rows(report: &BenchmarkReport) -> [(&'static str, &'static str, f64); 5] {
    let results = &report.results;
    [
        ("rendering", "render", results.rendering.render),
        ("eventHandling", "addEventListener", results.event_handling.add_event_listener),
        ("eventHandling", "removeEventListener", results.event_handling.remove_event_listener),
        ("domUpdates", "setContent", results.dom_updates.set_content),
        ("domUpdates", "setAttributes", results.dom_updates.set_attributes),
    ]
}

pub fn bench(args: BenchArgs, config: &Config) -> Result<()> {
    let iterations = args.iterations.unwrap_or(config.bench_iterations);
    let reports = run_suites(iterations)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    println!(
        "{}",
        format!("⏱  Benchmarks ({iterations} iterations, mean ms)")
            .bright_blue()
            .bold()
    );
    println!();
    println!(
        "  {:<14} {:<20} {:>12} {:>12}",
        "scenario".bright_white(),
        "operation".bright_white(),
        "component".bright_white(),
        "vanilla".bright_white()
    );
    let component = rows(&reports[0]);
    let vanilla = rows(&reports[1]);
    for ((scenario, operation, ours), (_, _, raw)) in component.iter().zip(vanilla.iter()) {
        let ours_text = format!("{ours:.6}");
        let ours_text = if ours > raw {
            ours_text.yellow()
        } else {
            ours_text.green()
        };
        println!("  {scenario:<14} {operation:<20} {ours_text:>12} {raw:>12.6}");
    }
    Ok(())
}
