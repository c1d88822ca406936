//! Regex Evolve CLI - Infer a pattern from a JSON example file.

use std::path::PathBuf;
use std::time::Instant;

use regex_evolve::{
    compute::PatternSearch,
    schema::{SearchConfig, SearchInput},
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <input.json> [config.json]", args[0]);
        eprintln!();
        eprintln!("Infer a regular expression from positive and negative examples.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  input.json   Alphabet plus good/bad example strings");
        eprintln!("  config.json  Search configuration (default: built-in defaults)");
        eprintln!();
        eprintln!("Example files are printed with the --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example();
        return;
    }

    let input_path = PathBuf::from(&args[1]);
    let input = SearchInput::from_json_file(&input_path).unwrap_or_else(|e| {
        eprintln!("Error loading input {}: {}", input_path.display(), e);
        std::process::exit(1);
    });

    let config = match args.get(2) {
        Some(path) => SearchConfig::from_json_file(path).unwrap_or_else(|e| {
            eprintln!("Error loading config {}: {}", path, e);
            std::process::exit(1);
        }),
        None => SearchConfig::default(),
    };

    let search = PatternSearch::new(config).unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    });

    println!("Regex Evolve");
    println!("============");
    println!("Alphabet: {:?}", input.alphabet);
    println!("Good: {} examples, bad: {} examples", input.good.len(), input.bad.len());
    println!(
        "Lineages: {} x {} generations",
        search.config().lineages,
        search.config().generations_per_lineage
    );
    println!();

    let start = Instant::now();
    let total = search.config().lineages;
    let result = search.run_with_callback(&input, |progress| {
        // Print progress every 10%
        if progress.lineages_completed % (total / 10).max(1) == 0 {
            println!(
                "  Lineage {}/{}: fitness={:.2}",
                progress.lineages_completed, progress.lineages_total, progress.best_fitness
            );
        }
    });

    println!();
    println!("Pattern: {}", result.pattern);
    println!("Fitness: {}", result.fitness_score);
    println!("Correct: {}%", result.percent_correct);
    println!("Stop reason: {:?}", result.stats.stop_reason);
    println!("Time: {:.2}s", start.elapsed().as_secs_f32());
    println!();

    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing result: {}", e),
    }
}

fn print_example() {
    let input = SearchInput::example();
    let config = SearchConfig::default();

    println!("Example input (input.json):");
    println!("{}", serde_json::to_string_pretty(&input).unwrap());
    println!();
    println!("Example configuration (config.json):");
    println!("{}", serde_json::to_string_pretty(&config).unwrap());
}
