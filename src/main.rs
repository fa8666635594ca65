//! Command line front-end: solve a JSON problem definition with the ant colony.

use aco_cvrp::config::Config;
use aco_cvrp::problem::ProblemDefinition;
use aco_cvrp::utils::{format_history, save_solution, write_solution, SearchStatistics};
use aco_cvrp::AcoAlgorithm;
use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "aco-cvrp", version, about = "Ant Colony Optimization for the CVRP")]
struct Args {
    /// Problem definition (JSON)
    problem: PathBuf,

    /// Run parameters (JSON); flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long)]
    iterations: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// Evaporation rate ρ
    #[arg(long)]
    rho: Option<f64>,

    /// Pheromone influence α
    #[arg(long)]
    alpha: Option<f64>,

    /// Visibility influence β
    #[arg(long)]
    beta: Option<f64>,

    #[arg(long)]
    q0: Option<f64>,

    /// Use the improved selection rule and bounded elitist update
    #[arg(long)]
    improved: bool,

    #[arg(long)]
    no_mutation: bool,

    /// Write the solution report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the best solution and history as JSON
    #[arg(long)]
    json: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("cannot open config {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("cannot parse config {}", path.display()))?
        }
        None => Config::new(),
    };

    if let Some(iterations) = args.iterations {
        config = config.with_iterations(iterations);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(rho) = args.rho {
        config = config.with_evaporation_rate(rho);
    }
    if let Some(alpha) = args.alpha {
        config = config.with_pheromone_influence(alpha);
    }
    if let Some(beta) = args.beta {
        config = config.with_visibility_influence(beta);
    }
    if let Some(q0) = args.q0 {
        config = config.with_q0(q0);
    }
    if args.improved {
        config = config.with_improved(true);
    }
    if args.no_mutation {
        config = config.with_mutation(false);
    }

    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = load_config(&args)?;
    let definition = ProblemDefinition::from_json_file(&args.problem)
        .with_context(|| format!("cannot read problem {}", args.problem.display()))?;

    info!("Loaded problem from: {}", args.problem.display());
    let mut algorithm = AcoAlgorithm::from_definition(&definition, config)?;
    algorithm.run()?;

    let best = algorithm
        .best_solution
        .as_ref()
        .context("run finished without a solution")?;

    if args.json {
        let report = serde_json::json!({
            "name": algorithm.problem.name,
            "total_weight": best.total_weight,
            "iteration": best.iteration,
            "routes": best.routes(&algorithm.problem.graph),
            "history": algorithm.history,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        match &args.output {
            Some(path) => {
                save_solution(best, &algorithm.problem, path)
                    .with_context(|| format!("cannot write {}", path.display()))?;
                info!("Saved solution to: {}", path.display());
            }
            None => write_solution(&mut std::io::stdout().lock(), best, &algorithm.problem)?,
        }

        println!("{}", format_history(&algorithm.history));
        let stats = SearchStatistics::collect(
            best,
            &algorithm.problem,
            &algorithm.history,
            algorithm.run_time,
        );
        println!("{}", stats.format());
    }

    Ok(())
}
