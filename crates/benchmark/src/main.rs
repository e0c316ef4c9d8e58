//! Cutting-list runner CLI

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use u_guillotine_benchmark::{
    builtin_scenarios, BenchError, BenchmarkConfig, BenchmarkRunner, Job, SyntheticJobs,
};

#[derive(Parser)]
#[command(name = "cutlist-bench")]
#[command(about = "Job runner for the U-Guillotine cutting optimizer")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate synthetic job files
    Generate {
        /// Output directory
        #[arg(short, long, default_value = "jobs/synthetic")]
        output: PathBuf,

        /// Random seed for reproducibility
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },

    /// Run one or more JSON job files
    Run {
        /// Job files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Worker threads per engine (0 = all cores)
        #[arg(short, long)]
        threads: Option<usize>,

        /// Time limit per job in milliseconds
        #[arg(long)]
        time_limit: Option<u64>,

        /// Include sheet layouts in the JSON report
        #[arg(long)]
        layout: bool,

        /// Output file for results (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file for CSV results
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Run the built-in acceptance scenarios
    Scenarios {
        /// Specific scenario ID to run
        #[arg(short = 'i', long)]
        scenario_id: Option<String>,

        /// Output file for scenario results (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { output, seed } => {
            fs::create_dir_all(&output)?;
            println!("Generating synthetic jobs (seed={})...", seed);
            for job in SyntheticJobs::all(seed) {
                let path = output.join(format!("{}.json", job.name));
                job.save(&path)?;
                println!(
                    "  {} ({} boxes) -> {}",
                    job.name,
                    job.box_count(),
                    path.display()
                );
            }
        }

        Commands::Run {
            files,
            threads,
            time_limit,
            layout,
            output,
            csv,
        } => {
            let mut config = BenchmarkConfig::new().with_layout(layout);
            if let Some(threads) = threads {
                config = config.with_threads(threads);
            }
            if let Some(ms) = time_limit {
                config = config.with_time_limit(ms);
            }

            let jobs = files
                .iter()
                .map(Job::load)
                .collect::<Result<Vec<_>, BenchError>>()?;

            let runner = BenchmarkRunner::new(config);
            let results = runner.run_jobs(&jobs);

            results.print_summary();

            if let Some(path) = output {
                results.save_json(&path)?;
                println!("Results saved to: {}", path.display());
            }

            if let Some(path) = csv {
                results.save_csv(&path)?;
                println!("CSV saved to: {}", path.display());
            }
        }

        Commands::Scenarios {
            scenario_id,
            output,
        } => {
            let mut scenarios = builtin_scenarios();
            if let Some(id) = scenario_id {
                scenarios.retain(|s| s.id == id);
                if scenarios.is_empty() {
                    return Err(BenchError::UnknownScenario(id).into());
                }
            }

            let runner = BenchmarkRunner::new(BenchmarkConfig::new());
            let results: Vec<_> = scenarios.iter().map(|s| runner.run_scenario(s)).collect();

            let passed = results.iter().filter(|r| r.passed).count();
            println!("\n{}/{} scenarios passed", passed, results.len());

            if let Some(path) = output {
                fs::write(&path, serde_json::to_string_pretty(&results)?)?;
                println!("Results saved to: {}", path.display());
            }

            if passed < results.len() {
                anyhow::bail!("{} scenario(s) failed", results.len() - passed);
            }
        }
    }

    Ok(())
}
