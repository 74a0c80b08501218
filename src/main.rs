use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use clinic_coverage::display::{print_coverage_report, write_coverage_to_file};
use clinic_coverage::parser::load_request;
use clinic_coverage::{optimize_coverage, summarize, web, OptimizerConfig};

#[derive(Parser)]
#[command(name = "clinic-coverage", version, about = "Assigns clinic coverage for fellows on nights")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Optimize coverage from CSV inputs and print the result
    Run(RunArgs),
    /// Serve the optimizer over HTTP
    Serve {
        #[arg(long, env = "PORT", default_value_t = 8080)]
        port: u16,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Roster CSV: name, seniority, weekday, then one rotation column per block
    #[arg(long)]
    roster: PathBuf,
    /// Block calendar CSV: number, start, end
    #[arg(long)]
    periods: PathBuf,
    /// Where to write the coverage table as CSV
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    iterations: Option<usize>,
    #[arg(long)]
    restarts: Option<usize>,
    #[arg(long)]
    target: Option<u32>,
}

impl RunArgs {
    fn apply(&self, mut config: OptimizerConfig) -> OptimizerConfig {
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if let Some(restarts) = self.restarts {
            config.restarts = restarts;
        }
        if let Some(target) = self.target {
            config.target_per_person = target;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = OptimizerConfig::from_env()?;

    match cli.command {
        Command::Serve { port } => {
            println!("Access the API at http://localhost:{}/api/health", port);
            web::start_server(port, config).await?;
        }
        Command::Run(args) => {
            let config = args.apply(config);
            let request = load_request(&args.roster, &args.periods, config)?;
            println!(
                "Loaded {} people and {} blocks",
                request.roster.len(),
                request.periods.len()
            );

            let result = optimize_coverage(&request);
            let summary = summarize(&request, &result);
            print_coverage_report(&result, &summary)?;

            if let Some(output) = &args.output {
                write_coverage_to_file(&result, output)?;
                println!("\nCoverage saved to {}", output.display());
            }
        }
    }

    Ok(())
}
