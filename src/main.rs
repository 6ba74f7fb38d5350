use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use u_linebalance::balancer::{BalancerConfig, GreedyBalancer, LineKpi, TieBreaker};
use u_linebalance::{io, report};

#[derive(Parser)]
#[command(
    name = "u-linebalance",
    about = "Stochastic assembly-line balancing",
    version,
    propagate_version = true
)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Balance an instance and write the result
    Balance {
        /// Instance JSON file
        input: PathBuf,
        /// Result JSON file (default: print to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Stdout format when no output file is given
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
        /// Tie-breaking rule between equally ranked tasks
        #[arg(long, value_enum, default_value_t = TieBreak::Id)]
        tie_break: TieBreak,
    },
    /// Validate an instance without balancing it
    Validate {
        /// Instance JSON file
        input: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum TieBreak {
    Id,
    Input,
}

impl From<TieBreak> for TieBreaker {
    fn from(t: TieBreak) -> Self {
        match t {
            TieBreak::Id => TieBreaker::ById,
            TieBreak::Input => TieBreaker::InputOrder,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!("u_linebalance={default_level}"))
            }),
        )
        .init();

    match cli.command {
        Commands::Balance {
            input,
            output,
            format,
            tie_break,
        } => balance(&input, output.as_deref(), format, tie_break),
        Commands::Validate { input } => validate(&input),
    }
}

fn balance(
    input: &Path,
    output: Option<&Path>,
    format: Format,
    tie_break: TieBreak,
) -> anyhow::Result<()> {
    let mut instance = io::read_instance_file(input)
        .with_context(|| format!("failed to load instance {}", input.display()))?;

    let config = BalancerConfig::new().with_tie_breaker(tie_break.into());
    GreedyBalancer::with_config(config).balance(&mut instance)?;

    match (output, format) {
        (Some(path), _) => {
            io::write_result_file(&instance, path)
                .with_context(|| format!("failed to write result {}", path.display()))?;
            print!("{}", report::format_report(&instance));
            println!("✓ Wrote {}", path.display());
        }
        (None, Format::Json) => println!("{}", io::result_to_string(&instance)?),
        (None, Format::Text) => {
            print!("{}", report::format_report(&instance));
            let kpi = LineKpi::calculate(&instance)?;
            println!(
                "stations: {}  efficiency: {:.1}%  station cost: {}  expected off-line cost: {}",
                kpi.station_count,
                kpi.line_efficiency * 100.0,
                kpi.station_time_cost,
                kpi.expected_offline_cost
            );
        }
    }

    Ok(())
}

fn validate(input: &Path) -> anyhow::Result<()> {
    let instance = io::read_instance_file(input)
        .with_context(|| format!("invalid instance {}", input.display()))?;
    println!(
        "✓ {}: {} tasks, cycle time {}",
        instance.id,
        instance.graph().len(),
        instance.cycle_time()
    );
    Ok(())
}
