mod commands;
mod infra;
mod obs;

use clap::{Parser, Subcommand};
use commands::Command;
use std::path::PathBuf;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("TALLY_GIT_SHA"),
    " ",
    env!("TALLY_TARGET"),
    ")"
);

#[derive(Parser)]
#[command(name = "tally")]
#[command(
    about = "Realized trade profit, equity curves and per-symbol trade charts",
    version,
    long_version = LONG_VERSION,
    arg_required_else_help = true
)]
#[command(
    after_help = "Examples:\n  \
        tally profit --config configs/sample.toml --out runs/\n  \
        tally charts --config configs/sample.toml\n  \
        tally validate --config configs/sample.toml --strict\n"
)]
struct Cli {
    /// Log filter when TALLY_LOG is unset (e.g. info, tally_application=debug).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
    /// Log output format: pretty or json.
    #[arg(long, global = true, default_value = "pretty")]
    log_format: String,
    /// Serve Prometheus metrics on host:port while the command runs.
    #[arg(long, global = true)]
    metrics_addr: Option<String>,
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Compute daily profit, the cumulative curve and drawdown; write a run report.
    Profit {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Render one price chart with trade markers per catalogued symbol.
    Charts {
        #[arg(long)]
        config: PathBuf,
    },
    /// Check that trades load, pair and match the symbol catalog.
    Validate {
        #[arg(long)]
        config: PathBuf,
        #[arg(long, default_value_t = false)]
        strict: bool,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = obs::init_tracing(&cli.log_level, &cli.log_format) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
    if let Err(err) = obs::init_metrics(cli.metrics_addr.as_deref()) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }

    let command = match cli.command {
        CliCommand::Profit { config, out } => Command::Profit { config, out },
        CliCommand::Charts { config } => Command::Charts { config },
        CliCommand::Validate {
            config,
            strict,
            out,
        } => Command::Validate {
            config,
            strict,
            out,
        },
    };

    if let Err(err) = commands::run(command) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}
