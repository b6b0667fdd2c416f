mod charts;
mod common;
mod profit;
mod validate;

use std::path::PathBuf;

pub enum Command {
    Profit {
        config: PathBuf,
        out: Option<PathBuf>,
    },
    Charts {
        config: PathBuf,
    },
    Validate {
        config: PathBuf,
        strict: bool,
        out: Option<PathBuf>,
    },
}

pub fn run(command: Command) -> Result<(), String> {
    match command {
        Command::Profit { config, out } => profit::run_profit(config, out),
        Command::Charts { config } => charts::run_charts(config),
        Command::Validate {
            config,
            strict,
            out,
        } => validate::run_validate(config, strict, out),
    }
}
