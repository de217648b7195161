use std::process::ExitCode;

use clap::Parser;

use align_elf::cli::Cli;
use align_elf::config::AlignConfig;
use align_elf::output::{self, OutputFormat};
use align_elf::{logger, run};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = logger::level_from(cli.verbose, std::env::var(logger::LOG_ENV).ok().as_deref());
    let _ = logger::init(level);

    let config = match AlignConfig::resolve(&cli) {
        Ok(config) => config,
        Err(e) => {
            output::emit_error(cli.output, e.exit_code_num(), &e.to_string());
            return e.exit_code();
        }
    };
    log::debug!("[align-elf] {config:?}");

    let summary = run::run(&cli.files, &config, cli.dry_run);

    if cli.output == OutputFormat::Human {
        for file in summary.output.files.iter().filter(|f| f.error.is_some()) {
            let message = file.error.as_deref().unwrap_or_default();
            output::emit_error(cli.output, file.exit_code.unwrap_or(1), message);
        }
    }
    if let Err(e) = output::emit(cli.output, &summary.output) {
        log::error!("[align-elf] failed to write output: {e}");
        return ExitCode::from(2);
    }

    match summary.first_error {
        Some(e) => e.exit_code(),
        None => ExitCode::SUCCESS,
    }
}
