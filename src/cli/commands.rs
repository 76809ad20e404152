use crate::cli::args::Cli;
use crate::config::PipelineConfig;
use crate::error::{EtlError, Result};
use crate::pipeline::BatchLoader;
use crate::utils::constants::MISSING_INPUT_HINT;
use crate::writers::LoadSummary;
use tracing::{error, warn};

/// Run the job. Missing inputs and store failures are reported and end the
/// run normally; anything else (bad configuration) is returned.
pub fn run(cli: Cli) -> Result<()> {
    setup_logging(&cli);

    let config = PipelineConfig::load()?;
    let loader = BatchLoader::new(config).with_progress(!cli.quiet);

    handle_outcome(loader.run(), cli.quiet)
}

/// Turn the job's outcome into the process result, printing the summary or
/// the abort diagnostics.
pub fn handle_outcome(outcome: Result<LoadSummary>, quiet: bool) -> Result<()> {
    match outcome {
        Ok(summary) => {
            if !quiet {
                println!("\n{}", summary.summary());
            }
            Ok(())
        }
        Err(e) if e.is_job_abort() => {
            for diagnostic in abort_diagnostics(&e) {
                match diagnostic {
                    Diagnostic::Error(message) => error!("{}", message),
                    Diagnostic::Hint(message) => warn!("{}", message),
                }
            }
            Ok(())
        }
        Err(e) => Err(e),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    Error(String),
    Hint(String),
}

/// Messages shown to the user when the job stops early.
pub fn abort_diagnostics(err: &EtlError) -> Vec<Diagnostic> {
    match err {
        EtlError::MissingInput { .. } => vec![
            Diagnostic::Error(err.to_string()),
            Diagnostic::Hint(MISSING_INPUT_HINT.to_string()),
        ],
        _ => vec![Diagnostic::Error(format!("Loading the database failed: {}", err))],
    }
}

pub fn setup_logging(cli: &Cli) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("agri_etl={}", cli.log_level())));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}
