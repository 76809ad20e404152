use clap::Parser;

/// Paths are not taken from the command line; see `PipelineConfig`.
#[derive(Parser, Debug)]
#[command(name = "agri-etl")]
#[command(about = "Load crop production and rainfall CSV files into a SQLite database")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(
        short,
        long,
        conflicts_with = "verbose",
        help = "Only report warnings and errors, no progress spinner"
    )]
    pub quiet: bool,
}

impl Cli {
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}
