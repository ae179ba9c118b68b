use anyhow::Result;
use clap::Parser;
use comparable_dispersion::cli::{setup, Cli, Commands};
use comparable_dispersion::commands::{self, ScoreConfig, SectionConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup::init_logging(cli.verbosity);

    match cli.command {
        Commands::Score {
            input,
            config,
            overrides,
            format,
            output,
            raw,
        } => commands::handle_score(ScoreConfig {
            input,
            config,
            overrides,
            format,
            output,
            raw,
        }),
        Commands::Section {
            input,
            config,
            overrides,
            output,
            jobs,
        } => commands::handle_section(SectionConfig {
            input,
            config,
            overrides,
            output,
            jobs,
        }),
        Commands::Demo { format } => commands::run_demo(format),
        Commands::Init { force } => commands::init_config(force),
    }
}
