//! coolgen command-line tool

use clap::Parser;
use cool_cli::output::{resolve_color_choice, StyledOutput};
use cool_cli::{run, Cli, Outcome};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "cool_cli=debug,cool_cgen=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut out = StyledOutput::new(resolve_color_choice(cli.color.as_deref()));
    match run(&cli) {
        Ok(Outcome::Written(path)) => {
            if cli.verbose {
                out.success("wrote", &path.display().to_string());
            }
        }
        Ok(Outcome::Printed) => {}
        Err(e) => {
            out.report(&e);
            std::process::exit(1);
        }
    }
}
