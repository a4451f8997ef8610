use clap::Parser;
use tracing_subscriber::EnvFilter;

use textref_cli::{commands, Cli};

fn main() {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("textref=debug,textref_cli=debug,textref_field=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match commands::run(cli) {
        Ok(output) => {
            println!("{output}");
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };
    std::process::exit(exit_code);
}
