//! Command-line surface: flags and the top-level run loop.

use std::path::PathBuf;

use clap::Parser;

use crate::entities::pokemon::CaptureDepth;
use crate::sources::pokeapi::PokeApiClient;

pub mod session;

use session::{DEFAULT_OUTPUT_DIR, Session, SessionOptions};

/// Interactive Pokédex: look up Pokémon on PokeAPI and save them as JSON.
///
/// Set POKEDEX_POKEAPI_BASE to point at another PokeAPI-compatible server.
#[derive(Parser, Debug)]
#[command(name = "pokedex", version, about)]
pub struct Cli {
    /// How much of each record to keep
    #[arg(long, value_enum, default_value_t = CaptureDepth::Summary)]
    pub capture: CaptureDepth,

    /// Directory saved records are written to
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Ask "search another?" after each lookup and stop on a no
    #[arg(long)]
    pub confirm_continue: bool,
}

impl Cli {
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            depth: self.capture,
            output_dir: self.output_dir.clone(),
            confirm_continue: self.confirm_continue,
        }
    }
}

/// Runs the interactive session on stdin/stdout until the user leaves or
/// presses Ctrl-C.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let client = PokeApiClient::new()?;
    let mut session = Session::new(
        session::spawn_stdin_lines(),
        std::io::stdout(),
        client,
        cli.session_options(),
    );

    let interrupted = tokio::select! {
        result = session.run() => {
            result?;
            false
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            true
        }
    };

    if interrupted {
        tracing::debug!("Interrupted by user");
        session.interrupted()?;
    }
    Ok(())
}
