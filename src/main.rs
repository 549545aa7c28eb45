use clap::Parser;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    init_tracing();

    let cli = pokedex_cli::cli::Cli::parse();
    match pokedex_cli::cli::run(cli).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            if let Some(dex_err) = err.downcast_ref::<pokedex_cli::error::PokedexError>() {
                eprintln!("❌ Error inesperado: {dex_err}");
            } else {
                eprintln!("❌ Error inesperado: {err}");
            }
            std::process::ExitCode::from(1)
        }
    }
}
