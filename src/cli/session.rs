//! The interactive lookup loop.
//!
//! A [`Session`] owns everything one run of the loop needs: the line source,
//! the console writer, the API client and the user's options. Input arrives
//! as whole lines over a channel so the loop never blocks the runtime on a
//! terminal read.

use std::io::Write;
use std::path::PathBuf;

use tokio::sync::mpsc;
use tracing::warn;

use crate::entities::pokemon::{self, CaptureDepth, Pokemon};
use crate::error::PokedexError;
use crate::sources::pokeapi::PokeApiClient;

const EXIT_TOKENS: [&str; 4] = ["salir", "exit", "quit", "q"];
const YES_TOKENS: [&str; 5] = ["s", "si", "sí", "y", "yes"];
const BANNER_WIDTH: usize = 50;

pub const DEFAULT_OUTPUT_DIR: &str = "pokedex_json";

pub fn is_exit_token(input: &str) -> bool {
    let input = input.trim().to_lowercase();
    EXIT_TOKENS.contains(&input.as_str())
}

pub fn is_affirmative(input: &str) -> bool {
    let input = input.trim().to_lowercase();
    YES_TOKENS.contains(&input.as_str())
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub depth: CaptureDepth,
    pub output_dir: PathBuf,
    pub confirm_continue: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            depth: CaptureDepth::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            confirm_continue: false,
        }
    }
}

enum State {
    Prompting,
    Fetching(String),
    SavePrompt(Box<Pokemon>),
    ContinuePrompt,
    Done,
}

pub struct Session<W> {
    input: mpsc::Receiver<String>,
    out: W,
    client: PokeApiClient,
    options: SessionOptions,
}

impl<W: Write> Session<W> {
    pub fn new(
        input: mpsc::Receiver<String>,
        out: W,
        client: PokeApiClient,
        options: SessionOptions,
    ) -> Self {
        Self {
            input,
            out,
            client,
            options,
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Runs until an exit token, a declined "search another?" prompt, or the
    /// end of input. Only a console write failure ends it with an error.
    pub async fn run(&mut self) -> Result<(), PokedexError> {
        self.banner()?;

        let mut state = State::Prompting;
        loop {
            state = match state {
                State::Prompting => self.name_prompt().await?,
                State::Fetching(name) => self.fetch(&name).await?,
                State::SavePrompt(pokemon) => self.save_prompt(&pokemon).await?,
                State::ContinuePrompt => self.continue_prompt().await?,
                State::Done => return Ok(()),
            };
        }
    }

    /// Farewell for a Ctrl-C that lands while the session is waiting.
    pub fn interrupted(&mut self) -> Result<(), PokedexError> {
        writeln!(self.out, "\n\n👋 Programa interrumpido por el usuario")?;
        self.out.flush()?;
        Ok(())
    }

    fn banner(&mut self) -> Result<(), PokedexError> {
        let rule = "=".repeat(BANNER_WIDTH);
        writeln!(self.out, "🌟{rule}")?;
        writeln!(self.out, "           BIENVENIDO A LA POKÉDEX")?;
        writeln!(self.out, "🌟{rule}")?;
        writeln!(self.out, "📚 Busca información de cualquier Pokémon")?;
        writeln!(
            self.out,
            "💾 Los datos se guardan en la carpeta '{}'",
            self.options.output_dir.display()
        )?;
        writeln!(self.out, "🚪 Escribe 'salir' para terminar el programa")?;
        writeln!(self.out, "{}", "-".repeat(BANNER_WIDTH))?;
        Ok(())
    }

    fn farewell(&mut self) -> Result<State, PokedexError> {
        writeln!(self.out, "\n👋 ¡Gracias por usar la Pokédex! ¡Hasta pronto!")?;
        self.out.flush()?;
        Ok(State::Done)
    }

    /// Prints `prompt` without a newline and waits for one line of input.
    /// `None` means the input side is closed.
    async fn ask(&mut self, prompt: &str) -> Result<Option<String>, PokedexError> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;
        let line = self.input.recv().await;
        if line.is_none() {
            writeln!(self.out)?;
        }
        Ok(line)
    }

    async fn name_prompt(&mut self) -> Result<State, PokedexError> {
        let Some(line) = self.ask("\n🔍 Ingresa el nombre de un Pokémon: ").await? else {
            return self.farewell();
        };
        let entry = line.trim();

        if is_exit_token(entry) {
            return self.farewell();
        }
        if entry.is_empty() {
            writeln!(self.out, "⚠️  Por favor ingresa un nombre válido")?;
            return Ok(State::Prompting);
        }
        Ok(State::Fetching(entry.to_string()))
    }

    async fn fetch(&mut self, name: &str) -> Result<State, PokedexError> {
        writeln!(self.out, "🔍 Buscando '{name}' en la PokeAPI...")?;
        if let Ok(url) = self.client.endpoint(name) {
            writeln!(self.out, "   ↳ {url}")?;
        }
        self.out.flush()?;

        match pokemon::get(&self.client, name, self.options.depth).await {
            Ok(found) => {
                writeln!(self.out, "✅ Pokémon encontrado!")?;
                let report = crate::render::report::pokemon(&found)?;
                writeln!(self.out, "{report}")?;
                Ok(State::SavePrompt(Box::new(found)))
            }
            Err(err) if err.is_recoverable() => {
                self.report_lookup_error(name, &err)?;
                Ok(State::ContinuePrompt)
            }
            Err(err) => Err(err),
        }
    }

    fn report_lookup_error(&mut self, name: &str, err: &PokedexError) -> Result<(), PokedexError> {
        match err {
            PokedexError::NotFound { .. } => {
                writeln!(self.out, "❌ Error: Pokémon '{name}' no encontrado")?
            }
            PokedexError::ApiStatus { status, .. } => {
                writeln!(self.out, "❌ Error en la API: Código {status}")?
            }
            PokedexError::Connection { source, .. } if source.is_timeout() => {
                writeln!(self.out, "❌ Error: Tiempo de espera agotado")?
            }
            PokedexError::Connection { .. } => {
                writeln!(self.out, "❌ Error de conexión: Verifica tu internet")?
            }
            PokedexError::DataShape { .. } | PokedexError::MissingField { .. } => {
                warn!(error = %err, "Discarding malformed PokeAPI payload");
                writeln!(self.out, "❌ Error: respuesta inesperada de la PokeAPI ({err})")?
            }
            other => writeln!(self.out, "❌ Error inesperado: {other}")?,
        }
        Ok(())
    }

    async fn save_prompt(&mut self, found: &Pokemon) -> Result<State, PokedexError> {
        let Some(answer) = self
            .ask("\n💾 ¿Quieres guardar esta información en JSON? (s/n): ")
            .await?
        else {
            return self.farewell();
        };

        if !is_affirmative(&answer) {
            writeln!(self.out, "ℹ️  Información no guardada")?;
            return Ok(State::ContinuePrompt);
        }

        match pokemon::save(found, &self.options.output_dir).await {
            Ok(path) => writeln!(self.out, "✅ ¡Guardado exitoso en: {}!", path.display())?,
            Err(err) => {
                warn!(error = %err, "Save failed");
                writeln!(self.out, "❌ No se pudo guardar el archivo: {err}")?;
            }
        }
        Ok(State::ContinuePrompt)
    }

    async fn continue_prompt(&mut self) -> Result<State, PokedexError> {
        if !self.options.confirm_continue {
            writeln!(self.out, "\n{}", "-".repeat(BANNER_WIDTH))?;
            return Ok(State::Prompting);
        }

        match self.ask("\n🔄 ¿Quieres buscar otro Pokémon? (s/n): ").await? {
            Some(answer) if is_affirmative(&answer) => Ok(State::Prompting),
            _ => self.farewell(),
        }
    }
}

/// Feeds stdin lines into a channel from a dedicated thread.
///
/// A plain thread keeps the blocking terminal read off the runtime, so an
/// interrupt can end the process without waiting for the next Enter.
pub fn spawn_stdin_lines() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(1);
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    warn!(error = %err, "Stopped reading stdin");
                    break;
                }
            }
        }
    });
    rx
}
