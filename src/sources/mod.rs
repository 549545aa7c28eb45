//! Source clients and shared HTTP utilities for the upstream creature API.

use std::borrow::Cow;
use std::sync::OnceLock;

use crate::error::PokedexError;

pub(crate) mod pokeapi;

pub(crate) const DEFAULT_MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

static HTTP_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

pub(crate) fn env_base(default: &'static str, env_var: &str) -> Cow<'static, str> {
    std::env::var(env_var)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(Cow::Owned)
        .unwrap_or_else(|| Cow::Borrowed(default))
}

/// Returns a shared HTTP client.
///
/// No retry, cache or timeout layers: a lookup is a single request with the
/// transport defaults, and a failure is reported straight back to the user.
pub(crate) fn shared_client() -> Result<reqwest::Client, PokedexError> {
    if let Some(client) = HTTP_CLIENT.get() {
        return Ok(client.clone());
    }

    let client = reqwest::Client::builder()
        .user_agent(concat!("pokedex-cli/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(PokedexError::HttpClientInit)?;

    match HTTP_CLIENT.set(client.clone()) {
        Ok(()) => Ok(client),
        Err(_) => HTTP_CLIENT.get().cloned().ok_or_else(|| PokedexError::Api {
            api: "http-client".into(),
            message: "Shared HTTP client initialization race".into(),
        }),
    }
}

/// Maps a failed request or body read to the error the user sees. Transport
/// failures (refused, reset, timed out) are connection errors; a request that
/// could not even be built stays a plain HTTP error.
pub(crate) fn transport_error(api: &str, err: reqwest::Error) -> PokedexError {
    if err.is_builder() {
        PokedexError::Http(err)
    } else {
        PokedexError::Connection {
            api: api.to_string(),
            source: err,
        }
    }
}

pub(crate) async fn read_limited_body(
    mut resp: reqwest::Response,
    api: &str,
) -> Result<Vec<u8>, PokedexError> {
    let mut body: Vec<u8> = Vec::new();

    while let Some(chunk) = resp
        .chunk()
        .await
        .map_err(|err| transport_error(api, err))?
    {
        let next_len = body.len().saturating_add(chunk.len());
        if next_len > DEFAULT_MAX_BODY_BYTES {
            return Err(PokedexError::Api {
                api: api.to_string(),
                message: format!("Response body exceeded {DEFAULT_MAX_BODY_BYTES} bytes"),
            });
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}
