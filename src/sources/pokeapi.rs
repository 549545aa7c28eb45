use std::borrow::Cow;

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::error::PokedexError;

const POKEAPI_BASE: &str = "https://pokeapi.co/api/v2/pokemon";
const POKEAPI_API: &str = "pokeapi";
const POKEAPI_BASE_ENV: &str = "POKEDEX_POKEAPI_BASE";

pub struct PokeApiClient {
    client: reqwest::Client,
    base: Cow<'static, str>,
}

impl PokeApiClient {
    pub fn new() -> Result<Self, PokedexError> {
        Ok(Self {
            client: crate::sources::shared_client()?,
            base: crate::sources::env_base(POKEAPI_BASE, POKEAPI_BASE_ENV),
        })
    }

    #[cfg(test)]
    pub(crate) fn new_for_test(base: String) -> Result<Self, PokedexError> {
        Ok(Self::with_http_client(crate::sources::shared_client()?, base))
    }

    #[cfg(test)]
    pub(crate) fn with_http_client(client: reqwest::Client, base: String) -> Self {
        Self {
            client,
            base: Cow::Owned(base),
        }
    }

    /// URL of the lookup for `name`: the trimmed, lower-cased name appended
    /// to the base as a single percent-encoded path segment.
    ///
    /// A name made only of dots would collapse into a relative segment and
    /// point back at the listing, so it is reported as not found.
    pub fn endpoint(&self, name: &str) -> Result<reqwest::Url, PokedexError> {
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return Err(PokedexError::InvalidArgument(
                "Pokémon name is required".into(),
            ));
        }
        if name.chars().all(|c| c == '.') {
            return Err(PokedexError::NotFound { name });
        }

        let mut url = reqwest::Url::parse(self.base.as_ref()).map_err(|err| {
            PokedexError::InvalidArgument(format!(
                "Invalid {POKEAPI_BASE_ENV} '{}': {err}",
                self.base
            ))
        })?;
        url.path_segments_mut()
            .map_err(|()| {
                PokedexError::InvalidArgument(format!(
                    "{POKEAPI_BASE_ENV} '{}' cannot be used as a base URL",
                    self.base
                ))
            })?
            .pop_if_empty()
            .push(&name);
        Ok(url)
    }

    pub async fn pokemon(&self, name: &str) -> Result<PokeApiPokemon, PokedexError> {
        let url = self.endpoint(name)?;
        debug!(url = %url, "PokeAPI lookup");

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| crate::sources::transport_error(POKEAPI_API, err))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(PokedexError::NotFound {
                name: name.trim().to_string(),
            });
        }

        let bytes = crate::sources::read_limited_body(resp, POKEAPI_API).await?;
        if status != StatusCode::OK {
            debug!(
                status = status.as_u16(),
                body_len = bytes.len(),
                "PokeAPI returned an error status"
            );
            return Err(PokedexError::ApiStatus {
                api: POKEAPI_API.to_string(),
                status: status.as_u16(),
            });
        }

        serde_json::from_slice(&bytes).map_err(|source| PokedexError::DataShape {
            api: POKEAPI_API.to_string(),
            source,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PokeApiPokemon {
    pub id: u32,
    pub name: String,
    /// Decimetres.
    pub height: u32,
    /// Hectograms.
    pub weight: u32,
    pub types: Vec<PokeApiTypeSlot>,
    pub abilities: Vec<PokeApiAbilitySlot>,
    pub moves: Vec<PokeApiMoveEntry>,
    pub stats: Vec<PokeApiStat>,
    pub sprites: PokeApiSprites,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PokeApiNamedResource {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PokeApiTypeSlot {
    #[serde(rename = "type")]
    pub kind: PokeApiNamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PokeApiAbilitySlot {
    pub ability: PokeApiNamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PokeApiMoveEntry {
    #[serde(rename = "move")]
    pub move_: PokeApiNamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PokeApiStat {
    pub base_stat: u32,
    pub stat: PokeApiNamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PokeApiSprites {
    pub front_default: Option<String>,
    pub other: Option<PokeApiOtherSprites>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PokeApiOtherSprites {
    #[serde(rename = "official-artwork")]
    pub official_artwork: Option<PokeApiArtwork>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PokeApiArtwork {
    pub front_default: Option<String>,
}
