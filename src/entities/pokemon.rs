use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PokedexError;
use crate::sources::pokeapi::PokeApiClient;

/// How much of the upstream document a lookup keeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum CaptureDepth {
    /// First ten moves, front sprite, capture timestamp.
    #[default]
    Summary,
    /// Every move, front sprite and official artwork.
    Full,
}

impl CaptureDepth {
    pub fn move_limit(self) -> Option<usize> {
        match self {
            Self::Summary => Some(SUMMARY_MOVE_LIMIT),
            Self::Full => None,
        }
    }
}

pub const SUMMARY_MOVE_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: u32,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "altura")]
    pub height_m: f64,
    #[serde(rename = "peso")]
    pub weight_kg: f64,
    #[serde(rename = "tipos")]
    pub types: Vec<String>,
    #[serde(rename = "habilidades")]
    pub abilities: Vec<String>,
    #[serde(rename = "movimientos")]
    pub moves: Vec<String>,
    #[serde(rename = "estadisticas")]
    pub base_stats: BaseStats,
    #[serde(rename = "imagen_frontal")]
    pub sprite_front_url: Option<String>,
    #[serde(flatten)]
    pub capture: CaptureExtras,
}

/// Fields that only one capture depth records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CaptureExtras {
    Summary {
        #[serde(rename = "fecha_consulta")]
        fetched_at: String,
    },
    Full {
        #[serde(rename = "imagen_hd")]
        artwork_url: Option<String>,
    },
}

impl CaptureExtras {
    pub fn artwork_url(&self) -> Option<&str> {
        match self {
            Self::Full { artwork_url } => artwork_url.as_deref(),
            Self::Summary { .. } => None,
        }
    }

    pub fn fetched_at(&self) -> Option<&str> {
        match self {
            Self::Summary { fetched_at } => Some(fetched_at),
            Self::Full { .. } => None,
        }
    }
}

/// The six base stats, serialized in the canonical upstream order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u32,
    #[serde(rename = "ataque")]
    pub attack: u32,
    #[serde(rename = "defensa")]
    pub defense: u32,
    #[serde(rename = "ataque_especial")]
    pub special_attack: u32,
    #[serde(rename = "defensa_especial")]
    pub special_defense: u32,
    #[serde(rename = "velocidad")]
    pub speed: u32,
}

impl BaseStats {
    /// Upstream stat names, in upstream order.
    pub const NAMES: [&'static str; 6] = [
        "hp",
        "attack",
        "defense",
        "special-attack",
        "special-defense",
        "speed",
    ];

    pub fn values(&self) -> [u32; 6] {
        [
            self.hp,
            self.attack,
            self.defense,
            self.special_attack,
            self.special_defense,
            self.speed,
        ]
    }
}

/// Fetches `name` upstream and normalizes it at the given depth.
pub async fn get(
    client: &PokeApiClient,
    name: &str,
    depth: CaptureDepth,
) -> Result<Pokemon, PokedexError> {
    let raw = client.pokemon(name).await?;
    crate::transform::pokemon::from_pokeapi(raw, depth)
}

/// Writes `pokemon` as `<dir>/<name>.json`, replacing any earlier save.
pub async fn save(pokemon: &Pokemon, dir: &Path) -> Result<PathBuf, PokedexError> {
    let body = crate::render::json::to_pretty(pokemon)?;
    let path = crate::utils::store::save_json(dir, &pokemon.name, &body).await?;
    debug!(path = %path.display(), "Saved Pokémon record");
    Ok(path)
}
