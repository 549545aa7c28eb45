use time::OffsetDateTime;
use time::macros::format_description;
use tracing::warn;

use crate::entities::pokemon::{BaseStats, CaptureDepth, CaptureExtras, Pokemon};
use crate::error::PokedexError;
use crate::sources::pokeapi::{PokeApiPokemon, PokeApiStat};

pub fn from_pokeapi(raw: PokeApiPokemon, depth: CaptureDepth) -> Result<Pokemon, PokedexError> {
    from_pokeapi_at(raw, depth, OffsetDateTime::now_utc())
}

pub(crate) fn from_pokeapi_at(
    raw: PokeApiPokemon,
    depth: CaptureDepth,
    now: OffsetDateTime,
) -> Result<Pokemon, PokedexError> {
    let base_stats = base_stats(&raw.stats)?;

    let mut moves = raw
        .moves
        .into_iter()
        .map(|entry| entry.move_.name)
        .collect::<Vec<_>>();
    if let Some(limit) = depth.move_limit() {
        moves.truncate(limit);
    }

    let capture = match depth {
        CaptureDepth::Summary => CaptureExtras::Summary {
            fetched_at: fetched_at(now)?,
        },
        CaptureDepth::Full => CaptureExtras::Full {
            artwork_url: raw
                .sprites
                .other
                .and_then(|other| other.official_artwork)
                .and_then(|artwork| artwork.front_default),
        },
    };

    Ok(Pokemon {
        id: raw.id,
        name: raw.name,
        height_m: tenths(raw.height),
        weight_kg: tenths(raw.weight),
        types: raw.types.into_iter().map(|slot| slot.kind.name).collect(),
        abilities: raw
            .abilities
            .into_iter()
            .map(|slot| slot.ability.name)
            .collect(),
        moves,
        base_stats,
        sprite_front_url: raw.sprites.front_default,
        capture,
    })
}

fn fetched_at(now: OffsetDateTime) -> Result<String, PokedexError> {
    Ok(now.format(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    ))?)
}

fn tenths(value: u32) -> f64 {
    f64::from(value) / 10.0
}

/// Maps stats by their own name, so upstream reordering is harmless.
fn base_stats(stats: &[PokeApiStat]) -> Result<BaseStats, PokedexError> {
    let mut slots: [Option<u32>; 6] = [None; 6];
    for entry in stats {
        match BaseStats::NAMES
            .iter()
            .position(|name| *name == entry.stat.name)
        {
            Some(idx) if slots[idx].is_some() => {
                warn!(stat = %entry.stat.name, "Ignoring repeated PokeAPI stat");
            }
            Some(idx) => slots[idx] = Some(entry.base_stat),
            None => warn!(stat = %entry.stat.name, "Ignoring unknown PokeAPI stat"),
        }
    }

    let [hp, attack, defense, special_attack, special_defense, speed] =
        std::array::from_fn(|idx| {
            slots[idx].ok_or_else(|| PokedexError::MissingField {
                api: "pokeapi".into(),
                field: format!("stats[{}]", BaseStats::NAMES[idx]),
            })
        });

    Ok(BaseStats {
        hp: hp?,
        attack: attack?,
        defense: defense?,
        special_attack: special_attack?,
        special_defense: special_defense?,
        speed: speed?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::pokeapi::fixtures;
    use time::macros::datetime;

    #[test]
    fn from_pokeapi_maps_summary_fields() {
        let out = from_pokeapi_at(
            fixtures::pikachu_typed(),
            CaptureDepth::Summary,
            datetime!(2026-10-14 09:05:03 UTC),
        )
        .unwrap();

        assert_eq!(out.id, 25);
        assert_eq!(out.name, "pikachu");
        assert_eq!(out.height_m, 0.4);
        assert_eq!(out.weight_kg, 6.0);
        assert_eq!(out.types, vec!["electric"]);
        assert_eq!(out.abilities, vec!["static", "lightning-rod"]);
        assert_eq!(out.moves.len(), 10);
        assert_eq!(out.moves[0], "mega-punch");
        assert_eq!(out.moves[9], "double-edge");
        assert_eq!(out.capture.fetched_at(), Some("2026-10-14 09:05:03"));
        assert!(out.capture.artwork_url().is_none());
    }

    #[test]
    fn from_pokeapi_full_keeps_every_move_and_artwork() {
        let out = from_pokeapi(fixtures::pikachu_typed(), CaptureDepth::Full).unwrap();

        assert_eq!(out.moves.len(), 12);
        assert_eq!(out.moves.last().map(String::as_str), Some("growl"));
        assert!(
            out.capture
                .artwork_url()
                .is_some_and(|url| url.ends_with("official-artwork/25.png"))
        );
        assert!(out.capture.fetched_at().is_none());
    }

    #[test]
    fn from_pokeapi_full_tolerates_null_artwork() {
        let mut raw = fixtures::pikachu_typed();
        raw.sprites.other = None;
        raw.sprites.front_default = None;

        let out = from_pokeapi(raw, CaptureDepth::Full).unwrap();
        assert_eq!(out.capture, CaptureExtras::Full { artwork_url: None });
        assert!(out.sprite_front_url.is_none());
    }

    #[test]
    fn base_stats_survive_reordering() {
        let mut raw = fixtures::pikachu_typed();
        raw.stats.reverse();

        let out = from_pokeapi(raw, CaptureDepth::Full).unwrap();
        assert_eq!(out.base_stats.hp, 35);
        assert_eq!(out.base_stats.speed, 90);
        assert_eq!(out.base_stats.values(), [35, 55, 40, 50, 50, 90]);
    }

    #[test]
    fn missing_stat_is_a_shape_error() {
        let mut raw = fixtures::pikachu_typed();
        raw.stats.retain(|entry| entry.stat.name != "special-defense");

        let err = from_pokeapi(raw, CaptureDepth::Summary).unwrap_err();
        assert!(matches!(err, PokedexError::MissingField { ref field, .. } if field == "stats[special-defense]"));
    }

    #[test]
    fn repeated_stat_keeps_first_value() {
        let mut raw = fixtures::pikachu_typed();
        let mut extra = raw.stats[0].clone();
        extra.base_stat = 999;
        raw.stats.push(extra);

        let out = from_pokeapi(raw, CaptureDepth::Summary).unwrap();
        assert_eq!(out.base_stats.hp, 35);
    }

    #[test]
    fn tenths_divides_exactly() {
        assert_eq!(tenths(0), 0.0);
        assert_eq!(tenths(4), 0.4);
        assert_eq!(tenths(60), 6.0);
        assert_eq!(tenths(9999), 999.9);
    }
}
