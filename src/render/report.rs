use std::sync::OnceLock;

use minijinja::{Environment, Value, context};
use serde::Serialize;

use crate::entities::pokemon::{Pokemon, SUMMARY_MOVE_LIMIT};
use crate::error::PokedexError;

static ENV: OnceLock<Environment<'static>> = OnceLock::new();

pub const RULE_WIDTH: usize = 60;

const STAT_LABELS: [&str; 6] = [
    "❤️  HP",
    "⚔️  Ataque",
    "🛡️  Defensa",
    "🔥 Ataque Especial",
    "❄️  Defensa Especial",
    "🏃 Velocidad",
];

#[derive(Serialize)]
struct StatRow {
    label: &'static str,
    value: u32,
}

/// Formats a tenths value the way the saved JSON shows it: always with a
/// fractional part (`6.0`, `0.4`).
fn decimal(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        v.to_string()
    }
}

fn env() -> Result<&'static Environment<'static>, PokedexError> {
    if let Some(env) = ENV.get() {
        return Ok(env);
    }

    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_filter("decimal", decimal);
    env.add_filter("rjust", |v: Value, width: usize| -> String {
        format!("{:>width$}", v.to_string())
    });
    env.add_template(
        "pokemon.txt.j2",
        include_str!("../../templates/pokemon.txt.j2"),
    )?;

    Ok(ENV.get_or_init(|| env))
}

fn moves_heading(pokemon: &Pokemon) -> String {
    match pokemon.capture.fetched_at() {
        // Summary captures keep only the head of the list.
        Some(_) => format!("MOVIMIENTOS (primeros {SUMMARY_MOVE_LIMIT})"),
        None => format!("MOVIMIENTOS ({} en total)", pokemon.moves.len()),
    }
}

/// Renders the console report for one Pokémon.
pub fn pokemon(pokemon: &Pokemon) -> Result<String, PokedexError> {
    let stats = STAT_LABELS
        .into_iter()
        .zip(pokemon.base_stats.values())
        .map(|(label, value)| StatRow { label, value })
        .collect::<Vec<_>>();

    let tmpl = env()?.get_template("pokemon.txt.j2")?;
    Ok(tmpl.render(context! {
        rule => "=".repeat(RULE_WIDTH),
        id => pokemon.id,
        name => &pokemon.name,
        height_m => pokemon.height_m,
        weight_kg => pokemon.weight_kg,
        types => &pokemon.types,
        abilities => &pokemon.abilities,
        stats => stats,
        moves_heading => moves_heading(pokemon),
        moves => &pokemon.moves,
        sprite_front_url => pokemon.sprite_front_url.as_deref(),
        artwork_url => pokemon.capture.artwork_url(),
        fetched_at => pokemon.capture.fetched_at(),
    })?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::pokemon::{CaptureDepth, CaptureExtras};
    use crate::sources::pokeapi::fixtures;

    fn pikachu(depth: CaptureDepth) -> Pokemon {
        crate::transform::pokemon::from_pokeapi(fixtures::pikachu_typed(), depth).unwrap()
    }

    #[test]
    fn decimal_always_has_fraction() {
        assert_eq!(decimal(6.0), "6.0");
        assert_eq!(decimal(0.4), "0.4");
        assert_eq!(decimal(999.9), "999.9");
        assert_eq!(decimal(0.0), "0.0");
    }

    #[test]
    fn report_contains_every_section() {
        let out = pokemon(&pikachu(CaptureDepth::Summary)).unwrap();

        assert!(out.contains("🎯 POKÉDEX - PIKACHU (#25)"));
        assert!(out.contains("⚖️  Peso: 6.0 kg"));
        assert!(out.contains("📏 Altura: 0.4 m"));
        assert!(out.contains("🎨 Tipos: electric"));
        assert!(out.contains("💪 Habilidades: static, lightning-rod"));
        assert!(out.contains("   ❤️  HP: 35"));
        assert!(out.contains("   🏃 Velocidad: 90"));
        assert!(out.contains("👊 MOVIMIENTOS (primeros 10):"));
        assert!(out.contains("    1. mega-punch"));
        assert!(out.contains("   10. double-edge"));
        assert!(!out.contains("tail-whip"));
        assert!(out.contains("🖼️  Imagen frontal: https://"));
        assert!(out.contains("🕒 Consultado: "));
        assert!(!out.contains("Imagen HD"));
        assert!(out.starts_with(&format!("\n{}\n", "=".repeat(RULE_WIDTH))));
        assert!(out.ends_with(&"=".repeat(RULE_WIDTH)));
    }

    #[test]
    fn full_report_lists_all_moves_and_artwork() {
        let out = pokemon(&pikachu(CaptureDepth::Full)).unwrap();

        assert!(out.contains("👊 MOVIMIENTOS (12 en total):"));
        assert!(out.contains("   12. growl"));
        assert!(out.contains("🌟 Imagen HD: https://"));
        assert!(!out.contains("Consultado"));
    }

    #[test]
    fn report_omits_missing_sprites() {
        let mut record = pikachu(CaptureDepth::Full);
        record.sprite_front_url = None;
        record.capture = CaptureExtras::Full { artwork_url: None };

        let out = pokemon(&record).unwrap();
        assert!(!out.contains("Imagen frontal"));
        assert!(!out.contains("Imagen HD"));
    }

    #[test]
    fn report_is_stable_for_same_record() {
        let record = pikachu(CaptureDepth::Full);
        assert_eq!(pokemon(&record).unwrap(), pokemon(&record).unwrap());
    }
}
