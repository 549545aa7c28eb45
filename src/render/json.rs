use serde::Serialize;

use crate::error::PokedexError;

/// Two-space indented JSON; non-ASCII text is written as-is, not escaped.
pub fn to_pretty<T: Serialize>(value: &T) -> Result<String, PokedexError> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::to_pretty;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Demo<'a> {
        nombre: &'a str,
        altura: f64,
    }

    #[test]
    fn to_pretty_serializes_with_indentation() {
        let payload = Demo {
            nombre: "pikachu",
            altura: 0.4,
        };
        let json = to_pretty(&payload).expect("json");
        assert!(json.contains('\n'));
        assert!(json.contains("  \"nombre\": \"pikachu\""));
        assert!(json.contains("\"altura\": 0.4"));
    }

    #[test]
    fn to_pretty_keeps_non_ascii_unescaped() {
        let payload = Demo {
            nombre: "flabébé",
            altura: 0.1,
        };
        let json = to_pretty(&payload).expect("json");
        assert!(json.contains("\"nombre\": \"flabébé\""));
        assert!(!json.contains("\\u"));
    }
}
