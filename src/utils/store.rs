use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::io::AsyncWriteExt;

use crate::error::PokedexError;

const FALLBACK_STEM: &str = "pokemon";

/// Turns an entity name into a file stem that stays inside the target
/// directory on every platform.
///
/// Keeps lower-case ASCII letters, digits, `-`, `_` and inner `.`; anything
/// else becomes `_`. Leading dots are dropped so the result is never hidden
/// or a relative path component.
pub fn sanitize_file_stem(name: &str) -> String {
    let mapped = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' | '_' | '.' => c,
            _ => '_',
        })
        .collect::<String>();

    let stem = mapped.trim_start_matches('.').trim_end_matches('.');
    if stem.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        stem.to_string()
    }
}

pub fn json_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.json", sanitize_file_stem(name)))
}

/// Writes `content` to `<dir>/<stem>.json`, creating `dir` when missing.
///
/// The body goes to a uniquely named temp file first and is renamed over the
/// target, so a reader never sees a half-written record. An existing file is
/// replaced.
pub async fn save_json(dir: &Path, name: &str, content: &str) -> Result<PathBuf, PokedexError> {
    let path = json_path(dir, name);
    let persist = |source: std::io::Error| PokedexError::Persist {
        path: path.clone(),
        source,
    };

    tokio::fs::create_dir_all(dir).await.map_err(persist)?;

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let stem = sanitize_file_stem(name);
    let mut tmp_path = None;
    let mut file_opt = None;
    for attempt in 0..32_u32 {
        let candidate = dir.join(format!(
            ".{stem}.{}.{}.tmp",
            std::process::id(),
            seed.saturating_add(attempt as u128)
        ));
        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
            .await
        {
            Ok(file) => {
                tmp_path = Some(candidate);
                file_opt = Some(file);
                break;
            }
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(err) => return Err(persist(err)),
        }
    }
    let (Some(tmp_path), Some(mut file)) = (tmp_path, file_opt) else {
        return Err(persist(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            "Unable to allocate temporary file",
        )));
    };

    let written = async {
        file.write_all(content.as_bytes()).await?;
        file.write_all(b"\n").await?;
        file.flush().await?;
        file.sync_all().await
    }
    .await;
    drop(file);
    if let Err(err) = written {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(persist(err));
    }

    if let Err(err) = tokio::fs::rename(&tmp_path, &path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(persist(err));
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_canonical_names() {
        assert_eq!(sanitize_file_stem("pikachu"), "pikachu");
        assert_eq!(sanitize_file_stem("mr-mime"), "mr-mime");
        assert_eq!(sanitize_file_stem("Porygon2"), "porygon2");
    }

    #[test]
    fn sanitize_replaces_separators_and_reserved_characters() {
        assert_eq!(sanitize_file_stem("../etc/passwd"), "_etc_passwd");
        assert_eq!(sanitize_file_stem("a\\b:c*d?\"e<f>g|h"), "a_b_c_d__e_f_g_h");
        assert_eq!(sanitize_file_stem("farfetch’d"), "farfetch_d");
    }

    #[test]
    fn sanitize_never_returns_empty_or_dot_names() {
        assert_eq!(sanitize_file_stem(""), "pokemon");
        assert_eq!(sanitize_file_stem(".."), "pokemon");
        assert_eq!(sanitize_file_stem(".hidden."), "hidden");
    }

    #[tokio::test]
    async fn save_json_creates_directory_and_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("pokedex_json");

        let first = save_json(&dir, "pikachu", "{\"v\": 1}").await.unwrap();
        assert_eq!(first, dir.join("pikachu.json"));
        let second = save_json(&dir, "pikachu", "{\"v\": 2}").await.unwrap();
        assert_eq!(first, second);

        assert_eq!(std::fs::read_to_string(&second).unwrap(), "{\"v\": 2}\n");
        let entries = std::fs::read_dir(&dir).unwrap().count();
        assert_eq!(entries, 1, "temp files should not be left behind");
    }

    #[tokio::test]
    async fn save_json_keeps_non_ascii_text() {
        let tmp = tempfile::tempdir().unwrap();
        let path = save_json(tmp.path(), "flabébé", "{\"nombre\": \"flabébé\"}")
            .await
            .unwrap();
        assert_eq!(path, tmp.path().join("flab_b_.json"));
        assert!(std::fs::read_to_string(path).unwrap().contains("flabébé"));
    }

    #[tokio::test]
    async fn save_json_reports_unwritable_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not_a_dir");
        std::fs::write(&blocker, "file").unwrap();

        let err = save_json(&blocker, "pikachu", "{}").await.unwrap_err();
        match err {
            PokedexError::Persist { path, .. } => assert_eq!(path, blocker.join("pikachu.json")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
