use crate::output::traits::OutputResult;
use crate::state::Results;
use std::fs;
use std::path::{Path, PathBuf};

/// Saves results as pretty-printed JSON
///
/// When `path` does not exist yet, its parent directory is created and
/// `.json` is appended unless the file name already ends with it. An
/// existing file is overwritten as is.
///
/// # Returns
///
/// * `Ok(PathBuf)` - The path actually written
/// * `Err(OutputError)` - Directory creation, serialization or write failed
pub fn save_results(path: &Path, results: &Results) -> OutputResult<PathBuf> {
    let target = resolve_output_path(path)?;

    let json = serde_json::to_string_pretty(results)?;
    fs::write(&target, json)?;

    tracing::info!("Saved results to {}", target.display());
    Ok(target)
}

fn resolve_output_path(path: &Path) -> OutputResult<PathBuf> {
    if path.exists() {
        return Ok(path.to_path_buf());
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let has_json_extension = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if has_json_extension {
        Ok(path.to_path_buf())
    } else {
        let mut name = path.as_os_str().to_owned();
        name.push(".json");
        Ok(PathBuf::from(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> Results {
        Results {
            urls: vec!["https://example.com/a".to_string()],
            buckets: vec!["b.s3.amazonaws.com".to_string()],
        }
    }

    #[test]
    fn test_appends_extension_and_creates_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/out/results");

        let written = save_results(&path, &sample()).unwrap();
        assert_eq!(written, dir.path().join("nested/out/results.json"));

        let content = fs::read_to_string(&written).unwrap();
        let parsed: Results = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, sample());
        assert!(content.contains("\n"));
    }

    #[test]
    fn test_keeps_json_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.JSON");

        let written = save_results(&path, &sample()).unwrap();
        assert_eq!(written, path);
    }

    #[test]
    fn test_existing_file_is_overwritten_in_place() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.txt");
        fs::write(&path, "old").unwrap();

        let written = save_results(&path, &Results::default()).unwrap();
        assert_eq!(written, path);
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_unwritable_target_fails() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();

        assert!(save_results(&blocker.join("sub/results"), &sample()).is_err());
    }
}
