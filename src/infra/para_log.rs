// ============================================================
// Layer 6 — Run Options Log
// ============================================================
// Writes the options of a run to <log_dir>/para/<time>.json so
// every prepared dataset can be traced back to the settings
// that produced it.
//
// A second run with the same stem gets `<time>-1.json`, then
// `<time>-2.json`, and so on; existing logs are never replaced.
//
// Example output (log/para/1792145700123.json):
//   {
//     "pair_file": "data/pairs.tsv",
//     "max_length": 10,
//     "min_count": 3,
//     ...
//   }

use anyhow::{Context, Result};
use serde::Serialize;
use std::{
    fs::{self, OpenOptions},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

/// Serialise `opts` to `<log_dir>/para/<time>.json`, creating the directory.
pub fn write_para_log<T: Serialize>(log_dir: impl AsRef<Path>, opts: &T, time: &str) -> Result<PathBuf> {
    let dir = log_dir.as_ref().join("para");
    fs::create_dir_all(&dir).with_context(|| format!("Cannot create '{}'", dir.display()))?;

    let json = serde_json::to_string_pretty(opts)?;

    let mut attempt = 0usize;
    let (path, mut file) = loop {
        let stem = if attempt == 0 { time.to_string() } else { format!("{time}-{attempt}") };
        let path = dir.join(format!("{stem}.json"));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => break (path, file),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => {
                return Err(e).with_context(|| format!("Cannot create '{}'", path.display()));
            }
        }
    };
    file.write_all(json.as_bytes())
        .with_context(|| format!("Cannot write '{}'", path.display()))?;

    tracing::debug!("Run options written to '{}'", path.display());
    Ok(path)
}

/// Milliseconds since the Unix epoch, used as the log file stem.
pub fn timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis().to_string())
        .unwrap_or_else(|_| "0".to_string())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Opts {
        max_length: usize,
        corpus:     String,
    }

    #[test]
    fn test_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let opts = Opts { max_length: 10, corpus: "chat".into() };

        let path = write_para_log(dir.path(), &opts, "run1").unwrap();
        assert_eq!(path, dir.path().join("para").join("run1.json"));

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["max_length"], 10);
        assert_eq!(value["corpus"], "chat");
    }

    #[test]
    fn test_same_stem_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let first  = Opts { max_length: 10, corpus: "a".into() };
        let second = Opts { max_length: 20, corpus: "b".into() };

        let p1 = write_para_log(dir.path(), &first, "1700000000000").unwrap();
        let p2 = write_para_log(dir.path(), &second, "1700000000000").unwrap();
        let p3 = write_para_log(dir.path(), &second, "1700000000000").unwrap();

        assert_ne!(p1, p2);
        assert_eq!(p2, dir.path().join("para").join("1700000000000-1.json"));
        assert_eq!(p3, dir.path().join("para").join("1700000000000-2.json"));

        let kept: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&p1).unwrap()).unwrap();
        assert_eq!(kept["corpus"], "a");
    }

    #[test]
    fn test_timestamp_has_millisecond_resolution() {
        let stamp = timestamp().parse::<u128>().unwrap();
        let secs = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs() as u128;
        // milliseconds, not seconds
        assert!(stamp >= secs * 1000 - 1000);
    }
}
