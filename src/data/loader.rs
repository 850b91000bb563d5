// ============================================================
// Layer 4 — TSV Pair Loader
// ============================================================
// Reads the two tab-separated input files.
//
// Pair file — exactly three columns per line:
//
//   input sentence \t output sentence \t node ids
//   "where is it"  \t "over there"     \t "12 40 7"
//
//   Node ids are space-separated unsigned integers.
//   An empty third column means the pair has no graph.
//
// Sentence file — any number of columns per line; the last
// column is metadata and is dropped, the rest are sentences
// used to count vocabulary words.
//
// Malformed rows are errors that name the file and line.
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §12 (I/O and File Handling)

use anyhow::{bail, Context, Result};
use std::{fs, path::{Path, PathBuf}};

use crate::domain::sentence_pair::{NodeId, SentencePair};
use crate::domain::traits::PairSource;

/// Loads pairs and corpus sentences from two TSV files.
/// Implements the PairSource trait from Layer 3.
pub struct TsvPairLoader {
    pair_file:     PathBuf,
    sentence_file: PathBuf,
}

impl TsvPairLoader {
    pub fn new(pair_file: impl Into<PathBuf>, sentence_file: impl Into<PathBuf>) -> Self {
        Self {
            pair_file:     pair_file.into(),
            sentence_file: sentence_file.into(),
        }
    }
}

impl PairSource for TsvPairLoader {
    fn load_pairs(&self) -> Result<Vec<SentencePair>> {
        read_pairs(&self.pair_file)
    }

    fn load_sentences(&self) -> Result<Vec<Vec<String>>> {
        read_sentences(&self.sentence_file)
    }
}

/// Read every row of a pair file.
pub fn read_pairs(path: &Path) -> Result<Vec<SentencePair>> {
    tracing::info!("Reading pairs from '{}'", path.display());
    let text = read_text(path)?;

    let pairs = text
        .lines()
        .enumerate()
        .map(|(i, line)| {
            parse_pair_line(line)
                .with_context(|| format!("{}:{}: malformed pair row", path.display(), i + 1))
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!("Parsed {} pair rows", pairs.len());
    Ok(pairs)
}

/// Read every row of a sentence file, dropping each row's last column.
pub fn read_sentences(path: &Path) -> Result<Vec<Vec<String>>> {
    tracing::info!("Reading sentences from '{}'", path.display());
    let text = read_text(path)?;

    let rows: Vec<Vec<String>> = text.lines().map(parse_sentence_line).collect();
    tracing::debug!("Parsed {} sentence rows", rows.len());
    Ok(rows)
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Cannot read '{}'", path.display()))
}

/// Parse `input \t output \t node ids` into a SentencePair.
pub fn parse_pair_line(line: &str) -> Result<SentencePair> {
    let columns: Vec<&str> = line.split('\t').collect();
    if columns.len() != 3 {
        bail!("expected 3 tab-separated columns, found {}", columns.len());
    }

    Ok(SentencePair::new(columns[0], columns[1], parse_node_ids(columns[2])?))
}

/// Parse space-separated node ids; an empty column is an empty graph.
pub fn parse_node_ids(column: &str) -> Result<Vec<NodeId>> {
    if column.is_empty() {
        return Ok(Vec::new());
    }
    column
        .split(' ')
        .map(|id| {
            id.parse::<NodeId>()
                .with_context(|| format!("invalid graph node id '{id}'"))
        })
        .collect()
}

/// Every column except the last one
pub fn parse_sentence_line(line: &str) -> Vec<String> {
    let mut columns: Vec<String> = line.split('\t').map(str::to_string).collect();
    columns.pop();
    columns
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn test_parse_pair_line() {
        let pair = parse_pair_line("hi there\thello\t3 1 4").unwrap();
        assert_eq!(pair.input, "hi there");
        assert_eq!(pair.output, "hello");
        assert_eq!(pair.graph, vec![3, 1, 4]);
    }

    #[test]
    fn test_empty_graph_column() {
        let pair = parse_pair_line("a\tb\t").unwrap();
        assert!(pair.graph.is_empty());
    }

    #[test]
    fn test_wrong_column_count() {
        assert!(parse_pair_line("only\ttwo").is_err());
        assert!(parse_pair_line("a\tb\t1\textra").is_err());
    }

    #[test]
    fn test_bad_node_id() {
        assert!(parse_pair_line("a\tb\t1 x").is_err());
        assert!(parse_pair_line("a\tb\t1  2").is_err());
        assert!(parse_pair_line("a\tb\t-1").is_err());
    }

    #[test]
    fn test_sentence_line_drops_last_column() {
        assert_eq!(parse_sentence_line("q\tr\tmeta"), vec!["q", "r"]);
        assert!(parse_sentence_line("lonely").is_empty());
    }

    #[test]
    fn test_load_files() {
        let pairs = write_temp("how are you\tfine\t1 2\r\nbye\tsee you\t\n");
        let sents = write_temp("how are you\tfine\tx\nbye\tsee you\ty\n");
        let loader = TsvPairLoader::new(pairs.path(), sents.path());

        let loaded = loader.load_pairs().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].graph, vec![1, 2]);
        assert_eq!(loaded[1].output, "see you");
        assert!(loaded[1].graph.is_empty());

        let rows = loader.load_sentences().unwrap();
        assert_eq!(rows, vec![vec!["how are you", "fine"], vec!["bye", "see you"]]);
    }

    #[test]
    fn test_error_names_line() {
        let pairs = write_temp("a\tb\t1\nbroken row\n");
        let loader = TsvPairLoader::new(pairs.path(), pairs.path());
        let err = format!("{:#}", loader.load_pairs().unwrap_err());
        assert!(err.contains(":2:"), "{err}");
    }

    #[test]
    fn test_missing_file() {
        let loader = TsvPairLoader::new("/nonexistent/pairs.tsv", "/nonexistent/s.tsv");
        assert!(loader.load_pairs().is_err());
    }
}
