//! Loading word vectors from GloVe / word2vec text files.
//!
//! One vector per line: the word followed by its components, separated by
//! whitespace. A leading `count dim` header line (word2vec text format) is
//! recognised and skipped. Keys are lowercased on insert, so lookup is
//! case-insensitive.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use layered_srl::EmbeddingTable;
use tracing::info;

use crate::error::EmbeddingError;

/// Load an embedding file from disk.
///
/// When `vocabulary` is given (lowercased forms), only those words are kept,
/// which keeps a per-document table small.
pub fn load_embeddings(
    path: &Path,
    vocabulary: Option<&HashSet<String>>,
) -> Result<EmbeddingTable, EmbeddingError> {
    let io_error = |source| EmbeddingError::Io {
        path: path.display().to_string(),
        source,
    };
    let file = File::open(path).map_err(io_error)?;
    let table = read_embeddings(BufReader::new(file), vocabulary).map_err(|e| match e {
        EmbeddingError::Io { source, .. } => io_error(source),
        other => other,
    })?;

    info!(
        path = %path.display(),
        vectors = table.len(),
        "loaded embeddings"
    );
    Ok(table)
}

/// Read embeddings from any buffered reader.
pub fn read_embeddings<R: BufRead>(
    reader: R,
    vocabulary: Option<&HashSet<String>>,
) -> Result<EmbeddingTable, EmbeddingError> {
    let mut table = EmbeddingTable::new();
    let mut dimension: Option<usize> = None;
    let mut first_record = true;

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.map_err(|source| EmbeddingError::Io {
            path: String::from("<reader>"),
            source,
        })?;

        let mut fields = line.split_whitespace();
        let word = match fields.next() {
            Some(word) => word,
            None => continue,
        };
        let rest: Vec<&str> = fields.collect();

        if first_record {
            first_record = false;
            if is_header(word, &rest) {
                continue;
            }
        }

        if rest.is_empty() {
            return Err(EmbeddingError::Parse {
                line: line_number,
                reason: format!("{:?} has no vector", word),
            });
        }

        let vector = rest
            .iter()
            .map(|v| v.parse::<f64>())
            .collect::<Result<Vec<f64>, _>>()
            .map_err(|e| EmbeddingError::Parse {
                line: line_number,
                reason: e.to_string(),
            })?;

        match dimension {
            Some(expected) if expected != vector.len() => {
                return Err(EmbeddingError::DimensionMismatch {
                    line: line_number,
                    expected,
                    found: vector.len(),
                });
            }
            Some(_) => {}
            None => dimension = Some(vector.len()),
        }

        if let Some(vocabulary) = vocabulary {
            if !vocabulary.contains(&word.to_lowercase()) {
                continue;
            }
        }
        table.insert(word, vector);
    }

    Ok(table)
}

fn is_header(word: &str, rest: &[&str]) -> bool {
    rest.len() == 1 && word.parse::<usize>().is_ok() && rest[0].parse::<usize>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use layered_srl::EmbeddingSource;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    const GLOVE: &str = "the 0.1 0.2 0.3\nDogs 1.0 2.0 3.0\nrun -0.5 0.0 0.5\n";

    #[test]
    fn test_read_glove() {
        let table = read_embeddings(Cursor::new(GLOVE), None).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.dimension(), Some(3));
        assert_eq!(table.lookup("dogs"), Some(&[1.0, 2.0, 3.0][..]));
    }

    #[test]
    fn test_word2vec_header_is_skipped() {
        let text = format!("3 3\n{}", GLOVE);
        let table = read_embeddings(Cursor::new(text), None).unwrap();
        assert_eq!(table.len(), 3);
        assert!(!table.contains("3"));
    }

    #[test]
    fn test_vocabulary_restriction() {
        let vocabulary: HashSet<String> = ["dogs".to_string()].into_iter().collect();
        let table = read_embeddings(Cursor::new(GLOVE), Some(&vocabulary)).unwrap();

        assert_eq!(table.len(), 1);
        assert!(table.contains("Dogs"));
        assert!(!table.contains("the"));
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = read_embeddings(Cursor::new("a 1 2\nb 1 2 3\n"), None).unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::DimensionMismatch {
                line: 2,
                expected: 2,
                found: 3
            }
        ));
    }

    #[test]
    fn test_bad_component() {
        let err = read_embeddings(Cursor::new("a 1 x\n"), None).unwrap_err();
        assert!(matches!(err, EmbeddingError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", GLOVE).unwrap();

        let table = load_embeddings(file.path(), None).unwrap();
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_missing_file() {
        let err = load_embeddings(Path::new("/nonexistent/glove.txt"), None).unwrap_err();
        match err {
            EmbeddingError::Io { path, .. } => assert_eq!(path, "/nonexistent/glove.txt"),
            other => panic!("unexpected error: {}", other),
        }
    }
}
