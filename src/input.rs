//! Seed input
//!
//! Seeds are read one per line from a file or from standard input (`-`).
//! Surrounding whitespace is trimmed and blank lines are skipped. Seeds are
//! not validated here; a malformed seed fails its own session only.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Reads seeds from any buffered reader
pub fn read_seeds_from<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    let mut seeds = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let seed = line.trim();
        if !seed.is_empty() {
            seeds.push(seed.to_string());
        }
    }

    Ok(seeds)
}

/// Reads seeds from a file path, or from standard input when `source` is `-`
///
/// # Example
///
/// ```no_run
/// use sigrawler::input::read_seeds;
///
/// let seeds = read_seeds("targets.txt").unwrap();
/// ```
pub fn read_seeds(source: &str) -> io::Result<Vec<String>> {
    if source == "-" {
        let stdin = io::stdin();
        return read_seeds_from(stdin.lock());
    }

    let file = File::open(Path::new(source))?;
    read_seeds_from(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    #[test]
    fn test_trims_and_skips_blank_lines() {
        let input = "https://example.com\n\n   \n  http://test.org/path  \r\nexample.net\n";
        let seeds = read_seeds_from(Cursor::new(input)).unwrap();

        assert_eq!(
            seeds,
            vec!["https://example.com", "http://test.org/path", "example.net"]
        );
    }

    #[test]
    fn test_keeps_duplicates_and_order() {
        let seeds = read_seeds_from(Cursor::new("b.com\na.com\nb.com")).unwrap();
        assert_eq!(seeds, vec!["b.com", "a.com", "b.com"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(read_seeds_from(Cursor::new("")).unwrap().is_empty());
    }

    #[test]
    fn test_read_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "https://example.com").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "https://example.org").unwrap();

        let seeds = read_seeds(file.path().to_str().unwrap()).unwrap();
        assert_eq!(seeds, vec!["https://example.com", "https://example.org"]);
    }

    #[test]
    fn test_missing_file() {
        assert!(read_seeds("/nonexistent/seeds.txt").is_err());
    }
}
