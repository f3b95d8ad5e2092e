//! CSV manifest handling
//!
//! A manifest is a header row plus one row per file. Every stage loads a
//! manifest, enriches it with its own columns and writes the whole table back
//! out, so column order and any columns a stage does not understand are
//! preserved verbatim.

use crate::error::{CliError, Result};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Tabular record set read from (and written back to) CSV
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    source: PathBuf,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Manifest {
    /// Create an in-memory manifest with the given header row
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            source: PathBuf::from("<memory>"),
            headers,
            rows: Vec::new(),
        }
    }

    /// Load a manifest from a CSV file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CliError::ManifestNotFound(path.display().to_string()));
        }

        let file = std::fs::File::open(path)?;
        Self::from_reader(file, path)
    }

    /// Parse a manifest from any reader; `source` is only used in messages
    pub fn from_reader<R: Read>(reader: R, source: impl AsRef<Path>) -> Result<Self> {
        let source = source.as_ref().to_path_buf();
        let invalid = |reason: String| CliError::invalid_manifest(source.display().to_string(), reason);

        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| invalid(format!("unreadable header row: {}", e)))?
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
                h.trim().to_string()
            })
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(invalid("manifest has no header row".to_string()));
        }

        let mut manifest = Self {
            source: source.clone(),
            headers,
            rows: Vec::new(),
        };
        for record in reader.records() {
            let record = record.map_err(|e| invalid(format!("unreadable row: {}", e)))?;
            manifest.push_row(record.iter().map(str::to_string).collect());
        }

        Ok(manifest)
    }

    /// Write the manifest to a CSV file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(path)?;
        self.write_to(file)
    }

    /// Write the manifest as CSV to any writer
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Path the manifest was loaded from
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row, padded or truncated to the header width so missing
    /// fields surface as blank values
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    /// Index of a column, if present
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of a column the stage cannot run without
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column(name).ok_or_else(|| {
            CliError::invalid_manifest(
                self.source.display().to_string(),
                format!("missing required column '{}'", name),
            )
        })
    }

    /// Index of a column, appending it (blank for every row) when absent
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(idx) = self.column(name) {
            return idx;
        }
        self.headers.push(name.to_string());
        for row in &mut self.rows {
            row.push(String::new());
        }
        self.headers.len() - 1
    }

    /// Field at (`row`, `col`), blank when out of range
    pub fn get(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Field in the named column, blank when the column is absent
    pub fn value(&self, row: usize, column: &str) -> &str {
        match self.column(column) {
            Some(col) => self.get(row, col),
            None => "",
        }
    }

    /// Overwrite the field at (`row`, `col`)
    pub fn set(&mut self, row: usize, col: usize, value: impl Into<String>) {
        if let Some(field) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *field = value.into();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(csv: &str) -> Manifest {
        Manifest::from_reader(csv.as_bytes(), "test.csv").unwrap()
    }

    #[test]
    fn test_load_preserves_columns_and_order() {
        let manifest = parse("filename,s3_url,new_name\nx.wav,https://a/x,song.wav\n");
        assert_eq!(manifest.headers(), &["filename", "s3_url", "new_name"]);
        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.value(0, "new_name"), "song.wav");
        assert_eq!(manifest.value(0, "missing"), "");
    }

    #[test]
    fn test_ragged_rows_are_normalized() {
        let manifest = parse("a,b,c\n1\n1,2,3,4\n");
        assert_eq!(manifest.rows()[0], vec!["1", "", ""]);
        assert_eq!(manifest.rows()[1], vec!["1", "2", "3"]);
    }

    #[test]
    fn test_bom_is_stripped_from_first_header() {
        let manifest = parse("\u{feff}new_name,other\nx,y\n");
        assert_eq!(manifest.column("new_name"), Some(0));
    }

    #[test]
    fn test_quoted_fields_survive_round_trip() {
        let manifest = parse("Title,PathOnClient\n\"Intro, part 1\",\"a \"\"b\"\".mp3\"\n");
        assert_eq!(manifest.value(0, "Title"), "Intro, part 1");
        assert_eq!(manifest.value(0, "PathOnClient"), "a \"b\".mp3");

        let mut out = Vec::new();
        manifest.write_to(&mut out).unwrap();
        let reparsed = Manifest::from_reader(out.as_slice(), "out.csv").unwrap();
        assert_eq!(reparsed.rows(), manifest.rows());
    }

    #[test]
    fn test_ensure_column_appends_once() {
        let mut manifest = parse("new_name\na.mp4\nb.mp4\n");
        let idx = manifest.ensure_column("renamed");
        assert_eq!(idx, 1);
        assert_eq!(manifest.ensure_column("renamed"), 1);
        assert_eq!(manifest.headers(), &["new_name", "renamed"]);
        manifest.set(1, idx, "b-1.mp4");
        assert_eq!(manifest.get(1, idx), "b-1.mp4");
        assert_eq!(manifest.get(0, idx), "");
    }

    #[test]
    fn test_require_column_reports_name() {
        let manifest = parse("filename\nx\n");
        let err = manifest.require_column("new_name").unwrap_err();
        assert!(err.to_string().contains("missing required column 'new_name'"));
    }

    #[test]
    fn test_empty_input_is_invalid() {
        let result = Manifest::from_reader("".as_bytes(), "empty.csv");
        assert!(matches!(result, Err(CliError::InvalidManifest { .. })));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Manifest::load("/no/such/manifest.csv");
        assert!(matches!(result, Err(CliError::ManifestNotFound(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("results.csv");

        let mut manifest = Manifest::new(vec!["Title".to_string(), "Status".to_string()]);
        manifest.push_row(vec!["Intro".to_string()]);
        manifest.save(&path).unwrap();

        let loaded = Manifest::load(&path).unwrap();
        assert_eq!(loaded.headers(), manifest.headers());
        assert_eq!(loaded.rows()[0], vec!["Intro", ""]);
        assert_eq!(loaded.source(), path.as_path());
    }
}
