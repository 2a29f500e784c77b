use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Identifier shared by all channel images of one sample
pub type SampleKey = String;

/// Channel files of one sample, keyed by channel suffix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleRecord {
    pub key: SampleKey,
    files: BTreeMap<String, String>,
}

impl SampleRecord {
    pub fn new(key: impl Into<SampleKey>) -> Self {
        Self {
            key: key.into(),
            files: BTreeMap::new(),
        }
    }

    /// Record `file_name` for `suffix`, returning the file it replaced
    pub fn insert(&mut self, suffix: &str, file_name: impl Into<String>) -> Option<String> {
        self.files.insert(suffix.to_string(), file_name.into())
    }

    /// File recorded for `suffix`
    pub fn file(&self, suffix: &str) -> Option<&str> {
        self.files.get(suffix).map(String::as_str)
    }

    /// Suffixes with a recorded file
    pub fn suffixes(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// All samples found in one source folder, ordered by key
#[derive(Debug, Clone, Default)]
pub struct SampleSet {
    source_dir: PathBuf,
    records: BTreeMap<SampleKey, SampleRecord>,
}

impl SampleSet {
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            records: BTreeMap::new(),
        }
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Record, creating the sample on first sight; returns the replaced file, if any
    pub fn insert(&mut self, key: &str, suffix: &str, file_name: &str) -> Option<String> {
        self.records
            .entry(key.to_string())
            .or_insert_with(|| SampleRecord::new(key))
            .insert(suffix, file_name)
    }

    pub fn get(&self, key: &str) -> Option<&SampleRecord> {
        self.records.get(key)
    }

    /// Records in lexicographic key order
    pub fn iter(&self) -> impl Iterator<Item = &SampleRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total number of classified files across all samples
    pub fn file_count(&self) -> usize {
        self.records.values().map(SampleRecord::len).sum()
    }
}
