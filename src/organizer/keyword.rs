use std::path::Path;

use log::debug;

use crate::error::{Error, Result};
use crate::utils::{clean_name, ensure_directory_exists};
use super::{move_into, regular_files, SortSummary};

/// Ordered `keyword -> folder` rules with a catch-all folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRules {
    rules: Vec<(String, String)>,
    default_folder: String,
}

impl Default for KeywordRules {
    fn default() -> Self {
        Self {
            rules: vec![
                ("_zstack".to_string(), "zstack".to_string()),
                ("_timeseries".to_string(), "timeseries".to_string()),
            ],
            default_folder: "snap".to_string(),
        }
    }
}

impl KeywordRules {
    pub fn new(rules: Vec<(String, String)>, default_folder: &str) -> Result<Self> {
        if rules.iter().any(|(keyword, _)| keyword.is_empty()) {
            return Err(Error::Config("keywords must not be empty".to_string()));
        }
        Ok(Self {
            rules: rules
                .into_iter()
                .map(|(keyword, folder)| (keyword, clean_name(&folder)))
                .collect(),
            default_folder: clean_name(default_folder),
        })
    }

    /// Parse `KEYWORD=FOLDER` specs
    pub fn parse(specs: &[String], default_folder: &str) -> Result<Self> {
        let rules = specs
            .iter()
            .map(|spec| match spec.split_once('=') {
                Some((keyword, folder)) if !folder.trim().is_empty() => {
                    Ok((keyword.trim().to_string(), folder.trim().to_string()))
                }
                _ => Err(Error::Config(format!(
                    "rule '{}' must look like KEYWORD=FOLDER",
                    spec
                ))),
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(rules, default_folder)
    }

    pub fn with_default_folder(mut self, default_folder: &str) -> Self {
        self.default_folder = clean_name(default_folder);
        self
    }

    /// Folder for `file_name`: the first rule whose keyword occurs, else the default
    pub fn folder_for(&self, file_name: &str) -> &str {
        self.rules
            .iter()
            .find(|(keyword, _)| file_name.contains(keyword.as_str()))
            .map(|(_, folder)| folder.as_str())
            .unwrap_or(&self.default_folder)
    }

    /// Every folder a file can land in, default last
    pub fn folders(&self) -> Vec<&str> {
        let mut folders: Vec<&str> = Vec::new();
        for folder in self
            .rules
            .iter()
            .map(|(_, folder)| folder.as_str())
            .chain(std::iter::once(self.default_folder.as_str()))
        {
            if !folders.contains(&folder) {
                folders.push(folder);
            }
        }
        folders
    }
}

/// Move every file of `dir` into the folder its name's keyword selects
pub fn sort_by_keyword(dir: &Path, rules: &KeywordRules, dry_run: bool) -> Result<SortSummary> {
    let files = regular_files(dir)?;
    let mut summary = SortSummary::default();

    if !dry_run {
        for folder in rules.folders() {
            ensure_directory_exists(&dir.join(folder))?;
        }
    }

    for file_name in files {
        let folder = rules.folder_for(&file_name);
        debug!("'{}' -> {}/", file_name, folder);
        move_into(dir, &file_name, &dir.join(folder), dry_run, &mut summary);
    }

    Ok(summary)
}
