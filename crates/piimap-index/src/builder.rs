//! # Index Builder
//!
//! Builds the `country-index.json` of one framework group:
//!
//! 1. list the group's record files (non-recursive, sorted, index excluded),
//! 2. validate each against the record schema, excluding failures,
//! 3. derive slug, canonical path and completeness status per record,
//! 4. resolve the region from the framework name and entry names,
//! 5. sort entries by name.
//!
//! The framework name comes from the first valid record in filename order
//! unless the caller overrides it.

use std::path::{Path, PathBuf};

use piimap_core::{classify, resolve_region, slug, IndexDocument, IndexEntry, Record};
use piimap_schema::SchemaValidator;

use crate::error::{ExcludedRecord, IndexError, IndexResult, RecordIssue};
use crate::scan;
use crate::store::{self, INDEX_FILENAME};

/// Date format of `last_updated`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Today's UTC date, or the date of `SOURCE_DATE_EPOCH` when it is set to
/// a valid Unix timestamp (reproducible builds).
pub fn generation_date() -> String {
    if let Ok(epoch_str) = std::env::var("SOURCE_DATE_EPOCH") {
        if let Ok(epoch) = epoch_str.trim().parse::<i64>() {
            if let Some(dt) = chrono::DateTime::from_timestamp(epoch, 0) {
                return dt.format(DATE_FORMAT).to_string();
            }
        }
        tracing::warn!(value = %epoch_str, "ignoring invalid SOURCE_DATE_EPOCH");
    }
    chrono::Utc::now().format(DATE_FORMAT).to_string()
}

/// Options for one build run.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Stamped into `last_updated`.
    pub generated_on: String,
    /// Replaces the framework name taken from the records.
    pub framework_override: Option<String>,
    pub index_filename: String,
}

impl BuildOptions {
    pub fn new(generated_on: impl Into<String>) -> Self {
        Self {
            generated_on: generated_on.into(),
            framework_override: None,
            index_filename: INDEX_FILENAME.to_string(),
        }
    }

    pub fn with_framework(mut self, framework: impl Into<String>) -> Self {
        self.framework_override = Some(framework.into());
        self
    }

    pub fn with_index_filename(mut self, filename: impl Into<String>) -> Self {
        self.index_filename = filename.into();
        self
    }
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self::new(generation_date())
    }
}

/// A successfully built group index, plus the records left out of it.
#[derive(Debug)]
pub struct GroupBuild {
    pub group: String,
    pub directory: PathBuf,
    pub document: IndexDocument,
    pub excluded: Vec<ExcludedRecord>,
}

impl GroupBuild {
    /// Where this group's index lives.
    pub fn index_path(&self, index_filename: &str) -> PathBuf {
        self.directory.join(index_filename)
    }
}

/// A group for which no index could be built.
#[derive(Debug)]
pub struct GroupFailure {
    pub directory: PathBuf,
    pub error: IndexError,
}

/// Outcome of building every group under a data root.
#[derive(Debug, Default)]
pub struct BuildRun {
    pub builds: Vec<GroupBuild>,
    pub failures: Vec<GroupFailure>,
}

impl BuildRun {
    /// Records excluded across all successful groups.
    pub fn excluded_count(&self) -> usize {
        self.builds.iter().map(|b| b.excluded.len()).sum()
    }
}

/// Builds group indexes against a compiled record schema.
#[derive(Debug)]
pub struct IndexBuilder<'a> {
    validator: &'a SchemaValidator,
    options: BuildOptions,
}

impl<'a> IndexBuilder<'a> {
    pub fn new(validator: &'a SchemaValidator, options: BuildOptions) -> Self {
        Self { validator, options }
    }

    /// Build the index of one group directory.
    ///
    /// # Errors
    ///
    /// [`IndexError::GroupNotFound`] if the directory does not exist, and
    /// [`IndexError::GroupEmpty`] if no record in it is valid.
    pub fn build_group(&self, group_dir: &Path) -> IndexResult<GroupBuild> {
        let group = scan::group_name(group_dir);
        let files = scan::list_group_records(group_dir, &self.options.index_filename)?;

        let mut framework = self.options.framework_override.clone();
        let mut countries = Vec::new();
        let mut excluded = Vec::new();

        for path in files {
            match self.entry_for(&group, &path) {
                Ok((record, entry)) => {
                    tracing::debug!(path = %path.display(), status = %entry.status, "indexed record");
                    if framework.is_none() {
                        framework = Some(record.framework);
                    }
                    countries.push(entry);
                }
                Err(issue) => {
                    tracing::warn!(path = %path.display(), %issue, "excluding record from index");
                    excluded.push(ExcludedRecord { path, issue });
                }
            }
        }

        let Some(framework) = framework.filter(|_| !countries.is_empty()) else {
            return Err(IndexError::GroupEmpty { group, excluded });
        };

        let names: Vec<&str> = countries.iter().map(|c: &IndexEntry| c.name.as_str()).collect();
        let region = resolve_region(&framework, &names);
        let mut document = IndexDocument {
            framework,
            region,
            last_updated: self.options.generated_on.clone(),
            countries,
        };
        document.sort_entries();

        Ok(GroupBuild {
            group,
            directory: group_dir.to_path_buf(),
            document,
            excluded,
        })
    }

    /// Build every group under `data_dir`. A failing group does not stop
    /// the others.
    ///
    /// # Errors
    ///
    /// Only [`IndexError::DataRootMissing`] (or an unreadable data root)
    /// aborts the run.
    pub fn build_all(&self, data_dir: &Path) -> IndexResult<BuildRun> {
        let mut run = BuildRun::default();
        for group_dir in scan::list_groups(data_dir)? {
            match self.build_group(&group_dir) {
                Ok(build) => run.builds.push(build),
                Err(error) => {
                    tracing::warn!(group = %group_dir.display(), %error, "group index not built");
                    run.failures.push(GroupFailure {
                        directory: group_dir,
                        error,
                    });
                }
            }
        }
        Ok(run)
    }

    /// Write a built index next to its records.
    pub fn write(&self, build: &GroupBuild) -> IndexResult<PathBuf> {
        let path = build.index_path(&self.options.index_filename);
        store::write_index(&path, &build.document)?;
        tracing::info!(path = %path.display(), entries = build.document.countries.len(), "wrote index");
        Ok(path)
    }

    fn entry_for(&self, group: &str, path: &Path) -> Result<(Record, IndexEntry), RecordIssue> {
        let value = self.validator.validate_file(path)?;
        let record: Record = serde_json::from_value(value)?;
        let filename = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        let location = slug::resolve(group, &filename)?;
        let entry = IndexEntry {
            name: record.country.clone(),
            slug: location.slug,
            path: location.path,
            status: classify(&record.categories),
        };
        Ok((record, entry))
    }
}
