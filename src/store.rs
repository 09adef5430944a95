//! Storage seam for TraitCal
//!
//! Input documents and generated calendars live behind the [`Store`] trait so
//! the generator and the API handlers never touch the filesystem directly.
//! The filesystem implementation writes calendars through a temporary file
//! and a rename: a failed run never replaces a previously good calendar.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::{Day, TraitTemplate};

/// Input document file names
pub const CALENDAR_FILE: &str = "calendar.json";
/// Input document file names
pub const TRAITS_FILE: &str = "traits.json";

/// The two generated calendar feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarFile {
    /// One event per trait occurrence
    Main,
    /// All satellite events
    Other,
}

impl CalendarFile {
    /// File name of this feed
    pub fn file_name(&self) -> &'static str {
        match self {
            CalendarFile::Main => "main.ics",
            CalendarFile::Other => "other.ics",
        }
    }
}

/// Persistence boundary for input documents and calendar output
#[async_trait]
pub trait Store: Send + Sync {
    /// Load the day schedule input document
    async fn load_days(&self) -> Result<Vec<Day>>;

    /// Load the trait template input document
    async fn load_templates(&self) -> Result<Vec<TraitTemplate>>;

    /// Replace the day schedule input document
    async fn persist_days(&self, days: &[Day]) -> Result<()>;

    /// Replace the trait template input document
    async fn persist_templates(&self, templates: &[TraitTemplate]) -> Result<()>;

    /// Read a generated calendar feed
    async fn read_calendar(&self, file: CalendarFile) -> Result<String>;

    /// Replace a generated calendar feed
    async fn write_calendar(&self, file: CalendarFile, ics: &str) -> Result<()>;
}

/// Filesystem-backed store
#[derive(Debug, Clone)]
pub struct FsStore {
    input_dir: PathBuf,
    output_dir: PathBuf,
}

impl FsStore {
    /// Create a store over the given input and output directories
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    async fn load_json<T: serde::de::DeserializeOwned>(&self, file_name: &str) -> Result<T> {
        let path = self.input_dir.join(file_name);
        let raw = tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::not_found(format!("Input document {}", path.display()))
            } else {
                Error::Io(e)
            }
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    async fn persist_json<T: serde::Serialize>(&self, file_name: &str, value: &T) -> Result<()> {
        tokio::fs::create_dir_all(&self.input_dir).await?;
        let body = serde_json::to_string_pretty(value)?;
        atomic_write(&self.input_dir.join(file_name), &body).await
    }
}

/// Write through a sibling temporary file, then rename into place
async fn atomic_write(path: &Path, contents: &str) -> Result<()> {
    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, contents).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[async_trait]
impl Store for FsStore {
    async fn load_days(&self) -> Result<Vec<Day>> {
        self.load_json(CALENDAR_FILE).await
    }

    async fn load_templates(&self) -> Result<Vec<TraitTemplate>> {
        self.load_json(TRAITS_FILE).await
    }

    async fn persist_days(&self, days: &[Day]) -> Result<()> {
        self.persist_json(CALENDAR_FILE, &days).await
    }

    async fn persist_templates(&self, templates: &[TraitTemplate]) -> Result<()> {
        self.persist_json(TRAITS_FILE, &templates).await
    }

    async fn read_calendar(&self, file: CalendarFile) -> Result<String> {
        let path = self.output_dir.join(file.file_name());
        tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::not_found(format!("Calendar {} has not been generated", file.file_name()))
            } else {
                Error::Io(e)
            }
        })
    }

    async fn write_calendar(&self, file: CalendarFile, ics: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.output_dir).await?;
        atomic_write(&self.output_dir.join(file.file_name()), ics).await
    }
}
