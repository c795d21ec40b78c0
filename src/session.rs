//! In-memory registry of loaded files for one user session.
//!
//! The session is an explicit value owned by the caller; nothing is global
//! and nothing outlives the process. Each registered file keeps its load
//! status, and its decoded workbook when loading succeeded.

use crate::config::QualityConfig;
use crate::error::{QualityError, Result};
use crate::scanner::QualityScanner;
use crate::view::IssueView;
use crate::workbook::Workbook;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

/// Load state of a registered file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Processing,
    Completed,
    Failed,
}

/// A file registered with the session
#[derive(Debug, Clone, Serialize)]
pub struct UploadedFile {
    pub id: u32,
    pub original_name: String,
    pub size_bytes: u64,
    pub status: FileStatus,
    pub sheets: Vec<String>,
    pub error_message: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    workbook: Option<Workbook>,
}

impl UploadedFile {
    pub fn workbook(&self) -> Option<&Workbook> {
        self.workbook.as_ref()
    }
}

/// Files loaded during one session, keyed by id
#[derive(Debug, Default)]
pub struct Session {
    config: QualityConfig,
    files: BTreeMap<u32, UploadedFile>,
    next_id: u32,
}

impl Session {
    pub fn new(config: QualityConfig) -> Self {
        Self {
            config,
            files: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub fn config(&self) -> &QualityConfig {
        &self.config
    }

    /// Load a file and register it
    ///
    /// A file that fails to load is still registered with status `failed`
    /// and its error message; the error is returned as well.
    pub fn register(&mut self, path: &Path) -> Result<u32> {
        let id = self.next_id.max(1);
        self.next_id = id + 1;

        let original_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let size_bytes = std::fs::metadata(path).map(|meta| meta.len()).unwrap_or(0);

        let mut entry = UploadedFile {
            id,
            original_name,
            size_bytes,
            status: FileStatus::Processing,
            sheets: Vec::new(),
            error_message: None,
            uploaded_at: Utc::now(),
            processed_at: None,
            workbook: None,
        };

        let result = Workbook::open(path, &self.config);
        entry.processed_at = Some(Utc::now());

        match result {
            Ok(workbook) => {
                entry.status = FileStatus::Completed;
                entry.sheets = workbook
                    .sheet_names()
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                entry.workbook = Some(workbook);
                info!(
                    "Registered file {} as id {} ({} sheets)",
                    entry.original_name,
                    id,
                    entry.sheets.len()
                );
                self.files.insert(id, entry);
                Ok(id)
            }
            Err(e) => {
                warn!("Failed to load {}: {}", path.display(), e);
                entry.status = FileStatus::Failed;
                entry.error_message = Some(e.to_string());
                self.files.insert(id, entry);
                Err(e)
            }
        }
    }

    /// Register a workbook that is already in memory
    pub fn register_workbook(&mut self, workbook: Workbook) -> u32 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        let now = Utc::now();

        let entry = UploadedFile {
            id,
            original_name: workbook.file_name(),
            size_bytes: workbook.size_bytes,
            status: FileStatus::Completed,
            sheets: workbook
                .sheet_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
            error_message: None,
            uploaded_at: now,
            processed_at: Some(now),
            workbook: Some(workbook),
        };
        self.files.insert(id, entry);
        id
    }

    pub fn get(&self, id: u32) -> Option<&UploadedFile> {
        self.files.get(&id)
    }

    /// All registered files in id order
    pub fn list(&self) -> Vec<&UploadedFile> {
        self.files.values().collect()
    }

    /// Drop a file; returns false when the id is unknown
    pub fn remove(&mut self, id: u32) -> bool {
        self.files.remove(&id).is_some()
    }

    /// Scan one sheet of a registered file, defaulting to its first sheet
    pub fn analyze(&self, id: u32, sheet: Option<&str>) -> Result<IssueView> {
        let file = self
            .files
            .get(&id)
            .ok_or(QualityError::FileNotRegistered { id })?;

        let workbook = file.workbook.as_ref().ok_or_else(|| {
            QualityError::workbook(
                file.original_name.as_str(),
                file.error_message
                    .clone()
                    .unwrap_or_else(|| "file did not load".to_string()),
            )
        })?;

        let sheet = workbook.sheet_or_first(sheet)?;
        let issues = QualityScanner::from_config(&self.config).scan(Some(&sheet.dataset));
        Ok(IssueView::new(issues))
    }
}
