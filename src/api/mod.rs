//! High-level, ergonomic library API: enhance a single file to a path, and batch
//! helpers that walk the category folders of a dataset. Prefer using these
//! entrypoints over low-level processing modules when integrating XRENHANCE.
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::core::params::EnhanceParams;
use crate::core::processing::pipeline::{PipelineStages, enhance_file};
use crate::core::processing::save::{persist_final, save_stages};
use crate::error::{Error, Result};
use crate::types::Category;

/// File extensions picked up inside a category folder, in listing order.
/// Matching is case-sensitive.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Outcome of processing one input file.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Written { output: PathBuf },
    Skipped { reason: String },
    Failed { error: String },
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryStatus {
    Processed,
    /// Input folder does not exist
    Missing,
    /// Output folder could not be created or the input folder could not be listed
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryReport {
    pub category: Category,
    pub status: CategoryStatus,
    pub found: usize,
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CategoryReport {
    fn new(category: Category, status: CategoryStatus) -> Self {
        Self {
            category,
            status,
            found: 0,
            written: 0,
            skipped: 0,
            failed: 0,
            error: None,
        }
    }

    fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Written { .. } => self.written += 1,
            FileOutcome::Skipped { .. } => self.skipped += 1,
            FileOutcome::Failed { .. } => self.failed += 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub input_root: PathBuf,
    pub output_root: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub categories: Vec<CategoryReport>,
}

impl BatchReport {
    pub fn written(&self) -> usize {
        self.categories.iter().map(|c| c.written).sum()
    }

    pub fn skipped(&self) -> usize {
        self.categories.iter().map(|c| c.skipped).sum()
    }

    pub fn failed(&self) -> usize {
        self.categories.iter().map(|c| c.failed).sum()
    }

    pub fn category(&self, category: Category) -> Option<&CategoryReport> {
        self.categories.iter().find(|c| c.category == category)
    }

    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self).map_err(|e| Error::Report {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Restrict the batch to these categories; empty means all of them
    pub categories: Vec<Category>,
    /// Also dump every pipeline stage under `<dir>/<category>/`
    pub stages_dir: Option<PathBuf>,
}

impl BatchOptions {
    fn selected(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.categories.is_empty() || self.categories.contains(c))
            .collect()
    }
}

/// Image files directly inside `dir` (no recursion), grouped by extension in
/// [`IMAGE_EXTENSIONS`] order and sorted by name within a group. Hidden files are ignored.
pub fn list_category_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut groups: [Vec<PathBuf>; 3] = Default::default();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name() else {
            continue;
        };
        if name.as_encoded_bytes().first() == Some(&b'.') {
            continue;
        }
        let Some(ext) = path.extension() else {
            continue;
        };
        if let Some(group) = IMAGE_EXTENSIONS
            .iter()
            .position(|&known| ext == OsStr::new(known))
        {
            groups[group].push(path);
        }
    }
    Ok(groups
        .into_iter()
        .flat_map(|mut g| {
            g.sort();
            g
        })
        .collect())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string())
}

fn run_file(
    input: &Path,
    output: &Path,
    params: &EnhanceParams,
    stages_dir: Option<&Path>,
) -> Result<Option<PipelineStages>> {
    let Some(stages) = enhance_file(input, params)? else {
        return Ok(None);
    };
    if let Some(dir) = stages_dir {
        if let Err(e) = save_stages(&stages, dir, &file_stem(input)) {
            warn!("Could not dump stages of {:?} to {:?}: {}", input, dir, e);
        }
    }
    persist_final(&stages, output, params)?;
    Ok(Some(stages))
}

/// Enhance one file and persist the final stage at `output`. Never returns an
/// error: failures are folded into the outcome.
pub fn process_file(
    input: &Path,
    output: &Path,
    params: &EnhanceParams,
    stages_dir: Option<&Path>,
) -> FileOutcome {
    match run_file(input, output, params, stages_dir) {
        Ok(Some(_)) => FileOutcome::Written {
            output: output.to_path_buf(),
        },
        Ok(None) => FileOutcome::Skipped {
            reason: "unreadable image".to_string(),
        },
        Err(e) => {
            error!("Error processing {:?}: {}", input, e);
            FileOutcome::Failed {
                error: e.to_string(),
            }
        }
    }
}

/// Single-file mode: like [`process_file`] but unreadable input and write errors
/// are reported to the caller.
pub fn process_image_to_path(
    input: &Path,
    output: &Path,
    params: &EnhanceParams,
    stages_dir: Option<&Path>,
) -> Result<FileOutcome> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(match run_file(input, output, params, stages_dir)? {
        Some(_) => FileOutcome::Written {
            output: output.to_path_buf(),
        },
        None => FileOutcome::Skipped {
            reason: "unreadable image".to_string(),
        },
    })
}

/// Process one category folder into its mirrored output folder.
pub fn process_category(
    category: Category,
    input_root: &Path,
    output_root: &Path,
    params: &EnhanceParams,
    options: &BatchOptions,
) -> CategoryReport {
    let input_dir = input_root.join(category.folder_name());
    let output_dir = output_root.join(category.folder_name());

    if !input_dir.exists() {
        warn!("Skipping {} (Folder not found)", category);
        return CategoryReport::new(category, CategoryStatus::Missing);
    }

    let mut report = CategoryReport::new(category, CategoryStatus::Processed);

    if let Err(e) = std::fs::create_dir_all(&output_dir) {
        error!(
            "Cannot create output folder {:?} for {}: {}",
            output_dir, category, e
        );
        report.status = CategoryStatus::Failed;
        report.error = Some(e.to_string());
        return report;
    }

    let images = match list_category_images(&input_dir) {
        Ok(images) => images,
        Err(e) => {
            error!("Cannot list {:?}: {}", input_dir, e);
            report.status = CategoryStatus::Failed;
            report.error = Some(e.to_string());
            return report;
        }
    };
    report.found = images.len();
    info!("Processing {}: {} images found...", category, images.len());

    let stages_dir = options
        .stages_dir
        .as_ref()
        .map(|d| d.join(category.folder_name()));

    for path in &images {
        let Some(file_name) = path.file_name() else {
            continue;
        };
        let output = output_dir.join(file_name);
        let outcome = process_file(path, &output, params, stages_dir.as_deref());
        if let FileOutcome::Skipped { reason } = &outcome {
            warn!("Skipping {:?}: {}", path, reason);
        }
        report.record(&outcome);
    }

    report
}

/// Process every selected category of `input_root` into `output_root`, mirroring
/// `<category>/<filename>`. Per-file and per-category problems are logged and tallied
/// in the report; they never abort the batch.
pub fn process_dataset(
    input_root: &Path,
    output_root: &Path,
    params: &EnhanceParams,
    options: &BatchOptions,
) -> Result<BatchReport> {
    params.validate()?;

    info!("Starting processing from: {:?}", input_root);
    info!("Saving results to: {:?}", output_root);

    let started_at = Utc::now();
    let categories = options
        .selected()
        .into_iter()
        .map(|category| process_category(category, input_root, output_root, params, options))
        .collect();

    let report = BatchReport {
        input_root: input_root.to_path_buf(),
        output_root: output_root.to_path_buf(),
        started_at,
        finished_at: Utc::now(),
        categories,
    };

    info!(
        "Done! written={} skipped={} failed={}",
        report.written(),
        report.skipped(),
        report.failed()
    );
    Ok(report)
}
