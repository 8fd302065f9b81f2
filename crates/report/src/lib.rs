//! Paginated PDF reports built from KPI cards, charts and tables.

pub mod document;
pub mod layout;
pub mod pdf;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

pub use crate::document::{Block, Report, ReportType, Table, CHART_SIZE};
pub use crate::layout::{layout, DrawOp, Page};

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("PDF generation failed: {0}")]
    Pdf(String),
    #[error("could not write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Lays out `report`, renders it and writes it into `out_dir`.
///
/// The directory is created when missing. Returns the written path.
pub fn export(report: &Report, out_dir: &Path) -> Result<PathBuf, ReportError> {
    fs::create_dir_all(out_dir).map_err(|source| ReportError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;
    let path = out_dir.join(report.filename());

    let pages = layout(report);
    let bytes = pdf::render_pdf(report.kind.title(), &pages)?;
    fs::write(&path, &bytes).map_err(|source| ReportError::Io {
        path: path.clone(),
        source,
    })?;

    info!(
        path = %path.display(),
        pages = pages.len(),
        charts = report.chart_count(),
        bytes = bytes.len(),
        "report exported"
    );
    Ok(path)
}
