use log::{debug, info};

use gen_ed_catalog::*;
use snafu::{prelude::*, Snafu};

use std::path::{Path, PathBuf};

use serde_json::Value as JSValue;

use crate::gened::config_reader::*;
use crate::gened::updater::*;

pub mod config_reader;
mod io_common;
pub mod report;
pub mod updater;

#[derive(Debug, Snafu)]
pub enum GenEdError {
    #[snafu(display("Error reading file {}", path.display()))]
    ReadingFile {
        source: std::io::Error,
        path: PathBuf,
    },
    // The source document cannot be parsed: nothing was touched.
    #[snafu(display("Invalid JSON in {}", path.display()))]
    InvalidSource {
        source: serde_json::Error,
        path: PathBuf,
    },
    #[snafu(display("Unexpected document layout in {}", path.display()))]
    Layout { source: CatalogError, path: PathBuf },
    #[snafu(display("Invalid target list in {}", path.display()))]
    InvalidTargets {
        source: serde_json::Error,
        path: PathBuf,
    },
    #[snafu(display("Error creating backup {}", backup.display()))]
    Backup {
        source: std::io::Error,
        backup: PathBuf,
    },
    #[snafu(display("Error encoding the catalog"))]
    Encoding { source: serde_json::Error },
    #[snafu(display("Error writing {}", path.display()))]
    Writing {
        source: std::io::Error,
        path: PathBuf,
    },
    // The freshly written document did not parse. The original content was restored.
    #[snafu(display(
        "The written file {} is not valid JSON, it was restored from {}",
        path.display(),
        backup.display()
    ))]
    WriteCorruption {
        source: serde_json::Error,
        path: PathBuf,
        backup: PathBuf,
        report: Box<UpdateReport>,
    },
    #[snafu(display("Error restoring {} from {}", path.display(), backup.display()))]
    Restore {
        source: std::io::Error,
        path: PathBuf,
        backup: PathBuf,
    },
}

pub type GenEdResult<T> = Result<T, GenEdError>;

/// Reads and parses a JSON file.
pub fn read_json(path: &Path) -> GenEdResult<JSValue> {
    let contents = std::fs::read_to_string(path).context(ReadingFileSnafu { path })?;
    debug!("read {} bytes from {:?}", contents.len(), path);
    serde_json::from_str(contents.as_str()).context(InvalidSourceSnafu { path })
}

/// Tags the target courses of the catalog. The report is printed whether the
/// update succeeds or is rolled back, a one-line summary for other failures.
pub fn run_add_attribute(
    data_dir: Option<PathBuf>,
    file: Option<PathBuf>,
    targets_path: Option<PathBuf>,
    dry_run: bool,
) -> GenEdResult<()> {
    let paths = DataPaths::new(data_dir);
    let path = file.unwrap_or_else(|| paths.courses());
    let targets = read_targets(targets_path.as_deref())?;
    info!(
        "Adding {} to {} courses of {:?}",
        targets.tag(),
        targets.len(),
        path
    );
    let updater = Updater::new(targets).dry_run(dry_run);
    match updater.run(&path) {
        Ok(res) => {
            report::print_update_report(&res);
            Ok(())
        }
        Err(e) => {
            match &e {
                GenEdError::WriteCorruption { report: res, .. } => report::print_update_report(res),
                _ => {
                    if let Some(summary) = report::failure_summary(&path, &e) {
                        println!("{}", summary);
                    }
                }
            }
            Err(e)
        }
    }
}

pub fn run_coverage(data_dir: Option<PathBuf>) -> GenEdResult<()> {
    let paths = DataPaths::new(data_dir);
    println!("Loading data files...");
    let requirements_path = paths.requirements();
    let requirements = read_json(&requirements_path)?;
    let courses_path = paths.courses();
    let catalog = read_json(&courses_path)?;
    let analysis = coverage::analyze(&requirements, &catalog).context(LayoutSnafu {
        path: courses_path,
    })?;
    report::print_coverage(&analysis);
    Ok(())
}

pub fn run_analyze_majors(data_dir: Option<PathBuf>) -> GenEdResult<()> {
    let path = DataPaths::new(data_dir).majors();
    let document = read_json(&path)?;
    let analysis = majors::analyze(&document).context(LayoutSnafu { path })?;
    report::print_majors(&analysis);
    Ok(())
}
