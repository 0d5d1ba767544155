use chrono::Local;
use log::warn;

use crate::gened::io_common::*;
use crate::gened::*;

/// The steps of an update, in the order they are taken.
///
/// `Validating` failures end in `Aborted` (nothing written, no backup),
/// `Verifying` failures end in `RolledBack` (the backup was copied back).
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Phase {
    Idle,
    Validating,
    BackingUp,
    Mutating,
    Writing,
    Verifying,
    Success,
    RolledBack,
    Aborted,
    /// Terminal state of a dry run: the changes were computed, not written.
    Previewed,
}

/// What an update did.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct UpdateReport {
    pub path: PathBuf,
    pub tag: String,
    pub target_count: usize,
    pub loaded_courses: usize,
    pub shape: DocumentShape,
    pub classification: Classification,
    /// None for dry runs.
    pub backup: Option<PathBuf>,
    pub phase: Phase,
}

/// Turns the updated document into the text written to disk.
pub trait DocumentEncoder {
    fn encode(&self, document: &JSValue) -> GenEdResult<String>;
}

/// Two-space indentation, keys in document order, non-ASCII text unescaped.
pub struct PrettyJson;

impl DocumentEncoder for PrettyJson {
    fn encode(&self, document: &JSValue) -> GenEdResult<String> {
        serde_json::to_string_pretty(document).context(EncodingSnafu {})
    }
}

/// Adds a tag to a fixed list of courses of a catalog file.
///
/// A run validates the file, backs it up, tags the courses, writes the whole
/// document back and reads it again. If the written file does not parse, the
/// backup is copied back and `WriteCorruption` is returned.
pub struct Updater {
    targets: TargetList,
    dry_run: bool,
    encoder: Box<dyn DocumentEncoder>,
}

impl Updater {
    pub fn new(targets: TargetList) -> Updater {
        Updater {
            targets,
            dry_run: false,
            encoder: Box::new(PrettyJson),
        }
    }

    pub fn dry_run(self, dry_run: bool) -> Updater {
        Updater { dry_run, ..self }
    }

    #[cfg(test)]
    pub fn encoder(self, encoder: Box<dyn DocumentEncoder>) -> Updater {
        Updater { encoder, ..self }
    }

    pub fn run(&self, path: &Path) -> GenEdResult<UpdateReport> {
        let mut phase = Phase::Idle;
        let res = self.run_phases(path, &mut phase);
        if res.is_err() && phase == Phase::Validating {
            enter(&mut phase, Phase::Aborted);
            warn!("Aborted: {:?} was not modified", path);
        }
        res
    }

    fn run_phases(&self, path: &Path, phase: &mut Phase) -> GenEdResult<UpdateReport> {
        enter(phase, Phase::Validating);
        let original = std::fs::read_to_string(path).context(ReadingFileSnafu { path })?;
        let mut document: JSValue =
            serde_json::from_str(original.as_str()).context(InvalidSourceSnafu { path })?;
        let shape = detect_shape(&document).context(LayoutSnafu { path })?;
        let loaded_courses = courses(&document).context(LayoutSnafu { path })?.len();
        info!(
            "JSON validation passed: {:?} ({:?}, {} courses)",
            path, shape, loaded_courses
        );

        let backup = if self.dry_run {
            None
        } else {
            enter(phase, Phase::BackingUp);
            Some(create_backup(path, &Local::now())?)
        };

        enter(phase, Phase::Mutating);
        let classification =
            apply_in_place(&mut document, &self.targets).context(LayoutSnafu { path })?;
        let mut report = UpdateReport {
            path: path.to_path_buf(),
            tag: self.targets.tag().to_string(),
            target_count: self.targets.len(),
            loaded_courses,
            shape,
            classification,
            backup,
            phase: *phase,
        };

        let contents = self.encoder.encode(&document)?;

        let backup = match &report.backup {
            Some(b) => b.clone(),
            None => {
                enter(phase, Phase::Previewed);
                if contents != original {
                    text_diff::print_diff(original.as_str(), contents.as_str(), "\n");
                }
                report.phase = *phase;
                return Ok(report);
            }
        };

        // A symlinked catalog is updated through the link: the rename
        // must land on the file it points to.
        let target = std::fs::canonicalize(path).context(ReadingFileSnafu { path })?;
        if target != path {
            debug!("update: {:?} resolves to {:?}", path, target);
        }

        enter(phase, Phase::Writing);
        write_atomic(&target, &contents)?;

        enter(phase, Phase::Verifying);
        let written =
            std::fs::read_to_string(&target).context(ReadingFileSnafu { path: &target })?;
        if let Err(e) = serde_json::from_str::<JSValue>(written.as_str()) {
            warn!("Saved JSON is invalid ({}), restoring from {:?}", e, backup);
            restore(&backup, &target)?;
            enter(phase, Phase::RolledBack);
            report.phase = *phase;
            return Err(e).context(WriteCorruptionSnafu {
                path,
                backup,
                report: Box::new(report),
            });
        }

        enter(phase, Phase::Success);
        report.phase = *phase;
        Ok(report)
    }
}

fn enter(phase: &mut Phase, next: Phase) {
    debug!("update: {:?} -> {:?}", phase, next);
    *phase = next;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    // Writes something that is not JSON.
    struct Truncating;

    impl DocumentEncoder for Truncating {
        fn encode(&self, document: &JSValue) -> GenEdResult<String> {
            let full = PrettyJson.encode(document)?;
            Ok(full[..full.len() / 2].to_string())
        }
    }

    fn scenario_targets() -> TargetList {
        TargetList::new("GWS", &["CAS 100A", "ENGL 15", "MATH 140", "PHYS 999"])
    }

    fn write_catalog(dir: &Path, doc: &JSValue) -> PathBuf {
        let p = dir.join("penn_state_courses.json");
        fs::write(&p, serde_json::to_string_pretty(doc).unwrap()).unwrap();
        p
    }

    fn backups(dir: &Path) -> Vec<PathBuf> {
        let mut l: Vec<PathBuf> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.to_string_lossy().contains(".backup_"))
            .collect();
        l.sort();
        l
    }

    #[test]
    fn scenario() {
        let dir = tempfile::tempdir().unwrap();
        let p = write_catalog(
            dir.path(),
            &json!({
                "CAS 100A": {"attributes": {"gen_ed": []}},
                "ENGL 15": {"attributes": {"gen_ed": ["GWS"]}},
                "MATH 140": {}
            }),
        );
        let original = fs::read_to_string(&p).unwrap();
        let report = Updater::new(scenario_targets()).run(&p).unwrap();

        assert_eq!(report.phase, Phase::Success);
        assert_eq!(report.loaded_courses, 3);
        assert_eq!(report.shape, DocumentShape::Direct);
        let c = &report.classification;
        assert_eq!(
            (c.modified.len(), c.already_has_tag.len(), c.ineligible.len(), c.not_found.len()),
            (1, 1, 1, 1)
        );
        assert_eq!(c.modified, vec!["CAS 100A"]);
        assert_eq!(c.not_found, vec!["PHYS 999"]);

        let after = read_json(&p).unwrap();
        assert_eq!(after["CAS 100A"]["attributes"]["gen_ed"], json!(["GWS"]));
        assert_eq!(after["ENGL 15"], json!({"attributes": {"gen_ed": ["GWS"]}}));
        assert_eq!(after["MATH 140"], json!({}));

        let backup = report.backup.unwrap();
        assert_eq!(backups(dir.path()), vec![backup.clone()]);
        assert_eq!(fs::read_to_string(backup).unwrap(), original);
    }

    #[test]
    fn second_run_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let p = write_catalog(
            dir.path(),
            &json!({"courses": {
                "CAS 100A": {"attributes": {"gen_ed": []}},
                "ENGL 15": {"attributes": {"gen_ed": ["GWS"]}}
            }}),
        );
        let updater = Updater::new(scenario_targets());
        updater.run(&p).unwrap();
        let once = fs::read_to_string(&p).unwrap();
        let second = updater.run(&p).unwrap();
        assert_eq!(fs::read_to_string(&p).unwrap(), once);
        assert!(second.classification.is_unchanged());
        assert_eq!(
            second.classification.already_has_tag,
            vec!["CAS 100A", "ENGL 15"]
        );
        assert_eq!(second.shape, DocumentShape::Wrapped);
        // One backup per run, even within the same second.
        assert_eq!(backups(dir.path()).len(), 2);
    }

    #[test]
    fn untargeted_records_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let doc = json!({
            "HIST 20": {"title": "Européen", "attributes": {"gen_ed": ["GH"], "offered": ["FA", "SP"]}},
            "CAS 100A": {"title": "Effective Speech", "attributes": {"gen_ed": ["GH"]}},
            "ANTH 1": {"credits": 3, "title": "日本語"}
        });
        let p = write_catalog(dir.path(), &doc);
        Updater::new(TargetList::gws()).run(&p).unwrap();

        let text = fs::read_to_string(&p).unwrap();
        assert!(text.contains("Européen"));
        assert!(text.contains("日本語"));
        let after = read_json(&p).unwrap();
        assert_eq!(after["HIST 20"], doc["HIST 20"]);
        assert_eq!(after["ANTH 1"], doc["ANTH 1"]);
        let keys: Vec<&String> = after.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["HIST 20", "CAS 100A", "ANTH 1"]);
        let anth_keys: Vec<&String> = after["ANTH 1"].as_object().unwrap().keys().collect();
        assert_eq!(anth_keys, vec!["credits", "title"]);
    }

    #[test]
    fn invalid_source_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("penn_state_courses.json");
        fs::write(&p, "{\"CAS 100A\": {").unwrap();
        let res = Updater::new(TargetList::gws()).run(&p);
        assert!(matches!(res, Err(GenEdError::InvalidSource { .. })));
        assert_eq!(fs::read_to_string(&p).unwrap(), "{\"CAS 100A\": {");
        assert!(backups(dir.path()).is_empty());
    }

    #[test]
    fn non_collection_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let p = write_catalog(dir.path(), &json!(["CAS 100A"]));
        let res = Updater::new(TargetList::gws()).run(&p);
        assert!(matches!(res, Err(GenEdError::Layout { .. })));
        assert!(backups(dir.path()).is_empty());
    }

    #[test]
    fn corrupted_write_is_rolled_back() {
        let dir = tempfile::tempdir().unwrap();
        let p = write_catalog(
            dir.path(),
            &json!({"CAS 100A": {"attributes": {"gen_ed": []}}}),
        );
        let original = fs::read_to_string(&p).unwrap();
        let res = Updater::new(scenario_targets())
            .encoder(Box::new(Truncating))
            .run(&p);
        match res {
            Err(GenEdError::WriteCorruption { report, backup, .. }) => {
                assert_eq!(report.phase, Phase::RolledBack);
                assert_eq!(report.backup, Some(backup.clone()));
                assert_eq!(fs::read_to_string(&backup).unwrap(), original);
            }
            x => panic!("expected a rollback, got {:?}", x),
        }
        assert_eq!(fs::read_to_string(&p).unwrap(), original);
        assert_eq!(backups(dir.path()).len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_catalog_is_updated_through_the_link() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("real.json");
        fs::write(
            &real,
            json!({"ENGL 15": {"attributes": {"gen_ed": []}}}).to_string(),
        )
        .unwrap();
        let link = dir.path().join("penn_state_courses.json");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let report = Updater::new(TargetList::gws()).run(&link).unwrap();
        assert_eq!(report.phase, Phase::Success);
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        let after = read_json(&real).unwrap();
        assert_eq!(after["ENGL 15"]["attributes"]["gen_ed"], json!(["GWS"]));
        // Only the link, its target and the backup.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 3);
    }

    #[test]
    fn dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let p = write_catalog(
            dir.path(),
            &json!({"ENGL 15": {"attributes": {"gen_ed": []}}}),
        );
        let original = fs::read_to_string(&p).unwrap();
        let report = Updater::new(TargetList::gws())
            .dry_run(true)
            .run(&p)
            .unwrap();
        assert_eq!(report.phase, Phase::Previewed);
        assert_eq!(report.backup, None);
        assert_eq!(report.classification.modified, vec!["ENGL 15"]);
        assert_eq!(fs::read_to_string(&p).unwrap(), original);
        assert!(backups(dir.path()).is_empty());
    }
}
