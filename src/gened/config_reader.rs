use crate::gened::*;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const COURSES_FILE: &str = "penn_state_courses.json";
pub const REQUIREMENTS_FILE: &str = "gen_ed_requirements.json";
pub const MAJORS_FILE: &str = "penn_state_majors.json";

/// Where the data files live.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DataPaths {
    pub dir: PathBuf,
}

impl DataPaths {
    pub fn new(dir: Option<PathBuf>) -> DataPaths {
        DataPaths {
            dir: dir.unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
        }
    }

    pub fn courses(&self) -> PathBuf {
        self.dir.join(COURSES_FILE)
    }

    pub fn requirements(&self) -> PathBuf {
        self.dir.join(REQUIREMENTS_FILE)
    }

    pub fn majors(&self) -> PathBuf {
        self.dir.join(MAJORS_FILE)
    }
}

/// The list of courses to tag: the bulletin GWS list unless a file is given.
pub fn read_targets(path: Option<&Path>) -> GenEdResult<TargetList> {
    let path = match path {
        Some(p) => p,
        None => {
            debug!("read_targets: using the built-in GWS list");
            return Ok(TargetList::gws());
        }
    };
    let contents = std::fs::read_to_string(path).context(ReadingFileSnafu { path })?;
    let targets: TargetList =
        serde_json::from_str(contents.as_str()).context(InvalidTargetsSnafu { path })?;
    info!(
        "read_targets: {} courses for tag {:?} from {:?}",
        targets.len(),
        targets.tag(),
        path
    );
    Ok(targets)
}
