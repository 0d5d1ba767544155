// ********* Input data structures ***********

use serde::Deserialize;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::Display;

/// The tag that marks a Writing/Speaking foundation course.
pub const GWS_TAG: &str = "GWS";

/// Courses of the Penn State bulletin that satisfy the Writing/Speaking
/// (GWS) foundation.
pub const GWS_COURSES: [&str; 31] = [
    "ABSM 391",
    "ABSM 392",
    "ADTED 100",
    "AIR 352",
    "BE 391",
    "BE 392",
    "BIOL 403",
    "CAS 100A",
    "CAS 100B",
    "CAS 100C",
    "CAS 100S",
    "CAS 137H",
    "CAS 138T",
    "EMSC 100S",
    "ENGL 15",
    "ENGL 15A",
    "ENGL 15E",
    "ENGL 15S",
    "ENGL 30H",
    "ENGL 30T",
    "ENGL 137H",
    "ENGL 138T",
    "ENGL 202A",
    "ENGL 202B",
    "ENGL 202C",
    "ENGL 202D",
    "ENGL 202H",
    "ESL 15",
    "GEOSC 435",
    "KINES 197N",
    "MATSE 203",
];

/// A fixed set of course codes that should all carry one tag.
///
/// The list is immutable once built. Duplicated codes are dropped at
/// construction (the first occurrence keeps its position), so a course is
/// never visited twice.
///
/// ```
/// use gen_ed_catalog::TargetList;
///
/// let targets = TargetList::new("GWS", &["ENGL 15", "CAS 100A", "ENGL 15"]);
/// assert_eq!(targets.codes(), &["ENGL 15".to_string(), "CAS 100A".to_string()]);
/// assert_eq!(targets.tag(), "GWS");
/// ```
#[derive(Eq, PartialEq, Debug, Clone, Deserialize)]
#[serde(from = "TargetListFile")]
pub struct TargetList {
    tag: String,
    codes: Vec<String>,
}

impl TargetList {
    pub fn new<S: AsRef<str>>(tag: &str, codes: &[S]) -> TargetList {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut unique: Vec<String> = Vec::new();
        for code in codes.iter().map(|c| c.as_ref()) {
            if seen.insert(code) {
                unique.push(code.to_string());
            }
        }
        TargetList {
            tag: tag.to_string(),
            codes: unique,
        }
    }

    /// The bulletin list of Writing/Speaking courses, tagged with `GWS`.
    pub fn gws() -> TargetList {
        TargetList::new(GWS_TAG, &GWS_COURSES)
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

// The on-disk form of a target list. Duplicates are only removed when
// converting into a TargetList.
#[derive(Deserialize)]
struct TargetListFile {
    #[serde(default = "default_tag")]
    tag: String,
    courses: Vec<String>,
}

fn default_tag() -> String {
    GWS_TAG.to_string()
}

impl From<TargetListFile> for TargetList {
    fn from(f: TargetListFile) -> TargetList {
        TargetList::new(&f.tag, &f.courses)
    }
}

// ******** Output data structures *********

/// Why a course that exists in the collection cannot receive a tag.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum IneligibleReason {
    /// The record has no `attributes` mapping.
    MissingAttributes,
    /// `attributes` exists but carries no `gen_ed` list.
    MissingGenEd,
}

/// The result of tagging a single course.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Outcome {
    /// The tag was appended.
    Modified,
    /// The tag was already present, the record is left as is.
    AlreadyHasTag,
    /// The course exists but lacks the structure to hold the tag.
    Ineligible(IneligibleReason),
    /// The course code is not in the collection.
    NotFound,
}

/// Per-outcome lists of course codes, in target list order.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Classification {
    pub modified: Vec<String>,
    pub already_has_tag: Vec<String>,
    pub ineligible: Vec<String>,
    pub not_found: Vec<String>,
}

impl Classification {
    pub fn record(&mut self, code: &str, outcome: Outcome) {
        let bucket = match outcome {
            Outcome::Modified => &mut self.modified,
            Outcome::AlreadyHasTag => &mut self.already_has_tag,
            Outcome::Ineligible(_) => &mut self.ineligible,
            Outcome::NotFound => &mut self.not_found,
        };
        bucket.push(code.to_string());
    }

    /// Courses that were found and are eligible, whether or not they changed.
    pub fn found(&self) -> usize {
        self.modified.len() + self.already_has_tag.len()
    }

    pub fn total(&self) -> usize {
        self.found() + self.ineligible.len() + self.not_found.len()
    }

    /// True if nothing in the document was changed.
    pub fn is_unchanged(&self) -> bool {
        self.modified.is_empty()
    }
}

/// Errors that prevent a document from being processed at all.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum CatalogError {
    /// The document (or its `courses` member) is not a JSON object.
    NotACollection { document: &'static str },
    /// The requirements document has no `gen_ed_requirements` member.
    MissingRequirements,
}

impl Error for CatalogError {}

impl Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::NotACollection { document } => {
                write!(f, "the {} document is not a keyed JSON object", document)
            }
            CatalogError::MissingRequirements => {
                write!(f, "the requirements document has no 'gen_ed_requirements' entry")
            }
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
