//! Cross-tabulation of Gen-Ed tags over a course collection.

use log::{debug, info};
use serde_json::Value as JSValue;
use std::collections::{BTreeMap, BTreeSet};

use crate::{courses, CatalogError, CatalogResult};

/// A general education category, as it appears in course attributes.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct GenEdCategory {
    pub code: &'static str,
    pub name: &'static str,
}

pub static KNOWN_CATEGORIES: [GenEdCategory; 8] = [
    GenEdCategory {
        code: "GWS",
        name: "Writing/Speaking",
    },
    GenEdCategory {
        code: "GQ",
        name: "Quantification",
    },
    GenEdCategory {
        code: "GHW",
        name: "Health and Wellness",
    },
    GenEdCategory {
        code: "GN",
        name: "Natural Sciences",
    },
    GenEdCategory {
        code: "GA",
        name: "Arts",
    },
    GenEdCategory {
        code: "GH",
        name: "Humanities",
    },
    GenEdCategory {
        code: "GS",
        name: "Social and Behavioral Sciences",
    },
    GenEdCategory {
        code: "interdomain",
        name: "Integrative Studies",
    },
];

pub fn category(code: &str) -> Option<&'static GenEdCategory> {
    KNOWN_CATEGORIES.iter().find(|c| c.code == code)
}

/// The blocks of the Gen-Ed requirements.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum RequirementSection {
    /// 15 credits: 9 of writing/speaking and 6 of quantification.
    Foundations,
    /// 15 credits, 3 in each domain.
    KnowledgeDomains,
    /// 6 credits of inter-domain courses.
    IntegrativeStudies,
}

/// Minimum number of available courses for a category to be satisfiable.
struct Threshold {
    section: RequirementSection,
    code: &'static str,
    credits: u32,
    min_courses: usize,
}

const THRESHOLDS: [Threshold; 8] = [
    Threshold {
        section: RequirementSection::Foundations,
        code: "GWS",
        credits: 9,
        min_courses: 3,
    },
    Threshold {
        section: RequirementSection::Foundations,
        code: "GQ",
        credits: 6,
        min_courses: 2,
    },
    Threshold {
        section: RequirementSection::KnowledgeDomains,
        code: "GHW",
        credits: 3,
        min_courses: 1,
    },
    Threshold {
        section: RequirementSection::KnowledgeDomains,
        code: "GN",
        credits: 3,
        min_courses: 1,
    },
    Threshold {
        section: RequirementSection::KnowledgeDomains,
        code: "GA",
        credits: 3,
        min_courses: 1,
    },
    Threshold {
        section: RequirementSection::KnowledgeDomains,
        code: "GH",
        credits: 3,
        min_courses: 1,
    },
    Threshold {
        section: RequirementSection::KnowledgeDomains,
        code: "GS",
        credits: 3,
        min_courses: 1,
    },
    Threshold {
        section: RequirementSection::IntegrativeStudies,
        code: "interdomain",
        credits: 6,
        min_courses: 2,
    },
];

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct FeasibilityCheck {
    pub section: RequirementSection,
    pub category: GenEdCategory,
    pub credits: u32,
    pub min_courses: usize,
    pub available: usize,
}

impl FeasibilityCheck {
    pub fn satisfied(&self) -> bool {
        self.available >= self.min_courses
    }
}

/// One row of the per-tag statistics.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TagStat {
    pub tag: String,
    pub count: usize,
    pub required: bool,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CoverageAnalysis {
    pub total_courses: usize,
    /// Courses carrying at least one tag, in document order.
    pub covered: Vec<String>,
    pub uncovered: Vec<String>,
    /// tag -> course codes, in document order
    pub by_tag: BTreeMap<String, Vec<String>>,
    /// The top-level groups found in the requirements document.
    pub requirement_groups: Vec<String>,
}

impl CoverageAnalysis {
    pub fn count(&self, tag: &str) -> usize {
        self.by_tag.get(tag).map(|l| l.len()).unwrap_or(0)
    }

    pub fn courses_for(&self, tag: &str) -> &[String] {
        self.by_tag.get(tag).map(|l| l.as_slice()).unwrap_or(&[])
    }

    /// Percentage of courses with at least one tag. 0 for an empty collection.
    pub fn coverage_percent(&self) -> f64 {
        if self.total_courses == 0 {
            0.0
        } else {
            self.covered.len() as f64 * 100.0 / self.total_courses as f64
        }
    }

    /// Tags that do not belong to any known category, sorted.
    pub fn unexpected_tags(&self) -> Vec<String> {
        self.by_tag
            .keys()
            .filter(|t| category(t).is_none())
            .cloned()
            .collect()
    }

    /// Known categories without any course, in table order.
    pub fn missing_categories(&self) -> Vec<&'static str> {
        KNOWN_CATEGORIES
            .iter()
            .filter(|c| self.count(c.code) == 0)
            .map(|c| c.code)
            .collect()
    }

    pub fn all_categories_present(&self) -> bool {
        self.missing_categories().is_empty()
    }

    pub fn feasibility(&self) -> Vec<FeasibilityCheck> {
        THRESHOLDS
            .iter()
            .filter_map(|t| {
                category(t.code).map(|c| FeasibilityCheck {
                    section: t.section,
                    category: *c,
                    credits: t.credits,
                    min_courses: t.min_courses,
                    available: self.count(t.code),
                })
            })
            .collect()
    }

    /// All observed tags, most used first. Ties are broken by tag name.
    pub fn tag_stats(&self) -> Vec<TagStat> {
        let mut stats: Vec<TagStat> = self
            .by_tag
            .iter()
            .map(|(tag, codes)| TagStat {
                tag: tag.clone(),
                count: codes.len(),
                required: category(tag).is_some(),
            })
            .collect();
        stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
        stats
    }
}

// A value counts only if it is "truthy": present, not null and not empty.
fn non_empty(v: &JSValue) -> bool {
    match v {
        JSValue::Null => false,
        JSValue::Bool(b) => *b,
        JSValue::String(s) => !s.is_empty(),
        JSValue::Array(l) => !l.is_empty(),
        JSValue::Object(m) => !m.is_empty(),
        JSValue::Number(n) => n.as_f64() != Some(0.0),
    }
}

fn gen_ed_tags(record: &JSValue) -> Vec<&str> {
    let gen_ed = match record
        .get("attributes")
        .filter(|a| non_empty(a))
        .and_then(|a| a.get("gen_ed"))
        .filter(|g| non_empty(g))
    {
        Some(g) => g,
        None => return vec![],
    };
    match gen_ed {
        JSValue::String(s) => vec![s.as_str()],
        JSValue::Array(l) => l.iter().filter_map(JSValue::as_str).collect(),
        _ => vec![],
    }
}

/// Tallies the Gen-Ed tags of all the courses of a document.
///
/// `requirements` is the Gen-Ed requirements document. It must hold a
/// `gen_ed_requirements` entry.
pub fn analyze(
    requirements: &JSValue,
    course_document: &JSValue,
) -> CatalogResult<CoverageAnalysis> {
    let reqs = requirements
        .get("gen_ed_requirements")
        .ok_or(CatalogError::MissingRequirements)?;
    let requirement_groups: Vec<String> = reqs
        .as_object()
        .map(|m| m.keys().cloned().collect())
        .unwrap_or_default();
    debug!("coverage: requirement groups {:?}", requirement_groups);

    let courses = courses(course_document)?;
    info!("coverage: {} courses loaded", courses.len());

    let mut by_tag: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut covered: Vec<String> = Vec::new();
    let mut uncovered: Vec<String> = Vec::new();
    for (code, record) in courses.iter() {
        let tags = gen_ed_tags(record);
        if tags.is_empty() {
            uncovered.push(code.clone());
            continue;
        }
        // A tag listed twice for one course still counts the course once.
        let unique: BTreeSet<&str> = tags.into_iter().collect();
        for tag in unique {
            by_tag.entry(tag.to_string()).or_default().push(code.clone());
        }
        covered.push(code.clone());
    }

    Ok(CoverageAnalysis {
        total_courses: courses.len(),
        covered,
        uncovered,
        by_tag,
        requirement_groups,
    })
}
