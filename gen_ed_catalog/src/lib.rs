mod config;
pub mod coverage;
pub mod majors;
pub mod manual;

use log::{debug, info, warn};
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;

pub use crate::config::*;

/// The member that holds the course mapping in a wrapped document.
pub const COURSES_KEY: &str = "courses";

/// The two layouts a course document may have on disk.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum DocumentShape {
    /// `{course_code: record}`
    Direct,
    /// `{"courses": {course_code: record}, ...}`
    Wrapped,
}

/// Finds out how the course mapping is stored in the given document.
///
/// A top-level `courses` member means the document is wrapped; it must then
/// be an object itself.
pub fn detect_shape(document: &JSValue) -> CatalogResult<DocumentShape> {
    let top = document.as_object().ok_or(CatalogError::NotACollection {
        document: "course",
    })?;
    match top.get(COURSES_KEY) {
        Some(JSValue::Object(_)) => Ok(DocumentShape::Wrapped),
        Some(_) => Err(CatalogError::NotACollection {
            document: "course",
        }),
        None => Ok(DocumentShape::Direct),
    }
}

/// The course mapping of a document, whichever shape it has.
pub fn courses(document: &JSValue) -> CatalogResult<&JSMap<String, JSValue>> {
    let shape = detect_shape(document)?;
    let m = match shape {
        DocumentShape::Direct => document.as_object(),
        DocumentShape::Wrapped => document.get(COURSES_KEY).and_then(JSValue::as_object),
    };
    m.ok_or(CatalogError::NotACollection {
        document: "course",
    })
}

fn courses_mut(document: &mut JSValue) -> CatalogResult<&mut JSMap<String, JSValue>> {
    let shape = detect_shape(document)?;
    let m = match shape {
        DocumentShape::Direct => document.as_object_mut(),
        DocumentShape::Wrapped => document
            .get_mut(COURSES_KEY)
            .and_then(JSValue::as_object_mut),
    };
    m.ok_or(CatalogError::NotACollection {
        document: "course",
    })
}

/// Adds the tag of the target list to every eligible target course.
///
/// The document keeps its shape, and nothing else than the `gen_ed` lists of
/// the modified courses is touched. Courses that miss `attributes` or
/// `attributes.gen_ed` are reported as ineligible: the structure is never
/// created. Running it twice gives the same document as running it once.
///
/// ```
/// use gen_ed_catalog::{apply, TargetList};
/// use serde_json::json;
///
/// let doc = json!({"ENGL 15": {"attributes": {"gen_ed": []}}});
/// let (doc, classification) = apply(doc, &TargetList::new("GWS", &["ENGL 15"]))?;
/// assert_eq!(doc, json!({"ENGL 15": {"attributes": {"gen_ed": ["GWS"]}}}));
/// assert_eq!(classification.modified, vec!["ENGL 15".to_string()]);
/// # Ok::<(), gen_ed_catalog::CatalogError>(())
/// ```
pub fn apply(
    mut document: JSValue,
    targets: &TargetList,
) -> CatalogResult<(JSValue, Classification)> {
    let classification = apply_in_place(&mut document, targets)?;
    Ok((document, classification))
}

/// Same as [apply], mutating the document where it is.
pub fn apply_in_place(
    document: &mut JSValue,
    targets: &TargetList,
) -> CatalogResult<Classification> {
    let courses = courses_mut(document)?;
    info!(
        "apply: {} courses loaded, {} targets for tag {:?}",
        courses.len(),
        targets.len(),
        targets.tag()
    );
    let mut res = Classification::default();
    for code in targets.codes() {
        let outcome = tag_course(courses, code, targets.tag());
        match outcome {
            Outcome::Modified => info!("{}: added {}", code, targets.tag()),
            Outcome::AlreadyHasTag => debug!("{}: already tagged {}", code, targets.tag()),
            Outcome::Ineligible(IneligibleReason::MissingAttributes) => {
                warn!("{}: no attributes field, skipping", code)
            }
            Outcome::Ineligible(IneligibleReason::MissingGenEd) => {
                warn!("{}: no gen_ed field, skipping", code)
            }
            Outcome::NotFound => warn!("{}: not found in the collection", code),
        }
        res.record(code, outcome);
    }
    Ok(res)
}

/// Tags a single course of the mapping.
pub fn tag_course(courses: &mut JSMap<String, JSValue>, code: &str, tag: &str) -> Outcome {
    let record = match courses.get_mut(code) {
        Some(r) => r,
        None => return Outcome::NotFound,
    };
    let attributes = match record.get_mut("attributes") {
        Some(a) if a.is_object() => a,
        _ => return Outcome::Ineligible(IneligibleReason::MissingAttributes),
    };
    let gen_ed = match attributes.get_mut("gen_ed") {
        Some(JSValue::Array(l)) => l,
        _ => return Outcome::Ineligible(IneligibleReason::MissingGenEd),
    };
    if gen_ed.iter().any(|t| t.as_str() == Some(tag)) {
        Outcome::AlreadyHasTag
    } else {
        gen_ed.push(JSValue::String(tag.to_string()));
        Outcome::Modified
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn scenario() -> JSValue {
        json!({
            "CAS 100A": {"attributes": {"gen_ed": []}},
            "ENGL 15": {"attributes": {"gen_ed": ["GWS"]}},
            "MATH 140": {}
        })
    }

    fn scenario_targets() -> TargetList {
        TargetList::new("GWS", &["CAS 100A", "ENGL 15", "MATH 140", "PHYS 999"])
    }

    #[test]
    fn four_outcomes() {
        init();
        let (doc, c) = apply(scenario(), &scenario_targets()).unwrap();
        assert_eq!(doc["CAS 100A"]["attributes"]["gen_ed"], json!(["GWS"]));
        assert_eq!(doc["ENGL 15"], json!({"attributes": {"gen_ed": ["GWS"]}}));
        assert_eq!(doc["MATH 140"], json!({}));
        assert!(doc.get("PHYS 999").is_none());
        assert_eq!(c.modified, vec!["CAS 100A".to_string()]);
        assert_eq!(c.already_has_tag, vec!["ENGL 15".to_string()]);
        assert_eq!(c.ineligible, vec!["MATH 140".to_string()]);
        assert_eq!(c.not_found, vec!["PHYS 999".to_string()]);
        assert_eq!(c.found(), 2);
        assert_eq!(c.total(), 4);
    }

    #[test]
    fn idempotent() {
        init();
        let (once, first) = apply(scenario(), &scenario_targets()).unwrap();
        let (twice, second) = apply(once.clone(), &scenario_targets()).unwrap();
        assert_eq!(once, twice);
        assert!(second.is_unchanged());
        assert_eq!(
            second.already_has_tag,
            vec!["CAS 100A".to_string(), "ENGL 15".to_string()]
        );
        assert_eq!(first.ineligible, second.ineligible);
        assert_eq!(first.not_found, second.not_found);
    }

    #[test]
    fn missing_gen_ed_is_ineligible() {
        init();
        let doc = json!({"BIOL 403": {"attributes": {"credits": 3}}});
        let (out, c) = apply(doc.clone(), &TargetList::new("GWS", &["BIOL 403"])).unwrap();
        assert_eq!(out, doc);
        assert_eq!(c.ineligible, vec!["BIOL 403".to_string()]);
        let mut courses = doc.as_object().unwrap().clone();
        assert_eq!(
            tag_course(&mut courses, "BIOL 403", "GWS"),
            Outcome::Ineligible(IneligibleReason::MissingGenEd)
        );
    }

    #[test]
    fn non_list_structures_are_not_reshaped() {
        let doc = json!({
            "A 1": {"attributes": null},
            "A 2": {"attributes": {"gen_ed": "GQ"}},
            "A 3": "not a record"
        });
        let (out, c) = apply(doc.clone(), &TargetList::new("GWS", &["A 1", "A 2", "A 3"])).unwrap();
        assert_eq!(out, doc);
        assert_eq!(c.ineligible.len(), 3);
    }

    #[test]
    fn others_untouched_and_order_kept() {
        init();
        let doc = json!({
            "ZOO 1": {"title": "Zoology", "attributes": {"gen_ed": ["GN"], "honors": false}},
            "CAS 100A": {"title": "Effective Speech", "attributes": {"level": 100, "gen_ed": ["GH"]}},
            "ART 10": {"attributes": {"gen_ed": []}}
        });
        let (out, _) = apply(doc.clone(), &TargetList::new("GWS", &["CAS 100A"])).unwrap();
        assert_eq!(out["ZOO 1"], doc["ZOO 1"]);
        assert_eq!(out["ART 10"], doc["ART 10"]);
        assert_eq!(out["CAS 100A"]["attributes"]["gen_ed"], json!(["GH", "GWS"]));
        let keys: Vec<&String> = out.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["ZOO 1", "CAS 100A", "ART 10"]);
        let attr_keys: Vec<&String> = out["CAS 100A"]["attributes"]
            .as_object()
            .unwrap()
            .keys()
            .collect();
        assert_eq!(attr_keys, vec!["level", "gen_ed"]);
    }

    #[test]
    fn wrapped_documents() {
        init();
        let doc = json!({
            "version": 2,
            "courses": {"ENGL 15": {"attributes": {"gen_ed": []}}}
        });
        assert_eq!(detect_shape(&doc).unwrap(), DocumentShape::Wrapped);
        let (out, c) = apply(doc, &TargetList::new("GWS", &["ENGL 15"])).unwrap();
        assert_eq!(out["version"], json!(2));
        assert_eq!(out["courses"]["ENGL 15"]["attributes"]["gen_ed"], json!(["GWS"]));
        assert!(out.get("ENGL 15").is_none());
        assert_eq!(c.modified.len(), 1);
    }

    #[test]
    fn rejects_non_collections() {
        assert_eq!(
            detect_shape(&json!([1, 2])),
            Err(CatalogError::NotACollection {
                document: "course"
            })
        );
        assert!(apply(json!({"courses": []}), &TargetList::gws()).is_err());
        assert_eq!(detect_shape(&json!({})).unwrap(), DocumentShape::Direct);
    }

    #[test]
    fn duplicate_targets_tag_once() {
        let doc = json!({"ENGL 15": {"attributes": {"gen_ed": []}}});
        let targets = TargetList::new("GWS", &["ENGL 15", "ENGL 15"]);
        assert_eq!(targets.len(), 1);
        let (out, c) = apply(doc, &targets).unwrap();
        assert_eq!(out["ENGL 15"]["attributes"]["gen_ed"], json!(["GWS"]));
        assert_eq!(c.total(), 1);
    }

    #[test]
    fn gws_table() {
        let targets = TargetList::gws();
        assert_eq!(targets.len(), GWS_COURSES.len());
        assert_eq!(targets.tag(), "GWS");
        assert!(targets.codes().contains(&"ENGL 202C".to_string()));
    }

    #[test]
    fn target_list_from_json() {
        let t: TargetList =
            serde_json::from_str(r#"{"courses": ["ENGL 15", "ESL 15", "ENGL 15"]}"#).unwrap();
        assert_eq!(t, TargetList::new("GWS", &["ENGL 15", "ESL 15"]));
        let t: TargetList =
            serde_json::from_str(r#"{"tag": "GQ", "courses": ["MATH 140"]}"#).unwrap();
        assert_eq!(t.tag(), "GQ");
    }
}
