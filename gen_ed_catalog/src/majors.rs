//! Grouping of majors by their Gen-Ed rules.

use log::{debug, info};
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use std::collections::HashMap;

use crate::{CatalogError, CatalogResult};

pub const GEN_ED_RULES_KEY: &str = "gen_ed_rules";

/// A distinct `gen_ed_rules` payload and the majors that share it.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RulesVariant {
    /// The rules, with the keys of every object sorted.
    pub rules: JSValue,
    pub majors: Vec<String>,
}

/// The first major of the document, shown when no major has rules.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct FirstMajor {
    pub id: String,
    pub fields: Vec<String>,
    pub value: JSValue,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct MajorsAnalysis {
    pub total_majors: usize,
    pub with_rules: Vec<String>,
    pub without_rules: Vec<String>,
    /// In order of first appearance.
    pub variants: Vec<RulesVariant>,
    pub first_major: Option<FirstMajor>,
}

impl MajorsAnalysis {
    pub fn all_same(&self) -> bool {
        self.variants.len() == 1
    }
}

/// Rebuilds a value with the keys of all its objects sorted.
///
/// Two payloads are structurally equal iff their canonical forms are equal,
/// whatever the order their keys were written in.
pub fn canonicalize(v: &JSValue) -> JSValue {
    match v {
        JSValue::Object(m) => {
            let mut keys: Vec<&String> = m.keys().collect();
            keys.sort();
            let mut sorted = JSMap::new();
            for k in keys {
                sorted.insert(k.clone(), canonicalize(&m[k]));
            }
            JSValue::Object(sorted)
        }
        JSValue::Array(l) => JSValue::Array(l.iter().map(canonicalize).collect()),
        x => x.clone(),
    }
}

pub fn analyze(majors_document: &JSValue) -> CatalogResult<MajorsAnalysis> {
    let majors = majors_document
        .as_object()
        .ok_or(CatalogError::NotACollection { document: "majors" })?;
    info!("majors: {} majors loaded", majors.len());

    let mut with_rules: Vec<String> = Vec::new();
    let mut without_rules: Vec<String> = Vec::new();
    let mut variants: Vec<RulesVariant> = Vec::new();
    // canonical text -> index in variants
    let mut index: HashMap<String, usize> = HashMap::new();

    for (major_id, major) in majors.iter() {
        let rules = match major.get(GEN_ED_RULES_KEY) {
            Some(r) => r,
            None => {
                without_rules.push(major_id.clone());
                continue;
            }
        };
        with_rules.push(major_id.clone());
        let canonical = canonicalize(rules);
        let key = canonical.to_string();
        match index.get(&key) {
            Some(&idx) => variants[idx].majors.push(major_id.clone()),
            None => {
                debug!("majors: new rules variant from {}", major_id);
                index.insert(key, variants.len());
                variants.push(RulesVariant {
                    rules: canonical,
                    majors: vec![major_id.clone()],
                });
            }
        }
    }

    let first_major = majors.iter().next().map(|(id, major)| {
        let fields = major
            .as_object()
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default();
        FirstMajor {
            id: id.clone(),
            fields,
            value: major.clone(),
        }
    });

    Ok(MajorsAnalysis {
        total_majors: majors.len(),
        with_rules,
        without_rules,
        variants,
        first_major,
    })
}
