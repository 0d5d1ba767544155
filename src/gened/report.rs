// Console output of the three commands.

use gen_ed_catalog::coverage::{CoverageAnalysis, RequirementSection};
use gen_ed_catalog::majors::MajorsAnalysis;

use std::path::Path;

use crate::gened::updater::{Phase, UpdateReport};
use crate::gened::GenEdError;

const WIDTH: usize = 80;
const SAMPLE_SIZE: usize = 5;
const STRUCTURE_LIMIT: usize = 1000;

fn rule(c: &str) -> String {
    c.repeat(WIDTH)
}

fn banner(title: &str) {
    println!("{}", rule("="));
    println!("{}", title);
    println!("{}", rule("="));
}

fn print_list(title: &str, codes: &[String]) {
    if codes.is_empty() {
        return;
    }
    println!("\n{} ({}):", title, codes.len());
    for c in codes {
        println!("  • {}", c);
    }
}

// "A, B, C" for the first `n` elements, plus the number of elements left out.
fn sample(codes: &[String], n: usize) -> (String, usize) {
    let shown: Vec<&str> = codes.iter().take(n).map(|s| s.as_str()).collect();
    (shown.join(", "), codes.len().saturating_sub(n))
}

fn mark(ok: bool) -> &'static str {
    if ok {
        "✓"
    } else {
        "✗"
    }
}

pub fn print_update_report(report: &UpdateReport) {
    let c = &report.classification;
    println!();
    banner("SUMMARY");
    println!("File: {}", report.path.display());
    println!(
        "Tag: {} ({} target courses, {} courses in the catalog)",
        report.tag, report.target_count, report.loaded_courses
    );
    println!("✓ Courses found and modified: {}", c.modified.len());
    println!("  Courses already had {}: {}", report.tag, c.already_has_tag.len());
    println!("⚠ Courses without attributes.gen_ed: {}", c.ineligible.len());
    println!("✗ Courses not found: {}", c.not_found.len());

    print_list("Modified courses", &c.modified);
    print_list(&format!("Already had {}", report.tag), &c.already_has_tag);
    print_list("Skipped, no attributes.gen_ed", &c.ineligible);
    print_list("Not found in database", &c.not_found);

    println!();
    match (&report.phase, &report.backup) {
        (Phase::Previewed, _) => println!("Dry run: nothing was written"),
        (Phase::RolledBack, Some(b)) => {
            println!("❌ The saved JSON was invalid, restored from: {}", b.display())
        }
        (_, Some(b)) => {
            println!("✓ Backup saved at: {}", b.display());
            println!("✓ JSON structure validated and preserved");
        }
        (phase, None) => println!("Update stopped at {:?}", phase),
    }
    println!("{}", rule("="));
}

pub fn print_coverage(a: &CoverageAnalysis) {
    println!("✓ Loaded {} courses\n", a.total_courses);
    banner("GEN ED COVERAGE ANALYSIS");

    println!("\nOVERALL STATISTICS:");
    println!("   Total courses in database: {}", a.total_courses);
    println!("   Courses with Gen Ed attributes: {}", a.covered.len());
    println!("   Courses without Gen Ed attributes: {}", a.uncovered.len());
    println!("   Coverage: {:.1}%", a.coverage_percent());
    if !a.requirement_groups.is_empty() {
        println!("   Requirement groups: {}", a.requirement_groups.join(", "));
    }

    println!();
    banner("GEN ED ATTRIBUTE BREAKDOWN");
    for cat in gen_ed_catalog::coverage::KNOWN_CATEGORIES.iter() {
        let count = a.count(cat.code);
        println!("\n{} {} ({})", mark(count > 0), cat.code, cat.name);
        println!("   Courses available: {}", count);
        if count > 0 {
            let (shown, more) = sample(a.courses_for(cat.code), SAMPLE_SIZE);
            println!("   Sample courses: {}", shown);
            if more > 0 {
                println!("   ... and {} more", more);
            }
        }
    }

    let unexpected = a.unexpected_tags();
    if !unexpected.is_empty() {
        println!();
        banner("⚠ UNEXPECTED GEN ED ATTRIBUTES FOUND");
        for tag in unexpected.iter() {
            println!("   • {}: {} courses", tag, a.count(tag));
        }
    }

    println!();
    banner("GEN ED REQUIREMENTS FEASIBILITY CHECK");
    let mut section: Option<RequirementSection> = None;
    for check in a.feasibility() {
        if section != Some(check.section) {
            section = Some(check.section);
            match check.section {
                RequirementSection::Foundations => println!("\nFOUNDATIONS (15 credits needed):"),
                RequirementSection::KnowledgeDomains => {
                    println!("\nKNOWLEDGE DOMAINS (15 credits needed, 3 each):")
                }
                RequirementSection::IntegrativeStudies => {
                    println!("\nINTEGRATIVE STUDIES (6 credits needed):")
                }
            }
        }
        println!(
            "   {} {} ({}): {} credits needed, {} courses available (at least {})",
            mark(check.satisfied()),
            check.category.code,
            check.category.name,
            check.credits,
            check.available,
            check.min_courses
        );
    }
    println!("\nEXPLORATION (9 credits needed):");
    println!("   Natural Sciences (GN) can be used (Inter-Domain allowed)");
    println!("   Additional from GA, GH, GN, GS, Inter-Domain needed");

    println!();
    banner("FINAL VERDICT");
    if a.all_categories_present() {
        println!("\n✅ SUCCESS: All required Gen Ed attributes are present in the course database!");
        println!("   Students can fulfill all Gen Ed requirements with available courses.");
    } else {
        println!(
            "\n⚠ WARNING: Missing Gen Ed attributes: {}",
            a.missing_categories().join(", ")
        );
        println!("   Some Gen Ed requirements may not be fulfillable.");
    }

    println!();
    banner("DETAILED COURSE COUNTS BY GEN ED ATTRIBUTE");
    println!();
    println!("{:<20} {:<10} Status", "Attribute", "Courses");
    println!("{}", "-".repeat(50));
    for stat in a.tag_stats() {
        let status = if stat.required {
            "✓ Required"
        } else {
            "  Optional/Unknown"
        };
        println!("{:<20} {:<10} {}", stat.tag, stat.count, status);
    }
    println!("\n{}\n", rule("="));
}

pub fn print_majors(a: &MajorsAnalysis) {
    println!("Total number of majors: {}\n", a.total_majors);
    banner("ANALYSIS RESULTS");
    println!("\nMajors WITH gen_ed_rules: {}", a.with_rules.len());
    println!("Majors WITHOUT gen_ed_rules: {}", a.without_rules.len());

    if a.variants.is_empty() {
        println!("\n⚠ NO majors have gen_ed_rules defined!");
        if let Some(first) = &a.first_major {
            println!("\nShowing structure of first major for reference:");
            println!("\nMajor: {}", first.id);
            println!("Fields: {}", first.fields.join(", "));
            println!("\nFull structure:");
            println!("{}", full_structure(&first.value, STRUCTURE_LIMIT));
        }
        return;
    }

    println!("\n{}", rule("="));
    println!("Number of unique gen_ed_rules variants: {}", a.variants.len());
    println!("{}", rule("="));
    if a.all_same() {
        println!("\n✓ ALL majors have the SAME gen_ed_rules!");
        println!("\nThe gen_ed_rules structure is:");
        print_pretty(&a.variants[0].rules);
        return;
    }

    println!("\n✗ Majors have DIFFERENT gen_ed_rules!");
    println!("\nFound {} different variants:\n", a.variants.len());
    for (idx, variant) in a.variants.iter().enumerate() {
        println!(
            "Variant {}: Used by {} major(s)",
            idx + 1,
            variant.majors.len()
        );
        let (shown, more) = sample(&variant.majors, SAMPLE_SIZE);
        if more > 0 {
            println!("Majors: {} ... and {} more", shown, more);
        } else {
            println!("Majors: {}", shown);
        }
        println!("gen_ed_rules structure:");
        print_pretty(&variant.rules);
        println!("{}", rule("-"));
    }
}

/// One-line outcome of a failed update. `None` when a full report is printed
/// instead.
pub fn failure_summary(path: &Path, e: &GenEdError) -> Option<String> {
    match e {
        GenEdError::WriteCorruption { .. } => None,
        GenEdError::ReadingFile { .. }
        | GenEdError::InvalidSource { .. }
        | GenEdError::Layout { .. }
        | GenEdError::InvalidTargets { .. }
        | GenEdError::Backup { .. }
        | GenEdError::Encoding { .. } => Some(format!(
            "❌ ABORTED: {} was not modified ({})",
            path.display(),
            e
        )),
        GenEdError::Writing { .. } | GenEdError::Restore { .. } => Some(format!(
            "❌ ERROR: the update of {} failed ({})",
            path.display(),
            e
        )),
    }
}

// Pretty JSON cut after `limit` characters.
fn full_structure(v: &serde_json::Value, limit: usize) -> String {
    let text = serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string());
    match text.char_indices().nth(limit) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text,
    }
}

fn print_pretty(v: &serde_json::Value) {
    match serde_json::to_string_pretty(v) {
        Ok(s) => println!("{}", s),
        Err(_) => println!("{}", v),
    }
}
