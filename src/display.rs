use csv::WriterBuilder;
use std::io::Write;
use std::path::Path;

use crate::coverage::dates::weekday_name;
use crate::coverage::{CoverageEntry, CoverageResult, CoverageSummary, Standing};
use crate::error::CoverageError;

/// Formats a person with their seniority tag
pub fn format_person_name(seniority: Option<u8>, name: &str) -> String {
    match seniority {
        Some(level) => format!("[PGY-{}] {}", level, name),
        None => name.to_string(),
    }
}

fn relaxation_note(entry: &CoverageEntry) -> &'static str {
    if entry.relaxed_same_weekday {
        "same clinic day"
    } else if entry.relaxed_back_to_back {
        "back-to-back"
    } else {
        ""
    }
}

/// Writes the coverage table as text, one slot per line
pub fn write_coverage_report<W: Write>(
    out: &mut W,
    result: &CoverageResult,
    summary: &CoverageSummary,
) -> std::io::Result<()> {
    writeln!(out, "=== Weekly Clinic Coverage ===")?;
    writeln!(
        out,
        "{} slots, {} assigned (target total {}), penalty {:.1}",
        summary.slots, summary.assigned, summary.target_total, result.penalty
    )?;
    if summary.uncovered > 0 {
        writeln!(out, "⚠️  {} slot(s) without coverage", summary.uncovered)?;
    } else {
        writeln!(out, "All slots covered")?;
    }
    writeln!(out)?;

    for entry in &result.entries {
        let coverer = match &entry.coverer {
            Some(name) => format!(
                "{} ({}, {})",
                format_person_name(entry.coverer_seniority, name),
                entry.coverer_rotation.as_deref().unwrap_or(""),
                weekday_name(entry.coverer_weekday.unwrap_or(0)),
            ),
            None => "[NO COVERAGE]".to_string(),
        };
        let note = relaxation_note(entry);

        write!(
            out,
            "  Block {:>2} W{} {} ({} – {}) {} {} -> {}",
            entry.period,
            entry.week,
            entry.appointment_date.format("%a %b %-d"),
            entry.week_start.format("%b %-d"),
            entry.week_end.format("%b %-d"),
            format_person_name(entry.absent_seniority, &entry.absent),
            weekday_name(entry.absent_weekday),
            coverer,
        )?;
        if note.is_empty() {
            writeln!(out)?;
        } else {
            writeln!(out, "  [relaxed: {}]", note)?;
        }
    }

    writeln!(out, "\nLoad by seniority (target {} each):", summary.target_per_person)?;
    for group in &summary.groups {
        match group.seniority {
            Some(level) => writeln!(out, "  PGY-{}", level)?,
            None => writeln!(out, "  Unknown level")?,
        }
        for member in &group.members {
            let marker = match member.standing {
                Standing::Under => " (under)",
                Standing::OnTarget => "",
                Standing::Over => " (over)",
            };
            writeln!(out, "    {:<20} {}{}", member.name, member.count, marker)?;
        }
    }

    Ok(())
}

/// Prints the coverage table to stdout
pub fn print_coverage_report(result: &CoverageResult, summary: &CoverageSummary) -> std::io::Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    write_coverage_report(&mut handle, result, summary)
}

const EXPORT_HEADERS: &[&str] = &[
    "block",
    "week",
    "clinic_date",
    "week_start",
    "week_end",
    "absent",
    "absent_clinic_day",
    "coverer",
    "coverer_rotation",
    "coverer_clinic_day",
    "coverer_pgy",
    "status",
    "relaxed_back_to_back",
    "relaxed_same_clinic_day",
];

/// Exports the coverage entries as CSV
pub fn export_coverage_csv<W: Write>(out: W, result: &CoverageResult) -> Result<(), CoverageError> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(out);
    wtr.write_record(EXPORT_HEADERS)?;

    for entry in &result.entries {
        let status = match entry.coverer {
            Some(_) => "OK",
            None => "NO_COVERAGE",
        };
        wtr.write_record([
            entry.period.to_string(),
            entry.week.to_string(),
            entry.appointment_date.to_string(),
            entry.week_start.to_string(),
            entry.week_end.to_string(),
            entry.absent.clone(),
            weekday_name(entry.absent_weekday).to_string(),
            entry.coverer.clone().unwrap_or_default(),
            entry.coverer_rotation.clone().unwrap_or_default(),
            entry.coverer_weekday.map(|d| weekday_name(d).to_string()).unwrap_or_default(),
            entry.coverer_seniority.map(|l| l.to_string()).unwrap_or_default(),
            status.to_string(),
            entry.relaxed_back_to_back.to_string(),
            entry.relaxed_same_weekday.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes the CSV export to a file
pub fn write_coverage_to_file<P: AsRef<Path>>(result: &CoverageResult, path: P) -> Result<(), CoverageError> {
    let file = std::fs::File::create(path)?;
    export_coverage_csv(file, result)
}
