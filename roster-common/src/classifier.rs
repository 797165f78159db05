//! Spreadsheet row classification
//!
//! The roster sheet mixes two kinds of rows in one range:
//! - assignment headers such as `55 — Patrol Division`
//! - vehicle rows keyed by a row label in the first cell
//!
//! The em-dash in the first cell is the only discriminator.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{Assignment, Vehicle};

/// Separator used by assignment header rows
pub const EM_DASH: char = '—';

/// Vehicle rows are padded to this many cells before field extraction
pub const VEHICLE_ROW_WIDTH: usize = 13;

static ASSIGNMENT_HEADER: Lazy<Regex> = Lazy::new(|| {
    // The description stops at any line terminator, including U+2028/U+2029
    Regex::new(r"^([0-9]{2,}[A-Z]?)\s*—\s*([^\r\n\u{2028}\u{2029}]+)$")
        .expect("assignment header pattern is valid")
});

/// Column offsets within a padded vehicle row
mod col {
    pub const ID: usize = 0;
    pub const PLATE: usize = 1;
    pub const MAKE_MODEL: usize = 2;
    pub const ALPR: usize = 4;
    pub const OL: usize = 9;
    pub const AUTHORIZED: usize = 10;
    pub const PURPOSE: usize = 11;
    pub const NOTES: usize = 12;
}

/// Why a row produced no record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Row has no cells or an empty first cell
    Empty,
    /// First cell has an em-dash but is not `<code> — <description>`
    MalformedHeader,
}

/// Result of classifying one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    Assignment(Assignment),
    Vehicle(Vehicle),
    Skip(SkipReason),
}

/// Classify one raw spreadsheet row
///
/// Never fails: the worst case for a short or odd vehicle row is a
/// record with empty-string fields.
pub fn classify(row: &[String]) -> Classified {
    let first = match row.first() {
        Some(cell) if !cell.is_empty() => cell,
        _ => return Classified::Skip(SkipReason::Empty),
    };

    if first.contains(EM_DASH) {
        return match parse_assignment_header(first) {
            Some(assignment) => Classified::Assignment(assignment),
            None => Classified::Skip(SkipReason::MalformedHeader),
        };
    }

    Classified::Vehicle(parse_vehicle(row))
}

/// Parse `<code> — <description>` into an assignment
pub fn parse_assignment_header(cell: &str) -> Option<Assignment> {
    let caps = ASSIGNMENT_HEADER.captures(cell)?;
    let code = caps.get(1)?.as_str();
    let description = caps.get(2)?.as_str();

    Some(Assignment {
        id: format!("1{}", code),
        name: format!("{} ({})", description, code),
    })
}

fn parse_vehicle(row: &[String]) -> Vehicle {
    let mut padded: Vec<&str> = row.iter().map(String::as_str).collect();
    if padded.len() < VEHICLE_ROW_WIDTH {
        padded.resize(VEHICLE_ROW_WIDTH, "");
    }

    Vehicle {
        id: padded[col::ID].to_string(),
        plate: padded[col::PLATE].to_string(),
        make_model: padded[col::MAKE_MODEL].to_string(),
        alpr: padded[col::ALPR] == "1",
        ol: padded[col::OL].to_string(),
        authorized: padded[col::AUTHORIZED].to_string(),
        purpose: padded[col::PURPOSE].to_string(),
        notes: padded[col::NOTES].to_string(),
    }
}
