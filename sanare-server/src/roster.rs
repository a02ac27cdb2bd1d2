//! Roster parsing for bulk member provisioning
//!
//! Accepts CSV text with exactly seven columns per row:
//! First Name, Last Name, Email, Gender, ID, Department/Grade,
//! Designation/Section. A header row is tolerated and skipped. The last
//! two columns may be empty. Parsing is syntactic only; field rules are
//! enforced by the directory at insertion.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Gender, MemberDraft};

pub const ROSTER_COLUMNS: usize = 7;

/// Split one CSV line. Double quotes wrap fields containing commas;
/// doubled quotes inside a quoted field escape a literal quote.
fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    quoted = false;
                }
            }
            '"' if current.is_empty() => quoted = true,
            ',' if !quoted => {
                fields.push(current.trim().to_string());
                current = String::new();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

fn looks_like_header(fields: &[String]) -> bool {
    fields
        .first()
        .map(|f| f.to_lowercase().replace(' ', "") == "firstname")
        .unwrap_or(false)
}

fn opt(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Parse roster CSV text into provisioning drafts.
///
/// Row numbers in errors count data rows from 1, after any header.
pub fn parse_roster(text: &str) -> AppResult<Vec<MemberDraft>> {
    let mut drafts = Vec::new();
    let mut row = 0usize;
    let mut first_content_line = true;

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_line(line);
        if first_content_line {
            first_content_line = false;
            if looks_like_header(&fields) {
                continue;
            }
        }
        row += 1;

        if fields.len() != ROSTER_COLUMNS {
            return Err(AppError::with_message(
                ErrorCode::RosterColumnMismatch,
                format!(
                    "Row {row}: expected {ROSTER_COLUMNS} columns, found {}",
                    fields.len()
                ),
            )
            .with_detail("row", row));
        }

        let gender = Gender::parse(&fields[3]).ok_or_else(|| {
            AppError::validation_field("gender", "Gender must be male, female, or other.")
                .with_detail("row", row)
        })?;

        drafts.push(MemberDraft {
            first_name: fields[0].clone(),
            last_name: fields[1].clone(),
            email: fields[2].clone(),
            gender,
            identifier: fields[4].clone(),
            department_grade: opt(&fields[5]),
            designation_section: opt(&fields[6]),
        });
    }

    Ok(drafts)
}
