//! Plain-text rendering of users for terminal output.

#[cfg(test)]
#[path = "output_test.rs"]
mod output_test;

use time::format_description::well_known::Rfc3339;
use users::{User, truncate_chars};

const HEADERS: [&str; 6] = ["ID", "NAME", "EMAIL", "ABOUT", "CREATED", "UPDATED"];
const ABOUT_MAX_CHARS: usize = 32;
const EMPTY_CELL: &str = "-";

fn timestamp(at: time::OffsetDateTime) -> String {
    at.format(&Rfc3339).unwrap_or_else(|_| at.to_string())
}

fn cells(user: &User) -> [String; 6] {
    let optional = |value: Option<&str>| match value {
        None | Some("") => EMPTY_CELL.to_owned(),
        Some(text) => text.to_owned(),
    };
    [
        user.id.clone(),
        optional(user.name.as_deref()),
        user.email.clone(),
        truncate_chars(&optional(user.about.as_deref()), ABOUT_MAX_CHARS),
        timestamp(user.created_at),
        timestamp(user.updated_at),
    ]
}

/// Left-aligned, space-padded table with a header row.
pub fn users_table(users: &[User]) -> String {
    let rows: Vec<[String; 6]> = users.iter().map(cells).collect();
    let mut widths = HEADERS.map(|header| header.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &HEADERS.map(str::to_owned), &widths);
    for row in &rows {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String; 6], widths: &[usize; 6]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(padded.join("  ").trim_end());
    out.push('\n');
}
