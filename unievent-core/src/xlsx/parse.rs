//! Read events out of the events sheet.

use calamine::{Data, Range};
use chrono::{Local, NaiveDateTime};
use tracing::warn;

use super::column;
use crate::event::{Event, EventDetails};

/// Text form of date-time cells, also accepted when the cell holds text.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Parse every data row (row 1 onwards) of the events sheet.
///
/// Rows with an empty code are skipped. Unreadable capacity, cost or date
/// cells fall back to 0, 0.0 and the current local time.
pub fn parse_events(range: &Range<Data>, default_header_image: &str) -> Vec<Event> {
    let Some((last_row, _)) = range.end() else {
        return Vec::new();
    };

    (1..=last_row)
        .filter_map(|row| parse_row(range, row, default_header_image))
        .collect()
}

fn parse_row(range: &Range<Data>, row: u32, default_header_image: &str) -> Option<Event> {
    let cell = |col: u16| range.get_value((row, u32::from(col)));
    let text = |col: u16| cell(col).map(cell_text).unwrap_or_default();

    let code = text(column::CODE);
    if code.trim().is_empty() {
        return None;
    }

    let date_time = cell(column::DATE_TIME)
        .and_then(cell_datetime)
        .unwrap_or_else(|| {
            warn!(row, code = %code, "unreadable date, using the current time");
            Local::now().naive_local()
        });

    let capacity_text = text(column::CAPACITY);
    let capacity = parse_capacity(&capacity_text).unwrap_or_else(|| {
        warn!(row, code = %code, capacity = %capacity_text, "unreadable capacity, using 0");
        0
    });

    let cost_text = text(column::COST);
    let cost = parse_cost(&cost_text).unwrap_or_else(|| {
        warn!(row, code = %code, cost = %cost_text, "unreadable cost, using 0.0");
        0.0
    });

    let mut header_image = text(column::HEADER_IMAGE);
    if header_image.is_empty() {
        header_image = default_header_image.to_string();
    }

    let details = EventDetails {
        name: text(column::NAME),
        description: text(column::DESCRIPTION),
        location: text(column::LOCATION),
        header_image,
        date_time,
        capacity,
        cost,
    };

    // Long rosters continue in the columns after RegisteredStudents
    let last_col = range.end().map_or(0, |(_, col)| col);
    let mut students: Vec<String> = (u32::from(column::STUDENTS)..=last_col)
        .flat_map(|col| {
            let value = range.get_value((row, col)).map(cell_text);
            parse_students(&value.unwrap_or_default())
        })
        .collect();
    if students.len() > capacity as usize {
        warn!(
            row,
            code = %code,
            registered = students.len(),
            capacity,
            "more students than seats, keeping the earliest registrations"
        );
        students.truncate(capacity as usize);
    }

    let mut event = match Event::new(code, details) {
        Ok(event) => event,
        Err(e) => {
            warn!(row, error = %e, "skipping row");
            return None;
        }
    };
    event.set_registered_students(students).ok()?;

    Some(event)
}

/// Render any cell as text. Whole numbers lose their trailing `.0`.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Float(f) if f.is_finite() && f.fract() == 0.0 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format(DATE_TIME_FORMAT).to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

fn cell_datetime(cell: &Data) -> Option<NaiveDateTime> {
    match cell {
        Data::DateTime(dt) => dt.as_datetime(),
        Data::DateTimeIso(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").ok(),
        Data::String(s) => NaiveDateTime::parse_from_str(s.trim(), DATE_TIME_FORMAT).ok(),
        _ => None,
    }
}

/// Capacity is stored as a number but may come back as text like `"20.0"`.
/// Fractions truncate; negative values clamp to zero.
pub fn parse_capacity(text: &str) -> Option<u32> {
    let value: f64 = text.trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    // Float to int casts saturate at both ends
    Some(value as u32)
}

/// Accepts `Free`, empty, `0.0`, `$12.50`, or a bare number.
pub fn parse_cost(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() || text.contains("Free") || text == "0.0" {
        return Some(0.0);
    }

    let amount = match text.split_once('$') {
        Some((_, after)) => after,
        None => text,
    };
    let digits: String = amount
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    digits.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Split a comma-separated roster, dropping blanks.
pub fn parse_students(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
