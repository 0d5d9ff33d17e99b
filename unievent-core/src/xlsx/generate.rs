//! Write the events sheet, and copy unrelated sheets through unchanged.

use calamine::{Data, Range};
use rust_xlsxwriter::{Color, Format, FormatBorder, Worksheet, XlsxError};

use super::{COLUMNS, column};
use crate::event::Event;

/// `Free` for zero, otherwise the amount with a `$` prefix (`$10.0`, `$12.5`).
pub fn format_cost(cost: f64) -> String {
    if cost == 0.0 {
        "Free".to_string()
    } else if cost.fract() == 0.0 {
        format!("${cost:.1}")
    } else {
        format!("${cost}")
    }
}

/// Excel refuses cell text longer than this many characters.
pub const CELL_TEXT_LIMIT: usize = 32_767;

/// Join a roster with `", "` into as many cell texts as needed so that none
/// exceeds [`CELL_TEXT_LIMIT`]. Ids are never split across cells. Blank ids
/// are skipped. Always returns at least one (possibly empty) text.
pub fn format_students(students: &[String]) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for student in students.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        let len = student.chars().count();
        if !current.is_empty() && current_len + 2 + len > CELL_TEXT_LIMIT {
            cells.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push_str(", ");
            current_len += 2;
        }
        current.push_str(student);
        current_len += len;
    }

    if !current.is_empty() || cells.is_empty() {
        cells.push(current);
    }
    cells
}

/// Fill `worksheet` with the header row and one row per event.
///
/// A roster too long for one cell continues in the columns after
/// `RegisteredStudents`.
pub fn write_events(worksheet: &mut Worksheet, events: &[Event]) -> Result<(), XlsxError> {
    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x9BC2E6))
        .set_border(FormatBorder::Thin);
    let data_format = Format::new().set_border(FormatBorder::Thin);
    let date_format = Format::new()
        .set_border(FormatBorder::Thin)
        .set_num_format("yyyy-mm-dd hh:mm");

    for (col, (title, width)) in COLUMNS.iter().enumerate() {
        let col = col as u16;
        worksheet.set_column_width(col, *width)?;
        worksheet.write_string_with_format(0, col, *title, &header_format)?;
    }

    for (index, event) in events.iter().enumerate() {
        let row = index as u32 + 1;

        worksheet.write_string_with_format(row, column::CODE, event.code(), &data_format)?;
        worksheet.write_string_with_format(row, column::NAME, event.name(), &data_format)?;
        worksheet.write_string_with_format(
            row,
            column::DESCRIPTION,
            event.description(),
            &data_format,
        )?;
        worksheet.write_string_with_format(row, column::LOCATION, event.location(), &data_format)?;
        worksheet.write_datetime_with_format(
            row,
            column::DATE_TIME,
            &event.date_time(),
            &date_format,
        )?;
        worksheet.write_number_with_format(row, column::CAPACITY, event.capacity(), &data_format)?;
        worksheet.write_string_with_format(
            row,
            column::COST,
            format_cost(event.cost()),
            &data_format,
        )?;
        worksheet.write_string_with_format(
            row,
            column::HEADER_IMAGE,
            event.header_image(),
            &data_format,
        )?;
        for (offset, text) in format_students(event.registered_students())
            .iter()
            .enumerate()
        {
            let col = u16::try_from(offset)
                .ok()
                .and_then(|offset| column::STUDENTS.checked_add(offset))
                .unwrap_or(u16::MAX);
            worksheet.write_string_with_format(row, col, text, &data_format)?;
        }
    }

    Ok(())
}

/// Copy every non-empty cell value of `range` to the same position in
/// `worksheet`. Formatting other than dates is not carried over.
pub fn copy_cells(worksheet: &mut Worksheet, range: &Range<Data>) -> Result<(), XlsxError> {
    let Some((start_row, start_col)) = range.start() else {
        return Ok(());
    };
    let date_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");

    for (row, col, value) in range.used_cells() {
        let row = start_row + row as u32;
        let Ok(col) = u16::try_from(start_col as usize + col) else {
            continue;
        };

        match value {
            Data::Int(i) => worksheet.write_number(row, col, *i as f64)?,
            Data::Float(f) => worksheet.write_number(row, col, *f)?,
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
                worksheet.write_string(row, col, s)?
            }
            Data::Bool(b) => worksheet.write_boolean(row, col, *b)?,
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(datetime) => {
                    worksheet.write_datetime_with_format(row, col, &datetime, &date_format)?
                }
                None => continue,
            },
            _ => continue,
        };
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cost() {
        assert_eq!(format_cost(0.0), "Free");
        assert_eq!(format_cost(10.0), "$10.0");
        assert_eq!(format_cost(12.5), "$12.5");
    }

    #[test]
    fn test_format_students_skips_blanks() {
        let students = vec!["alice".to_string(), " ".to_string(), " bob ".to_string()];
        assert_eq!(format_students(&students), ["alice, bob"]);
        assert_eq!(format_students(&[]), [""]);
    }

    #[test]
    fn test_format_students_spills_long_rosters() {
        let students: Vec<String> = (0..4000).map(|i| format!("student{i:05}")).collect();

        let cells = format_students(&students);

        assert!(cells.len() > 1);
        assert!(cells.iter().all(|c| c.chars().count() <= CELL_TEXT_LIMIT));
        let rejoined: Vec<&str> = cells.iter().flat_map(|c| c.split(", ")).collect();
        assert_eq!(rejoined, students);
    }
}
