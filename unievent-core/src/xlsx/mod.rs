//! Spreadsheet-backed event storage.
//!
//! Events live in one sheet of an `.xlsx` workbook at a fixed position
//! (index 4, named `Events`, by default). Other sheets belong to other parts
//! of the university system; `write_all` carries their cell values over
//! untouched and only rebuilds the events sheet.

mod generate;
mod parse;

pub use generate::{format_cost, format_students};
pub use parse::{DATE_TIME_FORMAT, parse_capacity, parse_cost, parse_students};

use std::path::{Path, PathBuf};

use calamine::{Data, Range, Reader, Xlsx, open_workbook};
use rust_xlsxwriter::Workbook;
use tracing::{debug, info, warn};

use crate::config::UniEventConfig;
use crate::error::UniEventResult;
use crate::event::Event;
use crate::store::EventStore;

/// Column positions within the events sheet.
pub mod column {
    pub const CODE: u16 = 0;
    pub const NAME: u16 = 1;
    pub const DESCRIPTION: u16 = 2;
    pub const LOCATION: u16 = 3;
    pub const DATE_TIME: u16 = 4;
    pub const CAPACITY: u16 = 5;
    pub const COST: u16 = 6;
    pub const HEADER_IMAGE: u16 = 7;
    pub const STUDENTS: u16 = 8;
}

/// Header titles and column widths, in column order.
pub const COLUMNS: [(&str, f64); 9] = [
    ("EventCode", 15.0),
    ("EventName", 20.0),
    ("Description", 40.0),
    ("Location", 15.0),
    ("DateTime", 20.0),
    ("Capacity", 10.0),
    ("Cost", 10.0),
    ("HeaderImagePath", 30.0),
    ("RegisteredStudents", 50.0),
];

#[derive(Debug, Clone)]
pub struct XlsxEventStore {
    path: PathBuf,
    sheet_index: usize,
    sheet_name: String,
    default_header_image: String,
}

impl XlsxEventStore {
    pub fn from_config(config: &UniEventConfig) -> Self {
        XlsxEventStore {
            path: config.data_path(),
            sheet_index: config.events_sheet_index,
            sheet_name: config.events_sheet_name.clone(),
            default_header_image: config.default_header_image.clone(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every sheet of the workbook, in order.
    fn read_sheets(&self) -> UniEventResult<Vec<(String, Range<Data>)>> {
        let mut workbook: Xlsx<_> = open_workbook(&self.path)?;

        let mut sheets = Vec::new();
        for name in workbook.sheet_names() {
            let range = workbook.worksheet_range(&name)?;
            sheets.push((name, range));
        }

        Ok(sheets)
    }

    /// Names for every sheet of the rebuilt workbook.
    ///
    /// The events sheet keeps its configured name. A carried-over sheet whose
    /// name clashes with it (Excel compares names case-insensitively) is
    /// renamed, and filler sheets get `Sheet{n}` names that are not taken.
    fn planned_sheet_names(&self, existing: &[String]) -> Vec<String> {
        let count = existing.len().max(self.sheet_index + 1);
        let mut taken = vec![self.sheet_name.to_lowercase()];
        let mut names = Vec::with_capacity(count);

        for position in 0..count {
            if position == self.sheet_index {
                names.push(self.sheet_name.clone());
                continue;
            }

            let wanted = existing
                .get(position)
                .cloned()
                .unwrap_or_else(|| format!("Sheet{position}"));
            let name = unique_sheet_name(&wanted, &taken);
            if name != wanted && position < existing.len() {
                warn!(
                    from = %wanted,
                    to = %name,
                    "renaming sheet that clashes with the events sheet"
                );
            }

            taken.push(name.to_lowercase());
            names.push(name);
        }

        names
    }
}

/// Excel's limit on sheet name length, in characters.
const MAX_SHEET_NAME_LEN: usize = 31;

/// `wanted`, or `wanted (2)`, `wanted (3)`, ... if it is already `taken`.
/// `taken` holds lowercased names.
fn unique_sheet_name(wanted: &str, taken: &[String]) -> String {
    let is_free = |name: &str| !taken.contains(&name.to_lowercase());
    if is_free(wanted) {
        return wanted.to_string();
    }

    (2..)
        .map(|n| {
            let suffix = format!(" ({n})");
            let keep = MAX_SHEET_NAME_LEN.saturating_sub(suffix.len());
            let base: String = wanted.chars().take(keep).collect();
            format!("{base}{suffix}")
        })
        .find(|name| is_free(name))
        .unwrap_or_else(|| wanted.to_string())
}

impl EventStore for XlsxEventStore {
    fn read_all(&self) -> UniEventResult<Vec<Event>> {
        let sheets = self.read_sheets()?;

        let Some((name, range)) = sheets.get(self.sheet_index) else {
            warn!(
                path = %self.path.display(),
                sheets = sheets.len(),
                index = self.sheet_index,
                "workbook has no events sheet"
            );
            return Ok(Vec::new());
        };

        let events = parse::parse_events(range, &self.default_header_image);
        info!(count = events.len(), sheet = %name, "read events");
        Ok(events)
    }

    /// Rebuild the workbook with a fresh events sheet and write it to a
    /// temporary file next to the target, then rename it into place.
    ///
    /// A missing workbook is created. An existing one that cannot be read is
    /// left alone and the error returned.
    fn write_all(&self, events: &[Event]) -> UniEventResult<()> {
        let existing = if self.path.exists() {
            self.read_sheets()?
        } else {
            debug!(path = %self.path.display(), "creating new workbook");
            Vec::new()
        };

        let existing_names: Vec<String> = existing.iter().map(|(name, _)| name.clone()).collect();
        let mut workbook = Workbook::new();

        for (position, name) in self.planned_sheet_names(&existing_names).iter().enumerate() {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(name)?;

            if position == self.sheet_index {
                generate::write_events(worksheet, events)?;
            } else if let Some((_, range)) = existing.get(position) {
                generate::copy_cells(worksheet, range)?;
            }
        }

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let temp = tempfile::Builder::new()
            .prefix(".unievent-")
            .suffix(".xlsx")
            .tempfile_in(dir)?;
        workbook.save(temp.path())?;
        temp.persist(&self.path).map_err(|e| e.error)?;

        info!(count = events.len(), path = %self.path.display(), "saved events");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventDetails;
    use crate::service::EventService;
    use chrono::{Local, NaiveDate};

    fn store_at(path: &Path) -> XlsxEventStore {
        XlsxEventStore::from_config(&UniEventConfig {
            data_file: path.to_path_buf(),
            ..UniEventConfig::default()
        })
    }

    fn sheet_store(path: &Path, index: usize, name: &str) -> XlsxEventStore {
        XlsxEventStore::from_config(&UniEventConfig {
            data_file: path.to_path_buf(),
            events_sheet_index: index,
            events_sheet_name: name.to_string(),
            ..UniEventConfig::default()
        })
    }

    fn make_event(code: &str, capacity: u32, cost: f64, students: &[&str]) -> Event {
        let details = EventDetails {
            name: format!("{code} night"),
            description: "Music, food and friends".to_string(),
            location: "Main Hall".to_string(),
            header_image: format!("images/{code}.png"),
            date_time: NaiveDate::from_ymd_opt(2025, 10, 31)
                .unwrap()
                .and_hms_opt(20, 0, 0)
                .unwrap(),
            capacity,
            cost,
        };
        let mut event = Event::new(code, details).unwrap();
        event
            .set_registered_students(students.iter().map(|s| s.to_string()).collect())
            .unwrap();
        event
    }

    /// Workbook with a Students sheet at index 2 and a hand-written events
    /// sheet at index 4. Rows are given as plain strings.
    fn write_fixture(path: &Path, event_rows: &[[&str; 9]]) {
        let mut workbook = Workbook::new();
        for name in ["Admins", "Faculty", "Students", "Courses"] {
            let sheet = workbook.add_worksheet();
            sheet.set_name(name).unwrap();
            if name == "Students" {
                sheet.write_string(0, 0, "StudentId").unwrap();
                sheet.write_string(1, 0, "alice").unwrap();
                sheet.write_number(1, 1, 3.5).unwrap();
            }
        }

        let events = workbook.add_worksheet();
        events.set_name("Events").unwrap();
        for (col, (title, _)) in COLUMNS.iter().enumerate() {
            events.write_string(0, col as u16, *title).unwrap();
        }
        for (row, cells) in event_rows.iter().enumerate() {
            for (col, value) in cells.iter().enumerate() {
                if !value.is_empty() {
                    events
                        .write_string(row as u32 + 1, col as u16, *value)
                        .unwrap();
                }
            }
        }

        workbook.save(path).unwrap();
    }

    #[test]
    fn test_roundtrip_preserves_order_and_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(&dir.path().join("data.xlsx"));
        let events = vec![
            make_event("ZULU", 3, 0.0, &["alice", "bob"]),
            make_event("ALPHA", 1, 12.5, &[]),
            make_event("MIKE", 50, 10.0, &["carol"]),
        ];

        store.write_all(&events).unwrap();
        let loaded = store.read_all().unwrap();

        assert_eq!(loaded.len(), 3);
        for (written, read) in events.iter().zip(&loaded) {
            assert_eq!(read.code(), written.code());
            assert_eq!(read.name(), written.name());
            assert_eq!(read.location(), written.location());
            assert_eq!(read.header_image(), written.header_image());
            assert_eq!(read.capacity(), written.capacity());
            assert_eq!(read.cost(), written.cost());
            assert_eq!(read.registered_students(), written.registered_students());
        }
    }

    #[test]
    fn test_write_preserves_other_sheets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.xlsx");
        write_fixture(&path, &[]);
        let store = store_at(&path);

        store.write_all(&[make_event("A", 2, 0.0, &[])]).unwrap();

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        assert_eq!(
            workbook.sheet_names(),
            ["Admins", "Faculty", "Students", "Courses", "Events"]
        );
        let students = workbook.worksheet_range("Students").unwrap();
        assert_eq!(
            students.get_value((1, 0)),
            Some(&Data::String("alice".to_string()))
        );
        assert_eq!(students.get_value((1, 1)), Some(&Data::Float(3.5)));
        assert_eq!(store.read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_write_pads_missing_sheets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.xlsx");
        let store = store_at(&path);

        store.write_all(&[]).unwrap();

        let workbook: Xlsx<_> = open_workbook(&path).unwrap();
        assert_eq!(
            workbook.sheet_names(),
            ["Sheet0", "Sheet1", "Sheet2", "Sheet3", "Events"]
        );
        assert!(store.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_custom_sheet_position() {
        let dir = tempfile::tempdir().unwrap();
        let store = sheet_store(&dir.path().join("data.xlsx"), 0, "Activities");

        store.write_all(&[make_event("A", 2, 0.0, &["alice"])]).unwrap();
        let loaded = store.read_all().unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].registered_students(), ["alice"]);
    }

    #[test]
    fn test_read_applies_fallbacks_and_skips_blank_codes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.xlsx");
        write_fixture(
            &path,
            &[
                [
                    "GALA", "Gala", "Formal dinner", "Ballroom", "2025-12-01 19:30", "20.0",
                    "$25.0", "", "alice, bob",
                ],
                ["", "Orphan", "", "", "", "5", "Free", "", ""],
                [
                    "BROKEN", "Broken", "", "", "someday", "many", "expensive", "x.png", "",
                ],
                [
                    "OVER", "Overbooked", "", "", "2025-01-01 10:00", "1", "Free", "",
                    "alice, bob",
                ],
            ],
        );
        let store = store_at(&path);

        let before = Local::now().naive_local();
        let loaded = store.read_all().unwrap();

        let codes: Vec<_> = loaded.iter().map(|e| e.code()).collect();
        assert_eq!(codes, ["GALA", "BROKEN", "OVER"]);

        let gala = &loaded[0];
        assert_eq!(gala.capacity(), 20);
        assert_eq!(gala.cost(), 25.0);
        assert_eq!(gala.header_image(), "images/default_header.png");
        assert_eq!(gala.registered_students(), ["alice", "bob"]);
        assert_eq!(
            gala.date_time().format(DATE_TIME_FORMAT).to_string(),
            "2025-12-01 19:30"
        );

        let broken = &loaded[1];
        assert_eq!(broken.capacity(), 0);
        assert_eq!(broken.cost(), 0.0);
        assert!(broken.date_time() >= before);
        assert_eq!(broken.header_image(), "x.png");

        assert_eq!(loaded[2].registered_students(), ["alice"]);
    }

    #[test]
    fn test_registered_ids_survive_a_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.xlsx");
        let events = vec![make_event("A", 1, 0.0, &[]), make_event("B", 3, 0.0, &[])];
        store_at(&path).write_all(&events).unwrap();

        let mut service = EventService::load(store_at(&path));
        for student in ["Smith, J", "", " bob"] {
            assert!(service.register_student("A", student).is_err());
        }
        service.register_student("A", "Smith J").unwrap();
        service.register_student("B", "bob").unwrap();
        assert!(service.is_in_sync());

        let reloaded = EventService::load(store_at(&path));
        assert!(reloaded.event("A").unwrap().is_registered("Smith J"));
        assert_eq!(reloaded.event("A").unwrap().registered_students(), ["Smith J"]);
        assert_eq!(reloaded.event("B").unwrap().registered_students(), ["bob"]);
    }

    #[test]
    fn test_large_roster_spills_across_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.xlsx");
        let students: Vec<String> = (0..4000).map(|i| format!("student{i:05}")).collect();
        let mut big = make_event("EXPO", 5000, 0.0, &[]);
        big.set_registered_students(students.clone()).unwrap();
        let events = vec![big, make_event("SMALL", 2, 0.0, &["alice"])];

        let mut service = EventService::load(store_at(&path));
        for event in events {
            service.add_event(event).unwrap();
        }
        service.register_student("EXPO", "late").unwrap();
        assert!(service.is_in_sync());

        let loaded = store_at(&path).read_all().unwrap();
        assert_eq!(loaded[0].registered_count(), 4001);
        assert_eq!(&loaded[0].registered_students()[..4000], students.as_slice());
        assert_eq!(loaded[0].registered_students()[4000], "late");
        assert_eq!(loaded[1].registered_students(), ["alice"]);
    }

    #[test]
    fn test_write_renames_sheets_that_clash_with_events_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.xlsx");
        sheet_store(&path, 0, "Events")
            .write_all(&[make_event("OLD", 1, 0.0, &[])])
            .unwrap();

        let store = store_at(&path);
        store.write_all(&[make_event("NEW", 1, 0.0, &[])]).unwrap();

        let workbook: Xlsx<_> = open_workbook(&path).unwrap();
        assert_eq!(
            workbook.sheet_names(),
            ["Events (2)", "Sheet1", "Sheet2", "Sheet3", "Events"]
        );
        let loaded = store.read_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].code(), "NEW");

        // A second save keeps working once the names are distinct
        store.write_all(&loaded).unwrap();
    }

    #[test]
    fn test_unique_sheet_name() {
        let taken = vec!["events".to_string(), "sheet1".to_string(), "sheet1 (2)".to_string()];

        assert_eq!(unique_sheet_name("Courses", &taken), "Courses");
        assert_eq!(unique_sheet_name("EVENTS", &taken), "EVENTS (2)");
        assert_eq!(unique_sheet_name("Sheet1", &taken), "Sheet1 (3)");

        let long = "x".repeat(MAX_SHEET_NAME_LEN);
        let taken = vec![long.clone()];
        let renamed = unique_sheet_name(&long, &taken);
        assert_eq!(renamed.chars().count(), MAX_SHEET_NAME_LEN);
        assert!(renamed.ends_with(" (2)"));
    }

    #[test]
    fn test_read_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(&dir.path().join("missing.xlsx"));

        assert!(store.read_all().is_err());
    }

    #[test]
    fn test_write_refuses_to_clobber_unreadable_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.xlsx");
        std::fs::write(&path, b"not a workbook").unwrap();
        let store = store_at(&path);

        assert!(store.write_all(&[make_event("A", 1, 0.0, &[])]).is_err());
        assert_eq!(std::fs::read(&path).unwrap(), b"not a workbook");
    }
}
