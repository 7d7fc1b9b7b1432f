use csv::ReaderBuilder;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Header text of each roster column, keyed by the record field it fills.
/// Lets a localized spreadsheet export be read without renaming columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub name: String,
    pub attendance: String,
    pub fixed_area: String,
    pub preferred_area: String,
    pub preferred_section: String,
    pub team_name: String,
    pub group_leader: String,
    pub group_member: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            name: "Name".to_string(),
            attendance: "Attendance".to_string(),
            fixed_area: "Fixed Area".to_string(),
            preferred_area: "Preferred Area".to_string(),
            preferred_section: "Preferred Section".to_string(),
            team_name: "Team".to_string(),
            group_leader: "Group Leader".to_string(),
            group_member: "Group Members".to_string(),
        }
    }
}

impl ColumnMap {
    fn fields(&self) -> [(&'static str, &str); 8] {
        [
            ("name", self.name.as_str()),
            ("attendance", self.attendance.as_str()),
            ("fixed_area", self.fixed_area.as_str()),
            ("preferred_area", self.preferred_area.as_str()),
            ("preferred_section", self.preferred_section.as_str()),
            ("team_name", self.team_name.as_str()),
            ("group_leader", self.group_leader.as_str()),
            ("group_member", self.group_member.as_str()),
        ]
    }
}

/// Loads a staff roster from a CSV file
pub fn load_roster<P: AsRef<Path>>(
    csv_path: P,
    columns: &ColumnMap,
) -> Result<Vec<Value>, Box<dyn std::error::Error>> {
    let file = std::fs::File::open(csv_path)?;
    read_roster(file, columns)
}

/// Reads CSV rows into staff records, one JSON object per row, in file order.
///
/// Blank cells are left out of the record. Rows without a name are skipped
/// as empty table lines. Missing columns are simply absent from every record.
pub fn read_roster<R: io::Read>(
    source: R,
    columns: &ColumnMap,
) -> Result<Vec<Value>, Box<dyn std::error::Error>> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(source);
    let headers = reader.headers()?.clone();

    // Find column indices
    let positions: Vec<(&'static str, usize)> = columns
        .fields()
        .into_iter()
        .filter_map(|(key, header)| {
            headers
                .iter()
                .position(|h| h.trim() == header.trim())
                .map(|col| (key, col))
        })
        .collect();

    if !positions.iter().any(|(key, _)| *key == "name") {
        return Err(format!("roster has no {:?} column", columns.name).into());
    }

    let mut entries = Vec::new();
    for result in reader.records() {
        let record = result?;

        let mut entry = Map::new();
        for (key, col) in &positions {
            let cell = record.get(*col).unwrap_or("").trim();
            if !cell.is_empty() {
                entry.insert(key.to_string(), Value::String(cell.to_string()));
            }
        }

        // Skip if essential fields are missing
        if !entry.contains_key("name") {
            continue;
        }
        entries.push(Value::Object(entry));
    }

    Ok(entries)
}
