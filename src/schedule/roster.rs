use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::types::{Area, Section};
use super::vocabulary::Vocabulary;
use crate::error::InputError;

/// Separators accepted in a group member list ("A, B" or "A、B")
pub const MEMBER_SEPARATORS: [char; 2] = [',', '、'];

/// One attending (or not) row of the staff roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub name: String,
    pub attendance: bool,
    pub fixed_area: Option<Area>,
    pub preferred_area: Option<Area>,
    pub preferred_section: Option<Section>,
    pub team_name: String,
    pub group_leader_of: Option<String>,
    pub group_member_of: Option<String>,
}

impl StaffMember {
    /// An attending member of `team_name` with no pins or preferences
    pub fn new(name: &str, team_name: &str) -> Self {
        Self {
            name: name.to_string(),
            attendance: true,
            fixed_area: None,
            preferred_area: None,
            preferred_section: None,
            team_name: team_name.to_string(),
            group_leader_of: None,
            group_member_of: None,
        }
    }

    pub fn with_fixed_area(mut self, area: Area) -> Self {
        self.fixed_area = Some(area);
        self
    }

    pub fn with_preferred_area(mut self, area: Area) -> Self {
        self.preferred_area = Some(area);
        self
    }

    pub fn with_preferred_section(mut self, section: Section) -> Self {
        self.preferred_section = Some(section);
        self
    }

    pub fn leading(mut self, group: &str) -> Self {
        self.group_leader_of = Some(group.to_string());
        self
    }

    pub fn member_of(mut self, group: &str) -> Self {
        self.group_member_of = Some(group.to_string());
        self
    }
}

/// Lower-cases and collapses whitespace so "TeamX" and " teamx " match
pub fn normalize_group_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Attendance as it arrives from a table: a bool or a "Y"/"N" style cell
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AttendanceCell {
    Flag(bool),
    Text(String),
}

impl AttendanceCell {
    fn is_present(&self) -> bool {
        match self {
            AttendanceCell::Flag(flag) => *flag,
            AttendanceCell::Text(text) => {
                let lower = text.trim().to_lowercase();
                lower == "y" || lower == "yes" || lower == "true" || lower == "1"
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawStaffEntry {
    name: String,
    #[serde(default, alias = "Attendance")]
    attendance: Option<AttendanceCell>,
    #[serde(default)]
    fixed_area: Option<String>,
    #[serde(default)]
    preferred_area: Option<String>,
    #[serde(default)]
    preferred_section: Option<String>,
    #[serde(default)]
    team_name: Option<String>,
    #[serde(default, alias = "group_leader_of")]
    group_leader: Option<String>,
    #[serde(default, alias = "group_member_of", alias = "group_members")]
    group_member: Option<String>,
}

/// Keeps the attending staff, in roster order, converted to [`StaffMember`].
///
/// Every entry must be a record. Attendance is read first and absent rows are
/// dropped as-is; only attending rows have their fields and labels checked.
pub fn filter_attending(
    entries: &[Value],
    vocabulary: &Vocabulary,
) -> Result<Vec<StaffMember>, InputError> {
    let mut attending = Vec::new();

    for (index, value) in entries.iter().enumerate() {
        let Some(record) = value.as_object() else {
            return Err(InputError::MalformedStaffEntry {
                index,
                reason: format!("expected a record, got {value}"),
            });
        };
        if !is_attending(record) {
            debug!(index, name = ?record.get("name"), "skipping absent staff member");
            continue;
        }
        attending.push(parse_entry(index, value, vocabulary)?);
    }

    Ok(attending)
}

/// A missing or unreadable attendance cell counts as absent
fn is_attending(record: &Map<String, Value>) -> bool {
    record
        .get("attendance")
        .or_else(|| record.get("Attendance"))
        .and_then(|cell| AttendanceCell::deserialize(cell).ok())
        .is_some_and(|cell| cell.is_present())
}

/// Fails on the first name that occurs twice
pub fn check_unique_names(staff: &[StaffMember]) -> Result<(), InputError> {
    let mut seen = HashSet::new();
    for member in staff {
        if !seen.insert(member.name.as_str()) {
            return Err(InputError::DuplicateName {
                name: member.name.clone(),
            });
        }
    }
    Ok(())
}

fn parse_entry(
    index: usize,
    value: &Value,
    vocabulary: &Vocabulary,
) -> Result<StaffMember, InputError> {
    let malformed = |reason: String| InputError::MalformedStaffEntry { index, reason };

    let raw = RawStaffEntry::deserialize(value).map_err(|e| malformed(e.to_string()))?;

    let name = raw.name.trim().to_string();
    if name.is_empty() {
        return Err(malformed("name is empty".to_string()));
    }

    let area_field = |field: &str, label: Option<String>| -> Result<Option<Area>, InputError> {
        match non_empty(label) {
            None => Ok(None),
            Some(label) => vocabulary
                .area(&label)
                .map(Some)
                .ok_or_else(|| malformed(format!("{field}: {label:?} is not an area"))),
        }
    };
    let fixed_area = area_field("fixed_area", raw.fixed_area)?;
    let preferred_area = area_field("preferred_area", raw.preferred_area)?;

    let preferred_section = match non_empty(raw.preferred_section) {
        None => None,
        Some(label) => Some(
            vocabulary.section(&label).ok_or_else(|| {
                malformed(format!("preferred_section: {label:?} is not a section"))
            })?,
        ),
    };

    let group_member_of = match non_empty(raw.group_member) {
        None => None,
        Some(list) => single_group(&name, &list)?,
    };

    Ok(StaffMember {
        name,
        attendance: raw.attendance.map(|a| a.is_present()).unwrap_or(false),
        fixed_area,
        preferred_area,
        preferred_section,
        team_name: raw.team_name.map(|t| t.trim().to_string()).unwrap_or_default(),
        group_leader_of: non_empty(raw.group_leader),
        group_member_of,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Reduces a member list cell to one group name; naming two groups is ambiguous
fn single_group(name: &str, list: &str) -> Result<Option<String>, InputError> {
    let mut tokens = list
        .split(&MEMBER_SEPARATORS[..])
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let Some(first) = tokens.next() else {
        return Ok(None);
    };
    let normalized = normalize_group_name(first);
    if let Some(other) = tokens.find(|t| normalize_group_name(t) != normalized) {
        return Err(InputError::AmbiguousGroup {
            name: name.to_string(),
            reason: format!("member of both {first:?} and {other:?}"),
        });
    }
    Ok(Some(first.to_string()))
}
