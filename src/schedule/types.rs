use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::vocabulary::Vocabulary;

/// Top-level work zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Area {
    Inbound,
    Outbound,
}

impl Area {
    pub const ALL: [Area; 2] = [Area::Inbound, Area::Outbound];
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Area::Inbound => f.write_str("Inbound"),
            Area::Outbound => f.write_str("Outbound"),
        }
    }
}

/// Sub-zone within an area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Section {
    Front,
    Back,
}

impl Section {
    pub const ALL: [Section; 2] = [Section::Front, Section::Back];
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Front => f.write_str("Front"),
            Section::Back => f.write_str("Back"),
        }
    }
}

/// One of the four placement targets (area x section)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub area: Area,
    pub section: Section,
}

impl Position {
    pub const ALL: [Position; 4] = [
        Position::new(Area::Inbound, Section::Front),
        Position::new(Area::Inbound, Section::Back),
        Position::new(Area::Outbound, Section::Front),
        Position::new(Area::Outbound, Section::Back),
    ];

    pub const fn new(area: Area, section: Section) -> Self {
        Self { area, section }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.area, self.section)
    }
}

/// Occupants of the four sections for a single scheduling run.
///
/// Created empty per run and consumed into an [`AssignmentResult`]; a name
/// is pushed into at most one sequence.
#[derive(Debug, Clone, Default)]
pub struct AllocationState {
    inbound_front: Vec<String>,
    inbound_back: Vec<String>,
    outbound_front: Vec<String>,
    outbound_back: Vec<String>,
    mobile_team: Vec<String>,
}

impl AllocationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn occupants(&self, position: Position) -> &[String] {
        match (position.area, position.section) {
            (Area::Inbound, Section::Front) => &self.inbound_front,
            (Area::Inbound, Section::Back) => &self.inbound_back,
            (Area::Outbound, Section::Front) => &self.outbound_front,
            (Area::Outbound, Section::Back) => &self.outbound_back,
        }
    }

    fn occupants_mut(&mut self, position: Position) -> &mut Vec<String> {
        match (position.area, position.section) {
            (Area::Inbound, Section::Front) => &mut self.inbound_front,
            (Area::Inbound, Section::Back) => &mut self.inbound_back,
            (Area::Outbound, Section::Front) => &mut self.outbound_front,
            (Area::Outbound, Section::Back) => &mut self.outbound_back,
        }
    }

    pub fn count(&self, position: Position) -> usize {
        self.occupants(position).len()
    }

    /// Front plus back occupancy of an area
    pub fn area_count(&self, area: Area) -> usize {
        Section::ALL
            .into_iter()
            .map(|section| self.count(Position::new(area, section)))
            .sum()
    }

    pub fn position_of(&self, name: &str) -> Option<Position> {
        Position::ALL
            .into_iter()
            .find(|&position| self.occupants(position).iter().any(|n| n == name))
    }

    pub fn is_placed(&self, name: &str) -> bool {
        self.position_of(name).is_some()
    }

    /// Appends `name` to a section. Callers check capacity first.
    pub(crate) fn push(&mut self, position: Position, name: &str) {
        debug_assert!(!self.is_placed(name), "{name} is already placed");
        self.occupants_mut(position).push(name.to_string());
    }

    /// Records that `name` was routed as a mobile-team member
    pub(crate) fn mark_mobile(&mut self, name: &str) {
        self.mobile_team.push(name.to_string());
    }

    pub fn mobile_team(&self) -> &[String] {
        &self.mobile_team
    }

    pub fn into_result(self) -> AssignmentResult {
        AssignmentResult {
            inbound: AreaAssignment {
                front: self.inbound_front,
                back: self.inbound_back,
            },
            outbound: AreaAssignment {
                front: self.outbound_front,
                back: self.outbound_back,
            },
        }
    }
}

/// Names placed in one area, in placement order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AreaAssignment {
    pub front: Vec<String>,
    pub back: Vec<String>,
}

impl AreaAssignment {
    pub fn section(&self, section: Section) -> &[String] {
        match section {
            Section::Front => &self.front,
            Section::Back => &self.back,
        }
    }
}

/// Successful outcome of a scheduling run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AssignmentResult {
    pub inbound: AreaAssignment,
    pub outbound: AreaAssignment,
}

impl AssignmentResult {
    pub fn area(&self, area: Area) -> &AreaAssignment {
        match area {
            Area::Inbound => &self.inbound,
            Area::Outbound => &self.outbound,
        }
    }

    pub fn section(&self, position: Position) -> &[String] {
        self.area(position.area).section(position.section)
    }

    pub fn position_of(&self, name: &str) -> Option<Position> {
        Position::ALL
            .into_iter()
            .find(|&position| self.section(position).iter().any(|n| n == name))
    }

    pub fn total_assigned(&self) -> usize {
        Position::ALL.iter().map(|&p| self.section(p).len()).sum()
    }

    /// Re-keys the result with the caller's display labels,
    /// e.g. `{"入境": {"前台": [...], "后台": [...]}, ...}`
    pub fn to_labeled(
        &self,
        vocabulary: &Vocabulary,
    ) -> BTreeMap<String, BTreeMap<String, Vec<String>>> {
        Area::ALL
            .into_iter()
            .map(|area| {
                let sections = Section::ALL
                    .into_iter()
                    .map(|section| {
                        (
                            vocabulary.section_label(section).to_string(),
                            self.area(area).section(section).to_vec(),
                        )
                    })
                    .collect();
                (vocabulary.area_label(area).to_string(), sections)
            })
            .collect()
    }
}

/// Occupancy and limits of one area at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AreaSnapshot {
    pub area: Area,
    pub front: usize,
    pub back: usize,
    pub front_limit: i64,
    pub back_limit: i64,
    pub total_limit: i64,
}

impl AreaSnapshot {
    pub fn occupied(&self) -> usize {
        self.front + self.back
    }
}

impl fmt::Display for AreaSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{area}Front={front}/{front_limit}, {area}Back={back}/{back_limit}, {area}Total={total_limit}, current={occupied}",
            area = self.area,
            front = self.front,
            front_limit = self.front_limit,
            back = self.back,
            back_limit = self.back_limit,
            total_limit = self.total_limit,
            occupied = self.occupied(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_lookup_and_counts() {
        let mut state = AllocationState::new();
        state.push(Position::new(Area::Inbound, Section::Back), "Alice");
        state.push(Position::new(Area::Inbound, Section::Front), "Bob");
        state.push(Position::new(Area::Outbound, Section::Back), "Cara");

        assert_eq!(state.area_count(Area::Inbound), 2);
        assert_eq!(state.area_count(Area::Outbound), 1);
        assert_eq!(
            state.position_of("Cara"),
            Some(Position::new(Area::Outbound, Section::Back))
        );
        assert!(!state.is_placed("Dan"));
    }

    #[test]
    fn test_result_keeps_placement_order() {
        let mut state = AllocationState::new();
        let front = Position::new(Area::Outbound, Section::Front);
        state.push(front, "Zoe");
        state.push(front, "Adam");

        let result = state.into_result();
        assert_eq!(result.outbound.front, vec!["Zoe", "Adam"]);
        assert_eq!(result.total_assigned(), 2);
    }

    #[test]
    fn test_result_serializes_with_area_keys() {
        let mut state = AllocationState::new();
        state.push(Position::new(Area::Inbound, Section::Front), "Alice");
        let json = serde_json::to_value(state.into_result()).unwrap();
        assert_eq!(json["Inbound"]["Front"][0], "Alice");
        assert_eq!(json["Outbound"]["Back"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_labeled_result_uses_vocabulary() {
        let vocabulary = Vocabulary::new("入境", "出境", "前台", "后台");
        let mut state = AllocationState::new();
        state.push(Position::new(Area::Outbound, Section::Back), "李雷");

        let labeled = state.into_result().to_labeled(&vocabulary);
        assert_eq!(labeled["出境"]["后台"], vec!["李雷".to_string()]);
        assert!(labeled["入境"]["前台"].is_empty());
    }

    #[test]
    fn test_snapshot_display_mentions_total() {
        let snapshot = AreaSnapshot {
            area: Area::Inbound,
            front: 1,
            back: 1,
            front_limit: 1,
            back_limit: 1,
            total_limit: 2,
        };
        let text = snapshot.to_string();
        assert!(text.contains("InboundTotal=2"));
        assert!(text.contains("current=2"));
    }
}
