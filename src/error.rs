//! Failures of a scheduling run. Every variant aborts the whole run.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::schedule::roster::StaffMember;
use crate::schedule::types::AreaSnapshot;

#[derive(Debug, Error)]
pub enum AllocError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Placement(#[from] PlacementFailure),
}

impl AllocError {
    /// Stable identifier used in JSON responses
    pub fn kind(&self) -> &'static str {
        match self {
            AllocError::Config(ConfigError::MissingKey(_)) => "missing_key",
            AllocError::Config(ConfigError::InvalidValue { .. }) => "invalid_value",
            AllocError::Input(InputError::MalformedStaffEntry { .. }) => "malformed_staff_entry",
            AllocError::Input(InputError::DuplicateName { .. }) => "duplicate_name",
            AllocError::Input(InputError::UnknownTeam { .. }) => "unknown_team",
            AllocError::Input(InputError::AmbiguousGroup { .. }) => "ambiguous_group",
            AllocError::Input(InputError::AttendanceMismatch { .. }) => "attendance_mismatch",
            AllocError::Placement(_) => "placement_failure",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing key in area config: {0}")]
    MissingKey(&'static str),
    #[error("area config key {key} must be an integer, got {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("staff entry #{index} is malformed: {reason}")]
    MalformedStaffEntry { index: usize, reason: String },
    #[error("staff name {name:?} appears more than once")]
    DuplicateName { name: String },
    #[error("unknown team {team:?} for staff member {name}")]
    UnknownTeam { name: String, team: String },
    #[error("ambiguous group for staff member {name}: {reason}")]
    AmbiguousGroup { name: String, reason: String },
    #[error("attendance mismatch: {actual} attending, {expected} required")]
    AttendanceMismatch { expected: i64, actual: usize },
}

/// Where in the run a placement could not be made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    FixedArea,
    InboundTeam,
    OutboundTeam,
    MobileTeam,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Stage::FixedArea => "cannot place fixed-area staff member",
            Stage::InboundTeam => "cannot place inbound team member",
            Stage::OutboundTeam => "cannot place outbound team member",
            Stage::MobileTeam => "cannot place mobile team member",
        };
        f.write_str(text)
    }
}

/// Capacity ran out for one staff member.
///
/// `areas` holds the occupancy of every area the member could have gone to,
/// taken at the moment of failure.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{stage} {} (team {:?}): {}", .staff.name, .staff.team_name, render_snapshots(.areas))]
pub struct PlacementFailure {
    pub stage: Stage,
    pub staff: StaffMember,
    pub areas: Vec<AreaSnapshot>,
}

fn render_snapshots(areas: &[AreaSnapshot]) -> String {
    areas
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::types::Area;

    #[test]
    fn test_placement_failure_message_cites_limits() {
        let failure = PlacementFailure {
            stage: Stage::InboundTeam,
            staff: StaffMember::new("Cara", "A"),
            areas: vec![AreaSnapshot {
                area: Area::Inbound,
                front: 1,
                back: 1,
                front_limit: 1,
                back_limit: 1,
                total_limit: 2,
            }],
        };
        let message = AllocError::from(failure).to_string();
        assert!(message.starts_with("cannot place inbound team member Cara"));
        assert!(message.contains("InboundTotal=2, current=2"));
    }

    #[test]
    fn test_kind_names() {
        let err = AllocError::from(ConfigError::MissingKey("OutboundTotal"));
        assert_eq!(err.kind(), "missing_key");
        assert_eq!(err.to_string(), "missing key in area config: OutboundTotal");

        let err = AllocError::from(InputError::UnknownTeam {
            name: "Zed".into(),
            team: "Z".into(),
        });
        assert_eq!(err.kind(), "unknown_team");
    }
}
