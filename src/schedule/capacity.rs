use serde::Serialize;
use serde_json::{Map, Value};

use super::types::{Area, Position, Section};
use crate::error::ConfigError;

pub const INBOUND_FRONT: &str = "InboundFront";
pub const INBOUND_BACK: &str = "InboundBack";
pub const OUTBOUND_FRONT: &str = "OutboundFront";
pub const OUTBOUND_BACK: &str = "OutboundBack";
pub const INBOUND_TOTAL: &str = "InboundTotal";
pub const OUTBOUND_TOTAL: &str = "OutboundTotal";
pub const INBOUND_TEAM: &str = "InboundTeam";
pub const OUTBOUND_TEAM: &str = "OutboundTeam";
pub const MOBILE_TEAM: &str = "MobileTeam";
pub const TOTAL_ATTENDANCE: &str = "TotalAttendance";

/// Capacity keys in the order they are checked
pub const REQUIRED_KEYS: [&str; 6] = [
    INBOUND_FRONT,
    INBOUND_BACK,
    OUTBOUND_FRONT,
    OUTBOUND_BACK,
    INBOUND_TOTAL,
    OUTBOUND_TOTAL,
];

/// Section limits and the independent area cap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AreaLimits {
    pub front: i64,
    pub back: i64,
    pub total: i64,
}

impl AreaLimits {
    pub fn section(&self, section: Section) -> i64 {
        match section {
            Section::Front => self.front,
            Section::Back => self.back,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AreaCapacityConfig {
    pub inbound: AreaLimits,
    pub outbound: AreaLimits,
    pub inbound_team: Option<String>,
    pub outbound_team: Option<String>,
    pub mobile_team: Option<String>,
    /// Required number of attending staff, when the caller sets one
    pub total_attendance: Option<i64>,
}

impl AreaCapacityConfig {
    /// Builds a config from explicit limits, without team names
    pub fn new(inbound: AreaLimits, outbound: AreaLimits) -> Self {
        Self {
            inbound,
            outbound,
            inbound_team: None,
            outbound_team: None,
            mobile_team: None,
            total_attendance: None,
        }
    }

    pub fn with_teams(mut self, inbound: &str, outbound: &str, mobile: &str) -> Self {
        self.inbound_team = Some(inbound.to_string());
        self.outbound_team = Some(outbound.to_string());
        self.mobile_team = Some(mobile.to_string());
        self
    }

    /// Validates a key/value mapping as produced by a settings form.
    ///
    /// Only presence and integer-ness of the six capacity keys are checked;
    /// negative or inconsistent limits pass through unchanged.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, ConfigError> {
        if let Some(missing) = REQUIRED_KEYS.into_iter().find(|key| !map.contains_key(*key)) {
            return Err(ConfigError::MissingKey(missing));
        }

        let inbound = AreaLimits {
            front: integer(map, INBOUND_FRONT)?,
            back: integer(map, INBOUND_BACK)?,
            total: integer(map, INBOUND_TOTAL)?,
        };
        let outbound = AreaLimits {
            front: integer(map, OUTBOUND_FRONT)?,
            back: integer(map, OUTBOUND_BACK)?,
            total: integer(map, OUTBOUND_TOTAL)?,
        };

        let total_attendance = match map.get(TOTAL_ATTENDANCE) {
            None | Some(Value::Null) => None,
            Some(_) => Some(integer(map, TOTAL_ATTENDANCE)?),
        };

        Ok(Self {
            inbound,
            outbound,
            inbound_team: team(map, INBOUND_TEAM),
            outbound_team: team(map, OUTBOUND_TEAM),
            mobile_team: team(map, MOBILE_TEAM),
            total_attendance,
        })
    }

    pub fn limits(&self, area: Area) -> &AreaLimits {
        match area {
            Area::Inbound => &self.inbound,
            Area::Outbound => &self.outbound,
        }
    }

    pub fn section_limit(&self, position: Position) -> i64 {
        self.limits(position.area).section(position.section)
    }
}

fn integer(map: &Map<String, Value>, key: &'static str) -> Result<i64, ConfigError> {
    let value = map.get(key).ok_or(ConfigError::MissingKey(key))?;
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

/// Team identifiers are optional; a blank one matches nobody
fn team(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
