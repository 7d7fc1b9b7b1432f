use serde::{Deserialize, Serialize};

use super::types::{Area, Section};

/// Display strings the caller uses for areas and sections in staff records
/// and in the rendered result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    pub inbound: String,
    pub outbound: String,
    pub front: String,
    pub back: String,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new("Inbound", "Outbound", "Front", "Back")
    }
}

impl Vocabulary {
    pub fn new(inbound: &str, outbound: &str, front: &str, back: &str) -> Self {
        Self {
            inbound: inbound.to_string(),
            outbound: outbound.to_string(),
            front: front.to_string(),
            back: back.to_string(),
        }
    }

    pub fn area(&self, label: &str) -> Option<Area> {
        let label = label.trim();
        if label == self.inbound.trim() {
            Some(Area::Inbound)
        } else if label == self.outbound.trim() {
            Some(Area::Outbound)
        } else {
            None
        }
    }

    pub fn section(&self, label: &str) -> Option<Section> {
        let label = label.trim();
        if label == self.front.trim() {
            Some(Section::Front)
        } else if label == self.back.trim() {
            Some(Section::Back)
        } else {
            None
        }
    }

    pub fn area_label(&self, area: Area) -> &str {
        match area {
            Area::Inbound => &self.inbound,
            Area::Outbound => &self.outbound,
        }
    }

    pub fn section_label(&self, section: Section) -> &str {
        match section {
            Section::Front => &self.front,
            Section::Back => &self.back,
        }
    }
}
