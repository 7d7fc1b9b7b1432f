use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::parser::ColumnMap;
use crate::schedule::Vocabulary;

/// Settings file contents.
///
/// ```json
/// {
///   "area": { "InboundFront": 4, "InboundBack": 3, "InboundTotal": 6, ... },
///   "vocabulary": { "inbound": "入境", "outbound": "出境", "front": "前台", "back": "后台" },
///   "columns": { "name": "姓名", "attendance": "出勤" }
/// }
/// ```
///
/// `area` is kept as a raw mapping: it is validated per run, so a missing
/// key surfaces as a scheduling error rather than a settings error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub area: Map<String, Value>,
    #[serde(default)]
    pub vocabulary: Vocabulary,
    #[serde(default)]
    pub columns: ColumnMap,
}

pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    let settings = serde_json::from_str(&text)?;
    Ok(settings)
}
