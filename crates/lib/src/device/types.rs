//! Device records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Result;
use crate::backend::{Document, to_document};

/// A device in the catalog.
///
/// JSON field names are camelCase. The id is also accepted under the legacy
/// name `ID`; an empty id means "let the store assign one".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(default, alias = "ID")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub device_type_id: String,
    #[serde(default)]
    pub failsafe: bool,
    #[serde(default)]
    pub temp_min: i64,
    #[serde(default)]
    pub temp_max: i64,
    #[serde(default)]
    pub installation_position: String,
    #[serde(default, rename = "insertInto19InchCabinet")]
    pub insert_into_19_inch_cabinet: bool,
    #[serde(default)]
    pub motion_enable: bool,
    #[serde(default)]
    pub siplus_catalog: bool,
    #[serde(default)]
    pub simatic_catalog: bool,
    #[serde(default)]
    pub rotation_axis_number: i64,
    #[serde(default)]
    pub position_axis_number: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced_environmental_conditions: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal_element: Option<bool>,
}

impl Device {
    /// Every field except the id, as a document to merge over a stored record.
    ///
    /// Absent optional fields are written as `null` so a merge clears them.
    pub fn mutable_fields(&self) -> Result<Document> {
        let mut fields = to_document(self)?;
        fields.remove("id");
        for key in ["advancedEnvironmentalConditions", "terminalElement"] {
            fields.entry(key).or_insert(Value::Null);
        }
        Ok(fields)
    }
}

/// Wire wrapper for device lists, used by both requests and responses.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceBatch {
    pub devices: Vec<Device>,
}

impl From<Vec<Device>> for DeviceBatch {
    fn from(devices: Vec<Device>) -> Self {
        Self { devices }
    }
}
