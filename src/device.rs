use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Number;

/// Columns requested from the device resource, in request order.
pub const DEVICE_SELECT: &[&str] = &[
    "device_name",
    "id",
    "overall_status",
    "is_online",
    "ip_address",
    "mac_address",
    "last_connectivity_event",
    "uuid",
    "supervisor_version",
    "is_web_accessible",
    "note",
    "os_version",
    "memory_usage",
    "memory_total",
    "public_address",
    "storage_block_device",
    "storage_usage",
    "storage_total",
    "cpu_usage",
    "cpu_temp",
    "cpu_id",
    "is_undervolted",
];

/// Relations expanded inline, each narrowed to the single column we display.
pub const DEVICE_EXPAND: &[(&str, &str)] = &[
    ("belongs_to__application", "app_name"),
    ("is_of__device_type", "slug"),
    ("is_running__release", "commit"),
];

/// Treats an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Device row as returned by the fleet API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub id: u64,
    pub uuid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub device_name: String,
    #[serde(default)]
    pub overall_status: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_online: bool,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub mac_address: Option<String>,
    #[serde(default)]
    pub public_address: Option<String>,
    #[serde(default)]
    pub last_connectivity_event: Option<String>,
    #[serde(default)]
    pub supervisor_version: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_web_accessible: bool,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub os_version: Option<String>,
    /// MiB
    #[serde(default)]
    pub memory_usage: Option<u64>,
    /// MiB
    #[serde(default)]
    pub memory_total: Option<u64>,
    #[serde(default)]
    pub storage_block_device: Option<String>,
    /// MiB
    #[serde(default)]
    pub storage_usage: Option<u64>,
    /// MiB
    #[serde(default)]
    pub storage_total: Option<u64>,
    /// Kept as sent so integers stay integers on display.
    #[serde(default)]
    pub cpu_usage: Option<Number>,
    #[serde(default)]
    pub cpu_temp: Option<Number>,
    #[serde(default)]
    pub cpu_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_undervolted: bool,
    #[serde(
        rename = "belongs_to__application",
        default,
        deserialize_with = "null_as_default"
    )]
    pub application: Vec<ApplicationRef>,
    #[serde(
        rename = "is_of__device_type",
        default,
        deserialize_with = "null_as_default"
    )]
    pub device_type: Vec<DeviceTypeRef>,
    #[serde(
        rename = "is_running__release",
        default,
        deserialize_with = "null_as_default"
    )]
    pub running_release: Vec<ReleaseRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationRef {
    pub app_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceTypeRef {
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseRef {
    pub commit: String,
}

impl DeviceRecord {
    pub fn application_name(&self) -> Option<&str> {
        self.application.first().map(|app| app.app_name.as_str())
    }

    pub fn device_type_slug(&self) -> Option<&str> {
        self.device_type.first().map(|dt| dt.slug.as_str())
    }

    pub fn release_commit(&self) -> Option<&str> {
        self.running_release
            .first()
            .map(|release| release.commit.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_flags_and_relations_fall_back_to_defaults() {
        let record: DeviceRecord = serde_json::from_str(
            r#"{
                "id": 9,
                "uuid": "7cf02a6",
                "device_name": null,
                "is_online": null,
                "is_web_accessible": null,
                "is_undervolted": null,
                "belongs_to__application": null,
                "is_running__release": null
            }"#,
        )
        .unwrap();
        assert_eq!(record.device_name, "");
        assert!(!record.is_online);
        assert!(!record.is_web_accessible);
        assert!(!record.is_undervolted);
        assert_eq!(record.application_name(), None);
        assert_eq!(record.release_commit(), None);
    }

    #[test]
    fn present_flags_are_kept() {
        let record: DeviceRecord = serde_json::from_str(
            r#"{"id": 1, "uuid": "abc", "is_online": true, "is_undervolted": true}"#,
        )
        .unwrap();
        assert!(record.is_online);
        assert!(record.is_undervolted);
        assert!(!record.is_web_accessible);
    }
}
