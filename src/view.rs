//! Display-ready projection of a [`DeviceRecord`].

use serde::Serialize;
use serde_json::Number;

use crate::device::DeviceRecord;

const NOT_AVAILABLE: &str = "N/a";

/// Flat view of a device handed to the renderer. `None` fields are skipped
/// on serialization so the table and JSON output simply omit them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceView {
    pub device_name: String,
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub is_online: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    pub application_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<String>,
    pub uuid: String,
    pub commit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supervisor_version: Option<String>,
    pub is_web_accessible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_version: Option<String>,
    pub dashboard_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_usage_percent: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_temp_c: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_usage_mb: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_total_mb: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_usage_percent: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_block_device: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_usage_mb: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_total_mb: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_usage_percent: Option<u64>,
    /// Only ever `Some(true)`; a healthy supply leaves the field out entirely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub undervoltage_detected: Option<bool>,
}

/// Builds the view for `record`. Pure: the same record and base always yield the same view.
pub fn derive_view(record: &DeviceRecord, dashboard_base: &str) -> DeviceView {
    DeviceView {
        device_name: record.device_name.clone(),
        id: record.id,
        device_type: record.device_type_slug().map(str::to_string),
        status: record.overall_status.clone(),
        is_online: record.is_online,
        ip_address: record.ip_address.clone(),
        public_address: record.public_address.clone(),
        mac_address: record.mac_address.clone(),
        application_name: record
            .application_name()
            .unwrap_or(NOT_AVAILABLE)
            .to_string(),
        last_seen: record.last_connectivity_event.clone(),
        uuid: record.uuid.clone(),
        commit: record.release_commit().unwrap_or(NOT_AVAILABLE).to_string(),
        supervisor_version: record.supervisor_version.clone(),
        is_web_accessible: record.is_web_accessible,
        note: record.note.clone(),
        os_version: record.os_version.clone(),
        dashboard_url: dashboard_url(dashboard_base, &record.uuid),
        cpu_usage_percent: record.cpu_usage.clone(),
        cpu_temp_c: record.cpu_temp.clone(),
        cpu_id: record.cpu_id.clone(),
        memory_usage_mb: record.memory_usage,
        memory_total_mb: record.memory_total,
        memory_usage_percent: usage_percent(record.memory_usage, record.memory_total),
        storage_block_device: record.storage_block_device.clone(),
        storage_usage_mb: record.storage_usage,
        storage_total_mb: record.storage_total,
        storage_usage_percent: usage_percent(record.storage_usage, record.storage_total),
        undervoltage_detected: record.is_undervolted.then_some(true),
    }
}

pub fn dashboard_url(base: &str, uuid: &str) -> String {
    format!("{}/devices/{}/summary", base.trim_end_matches('/'), uuid)
}

/// `round(usage / total * 100)`, half away from zero. `None` unless both
/// sides are known and `total` is non-zero.
pub fn usage_percent(usage: Option<u64>, total: Option<u64>) -> Option<u64> {
    match (usage, total) {
        (Some(usage), Some(total)) if total != 0 => {
            Some((usage as f64 / total as f64 * 100.0).round() as u64)
        }
        _ => None,
    }
}
