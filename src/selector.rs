use std::fmt;

/// How a device is addressed on the fleet API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceIdentifier {
    /// Numeric database id.
    Id(u64),
    /// Full uuid or a short prefix of one.
    Uuid(String),
}

impl DeviceIdentifier {
    /// A plain digit string is treated as an id; anything else is passed through untouched.
    pub fn parse(raw: &str) -> Self {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(id) = raw.parse::<u64>() {
                return DeviceIdentifier::Id(id);
            }
        }
        DeviceIdentifier::Uuid(raw.to_string())
    }

    /// An empty uuid would match every device as a prefix.
    pub fn is_blank(&self) -> bool {
        matches!(self, DeviceIdentifier::Uuid(uuid) if uuid.trim().is_empty())
    }

    /// Full uuids come in the legacy 62 character and the current 32 character forms.
    pub fn is_full_uuid(&self) -> bool {
        matches!(self, DeviceIdentifier::Uuid(uuid) if uuid.len() == 32 || uuid.len() == 62)
    }
}

impl fmt::Display for DeviceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceIdentifier::Id(id) => write!(f, "{}", id),
            DeviceIdentifier::Uuid(uuid) => write!(f, "{}", uuid),
        }
    }
}
