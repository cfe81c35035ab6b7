use thiserror::Error;

/// Failures surfaced by the fleet API client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Device not found: {0}")]
    Lookup(String),
    #[error("Device identifier \"{0}\" matches more than one device. Use a longer uuid or the numeric id.")]
    Ambiguous(String),
    #[error("Not authorized ({status}). Set FLEETCTL_API_TOKEN or add api_token to the config file.")]
    Auth { status: u16 },
    #[error("Request to the fleet API failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Fleet API returned {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Unexpected response from the fleet API: {0}")]
    Decode(String),
}
