use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::device::{DEVICE_EXPAND, DEVICE_SELECT, DeviceRecord};
use crate::error::ApiError;
use crate::selector::DeviceIdentifier;

const API_VERSION: &str = "v6";

/// Anything that can look up a single device.
#[allow(async_fn_in_trait)]
pub trait DeviceSource {
    async fn fetch_device(&self, identifier: &DeviceIdentifier) -> Result<DeviceRecord, ApiError>;
}

/// HTTP client for the fleet API's OData device resource.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct ODataResponse {
    d: Vec<DeviceRecord>,
}

/// Path and query string for one device lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceQuery {
    pub path: String,
    pub params: Vec<(&'static str, String)>,
}

impl ApiClient {
    pub fn new(settings: &Settings) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(settings.timeout())
            .user_agent(concat!("fleetctl/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: settings.api_url.trim_end_matches('/').to_string(),
            token: settings.api_token.clone(),
            http,
        })
    }
}

impl DeviceSource for ApiClient {
    async fn fetch_device(&self, identifier: &DeviceIdentifier) -> Result<DeviceRecord, ApiError> {
        let query = device_query(identifier)?;
        let url = format!("{}{}", self.base_url, query.path);
        debug!("[CLI][API] GET {} params={:?}", url, query.params);

        let mut request = self.http.get(&url).query(&query.params);
        if let Some(token) = self.token.as_deref() {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("[CLI][API] {} -> {} ({} bytes)", url, status, body.len());

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(ApiError::Auth {
                    status: status.as_u16(),
                });
            }
            StatusCode::NOT_FOUND => return Err(ApiError::Lookup(identifier.to_string())),
            status if !status.is_success() => {
                warn!("[CLI][API] unexpected status {} from {}", status, url);
                return Err(ApiError::Http {
                    status: status.as_u16(),
                    message: body.trim().to_string(),
                });
            }
            _ => {}
        }

        let rows = parse_rows(&body)?;
        single_device(rows, identifier)
    }
}

/// Builds the request for `identifier`: numeric ids address the resource
/// directly, full uuids filter by equality, anything shorter by prefix.
/// A blank uuid is a lookup failure and never becomes a filter.
pub fn device_query(identifier: &DeviceIdentifier) -> Result<DeviceQuery, ApiError> {
    if identifier.is_blank() {
        return Err(ApiError::Lookup(format!("\"{}\"", identifier)));
    }
    let mut params = Vec::new();
    let path = match identifier {
        DeviceIdentifier::Id(id) => format!("/{}/device({})", API_VERSION, id),
        DeviceIdentifier::Uuid(uuid) => {
            let quoted = uuid.replace('\'', "''");
            let filter = if identifier.is_full_uuid() {
                format!("uuid eq '{}'", quoted)
            } else {
                format!("startswith(uuid,'{}')", quoted)
            };
            params.push(("$filter", filter));
            format!("/{}/device", API_VERSION)
        }
    };
    params.push(("$select", DEVICE_SELECT.join(",")));
    params.push(("$expand", expand_clause()));
    Ok(DeviceQuery { path, params })
}

fn expand_clause() -> String {
    DEVICE_EXPAND
        .iter()
        .map(|(relation, column)| format!("{}($select={})", relation, column))
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_rows(body: &str) -> Result<Vec<DeviceRecord>, ApiError> {
    let response: ODataResponse =
        serde_json::from_str(body).map_err(|err| ApiError::Decode(err.to_string()))?;
    Ok(response.d)
}

fn single_device(
    mut rows: Vec<DeviceRecord>,
    identifier: &DeviceIdentifier,
) -> Result<DeviceRecord, ApiError> {
    match rows.len() {
        0 => Err(ApiError::Lookup(identifier.to_string())),
        1 => Ok(rows.remove(0)),
        _ => Err(ApiError::Ambiguous(identifier.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param<'a>(query: &'a DeviceQuery, key: &str) -> Option<&'a str> {
        query
            .params
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.as_str())
    }

    #[test]
    fn numeric_id_addresses_resource() {
        let query = device_query(&DeviceIdentifier::Id(12345)).unwrap();
        assert_eq!(query.path, "/v6/device(12345)");
        assert_eq!(param(&query, "$filter"), None);
    }

    #[test]
    fn short_uuid_filters_by_prefix() {
        let query = device_query(&DeviceIdentifier::Uuid("7cf02a6".into())).unwrap();
        assert_eq!(query.path, "/v6/device");
        assert_eq!(param(&query, "$filter"), Some("startswith(uuid,'7cf02a6')"));
    }

    #[test]
    fn full_uuid_filters_by_equality() {
        let uuid = "7cf02a6e5b1a4c3d9e8f7a6b5c4d3e2f";
        let query = device_query(&DeviceIdentifier::Uuid(uuid.into())).unwrap();
        assert_eq!(
            param(&query, "$filter"),
            Some("uuid eq '7cf02a6e5b1a4c3d9e8f7a6b5c4d3e2f'")
        );
    }

    #[test]
    fn blank_uuid_never_becomes_a_filter() {
        for raw in ["", "  "] {
            let result = device_query(&DeviceIdentifier::parse(raw));
            assert!(
                matches!(result, Err(ApiError::Lookup(_))),
                "{:?} produced {:?}",
                raw,
                result
            );
        }
    }

    #[test]
    fn quotes_are_escaped_in_filter() {
        let query = device_query(&DeviceIdentifier::Uuid("a'b".into())).unwrap();
        assert_eq!(param(&query, "$filter"), Some("startswith(uuid,'a''b')"));
    }

    #[test]
    fn select_and_expand_cover_the_display_fields() {
        let query = device_query(&DeviceIdentifier::Id(1)).unwrap();
        let select = param(&query, "$select").unwrap();
        assert!(select.starts_with("device_name,id,overall_status,"));
        assert!(select.ends_with("cpu_id,is_undervolted"));
        assert_eq!(select.split(',').count(), 22);
        assert_eq!(
            param(&query, "$expand"),
            Some(
                "belongs_to__application($select=app_name),\
                 is_of__device_type($select=slug),\
                 is_running__release($select=commit)"
            )
        );
    }

    #[test]
    fn parses_expanded_relations() {
        let body = r#"{"d": [{
            "id": 7,
            "uuid": "7cf02a6",
            "device_name": "gateway-01",
            "is_online": false,
            "note": null,
            "memory_usage": 450,
            "memory_total": 900,
            "cpu_temp": 51.5,
            "belongs_to__application": [{"app_name": "greenhouse"}],
            "is_of__device_type": [{"slug": "raspberrypi4-64"}],
            "is_running__release": []
        }]}"#;
        let rows = parse_rows(body).unwrap();
        let record = &rows[0];
        assert_eq!(record.application_name(), Some("greenhouse"));
        assert_eq!(record.device_type_slug(), Some("raspberrypi4-64"));
        assert_eq!(record.release_commit(), None);
        assert_eq!(record.note, None);
        assert_eq!(record.memory_total, Some(900));
        assert_eq!(record.cpu_temp.as_ref().map(|n| n.to_string()), Some("51.5".into()));
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        assert!(matches!(parse_rows("<html>"), Err(ApiError::Decode(_))));
        assert!(matches!(parse_rows(r#"{"d": {}}"#), Err(ApiError::Decode(_))));
    }

    #[test]
    fn row_count_decides_outcome() {
        let id = DeviceIdentifier::Uuid("7cf".into());
        assert!(matches!(
            single_device(Vec::new(), &id),
            Err(ApiError::Lookup(value)) if value == "7cf"
        ));
        assert!(matches!(
            single_device(vec![DeviceRecord::default(), DeviceRecord::default()], &id),
            Err(ApiError::Ambiguous(_))
        ));
        let one = DeviceRecord {
            id: 3,
            ..DeviceRecord::default()
        };
        assert_eq!(single_device(vec![one], &id).unwrap().id, 3);
    }
}
