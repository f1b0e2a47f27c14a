//! Production client for the MyGeotab JSON-RPC API.
//!
//! Every call is a POST of `{"method": ..., "params": {...}}` to
//! `https://{server}/apiv1`; the reply carries either `result` or `error`.
//! `Authenticate` runs once at construction and may redirect the session to
//! another server via the `path` field (`"ThisServer"` means stay put).

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use fleet_trip_auditor::fetch::{BasicClient, post_json};
use fleet_trip_auditor::services::telematics::{Device, Group, TelematicsApi, Trip};

pub struct GeotabClient {
    http: BasicClient,
    endpoint: String,
    /// Session credentials (`database`, `userName`, `sessionId`) injected
    /// into every post-authentication call.
    credentials: Value,
}

impl GeotabClient {
    /// Authenticates against `server` and returns a session-bound client.
    pub async fn new(
        server: &str,
        database: &str,
        user_name: &str,
        password: &str,
    ) -> Result<Self> {
        let http = BasicClient::new();
        let mut endpoint = api_endpoint(server);

        let body = json!({
            "method": "Authenticate",
            "params": {
                "database": database,
                "userName": user_name,
                "password": password,
            },
        });
        let reply = post_json(&http, &endpoint, &body)
            .await
            .context("authenticating with MyGeotab")?;
        let result = unwrap_envelope(reply).context("MyGeotab Authenticate failed")?;

        // The login server can hand the session off to the database's home
        // server; follow the redirect for all subsequent calls.
        if let Some(path) = result["path"].as_str() {
            if path != "ThisServer" {
                endpoint = api_endpoint(path);
            }
        }

        let credentials = result
            .get("credentials")
            .cloned()
            .ok_or_else(|| anyhow!("Authenticate reply carried no credentials"))?;

        Ok(Self {
            http,
            endpoint,
            credentials,
        })
    }

    /// Issues a `Get` for `type_name` and decodes the result list.
    async fn get<T: DeserializeOwned>(
        &self,
        type_name: &str,
        limit: Option<u32>,
        search: Option<Value>,
    ) -> Result<Vec<T>> {
        let mut params = get_params(type_name, limit, search);
        params["credentials"] = self.credentials.clone();

        let body = json!({ "method": "Get", "params": params });
        let reply = post_json(&self.http, &self.endpoint, &body)
            .await
            .with_context(|| format!("Get {type_name} request failed"))?;
        let result =
            unwrap_envelope(reply).with_context(|| format!("Get {type_name} returned an error"))?;

        serde_json::from_value(result).with_context(|| format!("decoding {type_name} records"))
    }
}

#[async_trait]
impl TelematicsApi for GeotabClient {
    async fn get_devices(&self, limit: Option<u32>) -> Result<Vec<Device>> {
        self.get("Device", limit, None).await
    }

    async fn get_groups(&self, limit: Option<u32>) -> Result<Vec<Group>> {
        self.get("Group", limit, None).await
    }

    async fn get_trips(
        &self,
        device_id: &str,
        from: DateTime<Utc>,
        limit: Option<u32>,
    ) -> Result<Vec<Trip>> {
        let search = json!({
            "deviceSearch": { "id": device_id },
            "fromDate": from.to_rfc3339_opts(SecondsFormat::Millis, true),
        });
        self.get("Trip", limit, Some(search)).await
    }
}

fn api_endpoint(server: &str) -> String {
    format!("https://{server}/apiv1")
}

/// Builds `Get` params: `typeName` always, `resultsLimit` and `search` only
/// when supplied.
fn get_params(type_name: &str, limit: Option<u32>, search: Option<Value>) -> Value {
    let mut params = json!({ "typeName": type_name });
    if let Some(limit) = limit {
        params["resultsLimit"] = json!(limit);
    }
    if let Some(search) = search {
        params["search"] = search;
    }
    params
}

/// Splits the JSON-RPC envelope: `result` on success, the raw `error`
/// payload preserved in the message otherwise.
fn unwrap_envelope(reply: Value) -> Result<Value> {
    if let Some(error) = reply.get("error") {
        bail!("API error: {error}");
    }
    reply
        .get("result")
        .cloned()
        .ok_or_else(|| anyhow!("reply carried neither result nor error: {reply}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_params_minimal() {
        let params = get_params("Device", None, None);
        assert_eq!(params, json!({ "typeName": "Device" }));
    }

    #[test]
    fn test_get_params_with_limit_and_search() {
        let search = json!({ "deviceSearch": { "id": "b1" }, "fromDate": "2024-01-01T00:00:00.000Z" });
        let params = get_params("Trip", Some(500), Some(search.clone()));

        assert_eq!(params["typeName"], "Trip");
        assert_eq!(params["resultsLimit"], 500);
        assert_eq!(params["search"], search);
    }

    #[test]
    fn test_unwrap_envelope_result() {
        let result = unwrap_envelope(json!({ "result": [1, 2, 3] })).unwrap();
        assert_eq!(result, json!([1, 2, 3]));
    }

    #[test]
    fn test_unwrap_envelope_preserves_raw_error() {
        let reply = json!({ "error": { "name": "InvalidUserException", "code": -32000 } });
        let err = unwrap_envelope(reply).unwrap_err();

        assert!(err.to_string().contains("InvalidUserException"));
        assert!(err.to_string().contains("-32000"));
    }

    #[test]
    fn test_unwrap_envelope_rejects_empty_reply() {
        assert!(unwrap_envelope(json!({})).is_err());
    }

    #[test]
    fn test_api_endpoint() {
        assert_eq!(api_endpoint("my.geotab.com"), "https://my.geotab.com/apiv1");
    }
}
