//! Trait and record types for the telematics vendor API.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Raw device record as returned by the vendor.
///
/// `groups` is the flat list of group ids the device belongs to; a device
/// whose groups match nothing in the classifier map falls out of the fleet.
#[derive(Debug, Clone, Deserialize)]
pub struct Device {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub groups: Vec<String>,
}

/// Raw group record: the id plus a display name when the vendor supplies one.
#[derive(Debug, Clone, Deserialize)]
pub struct Group {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// One trip: a start and a stop instant. Every further vendor field is
/// ignored during deserialization. Stop is assumed >= start; not validated.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Trip {
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
}

/// Abstraction over the vendor's generic "Get" query surface.
///
/// The production implementation speaks MyGeotab JSON-RPC; tests swap in an
/// in-memory mock. Every fetch either returns the full record list or fails
/// with a transport/validation error.
#[async_trait::async_trait]
pub trait TelematicsApi: Send + Sync {
    /// Fetches up to `limit` device records.
    async fn get_devices(&self, limit: Option<u32>) -> Result<Vec<Device>>;

    /// Fetches up to `limit` group records.
    async fn get_groups(&self, limit: Option<u32>) -> Result<Vec<Group>>;

    /// Fetches up to `limit` trips for one device, bounded below by `from`.
    async fn get_trips(
        &self,
        device_id: &str,
        from: DateTime<Utc>,
        limit: Option<u32>,
    ) -> Result<Vec<Trip>>;
}
