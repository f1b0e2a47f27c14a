//! Device classification: group membership resolves to a vehicle type and a
//! depot. Devices that resolve to an unknown type are out of fleet scope.

use std::fmt;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::services::telematics::Device;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VehicleType {
    Van,
    Pickup,
    Backhoe,
    Unknown,
}

impl VehicleType {
    pub fn as_str(self) -> &'static str {
        match self {
            VehicleType::Van => "Van",
            VehicleType::Pickup => "Pickup",
            VehicleType::Backhoe => "Backhoe",
            VehicleType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Depot {
    #[serde(rename = "Depot North")]
    North,
    #[serde(rename = "Depot South")]
    South,
    Unknown,
}

impl Depot {
    pub fn as_str(self) -> &'static str {
        match self {
            Depot::North => "Depot North",
            Depot::South => "Depot South",
            Depot::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Depot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified fleet vehicle, derived once from a raw device record.
#[derive(Debug, Clone, Serialize)]
pub struct Vehicle {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
    pub depot: Depot,
}

/// Group-id to role mapping used by the classifier.
///
/// Deployment-specific configuration rather than code: the default table
/// reproduces the ids observed in the vendor database this tool was first
/// run against.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GroupMap {
    pub van: String,
    pub pickup: String,
    pub backhoe: String,
    pub depot_north: String,
    pub depot_south: String,
}

impl Default for GroupMap {
    fn default() -> Self {
        GroupMap {
            van: "b279E".to_string(),
            pickup: "b279F".to_string(),
            backhoe: "b279D".to_string(),
            depot_north: "b279A".to_string(),
            depot_south: "b279B".to_string(),
        }
    }
}

impl GroupMap {
    /// Loads a mapping from a JSON object on disk:
    ///
    /// ```json
    /// { "van": "b279E", "pickup": "b279F", "backhoe": "b279D",
    ///   "depot_north": "b279A", "depot_south": "b279B" }
    /// ```
    ///
    /// Keys left out of the file keep their default values.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading group map {path}"))?;
        let map = serde_json::from_str(&content)
            .with_context(|| format!("parsing group map {path}"))?;
        Ok(map)
    }
}

/// Classifies a device by group membership. Type and depot resolve
/// independently; the first match in priority order wins, no match yields
/// `Unknown`.
pub fn resolve_vehicle(map: &GroupMap, device: &Device) -> Vehicle {
    let member = |id: &str| device.groups.iter().any(|g| g == id);

    let vehicle_type = if member(&map.van) {
        VehicleType::Van
    } else if member(&map.pickup) {
        VehicleType::Pickup
    } else if member(&map.backhoe) {
        VehicleType::Backhoe
    } else {
        VehicleType::Unknown
    };

    let depot = if member(&map.depot_north) {
        Depot::North
    } else if member(&map.depot_south) {
        Depot::South
    } else {
        Depot::Unknown
    };

    Vehicle {
        id: device.id.clone(),
        name: device.name.clone(),
        vehicle_type,
        depot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn device(id: &str, groups: &[&str]) -> Device {
        Device {
            id: id.to_string(),
            name: format!("Device {id}"),
            groups: groups.iter().map(|g| g.to_string()).collect(),
        }
    }

    #[test]
    fn test_no_matching_groups_is_unknown() {
        let map = GroupMap::default();
        let v = resolve_vehicle(&map, &device("d1", &["zzz", "yyy"]));

        assert_eq!(v.vehicle_type, VehicleType::Unknown);
        assert_eq!(v.depot, Depot::Unknown);
    }

    #[test]
    fn test_empty_group_list_is_unknown() {
        let map = GroupMap::default();
        let v = resolve_vehicle(&map, &device("d1", &[]));

        assert_eq!(v.vehicle_type, VehicleType::Unknown);
    }

    #[test]
    fn test_type_priority_van_wins() {
        // A device in both the van and pickup groups resolves as a van.
        let map = GroupMap::default();
        let v = resolve_vehicle(&map, &device("d1", &["b279F", "b279E"]));

        assert_eq!(v.vehicle_type, VehicleType::Van);
    }

    #[test]
    fn test_depot_resolves_independently_of_type() {
        let map = GroupMap::default();
        let v = resolve_vehicle(&map, &device("d1", &["b279B"]));

        assert_eq!(v.vehicle_type, VehicleType::Unknown);
        assert_eq!(v.depot, Depot::South);
    }

    #[test]
    fn test_full_classification() {
        let map = GroupMap::default();
        let v = resolve_vehicle(&map, &device("d1", &["b279D", "b279A"]));

        assert_eq!(v.vehicle_type, VehicleType::Backhoe);
        assert_eq!(v.depot, Depot::North);
        assert_eq!(v.id, "d1");
        assert_eq!(v.name, "Device d1");
    }

    #[test]
    fn test_load_partial_map_keeps_defaults() {
        let path = format!("{}/fleet_auditor_test_groupmap.json", env::temp_dir().display());
        fs::write(&path, r#"{ "van": "custom-van" }"#).unwrap();

        let map = GroupMap::load(&path).unwrap();
        assert_eq!(map.van, "custom-van");
        assert_eq!(map.pickup, "b279F");
        assert_eq!(map.depot_south, "b279B");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_missing_file_errors() {
        assert!(GroupMap::load("/nonexistent/groupmap.json").is_err());
    }

    #[test]
    fn test_depot_serializes_with_spaces() {
        let json = serde_json::to_string(&Depot::North).unwrap();
        assert_eq!(json, "\"Depot North\"");
    }
}
