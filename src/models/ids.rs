//! Strongly-typed identifier for equipment records

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

const DISPLAY_PREFIX: &str = "eq-";

/// Hex digits shown in the display form
const SHORT_LEN: usize = 8;

/// Identifier of a single piece of equipment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EquipmentId(Uuid);

impl EquipmentId {
    /// Create a new random ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an ID from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Parse an ID from a string
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Whether `s` is the short display form of this ID, or a longer
    /// leading part of the UUID (at least 8 hex digits, `eq-` optional)
    pub fn matches_short(&self, s: &str) -> bool {
        let s = s.trim();
        let s = s.strip_prefix(DISPLAY_PREFIX).unwrap_or(s);
        s.len() >= SHORT_LEN
            && self
                .0
                .to_string()
                .starts_with(s.to_ascii_lowercase().as_str())
    }
}

impl Default for EquipmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EquipmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", DISPLAY_PREFIX, &self.0.to_string()[..SHORT_LEN])
    }
}

impl From<Uuid> for EquipmentId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for EquipmentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(uuid) = Uuid::parse_str(s) {
            return Ok(Self(uuid));
        }
        let s = s.strip_prefix(DISPLAY_PREFIX).unwrap_or(s);
        Ok(Self(Uuid::parse_str(s)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        let id = EquipmentId::new();
        let display = format!("{}", id);
        assert!(display.starts_with("eq-"));
        assert_eq!(display.len(), 11);
    }

    #[test]
    fn test_id_parse() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id = EquipmentId::parse(uuid_str).unwrap();
        assert_eq!(id.as_uuid().to_string(), uuid_str);

        let prefixed: EquipmentId = format!("eq-{}", uuid_str).parse().unwrap();
        assert_eq!(prefixed, id);
    }

    #[test]
    fn test_display_form_matches_short() {
        let id = EquipmentId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert!(id.matches_short(&id.to_string()));
        assert!(id.matches_short("550E8400"));
        assert!(id.matches_short("eq-550e8400-e29b"));
        assert!(!id.matches_short("eq-550e"));
        assert!(!id.matches_short("eq-660e8400"));
    }

    #[test]
    fn test_id_serialization() {
        let id = EquipmentId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: EquipmentId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
