//! Gateway verification key records

use serde::{Deserialize, Serialize};

/// A gateway-issued verification key as served by the key registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyRecord {
    /// Key identifier
    pub id: String,
    /// PEM-encoded P-521 public key
    #[serde(rename = "key")]
    pub pem: String,
}

impl PublicKeyRecord {
    /// Create a new public key record
    pub fn new(id: impl Into<String>, pem: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            pem: pem.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_public_key_record_wire_format() {
        let records: Vec<PublicKeyRecord> = serde_json::from_value(json!([
            { "id": "kid1", "key": "-----BEGIN PUBLIC KEY-----\n..." }
        ]))
        .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "kid1");
        assert!(records[0].pem.starts_with("-----BEGIN PUBLIC KEY-----"));

        let value = serde_json::to_value(&records[0]).unwrap();
        assert_eq!(value["key"], records[0].pem.as_str());
    }
}
