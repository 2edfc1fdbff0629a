//! Person record and the sensitive field families subject to masking.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sensitive field families recognized by the masking policy and the
/// temporary access ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitiveField {
    IdCard,
    Phone,
    Address,
    Name,
    Location,
}

impl SensitiveField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensitiveField::IdCard => "id_card",
            SensitiveField::Phone => "phone",
            SensitiveField::Address => "address",
            SensitiveField::Name => "name",
            SensitiveField::Location => "location",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "id_card" => Some(SensitiveField::IdCard),
            "phone" => Some(SensitiveField::Phone),
            "address" => Some(SensitiveField::Address),
            "name" => Some(SensitiveField::Name),
            "location" => Some(SensitiveField::Location),
            _ => None,
        }
    }
}

/// Structured address as stored on a farmer profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub house_no: String,
    pub village_no: Option<String>,
    pub subdistrict: String,
    pub district: String,
    pub province: String,
    pub postal_code: String,
}

impl Address {
    /// Full display string with every component visible.
    pub fn display(&self) -> String {
        match &self.village_no {
            Some(village) => format!(
                "{} Moo {}, {}, {}, {} {}",
                self.house_no,
                village,
                self.subdistrict,
                self.district,
                self.province,
                self.postal_code
            ),
            None => format!(
                "{}, {}, {}, {} {}",
                self.house_no, self.subdistrict, self.district, self.province, self.postal_code
            ),
        }
    }
}

/// Unmasked person record as loaded from the backing store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonRecord {
    pub id_card: String,
    pub phone: String,
    pub first_name: String,
    pub last_name: String,
    pub address: Address,
    pub latitude: f64,
    pub longitude: f64,
}

/// Person record after the masking policy has been applied.
///
/// `address` is the raw object for full-tier viewers and a display string
/// (or a no-access placeholder) for everyone else, so it is carried as a
/// JSON value. `masked` is the downstream UI cue that at least the default
/// policy for a non-administrative viewer was applied.
#[derive(Debug, Clone, Serialize)]
pub struct MaskedPersonRecord {
    pub id_card: String,
    pub phone: String,
    pub full_name: String,
    pub address: Value,
    pub location: String,
    /// Serialized as `_masked`, the key downstream UIs key their cues on.
    #[serde(rename = "_masked")]
    pub masked: bool,
}
