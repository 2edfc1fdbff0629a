//! Data masking policy for personally identifiable fields.
//!
//! Pure functions, one per field family. Default masking depends solely on
//! the viewer's role tier; a live temporary access grant can elevate single
//! fields to the full branch for partial/none-tier viewers.

use serde_json::Value;
use std::collections::HashSet;

use crate::models::person::{Address, MaskedPersonRecord, PersonRecord, SensitiveField};

/// Nominal width of a national id; the fully masked form always has this
/// many characters regardless of the actual value.
const ID_CARD_MASK_WIDTH: usize = 13;
/// Placeholder for phone numbers, independent of actual length.
const PHONE_PLACEHOLDER: &str = "xxx-xxx-xxxx";
/// Placeholder shown instead of an address to none-tier viewers.
const ADDRESS_PLACEHOLDER: &str = "no access";
/// Placeholder for personal names.
const NAME_PLACEHOLDER: &str = "****";
/// Placeholder for GPS coordinates; click-to-reveal or emergency access is
/// the only path to a real value for non-administrative tiers.
const LOCATION_PLACEHOLDER: &str = "**.******,***.******";

/// Viewer tiers for default masking, derived solely from the role code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskTier {
    /// Top administrative tiers: everything verbatim.
    Full,
    /// Field-operator and analyst tiers: partial redaction.
    Partial,
    /// Everyone else: fully masked.
    None,
}

impl MaskTier {
    pub fn for_role(role_code: &str) -> Self {
        match role_code {
            "SUPER_ADMIN" | "ADMIN" => MaskTier::Full,
            "OFFICER" | "RESEARCHER" => MaskTier::Partial,
            _ => MaskTier::None,
        }
    }

    pub fn is_full(self) -> bool {
        self == MaskTier::Full
    }
}

/// Tier actually applied to one field once live grants are honored.
/// Full-tier viewers are never affected by grants; they already see
/// everything.
fn effective_tier(tier: MaskTier, field: SensitiveField, elevated: &HashSet<SensitiveField>) -> MaskTier {
    if tier.is_full() || elevated.contains(&field) {
        MaskTier::Full
    } else {
        tier
    }
}

/// Mask a national id. Partial keeps the first and last four digits with a
/// fixed-width middle.
pub fn mask_id_card(raw: &str, tier: MaskTier) -> String {
    match tier {
        MaskTier::Full => raw.to_string(),
        MaskTier::Partial => {
            let chars: Vec<char> = raw.chars().collect();
            if chars.len() < 8 {
                return "*".repeat(ID_CARD_MASK_WIDTH);
            }
            let head: String = chars[..4].iter().collect();
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("{head}*****{tail}")
        }
        MaskTier::None => "*".repeat(ID_CARD_MASK_WIDTH),
    }
}

/// Mask a phone number. Partial shows the first six digits as two groups.
pub fn mask_phone(raw: &str, tier: MaskTier) -> String {
    match tier {
        MaskTier::Full => raw.to_string(),
        MaskTier::Partial => {
            let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
            if digits.len() < 6 {
                return PHONE_PLACEHOLDER.to_string();
            }
            format!("{}-{}-xxxx", &digits[..3], &digits[3..6])
        }
        MaskTier::None => PHONE_PLACEHOLDER.to_string(),
    }
}

/// Mask a structured address. Partial masks the house and village
/// identifiers but keeps the administrative area as a display string.
pub fn mask_address(raw: &Address, tier: MaskTier) -> Value {
    match tier {
        MaskTier::Full => serde_json::to_value(raw).unwrap_or(Value::Null),
        MaskTier::Partial => Value::String(format!(
            "***, {}, {}, {} {}",
            raw.subdistrict, raw.district, raw.province, raw.postal_code
        )),
        MaskTier::None => Value::String(ADDRESS_PLACEHOLDER.to_string()),
    }
}

/// Mask a personal name. Only none-tier viewers lose it.
pub fn mask_name(first_name: &str, last_name: &str, tier: MaskTier) -> String {
    match tier {
        MaskTier::Full | MaskTier::Partial => format!("{first_name} {last_name}"),
        MaskTier::None => NAME_PLACEHOLDER.to_string(),
    }
}

/// Mask a GPS coordinate pair. Partial and none tiers get the same fixed
/// placeholder.
pub fn mask_location(latitude: f64, longitude: f64, tier: MaskTier) -> String {
    match tier {
        MaskTier::Full => format!("{latitude},{longitude}"),
        MaskTier::Partial | MaskTier::None => LOCATION_PLACEHOLDER.to_string(),
    }
}

/// Elevation-aware variant of [`mask_id_card`].
pub fn mask_id_card_elevated(raw: &str, tier: MaskTier, elevated: &HashSet<SensitiveField>) -> String {
    mask_id_card(raw, effective_tier(tier, SensitiveField::IdCard, elevated))
}

/// Elevation-aware variant of [`mask_phone`].
pub fn mask_phone_elevated(raw: &str, tier: MaskTier, elevated: &HashSet<SensitiveField>) -> String {
    mask_phone(raw, effective_tier(tier, SensitiveField::Phone, elevated))
}

/// Elevation-aware variant of [`mask_address`].
pub fn mask_address_elevated(
    raw: &Address,
    tier: MaskTier,
    elevated: &HashSet<SensitiveField>,
) -> Value {
    mask_address(raw, effective_tier(tier, SensitiveField::Address, elevated))
}

/// Elevation-aware variant of [`mask_name`].
pub fn mask_name_elevated(
    first_name: &str,
    last_name: &str,
    tier: MaskTier,
    elevated: &HashSet<SensitiveField>,
) -> String {
    mask_name(
        first_name,
        last_name,
        effective_tier(tier, SensitiveField::Name, elevated),
    )
}

/// Elevation-aware variant of [`mask_location`].
pub fn mask_location_elevated(
    latitude: f64,
    longitude: f64,
    tier: MaskTier,
    elevated: &HashSet<SensitiveField>,
) -> String {
    mask_location(
        latitude,
        longitude,
        effective_tier(tier, SensitiveField::Location, elevated),
    )
}

/// Apply the full policy to a person record with no grant elevation.
pub fn mask_record(record: &PersonRecord, viewer_role: &str) -> MaskedPersonRecord {
    mask_record_elevated(record, viewer_role, &HashSet::new())
}

/// Apply the full policy to a person record. `elevated` is the union of
/// live-grant fields for this viewer/target pair.
pub fn mask_record_elevated(
    record: &PersonRecord,
    viewer_role: &str,
    elevated: &HashSet<SensitiveField>,
) -> MaskedPersonRecord {
    let tier = MaskTier::for_role(viewer_role);
    MaskedPersonRecord {
        id_card: mask_id_card_elevated(&record.id_card, tier, elevated),
        phone: mask_phone_elevated(&record.phone, tier, elevated),
        full_name: mask_name_elevated(&record.first_name, &record.last_name, tier, elevated),
        address: mask_address_elevated(&record.address, tier, elevated),
        location: mask_location_elevated(record.latitude, record.longitude, tier, elevated),
        masked: !tier.is_full(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> Address {
        Address {
            house_no: "42/7".to_string(),
            village_no: Some("3".to_string()),
            subdistrict: "Nong Bua".to_string(),
            district: "Mueang".to_string(),
            province: "Nakhon Ratchasima".to_string(),
            postal_code: "30000".to_string(),
        }
    }

    #[test]
    fn test_id_card_tiers() {
        assert_eq!(
            mask_id_card("1301700136939", MaskTier::for_role("ADMIN")),
            "1301700136939"
        );
        assert_eq!(
            mask_id_card("1301700136939", MaskTier::for_role("OFFICER")),
            "1301*****6939"
        );
        assert_eq!(
            mask_id_card("1301700136939", MaskTier::for_role("FARMER")),
            "*************"
        );
    }

    #[test]
    fn test_id_card_short_value_fully_masked_for_partial() {
        assert_eq!(mask_id_card("1234567", MaskTier::Partial), "*************");
    }

    #[test]
    fn test_phone_tiers() {
        assert_eq!(
            mask_phone("0903599265", MaskTier::for_role("RESEARCHER")),
            "090-359-xxxx"
        );
        assert_eq!(
            mask_phone("0903599265", MaskTier::for_role("FARMER")),
            "xxx-xxx-xxxx"
        );
        assert_eq!(mask_phone("0903599265", MaskTier::Full), "0903599265");
    }

    #[test]
    fn test_phone_partial_ignores_formatting() {
        assert_eq!(mask_phone("090-359-9265", MaskTier::Partial), "090-359-xxxx");
    }

    #[test]
    fn test_address_tiers() {
        let addr = address();
        let full = mask_address(&addr, MaskTier::Full);
        assert_eq!(full["house_no"], "42/7");

        let partial = mask_address(&addr, MaskTier::Partial);
        assert_eq!(
            partial,
            Value::String("***, Nong Bua, Mueang, Nakhon Ratchasima 30000".to_string())
        );

        let none = mask_address(&addr, MaskTier::None);
        assert_eq!(none, Value::String("no access".to_string()));
    }

    #[test]
    fn test_name_visible_to_partial_tier() {
        assert_eq!(mask_name("Somchai", "Jaidee", MaskTier::Partial), "Somchai Jaidee");
        assert_eq!(mask_name("Somchai", "Jaidee", MaskTier::None), "****");
    }

    #[test]
    fn test_location_masked_for_every_non_full_tier() {
        assert_eq!(
            mask_location(14.9799, 102.0978, MaskTier::Full),
            "14.9799,102.0978"
        );
        assert_eq!(
            mask_location(14.9799, 102.0978, MaskTier::Partial),
            mask_location(14.9799, 102.0978, MaskTier::None)
        );
    }

    #[test]
    fn test_elevation_applies_full_branch_per_field() {
        let elevated = HashSet::from([SensitiveField::Phone]);
        assert_eq!(
            mask_phone_elevated("0903599265", MaskTier::Partial, &elevated),
            "0903599265"
        );
        // only the granted field is elevated
        assert_eq!(
            mask_id_card_elevated("1301700136939", MaskTier::Partial, &elevated),
            "1301*****6939"
        );
    }

    #[test]
    fn test_full_tier_unaffected_by_grants() {
        let elevated = HashSet::new();
        assert_eq!(
            mask_id_card_elevated("1301700136939", MaskTier::Full, &elevated),
            "1301700136939"
        );
    }

    #[test]
    fn test_mask_record_round_trip_for_super_admin() {
        let record = PersonRecord {
            id_card: "1301700136939".to_string(),
            phone: "0903599265".to_string(),
            first_name: "Somchai".to_string(),
            last_name: "Jaidee".to_string(),
            address: address(),
            latitude: 14.9799,
            longitude: 102.0978,
        };
        let masked = mask_record(&record, "SUPER_ADMIN");
        assert_eq!(masked.id_card, record.id_card);
        assert_eq!(masked.phone, record.phone);
        assert_eq!(masked.full_name, "Somchai Jaidee");
        assert_eq!(masked.address["postal_code"], "30000");
        assert_eq!(masked.location, "14.9799,102.0978");
        assert!(!masked.masked);
    }

    #[test]
    fn test_mask_record_stamps_masked_for_lower_tiers() {
        let record = PersonRecord {
            id_card: "1301700136939".to_string(),
            phone: "0903599265".to_string(),
            first_name: "Somchai".to_string(),
            last_name: "Jaidee".to_string(),
            address: address(),
            latitude: 14.9799,
            longitude: 102.0978,
        };
        assert!(mask_record(&record, "OFFICER").masked);
        assert!(mask_record(&record, "FARMER").masked);
    }

    #[test]
    fn test_unknown_role_gets_none_tier() {
        assert_eq!(MaskTier::for_role("VISITOR"), MaskTier::None);
    }
}
