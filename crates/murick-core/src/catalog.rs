//! Battery brands and capacities sold in the Pakistani market.
//!
//! These drive the suggestions offered when adding a SKU. They are not a
//! whitelist: any non-blank brand or capacity is accepted by the ledger.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BrandInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub popular: bool,
}

pub const BATTERY_BRANDS: [BrandInfo; 7] = [
    BrandInfo { id: "ags", name: "AGS", popular: true },
    BrandInfo { id: "exide", name: "Exide", popular: true },
    BrandInfo { id: "phoenix", name: "Phoenix", popular: true },
    BrandInfo { id: "volta", name: "Volta", popular: true },
    BrandInfo { id: "bridgepower", name: "Bridgepower", popular: true },
    BrandInfo { id: "osaka", name: "Osaka", popular: false },
    BrandInfo { id: "crown", name: "Crown", popular: false },
];

pub const BATTERY_CAPACITIES: [&str; 12] = [
    "35Ah", "45Ah", "55Ah", "65Ah", "70Ah", "80Ah", "100Ah", "120Ah", "135Ah", "150Ah", "180Ah",
    "200Ah",
];

pub fn popular_brands() -> impl Iterator<Item = &'static BrandInfo> {
    BATTERY_BRANDS.iter().filter(|b| b.popular)
}

/// Case-insensitive lookup by id or display name.
pub fn find_brand(name: &str) -> Option<&'static BrandInfo> {
    let name = name.trim();
    BATTERY_BRANDS
        .iter()
        .find(|b| b.id.eq_ignore_ascii_case(name) || b.name.eq_ignore_ascii_case(name))
}

/// Canonical spelling of a catalog brand, or the input trimmed if unknown.
pub fn canonical_brand(name: &str) -> String {
    find_brand(name)
        .map(|b| b.name.to_string())
        .unwrap_or_else(|| name.trim().to_string())
}

pub fn is_known_capacity(capacity: &str) -> bool {
    let capacity = capacity.trim();
    BATTERY_CAPACITIES
        .iter()
        .any(|c| c.eq_ignore_ascii_case(capacity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_popular_brands() {
        let names: Vec<&str> = popular_brands().map(|b| b.name).collect();
        assert_eq!(names, vec!["AGS", "Exide", "Phoenix", "Volta", "Bridgepower"]);
    }

    #[test]
    fn test_find_brand() {
        assert_eq!(find_brand("ags").map(|b| b.name), Some("AGS"));
        assert_eq!(find_brand(" BRIDGEPOWER ").map(|b| b.id), Some("bridgepower"));
        assert!(find_brand("Unbranded").is_none());
        assert_eq!(canonical_brand("exide"), "Exide");
        assert_eq!(canonical_brand(" Local "), "Local");
    }

    #[test]
    fn test_capacities() {
        assert!(is_known_capacity("55ah"));
        assert!(!is_known_capacity("60Ah"));
        assert_eq!(BATTERY_CAPACITIES.first(), Some(&"35Ah"));
        assert_eq!(BATTERY_CAPACITIES.last(), Some(&"200Ah"));
    }
}
