use murick_core::catalog::{popular_brands, BrandInfo, BATTERY_BRANDS, BATTERY_CAPACITIES};
use serde::Serialize;

use crate::error::CliResult;
use crate::output::CommandOutput;

#[derive(Debug, Serialize)]
struct Catalog {
    brands: &'static [BrandInfo],
    capacities: &'static [&'static str],
}

/// Suggested brands and capacities. Any other value is accepted when
/// adding a SKU.
pub fn run() -> CliResult<CommandOutput> {
    let popular: Vec<&str> = popular_brands().map(|b| b.name).collect();
    let mut text = format!("Popular: {}\n\nBrands (* popular):\n", popular.join(", "));
    for brand in BATTERY_BRANDS.iter() {
        let marker = if brand.popular { "*" } else { " " };
        text.push_str(&format!("  {} {}\n", marker, brand.name));
    }
    text.push_str("\nCapacities:\n  ");
    text.push_str(&BATTERY_CAPACITIES.join(", "));
    text.push('\n');

    CommandOutput::new(
        &Catalog {
            brands: &BATTERY_BRANDS,
            capacities: &BATTERY_CAPACITIES,
        },
        text,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_output() {
        let output = run().unwrap();
        assert_eq!(output.json["brands"][0]["name"], "AGS");
        assert_eq!(output.json["brands"][0]["popular"], true);
        assert_eq!(output.json["capacities"].as_array().map(|c| c.len()), Some(12));
        assert!(output.text.starts_with("Popular: AGS, Exide, Phoenix, Volta, Bridgepower\n"));
        assert!(output.text.contains("* Exide"));
        assert!(output.text.contains("  Crown"));
    }
}
