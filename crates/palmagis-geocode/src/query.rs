//! Search-string composition shared by the provider adapters.
//!
//! Every query gets a fixed regional qualifier appended to bias results
//! toward the deployment area. Providers differ in how aggressively they
//! qualify: the precise provider gets the city, the free-text providers a
//! progressively broader island/region string.

use palmagis_core::GeocodeQuery;

/// Qualifier for the address-precise provider.
pub const REGION_CITY: &str = "Palma de Mallorca";
/// Most specific free-text qualifier (strategy ladder step 1).
pub const REGION_FULL: &str = "Mallorca, Islas Baleares, España";
/// Broader qualifier (ladder steps 2–3 and the secondary provider).
pub const REGION_BROAD: &str = "Mallorca, España";
/// Minimal qualifier (ladder step 4).
pub const REGION_MINIMAL: &str = "Mallorca";

/// Synthetic bus-stop label combining identifier and description.
///
/// Returns `None` unless both parts are present and non-blank; a label
/// without a description would just repeat the identifier.
#[must_use]
pub fn stop_label(query: &GeocodeQuery, prefix: &str) -> Option<String> {
    let description = query.description_trimmed()?;
    let identifier = query.identifier.trim();
    if identifier.is_empty() {
        return None;
    }
    Some(format!("{prefix} {identifier}- {description}"))
}

/// Join non-empty terms with the conventional `", "` separator.
#[must_use]
pub fn join_terms<'a>(terms: impl IntoIterator<Item = &'a str>) -> String {
    terms
        .into_iter()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_label_requires_identifier_and_description() {
        let query = GeocodeQuery::new("1043", Some("Plaça Espanya".to_string()), "x");
        assert_eq!(
            stop_label(&query, "Parada bus"),
            Some("Parada bus 1043- Plaça Espanya".to_string())
        );

        let query = GeocodeQuery::new("1043", None, "x");
        assert_eq!(stop_label(&query, "Parada bus"), None);

        let query = GeocodeQuery::new("  ", Some("Plaça Espanya".to_string()), "x");
        assert_eq!(stop_label(&query, "Parada bus"), None);
    }

    #[test]
    fn join_terms_skips_blank_parts() {
        assert_eq!(
            join_terms(["Carrer Aragó 22", "", "  ", REGION_MINIMAL]),
            "Carrer Aragó 22, Mallorca"
        );
    }
}
