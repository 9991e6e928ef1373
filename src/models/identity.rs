//! Listing fingerprints.
//!
//! The fingerprint is what the seen set stores, so its format is part of the
//! persisted state: changing it makes every known listing look new once.

const FIELD_SEPARATOR: char = '_';
const WHITESPACE_SUBSTITUTE: char = '_';

/// Derive the fingerprint of a listing from its title, location and price.
///
/// The fields are joined with `_`, whitespace becomes `_` and the result is
/// lowercased. Fields are not escaped, so two different triples can map to the
/// same id (`"a_b", "c"` and `"a", "b_c"`). Existing seen-set files depend on
/// this exact format.
pub fn listing_id(title: &str, location: &str, price: &str) -> String {
    let joined = format!("{title}{FIELD_SEPARATOR}{location}{FIELD_SEPARATOR}{price}");
    joined
        .chars()
        .map(|c| {
            if c.is_whitespace() {
                WHITESPACE_SUBSTITUTE
            } else {
                c
            }
        })
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_id_format() {
        assert_eq!(
            listing_id("Studio X", "Delft", "€900"),
            "studio_x_delft_€900"
        );
        assert_eq!(
            listing_id("Appartement Oude Delft", "2611 CD Delft (Centrum)", "€1.450 per maand"),
            "appartement_oude_delft_2611_cd_delft_(centrum)_€1.450_per_maand"
        );
    }

    #[test]
    fn test_listing_id_is_deterministic() {
        let first = listing_id("Loft Y", "Delft", "€1200");
        for _ in 0..10 {
            assert_eq!(listing_id("Loft Y", "Delft", "€1200"), first);
        }
    }

    #[test]
    fn test_listing_id_normalizes_case_and_whitespace() {
        assert_eq!(
            listing_id("LOFT\tY", "Delft", "€1200"),
            listing_id("loft y", "delft", "€1200")
        );
    }

    #[test]
    fn test_distinct_triples_usually_differ() {
        assert_ne!(
            listing_id("Studio X", "Delft", "€900"),
            listing_id("Loft Y", "Delft", "€1200")
        );
    }

    #[test]
    fn test_unescaped_separator_collides() {
        assert_eq!(listing_id("a_b", "c", "d"), listing_id("a", "b_c", "d"));
    }
}
