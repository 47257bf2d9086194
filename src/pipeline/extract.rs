// src/pipeline/extract.rs
//! Best-effort extraction of a rent price and a street number from listing
//! text. A miss is never an error; the rule that wanted the value simply
//! cannot reject the listing.

use once_cell::sync::OnceCell;
use regex::Regex;

/// Rents outside this band are treated as noise (a year, a square footage, a
/// phone fragment) rather than a price.
const RENT_BAND_MIN: f64 = 500.0;
const RENT_BAND_MAX: f64 = 10_000.0;

fn in_band(price: f64) -> bool {
    (RENT_BAND_MIN..=RENT_BAND_MAX).contains(&price)
}

/// Extract a plausible monthly rent. Dollar-prefixed amounts win (optional
/// thousands separators and cents); if the first one is missing or out of
/// band, the first standalone 4-digit token is tried. First match only, like
/// a reader skimming for the price.
pub fn extract_price(text: &str) -> Option<f64> {
    static RE_DOLLAR: OnceCell<Regex> = OnceCell::new();
    let re_dollar = RE_DOLLAR.get_or_init(|| {
        Regex::new(r"\$(\d{1,3}(?:,\d{3})*(?:\.\d{2})?)").expect("dollar price regex")
    });
    if let Some(caps) = re_dollar.captures(text) {
        if let Ok(price) = caps[1].replace(',', "").parse::<f64>() {
            if in_band(price) {
                return Some(price);
            }
        }
    }

    static RE_BARE: OnceCell<Regex> = OnceCell::new();
    let re_bare = RE_BARE.get_or_init(|| Regex::new(r"\b(\d{4})\b").expect("bare price regex"));
    if let Some(caps) = re_bare.captures(text) {
        if let Ok(price) = caps[1].parse::<f64>() {
            if in_band(price) {
                return Some(price);
            }
        }
    }

    None
}

/// Extract a leading street number from address-like text: one to four digits
/// followed by an optional compass direction and a second (possibly
/// ordinal-suffixed) number, as in "123 East 86th" or "100 10th". A bare
/// street name ("90 Washington Street") does not match.
pub fn extract_street_number(text: &str) -> Option<u32> {
    static RE_STREET: OnceCell<Regex> = OnceCell::new();
    let re = RE_STREET.get_or_init(|| {
        Regex::new(r"(?i)(\d{1,4})\s+(?:east|west|north|south)?\s*\d{1,3}(?:st|nd|rd|th)?")
            .expect("street number regex")
    });
    re.captures(text).and_then(|caps| caps[1].parse::<u32>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dollar_price_with_separators_and_cents() {
        assert_eq!(extract_price("charming studio, $2,500/month"), Some(2500.0));
        assert_eq!(extract_price("rent is $1,850.50 heat incl."), Some(1850.5));
    }

    #[test]
    fn bare_four_digit_fallback() {
        assert_eq!(extract_price("asking 2400 per month, no fee"), Some(2400.0));
    }

    #[test]
    fn out_of_band_dollar_amount_falls_through() {
        // $150 is below the band; the 4-digit token still reads as the rent.
        assert_eq!(extract_price("$150 deposit, rent 2100 monthly"), Some(2100.0));
        // Nothing usable at all.
        assert_eq!(extract_price("$45 application fee"), None);
    }

    #[test]
    fn no_price_found() {
        assert_eq!(extract_price("spacious room on a quiet block"), None);
        // 5-digit runs have no 4-digit token boundary.
        assert_eq!(extract_price("zip 11215 area"), None);
    }

    #[test]
    fn street_number_with_direction() {
        assert_eq!(extract_street_number("123 East 86th, elevator bldg"), Some(123));
        assert_eq!(extract_street_number("45 west 21st street"), Some(45));
    }

    #[test]
    fn street_number_without_direction() {
        assert_eq!(extract_street_number("100 10th Ave"), Some(100));
    }

    #[test]
    fn street_name_without_second_number_misses() {
        assert_eq!(extract_street_number("90 Washington Street"), None);
        assert_eq!(extract_street_number("corner of Grand and 5th"), None);
    }
}
