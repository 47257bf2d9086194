// src/pipeline/filter.rs
//! Eligibility rules: the keyword gate and the hard-requirement gate. Both are
//! binary; a listing must clear every configured rule to stay in the running.

use once_cell::sync::OnceCell;
use regex::Regex;
use serde::Deserialize;
use std::fmt;

use super::extract::{extract_price, extract_street_number};

/// Terms any of which satisfies a laundry requirement.
const LAUNDRY_TERMS: [&str; 5] = ["laundry", "washer", "dryer", "w/d", "in-unit"];

/// Case-insensitive substring check. The haystack is already lower-cased by
/// `Listing::haystack`; needles come from configuration and are lowered here.
pub(crate) fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.contains(&needle.to_lowercase())
}

/// Keyword gate: at least one required keyword AND no excluded keyword.
///
/// An empty required list matches nothing unless `match_all_when_empty` is
/// set: `any` over an empty set is false, and silently matching everything
/// would flood the report the first time someone blanks the list.
pub fn keyword_gate(
    haystack: &str,
    keywords: &[String],
    exclude: &[String],
    match_all_when_empty: bool,
) -> bool {
    let required_ok = if keywords.is_empty() {
        match_all_when_empty
    } else {
        keywords.iter().any(|k| contains_ci(haystack, k))
    };
    required_ok && !exclude.iter().any(|x| contains_ci(haystack, x))
}

/// Hard requirements: every configured sub-rule must pass. An absent field
/// disables its rule entirely.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct HardRequirements {
    pub max_rent: Option<f64>,
    #[serde(default)]
    pub studio_only: bool,
    #[serde(default)]
    pub require_laundry: bool,
    #[serde(default)]
    pub exclude_neighborhoods: Vec<String>,
    pub exclude_above_street: Option<u32>,
}

/// Why a listing was rejected by the hard-requirement gate.
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    OverMaxRent { price: f64, max_rent: f64 },
    NotAStudio,
    NoLaundry,
    ExcludedNeighborhood(String),
    StreetAboveLimit { number: u32, limit: u32 },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::OverMaxRent { price, max_rent } => {
                write!(f, "price {price} over max rent {max_rent}")
            }
            RejectReason::NotAStudio => write!(f, "bedroom listing but studio_only is set"),
            RejectReason::NoLaundry => write!(f, "no laundry terms found"),
            RejectReason::ExcludedNeighborhood(n) => write!(f, "excluded neighborhood {n}"),
            RejectReason::StreetAboveLimit { number, limit } => {
                write!(f, "street number {number} above {limit}")
            }
        }
    }
}

impl HardRequirements {
    /// Evaluate every configured sub-rule against the haystack; `None` means
    /// the listing passes. Extraction misses (no price, no street number)
    /// leave the corresponding rule neutral.
    pub fn rejection(&self, haystack: &str) -> Option<RejectReason> {
        if let Some(max_rent) = self.max_rent {
            if let Some(price) = extract_price(haystack) {
                if price > max_rent {
                    return Some(RejectReason::OverMaxRent { price, max_rent });
                }
            }
        }

        if self.studio_only && mentions_bedrooms(haystack) && !haystack.contains("studio") {
            return Some(RejectReason::NotAStudio);
        }

        if self.require_laundry && !LAUNDRY_TERMS.iter().any(|t| haystack.contains(t)) {
            return Some(RejectReason::NoLaundry);
        }

        for neighborhood in &self.exclude_neighborhoods {
            if contains_ci(haystack, neighborhood) {
                return Some(RejectReason::ExcludedNeighborhood(neighborhood.clone()));
            }
        }

        if let Some(limit) = self.exclude_above_street {
            if let Some(number) = extract_street_number(haystack) {
                if number > limit {
                    return Some(RejectReason::StreetAboveLimit { number, limit });
                }
            }
        }

        None
    }

    pub fn accepts(&self, haystack: &str) -> bool {
        self.rejection(haystack).is_none()
    }
}

/// True when the text names a bedroom count (1–4 then "br"/"bed"/"bedroom").
fn mentions_bedrooms(haystack: &str) -> bool {
    static RE_BEDROOMS: OnceCell<Regex> = OnceCell::new();
    let re = RE_BEDROOMS
        .get_or_init(|| Regex::new(r"\b[1-4]\s*(?:br|bed|bedroom)").expect("bedroom regex"));
    re.is_match(haystack)
}
