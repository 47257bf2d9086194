// src/pipeline/score.rs
//! Preference scoring for listings that survived the gates. Scores order the
//! report; they never reject.

use serde::Deserialize;

/// Terms treated as evidence of a sublet or short-term arrangement.
const SUBLET_TERMS: [&str; 5] = ["sublet", "sublease", "short-term", "short term", "temporary"];

/// Soft preferences. Each enabled preference that the listing satisfies adds
/// a fixed bonus to the score.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Preferences {
    #[serde(default)]
    pub furnished: bool,
    #[serde(default)]
    pub sublet_or_short_term: bool,
}

impl Preferences {
    /// Score a lower-cased haystack. Disabled preferences contribute nothing,
    /// so the default configuration scores every listing 0.
    pub fn score(&self, haystack: &str) -> u32 {
        let mut score = 0;
        if self.furnished && haystack.contains("furnished") {
            score += 2;
        }
        if self.sublet_or_short_term && SUBLET_TERMS.iter().any(|t| haystack.contains(t)) {
            score += 2;
        }
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_preference_adds_two() {
        let prefs = Preferences {
            furnished: true,
            sublet_or_short_term: true,
        };
        assert_eq!(prefs.score("furnished sublet near the park"), 4);
        assert_eq!(prefs.score("furnished apartment"), 2);
        assert_eq!(prefs.score("short term lease available"), 2);
        assert_eq!(prefs.score("unremarkable walkup"), 0);
    }

    #[test]
    fn disabled_preferences_contribute_nothing() {
        let prefs = Preferences::default();
        assert_eq!(prefs.score("furnished short-term sublet"), 0);
    }

    #[test]
    fn sublet_terms_cover_both_spellings() {
        let prefs = Preferences {
            furnished: false,
            sublet_or_short_term: true,
        };
        assert_eq!(prefs.score("short-term ok"), 2);
        assert_eq!(prefs.score("short term ok"), 2);
        assert_eq!(prefs.score("temporary housing"), 2);
    }
}
