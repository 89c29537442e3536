//! Productivity classification.
//!
//! Maps a canonical domain to one of three classes against two static
//! membership lists. Matching is substring containment; the productive
//! list is checked first, so a domain matching both lists classifies as
//! Productive. The class is computed once when an aggregate is created
//! and never re-evaluated afterwards (historical entries keep the class
//! they were recorded with).

use serde::{Deserialize, Serialize};

/// Productivity class of a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Productivity {
    Productive,
    Neutral,
    Distracting,
}

/// Domains counted as productive.
pub const PRODUCTIVE_DOMAINS: &[&str] = &[
    "github.com",
    "stackoverflow.com",
    "docs.google.com",
    "notion.so",
    "figma.com",
    "code.visualstudio.com",
    "developer.mozilla.org",
    "chat.openai.com",
];

/// Domains counted as distracting.
pub const DISTRACTING_DOMAINS: &[&str] = &[
    "youtube.com",
    "netflix.com",
    "facebook.com",
    "twitter.com",
    "instagram.com",
    "tiktok.com",
    "reddit.com",
    "twitch.tv",
];

/// Classify a canonical domain.
///
/// Precedence is fixed: productive wins over distracting, and anything
/// matching neither list is Neutral.
pub fn classify(domain: &str) -> Productivity {
    if PRODUCTIVE_DOMAINS.iter().any(|d| domain.contains(d)) {
        return Productivity::Productive;
    }
    if DISTRACTING_DOMAINS.iter().any(|d| domain.contains(d)) {
        return Productivity::Distracting;
    }
    Productivity::Neutral
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_domains() {
        assert_eq!(classify("github.com"), Productivity::Productive);
        assert_eq!(classify("youtube.com"), Productivity::Distracting);
        assert_eq!(classify("example.org"), Productivity::Neutral);
    }

    #[test]
    fn substring_containment() {
        // The two-label canonicalizer can still hand over longer keys for
        // unusual hosts; containment keeps them classified.
        assert_eq!(classify("notion.so"), Productivity::Productive);
        assert_eq!(classify("twitch.tv"), Productivity::Distracting);
    }

    #[test]
    fn productive_wins_over_distracting() {
        // Contrived key containing entries from both lists.
        let both = "github.com.youtube.com";
        assert_eq!(classify(both), Productivity::Productive);
    }
}
