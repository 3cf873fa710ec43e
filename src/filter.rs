/// Posts about learning material or events, rejected even when a trope matches.
pub const EXCLUDED_TERMS: &[&str] = &["tutorial", "course", "workshop", "conference", "webinar"];

/// Lower-cased trope stems. Matching is plain substring search, so `accelerat`
/// covers both "accelerate" and "accelerating".
pub const SF_TROPES: &[&str] = &[
    "surpass", "exceed", "outperform", "replace",
    "singularity", "exponential", "accelerat",
    "dystop", "apocalyp", "extinct", "doom", "threat", "danger",
    "utopi", "post-scarcity", "abundance", "paradise",
    "obsolete", "unemploy", "useless", "redundant",
    "conscious", "sentien", "aware", "alive", "feel",
    "breakthrough", "revolution", "transform", "first time",
    "immortal", "eternal", "upload", "transcend",
];

pub fn sounds_like_sf(text: &str) -> bool {
    let text = text.to_lowercase();

    if EXCLUDED_TERMS.iter().any(|term| text.contains(term)) {
        return false;
    }

    SF_TROPES.iter().any(|trope| text.contains(trope))
}
