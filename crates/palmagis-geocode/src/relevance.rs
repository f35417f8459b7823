//! Picking the most relevant candidate out of a provider's match list.

use palmagis_core::Coordinates;

/// Keywords that mark a match as belonging to the deployment region.
pub const REGION_KEYWORDS: [&str; 3] = ["mallorca", "palma", "balear"];

/// One candidate match as returned by a provider, before relevance
/// filtering.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Provider-supplied display text for the match (display name, city…).
    pub text: String,
    pub coordinates: Coordinates,
}

/// Pick the best candidate from a provider-ordered list.
///
/// Returns the first candidate whose text mentions any region keyword
/// (case-insensitively). When none does, the first candidate in list order
/// is returned unmodified — a loosely relevant guess beats no guess. An
/// empty list yields `None`.
#[must_use]
pub fn pick_best(candidates: &[Candidate], keywords: &[&str]) -> Option<Coordinates> {
    let regional = candidates.iter().find(|c| {
        let text = c.text.to_lowercase();
        keywords.iter().any(|k| text.contains(&k.to_lowercase()))
    });

    regional
        .or_else(|| candidates.first())
        .map(|c| c.coordinates)
}
