//! Keyword classification of free-text location descriptions into terrain labels.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::location::Terrain;

static TERRAIN_PATTERNS: LazyLock<Vec<(Terrain, Regex)>> = LazyLock::new(|| {
    [
        (Terrain::Lake, r"lakes?|ponds?|lochs?|meres?|tarns?"),
        (Terrain::Mountain, r"mountains?|peaks?|summits?|cliffs?|crags?|alps"),
        (Terrain::Swamp, r"swamps?|marsh(?:es|land)?|bogs?|fens?|mire"),
        (Terrain::OpenWater, r"seas?|oceans?|open water|bays?|straits?|gulf"),
        (Terrain::Forest, r"forests?|woods?|woodland|groves?|thickets?"),
        (Terrain::Hills, r"hills?|hillside|downs|knolls?"),
        (Terrain::Plains, r"plains?|meadows?|fields?|grassland|steppe"),
        (Terrain::Desert, r"deserts?|dunes?|wastes?|badlands"),
        (Terrain::Road, r"roads?|paths?|trails?|highway|crossroads?"),
        (Terrain::Settlement, r"towns?|villages?|city|hamlets?|inn|tavern|market"),
        (Terrain::Cave, r"caves?|caverns?|grotto|tunnels?|mines?"),
    ]
    .into_iter()
    .filter_map(|(terrain, words)| {
        Regex::new(&format!(r"(?i)\b(?:{words})\b")).ok().map(|pattern| (terrain, pattern))
    })
    .collect()
});

/// Labels whose keywords appear as whole words in the name or description.
pub fn classify_terrain(name: &str, description: &str) -> BTreeSet<Terrain> {
    TERRAIN_PATTERNS
        .iter()
        .filter(|(_, pattern)| pattern.is_match(name) || pattern.is_match(description))
        .map(|(terrain, _)| *terrain)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_label_has_a_compiled_pattern() {
        assert_eq!(TERRAIN_PATTERNS.len(), 11);
    }

    #[test]
    fn matches_whole_words_case_insensitively() {
        let labels = classify_terrain("Misty Loch", "A cold LAKE beneath the peaks.");
        assert_eq!(labels, BTreeSet::from([Terrain::Lake, Terrain::Mountain]));
    }

    #[test]
    fn ignores_keywords_embedded_in_longer_words() {
        let labels = classify_terrain("Seashell Cottage", "Bayberry bushes line the porch.");
        assert!(labels.is_empty(), "unexpected labels: {labels:?}");
    }

    #[test]
    fn multi_word_keywords_match() {
        let labels = classify_terrain("The Reach", "Nothing but open water to the horizon.");
        assert!(labels.contains(&Terrain::OpenWater));
        assert!(labels.iter().any(|terrain| terrain.is_obstacle()));
    }
}
