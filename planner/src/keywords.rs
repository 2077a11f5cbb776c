//! Goal keyword extraction.

use std::collections::HashMap;

/// Words too common to locate anything useful.
pub const STOP_WORDS: &[&str] = &[
    "about", "above", "after", "again", "all", "also", "and", "any", "are", "because", "been",
    "before", "being", "below", "between", "both", "but", "can", "could", "did", "does", "doing",
    "down", "during", "each", "few", "find", "for", "from", "further", "get", "give", "had",
    "has", "have", "having", "her", "here", "hers", "him", "his", "how", "into", "its", "itself",
    "just", "list", "more", "most", "not", "now", "off", "once", "only", "other", "our", "ours",
    "out", "over", "own", "please", "same", "she", "should", "show", "some", "such", "than",
    "that", "the", "their", "them", "then", "there", "these", "they", "this", "those", "through",
    "too", "under", "until", "very", "was", "were", "what", "when", "where", "which", "while",
    "who", "whom", "why", "will", "with", "would", "you", "your", "yours",
];

/// Top `max` keywords of `goal`.
///
/// Candidates are ASCII alphabetic runs of at least three letters, lower-cased,
/// minus [`STOP_WORDS`]. Ranked by frequency, ties by first occurrence.
pub fn extract_keywords(goal: &str, max: usize) -> Vec<String> {
    let words = goal
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|w| w.len() >= 3);

    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (position, w) in words.enumerate() {
        let lowered = w.to_ascii_lowercase();
        if STOP_WORDS.contains(&lowered.as_str()) {
            continue;
        }
        counts.entry(lowered).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(String, usize, usize)> = counts
        .into_iter()
        .map(|(kw, (count, first))| (kw, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked.truncate(max);
    ranked.into_iter().map(|(kw, _, _)| kw).collect()
}
