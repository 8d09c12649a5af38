//! Fuzzy lookup of patients by name.
//!
//! Receptionists type names the way patients spell them over the phone, so
//! exact matching is not enough. Substring hits rank first, then
//! Jaro-Winkler similarity over the whole name and over each word.

use strsim::jaro_winkler;

use super::{Collection, Waitlist};
use crate::models::{PatientRecord, RecordId};

/// Minimum similarity for a fuzzy hit.
const MATCH_THRESHOLD: f64 = 0.8;

/// A name lookup result.
#[derive(Debug, Clone)]
pub struct NameMatch<'a> {
    pub id: RecordId,
    pub collection: Collection,
    pub record: &'a PatientRecord,
    /// 1.0 for substring hits, otherwise the best Jaro-Winkler score
    pub score: f64,
}

impl Waitlist {
    /// Find records whose name resembles `query`, best first.
    pub fn find_by_name(&self, query: &str, limit: usize) -> Vec<NameMatch<'_>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<NameMatch<'_>> = [Collection::Waiting, Collection::Served]
            .into_iter()
            .flat_map(move |collection| {
                self.entries(collection)
                    .iter()
                    .map(move |entry| (collection, entry))
            })
            .filter_map(|(collection, entry)| {
                let score = name_score(&needle, &entry.record.name);
                (score >= MATCH_THRESHOLD).then_some(NameMatch {
                    id: entry.id,
                    collection,
                    record: &entry.record,
                    score,
                })
            })
            .collect();

        // Stable sort keeps insertion order among equal scores
        matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        matches.truncate(limit);
        matches
    }
}

fn name_score(needle: &str, name: &str) -> f64 {
    let haystack = name.to_lowercase();
    if haystack.contains(needle) {
        return 1.0;
    }

    let whole = jaro_winkler(needle, &haystack);
    haystack
        .split_whitespace()
        .map(|word| jaro_winkler(needle, word))
        .fold(whole, f64::max)
}
