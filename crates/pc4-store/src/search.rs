//! Term search.
//!
//! Description terms are split into lower-cased alphanumeric tokens and
//! indexed by token. A query matches a description when every query token
//! matches one of the description's tokens, exactly, as a prefix, or within
//! the requested edit distance.
//!
//! Token scores:
//!
//! | match | score |
//! |-------|-------|
//! | exact | 1.0 |
//! | prefix | 0.75 |
//! | edit distance `d` | 0.5 / d |
//!
//! A description scores the mean of its query token scores, scaled by how
//! much of the description the query covers. Each concept is reported once,
//! through its best-scoring description.

use std::collections::{BTreeMap, HashMap, HashSet};

use pc4_types::{Description, SctId, SearchParameters, SearchResult};
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::store::SnomedStore;
use crate::types::StoreResult;

/// Hit count used when a query does not set one.
pub const DEFAULT_MAX_HITS: usize = 200;

const EXACT_SCORE: f64 = 1.0;
const PREFIX_SCORE: f64 = 0.75;
const FUZZY_SCORE: f64 = 0.5;

#[derive(Debug, Clone)]
struct IndexEntry {
    description_id: SctId,
    concept_id: SctId,
    term: String,
    token_count: usize,
}

/// Inverted token index over description terms.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    entries: Vec<IndexEntry>,
    postings: BTreeMap<String, Vec<u32>>,
}

impl SearchIndex {
    /// Indexes the active, non-definition descriptions.
    pub fn build<'a>(descriptions: impl IntoIterator<Item = &'a Description>) -> Self {
        let mut index = Self::default();

        for desc in descriptions {
            if !desc.active || desc.is_definition() {
                continue;
            }

            let tokens = tokenize(&desc.term);
            if tokens.is_empty() {
                continue;
            }

            let Ok(slot) = u32::try_from(index.entries.len()) else {
                break;
            };
            index.entries.push(IndexEntry {
                description_id: desc.id,
                concept_id: desc.concept_id,
                term: desc.term.clone(),
                token_count: tokens.len(),
            });

            let distinct: HashSet<String> = tokens.into_iter().collect();
            for token in distinct {
                index.postings.entry(token).or_default().push(slot);
            }
        }

        index
    }

    /// Returns the number of indexed descriptions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index tokens matching one query token, with their scores.
    fn token_matches(&self, query: &str, fuzzy: u32) -> Vec<(&str, f64)> {
        let mut matches: HashMap<&str, f64> = self
            .postings
            .range::<str, _>((std::ops::Bound::Included(query), std::ops::Bound::Unbounded))
            .map(|(token, _)| token.as_str())
            .take_while(|token| token.starts_with(query))
            .map(|token| {
                let score = if token == query { EXACT_SCORE } else { PREFIX_SCORE };
                (token, score)
            })
            .collect();

        if fuzzy > 0 {
            for (token, distance) in self.fuzzy_tokens(query, fuzzy) {
                let score = FUZZY_SCORE / f64::from(distance);
                let best = matches.entry(token).or_insert(score);
                if score > *best {
                    *best = score;
                }
            }
        }

        matches.into_iter().collect()
    }

    #[cfg(feature = "parallel")]
    fn fuzzy_tokens(&self, query: &str, budget: u32) -> Vec<(&str, u32)> {
        self.postings
            .par_iter()
            .filter_map(|(token, _)| {
                bounded_levenshtein(query, token, budget)
                    .filter(|&d| d > 0)
                    .map(|d| (token.as_str(), d))
            })
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn fuzzy_tokens(&self, query: &str, budget: u32) -> Vec<(&str, u32)> {
        self.postings
            .keys()
            .filter_map(|token| {
                bounded_levenshtein(query, token, budget)
                    .filter(|&d| d > 0)
                    .map(|d| (token.as_str(), d))
            })
            .collect()
    }

    /// Scores every description matching all query tokens.
    fn score(&self, query_tokens: &[String], fuzzy: u32) -> HashMap<u32, f64> {
        let mut totals: Option<HashMap<u32, f64>> = None;

        for query in query_tokens {
            let mut best: HashMap<u32, f64> = HashMap::new();
            for (token, score) in self.token_matches(query, fuzzy) {
                for &slot in self.postings.get(token).into_iter().flatten() {
                    let current = best.entry(slot).or_insert(score);
                    if score > *current {
                        *current = score;
                    }
                }
            }

            totals = Some(match totals {
                None => best,
                Some(previous) => previous
                    .into_iter()
                    .filter_map(|(slot, sum)| best.get(&slot).map(|s| (slot, sum + s)))
                    .collect(),
            });

            if totals.as_ref().is_some_and(HashMap::is_empty) {
                break;
            }
        }

        let query_len = query_tokens.len() as f64;
        totals
            .unwrap_or_default()
            .into_iter()
            .map(|(slot, sum)| {
                let entry = &self.entries[slot as usize];
                let coverage = (query_len / entry.token_count as f64).min(1.0);
                let score = (sum / query_len) * (0.5 + 0.5 * coverage);
                (slot, score.min(1.0))
            })
            .collect()
    }
}

impl SnomedStore {
    /// Runs one search pass.
    ///
    /// Uses the fuzziness in `params` as given; retrying with the fallback
    /// fuzziness is left to the caller. Results are ranked and truncated to
    /// `max_hits` (default [`DEFAULT_MAX_HITS`]).
    ///
    /// # Errors
    /// Fails if the constraint cannot be parsed or evaluated.
    pub fn search(&self, params: &SearchParameters) -> StoreResult<Vec<SearchResult>> {
        let eligible = params
            .constraint()
            .map(|ecl| self.constraint_members(ecl))
            .transpose()?;

        let show_fsn = params.show_fsn().unwrap_or(false);
        let query_tokens = params.text().map(tokenize).filter(|t| !t.is_empty());
        let mut results = match query_tokens {
            Some(query_tokens) => {
                let fuzzy = params.fuzzy().unwrap_or(0);
                self.search_text(&query_tokens, fuzzy, eligible.as_ref(), show_fsn)
            }
            None => match eligible {
                Some(ref members) => self.list_members(members, show_fsn),
                None => Vec::new(),
            },
        };

        results.sort_by(SearchResult::cmp_relevance);
        results.truncate(params.max_hits().unwrap_or(DEFAULT_MAX_HITS));

        debug!(
            text = params.text().unwrap_or(""),
            fuzzy = params.fuzzy().unwrap_or(0),
            constraint = params.constraint().unwrap_or(""),
            hits = results.len(),
            "search pass"
        );

        Ok(results)
    }

    fn search_text(
        &self,
        query_tokens: &[String],
        fuzzy: u32,
        eligible: Option<&HashSet<SctId>>,
        show_fsn: bool,
    ) -> Vec<SearchResult> {
        let index = self.search_index();
        let mut best_per_concept: HashMap<SctId, (f64, &IndexEntry)> = HashMap::new();

        for (slot, score) in index.score(query_tokens, fuzzy) {
            let entry = &index.entries[slot as usize];
            if eligible.is_some_and(|members| !members.contains(&entry.concept_id)) {
                continue;
            }
            if !self.has_concept(entry.concept_id) {
                continue;
            }

            best_per_concept
                .entry(entry.concept_id)
                .and_modify(|best| {
                    let better = score > best.0
                        || (score == best.0 && entry.description_id < best.1.description_id);
                    if better {
                        *best = (score, entry);
                    }
                })
                .or_insert((score, entry));
        }

        best_per_concept
            .into_values()
            .map(|(score, entry)| SearchResult {
                description_id: entry.description_id,
                concept_id: entry.concept_id,
                term: entry.term.clone(),
                preferred_term: self.display_term(entry.concept_id, &entry.term, show_fsn),
                score,
            })
            .collect()
    }

    fn list_members(&self, members: &HashSet<SctId>, show_fsn: bool) -> Vec<SearchResult> {
        members
            .iter()
            .copied()
            .filter(|&id| self.has_concept(id))
            .map(|id| {
                let (description_id, term) = match self.preferred_synonym(id, self.language_tag()) {
                    Some(desc) => (desc.id, desc.term.clone()),
                    None => match self.get_fsn(id) {
                        Some(fsn) => (fsn.id, fsn.term.clone()),
                        None => (0, id.to_string()),
                    },
                };
                let preferred_term = self.display_term(id, &term, show_fsn);
                SearchResult {
                    description_id,
                    concept_id: id,
                    term,
                    preferred_term,
                    score: EXACT_SCORE,
                }
            })
            .collect()
    }

    /// The display term for a hit, or `None` when it equals the matched term.
    fn display_term(&self, concept_id: SctId, matched: &str, show_fsn: bool) -> Option<String> {
        let display = if show_fsn {
            self.get_fsn(concept_id).map(|d| d.term.as_str())
        } else {
            self.preferred_synonym(concept_id, self.language_tag())
                .map(|d| d.term.as_str())
        };
        display.filter(|t| *t != matched).map(str::to_string)
    }
}

/// Splits text into lower-cased alphanumeric tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Levenshtein distance between `a` and `b` if it is at most `max`.
fn bounded_levenshtein(a: &str, b: &str, max: u32) -> Option<u32> {
    if a.chars().count().abs_diff(b.chars().count()) > max as usize {
        return None;
    }
    u32::try_from(strsim::levenshtein(a, b))
        .ok()
        .filter(|&distance| distance <= max)
}
