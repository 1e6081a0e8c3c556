use rand::Rng;
use rand::seq::index;
use std::cmp::Ordering;
use tracing::instrument;

/// Narrows the candidate moves offered to the search at each expansion.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CandidateFilter {
    #[default]
    All,
    /// Keep the `limit` best-scoring candidates.
    Top { limit: usize },
    /// Keep `limit` candidates drawn uniformly at random.
    Sample { limit: usize },
    /// Split candidates into score quartiles and draw `limit / 4` (at least one)
    /// at random from each.
    Stratified { limit: usize },
}

const STRATA: usize = 4;

impl CandidateFilter {
    /// Returns the indices of the retained candidates in ascending order, so the
    /// surviving candidates keep their original relative order.
    #[instrument(level = "trace", skip_all, fields(filter = ?self, candidates = scores.len()))]
    pub fn select(&self, scores: &[f64], rng: &mut impl Rng) -> Vec<usize> {
        let mut kept = match *self {
            CandidateFilter::All => return (0..scores.len()).collect(),
            CandidateFilter::Top { limit } => {
                let mut order: Vec<usize> = (0..scores.len()).collect();
                order.sort_by(|&a, &b| {
                    scores[b]
                        .partial_cmp(&scores[a])
                        .unwrap_or(Ordering::Equal)
                });
                order.truncate(limit);
                order
            }
            CandidateFilter::Sample { limit } => {
                let amount = limit.min(scores.len());
                index::sample(rng, scores.len(), amount).into_vec()
            }
            CandidateFilter::Stratified { limit } => stratified(scores, limit, rng),
        };
        kept.sort_unstable();
        kept
    }
}

/// Quartiles are taken over score ranks, lowest first; tied scores keep their
/// original order.
fn stratified(scores: &[f64], limit: usize, rng: &mut impl Rng) -> Vec<usize> {
    let per_stratum = (limit / STRATA).max(1);
    let mut ranked: Vec<usize> = (0..scores.len()).collect();
    ranked.sort_by(|&a, &b| {
        scores[a]
            .partial_cmp(&scores[b])
            .unwrap_or(Ordering::Equal)
    });

    let mut kept = Vec::with_capacity(per_stratum * STRATA);
    for stratum in 0..STRATA {
        let start = stratum * ranked.len() / STRATA;
        let end = (stratum + 1) * ranked.len() / STRATA;
        let members = &ranked[start..end];
        if members.is_empty() {
            continue;
        }
        let amount = per_stratum.min(members.len());
        kept.extend(
            index::sample(rng, members.len(), amount)
                .into_iter()
                .map(|i| members[i]),
        );
    }
    kept
}
