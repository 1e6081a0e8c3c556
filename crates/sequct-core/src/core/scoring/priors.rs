use tracing::instrument;

/// Softmax of `scores / temperature`, shifted by the maximum score so large
/// fitness values cannot overflow.
///
/// Returns an empty vector for empty input. `temperature` must be positive;
/// callers validate it once up front.
#[instrument(level = "trace", skip_all, fields(temperature, candidates = scores.len()))]
pub fn softmax_priors(scores: &[f64], temperature: f64) -> Vec<f64> {
    let Some(max_score) = scores
        .iter()
        .copied()
        .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    else {
        return Vec::new();
    };

    let weights: Vec<f64> = scores
        .iter()
        .map(|&s| ((s - max_score) / temperature).exp())
        .collect();
    let total: f64 = weights.iter().sum();

    if !total.is_finite() || total <= f64::EPSILON {
        tracing::warn!(
            "Prior weights collapsed (total {}), falling back to uniform priors.",
            total
        );
        let uniform = 1.0 / scores.len() as f64;
        return vec![uniform; scores.len()];
    }

    weights.into_iter().map(|w| w / total).collect()
}
