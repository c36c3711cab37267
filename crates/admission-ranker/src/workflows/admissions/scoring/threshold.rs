use super::config::DecileRounding;
use super::GroupThreshold;

/// Admission cutoff from the mean of the group's top decile.
pub(crate) fn decile_threshold(
    basis_scores: &[f64],
    decile_weight: f64,
    rounding: DecileRounding,
) -> GroupThreshold {
    let group_size = basis_scores.len();
    if group_size == 0 {
        return GroupThreshold {
            group_size,
            top_count: 0,
            top_decile_mean: 0.0,
            decile_weight,
            admission_threshold: 0.0,
        };
    }

    let mut sorted = basis_scores.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));

    let top_count = rounding.top_count(group_size).min(group_size);
    let top_decile_mean = sorted[..top_count].iter().sum::<f64>() / top_count as f64;

    GroupThreshold {
        group_size,
        top_count,
        top_decile_mean,
        decile_weight,
        admission_threshold: top_decile_mean * decile_weight,
    }
}
