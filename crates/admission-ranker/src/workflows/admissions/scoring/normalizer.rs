use super::config::ScoringConfig;
use super::NormalizedScores;

pub(crate) fn normalize_scores(
    aptitude_raw: f64,
    knowledge_raw: f64,
    config: &ScoringConfig,
) -> NormalizedScores {
    let aptitude_normalized = aptitude_raw * (100.0 / config.aptitude_max);
    let knowledge_normalized = knowledge_raw * (100.0 / config.knowledge_max);
    let composite_100 =
        aptitude_normalized * config.aptitude_weight + knowledge_normalized * config.knowledge_weight;
    let composite_80 = composite_100 * config.exam_scale;

    NormalizedScores {
        aptitude_normalized,
        knowledge_normalized,
        composite_100,
        composite_80,
    }
}
