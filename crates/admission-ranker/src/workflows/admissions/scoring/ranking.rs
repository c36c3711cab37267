/// Competition ranks aligned with the input order.
///
/// Scores are visited in descending order (stable, so exact ties keep their
/// input order). Tied scores share the rank of the first member of the run and
/// the next distinct score jumps past every tied member: `90, 90, 80` ranks as
/// `1, 1, 3`.
pub fn competition_ranks(scores: &[f64]) -> Vec<u32> {
    let order = merit_order(scores);
    let mut ranks = vec![0u32; scores.len()];

    let mut current_rank = 1u32;
    let mut repetition_count = 0u32;

    for (position, &index) in order.iter().enumerate() {
        if position > 0 {
            let previous = order[position - 1];
            if scores[index] == scores[previous] {
                repetition_count += 1;
            } else {
                current_rank += repetition_count + 1;
                repetition_count = 0;
            }
        }
        ranks[index] = current_rank;
    }

    ranks
}

/// Indices of `scores` sorted best first; ties keep their input order.
pub(crate) fn merit_order(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_share_rank_and_next_value_skips() {
        assert_eq!(competition_ranks(&[70.0, 70.0, 65.0]), vec![1, 1, 3]);
    }

    #[test]
    fn ranks_follow_input_positions() {
        assert_eq!(
            competition_ranks(&[10.0, 30.0, 20.0, 30.0, 5.0]),
            vec![4, 1, 3, 1, 5]
        );
    }

    #[test]
    fn several_tie_blocks_accumulate() {
        let ranks = competition_ranks(&[9.0, 9.0, 9.0, 7.0, 7.0, 4.0]);
        assert_eq!(ranks, vec![1, 1, 1, 4, 4, 6]);
    }

    #[test]
    fn empty_and_single_inputs() {
        assert!(competition_ranks(&[]).is_empty());
        assert_eq!(competition_ranks(&[42.0]), vec![1]);
    }

    #[test]
    fn merit_order_is_stable_for_ties() {
        assert_eq!(merit_order(&[5.0, 8.0, 5.0, 8.0]), vec![1, 3, 0, 2]);
    }
}
