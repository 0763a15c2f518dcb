/// Number of classes reported per image.
pub const TOP_K: usize = 3;

/// The `k` highest scores as `(class_id, score)`, best first.
///
/// The sort is stable over class order, so equal scores keep ascending
/// class ids. NaN scores rank below everything else.
pub fn top_k(scores: &[f32], k: usize) -> Vec<(usize, f32)> {
    let mut ranked: Vec<(usize, f32)> = scores.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| rank_key(b.1).total_cmp(&rank_key(a.1)));
    ranked.truncate(k);
    ranked
}

fn rank_key(score: f32) -> f32 {
    if score.is_nan() {
        f32::NEG_INFINITY
    } else if score == 0.0 {
        // fold -0.0 into 0.0 so both tie
        0.0
    } else {
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_three_best_in_descending_order() {
        let scores = [0.05, 0.02, 0.01, 0.3, 0.02, 0.1, 0.4, 0.05, 0.03, 0.02];
        assert_eq!(top_k(&scores, 3), vec![(6, 0.4), (3, 0.3), (5, 0.1)]);
    }

    #[test]
    fn ties_keep_ascending_class_id() {
        let scores = [0.1, 0.2, 0.2, 0.05, 0.2];
        assert_eq!(top_k(&scores, 3), vec![(1, 0.2), (2, 0.2), (4, 0.2)]);

        let flat = [0.1f32; 10];
        let ids: Vec<usize> = top_k(&flat, 3).into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn repeated_calls_agree() {
        let scores = [0.3, 0.1, 0.3, 0.2, 0.1, 0.0, 0.0, 0.0, 0.0, 0.0];
        let first = top_k(&scores, 3);
        for _ in 0..5 {
            assert_eq!(top_k(&scores, 3), first);
        }
    }

    #[test]
    fn short_vectors_return_what_they_have() {
        assert_eq!(top_k(&[0.7, 0.3], 3), vec![(0, 0.7), (1, 0.3)]);
        assert!(top_k(&[], 3).is_empty());
    }

    #[test]
    fn nan_never_outranks_a_real_score() {
        let scores = [f32::NAN, 0.1, 0.6];
        let ids: Vec<usize> = top_k(&scores, 3).into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![2, 1, 0]);
    }
}
