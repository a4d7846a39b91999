// ============================================================
// Layer 5 — Ranking Metrics
// ============================================================
// Host-side metric functions over score matrices.
//
// A score matrix arrives flattened row-major: row i holds the
// miner's score for every entity, `num_entities` values wide.
//
//   in_top_k        — single true tail per row       → Hit@k
//   in_top_k_multi  — set of true tails per row      → Hit@k
//   get_recall      — fraction of a row's tails found in the
//                     top |tails| ranked entities
//   get_prediction  — names of the ranked entities down to and
//                     including the true tail
//
// Ranking ties: an entity is "in the top k" when fewer than k
// entities score strictly higher than it.

/// Number of entities scoring strictly higher than `target`
fn rank_of(row: &[f32], target: usize) -> usize {
    let score = row[target];
    row.iter().filter(|&&s| s > score).count()
}

/// Entity ids of `row` ordered by descending score.
/// Equal scores keep ascending id order.
pub fn ranked(row: &[f32]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..row.len()).collect();
    order.sort_by(|&a, &b| row[b].total_cmp(&row[a]));
    order
}

/// Hit@k for rows with exactly one true tail.
pub fn in_top_k(targets: &[usize], scores: &[f32], num_entities: usize, k: usize) -> Vec<bool> {
    scores
        .chunks(num_entities)
        .zip(targets)
        .map(|(row, &t)| t < row.len() && rank_of(row, t) < k)
        .collect()
}

/// Hit@k for multi-label rows: a row hits when any of its tails
/// is ranked within the top k. Rows without tails never hit.
pub fn in_top_k_multi(
    targets:      &[Vec<usize>],
    scores:       &[f32],
    num_entities: usize,
    k:            usize,
) -> Vec<bool> {
    scores
        .chunks(num_entities)
        .zip(targets)
        .map(|(row, tails)| {
            tails.iter().any(|&t| t < row.len() && rank_of(row, t) < k)
        })
        .collect()
}

/// Per-row recall: with n true tails, the fraction of them found
/// among the n highest scored entities. Rows without tails score 0.
pub fn get_recall(targets: &[Vec<usize>], scores: &[f32], num_entities: usize) -> Vec<f32> {
    scores
        .chunks(num_entities)
        .zip(targets)
        .map(|(row, tails)| {
            if tails.is_empty() {
                return 0.0;
            }
            let top = ranked(row);
            let found = top
                .iter()
                .take(tails.len())
                .filter(|id| tails.contains(id))
                .count();
            found as f32 / tails.len() as f32
        })
        .collect()
}

/// Names of one row's entities in ranked order, ending with
/// `target`. The whole ranking is returned if `target` is not in it.
pub fn get_prediction<'a, F>(target: usize, row: &[f32], id2ent: F) -> Vec<String>
where
    F: Fn(usize) -> &'a str,
{
    let mut names = Vec::new();
    for id in ranked(row) {
        names.push(id2ent(id).to_string());
        if id == target {
            break;
        }
    }
    names
}

/// Mean of a slice of booleans as a hit rate. Empty → 0.0
pub fn hit_rate(hits: &[bool]) -> f64 {
    if hits.is_empty() {
        return 0.0;
    }
    hits.iter().filter(|&&h| h).count() as f64 / hits.len() as f64
}

/// Mean of a slice of values. Empty → 0.0
pub fn mean(values: &[f32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    // 4 examples over 4 entities, k = 2:
    //   row 0: tail 0 ranked 1st     → hit
    //   row 1: tail 2 ranked 2nd     → hit
    //   row 2: tail 3 ranked 4th     → miss
    //   row 3: tail 1 ranked 1st     → hit
    const SCORES: [f32; 16] = [
        0.9, 0.1, 0.3, 0.2,
        0.5, 0.8, 0.6, 0.1,
        0.7, 0.6, 0.5, 0.1,
        0.2, 0.9, 0.4, 0.3,
    ];

    #[test]
    fn test_in_top_k_fixture() {
        let hits = in_top_k(&[0, 2, 3, 1], &SCORES, 4, 2);
        assert_eq!(hits, vec![true, true, false, true]);
        assert!((hit_rate(&hits) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_ties_count_as_hits() {
        let scores = [0.5, 0.5, 0.5];
        assert_eq!(in_top_k(&[2], &scores, 3, 1), vec![true]);
    }

    #[test]
    fn test_in_top_k_multi_any_tail() {
        let targets = vec![vec![3, 0], vec![3], vec![], vec![0, 2]];
        let hits = in_top_k_multi(&targets, &SCORES, 4, 2);
        assert_eq!(hits, vec![true, false, false, true]);
    }

    #[test]
    fn test_recall() {
        // row 0 top-2 = {0, 2}: tails {0, 3} → 1/2
        // row 1 top-1 = {1}:    tails {1}    → 1
        let targets = vec![vec![0, 3], vec![1]];
        let recall = get_recall(&targets, &SCORES[..8], 4);
        assert_eq!(recall, vec![0.5, 1.0]);
        assert_eq!(get_recall(&[vec![]], &SCORES[..4], 4), vec![0.0]);
    }

    #[test]
    fn test_prediction_ends_at_true_tail() {
        let names = ["a", "b", "c", "d"];
        let pred = get_prediction(2, &SCORES[4..8], |id| names[id]);
        assert_eq!(pred, vec!["b", "c"]);

        // top-ranked tail → a single name
        assert_eq!(get_prediction(1, &SCORES[4..8], |id| names[id]), vec!["b"]);
    }

    #[test]
    fn test_prediction_reaches_low_ranked_tail() {
        let names = ["a", "b", "c", "d"];
        // row 2 ranks d last
        let pred = get_prediction(3, &SCORES[8..12], |id| names[id]);
        assert_eq!(pred, vec!["a", "b", "c", "d"]);
        assert_eq!(pred.last().map(String::as_str), Some("d"));
    }

    #[test]
    fn test_prediction_unknown_tail_gives_full_ranking() {
        let names = ["a", "b", "c", "d"];
        assert_eq!(get_prediction(9, &SCORES[..4], |id| names[id]).len(), 4);
    }

    #[test]
    fn test_empty_means() {
        assert_eq!(hit_rate(&[]), 0.0);
        assert_eq!(mean(&[]), 0.0);
        assert!((mean(&[0.5, 1.0]) - 0.75).abs() < 1e-12);
    }
}
