// ============================================================
// Layer 4 — Random Batch Sampler
// ============================================================
// Draws training batches the way an iteration-based seq2seq
// loop does: each batch holds `batch_size` pairs chosen
// uniformly WITH replacement, so a pair can appear twice in
// the same batch and short datasets still fill large batches.
//
// A fixed seed gives the same batches on every run.
//
// Reference: rand crate documentation (SliceRandom::choose)

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::domain::sentence_pair::SentencePair;

/// `n_batches` batches of `batch_size` randomly chosen pairs.
/// Returns no batches when `pairs` is empty.
pub fn sample_batches(
    pairs:      &[SentencePair],
    batch_size: usize,
    n_batches:  usize,
    seed:       u64,
) -> Vec<Vec<SentencePair>> {
    if pairs.is_empty() || batch_size == 0 {
        return Vec::new();
    }

    let mut rng = StdRng::seed_from_u64(seed);
    (0..n_batches)
        .map(|_| {
            (0..batch_size)
                .filter_map(|_| pairs.choose(&mut rng).cloned())
                .collect()
        })
        .collect()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(n: usize) -> Vec<SentencePair> {
        (0..n)
            .map(|i| SentencePair::new(format!("in {i}"), format!("out {i}"), vec![i as u32]))
            .collect()
    }

    #[test]
    fn test_batch_shape() {
        let batches = sample_batches(&pairs(3), 5, 4, 7);
        assert_eq!(batches.len(), 4);
        assert!(batches.iter().all(|b| b.len() == 5));
    }

    #[test]
    fn test_same_seed_same_batches() {
        let data = pairs(20);
        assert_eq!(sample_batches(&data, 4, 3, 42), sample_batches(&data, 4, 3, 42));
    }

    #[test]
    fn test_samples_come_from_input() {
        let data = pairs(6);
        for pair in sample_batches(&data, 8, 2, 1).iter().flatten() {
            assert!(data.contains(pair));
        }
    }

    #[test]
    fn test_empty_pairs() {
        assert!(sample_batches(&[], 4, 3, 0).is_empty());
    }
}
