// ============================================================
// Layer 4 — Pair Filters
// ============================================================
// Two filters shrink the pair list before batching:
//
//   filter_pairs      — drop pairs where either side has
//                       max_length words or more (one slot
//                       is reserved for the EOS token)
//
//   trim_rare_words   — trim the vocabulary, then drop pairs
//                       that use any word the trim removed
//
//   filter_known_pairs — drop pairs using a word the vocabulary
//                        does not hold (no trim)
//
// Both keep the surviving pairs in their original order.

use crate::domain::sentence_pair::SentencePair;
use crate::domain::vocabulary::Vocabulary;

/// True iff both sentences are shorter than `max_length` words.
pub fn filter_pair(pair: &SentencePair, max_length: usize) -> bool {
    pair.input_len() < max_length && pair.output_len() < max_length
}

/// Keep the pairs that pass `filter_pair`.
pub fn filter_pairs(pairs: Vec<SentencePair>, max_length: usize) -> Vec<SentencePair> {
    pairs
        .into_iter()
        .filter(|pair| filter_pair(pair, max_length))
        .collect()
}

/// Trim words seen fewer than `min_count` times from the vocabulary and
/// drop pairs whose input or output uses one of them.
pub fn trim_rare_words(
    vocab:     &mut Vocabulary,
    pairs:     Vec<SentencePair>,
    min_count: usize,
) -> Vec<SentencePair> {
    vocab.trim(min_count);

    let total      = pairs.len();
    let keep_pairs = filter_known_pairs(vocab, pairs);

    let ratio = if total == 0 { 0.0 } else { keep_pairs.len() as f64 / total as f64 };
    tracing::info!(
        "Trimmed from {} pairs to {}, {:.4} of total",
        total,
        keep_pairs.len(),
        ratio
    );

    keep_pairs
}

/// Keep the pairs whose input and output words are all in `vocab`.
pub fn filter_known_pairs(vocab: &Vocabulary, pairs: Vec<SentencePair>) -> Vec<SentencePair> {
    pairs
        .into_iter()
        .filter(|pair| all_known(vocab, &pair.input) && all_known(vocab, &pair.output))
        .collect()
}

fn all_known(vocab: &Vocabulary, sentence: &str) -> bool {
    sentence.split(' ').all(|word| vocab.contains(word))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn pair(input: &str, output: &str) -> SentencePair {
        SentencePair::new(input, output, vec![])
    }

    #[test]
    fn test_filter_pair_bounds() {
        // 3 words < 4 passes, 4 words does not
        assert!(filter_pair(&pair("a b c", "d"), 4));
        assert!(!filter_pair(&pair("a b c d", "e"), 4));
        assert!(!filter_pair(&pair("a", "b c d e"), 4));
    }

    #[test]
    fn test_filter_pairs_keeps_order() {
        let pairs = vec![pair("a", "b"), pair("a b c d e", "f"), pair("c", "d e")];
        let kept = filter_pairs(pairs, 3);
        assert_eq!(kept, vec![pair("a", "b"), pair("c", "d e")]);
    }

    #[test]
    fn test_trim_rare_words_drops_pairs() {
        let mut voc = Vocabulary::new("t");
        for s in ["hi there", "hi you", "hi there", "rare word"] {
            voc.add_sentence(s);
        }
        let pairs = vec![
            pair("hi there", "hi"),
            pair("hi", "rare"),
            pair("word hi", "there"),
            pair("there", "there hi"),
        ];

        let kept = trim_rare_words(&mut voc, pairs, 2);
        assert!(voc.is_trimmed());
        assert_eq!(kept, vec![pair("hi there", "hi"), pair("there", "there hi")]);
    }

    #[test]
    fn test_filter_known_pairs() {
        let mut voc = Vocabulary::new("t");
        voc.add_sentence("hi there");
        let pairs = vec![pair("hi", "there"), pair("hi you", "there"), pair("there", "you")];
        assert_eq!(filter_known_pairs(&voc, pairs), vec![pair("hi", "there")]);
    }

    #[test]
    fn test_trim_rare_words_empty() {
        let mut voc = Vocabulary::new("t");
        assert!(trim_rare_words(&mut voc, Vec::new(), 3).is_empty());
    }

    #[test]
    fn test_second_trim_uses_first_threshold() {
        let mut voc = Vocabulary::new("t");
        voc.add_sentence("a a b");
        let kept = trim_rare_words(&mut voc, vec![pair("a", "a")], 2);
        assert_eq!(kept.len(), 1);
        // trim is a no-op now, "b" stays out even with a lower threshold
        let kept = trim_rare_words(&mut voc, vec![pair("b", "a")], 1);
        assert!(kept.is_empty());
    }
}
