// ============================================================
// Layer 5 — Masked NLL Loss
// ============================================================
// Loss for one decoder time step of a padded target batch.
//
//   probs  [batch, vocab]   decoder softmax output
//   target [batch]          row t of PairBatch::target
//   mask   [batch]          row t of PairBatch::mask
//
//   loss    = mean over masked rows of -ln(probs[i, target[i]])
//   n_total = number of masked rows
//
// Padding positions contribute nothing. A step with no real
// tokens has a loss of 0.

use burn::prelude::*;

/// Masked negative log-likelihood for one decoding step.
/// Returns the scalar loss (shape `[1]`) and the number of real tokens.
pub fn mask_nll_loss<B: Backend>(
    probs:  Tensor<B, 2>,
    target: Tensor<B, 1, Int>,
    mask:   Tensor<B, 1, Bool>,
) -> (Tensor<B, 1>, usize) {
    let [batch, _] = probs.dims();

    let n_total = mask.clone().int().sum().into_scalar().elem::<i64>() as usize;

    let picked = probs
        .gather(1, target.reshape([batch, 1]))
        .reshape([batch]);
    let cross_entropy = picked.log().neg();

    let loss = cross_entropy
        .mask_fill(mask.bool_not(), 0.0)
        .sum()
        .div_scalar(n_total.max(1) as f32);

    (loss, n_total)
}
