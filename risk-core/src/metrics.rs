//! Classification metrics for the validation report and threshold sweep.

/// 2x2 confusion matrix for the fatal (positive) class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionMatrix {
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
}

impl ConfusionMatrix {
    /// Count outcomes of `probability >= threshold` against the labels.
    /// The boundary is inclusive: a probability equal to the threshold is
    /// classified positive.
    pub fn from_probabilities(probabilities: &[f64], labels: &[bool], threshold: f64) -> Self {
        let mut matrix = Self::default();
        for (&p, &actual) in probabilities.iter().zip(labels) {
            let predicted = p >= threshold;
            match (predicted, actual) {
                (true, true) => matrix.true_positives += 1,
                (true, false) => matrix.false_positives += 1,
                (false, false) => matrix.true_negatives += 1,
                (false, true) => matrix.false_negatives += 1,
            }
        }
        matrix
    }

    /// Precision of the positive class; 0 when nothing was predicted positive.
    pub fn precision(&self) -> f64 {
        let predicted = self.true_positives + self.false_positives;
        if predicted == 0 {
            0.0
        } else {
            self.true_positives as f64 / predicted as f64
        }
    }

    /// Recall of the positive class; 0 when there are no positives.
    pub fn recall(&self) -> f64 {
        let actual = self.true_positives + self.false_negatives;
        if actual == 0 {
            0.0
        } else {
            self.true_positives as f64 / actual as f64
        }
    }

    /// Harmonic mean of precision and recall.
    pub fn f1(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }
}

/// Area under the ROC curve via the rank statistic (Mann-Whitney U),
/// with average ranks for tied probabilities. 0.5 when a class is empty.
pub fn roc_auc(probabilities: &[f64], labels: &[bool]) -> f64 {
    let positives = labels.iter().filter(|&&l| l).count();
    let negatives = labels.len() - positives;
    if positives == 0 || negatives == 0 {
        return 0.5;
    }

    let mut order: Vec<usize> = (0..probabilities.len()).collect();
    order.sort_by(|&a, &b| probabilities[a].partial_cmp(&probabilities[b]).unwrap());

    let mut ranks = vec![0.0; probabilities.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && probabilities[order[j + 1]] == probabilities[order[i]] {
            j += 1;
        }
        // 1-based ranks, averaged across the tie group.
        let rank = (i + 1 + j + 1) as f64 / 2.0;
        for &idx in &order[i..=j] {
            ranks[idx] = rank;
        }
        i = j + 1;
    }

    let positive_rank_sum: f64 = ranks
        .iter()
        .zip(labels)
        .filter(|(_, &l)| l)
        .map(|(&r, _)| r)
        .sum();

    let n_pos = positives as f64;
    let n_neg = negatives as f64;
    (positive_rank_sum - n_pos * (n_pos + 1.0) / 2.0) / (n_pos * n_neg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confusion_counts() {
        let probabilities = [0.9, 0.8, 0.2, 0.6];
        let labels = [true, false, true, false];
        let m = ConfusionMatrix::from_probabilities(&probabilities, &labels, 0.5);
        assert_eq!(m.true_positives, 1);
        assert_eq!(m.false_positives, 2);
        assert_eq!(m.false_negatives, 1);
        assert_eq!(m.true_negatives, 0);
    }

    #[test]
    fn test_threshold_boundary_is_inclusive() {
        let m = ConfusionMatrix::from_probabilities(&[0.26], &[true], 0.26);
        assert_eq!(m.true_positives, 1);
        assert_eq!(m.false_negatives, 0);
    }

    #[test]
    fn test_precision_recall_f1() {
        let m = ConfusionMatrix {
            true_positives: 6,
            false_positives: 2,
            true_negatives: 10,
            false_negatives: 4,
        };
        assert_eq!(m.precision(), 0.75);
        assert_eq!(m.recall(), 0.6);
        let f1 = m.f1();
        assert!((f1 - 2.0 * 0.75 * 0.6 / 1.35).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_metrics_are_zero() {
        let m = ConfusionMatrix::from_probabilities(&[0.1, 0.2], &[false, false], 0.5);
        assert_eq!(m.precision(), 0.0);
        assert_eq!(m.recall(), 0.0);
        assert_eq!(m.f1(), 0.0);
    }

    #[test]
    fn test_auc_perfect_separation() {
        let probabilities = [0.1, 0.2, 0.8, 0.9];
        let labels = [false, false, true, true];
        assert_eq!(roc_auc(&probabilities, &labels), 1.0);
    }

    #[test]
    fn test_auc_with_ties() {
        // One positive and one negative share the same probability: the
        // tied pair counts as half, AUC = (1 + 0.5) / 2 = 0.75.
        let probabilities = [0.3, 0.5, 0.5];
        let labels = [false, false, true];
        assert_eq!(roc_auc(&probabilities, &labels), 0.75);
    }

    #[test]
    fn test_auc_single_class_is_half() {
        assert_eq!(roc_auc(&[0.4, 0.6], &[true, true]), 0.5);
    }
}
