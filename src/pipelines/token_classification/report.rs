use std::fmt::{self, Display};

/// Precision, recall and F1 for one class or one average
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scores {
    /// Share of predictions of the class that were right
    pub precision: f64,

    /// Share of tokens of the class that were found
    pub recall: f64,

    /// Harmonic mean of precision and recall
    pub f1: f64,

    /// Number of held-out tokens carrying the class
    pub support: usize,
}

/// Per-class and averaged metrics over a held-out partition
#[derive(Clone, Debug, PartialEq)]
pub struct ClassificationReport {
    /// Scores per class label, in class id order
    pub classes: Vec<(String, Scores)>,

    /// Share of correct predictions
    pub accuracy: f64,

    /// Unweighted mean over classes
    pub macro_avg: Scores,

    /// Support-weighted mean over classes
    pub weighted_avg: Scores,
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Weighted mean of every per-class score
fn average(classes: &[(String, Scores)], weights: &[f64], support: usize) -> Scores {
    let norm: f64 = weights.iter().sum();

    let mean = |metric: fn(&Scores) -> f64| {
        if norm == 0.0 {
            return 0.0;
        }

        classes
            .iter()
            .zip(weights)
            .map(|((_, scores), weight)| metric(scores) * weight)
            .sum::<f64>()
            / norm
    };

    Scores {
        precision: mean(|s| s.precision),
        recall: mean(|s| s.recall),
        f1: mean(|s| s.f1),
        support,
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, width: usize, name: &str, s: &Scores) -> fmt::Result {
    writeln!(
        f,
        "{name:>width$} {:>9.2} {:>9.2} {:>9.2} {:>9}",
        s.precision, s.recall, s.f1, s.support
    )
}

impl ClassificationReport {
    /// Compare predicted class ids against the truth; undefined ratios count as zero
    pub fn new(labels: &[String], truth: &[usize], predicted: &[usize]) -> Self {
        let n_classes = labels.len();

        let mut true_positives = vec![0; n_classes];
        let mut predicted_counts = vec![0; n_classes];
        let mut support = vec![0; n_classes];

        for (&t, &p) in truth.iter().zip(predicted) {
            if t < n_classes {
                support[t] += 1;
            }
            if p < n_classes {
                predicted_counts[p] += 1;
            }
            if t == p && t < n_classes {
                true_positives[t] += 1;
            }
        }

        let classes: Vec<(String, Scores)> = labels
            .iter()
            .enumerate()
            .map(|(class, label)| {
                let precision = ratio(true_positives[class], predicted_counts[class]);
                let recall = ratio(true_positives[class], support[class]);
                let f1 = if precision + recall == 0.0 {
                    0.0
                } else {
                    2.0 * precision * recall / (precision + recall)
                };

                let scores = Scores {
                    precision,
                    recall,
                    f1,
                    support: support[class],
                };

                (label.clone(), scores)
            })
            .collect();

        let total: usize = support.iter().sum();
        let correct: usize = true_positives.iter().sum();

        let uniform = vec![1.0; n_classes];
        let by_support: Vec<f64> = support.iter().map(|n| *n as f64).collect();

        let macro_avg = average(&classes, &uniform, total);
        let weighted_avg = average(&classes, &by_support, total);

        Self {
            classes,
            accuracy: ratio(correct, truth.len()),
            macro_avg,
            weighted_avg,
        }
    }
}

impl Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .classes
            .iter()
            .map(|(label, _)| label.len())
            .chain(["weighted avg".len()])
            .max()
            .unwrap_or_default();

        writeln!(
            f,
            "{:>width$} {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;

        for (label, scores) in &self.classes {
            write_row(f, width, label, scores)?;
        }

        writeln!(f)?;
        writeln!(
            f,
            "{:>width$} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        )?;
        write_row(f, width, "macro avg", &self.macro_avg)?;
        write_row(f, width, "weighted avg", &self.weighted_avg)
    }
}
