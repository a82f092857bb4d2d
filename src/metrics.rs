//! Metrics derived from an evaluation report.
use crate::classifier::EvalReport;

/// Simple confusion matrix (for small num_classes), rows = true class,
/// columns = predicted class. Predictions decoded outside
/// `[0, num_classes)` have no column and are skipped.
pub fn confusion_matrix(report: &EvalReport, num_classes: usize) -> Vec<Vec<usize>> {
    let mut cm = vec![vec![0; num_classes]; num_classes];
    for p in &report.predictions {
        if p.actual < num_classes && (0..num_classes as i64).contains(&p.predicted) {
            cm[p.actual][p.predicted as usize] += 1;
        }
    }
    cm
}
