//! 2x2 confusion matrix over OK / NOT OK

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conformance {
    Ok,
    NotOk,
}

impl Conformance {
    pub const ALL: [Conformance; 2] = [Conformance::Ok, Conformance::NotOk];

    fn index(self) -> usize {
        match self {
            Conformance::Ok => 0,
            Conformance::NotOk => 1,
        }
    }

    /// Column heading on the predicted axis
    pub fn predicted_label(self) -> &'static str {
        match self {
            Conformance::Ok => "OK",
            Conformance::NotOk => "NOT OK",
        }
    }

    /// Row heading on the actual axis
    pub fn actual_label(self) -> &'static str {
        match self {
            Conformance::Ok => "OK (Expected)",
            Conformance::NotOk => "NOT OK (Expected)",
        }
    }
}

/// One component's share of the matrix under the clipping rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contribution {
    pub true_positive: u64,
    pub false_negative: u64,
    pub false_positive: u64,
    pub true_negative: u64,
}

impl Contribution {
    /// Over-detection never counts toward TP/TN; shortfalls and excess NOT OK
    /// detections go to FN/FP. Every cell is floored at zero, so a negative
    /// expected NOT OK count cannot produce a negative contribution.
    pub fn clip(expected_ok: i64, expected_not_ok: i64, detected_ok: i64, detected_not_ok: i64) -> Self {
        Self {
            true_positive: floor(detected_ok.min(expected_ok)),
            false_negative: floor(expected_ok.saturating_sub(detected_ok)),
            false_positive: floor(detected_not_ok.saturating_sub(expected_not_ok)),
            true_negative: floor(detected_not_ok.min(expected_not_ok)),
        }
    }
}

fn floor(value: i64) -> u64 {
    value.max(0) as u64
}

/// Cells indexed by (actual, predicted): `[[TP, FN], [FP, TN]]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionMatrix {
    cells: [[u64; 2]; 2],
}

impl ConfusionMatrix {
    pub fn from_rows(cells: [[u64; 2]; 2]) -> Self {
        Self { cells }
    }

    pub fn get(&self, actual: Conformance, predicted: Conformance) -> u64 {
        self.cells[actual.index()][predicted.index()]
    }

    pub fn true_positive(&self) -> u64 {
        self.get(Conformance::Ok, Conformance::Ok)
    }

    pub fn false_negative(&self) -> u64 {
        self.get(Conformance::Ok, Conformance::NotOk)
    }

    pub fn false_positive(&self) -> u64 {
        self.get(Conformance::NotOk, Conformance::Ok)
    }

    pub fn true_negative(&self) -> u64 {
        self.get(Conformance::NotOk, Conformance::NotOk)
    }

    pub fn as_rows(&self) -> [[u64; 2]; 2] {
        self.cells
    }

    pub fn add_contribution(&mut self, contribution: Contribution) {
        let rhs = [
            [contribution.true_positive, contribution.false_negative],
            [contribution.false_positive, contribution.true_negative],
        ];
        *self += ConfusionMatrix::from_rows(rhs);
    }

    pub fn max_cell(&self) -> u64 {
        self.cells.iter().flatten().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.cells
            .iter()
            .flatten()
            .fold(0u64, |total, cell| total.saturating_add(*cell))
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// (TP + TN) / total, or `None` for an empty matrix.
    pub fn accuracy(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        Some((self.true_positive() + self.true_negative()) as f64 / total as f64)
    }
}

impl AddAssign for ConfusionMatrix {
    fn add_assign(&mut self, rhs: Self) {
        for (row, rhs_row) in self.cells.iter_mut().zip(rhs.cells) {
            for (cell, rhs_cell) in row.iter_mut().zip(rhs_row) {
                *cell = cell.saturating_add(rhs_cell);
            }
        }
    }
}

impl Add for ConfusionMatrix {
    type Output = ConfusionMatrix;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl Sum for ConfusionMatrix {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(ConfusionMatrix::default(), Add::add)
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label_width = Conformance::ALL
            .iter()
            .map(|c| c.actual_label().len())
            .max()
            .unwrap_or(0)
            .max("Actual".len());
        let cell_width = Conformance::ALL
            .iter()
            .map(|c| c.predicted_label().len())
            .chain(self.cells.iter().flatten().map(|v| v.to_string().len()))
            .max()
            .unwrap_or(0)
            + 2;

        writeln!(f, "{:label_width$}  Predicted", "")?;
        write!(f, "{:label_width$}", "Actual")?;
        for predicted in Conformance::ALL {
            write!(f, "  {:>cell_width$}", predicted.predicted_label())?;
        }
        writeln!(f)?;
        for actual in Conformance::ALL {
            write!(f, "{:label_width$}", actual.actual_label())?;
            for predicted in Conformance::ALL {
                write!(f, "  {:>cell_width$}", self.get(actual, predicted))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_scenario() {
        let c = Contribution::clip(2, 0, 2, 1);
        assert_eq!(
            c,
            Contribution {
                true_positive: 2,
                false_negative: 0,
                false_positive: 1,
                true_negative: 0,
            }
        );
    }

    #[test]
    fn test_clip_negative_expected_not_ok() {
        // Operator declared 3 good out of 2 present
        let c = Contribution::clip(3, -1, 1, 2);
        assert_eq!(c.true_positive, 1);
        assert_eq!(c.false_negative, 2);
        assert_eq!(c.false_positive, 3);
        assert_eq!(c.true_negative, 0);
    }

    #[test]
    fn test_indexing_layout() {
        let m = ConfusionMatrix::from_rows([[1, 2], [3, 4]]);
        assert_eq!(m.true_positive(), 1);
        assert_eq!(m.false_negative(), 2);
        assert_eq!(m.false_positive(), 3);
        assert_eq!(m.true_negative(), 4);
        assert_eq!(m.total(), 10);
        assert_eq!(m.max_cell(), 4);
        assert_eq!(m.accuracy(), Some(0.5));
    }

    #[test]
    fn test_cells_saturate() {
        let mut m = ConfusionMatrix::from_rows([[u64::MAX, 0], [0, 1]]);
        m.add_contribution(Contribution::clip(5, 0, 5, 0));
        assert_eq!(m.true_positive(), u64::MAX);
        assert_eq!(m.total(), u64::MAX);
    }

    #[test]
    fn test_sum() {
        let a = ConfusionMatrix::from_rows([[1, 0], [0, 1]]);
        let b = ConfusionMatrix::from_rows([[0, 2], [3, 0]]);
        let total: ConfusionMatrix = [a, b].into_iter().sum();
        assert_eq!(total.as_rows(), [[1, 2], [3, 1]]);
        assert_eq!(ConfusionMatrix::default().accuracy(), None);
    }

    #[test]
    fn test_display_axes() {
        let text = ConfusionMatrix::from_rows([[12, 0], [1, 7]]).to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].ends_with("Predicted"));
        assert!(lines[1].starts_with("Actual") && lines[1].contains("OK") && lines[1].ends_with("NOT OK"));
        assert!(lines[2].starts_with("OK (Expected)") && lines[2].ends_with(" 0"));
        assert!(lines[3].starts_with("NOT OK (Expected)") && lines[3].ends_with(" 7"));
    }
}
