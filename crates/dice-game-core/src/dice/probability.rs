//! Pairwise win-probability matrix over a set of dice.

use super::{Dice, Probability};

/// Square matrix, `cell(i, j)` = chance that dice `i` beats dice `j`.
///
/// Diagonal cells are self-comparisons kept for display only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbabilityTable {
    labels: Vec<String>,
    cells: Vec<Vec<Probability>>,
}

impl ProbabilityTable {
    pub fn compute(dice: &[Dice]) -> Self {
        let labels = dice.iter().map(Dice::signature).collect();
        let cells = dice
            .iter()
            .map(|a| dice.iter().map(|b| a.win_probability(b)).collect())
            .collect();
        Self { labels, cells }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Dice signatures, in row (and column) order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<Probability> {
        self.cells.get(row)?.get(col).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &[Probability])> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.cells.iter().map(Vec::as_slice))
    }
}
