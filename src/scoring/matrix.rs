//! Dense query × candidate similarity matrices.

use rayon::prelude::*;

use crate::error::Result;
use crate::util::simd;

/// Below this many cells the matrix is filled serially.
const PARALLEL_THRESHOLD: usize = 4096;

/// Row-major similarity matrix with stable arg-max selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    rows: usize,
    cols: usize,
    values: Vec<f32>,
}

impl SimilarityMatrix {
    /// Pairwise cosine similarity between `rows` and `cols`.
    ///
    /// Large matrices are computed row-parallel with rayon.
    pub fn cosine(rows: &[&[f32]], cols: &[&[f32]]) -> Result<Self> {
        let row_values = |row: &&[f32]| {
            cols.iter()
                .map(|col| simd::cosine_similarity(row, col))
                .collect::<Result<Vec<f32>>>()
        };

        let values: Vec<Vec<f32>> = if rows.len() * cols.len() < PARALLEL_THRESHOLD {
            rows.iter().map(row_values).collect::<Result<_>>()?
        } else {
            rows.par_iter().map(row_values).collect::<Result<_>>()?
        };

        Ok(SimilarityMatrix {
            rows: rows.len(),
            cols: cols.len(),
            values: values.into_iter().flatten().collect(),
        })
    }

    /// Build a matrix from a cell function.
    pub fn from_fn<F>(rows: usize, cols: usize, f: F) -> Self
    where
        F: Fn(usize, usize) -> f32,
    {
        let mut values = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                values.push(f(i, j));
            }
        }
        SimilarityMatrix { rows, cols, values }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.values[row * self.cols + col]
    }

    pub fn row(&self, row: usize) -> &[f32] {
        &self.values[row * self.cols..(row + 1) * self.cols]
    }

    /// Column of the row maximum and its value; the first column wins ties.
    pub fn argmax(&self, row: usize) -> Option<(usize, f32)> {
        let mut best: Option<(usize, f32)> = None;
        for (col, &value) in self.row(row).iter().enumerate() {
            match best {
                Some((_, best_value)) if value <= best_value => {}
                _ => best = Some((col, value)),
            }
        }
        best
    }

    /// Arg-max of every row. Empty when the matrix has no columns.
    pub fn row_argmax(&self) -> Vec<(usize, f32)> {
        (0..self.rows).filter_map(|row| self.argmax(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_matrix() {
        let a = [1.0, 0.0];
        let b = [0.0, 1.0];
        let c = [1.0, 1.0];
        let matrix = SimilarityMatrix::cosine(&[&a, &b], &[&a, &b, &c]).unwrap();

        assert_eq!(matrix.rows(), 2);
        assert_eq!(matrix.cols(), 3);
        assert!((matrix.get(0, 0) - 1.0).abs() < 1e-6);
        assert!(matrix.get(0, 1).abs() < 1e-6);
        assert!((matrix.get(1, 2) - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn test_argmax_prefers_first_on_ties() {
        let matrix = SimilarityMatrix::from_fn(2, 4, |i, j| if i == 0 { 1.0 } else { j as f32 % 2.0 });
        assert_eq!(matrix.argmax(0), Some((0, 1.0)));
        assert_eq!(matrix.argmax(1), Some((1, 1.0)));
        assert_eq!(matrix.row_argmax(), vec![(0, 1.0), (1, 1.0)]);
    }

    #[test]
    fn test_argmax_handles_negative_rows() {
        let matrix = SimilarityMatrix::from_fn(1, 3, |_, j| -(j as f32) - 1.0);
        assert_eq!(matrix.argmax(0), Some((0, -1.0)));
    }

    #[test]
    fn test_argmax_without_columns() {
        let matrix = SimilarityMatrix::from_fn(2, 0, |_, _| 0.0);
        assert_eq!(matrix.argmax(0), None);
        assert!(matrix.row_argmax().is_empty());
    }

    #[test]
    fn test_parallel_matches_serial() {
        let vectors: Vec<Vec<f32>> = (0..80)
            .map(|i| (0..16).map(|j| ((i * 7 + j) as f32).sin()).collect())
            .collect();
        let refs: Vec<&[f32]> = vectors.iter().map(|v| v.as_slice()).collect();

        let full = SimilarityMatrix::cosine(&refs, &refs).unwrap();
        let head = SimilarityMatrix::cosine(&refs[..3], &refs).unwrap();
        for i in 0..3 {
            assert_eq!(full.row(i), head.row(i));
        }
    }
}
