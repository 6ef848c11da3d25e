//! SIMD vector kernels built on the `wide` crate.
//!
//! The scorers spend nearly all of their time in cosine similarity, so the
//! dot product and magnitude loops process eight lanes at a time with a
//! scalar tail. The `*_unchecked` kernels assume equal lengths; callers go
//! through [`cosine_similarity`], which validates dimensions first.

use wide::f32x8;

use crate::error::{CompsimError, Result};

const LANES: usize = 8;

#[inline]
fn load(chunk: &[f32]) -> f32x8 {
    let mut lane = [0.0f32; LANES];
    lane.copy_from_slice(chunk);
    f32x8::from(lane)
}

/// Dot product of two equally sized vectors.
pub fn dot_product_unchecked(a: &[f32], b: &[f32]) -> f32 {
    let mut sum = f32x8::splat(0.0);
    let a_chunks = a.chunks_exact(LANES);
    let b_chunks = b.chunks_exact(LANES);
    let a_tail = a_chunks.remainder();
    let b_tail = b_chunks.remainder();

    for (x, y) in a_chunks.zip(b_chunks) {
        sum += load(x) * load(y);
    }

    let mut result = sum.to_array().iter().sum::<f32>();
    for (x, y) in a_tail.iter().zip(b_tail) {
        result += x * y;
    }
    result
}

/// L2 magnitude of a vector.
pub fn magnitude(vector: &[f32]) -> f32 {
    let mut sum_squares = f32x8::splat(0.0);
    let chunks = vector.chunks_exact(LANES);
    let tail = chunks.remainder();

    for chunk in chunks {
        let lane = load(chunk);
        sum_squares += lane * lane;
    }

    let mut result = sum_squares.to_array().iter().sum::<f32>();
    for value in tail {
        result += value * value;
    }
    result.sqrt()
}

/// Cosine similarity in `[-1, 1]`; zero-magnitude inputs score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(CompsimError::dimension_mismatch(a.len(), b.len()));
    }

    let magnitude_a = magnitude(a);
    let magnitude_b = magnitude(b);
    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot_product_unchecked(a, b) / (magnitude_a * magnitude_b))
}

/// Add `addend` into `acc` element-wise.
pub fn add_assign_unchecked(acc: &mut [f32], addend: &[f32]) {
    let mut acc_chunks = acc.chunks_exact_mut(LANES);
    let add_chunks = addend.chunks_exact(LANES);
    let add_tail = add_chunks.remainder();

    for (slot, chunk) in (&mut acc_chunks).zip(add_chunks) {
        let sum = load(slot) + load(chunk);
        slot.copy_from_slice(&sum.to_array());
    }

    for (slot, value) in acc_chunks.into_remainder().iter_mut().zip(add_tail) {
        *slot += value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_product_spans_lanes_and_tail() {
        let a: Vec<f32> = (1..=10).map(|x| x as f32).collect();
        let b = vec![1.0; 10];
        assert!((dot_product_unchecked(&a, &b) - 55.0).abs() < 1e-5);
    }

    #[test]
    fn test_magnitude() {
        let vector = vec![3.0, 4.0, 0.0, 0.0];
        assert!((magnitude(&vector) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b).unwrap() - 1.0).abs() < 1e-6);

        let c = vec![0.0, 1.0, 0.0, 0.0];
        assert!(cosine_similarity(&a, &c).unwrap().abs() < 1e-6);

        let d = vec![-1.0, 0.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d).unwrap() + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_zero_vector() {
        let a = vec![0.0; 9];
        let b = vec![1.0; 9];
        assert_eq!(cosine_similarity(&a, &b).unwrap(), 0.0);
    }

    #[test]
    fn test_cosine_similarity_dimension_mismatch() {
        let err = cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]).unwrap_err();
        assert!(matches!(
            err,
            CompsimError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_add_assign() {
        let mut acc = vec![1.0; 11];
        let addend: Vec<f32> = (0..11).map(|x| x as f32).collect();
        add_assign_unchecked(&mut acc, &addend);
        let expected: Vec<f32> = (0..11).map(|x| x as f32 + 1.0).collect();
        assert_eq!(acc, expected);
    }
}
