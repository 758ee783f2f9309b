use serde_derive::{Deserialize, Serialize};

use crate::Float;

/// Fixed-or-variable length numeric feature description.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct TupleDesc<T> {
    pub value: Vec<T>,
}

impl<T: Copy + Default> TupleDesc<T> {
    #[inline]
    pub fn new(len: usize) -> Self {
        Self {
            value: vec![T::default(); len],
        }
    }
}

impl<T> TupleDesc<T> {
    #[inline]
    pub fn len(&self) -> usize {
        self.value.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.value
    }
}

impl<T> From<Vec<T>> for TupleDesc<T> {
    #[inline]
    fn from(value: Vec<T>) -> Self {
        Self { value }
    }
}

/// Descriptor-distance capability used for association. Lower is more similar.
///
/// Descriptors which can't be compared (e.g. of different length) must return
/// `f64::INFINITY` so they are never considered as a match.
pub trait Distance<D: ?Sized> {
    fn distance(&self, a: &D, b: &D) -> f64;
}

impl<D: ?Sized, M: Distance<D> + ?Sized> Distance<D> for &M {
    #[inline]
    fn distance(&self, a: &D, b: &D) -> f64 {
        (**self).distance(a, b)
    }
}

/// Sum of squared differences, for float descriptors (SURF-like).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct SquaredEuclidean;

impl<T: Float> Distance<TupleDesc<T>> for SquaredEuclidean {
    fn distance(&self, a: &TupleDesc<T>, b: &TupleDesc<T>) -> f64 {
        if a.len() != b.len() {
            return f64::INFINITY;
        }

        a.value
            .iter()
            .zip(b.value.iter())
            .map(|(&x, &y)| {
                let d = (x - y).to_f64().unwrap_or(f64::INFINITY);
                d * d
            })
            .sum()
    }
}

/// Number of differing bits between packed binary descriptors (BRIEF/ORB-like).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct Hamming;

impl Distance<TupleDesc<u8>> for Hamming {
    fn distance(&self, a: &TupleDesc<u8>, b: &TupleDesc<u8>) -> f64 {
        if a.len() != b.len() {
            return f64::INFINITY;
        }

        a.value
            .iter()
            .zip(b.value.iter())
            .map(|(x, y)| (x ^ y).count_ones())
            .sum::<u32>() as f64
    }
}

impl Distance<TupleDesc<u64>> for Hamming {
    fn distance(&self, a: &TupleDesc<u64>, b: &TupleDesc<u64>) -> f64 {
        if a.len() != b.len() {
            return f64::INFINITY;
        }

        a.value
            .iter()
            .zip(b.value.iter())
            .map(|(x, y)| (x ^ y).count_ones())
            .sum::<u32>() as f64
    }
}

/// Sum of absolute differences between 8-bit grayscale patches.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct Sad;

impl Distance<TupleDesc<u8>> for Sad {
    fn distance(&self, a: &TupleDesc<u8>, b: &TupleDesc<u8>) -> f64 {
        if a.len() != b.len() {
            return f64::INFINITY;
        }

        a.value
            .iter()
            .zip(b.value.iter())
            .map(|(&x, &y)| (x as i32 - y as i32).unsigned_abs())
            .sum::<u32>() as f64
    }
}
