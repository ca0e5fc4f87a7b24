//! Display orders for one matrix axis.

use crate::error::{Error, Result};

/// A bijection on `0..n`: position `i` of the display shows original item
/// `self[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Permutation(Vec<usize>);

impl Permutation {
    /// Validate `order` as a permutation of `0..order.len()`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPermutation`] with the first value that is out
    /// of range or repeated.
    pub fn new(order: Vec<usize>) -> Result<Self> {
        let len = order.len();
        let mut seen = vec![false; len];
        for &value in &order {
            match seen.get_mut(value) {
                Some(slot) if !*slot => *slot = true,
                _ => return Err(Error::InvalidPermutation { len, value }),
            }
        }
        Ok(Self(order))
    }

    /// Caller guarantees `order` is a bijection.
    pub(crate) fn from_vec_unchecked(order: Vec<usize>) -> Self {
        debug_assert!(Self::new(order.clone()).is_ok());
        Self(order)
    }

    /// `0, 1, ..., n - 1`.
    #[must_use]
    pub fn identity(n: usize) -> Self {
        Self((0..n).collect())
    }

    /// Number of positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the permutation is over zero items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Original index shown at display position `i`.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<usize> {
        self.0.get(i).copied()
    }

    /// The order as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Consume into the raw order.
    #[must_use]
    pub fn into_vec(self) -> Vec<usize> {
        self.0
    }

    /// Whether every item stays in place.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.0.iter().enumerate().all(|(i, &v)| i == v)
    }

    /// The permutation mapping original indices back to display positions.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let mut inverse = vec![0; self.0.len()];
        for (position, &original) in self.0.iter().enumerate() {
            inverse[original] = position;
        }
        Self(inverse)
    }

    /// Reorder `items` (row or column labels, say) into display order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if `items.len() != self.len()`.
    pub fn apply<T: Clone>(&self, items: &[T]) -> Result<Vec<T>> {
        if items.len() != self.0.len() {
            return Err(Error::DimensionMismatch { expected: self.0.len(), found: items.len() });
        }
        Ok(self.0.iter().map(|&i| items[i].clone()).collect())
    }
}

impl AsRef<[usize]> for Permutation {
    fn as_ref(&self) -> &[usize] {
        &self.0
    }
}

impl TryFrom<Vec<usize>> for Permutation {
    type Error = Error;

    fn try_from(order: Vec<usize>) -> Result<Self> {
        Self::new(order)
    }
}

impl From<Permutation> for Vec<usize> {
    fn from(p: Permutation) -> Self {
        p.0
    }
}
