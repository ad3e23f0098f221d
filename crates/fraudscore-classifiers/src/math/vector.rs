use std::ops::{Add, Mul};

use num_traits::Zero;

#[derive(Clone, Debug, PartialEq)]
pub struct Array1<T> {
    data: Vec<T>,
}

impl<T> Array1<T> {
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }
}

impl<T> Array1<T>
where
    T: Copy + Zero + Add<Output = T> + Mul<Output = T>,
{
    /// Inner product over a slice of the same length.
    pub fn dot(&self, other: &[T]) -> T {
        assert_eq!(
            self.len(),
            other.len(),
            "Dot product requires equal length vectors"
        );
        self.data
            .iter()
            .zip(other.iter())
            .fold(T::zero(), |acc, (a, b)| acc + *a * *b)
    }
}
