// inner_product.rs - Scalar primitives shared by the accumulator and the estimators

use num_traits::Float;

/// Dot product of two samples of equal dimension.
#[inline]
pub fn inner_product<T: Float>(a: &[T], b: &[T]) -> T {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .fold(T::zero(), |total, (&x, &y)| total + x * y)
}

/// Converts a count into the scalar type.
#[inline]
pub(crate) fn to_scalar<T: Float>(n: usize) -> T {
    T::from(n).unwrap_or_else(T::max_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_product_matches_manual_sum() {
        let a = [1.0, 2.0, 3.0];
        let b = [4.0, -5.0, 0.5];
        assert!((inner_product(&a, &b) - (4.0 - 10.0 + 1.5)).abs() < 1e-12);
    }

    #[test]
    fn test_inner_product_of_empty_samples_is_zero() {
        let a: [f32; 0] = [];
        assert_eq!(inner_product(&a, &a), 0.0);
    }

    #[test]
    fn test_to_scalar() {
        assert_eq!(to_scalar::<f64>(1995), 1995.0);
        assert_eq!(to_scalar::<f32>(4), 4.0f32);
    }
}
