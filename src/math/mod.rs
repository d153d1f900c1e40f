//! Vector and quaternion algebra.
//!
//! Three-component vectors come from nalgebra ([`Vector`]); [`Quaternion`]
//! is built on top of them with a real part and an imaginary vector.

mod quaternion;

pub use quaternion::{slerp, Quaternion};

/// A 3-component real vector.
pub type Vector = nalgebra::Vector3<f64>;

/// Subtract the arithmetic mean from every element.
///
/// Does nothing for an empty slice.
pub fn remove_mean(values: &mut [Quaternion]) {
    if values.is_empty() {
        return;
    }
    let mean = values.iter().sum::<Quaternion>() / values.len() as f64;
    for v in values.iter_mut() {
        *v -= mean;
    }
}

/// Cotangent of the angle between `u1` and `u2`.
///
/// Computed as the dot product over the norm of the cross product. Returns
/// zero when the vectors are (numerically) parallel.
pub fn cotangent(u1: &Vector, u2: &Vector) -> f64 {
    let cross_len = u1.cross(u2).norm();
    if cross_len < 1e-12 {
        0.0
    } else {
        u1.dot(u2) / cross_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_mean() {
        let mut values = vec![
            Quaternion::new(1.0, 2.0, 0.0, 0.0),
            Quaternion::new(3.0, 0.0, 4.0, 0.0),
            Quaternion::new(2.0, 1.0, 2.0, 6.0),
        ];
        remove_mean(&mut values);

        let total: Quaternion = values.iter().sum();
        assert!(total.norm() < 1e-12);
        assert_eq!(values[0], Quaternion::new(-1.0, 1.0, -2.0, -2.0));
    }

    #[test]
    fn test_cotangent() {
        let x = Vector::new(1.0, 0.0, 0.0);
        let y = Vector::new(0.0, 1.0, 0.0);
        let xy = Vector::new(1.0, 1.0, 0.0);

        assert!(cotangent(&x, &y).abs() < 1e-12);
        assert!((cotangent(&x, &xy) - 1.0).abs() < 1e-12);
        assert_eq!(cotangent(&x, &x), 0.0);
    }
}
