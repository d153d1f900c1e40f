//! Quaternions with a real part and an imaginary 3-vector.
//!
//! Vertex positions and edge vectors are stored as pure-imaginary
//! quaternions, and per-vertex similarity transformations (rotation plus
//! uniform scale) as general quaternions acting by `q̄ e q`.

use std::fmt;
use std::iter::Sum;
use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

use nalgebra::{Matrix4, Vector3};

/// A quaternion `re + im.x·i + im.y·j + im.z·k`.
///
/// Components are indexed `0 = re`, `1..=3 = im.x, im.y, im.z`.
///
/// # Example
///
/// ```
/// use spinxform::math::Quaternion;
///
/// let i = Quaternion::new(0.0, 1.0, 0.0, 0.0);
/// let j = Quaternion::new(0.0, 0.0, 1.0, 0.0);
/// let k = Quaternion::new(0.0, 0.0, 0.0, 1.0);
///
/// assert_eq!(i * j, k);
/// assert_eq!(j * i, -k);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Quaternion {
    /// Real (scalar) part.
    pub re: f64,
    /// Imaginary (vector) part.
    pub im: Vector3<f64>,
}

impl Quaternion {
    /// The zero quaternion.
    pub const ZERO: Quaternion = Quaternion::new(0.0, 0.0, 0.0, 0.0);

    /// The multiplicative identity `1`.
    pub const ONE: Quaternion = Quaternion::new(1.0, 0.0, 0.0, 0.0);

    /// Create a quaternion from its four components.
    #[inline]
    pub const fn new(re: f64, i: f64, j: f64, k: f64) -> Self {
        Self {
            re,
            im: Vector3::new(i, j, k),
        }
    }

    /// Create a quaternion from a real part and an imaginary vector.
    #[inline]
    pub fn from_parts(re: f64, im: Vector3<f64>) -> Self {
        Self { re, im }
    }

    /// Create a purely real quaternion.
    #[inline]
    pub fn from_real(re: f64) -> Self {
        Self::new(re, 0.0, 0.0, 0.0)
    }

    /// Create a purely imaginary quaternion representing a 3-vector.
    #[inline]
    pub fn from_vector(im: Vector3<f64>) -> Self {
        Self { re: 0.0, im }
    }

    /// Conjugate: negates the imaginary part.
    #[inline]
    pub fn conj(&self) -> Self {
        Self {
            re: self.re,
            im: -self.im,
        }
    }

    /// Multiplicative inverse `conj(q) / |q|²`.
    ///
    /// Undefined for the zero quaternion.
    #[inline]
    pub fn inv(&self) -> Self {
        self.conj() / self.norm_squared()
    }

    /// Euclidean length of the four components.
    #[inline]
    pub fn norm(&self) -> f64 {
        self.norm_squared().sqrt()
    }

    /// Squared Euclidean length of the four components.
    #[inline]
    pub fn norm_squared(&self) -> f64 {
        self.re * self.re + self.im.norm_squared()
    }

    /// Returns this quaternion scaled to unit length.
    #[inline]
    pub fn unit(&self) -> Self {
        *self / self.norm()
    }

    /// Scales this quaternion to unit length in place.
    #[inline]
    pub fn normalize(&mut self) {
        *self /= self.norm();
    }

    /// Four-component Euclidean inner product.
    #[inline]
    pub fn dot(&self, other: &Quaternion) -> f64 {
        self.re * other.re + self.im.dot(&other.im)
    }

    /// Returns `true` if the real part is exactly zero.
    #[inline]
    pub fn is_pure(&self) -> bool {
        self.re == 0.0
    }

    /// The 4×4 real matrix of left multiplication by this quaternion.
    ///
    /// For any `p`, `q.to_matrix() * p.to_vector4() == (q * p).to_vector4()`.
    pub fn to_matrix(&self) -> Matrix4<f64> {
        let s = self.re;
        let (x, y, z) = (self.im.x, self.im.y, self.im.z);
        Matrix4::new(
            s, -x, -y, -z, //
            x, s, -z, y, //
            y, z, s, -x, //
            z, -y, x, s,
        )
    }

    /// Components in `(re, i, j, k)` order.
    #[inline]
    pub fn to_array(&self) -> [f64; 4] {
        [self.re, self.im.x, self.im.y, self.im.z]
    }

    /// Components in `(re, i, j, k)` order as an nalgebra vector.
    #[inline]
    pub fn to_vector4(&self) -> nalgebra::Vector4<f64> {
        nalgebra::Vector4::new(self.re, self.im.x, self.im.y, self.im.z)
    }
}

/// Spherical-linear interpolation between two nonzero quaternions.
///
/// Blends the magnitudes linearly and the directions along the great
/// circle through `q0 / |q0|` and `q1 / |q1|`. When the directions are
/// (anti)parallel the great circle is not unique, and the directions are
/// blended linearly instead.
pub fn slerp(q0: &Quaternion, q1: &Quaternion, t: f64) -> Quaternion {
    let m0 = q0.norm();
    let m1 = q1.norm();
    let m = (1.0 - t) * m0 + t * m1;

    let p0 = *q0 / m0;
    let p1 = *q1 / m1;
    let cos_theta = (p0.conj() * p1).re.clamp(-1.0, 1.0);
    let theta = cos_theta.acos();
    let sin_theta = theta.sin();

    let p = if sin_theta.abs() < 1e-12 {
        ((1.0 - t) * p0 + t * p1).unit()
    } else {
        (((1.0 - t) * theta).sin() * p0 + (t * theta).sin() * p1) / sin_theta
    };

    m * p
}

impl From<f64> for Quaternion {
    fn from(re: f64) -> Self {
        Self::from_real(re)
    }
}

impl From<Vector3<f64>> for Quaternion {
    fn from(im: Vector3<f64>) -> Self {
        Self::from_vector(im)
    }
}

impl From<nalgebra::Quaternion<f64>> for Quaternion {
    fn from(q: nalgebra::Quaternion<f64>) -> Self {
        Self::new(q.w, q.i, q.j, q.k)
    }
}

impl From<Quaternion> for nalgebra::Quaternion<f64> {
    fn from(q: Quaternion) -> Self {
        nalgebra::Quaternion::new(q.re, q.im.x, q.im.y, q.im.z)
    }
}

impl Index<usize> for Quaternion {
    type Output = f64;

    #[inline]
    fn index(&self, index: usize) -> &f64 {
        match index {
            0 => &self.re,
            1..=3 => &self.im[index - 1],
            _ => panic!("quaternion component index {index} out of range"),
        }
    }
}

impl IndexMut<usize> for Quaternion {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        match index {
            0 => &mut self.re,
            1..=3 => &mut self.im[index - 1],
            _ => panic!("quaternion component index {index} out of range"),
        }
    }
}

impl Add for Quaternion {
    type Output = Quaternion;

    #[inline]
    fn add(self, q: Quaternion) -> Quaternion {
        Quaternion::from_parts(self.re + q.re, self.im + q.im)
    }
}

/// Adds a real number to the real part.
impl Add<f64> for Quaternion {
    type Output = Quaternion;

    #[inline]
    fn add(self, c: f64) -> Quaternion {
        Quaternion::from_parts(self.re + c, self.im)
    }
}

impl Sub for Quaternion {
    type Output = Quaternion;

    #[inline]
    fn sub(self, q: Quaternion) -> Quaternion {
        Quaternion::from_parts(self.re - q.re, self.im - q.im)
    }
}

impl Neg for Quaternion {
    type Output = Quaternion;

    #[inline]
    fn neg(self) -> Quaternion {
        Quaternion::from_parts(-self.re, -self.im)
    }
}

impl Mul<f64> for Quaternion {
    type Output = Quaternion;

    #[inline]
    fn mul(self, c: f64) -> Quaternion {
        Quaternion::from_parts(self.re * c, self.im * c)
    }
}

impl Mul<Quaternion> for f64 {
    type Output = Quaternion;

    #[inline]
    fn mul(self, q: Quaternion) -> Quaternion {
        q * self
    }
}

impl Div<f64> for Quaternion {
    type Output = Quaternion;

    #[inline]
    fn div(self, c: f64) -> Quaternion {
        Quaternion::from_parts(self.re / c, self.im / c)
    }
}

/// Hamilton product.
impl Mul for Quaternion {
    type Output = Quaternion;

    #[inline]
    fn mul(self, q: Quaternion) -> Quaternion {
        let (s1, s2) = (self.re, q.re);
        let (v1, v2) = (&self.im, &q.im);
        Quaternion::from_parts(s1 * s2 - v1.dot(v2), s1 * v2 + s2 * v1 + v1.cross(v2))
    }
}

impl AddAssign for Quaternion {
    #[inline]
    fn add_assign(&mut self, q: Quaternion) {
        self.re += q.re;
        self.im += q.im;
    }
}

impl AddAssign<f64> for Quaternion {
    #[inline]
    fn add_assign(&mut self, c: f64) {
        self.re += c;
    }
}

impl SubAssign for Quaternion {
    #[inline]
    fn sub_assign(&mut self, q: Quaternion) {
        self.re -= q.re;
        self.im -= q.im;
    }
}

impl SubAssign<f64> for Quaternion {
    #[inline]
    fn sub_assign(&mut self, c: f64) {
        self.re -= c;
    }
}

impl MulAssign<f64> for Quaternion {
    #[inline]
    fn mul_assign(&mut self, c: f64) {
        self.re *= c;
        self.im *= c;
    }
}

impl MulAssign for Quaternion {
    #[inline]
    fn mul_assign(&mut self, q: Quaternion) {
        *self = *self * q;
    }
}

impl DivAssign<f64> for Quaternion {
    #[inline]
    fn div_assign(&mut self, c: f64) {
        self.re /= c;
        self.im /= c;
    }
}

impl Sum for Quaternion {
    fn sum<I: Iterator<Item = Quaternion>>(iter: I) -> Quaternion {
        iter.fold(Quaternion::ZERO, |acc, q| acc + q)
    }
}

impl<'a> Sum<&'a Quaternion> for Quaternion {
    fn sum<I: Iterator<Item = &'a Quaternion>>(iter: I) -> Quaternion {
        iter.fold(Quaternion::ZERO, |acc, q| acc + *q)
    }
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, [{}, {}, {}])",
            self.re, self.im.x, self.im.y, self.im.z
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const EPS: f64 = 1e-12;

    fn random_quaternion(rng: &mut StdRng) -> Quaternion {
        Quaternion::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        )
    }

    fn approx_eq(a: Quaternion, b: Quaternion, tol: f64) -> bool {
        (a - b).norm() < tol
    }

    #[test]
    fn test_basis_products() {
        let one = Quaternion::ONE;
        let i = Quaternion::new(0.0, 1.0, 0.0, 0.0);
        let j = Quaternion::new(0.0, 0.0, 1.0, 0.0);
        let k = Quaternion::new(0.0, 0.0, 0.0, 1.0);

        assert_eq!(i * i, -one);
        assert_eq!(j * j, -one);
        assert_eq!(k * k, -one);
        assert_eq!(i * j * k, -one);
        assert_eq!(j * k, i);
        assert_eq!(k * i, j);
    }

    #[test]
    fn test_product_is_associative_not_commutative() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut noncommuting = 0;

        for _ in 0..100 {
            let p = random_quaternion(&mut rng);
            let q = random_quaternion(&mut rng);
            let r = random_quaternion(&mut rng);

            assert!(approx_eq((p * q) * r, p * (q * r), 1e-12));
            if !approx_eq(p * q, q * p, 1e-6) {
                noncommuting += 1;
            }
        }

        assert!(noncommuting > 90, "only {} of 100 products failed to commute", noncommuting);
    }

    #[test]
    fn test_norm_is_multiplicative() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let p = random_quaternion(&mut rng);
            let q = random_quaternion(&mut rng);
            assert!(((p * q).norm() - p.norm() * q.norm()).abs() < EPS);
        }
    }

    #[test]
    fn test_inverse() {
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..100 {
            let q = random_quaternion(&mut rng);
            assert!(approx_eq(q.inv() * q, Quaternion::ONE, 1e-10));
            assert!(approx_eq(q * q.inv(), Quaternion::ONE, 1e-10));
        }
    }

    #[test]
    fn test_matches_nalgebra_product() {
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..20 {
            let p = random_quaternion(&mut rng);
            let q = random_quaternion(&mut rng);
            let expected: Quaternion =
                (nalgebra::Quaternion::from(p) * nalgebra::Quaternion::from(q)).into();
            assert!(approx_eq(p * q, expected, EPS));
        }
    }

    #[test]
    fn test_to_matrix_is_left_multiplication() {
        let mut rng = StdRng::seed_from_u64(19);
        for _ in 0..20 {
            let q = random_quaternion(&mut rng);
            let p = random_quaternion(&mut rng);
            let via_matrix = q.to_matrix() * p.to_vector4();
            let via_product = (q * p).to_vector4();
            assert!((via_matrix - via_product).norm() < EPS);
        }
    }

    #[test]
    fn test_conjugate_matrix_is_transpose() {
        let q = Quaternion::new(0.5, -1.0, 2.0, 0.25);
        assert_eq!(q.conj().to_matrix(), q.to_matrix().transpose());
    }

    #[test]
    fn test_indexing() {
        let mut q = Quaternion::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(q[0], 1.0);
        assert_eq!(q[3], 4.0);
        q[2] = -3.0;
        assert_eq!(q.im.y, -3.0);
    }

    #[test]
    fn test_unit_and_normalize() {
        let mut q = Quaternion::new(3.0, 0.0, 4.0, 0.0);
        assert!((q.unit().norm() - 1.0).abs() < EPS);
        q.normalize();
        assert!(approx_eq(q, Quaternion::new(0.6, 0.0, 0.8, 0.0), EPS));
    }

    #[test]
    fn test_rotation_by_conjugation() {
        // A unit quaternion about z rotates pure vectors by twice its angle.
        let half = std::f64::consts::FRAC_PI_4;
        let r = Quaternion::new(half.cos(), 0.0, 0.0, half.sin());
        let x = Quaternion::new(0.0, 1.0, 0.0, 0.0);
        let rotated = r * x * r.conj();
        assert!(approx_eq(rotated, Quaternion::new(0.0, 0.0, 1.0, 0.0), EPS));
    }

    #[test]
    fn test_slerp_endpoints_and_magnitude() {
        let q0 = Quaternion::new(2.0, 0.0, 0.0, 0.0);
        let half = std::f64::consts::FRAC_PI_4;
        let q1 = Quaternion::new(half.cos(), 0.0, 0.0, half.sin()) * 4.0;

        assert!(approx_eq(slerp(&q0, &q1, 0.0), q0, 1e-12));
        assert!(approx_eq(slerp(&q0, &q1, 1.0), q1, 1e-12));

        let mid = slerp(&q0, &q1, 0.5);
        assert!((mid.norm() - 3.0).abs() < 1e-12);
        let angle = std::f64::consts::PI / 8.0;
        assert!(approx_eq(mid.unit(), Quaternion::new(angle.cos(), 0.0, 0.0, angle.sin()), 1e-12));
    }

    #[test]
    fn test_slerp_parallel_directions() {
        let q0 = Quaternion::new(0.0, 1.0, 0.0, 0.0);
        let q1 = Quaternion::new(0.0, 3.0, 0.0, 0.0);
        let mid = slerp(&q0, &q1, 0.5);
        assert!(approx_eq(mid, Quaternion::new(0.0, 2.0, 0.0, 0.0), 1e-12));
    }

    #[test]
    fn test_sum_and_scalar_ops() {
        let qs = [Quaternion::new(1.0, 2.0, 3.0, 4.0), Quaternion::new(-1.0, 0.0, 1.0, 0.0)];
        let total: Quaternion = qs.iter().sum();
        assert_eq!(total, Quaternion::new(0.0, 2.0, 4.0, 4.0));
        assert_eq!(total + 1.5, Quaternion::new(1.5, 2.0, 4.0, 4.0));
        assert_eq!(2.0 * total / 4.0, Quaternion::new(0.0, 1.0, 2.0, 2.0));
    }
}
