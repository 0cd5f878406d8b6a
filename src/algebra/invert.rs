//! Closed-form 3x3 inverses.
//!
//! Both routines refuse to write a result when `|det| < THRESHOLD` and report
//! `AlgebraError::Singular` instead. Whether that is fatal is the caller's call.

use super::error::AlgebraError;
use super::types::{dense_determinant, SVar, Var, THRESHOLD};

/// Inverse of a dense matrix by cofactor expansion.
///
/// Indices are taken cyclically, so every cofactor has the same sign pattern:
/// `inv[i][j] = (v[j+1][i+1] * v[j+2][i+2] - v[j+1][i+2] * v[j+2][i+1]) / det`.
pub fn invert_var(v: &Var) -> Result<Var, AlgebraError> {
    let det = dense_determinant(v);
    if det.abs() < THRESHOLD {
        return Err(AlgebraError::Singular { det });
    }
    let inv_det = 1.0 / det;

    // b(i, j) reads the transpose, with wrap-around indices.
    let b = |i: usize, j: usize| v[(j % 3, i % 3)];
    Ok(Var::from_fn(|i, j| {
        inv_det * (b(i + 1, j + 1) * b(i + 2, j + 2) - b(i + 2, j + 1) * b(i + 1, j + 2))
    }))
}

/// Inverse of a packed symmetric matrix using only its six terms.
pub fn invert_svar(v: &SVar) -> Result<SVar, AlgebraError> {
    // a d e
    // d b f
    // e f c
    let (a, b, c) = (v.xx(), v.yy(), v.zz());
    let (d, e, f) = (v.xy(), v.xz(), v.yz());

    let bcff = b * c - f * f;
    let efcd = e * f - c * d;
    let dfbe = d * f - b * e;
    let det = a * bcff + d * efcd + e * dfbe;

    if det.abs() < THRESHOLD {
        return Err(AlgebraError::Singular { det });
    }
    let inv_det = 1.0 / det;

    Ok(SVar::new(
        inv_det * bcff,
        inv_det * (c * a - e * e),
        inv_det * (a * b - d * d),
        inv_det * efcd,
        inv_det * dfbe,
        inv_det * (e * d - a * f),
    ))
}

/// Sum of `|p[i][j] - I[i][j]|` over the product of a matrix and its claimed
/// inverse. Used by the instrumentation layer to confirm an inversion.
pub fn identity_residual(product: &Var) -> f64 {
    let mut residual = 0.0;
    for i in 0..3 {
        for j in 0..3 {
            let expected = if i == j { 1.0 } else { 0.0 };
            residual += (product[(i, j)] - expected).abs();
        }
    }
    residual
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::ops::mul_ss;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(SVar::identity())]
    #[case(SVar::diagonal(0.25, 4.0, 9.0))]
    #[case(SVar::new(2.0, 3.0, 4.0, 0.5, 0.25, -0.75))]
    #[case(SVar::new(0.0036, 0.0041, 0.0012, 0.0007, -0.0002, 0.0003))]
    fn test_svar_inverse_times_original_is_identity(#[case] v: SVar) {
        let inv = invert_svar(&v).expect("matrix should be invertible");
        let product = mul_ss(&inv, &v);
        assert!(identity_residual(&product) < THRESHOLD, "residual too large: {}", product);
    }

    #[test]
    fn test_dense_inverse_matches_nalgebra() {
        let v = Var::new(4.0, 1.0, 0.5, 2.0, 5.0, 0.25, -1.0, 0.75, 6.0);
        let ours = invert_var(&v).unwrap();
        let reference = v.try_inverse().unwrap();
        assert_relative_eq!(ours, reference, epsilon = 1e-12);
    }

    #[test]
    fn test_packed_inverse_matches_dense_inverse() {
        let v = SVar::new(2.0, 3.0, 4.0, 0.5, 0.25, -0.75);
        let packed = invert_svar(&v).unwrap().to_dense();
        let dense = invert_var(&v.to_dense()).unwrap();
        assert_relative_eq!(packed, dense, epsilon = 1e-12);
    }

    #[rstest]
    #[case(SVar::ZERO)]
    #[case(SVar::diagonal(1.0, 1.0, 0.0))]
    #[case(SVar::new(1.0, 1.0, 1.0, 1.0, 1.0, 1.0))]
    fn test_singular_svar_is_rejected(#[case] v: SVar) {
        assert!(matches!(invert_svar(&v), Err(AlgebraError::Singular { .. })));
    }

    #[test]
    fn test_singular_dense_is_rejected() {
        let v = Var::new(1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 0.0, 1.0, 1.0);
        let err = invert_var(&v).unwrap_err();
        assert!(err.to_string().contains("singular"));
    }
}
