//! Products and divisions mixing packed and dense covariances.
//!
//! Elementwise addition, subtraction and scaling are the `+`, `-` and `* f64`
//! operators on `Delta`, `Var` and `SVar`; only the mixed-representation
//! products need dedicated routines.

use super::error::AlgebraError;
use super::invert::{invert_svar, invert_var};
use super::types::{Delta, SVar, Var, THRESHOLD};

/// r = ab for two dense matrices.
pub fn mul_vv(a: &Var, b: &Var) -> Var {
    a * b
}

/// r = ab for two packed matrices. The product of two symmetric matrices is
/// not symmetric in general, hence the dense result.
pub fn mul_ss(a: &SVar, b: &SVar) -> Var {
    Var::from_fn(|i, j| (0..3).map(|k| a.at(i, k) * b.at(k, j)).sum())
}

/// r = ab where the caller guarantees the product is symmetric (e.g. `a` is a
/// polynomial in `b`). The lower triangle is computed as well and compared
/// against the stored upper triangle.
///
/// # Panics
/// If the two triangles differ by more than `THRESHOLD`: the caller's
/// precondition was broken, which is a logic error.
pub fn mul_vs(a: &Var, b: &SVar) -> SVar {
    let mut r = SVar::ZERO;
    for i in 0..3 {
        for j in 0..3 {
            let tot: f64 = (0..3).map(|k| a[(i, k)] * b.at(k, j)).sum();
            if i <= j {
                r.set(i, j, tot);
            } else if (r.at(j, i) - tot).abs() > THRESHOLD {
                tracing::error!(
                    row = i,
                    col = j,
                    lower = tot,
                    upper = r.at(j, i),
                    lhs = %a,
                    rhs = ?b,
                    "dense x packed product is not symmetric"
                );
                panic!("mul_vs didn't produce a symmetric matrix ({i},{j}) = {tot}, ({j},{i}) was {}", r.at(j, i));
            }
        }
    }
    r
}

/// r = ab for a dense matrix and a displacement.
pub fn mul_vd(a: &Var, b: &Delta) -> Delta {
    a * b
}

/// r = vb for a packed matrix and a displacement.
pub fn mul_sd(v: &SVar, b: &Delta) -> Delta {
    Delta::from_fn(|i, _| (0..3).map(|j| v.at(i, j) * b[j]).sum())
}

/// r = (b^-1)a
pub fn div_dv(a: &Delta, b: &Var) -> Result<Delta, AlgebraError> {
    let b_inv = invert_var(b)?;
    Ok(mul_vd(&b_inv, a))
}

/// r = (b^-1)a with a packed covariance.
pub fn div_ds(a: &Delta, b: &SVar) -> Result<Delta, AlgebraError> {
    let b_inv = invert_svar(b)?;
    Ok(mul_sd(&b_inv, a))
}

/// r = a(b^-1)
pub fn div_vv(a: &Var, b: &Var) -> Result<Var, AlgebraError> {
    let b_inv = invert_var(b)?;
    Ok(mul_vv(a, &b_inv))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> SVar {
        SVar::new(2.0, 3.0, 4.0, 0.5, 0.25, -0.75)
    }

    #[test]
    fn test_packed_product_matches_dense_product() {
        let a = sample();
        let b = SVar::new(1.0, 1.5, 0.5, 0.1, 0.2, 0.3);
        assert_relative_eq!(mul_ss(&a, &b), a.to_dense() * b.to_dense(), epsilon = 1e-12);
    }

    #[test]
    fn test_dense_times_packed_keeps_symmetry() {
        // A polynomial in B commutes with B, so A*B is symmetric.
        let b = sample();
        let a = b.to_dense() * 2.0 + Var::identity();
        let r = mul_vs(&a, &b);
        assert_relative_eq!(r.to_dense(), a * b.to_dense(), epsilon = 1e-12);
    }

    #[test]
    fn test_inverse_times_matrix_is_packed_identity() {
        let b = sample();
        let b_inv = crate::algebra::invert_var(&b.to_dense()).unwrap();
        let r = mul_vs(&b_inv, &b);
        assert_relative_eq!(r, SVar::identity(), epsilon = 1e-10);
    }

    #[test]
    #[should_panic(expected = "symmetric")]
    fn test_asymmetric_product_is_fatal() {
        let a = Var::new(1.0, 5.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0);
        mul_vs(&a, &sample());
    }

    #[test]
    fn test_vector_products() {
        let d = Delta::new(1.0, -1.0, 2.0);
        let v = sample();
        assert_relative_eq!(mul_sd(&v, &d), v.to_dense() * d, epsilon = 1e-12);
        assert_relative_eq!(mul_vd(&v.to_dense(), &d), v.to_dense() * d, epsilon = 1e-12);
    }

    #[test]
    fn test_division_undoes_product() {
        let v = sample();
        let d = Delta::new(0.3, 1.2, -4.0);
        let back = div_ds(&mul_sd(&v, &d), &v).unwrap();
        assert_relative_eq!(back, d, epsilon = 1e-12);

        let dense_back = div_dv(&mul_vd(&v.to_dense(), &d), &v.to_dense()).unwrap();
        assert_relative_eq!(dense_back, d, epsilon = 1e-12);

        let m = Var::new(1.0, 2.0, 0.0, 0.0, 1.0, 3.0, 4.0, 0.0, 1.0);
        let m_back = div_vv(&mul_vv(&m, &v.to_dense()), &v.to_dense()).unwrap();
        assert_relative_eq!(m_back, m, epsilon = 1e-12);
    }

    #[test]
    fn test_division_by_singular_propagates() {
        let d = Delta::new(1.0, 1.0, 1.0);
        assert!(div_ds(&d, &SVar::ZERO).is_err());
        assert!(div_dv(&d, &Var::zeros()).is_err());
        assert!(div_vv(&Var::identity(), &Var::zeros()).is_err());
    }
}
