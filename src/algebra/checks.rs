//! checks.rs
//! Instrumentation over the algebra: NaN, singularity and symmetry scans plus
//! the inverse self-check.
//!
//! Nothing here changes a value. Scans log at debug level and hand back what
//! they found; callers with more context decide whether to warn. Divisions
//! made through [`Checks`] run the inverse self-check.

use super::error::AlgebraError;
use super::invert::{identity_residual, invert_svar, invert_var};
use super::ops::{mul_sd, mul_ss, mul_vd, mul_vv};
use super::types::{dense_determinant, Delta, SVar, Var, THRESHOLD};
use crate::config::CheckConfig;

/// A single problem spotted by a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finding {
    NotANumber,
    Singular,
    Asymmetric,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Checks {
    config: CheckConfig,
}

impl Checks {
    pub fn new(config: CheckConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    pub fn delta(&self, d: &Delta) -> Vec<Finding> {
        let mut found = Vec::new();
        if self.config.nan_scan && d.iter().any(|v| v.is_nan()) {
            found.push(Finding::NotANumber);
        }
        if !found.is_empty() {
            tracing::debug!(delta = ?(d.x, d.y, d.z), ?found, "suspicious displacement");
        }
        found
    }

    /// All-zero matrices are skipped: they are legitimate equate covariances.
    pub fn svar(&self, v: &SVar) -> Vec<Finding> {
        let mut found = Vec::new();
        if self.config.nan_scan && v.as_array().iter().any(|x| x.is_nan()) {
            found.push(Finding::NotANumber);
        }
        if v.is_zero() {
            return found;
        }
        if self.config.singular_scan && v.determinant().abs() < THRESHOLD {
            found.push(Finding::Singular);
        }
        if !found.is_empty() {
            tracing::debug!(svar = ?v.as_array(), ?found, "suspicious packed covariance");
        }
        found
    }

    pub fn var(&self, v: &Var) -> Vec<Finding> {
        let mut found = Vec::new();
        if self.config.nan_scan && v.iter().any(|x| x.is_nan()) {
            found.push(Finding::NotANumber);
        }
        if v.iter().all(|&x| x == 0.0) {
            return found;
        }
        if self.config.singular_scan && dense_determinant(v).abs() < THRESHOLD {
            found.push(Finding::Singular);
        }
        if self.config.symmetry_scan && (v - v.transpose()).amax() > THRESHOLD {
            found.push(Finding::Asymmetric);
        }
        if !found.is_empty() {
            tracing::debug!(var = %v, ?found, "suspicious dense covariance");
        }
        found
    }

    /// Inverts and, when enabled, confirms `v * inv ≈ I`.
    ///
    /// # Panics
    /// When the self-check is enabled and the product strays from identity by
    /// more than `THRESHOLD`. A matrix that passed the singularity test but
    /// still does not invert means the data reaching us is corrupt.
    pub fn invert_var(&self, v: &Var) -> Result<Var, AlgebraError> {
        self.var(v);
        let inv = invert_var(v)?;
        if self.config.inverse_self_check {
            let product = mul_vv(v, &inv);
            let residual = identity_residual(&product);
            if residual > THRESHOLD {
                tracing::error!(original = %v, inverse = %inv, product = %product, "matrix didn't invert");
                panic!("matrix didn't invert (residual {residual:e})");
            }
            self.var(&inv);
        }
        Ok(inv)
    }

    /// Packed counterpart of [`Checks::invert_var`].
    pub fn invert_svar(&self, v: &SVar) -> Result<SVar, AlgebraError> {
        self.svar(v);
        let inv = invert_svar(v)?;
        if self.config.inverse_self_check {
            let product = mul_ss(v, &inv);
            let residual = identity_residual(&product);
            if residual > THRESHOLD {
                tracing::error!(original = ?v.as_array(), inverse = ?inv.as_array(), product = %product, "matrix didn't invert");
                panic!("matrix didn't invert (residual {residual:e})");
            }
            self.svar(&inv);
        }
        Ok(inv)
    }

    /// [`div_dv`](super::ops::div_dv) with the inverse confirmed.
    pub fn div_dv(&self, a: &Delta, b: &Var) -> Result<Delta, AlgebraError> {
        Ok(mul_vd(&self.invert_var(b)?, a))
    }

    /// [`div_ds`](super::ops::div_ds) with the inverse confirmed.
    pub fn div_ds(&self, a: &Delta, b: &SVar) -> Result<Delta, AlgebraError> {
        Ok(mul_sd(&self.invert_svar(b)?, a))
    }

    /// [`div_vv`](super::ops::div_vv) with the inverse confirmed.
    pub fn div_vv(&self, a: &Var, b: &Var) -> Result<Var, AlgebraError> {
        Ok(mul_vv(a, &self.invert_var(b)?))
    }
}
