//! types.rs
//! Displacements, dense covariances and the packed symmetric covariance.

use approx::{AbsDiffEq, RelativeEq};
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// Singularity / symmetry tolerance shared by every routine in this module.
/// `100 * EPSILON` proved too tight for real survey data.
pub const THRESHOLD: f64 = f64::EPSILON * 1000.0;

/// A displacement between two stations (x, y, z) in survey units.
pub type Delta = Vector3<f64>;

/// A dense 3x3 covariance matrix. Used for products and inverses.
pub type Var = Matrix3<f64>;

/// Packed symmetric 3x3 covariance matrix.
///
/// Only the six independent terms are stored:
///
/// ```text
/// | xx xy xz |     [0] = xx   [3] = xy
/// | xy yy yz |     [1] = yy   [4] = xz
/// | xz yz zz |     [2] = zz   [5] = yz
/// ```
///
/// Element `(i, j)` lives at `i` on the diagonal and at `2 + i + j` off it,
/// so the matrix is symmetric by construction.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SVar([f64; 6]);

impl SVar {
    pub const ZERO: SVar = SVar([0.0; 6]);

    pub fn new(xx: f64, yy: f64, zz: f64, xy: f64, xz: f64, yz: f64) -> Self {
        Self([xx, yy, zz, xy, xz, yz])
    }

    /// Uncorrelated variances only.
    pub fn diagonal(vx: f64, vy: f64, vz: f64) -> Self {
        Self::new(vx, vy, vz, 0.0, 0.0, 0.0)
    }

    /// Builds from the argument order the reading layer hands over
    /// (`vx, vy, vz, cyz, czx, cxy`).
    pub fn from_observation(vx: f64, vy: f64, vz: f64, cyz: f64, czx: f64, cxy: f64) -> Self {
        Self::new(vx, vy, vz, cxy, czx, cyz)
    }

    pub fn identity() -> Self {
        Self::diagonal(1.0, 1.0, 1.0)
    }

    #[inline(always)]
    fn slot(i: usize, j: usize) -> usize {
        debug_assert!(i < 3 && j < 3);
        if i == j {
            i
        } else {
            2 + i + j
        }
    }

    #[inline(always)]
    pub fn at(&self, i: usize, j: usize) -> f64 {
        self.0[Self::slot(i, j)]
    }

    #[inline(always)]
    pub(crate) fn set(&mut self, i: usize, j: usize, value: f64) {
        self.0[Self::slot(i, j)] = value;
    }

    pub fn xx(&self) -> f64 { self.0[0] }
    pub fn yy(&self) -> f64 { self.0[1] }
    pub fn zz(&self) -> f64 { self.0[2] }
    pub fn xy(&self) -> f64 { self.0[3] }
    pub fn xz(&self) -> f64 { self.0[4] }
    pub fn yz(&self) -> f64 { self.0[5] }

    pub fn as_array(&self) -> &[f64; 6] {
        &self.0
    }

    /// True iff every packed term is exactly zero. Equate legs carry no
    /// measurement uncertainty, so this is how they are recognised.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&v| v == 0.0)
    }

    /// Expands to a dense matrix.
    pub fn to_dense(&self) -> Var {
        Var::from_fn(|i, j| self.at(i, j))
    }

    /// Determinant by cofactor expansion along the first column.
    pub fn determinant(&self) -> f64 {
        let (a, b, c) = (self.xx(), self.yy(), self.zz());
        let (d, e, f) = (self.xy(), self.xz(), self.yz());
        a * (b * c - f * f) + d * (e * f - c * d) + e * (d * f - b * e)
    }
}

impl Add for SVar {
    type Output = SVar;

    fn add(self, rhs: SVar) -> SVar {
        let mut out = self;
        for (o, r) in out.0.iter_mut().zip(rhs.0.iter()) {
            *o += r;
        }
        out
    }
}

impl Sub for SVar {
    type Output = SVar;

    fn sub(self, rhs: SVar) -> SVar {
        let mut out = self;
        for (o, r) in out.0.iter_mut().zip(rhs.0.iter()) {
            *o -= r;
        }
        out
    }
}

impl Mul<f64> for SVar {
    type Output = SVar;

    fn mul(self, c: f64) -> SVar {
        SVar(self.0.map(|v| v * c))
    }
}

impl Neg for SVar {
    type Output = SVar;

    fn neg(self) -> SVar {
        self * -1.0
    }
}

impl AbsDiffEq for SVar {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for SVar {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}

/// Determinant of a dense matrix using the same cyclic cofactor expansion as
/// the inverse, so the two agree on which matrices are singular.
pub fn dense_determinant(v: &Var) -> f64 {
    (0..3)
        .map(|i| {
            let (i1, i2) = ((i + 1) % 3, (i + 2) % 3);
            v[(i, 0)] * (v[(i1, 1)] * v[(i2, 2)] - v[(i1, 2)] * v[(i2, 1)])
        })
        .sum()
}
