use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlgebraError {
    #[error("covariance matrix is singular (determinant {det:e})")]
    Singular { det: f64 },
}
