//! The central validator that runs every structural rule over a network.
use super::error::ValidationError;
use super::rules::{bookkeeping, pairing};
use crate::diagnostics::Reporter;
use crate::graph::Network;

/// Walks every live station and collects all broken invariants rather than
/// stopping at the first.
pub struct Validator<'a, R: Reporter> {
    network: &'a Network<R>,
}

impl<'a, R: Reporter> Validator<'a, R> {
    pub fn new(network: &'a Network<R>) -> Self {
        Self { network }
    }

    /// # Returns
    /// - `Ok(())` if the network is well formed.
    /// - `Err(Vec<ValidationError>)` with everything found otherwise.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = bookkeeping::validate_list(self.network);

        for id in self.network.stations() {
            let stn = self.network.station(id);
            errors.extend(pairing::validate_pairing(self.network, id, stn));
            if let Some(err) = bookkeeping::validate_bookkeeping(self.network, id, stn) {
                errors.push(err);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            tracing::warn!(count = errors.len(), "network failed validation");
            Err(errors)
        }
    }
}
