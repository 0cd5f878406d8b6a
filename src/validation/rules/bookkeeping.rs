//! Validation rule for the side tables: each station's name must own a live
//! position and record a station of the same name.

use crate::diagnostics::Reporter;
use crate::graph::{Network, Station};
use crate::store::StationId;
use crate::validation::error::{ValidationError, ValidationErrorType};

pub(crate) fn validate_bookkeeping<R: Reporter>(
    net: &Network<R>,
    id: StationId,
    stn: &Station,
) -> Option<ValidationError> {
    let prefix = net.prefixes().get(stn.name);
    let name = net.format_name(stn.name);

    let problem = match (prefix.pos, prefix.stn) {
        (None, _) => format!("'{name}' has a station but no position"),
        (Some(pos), _) if !net.positions().is_live(pos) => {
            format!("'{name}' refers to released position {}", pos.0)
        }
        (_, None) => format!("'{name}' does not record its station"),
        (_, Some(first)) if net.station(first).name != stn.name => {
            format!("'{name}' records station {} which has another name", first.0)
        }
        _ => return None,
    };
    Some(ValidationError { station: id, error_type: ValidationErrorType::Bookkeeping, message: problem })
}

/// Checks the live list's back links and length.
pub(crate) fn validate_list<R: Reporter>(net: &Network<R>) -> Vec<ValidationError> {
    let list = net.list();
    let mut errors = Vec::new();
    let mut prev = None;
    let mut walked = 0;
    for stn in list.iter() {
        if list.prev_of(stn) != prev {
            errors.push(ValidationError {
                station: stn,
                error_type: ValidationErrorType::Bookkeeping,
                message: format!("list back link of station {} is broken", stn.0),
            });
        }
        prev = Some(stn);
        walked += 1;
    }
    if walked != list.len() {
        errors.push(ValidationError {
            station: list.head().unwrap_or_default(),
            error_type: ValidationErrorType::Bookkeeping,
            message: format!("list holds {walked} stations but records {}", list.len()),
        });
    }
    errors
}
