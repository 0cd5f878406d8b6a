//! Validation rule for leg pairing: every leg has a partner that points back,
//! slots are packed, and the pair agrees on where the data lives.

use crate::diagnostics::Reporter;
use crate::graph::{LegRef, Network, Station, LEG_SLOTS};
use crate::store::StationId;
use crate::validation::error::{ValidationError, ValidationErrorType};

pub(crate) fn validate_pairing<R: Reporter>(
    net: &Network<R>,
    id: StationId,
    stn: &Station,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let error = |error_type, message: String| ValidationError { station: id, error_type, message };

    let degree = stn.degree();
    if let Some(slot) = (degree..LEG_SLOTS).find(|&s| stn.legs[s].is_some()) {
        errors.push(error(
            ValidationErrorType::SlotGap,
            format!("slot {slot} is occupied but slot {degree} is empty"),
        ));
    }

    for (slot, leg) in stn.legs.iter().enumerate() {
        let Some(leg) = leg else { continue };
        let Some(partner) = net.leg(LegRef::new(leg.to, leg.reverse as usize)) else {
            errors.push(error(
                ValidationErrorType::UnmatchedLeg,
                format!("slot {slot} names slot {} of station {} which is empty", leg.reverse, leg.to.0),
            ));
            continue;
        };
        if partner.to != id || partner.reverse as usize != slot {
            errors.push(error(
                ValidationErrorType::UnmatchedLeg,
                format!(
                    "slot {slot} -> {}[{}] but that leg points to {}[{}]",
                    leg.to.0, leg.reverse, partner.to.0, partner.reverse
                ),
            ));
            continue;
        }

        // The remaining checks are symmetric; report them once per pair.
        if (id.0, slot as u8) > (leg.to.0, leg.reverse) {
            continue;
        }
        if leg.data_here() == partner.data_here() {
            let which = if leg.data_here() { "both" } else { "neither" };
            errors.push(error(
                ValidationErrorType::DataPlacement,
                format!("{which} ends of the leg in slot {slot} hold data"),
            ));
        }
        if leg.fake != partner.fake {
            errors.push(error(
                ValidationErrorType::FakeMismatch,
                format!("leg in slot {slot} and its partner disagree on being fake"),
            ));
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{Delta, SVar};
    use crate::graph::Observation;

    fn two_station_network() -> (Network, StationId, StationId) {
        let mut net = Network::new();
        let (a, b) = (net.prefix("a"), net.prefix("b"));
        net.add_leg(a, b, &Observation::new(Delta::new(1.0, 0.0, 0.0), SVar::identity())).unwrap();
        let (sa, sb) = (net.station_for(a), net.station_for(b));
        (net, sa, sb)
    }

    #[test]
    fn test_well_formed_pair_passes() {
        let (net, sa, sb) = two_station_network();
        assert!(validate_pairing(&net, sa, net.station(sa)).is_empty());
        assert!(validate_pairing(&net, sb, net.station(sb)).is_empty());
    }

    #[test]
    fn test_detects_broken_pairs() {
        let (net, sa, sb) = two_station_network();

        let mut gapped = net.station(sa).clone();
        gapped.legs.swap(0, 2);
        let errors = validate_pairing(&net, sa, &gapped);
        assert!(errors.iter().any(|e| e.error_type == ValidationErrorType::SlotGap));
        assert!(errors.iter().any(|e| e.error_type == ValidationErrorType::UnmatchedLeg));

        // Neither end holding data is reported from the lower end only.
        let mut stripped = net.station(sa).clone();
        if let Some(leg) = stripped.legs[0].as_mut() {
            leg.data = None;
        }
        let errors = validate_pairing(&net, sa, &stripped);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error_type, ValidationErrorType::DataPlacement);
        assert!(validate_pairing(&net, sb, net.station(sb)).is_empty());

        let mut faked = net.station(sa).clone();
        if let Some(leg) = faked.legs[0].as_mut() {
            leg.fake = true;
        }
        let errors = validate_pairing(&net, sa, &faked);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error_type, ValidationErrorType::FakeMismatch);
    }
}
