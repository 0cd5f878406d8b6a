//! network.rs
//! The station/leg graph: name resolution, station creation, slot allocation
//! with node splitting, and leg installation.

use super::context::SurveyContext;
use super::edge::{Leg, LegData, LegRef, Observation};
use super::list::StationList;
use super::node::Station;
use crate::algebra::{Checks, Delta, SVar};
use crate::config::NetworkConfig;
use crate::diagnostics::{Diagnostic, InputError, InputWarning, Reporter, TracingReporter};
use crate::store::{PosId, Position, PositionArena, PrefixId, PrefixRegistry, StationId};
use serde::{Deserialize, Serialize};

/// Running totals, as reported to the user after processing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    /// Named stations (split halves are not counted again).
    pub stations: usize,
    /// Survey legs. Fake legs from equates and splits are excluded.
    pub legs: usize,
    pub equates: usize,
    /// Survey legs whose observation tripped an instrumentation scan.
    pub suspect_legs: usize,
}

/// Which endpoint gets its station created first. Only affects list order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CreateOrder {
    #[default]
    FromFirst,
    ToFirst,
}

#[derive(Debug)]
pub struct Network<R: Reporter = TracingReporter> {
    pub(crate) prefixes: PrefixRegistry,
    pub(crate) positions: PositionArena,
    pub(crate) stations: Vec<Station>,
    pub(crate) list: StationList,
    pub(crate) counts: Counts,
    pub(crate) context: SurveyContext,
    pub(crate) checks: Checks,
    pub(crate) reporter: R,
}

impl Network<TracingReporter> {
    pub fn new() -> Self {
        Self::with_reporter(NetworkConfig::default(), TracingReporter)
    }
}

impl Default for Network<TracingReporter> {
    fn default() -> Self { Self::new() }
}

impl<R: Reporter> Network<R> {
    pub fn with_reporter(config: NetworkConfig, reporter: R) -> Self {
        Self {
            prefixes: PrefixRegistry::new(),
            positions: PositionArena::new(),
            stations: Vec::new(),
            list: StationList::new(),
            counts: Counts::default(),
            context: SurveyContext::with_flags(config.default_flags),
            checks: Checks::new(config.checks),
            reporter,
        }
    }

    // --- Accessors ---
    pub fn counts(&self) -> Counts { self.counts }
    pub fn station_count(&self) -> usize { self.counts.stations }
    pub fn leg_count(&self) -> usize { self.counts.legs }
    pub fn equate_count(&self) -> usize { self.counts.equates }
    pub fn node_count(&self) -> usize { self.stations.len() }
    pub fn checks(&self) -> &Checks { &self.checks }
    pub fn prefixes(&self) -> &PrefixRegistry { &self.prefixes }
    pub fn positions(&self) -> &PositionArena { &self.positions }
    pub fn list(&self) -> &StationList { &self.list }
    pub fn context(&self) -> &SurveyContext { &self.context }
    pub fn context_mut(&mut self) -> &mut SurveyContext { &mut self.context }
    pub fn reporter(&self) -> &R { &self.reporter }
    pub fn reporter_mut(&mut self) -> &mut R { &mut self.reporter }
    pub fn into_reporter(self) -> R { self.reporter }

    pub fn station(&self, id: StationId) -> &Station { &self.stations[id.index()] }

    /// Live stations in list order (most recently created first).
    pub fn stations(&self) -> impl Iterator<Item = StationId> + '_ {
        self.list.iter()
    }

    // --- Names and positions ---

    /// Resolves a dotted name, creating any missing components.
    pub fn prefix(&mut self, name: &str) -> PrefixId {
        self.prefixes.find_or_insert(name)
    }

    pub fn lookup(&self, name: &str) -> Option<PrefixId> {
        self.prefixes.lookup(name)
    }

    pub fn format_name(&self, pfx: PrefixId) -> String {
        self.prefixes.format_name(pfx)
    }

    pub fn station_name(&self, stn: StationId) -> String {
        self.format_name(self.station(stn).name)
    }

    /// The first station created for a name, without creating one.
    pub fn station_of(&self, pfx: PrefixId) -> Option<StationId> {
        self.prefixes.get(pfx).stn
    }

    pub fn pos_id(&self, pfx: PrefixId) -> Option<PosId> {
        self.prefixes.get(pfx).pos
    }

    pub fn position(&self, pfx: PrefixId) -> Option<&Position> {
        self.positions.get(self.pos_id(pfx)?)
    }

    pub fn is_fixed(&self, pfx: PrefixId) -> bool {
        self.position(pfx).map_or(false, |p| p.fixed)
    }

    /// Pins a name to absolute coordinates. Fixing again at the same place is
    /// only a warning; anywhere else is an error and the first fix stands.
    pub fn fix_station(&mut self, pfx: PrefixId, coords: Delta) -> Result<(), InputError> {
        match self.pos_id(pfx) {
            None => {
                let id = self.positions.alloc(Position::fixed_at(coords));
                self.prefixes.get_mut(pfx).pos = Some(id);
            }
            Some(id) => {
                let Some(pos) = self.positions.get_mut(id) else {
                    bug!("prefix {} refers to released position {:?}", pfx.0, id);
                };
                if !pos.fixed {
                    *pos = Position::fixed_at(coords);
                } else if pos.coords == coords {
                    let station = self.format_name(pfx);
                    self.warn(InputWarning::RefixedSameCoordinates { station });
                } else {
                    let station = self.format_name(pfx);
                    return Err(self.fail(InputError::AlreadyFixed { station }));
                }
            }
        }
        tracing::debug!(station = %self.format_name(pfx), x = coords.x, y = coords.y, z = coords.z, "fixed");
        Ok(())
    }

    // --- Reporting ---

    pub(crate) fn warn(&mut self, warning: InputWarning) {
        let diag = Diagnostic::from_warning(&warning, self.context.location.clone());
        self.reporter.report(diag);
    }

    /// Reports and hands the error back for the caller to return.
    pub(crate) fn fail(&mut self, err: InputError) -> InputError {
        let diag = Diagnostic::from_error(&err, self.context.location.clone());
        self.reporter.report(diag);
        err
    }

    // --- Stations ---

    fn push_station(&mut self, name: PrefixId) -> StationId {
        let id = StationId::new(self.stations.len());
        self.stations.push(Station::new(name));
        self.list.insert_at_head(id);
        id
    }

    /// Returns the station for a name, creating it (and an unfixed position,
    /// if the name has none yet) on first use.
    pub fn station_for(&mut self, pfx: PrefixId) -> StationId {
        if let Some(stn) = self.prefixes.get(pfx).stn {
            return stn;
        }
        let stn = self.push_station(pfx);
        if self.prefixes.get(pfx).pos.is_none() {
            let pos = self.positions.alloc(Position::unfixed());
            self.prefixes.get_mut(pfx).pos = Some(pos);
        }
        self.prefixes.get_mut(pfx).stn = Some(stn);
        self.counts.stations += 1;
        tracing::debug!(station = %self.format_name(pfx), id = stn.0, "created station");
        stn
    }

    /// Takes a station off the live list, e.g. once a solver reduction has
    /// folded it into a neighbour. The list cursor is kept valid.
    pub fn unlink_station(&mut self, stn: StationId) -> bool {
        self.list.remove(stn)
    }

    pub fn rewind_cursor(&mut self) {
        self.list.rewind();
    }

    /// Next station under the list cursor. Safe to call `unlink_station`
    /// between steps.
    pub fn next_station(&mut self) -> Option<StationId> {
        self.list.advance()
    }

    // --- Legs ---

    pub fn leg(&self, r: LegRef) -> Option<&Leg> {
        self.stations.get(r.station.index())?.legs[r.slot()].as_ref()
    }

    fn leg_or_bug(&self, r: LegRef) -> &Leg {
        match self.leg(r) {
            Some(leg) => leg,
            None => bug!("no leg at station {} slot {}", r.station.0, r.slot),
        }
    }

    /// The partner record at the other end. O(1).
    pub fn reverse(&self, r: LegRef) -> LegRef {
        let leg = self.leg_or_bug(r);
        LegRef::new(leg.to, leg.reverse as usize)
    }

    /// The authoritative measurement for `r` and whether it was read from the
    /// reverse direction.
    fn measurement(&self, r: LegRef) -> (&LegData, bool) {
        if let Some(data) = self.leg_or_bug(r).data() {
            return (data, false);
        }
        let rev = self.reverse(r);
        match self.leg_or_bug(rev).data() {
            Some(data) => (data, true),
            None => bug!(
                "neither direction of leg {}[{}] <-> {}[{}] holds data",
                r.station.0, r.slot, rev.station.0, rev.slot
            ),
        }
    }

    /// Copies a leg out as seen from `r.station`: reversed legs get their
    /// displacement negated, covariance is unchanged.
    pub fn copy_leg(&self, r: LegRef) -> LegData {
        let (data, reversed) = self.measurement(r);
        let mut out = *data;
        if reversed {
            out.delta = -out.delta;
        }
        out
    }

    /// Adds the leg at `r` (viewed from `r.station`) into `target`.
    pub fn accumulate_leg(&self, target: &mut LegData, r: LegRef) {
        let (data, reversed) = self.measurement(r);
        target.accumulate(data, reversed);
    }

    /// Covariance of a leg regardless of which direction stores it.
    pub fn leg_var(&self, r: LegRef) -> &SVar {
        &self.measurement(r).0.var
    }

    /// Returns a station with a free slot and that slot's index.
    ///
    /// When all three slots are taken the station is split: a new station with
    /// the same name takes over the leg in slot 0, and the two are joined by a
    /// zero fake leg. Callers must carry on with the returned station, which
    /// may differ from the one passed in.
    pub fn free_leg_slot(&mut self, stn: StationId) -> (StationId, usize) {
        if let Some(slot) = self.stations[stn.index()].first_free_slot() {
            return (stn, slot);
        }

        let old = stn;
        let name = self.stations[old.index()].name;
        let new = self.push_station(name);

        let Some(moved) = self.stations[old.index()].legs[0].take() else {
            bug!("full station {} has an empty slot 0", old.0);
        };
        // Correct the partner so it points at the station now holding the leg.
        match self.stations[moved.to.index()].legs[moved.reverse as usize].as_mut() {
            Some(partner) => partner.to = new,
            None => bug!("leg from station {} has no partner at {}", old.0, moved.to.0),
        }

        let link = LegData { delta: Delta::zeros(), var: SVar::ZERO, flags: self.context.flags };
        let fresh = &mut self.stations[new.index()];
        fresh.legs[0] = Some(moved);
        fresh.legs[1] = Some(Leg::backward(old, 0, true));
        fresh.legs[2] = None;
        self.stations[old.index()].legs[0] = Some(Leg::forward(new, 1, true, link));

        tracing::debug!(station = %self.format_name(name), old = old.0, new = new.0, "split station");
        (new, 2)
    }

    /// Adds a survey leg between two names, creating stations as needed.
    /// A leg from a name to itself is rejected and the graph left untouched.
    pub fn add_leg(&mut self, from: PrefixId, to: PrefixId, obs: &Observation) -> Result<(), InputError> {
        self.add_leg_ordered(from, to, obs, CreateOrder::FromFirst)
    }

    pub fn add_leg_ordered(
        &mut self,
        from: PrefixId,
        to: PrefixId,
        obs: &Observation,
        order: CreateOrder,
    ) -> Result<(), InputError> {
        if from == to {
            let station = self.format_name(from);
            return Err(self.fail(InputError::SameStationLeg { station }));
        }
        let mut findings = self.checks.delta(&obs.delta);
        findings.extend(self.checks.svar(&obs.var));
        if !findings.is_empty() {
            self.counts.suspect_legs += 1;
            tracing::warn!(
                from = %self.format_name(from),
                to = %self.format_name(to),
                ?findings,
                "suspicious leg observation"
            );
        }

        let (fr, to) = match order {
            CreateOrder::FromFirst => {
                let fr = self.station_for(from);
                (fr, self.station_for(to))
            }
            CreateOrder::ToFirst => {
                let to = self.station_for(to);
                (self.station_for(from), to)
            }
        };
        self.counts.legs += 1;
        self.install_leg(fr, to, obs, false);
        Ok(())
    }

    /// Joins two existing stations with a leg that is not survey data (no
    /// effect on the leg count). The stations must have different names.
    pub fn add_fake_leg(&mut self, fr: StationId, to: StationId, obs: &Observation) {
        self.install_leg(fr, to, obs, true);
    }

    pub(crate) fn install_leg(&mut self, fr: StationId, to: StationId, obs: &Observation, fake: bool) {
        let (fr_name, to_name) = (self.station(fr).name, self.station(to).name);
        if fr_name == to_name {
            bug!("leg with station '{}' at both ends reached the graph", self.format_name(fr_name));
        }

        let (fr, i) = self.free_leg_slot(fr);
        let (to, j) = self.free_leg_slot(to);

        let data = LegData { delta: obs.delta, var: obs.var, flags: self.context.flags };
        self.stations[fr.index()].legs[i] = Some(Leg::forward(to, j, fake, data));
        self.stations[to.index()].legs[j] = Some(Leg::backward(fr, i, fake));

        self.bump_shape(fr_name);
        self.bump_shape(to_name);
    }

    fn bump_shape(&mut self, pfx: PrefixId) {
        let prefix = self.prefixes.get_mut(pfx);
        let shape = prefix.shape + 1;
        prefix.shape = if shape < 1 { 1 - shape } else { shape };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use approx::assert_relative_eq;

    pub(crate) type TestNetwork = Network<Vec<Diagnostic>>;

    pub(crate) fn network() -> TestNetwork {
        Network::with_reporter(NetworkConfig::default(), Vec::new())
    }

    fn obs(dx: f64, dy: f64, dz: f64) -> Observation {
        Observation::new(Delta::new(dx, dy, dz), SVar::diagonal(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_station_created_once_with_unfixed_position() {
        let mut net = network();
        let a = net.prefix("cave.a");
        let s1 = net.station_for(a);
        let s2 = net.station_for(a);
        assert_eq!(s1, s2);
        assert_eq!(net.station_count(), 1);
        assert!(!net.is_fixed(a));
        assert!(net.position(a).is_some());
        assert_eq!(net.list().head(), Some(s1));
    }

    #[test]
    fn test_add_leg_installs_matched_pair() {
        let mut net = network();
        let (a, b) = (net.prefix("a"), net.prefix("b"));
        net.add_leg(a, b, &obs(1.0, 0.0, 0.0)).unwrap();

        let sa = net.station_for(a);
        let fwd = LegRef::new(sa, 0);
        let rev = net.reverse(fwd);
        assert_eq!(rev.station, net.station_for(b));
        assert_eq!(net.reverse(rev), fwd);
        assert!(net.leg(fwd).unwrap().data_here());
        assert!(!net.leg(rev).unwrap().data_here());
        assert_eq!(net.leg_count(), 1);
        assert_eq!(net.prefixes().get(a).shape, 1);
    }

    #[test]
    fn test_same_station_leg_is_rejected() {
        let mut net = network();
        let a = net.prefix("a");
        net.context_mut().at("main.svx", 7);
        let err = net.add_leg(a, a, &obs(1.0, 0.0, 0.0)).unwrap_err();
        assert_eq!(err.code(), 50);
        assert_eq!(net.leg_count(), 0);
        assert_eq!(net.node_count(), 0);

        let reports = net.reporter();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].severity, Severity::Error);
        assert_eq!(reports[0].location.as_ref().unwrap().line, 7);
    }

    #[test]
    fn test_reverse_copy_negates_displacement_only() {
        let mut net = network();
        let (a, b, c) = (net.prefix("A"), net.prefix("B"), net.prefix("C"));
        net.add_leg(a, b, &obs(1.0, 0.0, 0.0)).unwrap();
        net.add_leg(b, c, &obs(0.0, 1.0, 0.0)).unwrap();

        let fwd = LegRef::new(net.station_for(a), 0);
        let rev = net.reverse(fwd);
        let forward = net.copy_leg(fwd);
        let backward = net.copy_leg(rev);
        assert_eq!(backward.delta, Delta::new(-1.0, 0.0, 0.0));
        assert_eq!(backward.var, forward.var);
        assert_eq!(backward.var, SVar::diagonal(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_accumulate_walks_a_traverse() {
        let mut net = network();
        let (a, b, c) = (net.prefix("A"), net.prefix("B"), net.prefix("C"));
        net.add_leg(a, b, &obs(1.0, 0.0, 0.0)).unwrap();
        net.add_leg(c, b, &obs(0.0, -1.0, 0.0)).unwrap();

        // A -> B forward, then B -> C against the stored direction.
        let sb = net.station_for(b);
        let ab = net.reverse(LegRef::new(sb, 0));
        let mut total = net.copy_leg(ab);
        net.accumulate_leg(&mut total, LegRef::new(sb, 1));
        assert_relative_eq!(total.delta, Delta::new(1.0, 1.0, 0.0));
        assert_eq!(total.var, SVar::diagonal(2.0, 2.0, 2.0));
    }

    #[test]
    fn test_fourth_leg_splits_station() {
        let mut net = network();
        let hub = net.prefix("hub");
        let original = net.station_for(hub);
        for (i, name) in ["n1", "n2", "n3"].iter().enumerate() {
            let p = net.prefix(name);
            net.add_leg(hub, p, &obs(i as f64, 1.0, 0.0)).unwrap();
        }
        assert_eq!(net.station(original).first_free_slot(), None);

        let (split, slot) = net.free_leg_slot(original);
        assert_ne!(split, original);
        assert_eq!(slot, 2);
        assert_eq!(net.station_name(split), net.station_name(original));

        // Zero fake link both ways between the halves.
        let link = LegRef::new(original, 0);
        let back = net.reverse(link);
        assert_eq!(back, LegRef::new(split, 1));
        assert!(net.leg(link).unwrap().fake && net.leg(back).unwrap().fake);
        assert!(net.leg_var(link).is_zero());
        assert!(net.leg_var(back).is_zero());
        assert_eq!(net.copy_leg(back).delta, Delta::zeros());

        // The relocated leg's partner now points at the new station.
        let moved = LegRef::new(split, 0);
        assert_eq!(net.reverse(net.reverse(moved)), moved);
        assert_eq!(net.station_count(), 4);
        assert_eq!(net.node_count(), 5);
    }

    #[test]
    fn test_many_legs_at_one_name_keep_degree_three() {
        let mut net = network();
        let hub = net.prefix("hub");
        for i in 0..10 {
            let p = net.prefix(&format!("spoke{i}"));
            net.add_leg(hub, p, &obs(1.0, i as f64, 0.0)).unwrap();
        }
        assert_eq!(net.leg_count(), 10);
        assert_eq!(net.prefixes().get(hub).shape, 10);
        for stn in net.stations() {
            assert!(net.station(stn).degree() <= 3);
        }
        let halves = net.stations().filter(|&s| net.station(s).name == hub).count();
        assert_eq!(halves, 8);
        assert!(crate::validation::Validator::new(&net).validate().is_ok());
    }

    #[test]
    fn test_suspicious_observation_is_counted_but_kept() {
        let config = NetworkConfig {
            checks: crate::config::CheckConfig { nan_scan: true, singular_scan: true, ..Default::default() },
            ..Default::default()
        };
        let mut net = Network::with_reporter(config, Vec::<Diagnostic>::new());
        let (a, b, c) = (net.prefix("a"), net.prefix("b"), net.prefix("c"));
        net.add_leg(a, b, &Observation::new(Delta::new(f64::NAN, 0.0, 0.0), SVar::identity())).unwrap();
        net.add_leg(b, c, &Observation::new(Delta::new(1.0, 0.0, 0.0), SVar::diagonal(1.0, 1.0, 0.0))).unwrap();
        net.add_leg(a, c, &obs(1.0, 0.0, 0.0)).unwrap();

        assert_eq!(net.counts().suspect_legs, 2);
        assert_eq!(net.leg_count(), 3);
        // Scan findings are instrumentation, not user diagnostics.
        assert!(net.reporter().is_empty());
    }

    #[test]
    #[should_panic(expected = "holds data")]
    fn test_copying_a_leg_with_no_data_side_is_fatal() {
        let mut net = network();
        let (a, b) = (net.prefix("a"), net.prefix("b"));
        net.add_leg(a, b, &obs(1.0, 0.0, 0.0)).unwrap();
        let sa = net.station_of(a).unwrap();
        if let Some(leg) = net.stations[sa.index()].legs[0].as_mut() {
            leg.data = None;
        }
        net.copy_leg(LegRef::new(sa, 0));
    }

    #[test]
    fn test_fake_leg_not_counted() {
        let mut net = network();
        let (a, b) = (net.prefix("a"), net.prefix("b"));
        let (sa, sb) = (net.station_for(a), net.station_for(b));
        net.add_fake_leg(sa, sb, &Observation::zero());
        assert_eq!(net.leg_count(), 0);
        assert_eq!(net.station(sa).degree(), 1);
        assert!(net.leg(LegRef::new(sa, 0)).unwrap().fake);
    }

    #[test]
    fn test_to_first_order_changes_list_order_only() {
        let mut net = network();
        let (a, b) = (net.prefix("a"), net.prefix("b"));
        net.add_leg_ordered(a, b, &obs(1.0, 0.0, 0.0), CreateOrder::ToFirst).unwrap();
        // b created first, so a is at the head.
        assert_eq!(net.list().head(), net.station_of(a));
        let sa = net.station_of(a).unwrap();
        assert!(net.leg(LegRef::new(sa, 0)).unwrap().data_here());
    }

    #[test]
    fn test_context_flags_stamped_on_legs() {
        let mut net = network();
        let (a, b) = (net.prefix("a"), net.prefix("b"));
        net.context_mut().flags = crate::graph::LegFlags(0b101);
        net.add_leg(a, b, &obs(1.0, 0.0, 0.0)).unwrap();
        let sa = net.station_for(a);
        let leg = net.copy_leg(LegRef::new(sa, 0));
        assert_eq!(leg.flags, crate::graph::LegFlags(0b101));
    }

    #[test]
    fn test_fix_station_conflicts() {
        let mut net = network();
        let a = net.prefix("a");
        let here = Delta::new(10.0, 20.0, 30.0);
        net.fix_station(a, here).unwrap();
        assert!(net.is_fixed(a));

        net.fix_station(a, here).unwrap();
        assert_eq!(net.reporter().last().unwrap().code, 55);

        let err = net.fix_station(a, Delta::new(0.0, 0.0, 0.0)).unwrap_err();
        assert_eq!(err.code(), 46);
        assert_eq!(net.position(a).unwrap().coords, here);

        // Fixing before the station exists keeps the position on creation.
        let stn = net.station_for(a);
        assert!(net.is_fixed(net.station(stn).name));
    }

    #[test]
    fn test_cursor_walk_tolerates_unlinking() {
        let mut net = network();
        for name in ["a", "b", "c", "d"] {
            let p = net.prefix(name);
            net.station_for(p);
        }
        net.rewind_cursor();
        let mut visited = 0;
        while let Some(stn) = net.next_station() {
            visited += 1;
            net.unlink_station(stn);
        }
        assert_eq!(visited, 4);
        assert!(net.list().is_empty());
        // Counts record what was created, not what is live.
        assert_eq!(net.station_count(), 4);
    }
}
