//! In-use code collection.
//!
//! Before asking the remote allocator for a code, the provider tells it
//! which codes are already taken in the session. That set is built fresh for
//! every request from three sources, in this order:
//!
//! 1. Codes this process obtained from the remote allocator earlier
//!    ([`IssuedCodes`]). The host rosters can lag behind a brand-new
//!    assignment, so these are tracked locally.
//! 2. Transponder codes in the aircraft roster.
//! 3. Controller-assigned codes in the controller data roster.
//!
//! The result is deduplicated in first-seen order. `0000`, `7000` and `1000`
//! are dropped (they are not meaningful collisions), and roster entries that
//! are not valid squawk codes are skipped.
//!
//! ```rust
//! use std::sync::Arc;
//! use neo_ccams::collector::{InUseCollector, IssuedCodes};
//! use neo_ccams::hal::{MockAircraftRoster, MockControllerData};
//! use neo_ccams::model::{Aircraft, ControllerData};
//!
//! let aircraft = Arc::new(MockAircraftRoster::new(vec![
//!     Aircraft::new("AFR1", "2201"),
//!     Aircraft::new("AFR2", "7000"),
//! ]));
//! let controller = Arc::new(MockControllerData::new(vec![
//!     ControllerData::new("AFR3", "2201"),
//!     ControllerData::new("AFR4", "3402"),
//! ]));
//! let collector = InUseCollector::new(aircraft, controller, Arc::new(IssuedCodes::new()));
//!
//! assert_eq!(collector.collect().to_query_value(), "2201,3402");
//! ```
//!
//! # Concurrency
//!
//! [`IssuedCodes`] is the only shared mutable state in the assignment path.
//! Reads (here) and appends (after a successful allocation) each take the
//! lock briefly; the lock is never held across a network call. Reading and
//! then appending is not one atomic step, so two near-simultaneous requests
//! may both miss each other's new code. That window is accepted.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexSet;
use parking_lot::Mutex;

use crate::squawk::SquawkCode;
use crate::traits::{AircraftRoster, ControllerDataRoster};

// ============================================================================
// Issued Codes
// ============================================================================

/// Codes this process obtained from the remote allocator in this session.
#[derive(Debug, Default)]
pub struct IssuedCodes {
    codes: Mutex<Vec<SquawkCode>>,
}

impl IssuedCodes {
    /// Empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a code. Recording the same code twice keeps one entry.
    pub fn record(&self, code: SquawkCode) {
        let mut codes = self.codes.lock();
        if !codes.contains(&code) {
            codes.push(code);
        }
    }

    /// Copy of the list, in issue order.
    pub fn snapshot(&self) -> Vec<SquawkCode> {
        self.codes.lock().clone()
    }

    /// Whether `code` was issued in this session.
    pub fn contains(&self, code: &SquawkCode) -> bool {
        self.codes.lock().contains(code)
    }

    /// Number of codes issued.
    pub fn len(&self) -> usize {
        self.codes.lock().len()
    }

    /// `true` if nothing has been issued.
    pub fn is_empty(&self) -> bool {
        self.codes.lock().is_empty()
    }
}

// ============================================================================
// In-Use Set
// ============================================================================

/// Codes already in use, deduplicated, in first-seen order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InUseCodeSet {
    codes: IndexSet<SquawkCode>,
}

impl InUseCodeSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a code unless it is a conspicuity code or already present.
    /// Returns `true` if the code was added.
    pub fn insert(&mut self, code: SquawkCode) -> bool {
        if code.is_conspicuity() {
            return false;
        }
        self.codes.insert(code)
    }

    /// Parse and add a roster value. Invalid values are ignored.
    pub fn insert_reported(&mut self, reported: &str) -> bool {
        match SquawkCode::parse(reported) {
            Ok(code) => self.insert(code),
            Err(_) => false,
        }
    }

    /// Whether `code` is in the set.
    pub fn contains(&self, code: &SquawkCode) -> bool {
        self.codes.contains(code)
    }

    /// Number of codes.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// `true` if no codes are in use.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Iterate in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &SquawkCode> {
        self.codes.iter()
    }

    /// Comma-joined list used as the `codes` query value.
    pub fn to_query_value(&self) -> String {
        let mut out = String::with_capacity(self.codes.len() * 5);
        for (i, code) in self.codes.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(code.as_str());
        }
        out
    }
}

impl Extend<SquawkCode> for InUseCodeSet {
    fn extend<I: IntoIterator<Item = SquawkCode>>(&mut self, iter: I) {
        for code in iter {
            self.insert(code);
        }
    }
}

impl FromIterator<SquawkCode> for InUseCodeSet {
    fn from_iter<I: IntoIterator<Item = SquawkCode>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

// ============================================================================
// Collector
// ============================================================================

/// Builds an [`InUseCodeSet`] from the host rosters and the issued-code list.
#[derive(Clone)]
pub struct InUseCollector {
    aircraft: Arc<dyn AircraftRoster>,
    controller_data: Arc<dyn ControllerDataRoster>,
    issued: Arc<IssuedCodes>,
}

impl InUseCollector {
    /// Create a collector over the given rosters.
    pub fn new(
        aircraft: Arc<dyn AircraftRoster>,
        controller_data: Arc<dyn ControllerDataRoster>,
        issued: Arc<IssuedCodes>,
    ) -> Self {
        Self {
            aircraft,
            controller_data,
            issued,
        }
    }

    /// Collect every code currently in use.
    pub fn collect(&self) -> InUseCodeSet {
        let mut set: InUseCodeSet = self.issued.snapshot().into_iter().collect();

        for aircraft in self.aircraft.all() {
            set.insert_reported(&aircraft.squawk);
        }
        for data in self.controller_data.all() {
            set.insert_reported(&data.assigned_squawk);
        }

        set
    }
}

impl fmt::Debug for InUseCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InUseCollector")
            .field("issued", &self.issued.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{MockAircraftRoster, MockControllerData};
    use crate::model::{Aircraft, ControllerData};

    fn code(s: &str) -> SquawkCode {
        s.parse().unwrap()
    }

    fn collector(
        aircraft: Vec<Aircraft>,
        data: Vec<ControllerData>,
    ) -> (InUseCollector, Arc<MockAircraftRoster>, Arc<IssuedCodes>) {
        let roster = Arc::new(MockAircraftRoster::new(aircraft));
        let issued = Arc::new(IssuedCodes::new());
        let collector = InUseCollector::new(
            roster.clone(),
            Arc::new(MockControllerData::new(data)),
            issued.clone(),
        );
        (collector, roster, issued)
    }

    #[test]
    fn excludes_conspicuity_and_invalid_codes() {
        let (collector, _, _) = collector(
            vec![
                Aircraft::new("A", "0000"),
                Aircraft::new("B", "7000"),
                Aircraft::new("C", "1000"),
                Aircraft::new("D", ""),
                Aircraft::new("E", "12"),
                Aircraft::new("F", "9999"),
                Aircraft::new("G", "4521"),
            ],
            vec![ControllerData::new("H", "0000")],
        );

        let set = collector.collect();
        assert_eq!(set.len(), 1);
        assert!(set.contains(&code("4521")));
    }

    #[test]
    fn dedups_in_first_seen_order() {
        let (collector, _, issued) = collector(
            vec![Aircraft::new("A", "3301"), Aircraft::new("B", "2201")],
            vec![
                ControllerData::new("A", "3301"),
                ControllerData::new("C", "5501"),
                ControllerData::new("D", "6601"),
            ],
        );
        issued.record(code("6601"));

        assert_eq!(collector.collect().to_query_value(), "6601,3301,2201,5501");
    }

    #[test]
    fn collect_is_idempotent_without_state_change() {
        let (collector, _, issued) = collector(
            vec![Aircraft::new("A", "3301")],
            vec![ControllerData::new("B", "4401")],
        );
        issued.record(code("5501"));
        assert_eq!(collector.collect(), collector.collect());
    }

    #[test]
    fn issued_codes_appear_before_roster_catches_up() {
        let (collector, roster, issued) = collector(vec![], vec![]);
        assert!(collector.collect().is_empty());

        issued.record(code("2345"));
        assert!(collector.collect().contains(&code("2345")));

        // Roster now reports the same code: still a single entry.
        roster.set(vec![Aircraft::new("AFR1", "2345")]);
        assert_eq!(collector.collect().len(), 1);
    }

    #[test]
    fn issued_codes_record_once() {
        let issued = IssuedCodes::new();
        issued.record(code("1234"));
        issued.record(code("1234"));
        issued.record(code("4321"));
        assert_eq!(issued.len(), 2);
        assert_eq!(issued.snapshot(), vec![code("1234"), code("4321")]);
    }

    #[test]
    fn empty_set_serializes_empty() {
        assert_eq!(InUseCodeSet::new().to_query_value(), "");
    }
}
