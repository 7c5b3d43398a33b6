//! Special-case code classification.
//!
//! Before any network access, a flight is checked against two fixed rules:
//!
//! 1. VFR flights get [`VFR_SQUAWK`](crate::squawk::VFR_SQUAWK) (`7000`).
//! 2. Flights departing from and arriving in the Mode-S region, filed with
//!    Mode-S capable transponder equipment, get
//!    [`MODE_S_SQUAWK`](crate::squawk::MODE_S_SQUAWK) (`1000`).
//!
//! The VFR rule is checked first. Both rules are pure and synchronous.
//!
//! ```rust
//! use neo_ccams::classifier::{classify, SpecialCode};
//!
//! assert_eq!(classify("V", "LFPG", "LFMN", "L"), Some(SpecialCode::Vfr));
//! assert_eq!(classify("I", "LFPG", "LFMN", "L"), Some(SpecialCode::ModeS));
//! assert_eq!(classify("I", "LFPG", "KJFK", "L"), None);
//! ```
//!
//! # Mode-S Region
//!
//! The airport rule is a closed list of ICAO prefixes: Belgium, Germany, the
//! Netherlands, Luxembourg, Poland minus a list of carved-out aerodromes, the
//! `EURM` sub-range, Croatia, Hungary, Italy, Czechia, Austria, Romania,
//! Slovakia, France without the `LFV*` range, and selected Swiss aerodromes.
//! It is matched against the whole identifier, case-sensitively.

use std::sync::LazyLock;

use fancy_regex::Regex;

use crate::model::Flightplan;
use crate::squawk::SquawkCode;

/// ICAO aerodrome pattern of the Mode-S region. Anchored at both ends.
pub const MODE_S_AIRPORT_PATTERN: &str = "^(?:(E([BDHLT]|P(?!CE|DA|DE|IR|KS|LK|LY|MB|MI|MM|OK|PR|PW|SN|TM)|URM)|L[DHIKORZ])[A-Z]{2}|LF[^V][A-Z]|LS(G[CG]|Z[BGHR]))$";

/// Transponder equipment letters that indicate Mode-S capability.
pub const MODE_S_EQUIPMENT: &[char] = &['E', 'H', 'I', 'L', 'P', 'S', 'X'];

static MODE_S_AIRPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(MODE_S_AIRPORT_PATTERN).expect("Mode-S airport pattern is a valid regex")
});

/// A fixed code that bypasses remote allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpecialCode {
    /// VFR conspicuity (`7000`).
    Vfr,
    /// Mode-S conspicuity (`1000`).
    ModeS,
}

impl SpecialCode {
    /// The code this special case maps to.
    pub fn code(self) -> SquawkCode {
        match self {
            Self::Vfr => SquawkCode::vfr(),
            Self::ModeS => SquawkCode::mode_s(),
        }
    }
}

/// Classify a flight. Returns `None` when a regular code must be allocated.
pub fn classify(
    flight_rule: &str,
    origin: &str,
    destination: &str,
    transponder_equipment: &str,
) -> Option<SpecialCode> {
    if flight_rule == crate::model::VFR_FLIGHT_RULE {
        return Some(SpecialCode::Vfr);
    }
    if is_mode_s(origin, destination, transponder_equipment) {
        return Some(SpecialCode::ModeS);
    }
    None
}

/// [`classify`] applied to a flightplan snapshot.
pub fn classify_flightplan(flightplan: &Flightplan) -> Option<SpecialCode> {
    classify(
        &flightplan.flight_rule,
        &flightplan.origin,
        &flightplan.destination,
        &flightplan.transponder_equipment,
    )
}

/// Both aerodromes inside the Mode-S region and Mode-S equipment filed.
pub fn is_mode_s(origin: &str, destination: &str, transponder_equipment: &str) -> bool {
    is_mode_s_airport(origin)
        && is_mode_s_airport(destination)
        && has_mode_s_equipment(transponder_equipment)
}

/// Whether an ICAO identifier lies in the Mode-S region.
pub fn is_mode_s_airport(icao: &str) -> bool {
    // Backtracking limit cannot be hit on 4-6 character inputs; treat it as no match.
    MODE_S_AIRPORT.is_match(icao).unwrap_or(false)
}

/// Whether an equipment string contains any Mode-S capability letter.
pub fn has_mode_s_equipment(transponder_equipment: &str) -> bool {
    transponder_equipment.contains(MODE_S_EQUIPMENT)
}
