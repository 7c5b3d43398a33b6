//! Read-only snapshots of host data.
//!
//! The plugin host owns the real aircraft, flightplan and controller-data
//! state. These types carry only the fields the squawk assignment needs and
//! are handed in by value or reference per request; nothing here is stored
//! between assignments.

use crate::squawk::SquawkCode;

/// Flight rule flag used by the host for VFR flightplans.
pub const VFR_FLIGHT_RULE: &str = "V";

/// An aircraft as seen in the host's traffic roster.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aircraft {
    /// Aircraft callsign.
    pub callsign: String,
    /// Code currently set on the transponder, as reported (may be empty or garbage).
    pub squawk: String,
}

impl Aircraft {
    /// Create an aircraft snapshot.
    pub fn new(callsign: impl Into<String>, squawk: impl Into<String>) -> Self {
        Self {
            callsign: callsign.into(),
            squawk: squawk.into(),
        }
    }
}

/// The parts of a flightplan the assignment looks at.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Flightplan {
    /// Aircraft callsign.
    pub callsign: String,
    /// Flight rule flag (`"I"`, `"V"`, ...).
    pub flight_rule: String,
    /// Departure aerodrome ICAO code.
    pub origin: String,
    /// Destination aerodrome ICAO code.
    pub destination: String,
    /// ICAO transponder equipment letters (e.g. `"LB1"`).
    pub transponder_equipment: String,
}

impl Flightplan {
    /// IFR flightplan between two aerodromes with no equipment filed.
    pub fn ifr(
        callsign: impl Into<String>,
        origin: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            callsign: callsign.into(),
            flight_rule: String::from("I"),
            origin: origin.into(),
            destination: destination.into(),
            transponder_equipment: String::new(),
        }
    }

    /// Same flightplan with VFR rules.
    pub fn vfr(mut self) -> Self {
        self.flight_rule = String::from(VFR_FLIGHT_RULE);
        self
    }

    /// Set the transponder equipment string.
    pub fn with_equipment(mut self, equipment: impl Into<String>) -> Self {
        self.transponder_equipment = equipment.into();
        self
    }

    /// `true` when filed under visual flight rules.
    pub fn is_vfr(&self) -> bool {
        self.flight_rule == VFR_FLIGHT_RULE
    }
}

/// Controller-side data attached to an aircraft (assigned code, etc.).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControllerData {
    /// Aircraft callsign.
    pub callsign: String,
    /// Code assigned by a controller, as reported (may be empty).
    pub assigned_squawk: String,
}

impl ControllerData {
    /// Create a controller-data snapshot.
    pub fn new(callsign: impl Into<String>, assigned_squawk: impl Into<String>) -> Self {
        Self {
            callsign: callsign.into(),
            assigned_squawk: assigned_squawk.into(),
        }
    }
}

/// Kind of network server the controller is connected to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ServerType {
    /// Server kind not reported.
    #[default]
    Unknown,
    /// Production network.
    Live,
    /// Test server.
    Test,
    /// Training (sweatbox) server.
    Sweatbox,
}

impl ServerType {
    /// `true` for non-production servers. Allocations made there are flagged
    /// so the remote service keeps them apart from live traffic.
    pub fn is_simulation(self) -> bool {
        matches!(self, Self::Test | Self::Sweatbox)
    }
}

/// The controller's active network connection.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConnectionInfo {
    /// Controller callsign on the network.
    pub callsign: String,
    /// Server kind.
    pub server_type: ServerType,
}

impl ConnectionInfo {
    /// Create a connection snapshot.
    pub fn new(callsign: impl Into<String>, server_type: ServerType) -> Self {
        Self {
            callsign: callsign.into(),
            server_type,
        }
    }
}

/// Identity of the radar client hosting the plugin.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientInformation {
    /// Client application name.
    pub client_name: String,
    /// Client application version.
    pub client_version: String,
}

/// Emitted by the host after a provider produced a code.
///
/// The core only builds this value; publishing it is up to the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SquawkAssignedEvent {
    /// Aircraft callsign.
    pub callsign: String,
    /// Assigned code.
    pub squawk: SquawkCode,
    /// Name of the provider that produced the code.
    pub provider_name: String,
}
