//! Desktop harness for the CCAMS provider.
//!
//! Runs one assignment outside a radar client. Without `--server` the
//! controller is treated as disconnected, so non-special flights get a
//! fallback code and no request is made.
//!
//! ```text
//! ccams-cli --callsign AFR123 --origin LFPG --dest KJFK --server live --in-use 2301,2302
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use neo_ccams::hal::{MockAircraftRoster, MockConnection, MockControllerData, TracingLogger};
use neo_ccams::model::{Aircraft, Flightplan, ServerType};
use neo_ccams::traits::HostServices;
use neo_ccams::{CcamsConfig, CcamsProvider};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Server {
    Live,
    Test,
    Sweatbox,
}

impl From<Server> for ServerType {
    fn from(server: Server) -> Self {
        match server {
            Server::Live => ServerType::Live,
            Server::Test => ServerType::Test,
            Server::Sweatbox => ServerType::Sweatbox,
        }
    }
}

/// CCAMS squawk assignment harness.
#[derive(Parser, Debug)]
#[command(name = "ccams-cli")]
#[command(about = "Assign a squawk code for one flight using CCAMS")]
struct Args {
    /// Aircraft callsign
    #[arg(long)]
    callsign: String,

    /// Departure ICAO code
    #[arg(long, default_value = "")]
    origin: String,

    /// Destination ICAO code
    #[arg(long, default_value = "")]
    dest: String,

    /// Transponder equipment letters
    #[arg(long, default_value = "")]
    equipment: String,

    /// Flight rule ("I" or "V")
    #[arg(long, default_value = "I")]
    rule: String,

    /// Server the controller is connected to; omit to run disconnected
    #[arg(long, value_enum)]
    server: Option<Server>,

    /// Controller callsign sent to the allocator
    #[arg(long, default_value = "CLI_OBS")]
    controller: String,

    /// Codes already on scope, comma separated
    #[arg(long, value_delimiter = ',')]
    in_use: Vec<String>,

    /// JSON config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            CcamsConfig::from_json_str(&json)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => CcamsConfig::default(),
    };

    let connection = match args.server {
        Some(server) => MockConnection::connected(&args.controller, server.into()),
        None => MockConnection::disconnected(),
    };
    let aircraft = args
        .in_use
        .iter()
        .enumerate()
        .map(|(i, code)| Aircraft::new(format!("SCOPE{i}"), code.trim()))
        .collect();

    let host = HostServices::new(
        Arc::new(connection),
        Arc::new(MockAircraftRoster::new(aircraft)),
        Arc::new(MockControllerData::default()),
        Arc::new(TracingLogger),
    );
    let provider = CcamsProvider::with_default_client(config, host)?;

    let flightplan = Flightplan {
        callsign: args.callsign.clone(),
        flight_rule: args.rule.clone(),
        origin: args.origin.clone(),
        destination: args.dest.clone(),
        transponder_equipment: args.equipment.clone(),
    };
    info!(callsign = %args.callsign, server = ?args.server, "requesting squawk");

    let assignment = provider.assign(&args.callsign, &Aircraft::default(), &flightplan);
    println!("{} {:?}", assignment.code, assignment.source);
    Ok(())
}
