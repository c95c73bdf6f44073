//! Wire protocol compatibility between this driver and the servers it talks to.
//!
//! A server is compatible when its `[min_wire_version, max_wire_version]` range intersects the
//! driver's supported range.

use crate::{ServerDescription, ServerType};

pub const MIN_SUPPORTED_WIRE_VERSION: i32 = 2;
pub const MAX_SUPPORTED_WIRE_VERSION: i32 = 9;
pub const MIN_SUPPORTED_SERVER_VERSION: &str = "2.6";
pub const MAX_SUPPORTED_SERVER_VERSION: &str = "4.4";

/// Scans known servers in iteration order and returns the incompatibility to report, if any.
///
/// `Unknown` servers are skipped. A server that requires a newer protocol than the driver
/// speaks records its message and the scan continues, so a later violation replaces it. A
/// server that is too old records its message and ends the scan, which makes that message
/// final.
pub fn check_compatibility<'a>(
    servers: impl IntoIterator<Item = &'a ServerDescription>,
) -> Option<String> {
    let mut error = None;

    for server in servers {
        if server.server_type == ServerType::Unknown {
            continue;
        }

        if server.min_wire_version > MAX_SUPPORTED_WIRE_VERSION {
            error = Some(format!(
                "Server at {} requires wire version {}, but this version of the driver only supports up to {} (MongoDB {})",
                server.address,
                server.min_wire_version,
                MAX_SUPPORTED_WIRE_VERSION,
                MAX_SUPPORTED_SERVER_VERSION
            ));
        }

        if server.max_wire_version < MIN_SUPPORTED_WIRE_VERSION {
            error = Some(format!(
                "Server at {} reports wire version {}, but this version of the driver requires at least {} (MongoDB {}).",
                server.address,
                server.max_wire_version,
                MIN_SUPPORTED_WIRE_VERSION,
                MIN_SUPPORTED_SERVER_VERSION
            ));
            break;
        }
    }

    error
}
