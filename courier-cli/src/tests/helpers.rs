//! Snapshot fixtures shared by the plan and demo tests.

use super::*;
use crate::snapshot::Snapshot;
use camino::{Utf8Path, Utf8PathBuf};
use courier_core::{
    Agent, Category, Coordinates, Destination, Fixed, Location, ObjectId, Order, Origin,
};
use std::fs;
use tempfile::TempDir;

pub(super) const AGENT_ID: ObjectId = ObjectId::from_u128(1);
pub(super) const ORIGIN_ID: ObjectId = ObjectId::from_u128(2);
pub(super) const DESTINATION_ID: ObjectId = ObjectId::from_u128(3);

pub(super) fn write_utf8(path: &Utf8Path, contents: &str) {
    fs::write(path.as_std_path(), contents).expect("write test file");
}

pub(super) fn utf8_root(dir: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir")
}

fn on_equator(degrees: i64) -> Coordinates {
    Coordinates {
        latitude: Fixed::ZERO,
        longitude: Fixed::from_hundredths(degrees.saturating_mul(100)),
    }
}

/// One agent on the equator at 0°, a ready kitchen at 1° east and a
/// customer at 2° east, with one order between them.
pub(super) fn delivery_snapshot() -> Snapshot {
    let agent = Agent::new("Ada", "555-0100", Fixed::from_hundredths(2_000))
        .expect("valid agent")
        .with_id(AGENT_ID);
    let origin = Origin::new("Kitchen", "555-0101", Fixed::ZERO)
        .expect("valid origin")
        .with_id(ORIGIN_ID);
    let destination = Destination::new("Customer", "555-0102").with_id(DESTINATION_ID);
    let order = Order::new(DESTINATION_ID, ORIGIN_ID, Fixed::from_hundredths(1_250))
        .with_id(ObjectId::from_u128(4));
    Snapshot {
        locations: vec![
            Location::new(AGENT_ID, Category::Agent, on_equator(0)),
            Location::new(ORIGIN_ID, Category::Origin, on_equator(1)),
            Location::new(DESTINATION_ID, Category::Destination, on_equator(2)),
        ],
        agents: vec![agent],
        origins: vec![origin],
        destinations: vec![destination],
        orders: vec![order],
    }
}

/// Write `snapshot` as JSON under `root` and return its path.
pub(super) fn write_snapshot(root: &Utf8Path, snapshot: &Snapshot) -> Utf8PathBuf {
    let path = root.join("snapshot.json");
    let json = serde_json::to_string(snapshot).expect("serialise snapshot");
    write_utf8(&path, &json);
    path
}

/// Parse CLI output back into JSON for assertions.
pub(super) fn parse_output(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).expect("plan output is JSON")
}

/// Stop ids in visiting order from a printed plan.
pub(super) fn printed_stop_ids(plan: &serde_json::Value) -> Vec<String> {
    plan.pointer("/route/stops")
        .and_then(serde_json::Value::as_array)
        .expect("route has stops")
        .iter()
        .map(|stop| {
            stop.get("stop_id")
                .and_then(serde_json::Value::as_str)
                .expect("stop id")
                .to_owned()
        })
        .collect()
}
