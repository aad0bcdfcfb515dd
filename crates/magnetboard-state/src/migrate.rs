//! Snapshot schema migrations.
//!
//! Each step is a total function over the JSON document of the previous
//! version: missing fields are backfilled, unknown values are mapped to a
//! default, nothing is rejected.
//!
//! | version | change |
//! |---|---|
//! | 1 | single grid; units carry `teacher`/`role` ∈ {tit, prov, sup} |
//! | 2 | `year_group` on units and placements |
//! | 3 | `primary_teacher`/`primary_role` ∈ {titular, provisional}; `secondary_role` derived |

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{StateError, StateResult};

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = 3;

/// Year assigned to v1 records, which predate per-year grids.
pub const LEGACY_YEAR_GROUP: u64 = 3;

/// Bring a document written at schema `from` up to [`SCHEMA_VERSION`].
pub fn migrate(mut doc: Value, from: u32) -> StateResult<Value> {
    if from == 0 || from > SCHEMA_VERSION {
        return Err(StateError::UnsupportedVersion {
            found: from,
            current: SCHEMA_VERSION,
        });
    }
    let mut version = from;
    while version < SCHEMA_VERSION {
        doc = match version {
            1 => v1_to_v2(doc),
            2 => v2_to_v3(doc),
            other => {
                return Err(StateError::UnsupportedVersion {
                    found: other,
                    current: SCHEMA_VERSION,
                });
            }
        };
        version += 1;
        debug!(version, "snapshot migrated");
    }
    Ok(doc)
}

/// Objects inside the array at `doc[field]`, skipping anything malformed.
fn records_mut<'a>(doc: &'a mut Value, field: &str) -> impl Iterator<Item = &'a mut Map<String, Value>> {
    doc.get_mut(field)
        .and_then(Value::as_array_mut)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object_mut)
}

fn v1_to_v2(mut doc: Value) -> Value {
    for field in ["units", "placements"] {
        for record in records_mut(&mut doc, field) {
            record
                .entry("year_group")
                .or_insert(Value::from(LEGACY_YEAR_GROUP));
        }
    }
    doc
}

fn v2_to_v3(mut doc: Value) -> Value {
    for unit in records_mut(&mut doc, "units") {
        if let Some(teacher) = unit.remove("teacher") {
            unit.entry("primary_teacher").or_insert(teacher);
        }
        let legacy_role = unit.remove("role");
        if !unit.contains_key("primary_role") {
            // A substitute as primary teacher has no v3 counterpart.
            let role = match legacy_role.as_ref().and_then(Value::as_str) {
                Some("tit") | Some("titular") => "titular",
                _ => "provisional",
            };
            unit.insert("primary_role".to_string(), Value::from(role));
        }

        let secondary = unit
            .remove("secondary_teacher")
            .and_then(|v| v.as_str().map(str::trim).map(str::to_string))
            .filter(|t| !t.is_empty());
        unit.remove("secondary_role");
        if let Some(teacher) = secondary {
            unit.insert("secondary_teacher".to_string(), Value::from(teacher));
            unit.insert("secondary_role".to_string(), Value::from("suplente"));
        }
    }
    doc
}
