//! Conversions between repository models and protobuf messages.
//!
//! Feature values travel as `google.protobuf.Value`. protobuf numbers are
//! always doubles, so an integral double inside the exactly-representable
//! range (|x| ≤ 2^53) is turned back into a JSON integer; `42` stays `42`
//! instead of becoming `42.0`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use prost_types::{value::Kind, ListValue, NullValue, Struct, Timestamp, Value};
use tonic::Status;

use flagbase_table::{Feature, Item};

use crate::pb;

/// Largest magnitude at which every integer is exactly representable in f64.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

// ── JSON ⇄ google.protobuf.Value ──────────────────────────────────────────────

pub fn json_to_value(json: &serde_json::Value) -> Value {
    let kind = match json {
        serde_json::Value::Null => Kind::NullValue(NullValue::NullValue as i32),
        serde_json::Value::Bool(b) => Kind::BoolValue(*b),
        serde_json::Value::Number(n) => Kind::NumberValue(n.as_f64().unwrap_or_default()),
        serde_json::Value::String(s) => Kind::StringValue(s.clone()),
        serde_json::Value::Array(items) => Kind::ListValue(ListValue {
            values: items.iter().map(json_to_value).collect(),
        }),
        serde_json::Value::Object(map) => Kind::StructValue(Struct {
            fields: map
                .iter()
                .map(|(k, v)| (k.clone(), json_to_value(v)))
                .collect::<BTreeMap<_, _>>(),
        }),
    };
    Value { kind: Some(kind) }
}

/// An absent value (or one with no kind set) is JSON `null`.
pub fn value_to_json(value: Option<Value>) -> Result<serde_json::Value, Status> {
    let Some(kind) = value.and_then(|v| v.kind) else {
        return Ok(serde_json::Value::Null);
    };

    Ok(match kind {
        Kind::NullValue(_) => serde_json::Value::Null,
        Kind::BoolValue(b) => serde_json::Value::Bool(b),
        Kind::NumberValue(n) => number_to_json(n)?,
        Kind::StringValue(s) => serde_json::Value::String(s),
        Kind::ListValue(list) => serde_json::Value::Array(
            list.values
                .into_iter()
                .map(|v| value_to_json(Some(v)))
                .collect::<Result<_, _>>()?,
        ),
        Kind::StructValue(s) => serde_json::Value::Object(
            s.fields
                .into_iter()
                .map(|(k, v)| value_to_json(Some(v)).map(|j| (k, j)))
                .collect::<Result<_, _>>()?,
        ),
    })
}

fn number_to_json(n: f64) -> Result<serde_json::Value, Status> {
    if n.fract() == 0.0 && n.abs() <= MAX_EXACT_INT {
        return Ok(serde_json::Value::from(n as i64));
    }
    serde_json::Number::from_f64(n)
        .map(serde_json::Value::Number)
        .ok_or_else(|| Status::invalid_argument(format!("value is not a finite number: {n}")))
}

// ── Timestamps ────────────────────────────────────────────────────────────────

pub fn to_timestamp(dt: DateTime<Utc>) -> Timestamp {
    Timestamp {
        seconds: dt.timestamp(),
        nanos: dt.timestamp_subsec_nanos() as i32,
    }
}

pub fn from_timestamp(ts: Option<Timestamp>) -> Result<DateTime<Utc>, Status> {
    let ts = ts.ok_or_else(|| Status::internal("created_at missing from response"))?;
    DateTime::from_timestamp(ts.seconds, ts.nanos.max(0) as u32)
        .ok_or_else(|| Status::internal(format!("created_at out of range: {}s", ts.seconds)))
}

// ── Records ──────────────────────────────────────────────────────────────────

pub fn item_to_proto(item: Item) -> pb::Item {
    pb::Item {
        id: item.id,
        name: item.name,
        value: item.value,
        created_at: Some(to_timestamp(item.created_at)),
    }
}

pub fn item_from_proto(item: pb::Item) -> Result<Item, Status> {
    Ok(Item {
        created_at: from_timestamp(item.created_at)?,
        id: item.id,
        name: item.name,
        value: item.value,
    })
}

pub fn feature_to_proto(feature: Feature) -> pb::Feature {
    pb::Feature {
        value: Some(json_to_value(&feature.value)),
        id: feature.id,
        name: feature.name,
        resource_id: feature.resource_id,
        active: feature.active,
        created_at: Some(to_timestamp(feature.created_at)),
    }
}

pub fn feature_from_proto(feature: pb::Feature) -> Result<Feature, Status> {
    Ok(Feature {
        value: value_to_json(feature.value)?,
        created_at: from_timestamp(feature.created_at)?,
        id: feature.id,
        name: feature.name,
        resource_id: feature.resource_id,
        active: feature.active,
    })
}
