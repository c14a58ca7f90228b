//! Helpers for document identifiers.

use minijinja::Value;

use super::{fail_soft, Entries};
use crate::values::{seq_items, ObjectId};

pub(crate) fn define(entries: &mut Entries) {
    entries.insert("toValue", Value::from_function(to_value));
    entries.insert("objectId", Value::from_function(object_id));
    entries.insert("existobjectid", Value::from_function(existobjectid));
    entries.insert("sameobjectid", Value::from_function(sameobjectid));
}

/// Identifiers become their hex string; everything else passes through.
pub fn to_value(value: Value) -> Value {
    match ObjectId::from_value(&value) {
        Some(id) => Value::from(id.to_hex()),
        None => value,
    }
}

/// Hex of an identifier, or a string unchanged.
pub fn object_id(value: Value) -> String {
    if let Some(id) = ObjectId::from_value(&value) {
        return id.to_hex();
    }
    match value.as_str() {
        Some(s) => s.to_string(),
        None => fail_soft("objectId", "expected an object id or string", String::new()),
    }
}

/// Whether any identifier in `values` has the hex form `id`.
pub fn existobjectid(values: Value, id: Value) -> bool {
    let (Some(values), Some(id)) = (seq_items(&values), id.as_str()) else {
        return fail_soft("existobjectid", "expected a sequence and a string", false);
    };
    values
        .iter()
        .filter_map(ObjectId::from_value)
        .any(|candidate| candidate.to_hex() == id)
}

/// Compares an identifier by hex, anything else by its rendered form.
pub fn sameobjectid(value: Value, id: Value) -> bool {
    let Some(id) = id.as_str() else {
        return fail_soft("sameobjectid", "expected a string id", false);
    };
    match ObjectId::from_value(&value) {
        Some(oid) => oid.to_hex() == id,
        None => value.to_string() == id,
    }
}
