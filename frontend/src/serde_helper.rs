use profile_soup_shared::{SoupError, SoupResult};
use serde::{Serialize, de::DeserializeOwned};
use wasm_bindgen::{JsCast, JsValue};

/// Serialize a Rust data structure into a plain JS object
pub fn to_value<T: Serialize>(value: &T) -> SoupResult<JsValue> {
    // Firestore rejects Map instances and `undefined` fields, and BigInt breaks JSON.stringify
    let serializer = serde_wasm_bindgen::Serializer::new()
        .serialize_large_number_types_as_bigints(false)
        .serialize_maps_as_objects(true)
        .serialize_missing_as_null(true);
    value
        .serialize(&serializer)
        .map_err(|e| SoupError::serialization(e.to_string()).in_op("serde.to_value"))
}

/// Deserialize a JsValue into a Rust data structure
pub fn from_value<T: DeserializeOwned>(value: JsValue) -> SoupResult<T> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| SoupError::serialization(e.to_string()).in_op("serde.from_value"))
}

/// Stringify a thrown JS value the way the browser would (`Error.prototype.toString`)
pub fn js_error_message(err: &JsValue) -> String {
    if let Some(s) = err.as_string() {
        return s;
    }
    if err.is_null() || err.is_undefined() {
        return "unknown error".to_string();
    }
    match err.dyn_ref::<js_sys::Object>() {
        Some(obj) => String::from(obj.to_string()),
        None => format!("{:?}", err),
    }
}
