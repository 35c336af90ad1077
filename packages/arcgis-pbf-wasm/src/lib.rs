use wasm_bindgen::prelude::*;
use serde::Serialize;
use serde_wasm_bindgen::{from_value, Serializer};

// Create a console module for logging
pub mod console;
// Wire schema for the PBF query output
pub mod proto;
// Scale/translate of quantized coordinates
pub mod transform;
// Geometry reconstruction from delta-coded coordinates
pub mod geometry;
// Attribute value resolution
pub mod attributes;
// Collection assembly and the decode entry point
pub mod feature_collection;
// Attribute audit helpers
pub mod audit;
mod error;

pub use audit::{collect_audit_values, AuditConfig};
pub use error::ParseError;
pub use feature_collection::{decode, Feature, FeatureCollection};
pub use geometry::Geometry;

// Enable better panic messages in console during development
#[cfg(feature = "console_error_panic_hook")]
pub use console_error_panic_hook::set_once as set_panic_hook;

// Use the macro from our console module
#[macro_export]
macro_rules! console_log {
    ($($t:tt)*) => ($crate::console::log(&format!($($t)*)))
}

use std::sync::Once;
static INIT: Once = Once::new();

// This sets up the wasm_bindgen start functionality
#[wasm_bindgen(start)]
pub fn start() {
    INIT.call_once(|| {
        // Set the panic hook for better error messages
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        console_log!("arcgis-pbf decoder initialized");
    });
}

fn to_js_error(message: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&message.to_string()).into()
}

/// Decode a PBF query response into a GeoJSON FeatureCollection object.
#[wasm_bindgen(js_name = decodeFeatureCollection)]
pub fn decode_feature_collection(data: &[u8]) -> Result<JsValue, JsValue> {
    let collection = decode(data).map_err(to_js_error)?;

    // Plain objects rather than JS Maps for properties
    let serializer = Serializer::json_compatible();
    collection.serialize(&serializer).map_err(to_js_error)
}

/// Decode a PBF query response into GeoJSON text.
#[wasm_bindgen(js_name = decodeFeatureCollectionJson)]
pub fn decode_feature_collection_json(data: &[u8]) -> Result<String, JsValue> {
    let collection = decode(data).map_err(to_js_error)?;
    collection.to_geojson_string().map_err(to_js_error)
}

/// Values of the configured audit attribute across all decoded features.
/// `options` may be `undefined`, in which case `OBJECTID` is used.
#[wasm_bindgen(js_name = collectAttributeValues)]
pub fn collect_attribute_values(data: &[u8], options: JsValue) -> Result<JsValue, JsValue> {
    let config: AuditConfig = if options.is_undefined() || options.is_null() {
        AuditConfig::default()
    } else {
        from_value(options).map_err(to_js_error)?
    };

    let collection = decode(data).map_err(to_js_error)?;
    let values = collect_audit_values(&collection, &config);
    console_log!(
        "Collected {} {} values from {} features",
        values.len(),
        config.attribute_to_log,
        collection.len()
    );

    let serializer = Serializer::json_compatible();
    values.serialize(&serializer).map_err(to_js_error)
}
