use prost::Message;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::attributes::{collect_attributes, feature_id};
use crate::console_log;
use crate::error::ParseError;
use crate::geometry::{Geometry, GeometryDecoder};
use crate::proto::feature::CompressedGeometry;
use crate::proto::query_result::Results;
use crate::proto::{FeatureCollectionPBuffer, FeatureResult};
use crate::transform::CoordinateTransform;

/// GeoJSON feature.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<JsonValue>,
    pub properties: Map<String, JsonValue>,
    pub geometry: Option<Geometry>,
}

/// GeoJSON feature collection plus the server's truncation flag.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename = "FeatureCollection", rename_all = "camelCase")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
    pub exceeded_transfer_limit: bool,
}

impl FeatureCollection {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn to_geojson_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Decode an ArcGIS PBF query response into a feature collection.
///
/// Fails only when the buffer is not a valid message or carries no feature
/// result; everything below that level is substituted rather than rejected.
pub fn decode(bytes: &[u8]) -> Result<FeatureCollection, ParseError> {
    let message = FeatureCollectionPBuffer::decode(bytes)?;

    match message.query_result.and_then(|query| query.results) {
        Some(Results::FeatureResult(result)) => Ok(assemble(&result)),
        _ => Err(ParseError::MissingFeatureResult),
    }
}

/// Build the collection for an already decoded feature result.
pub fn assemble(result: &FeatureResult) -> FeatureCollection {
    let transform = CoordinateTransform::from(result.transform.as_ref());
    let decoder = GeometryDecoder::new(result.geometry_type, &transform).with_z(result.has_z);
    let mut skipped_shape_buffers = 0usize;

    let features: Vec<Feature> = result
        .features
        .iter()
        .map(|feature| {
            let geometry = match &feature.compressed_geometry {
                Some(CompressedGeometry::Geometry(raw)) => decoder.decode(raw),
                Some(CompressedGeometry::ShapeBuffer(_)) => {
                    skipped_shape_buffers += 1;
                    None
                }
                None => None,
            };

            Feature {
                id: feature_id(&result.fields, &feature.attributes, &result.object_id_field_name),
                properties: collect_attributes(&result.fields, &feature.attributes),
                geometry,
            }
        })
        .collect();

    if skipped_shape_buffers > 0 {
        console_log!(
            "Skipped {} shape buffer geometries (not supported)",
            skipped_shape_buffers
        );
    }
    console_log!(
        "Decoded {} features as {:?} (exceededTransferLimit: {})",
        features.len(),
        decoder.kind(),
        result.exceeded_transfer_limit
    );

    FeatureCollection {
        features,
        exceeded_transfer_limit: result.exceeded_transfer_limit,
    }
}
