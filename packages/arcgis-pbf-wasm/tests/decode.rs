use arcgis_pbf_wasm::proto::feature::CompressedGeometry;
use arcgis_pbf_wasm::proto::query_result::Results;
use arcgis_pbf_wasm::proto::value::ValueType;
use arcgis_pbf_wasm::proto::{
    EsriShapeBuffer, Feature, FeatureCollectionPBuffer, FeatureResult, Field, FieldType,
    Geometry as RawGeometry, GeometryType, QueryResult, Scale, Transform, Translate, Value,
};
use arcgis_pbf_wasm::{decode, AuditConfig, Geometry, ParseError};
use pretty_assertions::assert_eq;
use prost::Message;
use serde_json::json;

fn fields() -> Vec<Field> {
    vec![
        Field {
            name: "NAME".to_string(),
            field_type: FieldType::String as i32,
            alias: "Name".to_string(),
        },
        Field {
            name: "OBJECTID".to_string(),
            field_type: FieldType::Oid as i32,
            alias: "OBJECTID".to_string(),
        },
    ]
}

fn attributes(name: &str, object_id: i32) -> Vec<Value> {
    vec![
        Value {
            value_type: Some(ValueType::StringValue(name.to_string())),
        },
        Value {
            value_type: Some(ValueType::SintValue(object_id)),
        },
    ]
}

fn feature(name: &str, object_id: i32, coords: Vec<i64>, lengths: Vec<u32>) -> Feature {
    Feature {
        attributes: attributes(name, object_id),
        compressed_geometry: Some(CompressedGeometry::Geometry(RawGeometry { lengths, coords })),
    }
}

fn encode(result: FeatureResult) -> Vec<u8> {
    FeatureCollectionPBuffer {
        version: "1.0".to_string(),
        query_result: Some(QueryResult {
            results: Some(Results::FeatureResult(result)),
        }),
    }
    .encode_to_vec()
}

fn feature_result(geometry_type: GeometryType, features: Vec<Feature>) -> FeatureResult {
    FeatureResult {
        object_id_field_name: "OBJECTID".to_string(),
        geometry_type: geometry_type as i32,
        fields: fields(),
        features,
        ..Default::default()
    }
}

#[test]
fn point_without_transform() {
    let bytes = encode(feature_result(
        GeometryType::Point,
        vec![feature("Main St", 42, vec![100, 200], vec![])],
    ));

    let collection = decode(&bytes).unwrap();
    assert_eq!(collection.len(), 1);

    let feature = &collection.features[0];
    assert_eq!(feature.id, Some(json!(42)));
    assert_eq!(json!(feature.properties), json!({"NAME": "Main St", "OBJECTID": 42}));
    assert_eq!(feature.geometry, Some(Geometry::Point(vec![100.0, 200.0])));
}

#[test]
fn point_with_scale_and_translate() {
    let mut result = feature_result(
        GeometryType::Point,
        vec![feature("a", 1, vec![5, 4], vec![1])],
    );
    result.transform = Some(Transform {
        quantize_origin_postion: 0,
        scale: Some(Scale {
            x_scale: 2.0,
            y_scale: 3.0,
            m_scale: 0.0,
            z_scale: 0.0,
        }),
        translate: Some(Translate {
            x_translate: 10.0,
            y_translate: 20.0,
            m_translate: 0.0,
            z_translate: 0.0,
        }),
    });

    let collection = decode(&encode(result)).unwrap();
    assert_eq!(
        collection.features[0].geometry,
        Some(Geometry::Point(vec![20.0, 8.0]))
    );
}

#[test]
fn polyline_parts_decode_independently() {
    let bytes = encode(feature_result(
        GeometryType::Polyline,
        vec![
            feature("single", 1, vec![0, 0, 5, 5, -2, 3], vec![3]),
            feature("multi", 2, vec![0, 0, 1, 1, 100, 100, 1, 1, 1, 1], vec![2, 3]),
        ],
    ));

    let collection = decode(&bytes).unwrap();
    assert_eq!(
        collection.features[0].geometry,
        Some(Geometry::LineString(vec![
            vec![0.0, 0.0],
            vec![5.0, 5.0],
            vec![3.0, 8.0]
        ]))
    );
    assert_eq!(
        collection.features[1].geometry,
        Some(Geometry::MultiLineString(vec![
            vec![vec![0.0, 0.0], vec![1.0, 1.0]],
            vec![vec![100.0, 100.0], vec![101.0, 101.0], vec![102.0, 102.0]],
        ]))
    );
}

#[test]
fn polygon_with_hole_and_second_exterior() {
    // exterior, hole, exterior
    let mut coords = vec![0, 0, 0, 10, 10, 0, 0, -10, -10, 0];
    coords.extend([2, 2, 2, 0, 0, 2, -2, 0, 0, -2]);
    coords.extend([20, 0, 0, 5, 5, 0, 0, -5, -5, 0]);

    let bytes = encode(feature_result(
        GeometryType::Polygon,
        vec![feature("parcel", 7, coords, vec![5, 5, 5])],
    ));

    let collection = decode(&bytes).unwrap();
    let Some(Geometry::MultiPolygon(groups)) = &collection.features[0].geometry else {
        panic!("expected a multipolygon");
    };
    let ring_counts: Vec<usize> = groups.iter().map(|group| group.len()).collect();
    assert_eq!(ring_counts, vec![2, 1]);
    assert_eq!(groups[1][0][0], vec![20.0, 0.0]);
}

#[test]
fn missing_and_shape_buffer_geometry_are_absent() {
    let bytes = encode(feature_result(
        GeometryType::Polygon,
        vec![
            Feature {
                attributes: attributes("no geometry", 1),
                compressed_geometry: None,
            },
            Feature {
                attributes: attributes("shape buffer", 2),
                compressed_geometry: Some(CompressedGeometry::ShapeBuffer(EsriShapeBuffer {
                    bytes: vec![1, 2, 3],
                })),
            },
        ],
    ));

    let collection = decode(&bytes).unwrap();
    assert_eq!(collection.len(), 2);
    assert!(collection.features.iter().all(|f| f.geometry.is_none()));
    assert_eq!(collection.features[1].id, Some(json!(2)));
}

#[test]
fn transfer_limit_is_preserved_in_geojson() {
    let mut result = feature_result(
        GeometryType::Point,
        vec![feature("Main St", 42, vec![1, 2], vec![1])],
    );
    result.exceeded_transfer_limit = true;

    let collection = decode(&encode(result)).unwrap();
    let geojson: serde_json::Value =
        serde_json::from_str(&collection.to_geojson_string().unwrap()).unwrap();

    assert_eq!(
        geojson,
        json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "id": 42,
                "properties": {"NAME": "Main St", "OBJECTID": 42},
                "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}
            }],
            "exceededTransferLimit": true
        })
    );
}

#[test]
fn feature_without_id_field_serializes_null_geometry_and_no_id() {
    let mut result = feature_result(
        GeometryType::Point,
        vec![Feature {
            attributes: attributes("x", 1),
            compressed_geometry: None,
        }],
    );
    result.object_id_field_name = "FID".to_string();

    let collection = decode(&encode(result)).unwrap();
    let geojson = serde_json::to_value(&collection.features[0]).unwrap();
    assert_eq!(
        geojson,
        json!({
            "type": "Feature",
            "properties": {"NAME": "x", "OBJECTID": 1},
            "geometry": null
        })
    );
}

#[test]
fn malformed_buffer_is_a_parse_error() {
    let bytes = encode(feature_result(
        GeometryType::Point,
        vec![feature("Main St", 42, vec![100, 200], vec![])],
    ));
    let truncated = &bytes[..bytes.len() - 3];

    assert!(matches!(decode(truncated), Err(ParseError::Malformed(_))));
    assert!(decode(b"definitely not protobuf").is_err());
}

#[test]
fn audit_values_follow_feature_order() {
    let bytes = encode(feature_result(
        GeometryType::Point,
        vec![
            feature("a", 11, vec![0, 0], vec![1]),
            feature("b", 12, vec![0, 0], vec![1]),
        ],
    ));
    let collection = decode(&bytes).unwrap();

    assert_eq!(collection.attribute_values("OBJECTID"), vec!["11", "12"]);
    let config = AuditConfig {
        attribute_to_log: "NAME".to_string(),
    };
    assert_eq!(arcgis_pbf_wasm::collect_audit_values(&collection, &config), vec!["a", "b"]);
}

#[test]
fn decoding_is_independent_across_threads() {
    let points = encode(feature_result(
        GeometryType::Point,
        vec![feature("p", 1, vec![3, 4], vec![1])],
    ));
    let lines = encode(feature_result(
        GeometryType::Polyline,
        vec![feature("l", 2, vec![0, 0, 1, 1], vec![2])],
    ));

    std::thread::scope(|scope| {
        let a = scope.spawn(|| decode(&points).unwrap());
        let b = scope.spawn(|| decode(&lines).unwrap());
        let a = a.join().unwrap();
        let b = b.join().unwrap();
        assert_eq!(a.features[0].geometry, Some(Geometry::Point(vec![3.0, 4.0])));
        assert_eq!(
            b.features[0].geometry,
            Some(Geometry::LineString(vec![vec![0.0, 0.0], vec![1.0, 1.0]]))
        );
    });
}
