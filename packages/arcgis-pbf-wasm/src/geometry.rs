use geo_types::{Coord, LineString, MultiLineString, MultiPolygon, Point, Polygon};
use serde::{Deserialize, Serialize};

use crate::proto;
use crate::transform::{CoordinateTransform, Position};

/// Geometry family announced by the feature result header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeometryKind {
    Point,
    Polyline,
    Polygon,
}

impl GeometryKind {
    pub fn from_code(code: i32) -> Self {
        match proto::GeometryType::try_from(code) {
            Ok(proto::GeometryType::Point) => GeometryKind::Point,
            Ok(proto::GeometryType::Polyline) => GeometryKind::Polyline,
            Ok(proto::GeometryType::Polygon) => GeometryKind::Polygon,
            // Multipoint, multipatch and unknown codes are read as polygons
            _ => GeometryKind::Polygon,
        }
    }
}

/// GeoJSON geometry, serialized as `{"type": ..., "coordinates": ...}`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(Position),
    LineString(Vec<Position>),
    MultiLineString(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
}

impl Geometry {
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::LineString(_) => "LineString",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::MultiPolygon(_) => "MultiPolygon",
        }
    }
}

/// Next absolute value in a delta-coded stream.
#[inline]
pub fn running_sum(previous: i64, delta: i64) -> i64 {
    previous.wrapping_add(delta)
}

/// Decode one delta-coded part into transformed positions.
///
/// The first pair is absolute; every following pair is an offset from the
/// previously decoded pair. A trailing odd value is ignored.
pub fn decode_ring(coords: &[i64], transform: &CoordinateTransform) -> Vec<Position> {
    let mut ring = Vec::with_capacity(coords.len() / 2);
    let mut pairs = coords.chunks_exact(2);

    let Some(first) = pairs.next() else {
        return ring;
    };
    let (mut x, mut y) = (first[0], first[1]);
    ring.push(transform.apply_xy(x, y));

    for delta in pairs {
        x = running_sum(x, delta[0]);
        y = running_sum(y, delta[1]);
        ring.push(transform.apply_xy(x, y));
    }

    ring
}

/// Split the coordinate stream into one slice per entry of `lengths`.
/// Parts that run past the end of `coords` are cut short.
fn ring_segments(geometry: &proto::Geometry) -> impl Iterator<Item = &[i64]> + '_ {
    let coords = geometry.coords.as_slice();
    let mut start = 0usize;
    geometry.lengths.iter().map(move |&length| {
        let stop = start
            .saturating_add((length as usize).saturating_mul(2))
            .min(coords.len());
        let segment = &coords[start..stop];
        start = stop;
        segment
    })
}

/// Orientation accumulator over an open ring: sum of `(x2 - x1) * (y2 + y1)`.
pub fn winding_sum(ring: &[Position]) -> f64 {
    ring.windows(2)
        .map(|pair| (pair[1][0] - pair[0][0]) * (pair[1][1] + pair[0][1]))
        .sum()
}

pub fn is_exterior_ring(ring: &[Position]) -> bool {
    winding_sum(ring) >= 0.0
}

/// Group rings into polygons. Each exterior ring opens a new polygon; holes
/// join the most recent one, and holes seen before any exterior are dropped.
pub fn assemble_polygons<I>(rings: I) -> Vec<Vec<Vec<Position>>>
where
    I: IntoIterator<Item = Vec<Position>>,
{
    let mut polygons: Vec<Vec<Vec<Position>>> = Vec::new();
    for ring in rings {
        if is_exterior_ring(&ring) {
            polygons.push(vec![ring]);
        } else if let Some(current) = polygons.last_mut() {
            current.push(ring);
        }
    }
    polygons
}

/// Rebuilds feature geometries for one feature result. The kind is resolved
/// once from the header and reused for every feature.
#[derive(Clone, Debug)]
pub struct GeometryDecoder<'a> {
    kind: GeometryKind,
    transform: &'a CoordinateTransform,
    has_z: bool,
}

impl<'a> GeometryDecoder<'a> {
    pub fn new(geometry_type: i32, transform: &'a CoordinateTransform) -> Self {
        Self {
            kind: GeometryKind::from_code(geometry_type),
            transform,
            has_z: false,
        }
    }

    /// Read a third component for point geometries.
    pub fn with_z(mut self, has_z: bool) -> Self {
        self.has_z = has_z;
        self
    }

    pub fn kind(&self) -> GeometryKind {
        self.kind
    }

    /// Decode one raw geometry. An empty coordinate stream yields `None`.
    pub fn decode(&self, geometry: &proto::Geometry) -> Option<Geometry> {
        if geometry.coords.is_empty() {
            return None;
        }

        match self.kind {
            GeometryKind::Point => self.decode_point(geometry),
            GeometryKind::Polyline => self.decode_line(geometry),
            GeometryKind::Polygon => Some(self.decode_polygon(geometry)),
        }
    }

    fn decode_point(&self, geometry: &proto::Geometry) -> Option<Geometry> {
        let position = match geometry.coords.as_slice() {
            [x, y, z, ..] if self.has_z => {
                self.transform.apply(*x as f64, *y as f64, Some(*z as f64))
            }
            [x, y, ..] => self.transform.apply_xy(*x, *y),
            _ => return None,
        };
        Some(Geometry::Point(position))
    }

    fn decode_line(&self, geometry: &proto::Geometry) -> Option<Geometry> {
        let mut lines: Vec<Vec<Position>> = ring_segments(geometry)
            .map(|segment| decode_ring(segment, self.transform))
            .collect();

        match lines.len() {
            0 => None,
            1 => lines.pop().map(Geometry::LineString),
            _ => Some(Geometry::MultiLineString(lines)),
        }
    }

    fn decode_polygon(&self, geometry: &proto::Geometry) -> Geometry {
        let rings = ring_segments(geometry).map(|segment| decode_ring(segment, self.transform));
        Geometry::MultiPolygon(assemble_polygons(rings))
    }
}

fn to_coord(position: &[f64]) -> Coord<f64> {
    Coord {
        x: position.first().copied().unwrap_or_default(),
        y: position.get(1).copied().unwrap_or_default(),
    }
}

fn to_line_string(ring: Vec<Position>) -> LineString<f64> {
    LineString::new(ring.iter().map(|p| to_coord(p)).collect())
}

// z is dropped: geo-types coordinates are planar.
impl From<Geometry> for geo_types::Geometry<f64> {
    fn from(geometry: Geometry) -> Self {
        match geometry {
            Geometry::Point(position) => geo_types::Geometry::Point(Point(to_coord(&position))),
            Geometry::LineString(ring) => geo_types::Geometry::LineString(to_line_string(ring)),
            Geometry::MultiLineString(rings) => geo_types::Geometry::MultiLineString(
                MultiLineString::new(rings.into_iter().map(to_line_string).collect()),
            ),
            Geometry::MultiPolygon(groups) => {
                let polygons = groups
                    .into_iter()
                    .map(|group| {
                        let mut rings = group.into_iter().map(to_line_string);
                        let exterior = rings.next().unwrap_or_else(|| LineString::new(Vec::new()));
                        Polygon::new(exterior, rings.collect())
                    })
                    .collect();
                geo_types::Geometry::MultiPolygon(MultiPolygon::new(polygons))
            }
        }
    }
}
