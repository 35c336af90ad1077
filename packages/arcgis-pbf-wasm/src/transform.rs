use crate::proto;

/// A decoded position: `[x, y]` or `[x, y, z]`.
pub type Position = Vec<f64>;

/// Quantization transform from the feature result header.
///
/// Scale is applied first (with the y axis inverted), then translate. Either
/// stage may be absent, in which case it is skipped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CoordinateTransform {
    pub scale: Option<[f64; 3]>,
    pub translate: Option<[f64; 3]>,
}

impl CoordinateTransform {
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn new(scale: Option<[f64; 3]>, translate: Option<[f64; 3]>) -> Self {
        Self { scale, translate }
    }

    /// Whether this transform has any stage at all. A stageless transform
    /// behaves like no transform, including for z.
    pub fn is_identity(&self) -> bool {
        self.scale.is_none() && self.translate.is_none()
    }

    /// Transform a raw `(x, y[, z])` tuple into output space.
    pub fn apply(&self, x: f64, y: f64, z: Option<f64>) -> Position {
        let mut x = x;
        let mut y = y;
        // z only survives when the header actually carries a transform
        let mut z = if self.is_identity() { None } else { z };

        if let Some([sx, sy, sz]) = self.scale {
            x *= sx;
            y *= -sy;
            z = z.map(|z| z * sz);
        }

        if let Some([tx, ty, tz]) = self.translate {
            x += tx;
            y += ty;
            z = z.map(|z| z + tz);
        }

        match z {
            Some(z) => vec![x, y, z],
            None => vec![x, y],
        }
    }

    /// Transform an integer x/y pair, as found in quantized coordinate streams.
    pub fn apply_xy(&self, x: i64, y: i64) -> Position {
        self.apply(x as f64, y as f64, None)
    }
}

impl From<&proto::Transform> for CoordinateTransform {
    fn from(transform: &proto::Transform) -> Self {
        let scale = transform
            .scale
            .as_ref()
            .map(|s| [s.x_scale, s.y_scale, s.z_scale]);
        let translate = transform
            .translate
            .as_ref()
            .map(|t| [t.x_translate, t.y_translate, t.z_translate]);
        Self { scale, translate }
    }
}

impl From<Option<&proto::Transform>> for CoordinateTransform {
    fn from(transform: Option<&proto::Transform>) -> Self {
        transform.map(CoordinateTransform::from).unwrap_or_default()
    }
}
