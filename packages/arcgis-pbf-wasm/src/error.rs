use thiserror::Error;

/// The buffer could not be read as a feature collection.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("could not parse arcgis-pbf buffer: {0}")]
    Malformed(#[from] prost::DecodeError),
    #[error("arcgis-pbf buffer does not contain a feature result")]
    MissingFeatureResult,
}
