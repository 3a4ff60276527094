pub mod decoder;
pub mod encoder;
pub mod tag;

pub use decoder::{ComponentSpan, PredictedToken, decode};
pub use encoder::{TokenContext, encode, encode_fragments};
pub use tag::{ComponentTag, CompositeTag, DecodedTag, Marker, TagParseError};
