mod confidence;
mod text_normalizer;

pub use confidence::{normalize_confidence, ConfidenceNormalizer, CANONICAL_HEADING};
pub use text_normalizer::TextNormalizer;
