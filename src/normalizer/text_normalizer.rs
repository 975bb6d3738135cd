/// Trait for post-processing text returned by a generative model
pub trait TextNormalizer: Send + Sync {
    /// Normalize the raw model output
    fn normalize(&self, raw_output: &str) -> String;

    /// Get the name of this normalizer for logging
    fn name(&self) -> &'static str;
}
