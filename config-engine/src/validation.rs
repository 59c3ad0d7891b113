// Validation hook run after a configuration has been deserialized
pub trait ConfigValidator {
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::ValidationError`] describing the first invalid field.
    fn validate(&self) -> crate::error::Result<()>;
}
