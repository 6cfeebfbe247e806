use thiserror::Error;

/// Rejections raised at the configuration boundary. The prior value is
/// always kept when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{field}: value {value} out of range ({min}-{max})")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}
