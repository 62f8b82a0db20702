use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A TOML file or `SEVA_*` variable could not be parsed or merged.
    #[error("failed to load configuration: {0}")]
    Figment(#[from] figment::Error),

    /// The selected backend or section is missing fields it needs.
    #[error("{section} is selected but not fully configured")]
    NotConfigured { section: String },

    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue { field: String, reason: String },
}
