use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures at the file and export boundaries. Edge derivation itself never errors.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unknown preset '{name}'. Available: {available}")]
    UnknownPreset { name: String, available: String },

    #[error("Unsupported output format: .{0} (use .svg, .png or .pdf)")]
    UnsupportedFormat(String),

    #[error("Invalid --png-scale value: {0}")]
    InvalidScale(f32),

    #[error("Export failed: {0}")]
    Export(String),
}
