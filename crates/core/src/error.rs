use thiserror::Error;

#[derive(Error, Debug)]
pub enum NutrackError {
    #[error("Diet item not found: {0}")]
    DietItemNotFound(i64),

    #[error("Daily log entry not found: {0}")]
    LogEntryNotFound(i64),

    #[error("Invalid quantity {0}: portions must be finite and greater than zero")]
    InvalidQuantity(f64),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, NutrackError>;
