#[derive(Debug, thiserror::Error)]
pub enum DpsError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unknown patient: {0}")]
    UnknownPatient(String),
    #[error("patient record already exists: {0}")]
    DuplicatePatient(String),
    #[error("failed to create patient directory: {0}")]
    PatientDirCreation(std::io::Error),
    #[error("failed to write patient file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read patient file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to serialize patient: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize patient: {0}")]
    Deserialization(serde_json::Error),
    #[error("failed to read station config: {0}")]
    StationRead(std::io::Error),
    #[error("station config mismatch at {path}: {source}")]
    StationSchema {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to write report file: {0}")]
    ReportWrite(std::io::Error),
}

pub type DpsResult<T> = std::result::Result<T, DpsError>;
