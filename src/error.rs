use thiserror::Error;

pub type HistoryResult<T> = Result<T, HistoryError>;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Server error: {0}")]
    Server(String),
}

/// Failures of the spreadsheet loader. All of them are fatal to a pipeline run.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to open workbook {path}: {message}")]
    Open { path: String, message: String },

    #[error("workbook {path} has no sheet named '{sheet}'")]
    MissingSheet { path: String, sheet: String },

    #[error("sheet '{sheet}' has no '{column}' column")]
    MissingColumn { sheet: String, column: String },

    #[error("failed to read sheet '{sheet}': {message}")]
    Sheet { sheet: String, message: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("not logged in")]
    NotAuthenticated,
}
