/// Crate-wide error type.
///
/// Each variant maps to a process exit code:
/// - `Usage` / `UnknownMetric`: 2 (bad input)
/// - `DataUnavailable` / `Io`: 4 (upstream or terminal failure)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// The upstream endpoint could not be reached, returned a bad status,
    /// or its payload could not be parsed into a daily series.
    DataUnavailable(String),
    /// A metric label or upstream field name is not in the catalog.
    UnknownMetric(String),
    /// Invalid CLI arguments or configuration.
    Usage(String),
    /// Terminal or file I/O failure.
    Io(String),
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Usage(_) | AppError::UnknownMetric(_) => 2,
            AppError::DataUnavailable(_) | AppError::Io(_) => 4,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::DataUnavailable(msg) => write!(f, "data unavailable: {msg}"),
            AppError::UnknownMetric(name) => write!(f, "unknown metric '{name}'"),
            AppError::Usage(msg) => write!(f, "{msg}"),
            AppError::Io(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for AppError {}
