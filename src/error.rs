use crate::domain::{Category, Metric};

/// Exit code for unreadable or malformed inputs and bad arguments.
pub const EXIT_INPUT: u8 = 2;
/// Exit code for queries that cannot be answered from the loaded data.
pub const EXIT_QUERY: u8 = 3;
/// Exit code for terminal/UI failures.
pub const EXIT_UI: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Failures while interpreting or querying the energy datasets.
#[derive(Debug, Clone, PartialEq)]
pub enum DataError {
    /// A series name whose leading segment matches no known category.
    UnknownCategory { name: String },
    /// A series name without a country token at the expected position.
    MalformedName { name: String, token: usize },
    /// A table label that is not one of the category display labels.
    UnknownLabel { label: String },
    /// No row for `country` under `category`.
    NotFound { category: Category, country: String },
    /// The country's row exists but has no value for `metric`.
    MissingMetric {
        category: Category,
        country: String,
        metric: Metric,
    },
    /// A per-source time series needed for a chart is absent.
    MissingSeries { category: Category, country: String },
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::UnknownCategory { name } => {
                write!(f, "Cannot classify series '{name}': no known category prefix")
            }
            DataError::MalformedName { name, token } => {
                write!(f, "Series name '{name}' has no country token at position {token}")
            }
            DataError::UnknownLabel { label } => write!(f, "Unknown category label '{label}'"),
            DataError::NotFound { category, country } => {
                write!(f, "No '{}' row for country '{country}'", category.label())
            }
            DataError::MissingMetric {
                category,
                country,
                metric,
            } => write!(
                f,
                "Country '{country}' has no {} value for '{}'",
                metric.column(),
                category.label()
            ),
            DataError::MissingSeries { category, country } => {
                write!(f, "No '{}' time series for country '{country}'", category.label())
            }
        }
    }
}

impl std::error::Error for DataError {}

impl From<DataError> for AppError {
    fn from(err: DataError) -> Self {
        let exit_code = match err {
            DataError::UnknownCategory { .. }
            | DataError::MalformedName { .. }
            | DataError::UnknownLabel { .. } => EXIT_INPUT,
            DataError::NotFound { .. }
            | DataError::MissingMetric { .. }
            | DataError::MissingSeries { .. } => EXIT_QUERY,
        };
        AppError::new(exit_code, err.to_string())
    }
}
