use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Sale '{sale_id}' has negative amount {amount}")]
    NegativeAmount { sale_id: String, amount: f64 },

    #[error("Customer '{customer_id}' has negative {field}: {value}")]
    NegativeValue { customer_id: String, field: String, value: f64 },

    #[error("Non-finite {field} on {context}")]
    NonFiniteValue { context: String, field: String },

    #[error("Invalid date: '{value}'")]
    InvalidDate { value: String },

    #[error("Customer '{customer_id}' not found")]
    CustomerNotFound { customer_id: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
