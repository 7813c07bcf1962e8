use thiserror::Error as ThisError;

/// Different errors that the application can raise
#[derive(Debug, ThisError)]
pub enum RuntimeError {
    /// Error returned when a backing service response is missing a required field
    #[error("Validation error: missing field {0}")]
    MissingField(String),
    /// Error returned when the function's role ARN doesn't contain exactly one `role/` segment
    #[error("invalid role ARN format: {0}")]
    InvalidRoleArn(String),
    /// Error returned when a query parameter or request body can't be parsed
    #[error("invalid parameter {0}")]
    InvalidParameter(String),
    /// Error returned when a lookup finds no matching entity
    #[error("{0}")]
    NotFound(&'static str),
    /// Error returned by the Lambda API
    #[error("unexpected lambda error: {0}")]
    Lambda(#[from] aws_sdk_lambda::Error),
    /// Error returned by the IAM API
    #[error("unexpected iam error: {0}")]
    Iam(#[from] aws_sdk_iam::Error),
    /// Error returned by the CloudWatch Logs API
    #[error("unexpected cloudwatch logs error: {0}")]
    CloudWatchLogs(#[from] aws_sdk_cloudwatchlogs::Error),
    /// Error returned at startup when a required environment variable is not set
    #[error("missing environment variable {0}")]
    MissingEnvironment(&'static str),
    /// Error returned if a response payload can't be encoded
    #[error("failed to serialize response")]
    Serialization(#[from] serde_json::Error),
}

impl RuntimeError {
    /// HTTP status code reported to the caller for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            RuntimeError::MissingField(_)
            | RuntimeError::InvalidRoleArn(_)
            | RuntimeError::InvalidParameter(_) => 422,
            RuntimeError::NotFound(_) => 404,
            RuntimeError::Lambda(_)
            | RuntimeError::Iam(_)
            | RuntimeError::CloudWatchLogs(_)
            | RuntimeError::MissingEnvironment(_)
            | RuntimeError::Serialization(_) => 500,
        }
    }
}
