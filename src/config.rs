use crate::error::RuntimeError;

/// Environment variable holding the name of the function under test.
/// Lambda sets it for every function.
pub const FUNCTION_NAME_VAR: &str = "AWS_LAMBDA_FUNCTION_NAME";

/// Optional environment variable with a role to assume for the lookups.
pub const ASSUME_ROLE_VAR: &str = "ECHO_ASSUME_ROLE_ARN";

/// `Config` is the process wide configuration, loaded once at startup
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Name of the function every lookup is about
    pub function_name: String,
    /// Role assumed before talking to the AWS APIs, if any
    pub assume_role_arn: Option<String>,
}

impl Config {
    /// Load the configuration from the process environment.
    pub fn from_env() -> Result<Config, RuntimeError> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Config, RuntimeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let function_name = lookup(FUNCTION_NAME_VAR)
            .filter(|v| !v.is_empty())
            .ok_or(RuntimeError::MissingEnvironment(FUNCTION_NAME_VAR))?;

        Ok(Config {
            function_name,
            assume_role_arn: lookup(ASSUME_ROLE_VAR).filter(|v| !v.is_empty()),
        })
    }
}
