use crate::error::RuntimeError;
use aws_sdk_lambda::{operation::get_function::GetFunctionOutput, Client, Error};
use serde::Serialize;
use std::collections::BTreeMap;

/// `FunctionInfo` stores the deployed configuration and tags of the function
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionInfo {
    /// deployed configuration
    pub configuration: FunctionConfig,
    /// tags attached to the function, empty when it has none
    pub tags: BTreeMap<String, String>,
}

/// `FunctionConfig` is the subset of the function configuration we report on
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionConfig {
    /// name of the function
    pub function_name: String,
    /// timeout, in seconds
    pub timeout: i32,
    /// memory, in MB
    pub memory_size: i32,
    /// size of `/tmp`
    pub ephemeral_storage: EphemeralStorage,
    /// ARN of the execution role
    pub role: Option<String>,
    /// log group and format
    pub logging_config: LoggingConfig,
}

/// Size of the function's `/tmp` directory, in MB
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EphemeralStorage {
    /// size in MB
    pub size: i32,
}

/// Where and how the function writes its logs
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoggingConfig {
    /// `Text` or `JSON`
    pub log_format: String,
    /// name of the CloudWatch Logs group
    pub log_group: String,
}

/// Fetch the configuration and tags of the function.
#[tracing::instrument(skip(client))]
pub async fn get_function(
    client: &Client,
    function_name: &str,
) -> Result<FunctionInfo, RuntimeError> {
    tracing::info!("fetching function configuration");

    let res = client
        .get_function()
        .function_name(function_name)
        .send()
        .await
        .map_err(Error::from)?;

    res.try_into()
}

impl TryFrom<GetFunctionOutput> for FunctionInfo {
    type Error = RuntimeError;

    /// Try to convert a GetFunction response into a FunctionInfo.
    /// This could fail as most fields in the response are optional.
    fn try_from(value: GetFunctionOutput) -> Result<Self, Self::Error> {
        let config = value
            .configuration
            .ok_or_else(|| RuntimeError::MissingField("Configuration".into()))?;

        let storage = config
            .ephemeral_storage()
            .ok_or_else(|| RuntimeError::MissingField("Configuration.EphemeralStorage".into()))?;

        let logging = config
            .logging_config()
            .ok_or_else(|| RuntimeError::MissingField("Configuration.LoggingConfig".into()))?;

        let configuration = FunctionConfig {
            function_name: config
                .function_name()
                .ok_or_else(|| RuntimeError::MissingField("Configuration.FunctionName".into()))?
                .to_string(),
            timeout: config
                .timeout()
                .ok_or_else(|| RuntimeError::MissingField("Configuration.Timeout".into()))?,
            memory_size: config
                .memory_size()
                .ok_or_else(|| RuntimeError::MissingField("Configuration.MemorySize".into()))?,
            ephemeral_storage: EphemeralStorage {
                size: storage.size(),
            },
            role: config.role().map(str::to_string),
            logging_config: LoggingConfig {
                log_format: logging
                    .log_format()
                    .ok_or_else(|| {
                        RuntimeError::MissingField("Configuration.LoggingConfig.LogFormat".into())
                    })?
                    .as_str()
                    .to_string(),
                log_group: logging
                    .log_group()
                    .ok_or_else(|| {
                        RuntimeError::MissingField("Configuration.LoggingConfig.LogGroup".into())
                    })?
                    .to_string(),
            },
        };

        Ok(FunctionInfo {
            configuration,
            tags: value.tags.unwrap_or_default().into_iter().collect(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_util::*;
    use aws_smithy_runtime::client::http::test_util::{ReplayEvent, StaticReplayClient};
    use aws_smithy_types::body::SdkBody;

    async fn client_with(response: http::Response<SdkBody>) -> (Client, StaticReplayClient) {
        let conn = StaticReplayClient::new(vec![ReplayEvent::new(any_request("lambda"), response)]);
        let client = Client::new(&get_mock_config(conn.clone()).await);
        (client, conn)
    }

    #[tokio::test]
    async fn test_get_function() -> Result<(), RuntimeError> {
        // GIVEN a Lambda API that knows the function
        let (client, _conn) = client_with(ok_response(GET_FUNCTION_RESPONSE)).await;

        // WHEN fetching the function
        let function = get_function(&client, "echo").await?;

        // THEN the configuration is mapped onto the typed structure
        let config = &function.configuration;
        assert_eq!("echo", config.function_name);
        assert_eq!(30, config.timeout);
        assert_eq!(512, config.memory_size);
        assert_eq!(1024, config.ephemeral_storage.size);
        assert_eq!(
            Some("arn:aws:iam::123456789012:role/echo-role"),
            config.role.as_deref()
        );
        assert_eq!("Text", config.logging_config.log_format);
        assert_eq!("/aws/lambda/echo", config.logging_config.log_group);

        // AND the tags are included
        assert_eq!(Some(&"main".to_string()), function.tags.get("Branch"));
        assert_eq!(Some(&"abc123".to_string()), function.tags.get("Sha"));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_function_without_tags_or_role() -> Result<(), RuntimeError> {
        let (client, _conn) = client_with(ok_response(
            r#"{"Configuration": {
                "FunctionName": "echo",
                "Timeout": 3,
                "MemorySize": 128,
                "EphemeralStorage": {"Size": 512},
                "LoggingConfig": {"LogFormat": "JSON", "LogGroup": "/aws/lambda/echo"}
            }}"#,
        ))
        .await;

        let function = get_function(&client, "echo").await?;
        assert_eq!(None, function.configuration.role);
        assert_eq!("JSON", function.configuration.logging_config.log_format);
        assert!(function.tags.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_get_function_missing_logging_config() {
        let (client, _conn) = client_with(ok_response(
            r#"{"Configuration": {
                "FunctionName": "echo",
                "Timeout": 3,
                "MemorySize": 128,
                "EphemeralStorage": {"Size": 512}
            }}"#,
        ))
        .await;

        let err = get_function(&client, "echo").await.unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::MissingField(ref field) if field == "Configuration.LoggingConfig"
        ));
        assert_eq!(422, err.status_code());
    }

    #[tokio::test]
    async fn test_get_function_missing_configuration() {
        let (client, _conn) = client_with(ok_response(r#"{"Tags": {}}"#)).await;

        let err = get_function(&client, "echo").await.unwrap_err();
        assert!(matches!(err, RuntimeError::MissingField(ref field) if field == "Configuration"));
    }

    #[tokio::test]
    async fn test_get_function_upstream_error() {
        let (client, _conn) = client_with(
            http::Response::builder()
                .status(404)
                .header("x-amzn-errortype", "ResourceNotFoundException")
                .body(SdkBody::from(
                    r#"{"Type": "User", "Message": "Function not found: echo"}"#,
                ))
                .unwrap(),
        )
        .await;

        let err = get_function(&client, "echo").await.unwrap_err();
        assert!(matches!(err, RuntimeError::Lambda(_)));
        assert_eq!(500, err.status_code());
    }
}
