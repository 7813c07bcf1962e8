use crate::{error::RuntimeError, function::FunctionConfig, tag::Tag};
use aws_sdk_iam::{operation::get_role::GetRoleOutput, Client, Error};
use serde::Serialize;

/// `Role` is the IAM execution role bound to the function
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Role {
    /// name of the role
    pub role_name: String,
    /// tags in the order IAM returns them
    pub tags: Vec<Tag>,
}

/// Extract the role name from a role ARN.
///
/// The ARN must contain the `role/` separator exactly once,
/// `arn:aws:iam::123456789012:role/echo-role` yields `echo-role`.
pub fn role_name_from_arn(arn: &str) -> Result<&str, RuntimeError> {
    let parts: Vec<&str> = arn.split("role/").collect();
    match parts.as_slice() {
        [_, name] => Ok(*name),
        _ => Err(RuntimeError::InvalidRoleArn(arn.into())),
    }
}

/// Fetch the execution role of the function.
#[tracing::instrument(skip(client, function), fields(function = %function.function_name))]
pub async fn get_role(client: &Client, function: &FunctionConfig) -> Result<Role, RuntimeError> {
    let arn = function
        .role
        .as_deref()
        .ok_or(RuntimeError::NotFound("role not found"))?;
    let role_name = role_name_from_arn(arn)?;

    tracing::info!(role_name, "fetching execution role");

    let res = client
        .get_role()
        .role_name(role_name)
        .send()
        .await
        .map_err(Error::from)?;

    res.try_into()
}

impl TryFrom<GetRoleOutput> for Role {
    type Error = RuntimeError;

    fn try_from(value: GetRoleOutput) -> Result<Self, Self::Error> {
        let role = value
            .role
            .ok_or_else(|| RuntimeError::MissingField("Role".into()))?;

        Ok(Role {
            role_name: role.role_name().to_string(),
            tags: role.tags().iter().map(Tag::from).collect(),
        })
    }
}
