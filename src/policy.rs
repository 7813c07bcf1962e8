use crate::{error::RuntimeError, role::Role, tag::Tag};
use aws_sdk_iam::{operation::get_policy::GetPolicyOutput, Client, Error};
use serde::Serialize;

/// `AttachedPolicy` is a managed policy attached to the execution role
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttachedPolicy {
    /// friendly name of the policy
    pub policy_name: String,
    /// ARN used to fetch the policy details
    pub policy_arn: String,
}

/// `Policy` stores the details of a single managed policy
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Policy {
    /// friendly name of the policy
    pub policy_name: String,
    /// ARN of the policy
    pub arn: String,
    /// tags in the order IAM returns them
    pub tags: Vec<Tag>,
}

/// List the policies attached to the role, in the order IAM returns them.
#[tracing::instrument(skip(client, role), fields(role = %role.role_name))]
pub async fn list_attached_policies(
    client: &Client,
    role: &Role,
) -> Result<Vec<AttachedPolicy>, RuntimeError> {
    tracing::info!("listing attached policies");

    let mut policies: Vec<AttachedPolicy> = Vec::new();
    let mut marker = None;

    loop {
        let res = client
            .list_attached_role_policies()
            .role_name(&role.role_name)
            .set_marker(marker)
            .send()
            .await
            .map_err(Error::from)?;

        for policy in res.attached_policies() {
            policies.push(policy.try_into()?);
        }

        let truncated = res.is_truncated();
        marker = res.marker;
        if !truncated || marker.is_none() {
            break;
        }
    }

    Ok(policies)
}

/// Find the policy attached to the role with the given name and fetch its details.
/// Names are compared exactly, the first match wins.
#[tracing::instrument(skip(client, role), fields(role = %role.role_name))]
pub async fn get_policy(
    client: &Client,
    role: &Role,
    policy_name: &str,
) -> Result<Policy, RuntimeError> {
    let policies = list_attached_policies(client, role).await?;

    let attached = policies
        .iter()
        .find(|p| p.policy_name == policy_name)
        .ok_or(RuntimeError::NotFound("policy not found"))?;

    tracing::info!(policy_arn = %attached.policy_arn, "fetching policy");

    let res = client
        .get_policy()
        .policy_arn(&attached.policy_arn)
        .send()
        .await
        .map_err(Error::from)?;

    res.try_into()
}

impl TryFrom<&aws_sdk_iam::types::AttachedPolicy> for AttachedPolicy {
    type Error = RuntimeError;

    fn try_from(value: &aws_sdk_iam::types::AttachedPolicy) -> Result<Self, Self::Error> {
        Ok(AttachedPolicy {
            policy_name: value
                .policy_name()
                .ok_or_else(|| RuntimeError::MissingField("AttachedPolicies.PolicyName".into()))?
                .to_string(),
            policy_arn: value
                .policy_arn()
                .ok_or_else(|| RuntimeError::MissingField("AttachedPolicies.PolicyArn".into()))?
                .to_string(),
        })
    }
}

impl TryFrom<GetPolicyOutput> for Policy {
    type Error = RuntimeError;

    fn try_from(value: GetPolicyOutput) -> Result<Self, Self::Error> {
        let policy = value
            .policy
            .ok_or_else(|| RuntimeError::MissingField("Policy".into()))?;

        Ok(Policy {
            policy_name: policy
                .policy_name()
                .ok_or_else(|| RuntimeError::MissingField("Policy.PolicyName".into()))?
                .to_string(),
            arn: policy
                .arn()
                .ok_or_else(|| RuntimeError::MissingField("Policy.Arn".into()))?
                .to_string(),
            tags: policy.tags().iter().map(Tag::from).collect(),
        })
    }
}
