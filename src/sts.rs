use aws_config::{sts::AssumeRoleProvider, BehaviorVersion};
use aws_types::SdkConfig;

/// Assume a new role to perform the lookups with its permissions.
///
/// The provider refreshes the session credentials when they expire, so the
/// returned configuration can back clients for the lifetime of the process.
#[tracing::instrument(skip(base))]
pub async fn assume_role(
    base: &SdkConfig,
    session_id: &str,
    assume_role_arn: &str,
) -> SdkConfig {
    tracing::info!("assuming new role");

    let provider = AssumeRoleProvider::builder(assume_role_arn)
        .session_name(session_id)
        .configure(base)
        .build()
        .await;

    aws_config::defaults(BehaviorVersion::latest())
        .credentials_provider(provider)
        .load()
        .await
}
