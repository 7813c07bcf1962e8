use aws_config::BehaviorVersion;
use lambda_echo::{config::Config, handle_request, sts, AppContext};
use lambda_http::{run, service_fn, Error, Request};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        // disabling time is handy because CloudWatch will add the ingestion time.
        .without_time()
        .init();

    let config = Config::from_env()?;

    // Get AWS Configuration
    let mut sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    if let Some(assume_role_arn) = &config.assume_role_arn {
        let session_id = format!("lambda_echo_session_{}", uuid::Uuid::new_v4());
        sdk_config = sts::assume_role(&sdk_config, &session_id, assume_role_arn).await;
    }

    let ctx = AppContext::new(&sdk_config, config);

    run(service_fn(|event: Request| handle_request(&ctx, event))).await
}
