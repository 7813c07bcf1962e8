use aws_config::{retry::RetryConfig, BehaviorVersion};
use aws_sdk_iam::config::Credentials;
use aws_smithy_runtime::client::http::test_util::StaticReplayClient;
use aws_smithy_types::body::SdkBody;
use aws_types::{region::Region, SdkConfig};

/// Configuration for mocking AWS SDK clients
pub async fn get_mock_config(conn: StaticReplayClient) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new("us-west-1"))
        .credentials_provider(Credentials::new(
            "accesskey",
            "privatekey",
            None,
            None,
            "dummy",
        ))
        .retry_config(RetryConfig::disabled())
        .http_client(conn)
        .load()
        .await
}

/// Base request builder for the AWS SDK calls
pub fn get_request_builder(service: &str) -> http::request::Builder {
    http::Request::builder().uri(format!("https://{service}.us-west-1.amazonaws.com/"))
}

/// Successful response with the given body
pub fn ok_response(body: &str) -> http::Response<SdkBody> {
    http::Response::builder()
        .status(200)
        .body(SdkBody::from(body.to_string()))
        .unwrap()
}

/// Request placeholder for calls whose request shape the test doesn't assert on
pub fn any_request(service: &str) -> http::Request<SdkBody> {
    get_request_builder(service).body(SdkBody::empty()).unwrap()
}

/// GetFunction response for a function named `echo`
pub const GET_FUNCTION_RESPONSE: &str = r#"{
    "Configuration": {
        "FunctionName": "echo",
        "Role": "arn:aws:iam::123456789012:role/echo-role",
        "Timeout": 30,
        "MemorySize": 512,
        "EphemeralStorage": {"Size": 1024},
        "LoggingConfig": {"LogFormat": "Text", "LogGroup": "/aws/lambda/echo"}
    },
    "Tags": {"Branch": "main", "Sha": "abc123"}
}"#;

/// GetRole response for the role `echo-role`
pub const GET_ROLE_RESPONSE: &str = r#"<GetRoleResponse xmlns="https://iam.amazonaws.com/doc/2010-05-08/">
  <GetRoleResult>
    <Role>
      <Path>/</Path>
      <RoleName>echo-role</RoleName>
      <RoleId>AROAEXAMPLEID</RoleId>
      <Arn>arn:aws:iam::123456789012:role/echo-role</Arn>
      <CreateDate>2024-01-01T00:00:00Z</CreateDate>
      <Tags>
        <member><Key>Branch</Key><Value>main</Value></member>
        <member><Key>Origin</Key><Value>github</Value></member>
      </Tags>
    </Role>
  </GetRoleResult>
  <ResponseMetadata><RequestId>req-1</RequestId></ResponseMetadata>
</GetRoleResponse>"#;

/// ListAttachedRolePolicies response with two policies
pub const LIST_ATTACHED_ROLE_POLICIES_RESPONSE: &str = r#"<ListAttachedRolePoliciesResponse xmlns="https://iam.amazonaws.com/doc/2010-05-08/">
  <ListAttachedRolePoliciesResult>
    <AttachedPolicies>
      <member>
        <PolicyName>echo-policy</PolicyName>
        <PolicyArn>arn:aws:iam::123456789012:policy/echo-policy</PolicyArn>
      </member>
      <member>
        <PolicyName>AWSLambdaBasicExecutionRole</PolicyName>
        <PolicyArn>arn:aws:iam::aws:policy/service-role/AWSLambdaBasicExecutionRole</PolicyArn>
      </member>
    </AttachedPolicies>
    <IsTruncated>false</IsTruncated>
  </ListAttachedRolePoliciesResult>
  <ResponseMetadata><RequestId>req-2</RequestId></ResponseMetadata>
</ListAttachedRolePoliciesResponse>"#;

/// GetPolicy response for `echo-policy`
pub const GET_POLICY_RESPONSE: &str = r#"<GetPolicyResponse xmlns="https://iam.amazonaws.com/doc/2010-05-08/">
  <GetPolicyResult>
    <Policy>
      <PolicyName>echo-policy</PolicyName>
      <PolicyId>ANPAEXAMPLEID</PolicyId>
      <Arn>arn:aws:iam::123456789012:policy/echo-policy</Arn>
      <Path>/</Path>
      <DefaultVersionId>v1</DefaultVersionId>
      <AttachmentCount>1</AttachmentCount>
      <IsAttachable>true</IsAttachable>
      <Tags>
        <member><Key>Owner</Key><Value>first</Value></member>
        <member><Key>Owner</Key><Value>second</Value></member>
      </Tags>
    </Policy>
  </GetPolicyResult>
  <ResponseMetadata><RequestId>req-3</RequestId></ResponseMetadata>
</GetPolicyResponse>"#;
