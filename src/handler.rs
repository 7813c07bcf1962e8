use std::{borrow::Cow, collections::BTreeMap};

use aws_types::SdkConfig;
use lambda_http::{Body, Error, Request, RequestExt, Response};
use percent_encoding::percent_decode_str;
use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    cloudwatch_logs::{self, TailOptions, DEFAULT_TAIL_SIZE},
    config::Config,
    error::RuntimeError,
    function::{self, FunctionInfo},
    policy,
    role::{self, Role},
    tag::tag_map,
};

/// `AppContext` holds the configuration and the AWS clients shared by every request
pub struct AppContext {
    config: Config,
    lambda: aws_sdk_lambda::Client,
    iam: aws_sdk_iam::Client,
    logs: aws_sdk_cloudwatchlogs::Client,
}

impl AppContext {
    /// Initialize the AWS clients.
    #[tracing::instrument(skip(sdk_config))]
    pub fn new(sdk_config: &SdkConfig, config: Config) -> AppContext {
        tracing::info!("Initializing AWS clients");
        AppContext {
            config,
            lambda: aws_sdk_lambda::Client::new(sdk_config),
            iam: aws_sdk_iam::Client::new(sdk_config),
            logs: aws_sdk_cloudwatchlogs::Client::new(sdk_config),
        }
    }

    async fn function(&self) -> Result<FunctionInfo, RuntimeError> {
        function::get_function(&self.lambda, &self.config.function_name).await
    }

    async fn role(&self) -> Result<Role, RuntimeError> {
        let function = self.function().await?;
        role::get_role(&self.iam, &function.configuration).await
    }
}

/// Routes served by the introspection API
#[derive(Clone, Copy, Debug, PartialEq)]
enum Route<'a> {
    Health,
    Events,
    Headers,
    Header(&'a str),
    Env,
    EnvVar(&'a str),
    Function,
    FunctionName,
    FunctionMemory,
    FunctionTimeout,
    FunctionDisk,
    FunctionLogGroup,
    FunctionLogTail,
    FunctionTags,
    FunctionTag(&'a str),
    Role,
    RoleName,
    RoleTags,
    RoleTag(&'a str),
    Policies,
    Policy(&'a str),
    PolicyTags(&'a str),
}

impl<'a> Route<'a> {
    fn parse(method: &str, segments: &[&'a str]) -> Option<Route<'a>> {
        let route = match (method, segments) {
            ("GET", ["health"]) | ("GET", ["public", "health"]) => Route::Health,
            ("POST", ["events"]) => Route::Events,
            ("GET", ["headers"]) => Route::Headers,
            ("GET", ["headers", key]) => Route::Header(*key),
            ("GET", ["env"]) => Route::Env,
            ("GET", ["env", key]) => Route::EnvVar(*key),
            ("GET", ["function"]) => Route::Function,
            ("GET", ["function", "name"]) => Route::FunctionName,
            ("GET", ["function", "memory"]) => Route::FunctionMemory,
            ("GET", ["function", "timeout"]) => Route::FunctionTimeout,
            ("GET", ["function", "disk"]) => Route::FunctionDisk,
            ("GET", ["function", "log_group"]) => Route::FunctionLogGroup,
            ("GET", ["function", "log_group", "tail"]) => Route::FunctionLogTail,
            ("GET", ["function", "tags"]) => Route::FunctionTags,
            ("GET", ["function", "tags", key]) => Route::FunctionTag(*key),
            ("GET", ["function", "role"]) => Route::Role,
            ("GET", ["function", "role", "name"]) => Route::RoleName,
            ("GET", ["function", "role", "tags"]) => Route::RoleTags,
            ("GET", ["function", "role", "tags", key]) => Route::RoleTag(*key),
            ("GET", ["function", "role", "policies"]) => Route::Policies,
            ("GET", ["function", "role", "policies", name]) => Route::Policy(*name),
            ("GET", ["function", "role", "policies", name, "tags"]) => Route::PolicyTags(*name),
            _ => return None,
        };
        Some(route)
    }
}

/// Successful response payload
#[derive(Debug, PartialEq)]
enum Reply {
    Json(Value),
    Text(String),
}

fn json<T: Serialize>(value: &T) -> Result<Reply, RuntimeError> {
    Ok(Reply::Json(serde_json::to_value(value)?))
}

fn text<T: ToString>(value: T) -> Result<Reply, RuntimeError> {
    Ok(Reply::Text(value.to_string()))
}

/// `handle_request` is the Lambda function entry point
/// that answers the introspection API requests
#[tracing::instrument(skip(ctx, event), fields(method = %event.method(), path = %event.uri().path()))]
pub async fn handle_request(ctx: &AppContext, event: Request) -> Result<Response<Body>, Error> {
    match dispatch(ctx, &event).await {
        Ok(reply) => respond(200, reply),
        Err(err) => {
            tracing::warn!(status = err.status_code(), error = %err, "request failed");
            respond(err.status_code(), Reply::Json(json!({ "detail": err.to_string() })))
        }
    }
}

async fn dispatch(ctx: &AppContext, event: &Request) -> Result<Reply, RuntimeError> {
    let path = request_path(event);
    let segments = path_segments(&path)?;
    let segments: Vec<&str> = segments.iter().map(|s| s.as_ref()).collect();

    match Route::parse(event.method().as_str(), &segments) {
        Some(route) => serve(ctx, event, route).await,
        None => Err(RuntimeError::NotFound("Not Found")),
    }
}

async fn serve(ctx: &AppContext, event: &Request, route: Route<'_>) -> Result<Reply, RuntimeError> {
    match route {
        Route::Health => Ok(Reply::Json(json!({ "status": "ok" }))),
        Route::Events => {
            let body: &[u8] = event.body();
            let payload: Value = serde_json::from_slice(body)
                .map_err(|e| RuntimeError::InvalidParameter(format!("event body: {e}")))?;
            tracing::info!(event = %payload, "received event");
            Ok(Reply::Json(json!({ "status": "ok" })))
        }
        Route::Headers => json(&request_headers(event)),
        Route::Header(key) => event
            .headers()
            .get(key)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .map(Reply::Text)
            .ok_or(RuntimeError::NotFound("header not found")),
        Route::Env => json(&environment()),
        Route::EnvVar(key) => std::env::var(key)
            .map(Reply::Text)
            .map_err(|_| RuntimeError::NotFound("environment variable not found")),
        Route::Function => json(&ctx.function().await?),
        Route::FunctionName => text(ctx.function().await?.configuration.function_name),
        Route::FunctionMemory => text(ctx.function().await?.configuration.memory_size),
        Route::FunctionTimeout => text(ctx.function().await?.configuration.timeout),
        Route::FunctionDisk => text(ctx.function().await?.configuration.ephemeral_storage.size),
        Route::FunctionLogGroup => text(ctx.function().await?.configuration.logging_config.log_group),
        Route::FunctionLogTail => {
            let options = tail_options(event)?;
            let function = ctx.function().await?;
            let log_group = &function.configuration.logging_config.log_group;
            let events = cloudwatch_logs::tail(&ctx.logs, log_group, &options).await?;
            let messages: Vec<String> = events.into_iter().map(|e| e.message).collect();
            json(&messages)
        }
        Route::FunctionTags => json(&ctx.function().await?.tags),
        Route::FunctionTag(key) => ctx
            .function()
            .await?
            .tags
            .remove(key)
            .map(Reply::Text)
            .ok_or(RuntimeError::NotFound("tag not found")),
        Route::Role => json(&BTreeMap::from([("Role", ctx.role().await?)])),
        Route::RoleName => text(ctx.role().await?.role_name),
        Route::RoleTags => json(&tag_map(&ctx.role().await?.tags)),
        Route::RoleTag(key) => tag_map(&ctx.role().await?.tags)
            .remove(key)
            .map(Reply::Text)
            .ok_or(RuntimeError::NotFound("tag not found")),
        Route::Policies => {
            let role = ctx.role().await?;
            json(&policy::list_attached_policies(&ctx.iam, &role).await?)
        }
        Route::Policy(name) => {
            let role = ctx.role().await?;
            let policy = policy::get_policy(&ctx.iam, &role, name).await?;
            json(&BTreeMap::from([("Policy", policy)]))
        }
        Route::PolicyTags(name) => {
            let role = ctx.role().await?;
            let policy = policy::get_policy(&ctx.iam, &role, name).await?;
            json(&tag_map(&policy.tags))
        }
    }
}

/// Request path with the `x-forwarded-prefix` header value stripped from it.
fn request_path(event: &Request) -> String {
    let path = event.uri().path();
    let prefix = event
        .headers()
        .get("x-forwarded-prefix")
        .and_then(|v| v.to_str().ok())
        .map(|p| p.trim_end_matches('/'))
        .filter(|p| !p.is_empty());

    match prefix.and_then(|p| path.strip_prefix(p)) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.to_string(),
        _ => path.to_string(),
    }
}

/// Split the path into percent-decoded segments, so keys match the names AWS reports.
fn path_segments(path: &str) -> Result<Vec<Cow<'_, str>>, RuntimeError> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| {
            percent_decode_str(s)
                .decode_utf8()
                .map_err(|_| RuntimeError::InvalidParameter(format!("path segment {s}")))
        })
        .collect()
}

fn tail_options(event: &Request) -> Result<TailOptions, RuntimeError> {
    let params = event.query_string_parameters();

    let n = match params.first("n") {
        Some(value) => value
            .parse::<usize>()
            .map_err(|_| RuntimeError::InvalidParameter(format!("n={value}")))?,
        None => DEFAULT_TAIL_SIZE,
    };

    let expect = match params.first("expect") {
        Some(value) => parse_bool(value)
            .ok_or_else(|| RuntimeError::InvalidParameter(format!("expect={value}")))?,
        None => false,
    };

    // empty filters match everything, treat them as absent
    let filter = |name: &str| {
        params
            .first(name)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    Ok(TailOptions {
        n,
        exclude: filter("grepv"),
        include: filter("grep"),
        expect,
    })
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn request_headers(event: &Request) -> BTreeMap<String, String> {
    event
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

fn environment() -> BTreeMap<String, String> {
    std::env::vars_os()
        .map(|(k, v)| (k.to_string_lossy().into_owned(), v.to_string_lossy().into_owned()))
        .collect()
}

fn respond(status: u16, reply: Reply) -> Result<Response<Body>, Error> {
    let (content_type, body) = match reply {
        Reply::Json(value) => ("application/json", value.to_string()),
        Reply::Text(text) => ("text/plain; charset=utf-8", text),
    };

    let response = Response::builder()
        .status(status)
        .header("content-type", content_type)
        .body(Body::from(body))?;

    Ok(response)
}
