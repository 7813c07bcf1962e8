use aws_sdk_cloudwatchlogs::{
    operation::{describe_log_streams::DescribeLogStreamsOutput, get_log_events::GetLogEventsOutput},
    types::OrderBy,
    Client, Error,
};
use serde::Serialize;

use crate::error::RuntimeError;

/// Maximum number of log streams inspected by a single tail request.
const MAX_LOG_STREAMS: i32 = 50;

/// Largest `limit` GetLogEvents accepts.
const MAX_LOG_EVENTS: i32 = 10_000;

/// Number of log lines returned when the caller doesn't ask for a specific count.
pub const DEFAULT_TAIL_SIZE: usize = 10;

/// `LogStream` is a stream within the function's log group
#[derive(Clone, Debug, PartialEq)]
pub struct LogStream {
    /// name of the stream
    pub log_stream_name: String,
    /// time of the last event, in milliseconds since the epoch
    pub last_event_timestamp: Option<i64>,
}

/// `LogEvent` is a single line emitted by the function
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LogEvent {
    /// time of the event, in milliseconds since the epoch
    pub timestamp: i64,
    /// raw log line
    pub message: String,
}

/// Options for a tail request
#[derive(Clone, Debug, PartialEq)]
pub struct TailOptions {
    /// maximum number of events returned
    pub n: usize,
    /// drop events containing this text while collecting them
    pub exclude: Option<String>,
    /// keep only events containing this text, once collection is done
    pub include: Option<String>,
    /// fail with a not found error instead of returning an empty result
    pub expect: bool,
}

impl Default for TailOptions {
    fn default() -> Self {
        TailOptions {
            n: DEFAULT_TAIL_SIZE,
            exclude: None,
            include: None,
            expect: false,
        }
    }
}

/// List the streams in the log group, most recently active first.
#[tracing::instrument(skip(client))]
async fn latest_log_streams(
    client: &Client,
    log_group: &str,
) -> Result<Vec<LogStream>, RuntimeError> {
    let res = client
        .describe_log_streams()
        .log_group_name(log_group)
        .order_by(OrderBy::LastEventTime)
        .descending(true)
        .limit(MAX_LOG_STREAMS)
        .send()
        .await
        .map_err(Error::from)?;

    log_streams(res)
}

/// Read up to `limit` of the most recent events in a stream.
#[tracing::instrument(skip(client))]
async fn latest_log_events(
    client: &Client,
    log_group: &str,
    log_stream: &str,
    limit: usize,
) -> Result<Vec<LogEvent>, RuntimeError> {
    let limit = i32::try_from(limit).map_or(MAX_LOG_EVENTS, |l| l.min(MAX_LOG_EVENTS));

    let res = client
        .get_log_events()
        .log_group_name(log_group)
        .log_stream_name(log_stream)
        .limit(limit)
        .start_from_head(false)
        .send()
        .await
        .map_err(Error::from)?;

    log_events(res)
}

/// Collect the most recent log lines in the log group.
///
/// Streams are read newest first and each read is capped to the events still
/// missing to reach `n`. The exclude filter is applied to every event as it's
/// collected, so excluded events don't count against `n`. The include filter
/// runs once over everything collected, after the budget is spent.
#[tracing::instrument(skip(client))]
pub async fn tail(
    client: &Client,
    log_group: &str,
    options: &TailOptions,
) -> Result<Vec<LogEvent>, RuntimeError> {
    let streams = latest_log_streams(client, log_group).await?;
    tracing::info!(streams = streams.len(), "tailing log group");

    let mut events: Vec<LogEvent> = Vec::new();
    for stream in &streams {
        if events.len() >= options.n {
            break;
        }

        let limit = options.n - events.len();
        let batch =
            latest_log_events(client, log_group, &stream.log_stream_name, limit).await?;

        match options.exclude.as_deref() {
            Some(exclude) => {
                events.extend(batch.into_iter().filter(|e| !e.message.contains(exclude)))
            }
            None => events.extend(batch),
        }
    }

    if let Some(include) = options.include.as_deref() {
        events.retain(|e| e.message.contains(include));
    }
    events.truncate(options.n);

    if options.expect && events.is_empty() {
        return Err(RuntimeError::NotFound("log not found"));
    }

    Ok(events)
}

fn log_streams(value: DescribeLogStreamsOutput) -> Result<Vec<LogStream>, RuntimeError> {
    value
        .log_streams
        .unwrap_or_default()
        .into_iter()
        .map(|s| {
            Ok(LogStream {
                log_stream_name: s
                    .log_stream_name
                    .ok_or_else(|| RuntimeError::MissingField("logStreams.logStreamName".into()))?,
                last_event_timestamp: s.last_event_timestamp,
            })
        })
        .collect()
}

fn log_events(value: GetLogEventsOutput) -> Result<Vec<LogEvent>, RuntimeError> {
    value
        .events
        .unwrap_or_default()
        .into_iter()
        .map(|e| {
            Ok(LogEvent {
                timestamp: e
                    .timestamp
                    .ok_or_else(|| RuntimeError::MissingField("events.timestamp".into()))?,
                message: e
                    .message
                    .ok_or_else(|| RuntimeError::MissingField("events.message".into()))?,
            })
        })
        .collect()
}
