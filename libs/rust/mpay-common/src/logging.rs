//! Structured logging.
//!
//! [`init_logging`] installs the process-wide `tracing` subscriber once at
//! startup and returns a [`LogLevelHandle`] for changing the level at
//! runtime. Call sites log through a [`Logger`] passed to them explicitly.
//! A logger carries an immutable [`LogContext`]; extending it yields a new
//! context and leaves the parent untouched, so fields added for one request
//! never leak into another.

use crate::error::{CommonError, CommonResult};
use serde_json::Value;
use std::fmt::{self, Write as _};
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber, debug, error, info, warn};
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::time::{FormatTime, SystemTime};
use tracing_subscriber::fmt::{FmtContext, MakeWriter};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{
    Registry, filter::LevelFilter, fmt as tracing_fmt, layer::SubscriberExt, reload,
    util::SubscriberInitExt,
};
use uuid::Uuid;

/// Environment variable read by [`LogConfig::from_env`].
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

/// Log severity.
///
/// `Fatal` and `Panic` are accepted for compatibility with other services'
/// configuration; both filter like `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Debug level
    Debug,
    /// Info level
    #[default]
    Info,
    /// Warning level
    Warn,
    /// Error level
    Error,
    /// Fatal level
    Fatal,
    /// Panic level
    Panic,
}

impl LogLevel {
    /// Convert to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Fatal => "fatal",
            Self::Panic => "panic",
        }
    }

    /// Filter installed for this level.
    #[must_use]
    pub const fn filter(&self) -> LevelFilter {
        match self {
            Self::Debug => LevelFilter::DEBUG,
            Self::Info => LevelFilter::INFO,
            Self::Warn => LevelFilter::WARN,
            Self::Error | Self::Fatal | Self::Panic => LevelFilter::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            "fatal" => Ok(Self::Fatal),
            "panic" => Ok(Self::Panic),
            _ => Err(CommonError::invalid_log_level(s)),
        }
    }
}

/// Logger configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Service name attached to the startup event
    pub service_name: String,
    /// Initial level
    pub level: LogLevel,
    /// Whether to output JSON format
    pub json_output: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "mpay-service".to_string(),
            level: LogLevel::Info,
            json_output: true,
        }
    }
}

impl LogConfig {
    /// Default config with the level taken from `LOG_LEVEL`.
    ///
    /// A missing or unrecognised value falls back to `info`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_level(level_or_default(std::env::var(LOG_LEVEL_ENV).ok().as_deref()))
    }

    /// Create config with custom service name.
    #[must_use]
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    /// Create config with custom log level.
    #[must_use]
    pub const fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Switch to human-readable output.
    #[must_use]
    pub const fn with_plain_output(mut self) -> Self {
        self.json_output = false;
        self
    }
}

fn level_or_default(value: Option<&str>) -> LogLevel {
    value.and_then(|v| v.parse().ok()).unwrap_or_default()
}

/// Runtime handle for the installed level filter.
#[derive(Clone)]
pub struct LogLevelHandle {
    inner: reload::Handle<LevelFilter, Registry>,
    current: Arc<Mutex<LogLevel>>,
}

impl fmt::Debug for LogLevelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogLevelHandle")
            .field("level", &self.level())
            .finish_non_exhaustive()
    }
}

impl LogLevelHandle {
    /// Level currently in effect.
    #[must_use]
    pub fn level(&self) -> LogLevel {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Change the level from its string name.
    ///
    /// # Errors
    ///
    /// Returns [`CommonError::InvalidLogLevel`] for unknown names and
    /// [`CommonError::LoggerInit`] if the subscriber has been dropped.
    pub fn set_level(&self, level: &str) -> CommonResult<()> {
        let level: LogLevel = level.parse()?;
        self.inner
            .modify(|filter| *filter = level.filter())
            .map_err(|e| CommonError::logger_init(e.to_string()))?;

        let previous = std::mem::replace(
            &mut *self.current.lock().unwrap_or_else(PoisonError::into_inner),
            level,
        );
        info!(from = %previous, to = %level, "log level changed");
        Ok(())
    }
}

/// Name of the event field carrying a [`Logger`] record.
const RECORD_FIELD: &str = "fields";

/// One JSON object per line.
///
/// A [`Logger`] record is written as top-level members in the order it was
/// built, repeated keys included, rather than as a nested string.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLines;

impl<S, N> FormatEvent<S, N> for JsonLines
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let mut visitor = JsonFieldVisitor::default();
        event.record(&mut visitor);

        let mut timestamp = String::new();
        SystemTime.format_time(&mut Writer::new(&mut timestamp))?;

        let mut line = String::from("{");
        push_member(&mut line, "timestamp", &Value::from(timestamp));
        push_member(&mut line, "level", &Value::from(meta.level().to_string()));
        push_member(&mut line, "target", &Value::from(meta.target()));
        if let Some(message) = visitor.message {
            push_member(&mut line, "message", &Value::from(message));
        }
        for (key, value) in &visitor.fields {
            push_member(&mut line, key, value);
        }
        if let Some(record) = visitor.record {
            splice_record(&mut line, &record);
        }
        line.push('}');

        writeln!(writer, "{line}")
    }
}

fn push_member(line: &mut String, key: &str, value: &Value) {
    if !line.ends_with('{') {
        line.push(',');
    }
    let _ = write!(line, "{}:{value}", Value::from(key));
}

/// Append the members of a rendered record object, or keep it as a string
/// when it is not one.
fn splice_record(line: &mut String, record: &str) {
    let is_object = serde_json::from_str::<Value>(record).is_ok_and(|v| v.is_object());
    let members = record
        .strip_prefix('{')
        .and_then(|r| r.strip_suffix('}'))
        .filter(|_| is_object);

    match members {
        Some("") => {}
        Some(members) => {
            if !line.ends_with('{') {
                line.push(',');
            }
            line.push_str(members);
        }
        None => push_member(line, RECORD_FIELD, &Value::from(record)),
    }
}

#[derive(Default)]
struct JsonFieldVisitor {
    message: Option<String>,
    record: Option<String>,
    fields: Vec<(String, Value)>,
}

impl JsonFieldVisitor {
    fn push(&mut self, field: &Field, value: Value) {
        match field.name() {
            "message" => self.message = Some(into_text(value)),
            RECORD_FIELD => self.record = Some(into_text(value)),
            name => self.fields.push((name.to_string(), value)),
        }
    }
}

fn into_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

impl Visit for JsonFieldVisitor {
    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, Value::from(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, Value::from(format!("{value:?}")));
    }
}

/// Renders a record as a JSON object, keeping order and repeated keys.
struct RecordDisplay<'a>(&'a [(String, Value)]);

impl fmt::Display for RecordDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('{')?;
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_char(',')?;
            }
            write!(f, "{}:{value}", Value::from(key.as_str()))?;
        }
        f.write_char('}')
    }
}

/// Build the subscriber described by `config` without installing it.
pub fn build_subscriber(config: &LogConfig) -> (impl Subscriber + Send + Sync + 'static, LogLevelHandle) {
    build_subscriber_with(config, std::io::stderr)
}

/// Same as [`build_subscriber`], writing to `writer` instead of stderr.
pub fn build_subscriber_with<W>(
    config: &LogConfig,
    writer: W,
) -> (impl Subscriber + Send + Sync + 'static, LogLevelHandle)
where
    W: for<'a> MakeWriter<'a> + Clone + Send + Sync + 'static,
{
    let (filter, handle) = reload::Layer::new(config.level.filter());

    let json = config
        .json_output
        .then(|| tracing_fmt::layer().event_format(JsonLines).with_writer(writer.clone()));
    let plain = (!config.json_output).then(|| tracing_fmt::layer().with_writer(writer));

    let subscriber = tracing_subscriber::registry().with(filter).with(json).with(plain);

    let handle = LogLevelHandle {
        inner: handle,
        current: Arc::new(Mutex::new(config.level)),
    };
    (subscriber, handle)
}

/// Install the global subscriber.
///
/// Should be called once at application startup.
///
/// # Errors
///
/// Returns [`CommonError::LoggerInit`] if a global subscriber is already set.
pub fn init_logging(config: &LogConfig) -> CommonResult<LogLevelHandle> {
    let (subscriber, handle) = build_subscriber(config);
    subscriber
        .try_init()
        .map_err(|e| CommonError::logger_init(e.to_string()))?;

    info!(service = %config.service_name, log_level = %config.level, "logger initialized");
    Ok(handle)
}

/// Immutable, ordered set of fields attached to every event logged with it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogContext {
    fields: Arc<Vec<(String, Value)>>,
}

impl LogContext {
    /// Empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// New context with one more field appended.
    #[must_use]
    pub fn with(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with_fields([(key.into(), value.into())])
    }

    /// New context with several fields appended, in order.
    #[must_use]
    pub fn with_fields(&self, fields: impl IntoIterator<Item = (String, Value)>) -> Self {
        let mut merged = Vec::clone(&self.fields);
        merged.extend(fields);
        Self {
            fields: Arc::new(merged),
        }
    }

    /// New context carrying a fresh `correlation_id`.
    #[must_use]
    pub fn with_correlation_id(&self) -> Self {
        self.with("correlation_id", Uuid::new_v4().to_string())
    }

    /// Fields in insertion order.
    #[must_use]
    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    /// Most recently added value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Whether the context has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Logger handed to collaborators by the service at startup.
#[derive(Debug, Clone)]
pub struct Logger {
    service: Arc<str>,
    context: LogContext,
}

impl Logger {
    /// Create a logger for `service` with an empty context.
    #[must_use]
    pub fn new(service: impl Into<String>) -> Self {
        let service: String = service.into();
        Self {
            service: Arc::from(service),
            context: LogContext::new(),
        }
    }

    /// Service name attached to every event.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Context carried by this logger.
    #[must_use]
    pub const fn context(&self) -> &LogContext {
        &self.context
    }

    /// Logger sharing this service with `key = value` added to the context.
    #[must_use]
    pub fn with(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with_context(self.context.with(key, value))
    }

    /// Logger sharing this service with `context` in place of the current one.
    #[must_use]
    pub fn with_context(&self, context: LogContext) -> Self {
        Self {
            service: Arc::clone(&self.service),
            context,
        }
    }

    /// Context fields followed by `extra`, in order.
    #[must_use]
    pub fn record(&self, extra: &[(&str, Value)]) -> Vec<(String, Value)> {
        self.context
            .fields()
            .iter()
            .cloned()
            .chain(extra.iter().map(|(k, v)| ((*k).to_string(), v.clone())))
            .collect()
    }

    /// Emit an event at `level`.
    pub fn log(&self, level: LogLevel, message: &str, extra: &[(&str, Value)]) {
        let record = self.record(extra);
        let fields = RecordDisplay(&record);

        match level {
            LogLevel::Debug => debug!(service = %self.service, fields = %fields, "{message}"),
            LogLevel::Info => info!(service = %self.service, fields = %fields, "{message}"),
            LogLevel::Warn => warn!(service = %self.service, fields = %fields, "{message}"),
            LogLevel::Error | LogLevel::Fatal | LogLevel::Panic => error!(
                service = %self.service,
                fields = %fields,
                severity = level.as_str(),
                "{message}"
            ),
        }
    }

    /// Log a debug message.
    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message, &[]);
    }

    /// Log an info message.
    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message, &[]);
    }

    /// Log a warning message.
    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message, &[]);
    }

    /// Log an error message.
    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message, &[]);
    }

    /// Log a debug message with extra fields.
    pub fn debug_with(&self, message: &str, extra: &[(&str, Value)]) {
        self.log(LogLevel::Debug, message, extra);
    }

    /// Log an info message with extra fields.
    pub fn info_with(&self, message: &str, extra: &[(&str, Value)]) {
        self.log(LogLevel::Info, message, extra);
    }

    /// Log a warning message with extra fields.
    pub fn warn_with(&self, message: &str, extra: &[(&str, Value)]) {
        self.log(LogLevel::Warn, message, extra);
    }

    /// Log an error message with extra fields.
    pub fn error_with(&self, message: &str, extra: &[(&str, Value)]) {
        self.log(LogLevel::Error, message, extra);
    }

    /// Adapter for libraries that log with alternating keys and values.
    #[must_use]
    pub fn key_values(&self) -> KeyValueLogger {
        KeyValueLogger {
            logger: self.clone(),
        }
    }
}

/// Pair up `[k1, v1, k2, v2, ...]`.
///
/// String keys are used as-is, other keys by their JSON rendering. A
/// trailing key without a value is dropped.
#[must_use]
pub fn fields_from_key_values(key_values: &[Value]) -> Vec<(String, Value)> {
    key_values
        .chunks_exact(2)
        .map(|pair| {
            let key = match &pair[0] {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key, pair[1].clone())
        })
        .collect()
}

/// [`Logger`] front for key/value style callers such as workflow SDKs.
#[derive(Debug, Clone)]
pub struct KeyValueLogger {
    logger: Logger,
}

impl KeyValueLogger {
    fn emit(&self, level: LogLevel, message: &str, key_values: &[Value]) {
        self.logger
            .with_context(self.logger.context.with_fields(fields_from_key_values(key_values)))
            .log(level, message, &[]);
    }

    /// Log a debug message.
    pub fn debug(&self, message: &str, key_values: &[Value]) {
        self.emit(LogLevel::Debug, message, key_values);
    }

    /// Log an info message.
    pub fn info(&self, message: &str, key_values: &[Value]) {
        self.emit(LogLevel::Info, message, key_values);
    }

    /// Log a warning message.
    pub fn warn(&self, message: &str, key_values: &[Value]) {
        self.emit(LogLevel::Warn, message, key_values);
    }

    /// Log an error message.
    pub fn error(&self, message: &str, key_values: &[Value]) {
        self.emit(LogLevel::Error, message, key_values);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Capture {
        fn lines(&self) -> Vec<String> {
            let bytes = self.0.lock().unwrap().clone();
            String::from_utf8(bytes).unwrap().lines().map(str::to_string).collect()
        }
    }

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Capture {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture_json(f: impl FnOnce()) -> Vec<String> {
        let capture = Capture::default();
        let (subscriber, _handle) = build_subscriber_with(&LogConfig::default(), capture.clone());
        tracing::subscriber::with_default(subscriber, f);
        capture.lines()
    }

    #[test]
    fn test_parse_levels() {
        assert_eq!("debug".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("INFO".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!("Warn".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("error".parse::<LogLevel>().unwrap(), LogLevel::Error);
        assert_eq!("fatal".parse::<LogLevel>().unwrap(), LogLevel::Fatal);
        assert_eq!("panic".parse::<LogLevel>().unwrap(), LogLevel::Panic);
    }

    #[test]
    fn test_unknown_level_rejected() {
        let err = "verbose".parse::<LogLevel>().unwrap_err();
        assert_eq!(err.to_string(), "unknown log level: verbose");
    }

    #[test]
    fn test_level_filters() {
        assert_eq!(LogLevel::Debug.filter(), LevelFilter::DEBUG);
        assert_eq!(LogLevel::Fatal.filter(), LevelFilter::ERROR);
        assert_eq!(LogLevel::Panic.filter(), LevelFilter::ERROR);
    }

    #[test]
    fn test_env_value_fallback() {
        assert_eq!(level_or_default(None), LogLevel::Info);
        assert_eq!(level_or_default(Some("nonsense")), LogLevel::Info);
        assert_eq!(level_or_default(Some("warn")), LogLevel::Warn);
    }

    #[test]
    fn test_config_builder() {
        let config = LogConfig::default()
            .with_service_name("eds-gateway")
            .with_level(LogLevel::Debug)
            .with_plain_output();

        assert_eq!(config.service_name, "eds-gateway");
        assert_eq!(config.level, LogLevel::Debug);
        assert!(!config.json_output);
    }

    #[test]
    fn test_level_handle_changes_level() {
        let (subscriber, handle) = build_subscriber(&LogConfig::default());
        tracing::subscriber::with_default(subscriber, || {
            assert_eq!(handle.level(), LogLevel::Info);

            handle.set_level("debug").unwrap();
            assert_eq!(handle.level(), LogLevel::Debug);

            assert!(handle.set_level("loud").is_err());
            assert_eq!(handle.level(), LogLevel::Debug);
        });
    }

    #[test]
    fn test_context_with_does_not_mutate_parent() {
        let parent = LogContext::new().with("request_id", "r-1");
        let child = parent.with("user_id", 7);

        assert_eq!(parent.fields().len(), 1);
        assert_eq!(child.fields().len(), 2);
        assert_eq!(child.fields()[0].0, "request_id");
        assert_eq!(child.fields()[1], ("user_id".to_string(), json!(7)));
    }

    #[test]
    fn test_context_get_returns_latest() {
        let ctx = LogContext::new().with("step", 1).with("step", 2);
        assert_eq!(ctx.get("step"), Some(&json!(2)));
        assert_eq!(ctx.get("missing"), None);
    }

    #[test]
    fn test_correlation_id_is_uuid() {
        let ctx = LogContext::new().with_correlation_id();
        let id = ctx.get("correlation_id").and_then(Value::as_str).unwrap();
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[test]
    fn test_logger_record_merges_context_then_extra() {
        let logger = Logger::new("eds").with("request_id", "r-1");
        let record = logger.record(&[("order_id", json!(42))]);

        assert_eq!(
            record,
            vec![
                ("request_id".to_string(), json!("r-1")),
                ("order_id".to_string(), json!(42)),
            ]
        );
        assert_eq!(logger.service(), "eds");
    }

    #[test]
    fn test_fields_from_key_values() {
        let fields = fields_from_key_values(&[json!("attempt"), json!(3), json!(7), json!(true), json!("dangling")]);
        assert_eq!(
            fields,
            vec![
                ("attempt".to_string(), json!(3)),
                ("7".to_string(), json!(true)),
            ]
        );
    }

    #[test]
    fn test_logging_without_subscriber_does_not_panic() {
        let logger = Logger::new("eds").with("request_id", "r-1");
        logger.info("hello");
        logger.error_with("failed", &[("reason", json!("timeout"))]);
        logger.key_values().warn("workflow retry", &[json!("attempt"), json!(2)]);
    }

    #[test]
    fn test_json_output_keeps_record_order_and_repeated_keys() {
        let lines = capture_json(|| {
            Logger::new("eds")
                .with("zeta", 1)
                .with("step", 1)
                .info_with("hello", &[("alpha", json!(2)), ("step", json!(2))]);
        });

        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert!(line.starts_with(r#"{"timestamp":""#), "{line}");
        assert!(line.contains(r#""level":"INFO""#), "{line}");
        assert!(
            line.ends_with(r#""message":"hello","service":"eds","zeta":1,"step":1,"alpha":2,"step":2}"#),
            "{line}"
        );
    }

    #[test]
    fn test_json_output_nests_structured_values() {
        let lines = capture_json(|| {
            Logger::new("eds")
                .with("order", json!({"id": 7, "tags": ["a"]}))
                .error("declined");
        });

        let event: Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(event["message"], "declined");
        assert_eq!(event["order"]["id"], 7);
        assert_eq!(event["order"]["tags"][0], "a");
        assert_eq!(event["severity"], "error");
        assert!(event.get("fields").is_none());
    }

    #[test]
    fn test_json_output_without_record() {
        let lines = capture_json(|| {
            Logger::new("eds").warn("slow response");
            info!(attempt = 3, "plain event");
        });

        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(r#""message":"slow response","service":"eds"}"#), "{}", lines[0]);
        let event: Value = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(event["attempt"], 3);
        assert_eq!(event["message"], "plain event");
    }

    #[test]
    fn test_record_display_keeps_order() {
        let record = vec![
            ("b".to_string(), json!(1)),
            ("a".to_string(), json!("x\"y")),
            ("b".to_string(), json!(null)),
        ];
        assert_eq!(RecordDisplay(&record).to_string(), r#"{"b":1,"a":"x\"y","b":null}"#);
    }
}
