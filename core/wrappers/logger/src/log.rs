use std::io::Write;
use std::sync::Mutex;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::Layer;

use crate::visitor::{record_span, FieldMap, Fields, JsonVisitor};

// Alias for tracing macros
pub use tracing::trace_span as trace_span;
pub use tracing::debug_span as debug_span;
pub use tracing::info_span as info_span;
pub use tracing::warn_span as warn_span;
pub use tracing::error_span as error_span;
pub use tracing::span as span;
pub use tracing::Level as Level;

// Alias for logger macros
pub use tracing::trace as trace;
pub use tracing::debug as debug;
pub use tracing::info as info;
pub use tracing::warn as warn;
pub use tracing::error as error;

/// Event targets that are never displayed.
const IGNORED_TARGETS: [&str; 2] = ["log", "polling"];


/// Fields of a span, as seen by the logger layer.
struct SpanFields(Fields);

impl FieldMap for SpanFields {
    fn fields_mut(&mut self) -> &mut Fields {
        &mut self.0
    }
}


/// A formatted log line.
#[derive(Debug, Clone, PartialEq)]
pub struct LogLine {
    pub date: String,
    pub level: tracing::Level,
    pub target: String,
    /// Spans from the root to the innermost one, as `name{key=value,..}`.
    pub spans: Vec<String>,
    pub message: String,
    /// Event fields other than the message.
    pub fields: Vec<(String, String)>,
}

impl LogLine {
    fn other_fields(&self) -> String {
        if self.fields.is_empty() {
            return String::new();
        }
        let content = self.fields.iter()
            .map(|(key, value)| format!("{}: {}", key, value))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{{ {} }}", content)
    }

    /// Colored line for the console.
    pub fn console(&self) -> String {
        let color = match self.level {
            tracing::Level::TRACE => "\x1b[30m",
            tracing::Level::DEBUG => "\x1b[34m",
            tracing::Level::INFO => "\x1b[32m",
            tracing::Level::WARN => "\x1b[33m",
            tracing::Level::ERROR => "\x1b[31m",
        };
        format!("\x1b[30m{}\x1b[0m {}[{}]\t{} : {} {}\x1b[0m",
            self.date, color, self.level.as_str(), self.target, self.message, self.other_fields())
    }

    /// Plain line for the log file.
    pub fn raw(&self) -> String {
        let mut line = format!("{}\t[{}]\t{}", self.date, self.level.as_str(), self.target);
        if !self.spans.is_empty() {
            line.push(' ');
            line.push_str(&self.spans.join(":"));
        }
        line.push_str("\t:\t");
        line.push_str(&self.message);
        let other = self.other_fields();
        if !other.is_empty() {
            line.push(' ');
            line.push_str(&other);
        }
        line
    }
}


/// Layer printing events to the console and appending them to a log file.
pub struct LoggerLayer {
    file: Mutex<std::fs::File>,
    level: LevelFilter,
}

impl LoggerLayer {
    /// Create the layer and clear the log file.
    ///
    /// # Arguments
    ///
    /// * `file_name` - The file to write the log lines to.
    /// * `level` - Most verbose level displayed.
    pub fn new(file_name: &str, level: LevelFilter) -> std::io::Result<Self> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(file_name)?;

        Ok(Self {
            file: Mutex::new(file),
            level,
        })
    }
}

impl<S> Layer<S> for LoggerLayer
where
    S: tracing::Subscriber,
    S: for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        id: &tracing::span::Id,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let Some(span) = ctx.span(id) else {
            return;
        };

        let mut fields = Fields::new();
        attrs.record(&mut JsonVisitor(&mut fields));
        span.extensions_mut().insert(SpanFields(fields));
    }

    fn on_record(
        &self,
        id: &tracing::span::Id,
        values: &tracing::span::Record<'_>,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        record_span::<S, SpanFields>(id, values, &ctx);
    }

    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let metadata = event.metadata();
        if *metadata.level() > self.level {
            return;
        }
        if IGNORED_TARGETS.iter().any(|target| metadata.target().starts_with(target)) {
            return;
        }

        // Parent spans, from the root
        let mut spans = vec![];
        if let Some(scope) = ctx.event_scope(event) {
            for span in scope.from_root() {
                let extensions = span.extensions();
                let fields = extensions.get::<SpanFields>()
                    .map(|storage| storage.0.iter()
                        .map(|(key, value)| format!("{}={}", key, value))
                        .collect::<Vec<_>>()
                        .join(","))
                    .unwrap_or_default();
                if fields.is_empty() {
                    spans.push(span.name().to_string());
                } else {
                    spans.push(format!("{}{{{}}}", span.name(), fields));
                }
            }
        }

        // Event fields
        let mut fields = Fields::new();
        event.record(&mut JsonVisitor(&mut fields));
        let message = match fields.remove("message") {
            Some(serde_json::Value::String(message)) => message,
            Some(value) => value.to_string(),
            None => String::new(),
        };

        let line = LogLine {
            date: chrono::Local::now().format("%H:%M:%S:%3f").to_string(),
            level: *metadata.level(),
            target: metadata.target().to_string(),
            spans,
            message,
            fields: fields.into_iter().map(|(key, value)| (key, value.to_string())).collect(),
        };
        println!("{}", line.console());

        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{}", line.raw());
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::layer::SubscriberExt;

    fn line(fields: Vec<(String, String)>) -> LogLine {
        LogLine {
            date: "12:00:00:000".to_string(),
            level: tracing::Level::WARN,
            target: "wde_terrain".to_string(),
            spans: vec!["build_terrain{rows=2}".to_string()],
            message: "Elevation range is flat.".to_string(),
            fields,
        }
    }

    #[test]
    fn raw_line_layout() {
        let line = line(vec![("min".to_string(), "5.0".to_string()), ("max".to_string(), "5.0".to_string())]);
        assert_eq!(line.raw(), "12:00:00:000\t[WARN]\twde_terrain build_terrain{rows=2}\t:\tElevation range is flat. { min: 5.0, max: 5.0 }");
    }

    #[test]
    fn console_line_is_colored() {
        let line = line(vec![]);
        let console = line.console();
        assert!(console.contains("\x1b[33m[WARN]"));
        assert!(console.ends_with("Elevation range is flat. \x1b[0m"));
    }

    #[test]
    fn layer_filters_and_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.log");
        let layer = LoggerLayer::new(path.to_str().unwrap(), LevelFilter::INFO).unwrap();
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            let _span = info_span!("load", file = "dem.tif").entered();
            info!(rows = 3, "Decoded raster.");
            debug!("Hidden at info level.");
        });

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("[INFO]"));
        assert!(lines[0].contains("load{file=\"dem.tif\"}"));
        assert!(lines[0].ends_with("Decoded raster. { rows: 3 }"));
    }
}
