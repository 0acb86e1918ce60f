use std::io::Write;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use regex::Regex;
use tracing::span;
use tracing_subscriber::Layer;

use crate::visitor::{record_span, FieldMap, Fields, JsonVisitor};

/// Span data needed to emit a trace event when the span closes.
struct SpanTiming {
    fields: Fields,
    thread_id: u64,
    /// Start time, in nanoseconds since the epoch.
    start: u128,
}

impl FieldMap for SpanTiming {
    fn fields_mut(&mut self) -> &mut Fields {
        &mut self.fields
    }
}

fn now_nanos() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0)
}


/// Layer writing span durations to a Chrome trace file (`chrome://tracing`).
pub struct TracingLayer {
    file: Mutex<std::fs::File>,
    thread_regex: Regex,
}

impl TracingLayer {
    /// Create the trace file and write its header.
    pub fn new(file_name: &str) -> std::io::Result<Self> {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(file_name)?;
        file.write_all(b"{\"traceEvents\":[\n")?;

        Ok(Self {
            file: Mutex::new(file),
            thread_regex: Regex::new(r"ThreadId\((\d+)\)").map_err(std::io::Error::other)?,
        })
    }

    /// Remove the trailing comma of the last event and write the footer.
    pub fn close(file_name: &str) -> std::io::Result<()> {
        let mut contents = std::fs::read_to_string(file_name)?;
        if contents.ends_with(",\n") {
            contents.truncate(contents.len() - 2);
        }
        contents.push_str("\n]}\n");
        std::fs::write(file_name, contents)
    }

    fn current_thread_id(&self) -> u64 {
        let thread = format!("{:?}", std::thread::current().id());
        self.thread_regex.captures(&thread)
            .and_then(|captures| captures[1].parse::<u64>().ok())
            .unwrap_or(0)
    }
}

impl<S> Layer<S> for TracingLayer
where
    S: tracing::Subscriber,
    S: for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>
{
    fn on_new_span(
        &self,
        attrs: &span::Attributes<'_>,
        id: &span::Id,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let Some(span) = ctx.span(id) else {
            return;
        };

        let mut fields = Fields::new();
        attrs.record(&mut JsonVisitor(&mut fields));
        span.extensions_mut().insert(SpanTiming {
            fields,
            thread_id: self.current_thread_id(),
            start: now_nanos(),
        });
    }

    fn on_record(
        &self,
        id: &span::Id,
        values: &span::Record<'_>,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        record_span::<S, SpanTiming>(id, values, &ctx);
    }

    fn on_close(&self, id: span::Id, ctx: tracing_subscriber::layer::Context<'_, S>) {
        let Some(span) = ctx.span(&id) else {
            return;
        };
        let extensions = span.extensions();
        let Some(timing) = extensions.get::<SpanTiming>() else {
            return;
        };

        // Durations in microseconds
        let data = serde_json::json!({
            "name": format!("{}::{}", span.metadata().target(), span.metadata().name()),
            "cat": span.metadata().level().as_str(),
            "ph": "X",
            "pid": 1,
            "tid": timing.thread_id,
            "ts": (timing.start / 1000) as u64,
            "dur": (now_nanos().saturating_sub(timing.start) / 1000) as u64,
            "args": timing.fields,
        });

        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{},", data);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn writes_valid_chrome_trace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.json");
        let file_name = path.to_str().unwrap();

        let layer = TracingLayer::new(file_name).unwrap();
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            let _outer = tracing::info_span!("frame", index = 1).entered();
            let _inner = tracing::debug_span!("upload").entered();
        });
        TracingLayer::close(file_name).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let trace: serde_json::Value = serde_json::from_str(&content).unwrap();
        let events = trace["traceEvents"].as_array().unwrap();
        assert_eq!(events.len(), 2);
        // Inner span closes first
        assert!(events[0]["name"].as_str().unwrap().ends_with("::upload"));
        assert_eq!(events[1]["args"]["index"], 1);
        assert_eq!(events[1]["cat"], "INFO");
    }
}
