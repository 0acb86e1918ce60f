use std::collections::BTreeMap;

use tracing::field::Field;

pub(crate) type Fields = BTreeMap<String, serde_json::Value>;

/// Span data kept in the span extensions by a layer.
/// Each layer needs its own type, extensions hold one value per type.
pub(crate) trait FieldMap: Send + Sync + 'static {
    fn fields_mut(&mut self) -> &mut Fields;
}

/// Collects the fields of a span or an event as JSON values.
pub(crate) struct JsonVisitor<'a>(pub &'a mut Fields);

impl<'a> JsonVisitor<'a> {
    fn insert(&mut self, field: &Field, value: serde_json::Value) {
        self.0.insert(field.name().to_string(), value);
    }
}

impl<'a> tracing::field::Visit for JsonVisitor<'a> {
    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, serde_json::json!(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, serde_json::json!(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, serde_json::json!(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, serde_json::json!(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, serde_json::json!(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.insert(field, serde_json::json!(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.insert(field, serde_json::json!(format!("{:?}", value)));
    }
}

/// Record the new values of a span into its stored fields.
pub(crate) fn record_span<S, T: FieldMap>(
    id: &tracing::span::Id,
    values: &tracing::span::Record<'_>,
    ctx: &tracing_subscriber::layer::Context<'_, S>,
) where
    S: tracing::Subscriber,
    S: for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>
{
    let Some(span) = ctx.span(id) else {
        return;
    };
    let mut extensions = span.extensions_mut();
    if let Some(storage) = extensions.get_mut::<T>() {
        values.record(&mut JsonVisitor(storage.fields_mut()));
    }
}
