use opentelemetry::{KeyValue, metrics::UpDownCounter};
use std::sync::LazyLock;

static STATDS: LazyLock<UpDownCounter<i64>> = LazyLock::new(|| {
    logfire::i64_up_down_counter("wa_campaign_statds")
        .with_description("WhatsApp campaign app statistics")
        .with_unit("attempt")
        .build()
});

fn incr_statds(metric: String, value: String) {
    STATDS.add(1, &[KeyValue::new(metric, value)]);
}

pub fn incr_user_action_statds(action: &str) {
    incr_statds("user_action".to_string(), action.into())
}

pub fn incr_delivery_status_statds(status: &str) {
    incr_statds("delivery_status".to_string(), status.into())
}

pub fn incr_csv_import_statds(result: &str) {
    incr_statds("csv_import".to_string(), result.into())
}
