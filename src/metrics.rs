//! Metric descriptions for the counters this crate emits.
//!
//! The crate only increments counters through the `metrics` facade; the
//! embedding process owns the recorder and its exposition.

/// Register all metric descriptions.
///
/// Call once at startup after the recorder is installed. Descriptions
/// provide HELP text in the exposition output.
pub fn register_metric_descriptions() {
    use metrics::describe_counter;

    describe_counter!(
        "slackwire_notifications_sent_total",
        "Total number of notification tasks registered for dispatch"
    );
    describe_counter!(
        "slackwire_notifications_delivered_total",
        "Total number of notifications accepted by Slack"
    );
    describe_counter!(
        "slackwire_notify_errors_total",
        "Total number of dispatch failures, labeled by kind (rejected, transport)"
    );
    describe_counter!(
        "slackwire_resolution_failures_total",
        "Total number of vendor API failures during channel resolution, labeled by stage"
    );
}
