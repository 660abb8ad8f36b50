use serde_json::json;
use tracing::{debug, error, info};

use crate::entities::alert;

/// Optional outbound hook: POSTs alert lifecycle events as JSON to
/// `ALERT_WEBHOOK_URL` (dispatch centers, paging bridges). Disabled when the
/// variable is unset.
#[derive(Clone)]
pub struct WebhookDispatcher {
    endpoint: Option<String>,
    client: reqwest::Client,
}

impl WebhookDispatcher {
    pub fn from_env() -> Self {
        let endpoint = std::env::var("ALERT_WEBHOOK_URL").ok();
        if endpoint.is_none() {
            debug!("ALERT_WEBHOOK_URL not set, webhook dispatch disabled");
        }
        Self {
            endpoint,
            client: reqwest::Client::new(),
        }
    }

    /// Fire-and-forget delivery; failures are logged and counted, never
    /// retried.
    pub fn dispatch(&self, event: &'static str, alert: &alert::Model) {
        let Some(endpoint) = self.endpoint.clone() else {
            return;
        };
        let payload = json!({
            "event": event,
            "alertId": alert.id,
            "status": alert.status,
            "emergencyType": alert.emergency_type,
            "priority": alert.priority,
            "reporterId": alert.reporter_id,
            "at": alert.updated_at,
        });
        let client = self.client.clone();
        tokio::spawn(async move {
            match client.post(&endpoint).json(&payload).send().await {
                Ok(resp) if resp.status().is_success() => {
                    info!("Alert webhook delivered: {}", event);
                    crate::metrics::increment_notifications_sent("webhook");
                }
                Ok(resp) => {
                    error!("Alert webhook returned {}", resp.status());
                    crate::metrics::increment_notifications_failed("webhook");
                }
                Err(e) => {
                    error!("Failed to deliver alert webhook: {}", e);
                    crate::metrics::increment_notifications_failed("webhook");
                }
            }
        });
    }
}
