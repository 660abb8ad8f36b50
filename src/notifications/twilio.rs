use std::env;

use sendgrid::SGClient;
use sendgrid::{Destination, Mail};
use tracing::{error, info, warn};

use super::NotificationTemplates;
use crate::entities::{actor, alert};

/// SMS + email dispatch for alert lifecycle events. Falls back to mock mode
/// (log only) when provider credentials are absent, so local development
/// never needs live Twilio/SendGrid accounts.
#[derive(Clone)]
pub struct TwilioNotifier {
    sendgrid_client: Option<SGClient>,
    twilio_client: Option<twilio::Client>,
    sms_from: String,
    email_from: String,
}

impl TwilioNotifier {
    pub fn new() -> Self {
        let sendgrid_api_key = env::var("TWILIO_SENDGRID_API_KEY").ok();
        let twilio_account_sid = env::var("TWILIO_ACCOUNT_SID").ok();
        let twilio_auth_token = env::var("TWILIO_AUTH_TOKEN").ok();
        let sms_from = env::var("TWILIO_SMS_FROM_NUMBER").unwrap_or_default();
        let email_from = env::var("NOTIFICATION_EMAIL_FROM")
            .unwrap_or_else(|_| "alerts@safelink.example".to_string());

        let sendgrid_client = sendgrid_api_key.map(SGClient::new);

        let twilio_client = if let (Some(sid), Some(token)) = (twilio_account_sid, twilio_auth_token)
        {
            Some(twilio::Client::new(&sid, &token))
        } else {
            None
        };

        if sendgrid_client.is_none() {
            warn!("SendGrid API key not found. Email notifications will be mocked.");
        }
        if twilio_client.is_none() {
            warn!("Twilio credentials not found. SMS notifications will be mocked.");
        }

        Self {
            sendgrid_client,
            twilio_client,
            sms_from,
            email_from,
        }
    }

    pub async fn send_email(
        &self,
        to_email: &str,
        to_name: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), String> {
        if let Some(client) = &self.sendgrid_client {
            // The sendgrid client is blocking; run it off the async runtime
            // with owned copies of everything it needs.
            let to_email = to_email.to_string();
            let to_name = to_name.to_string();
            let subject = subject.to_string();
            let body = body.to_string();
            let email_from = self.email_from.clone();
            let client = client.clone();
            let to_email_log = to_email.clone();

            match tokio::task::spawn_blocking(move || {
                let mail = Mail::new()
                    .add_to(Destination {
                        address: &to_email,
                        name: &to_name,
                    })
                    .add_from(&email_from)
                    .add_subject(&subject)
                    .add_html(&body);

                client.send(mail)
            })
            .await
            {
                Ok(Ok(_)) => {
                    info!("Email notification sent to {}", to_email_log);
                    crate::metrics::increment_notifications_sent("email");
                    Ok(())
                }
                Ok(Err(e)) => {
                    error!("Failed to send email: {}", e);
                    crate::metrics::increment_notifications_failed("email");
                    Err(format!("SendGrid error: {}", e))
                }
                Err(e) => Err(format!("Task join error: {}", e)),
            }
        } else {
            info!("(Mock) Would send email to {}: {}", to_email, subject);
            crate::metrics::increment_notifications_sent("email");
            Ok(())
        }
    }

    pub async fn send_sms(&self, to_number: &str, body: &str) -> Result<(), String> {
        if let Some(client) = &self.twilio_client {
            if self.sms_from.is_empty() {
                return Err("TWILIO_SMS_FROM_NUMBER not set".to_string());
            }

            match client
                .send_message(twilio::OutboundMessage::new(&self.sms_from, to_number, body))
                .await
            {
                Ok(_) => {
                    info!("SMS notification sent to {}", to_number);
                    crate::metrics::increment_notifications_sent("sms");
                    Ok(())
                }
                Err(e) => {
                    error!("Failed to send SMS: {}", e);
                    crate::metrics::increment_notifications_failed("sms");
                    Err(format!("Twilio error: {}", e))
                }
            }
        } else {
            info!("(Mock) Would send SMS to {}: {}", to_number, body);
            crate::metrics::increment_notifications_sent("sms");
            Ok(())
        }
    }

    /// Confirmation to the reporter that their alert was recorded. Dispatch
    /// is fire-and-forget: a delivery failure is logged and counted, never
    /// surfaced to the submitting request, and never retried.
    pub fn notify_alert_created(&self, reporter: &actor::Model, alert: &alert::Model) {
        let reported_at = alert.created_at.format("%Y-%m-%d %H:%M:%S").to_string();
        let type_str = alert.emergency_type.as_str();

        let email_body = NotificationTemplates::alert_created_email(
            &reporter.name,
            type_str,
            alert.priority.as_str(),
            alert.latitude,
            alert.longitude,
            &reported_at,
        );
        let subject = format!("🚨 SafeLink: your {} alert was received", type_str);

        let email_notifier = self.clone();
        let email_to = reporter.email.clone();
        let email_name = reporter.name.clone();
        tokio::spawn(async move {
            let _ = email_notifier
                .send_email(&email_to, &email_name, &subject, &email_body)
                .await;
        });

        let sms_body =
            NotificationTemplates::alert_created_sms(type_str, alert.latitude, alert.longitude);
        let sms_notifier = self.clone();
        let sms_to = reporter.phone.clone();
        tokio::spawn(async move {
            let _ = sms_notifier.send_sms(&sms_to, &sms_body).await;
        });
    }

    /// Status-change update to the reporter (claimed, resolved, cancelled).
    pub fn notify_alert_update(&self, reporter: &actor::Model, alert: &alert::Model) {
        let updated_at = alert.updated_at.format("%Y-%m-%d %H:%M:%S").to_string();
        let type_str = alert.emergency_type.as_str();
        let status_line = NotificationTemplates::status_line(alert.status.as_str());

        let email_body = NotificationTemplates::alert_update_email(
            &reporter.name,
            type_str,
            status_line,
            &updated_at,
        );
        let subject = format!("SafeLink: update on your {} alert", type_str);

        let email_notifier = self.clone();
        let email_to = reporter.email.clone();
        let email_name = reporter.name.clone();
        tokio::spawn(async move {
            let _ = email_notifier
                .send_email(&email_to, &email_name, &subject, &email_body)
                .await;
        });

        let sms_body = NotificationTemplates::alert_update_sms(type_str, status_line);
        let sms_notifier = self.clone();
        let sms_to = reporter.phone.clone();
        tokio::spawn(async move {
            let _ = sms_notifier.send_sms(&sms_to, &sms_body).await;
        });
    }
}

impl Default for TwilioNotifier {
    fn default() -> Self {
        Self::new()
    }
}
