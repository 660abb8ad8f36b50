pub struct NotificationTemplates;

impl NotificationTemplates {
    /// HTML email confirming that an emergency alert was received.
    pub fn alert_created_email(
        reporter_name: &str,
        emergency_type: &str,
        priority: &str,
        latitude: f64,
        longitude: f64,
        reported_at: &str,
    ) -> String {
        format!(
            r#"
<!DOCTYPE html>
<html>
<head>
    <style>
        body {{ font-family: 'Helvetica Neue', Helvetica, Arial, sans-serif; line-height: 1.6; color: #333; }}
        .container {{ max-width: 600px; margin: 0 auto; padding: 20px; border: 1px solid #ddd; border-radius: 8px; }}
        .header {{ background-color: #ffe3e3; padding: 15px; border-radius: 8px 8px 0 0; text-align: center; }}
        .header h1 {{ margin: 0; color: #c0392b; }}
        .badge {{ background-color: #d63031; color: white; padding: 5px 10px; border-radius: 4px; font-weight: bold; display: inline-block; margin-top: 10px; }}
        .content {{ padding: 20px; }}
        .footer {{ margin-top: 30px; font-size: 12px; color: #b2bec3; text-align: center; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>🚨 SafeLink Emergency Alert</h1>
            <div class="badge">{type_upper} · PRIORITY {priority_upper}</div>
        </div>
        <div class="content">
            <p>Hi {reporter_name},</p>
            <p>Your emergency alert was received at <strong>{reported_at}</strong>.
            Nearby volunteers have been notified and help is on the way.</p>
            <p><strong>Reported location:</strong> {latitude:.4}, {longitude:.4}</p>
            <p>You will receive further SMS and email updates as responders
            claim and resolve your alert.</p>
        </div>
        <div class="footer">SafeLink Emergency Alert System</div>
    </div>
</body>
</html>
"#,
            type_upper = emergency_type.to_uppercase(),
            priority_upper = priority.to_uppercase(),
        )
    }

    pub fn alert_created_sms(emergency_type: &str, latitude: f64, longitude: f64) -> String {
        format!(
            "SafeLink: your {} alert was received (location {:.4}, {:.4}). \
             Help is on the way. You will get updates by SMS and email.",
            emergency_type, latitude, longitude
        )
    }

    /// HTML email sent when an alert changes status (claimed / resolved /
    /// cancelled).
    pub fn alert_update_email(
        reporter_name: &str,
        emergency_type: &str,
        status_line: &str,
        updated_at: &str,
    ) -> String {
        format!(
            r#"
<!DOCTYPE html>
<html>
<head>
    <style>
        body {{ font-family: 'Helvetica Neue', Helvetica, Arial, sans-serif; line-height: 1.6; color: #333; }}
        .container {{ max-width: 600px; margin: 0 auto; padding: 20px; border: 1px solid #ddd; border-radius: 8px; }}
        .header {{ background-color: #e3f2fd; padding: 15px; border-radius: 8px 8px 0 0; text-align: center; }}
        .header h1 {{ margin: 0; color: #1565c0; }}
        .content {{ padding: 20px; }}
        .footer {{ margin-top: 30px; font-size: 12px; color: #b2bec3; text-align: center; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>SafeLink Alert Update</h1>
        </div>
        <div class="content">
            <p>Hi {reporter_name},</p>
            <p>Update on your <strong>{type_upper}</strong> alert as of
            <strong>{updated_at}</strong>:</p>
            <p>{status_line}</p>
        </div>
        <div class="footer">SafeLink Emergency Alert System</div>
    </div>
</body>
</html>
"#,
            type_upper = emergency_type.to_uppercase(),
        )
    }

    pub fn alert_update_sms(emergency_type: &str, status_line: &str) -> String {
        format!(
            "SafeLink update on your {} alert: {}",
            emergency_type, status_line
        )
    }

    /// One-line human summary of a status change, shared by SMS and email.
    pub fn status_line(status: &str) -> &'static str {
        match status {
            "assigned" => "a responder has claimed your alert and is on the way.",
            "resolved" => "your alert has been resolved. Stay safe!",
            "cancelled" => "your alert has been cancelled.",
            _ => "your alert status has changed.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_email_mentions_type_and_location() {
        let body = NotificationTemplates::alert_created_email(
            "Asha",
            "fire",
            "critical",
            12.97,
            77.59,
            "2026-08-07 10:00:00",
        );
        assert!(body.contains("FIRE"));
        assert!(body.contains("PRIORITY CRITICAL"));
        assert!(body.contains("12.9700, 77.5900"));
        assert!(body.contains("Asha"));
    }

    #[test]
    fn status_lines_cover_every_reachable_status() {
        assert!(NotificationTemplates::status_line("assigned").contains("claimed"));
        assert!(NotificationTemplates::status_line("resolved").contains("resolved"));
        assert!(NotificationTemplates::status_line("cancelled").contains("cancelled"));
    }
}
