use crate::error::DispatchError;
use crate::models::Listing;
use crate::notify::NotificationChannel;
use async_trait::async_trait;
use chrono::Local;
use html_escape::{encode_double_quoted_attribute, encode_text};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_SENDGRID_API_URL: &str = "https://api.sendgrid.com/v3/mail/send";

/// Credentials and addresses for the SendGrid mail API
#[derive(Debug, Clone)]
pub struct SendGridSettings {
    pub api_key: String,
    pub from_email: String,
    pub to_email: String,
    pub api_url: String,
}

/// Email delivery through SendGrid.
/// Without settings the channel stays disabled and every delivery is a logged no-op.
pub struct SendGridNotifier {
    client: Client,
    settings: Option<SendGridSettings>,
}

impl SendGridNotifier {
    pub fn new(settings: Option<SendGridSettings>) -> Self {
        if settings.is_none() {
            warn!("SendGrid configuration incomplete, email notifications disabled");
        }
        Self {
            client: Client::new(),
            settings,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.is_some()
    }

    pub fn subject(listings: &[Listing]) -> String {
        format!("🏠 {} New Apartment Listing(s) Found!", listings.len())
    }

    pub fn html_body(listings: &[Listing]) -> String {
        let mut body = format!(
            r#"<html>
<body style="font-family: Arial, sans-serif; margin: 20px;">
<h1>🏠 New Apartment Listings Found!</h1>
<p><strong>Found: {} new listing(s)</strong></p>
"#,
            listings.len()
        );

        for listing in listings {
            body.push_str(&format!(
                r#"<div style="border: 1px solid #ddd; margin: 15px 0; padding: 20px; border-radius: 8px;">
<div style="font-size: 18px; font-weight: bold;">{title}</div>
<div style="color: #e74c3c; font-weight: bold;">{price}</div>
<div>📍 {location}</div>
<div>📋 {details}</div>
<div style="margin-top: 10px;"><a href="{link}" target="_blank">View Listing →</a></div>
</div>
"#,
                title = encode_text(&listing.title),
                price = encode_text(&listing.price),
                location = encode_text(&listing.location),
                details = encode_text(&listing.details),
                link = encode_double_quoted_attribute(&listing.link),
            ));
        }

        body.push_str(&format!(
            "<p style=\"color: #7f8c8d; font-size: 12px;\">Generated on: {}</p>\n</body>\n</html>\n",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        body
    }

    fn payload(settings: &SendGridSettings, listings: &[Listing]) -> Value {
        json!({
            "personalizations": [{ "to": [{ "email": settings.to_email }] }],
            "from": { "email": settings.from_email },
            "subject": Self::subject(listings),
            "content": [{ "type": "text/html", "value": Self::html_body(listings) }],
        })
    }
}

#[async_trait]
impl NotificationChannel for SendGridNotifier {
    async fn deliver(&self, listings: &[Listing]) -> Result<(), DispatchError> {
        let Some(settings) = &self.settings else {
            return Err(DispatchError::NotConfigured("sendgrid"));
        };

        let response = self
            .client
            .post(&settings.api_url)
            .bearer_auth(&settings.api_key)
            .timeout(Duration::from_secs(30))
            .json(&Self::payload(settings, listings))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DispatchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        info!("Email notification sent successfully to {}", settings.to_email);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sendgrid"
    }
}
