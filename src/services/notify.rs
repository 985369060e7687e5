use reqwest::Client;
use serde::Serialize;
use thiserror::Error;

use crate::types::models::QualifyingToken;

const ALERT_HEADER: &str = "Market Alert:";

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Post Data to Lark Failed")]
    Request(#[source] reqwest::Error),
}

/// Lark's webhook message envelope.
#[derive(Serialize)]
struct LarkMessage<'a> {
    msg_type: &'static str,
    content: LarkContent<'a>,
}

#[derive(Serialize)]
struct LarkContent<'a> {
    text: &'a str,
}

#[derive(Clone)]
pub struct LarkNotifier {
    http: Client,
    webhook_url: String,
}

impl LarkNotifier {
    pub fn new(webhook_url: String) -> Self {
        Self {
            http: Client::new(),
            webhook_url,
        }
    }

    /// One block per qualifying symbol under a fixed header.
    pub fn build_alert_text(tokens: &[QualifyingToken]) -> String {
        let mut text = String::from(ALERT_HEADER);
        for token in tokens {
            text.push_str(&format!(
                "\nSymbol: {}\nMark Price: {}\nFunding Rate: {}\n24h Open Interest Growth: {}\nOpen Interest Value: {}\nUpdated: {}\n",
                token.symbol,
                token.mark_price,
                token.last_funding_rate,
                token.contract_position_growth,
                token.sum_open_interest_value,
                token.timestamp,
            ));
        }
        text
    }

    /// Posts the alert and passes the webhook's JSON response back to the
    /// caller. A non-2xx answer surfaces as NotifyError.
    pub async fn send_alert(
        &self,
        tokens: &[QualifyingToken],
    ) -> Result<serde_json::Value, NotifyError> {
        let text = Self::build_alert_text(tokens);
        let message = LarkMessage {
            msg_type: "text",
            content: LarkContent { text: &text },
        };

        let body = self
            .http
            .post(&self.webhook_url)
            .json(&message)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(NotifyError::Request)?
            .json()
            .await
            .map_err(NotifyError::Request)?;

        tracing::info!("alert delivered for {} symbols", tokens.len());
        Ok(body)
    }
}
