//! Twilio adapter (SMS delivery).
//!
//! Implements the core `SmsGateway` port over the Programmable Messaging
//! `Messages.json` endpoint. One request per message, no retries.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use textline_core::{
    config::TwilioCredentials,
    errors::Error,
    ports::{OutboundSms, SmsGateway},
    Result,
};

#[derive(Clone, Debug)]
pub struct TwilioClient {
    creds: TwilioCredentials,
    http: reqwest::Client,
}

impl TwilioClient {
    pub fn new(creds: TwilioCredentials, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::External(format!("twilio client build error: {e}")))?;
        Ok(Self { creds, http })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.creds.base_url, self.creds.account_sid
        )
    }
}

#[async_trait]
impl SmsGateway for TwilioClient {
    async fn send(&self, sms: &OutboundSms) -> Result<()> {
        let form = [
            ("To", sms.to.as_str()),
            ("From", self.creds.from_number.as_str()),
            ("Body", sms.body.as_str()),
        ];

        let resp = self
            .http
            .post(self.messages_url())
            .basic_auth(&self.creds.account_sid, Some(&self.creds.auth_token))
            .form(&form)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("twilio request error: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::GatewayRejected {
                status: status.as_u16(),
                body: body.chars().take(500).collect(),
            });
        }

        debug!(status = status.as_u16(), "twilio accepted message");
        Ok(())
    }
}
