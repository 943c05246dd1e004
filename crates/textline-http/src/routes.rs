//! Route handlers.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use textline_core::{domain::LedgerSnapshot, errors::Error, service::SendRequest};

use crate::{error::ApiError, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/status", get(status))
        .route("/api/messages", get(list_messages))
        .route("/api/send-message", post(send_message))
}

/// Body of `POST /api/send-message`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageBody {
    #[serde(default, alias = "destination")]
    pub phone_number: Option<String>,
    #[serde(default, alias = "context")]
    pub message_context: Option<String>,
    #[serde(default, alias = "category")]
    pub message_type: Option<String>,
}

impl From<SendMessageBody> for SendRequest {
    fn from(b: SendMessageBody) -> Self {
        Self {
            destination: b.phone_number,
            context: b.message_context,
            category: b.message_type,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub mode: String,
    pub completion: bool,
    pub gateway: bool,
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let caps = state.service.capabilities();
    let mode = if caps.is_demo() { "demo" } else { "live" };
    Json(StatusResponse {
        mode: mode.to_string(),
        completion: caps.completion,
        gateway: caps.gateway,
    })
}

async fn list_messages(State(state): State<AppState>) -> Result<Json<LedgerSnapshot>, ApiError> {
    Ok(Json(state.service.list().await?))
}

async fn send_message(
    State(state): State<AppState>,
    body: Result<Json<SendMessageBody>, JsonRejection>,
) -> Result<Json<SendMessageResponse>, ApiError> {
    let Json(body) = body.map_err(|e| {
        debug!(error = %e, "rejected send-message body");
        Error::InvalidInput(format!("Invalid request body: {}", e.body_text()))
    })?;

    let receipt = state.service.send(body.into()).await?;

    Ok(Json(SendMessageResponse {
        success: true,
        message: format!("Message sent successfully! \"{}\"", receipt.text()),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use textline_core::{
        composer::Composer,
        delivery::DeliveryClient,
        domain::{MessageStatus, SenderPersona},
        ledger::InMemoryLedger,
        ports::{MessageLedger, OutboundSms, SmsGateway},
        service::MessagingService,
        Result,
    };

    use super::*;

    struct DownGateway;

    #[async_trait]
    impl SmsGateway for DownGateway {
        async fn send(&self, _sms: &OutboundSms) -> Result<()> {
            Err(Error::Transport("connection refused".to_string()))
        }
    }

    struct BrokenLedger;

    #[async_trait]
    impl MessageLedger for BrokenLedger {
        async fn append(&self, _record: textline_core::domain::MessageRecord) -> Result<()> {
            Err(Error::External("ledger unavailable".to_string()))
        }

        async fn list_all(&self) -> Result<LedgerSnapshot> {
            Err(Error::External("ledger unavailable".to_string()))
        }
    }

    fn persona() -> SenderPersona {
        SenderPersona {
            name: "Dana".to_string(),
            business: "Dana's Bikes".to_string(),
        }
    }

    fn app_with(delivery: DeliveryClient, ledger: Arc<dyn MessageLedger>) -> Router {
        crate::router(AppState::new(MessagingService::new(
            Composer::templates_only(persona()),
            delivery,
            ledger,
        )))
    }

    fn demo_app() -> (Router, Arc<InMemoryLedger>) {
        let ledger = Arc::new(InMemoryLedger::new());
        (app_with(DeliveryClient::demo(), ledger.clone()), ledger)
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/send-message")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(resp: Response) -> Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (app, _) = demo_app();
        let resp = app.oneshot(get_req("/health")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        assert_eq!(body["status"], "ok");
        assert!(!body["version"].as_str().unwrap_or("").is_empty());
    }

    #[tokio::test]
    async fn status_reports_demo_mode() {
        let (app, _) = demo_app();
        let body = json_body(app.oneshot(get_req("/api/status")).await.unwrap()).await;
        assert_eq!(body["mode"], "demo");
        assert_eq!(body["gateway"], false);
        assert_eq!(body["completion"], false);
    }

    #[tokio::test]
    async fn send_then_list() {
        let (app, _) = demo_app();

        let resp = app
            .clone()
            .oneshot(post_json(
                r#"{"phoneNumber":"+15550001111","messageContext":"appointment at 2pm","messageType":"reminder"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(
            body["message"],
            "Message sent successfully! \"Hey! Just a friendly reminder about appointment at 2pm. Looking forward to connecting! - Dana\""
        );

        let resp = app
            .clone()
            .oneshot(post_json(
                r#"{"destination":"+15550002222","context":"Thanks for stopping by.","category":"thankyou"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = json_body(app.oneshot(get_req("/api/messages")).await.unwrap()).await;
        assert_eq!(body["stats"]["total"], 2);
        assert_eq!(body["stats"]["sent"], 2);
        assert_eq!(body["stats"]["failed"], 0);
        assert_eq!(body["messages"][0]["recipient"], "+15550002222");
        assert_eq!(body["messages"][1]["recipient"], "+15550001111");
        assert_eq!(body["messages"][1]["status"], "sent");
    }

    #[tokio::test]
    async fn missing_fields_are_a_400_and_record_nothing() {
        let (app, ledger) = demo_app();
        let resp = app
            .oneshot(post_json(r#"{"phoneNumber":"+15550001111"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(resp).await["error"],
            "Phone number and context are required"
        );
        assert!(ledger.is_empty().await);
    }

    #[tokio::test]
    async fn malformed_json_is_a_400() {
        let (app, ledger) = demo_app();
        let resp = app.oneshot(post_json("{not json")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(ledger.is_empty().await);
    }

    #[tokio::test]
    async fn delivery_failure_is_a_502_and_recorded() {
        let ledger = Arc::new(InMemoryLedger::new());
        let app = app_with(
            DeliveryClient::new(Some(Arc::new(DownGateway))),
            ledger.clone(),
        );

        let resp = app
            .oneshot(post_json(
                r#"{"phoneNumber":"+1","messageContext":"hello","messageType":"custom"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(json_body(resp).await["error"], "Network error");

        let snap = ledger.list_all().await.unwrap();
        assert_eq!(snap.stats.failed, 1);
        assert_eq!(snap.messages[0].status, MessageStatus::Failed);
    }

    #[tokio::test]
    async fn ledger_failure_is_a_generic_500() {
        let app = app_with(DeliveryClient::demo(), Arc::new(BrokenLedger));
        let resp = app
            .oneshot(post_json(
                r#"{"phoneNumber":"+1","messageContext":"hello"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(resp).await["error"], "Internal server error");
    }
}
