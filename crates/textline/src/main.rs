use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use textline_core::{
    composer::Composer,
    config::Config,
    delivery::DeliveryClient,
    ledger::InMemoryLedger,
    ports::{CompletionClient, SmsGateway},
    service::MessagingService,
};
use textline_http::AppState;
use textline_openai::OpenAiClient;
use textline_twilio::TwilioClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::load().context("failed to load configuration")?;
    textline_core::logging::init("textline", cfg.log_json)?;

    info!(version = env!("CARGO_PKG_VERSION"), "textline starting");

    let completion = cfg
        .openai()
        .map(|settings| OpenAiClient::new(settings, cfg.http_timeout))
        .transpose()?
        .map(|c| Arc::new(c) as Arc<dyn CompletionClient>);
    let gateway = cfg
        .twilio()
        .map(|creds| TwilioClient::new(creds, cfg.http_timeout))
        .transpose()?
        .map(|g| Arc::new(g) as Arc<dyn SmsGateway>);

    let caps = cfg.capabilities();
    info!(
        completion = caps.completion,
        gateway = caps.gateway,
        sender = %cfg.persona.name,
        "capabilities resolved"
    );
    if caps.is_demo() {
        info!("TWILIO_* not fully configured; messages will be simulated (demo mode)");
    }

    let service = MessagingService::new(
        Composer::new(completion, cfg.persona.clone()),
        DeliveryClient::new(gateway),
        Arc::new(InMemoryLedger::new()),
    );

    textline_http::serve(&cfg.bind_address, AppState::new(service)).await?;
    Ok(())
}
