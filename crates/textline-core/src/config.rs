use std::{env, fs, path::Path, time::Duration};

use crate::{
    domain::{Capabilities, SenderPersona},
    errors::Error,
    Result,
};

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4";
pub const DEFAULT_TWILIO_BASE_URL: &str = "https://api.twilio.com";

/// Completion API settings. Present only when an API key is configured.
#[derive(Clone, Debug, PartialEq)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Gateway credential triple. Present only when all three values are set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TwilioCredentials {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
    pub base_url: String,
}

/// Typed configuration, read from the environment.
#[derive(Clone, Debug)]
pub struct Config {
    // Server
    pub bind_address: String,
    pub log_json: bool,
    pub http_timeout: Duration,

    // Composer
    pub persona: SenderPersona,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,

    // Gateway
    pub twilio_account_sid: Option<String>,
    pub twilio_auth_token: Option<String>,
    pub twilio_phone_number: Option<String>,
    pub twilio_base_url: String,
}

impl Config {
    /// Load from the process environment, after merging `.env` and `.env.local`.
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        load_dotenv_if_present(Path::new(".env.local"));

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).and_then(non_empty);

        let bind_address = get("TEXTLINE_BIND").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());
        let log_json = get("TEXTLINE_LOG_JSON").map(|v| parse_bool(&v)).unwrap_or(false);

        let http_timeout = match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|s| *s > 0)
                    .ok_or_else(|| {
                        Error::Config(format!(
                            "HTTP_TIMEOUT_SECS must be a positive number of seconds, got {raw:?}"
                        ))
                    })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(30),
        };

        let persona = SenderPersona {
            name: get("YOUR_NAME").unwrap_or_else(|| SenderPersona::DEFAULT_NAME.to_string()),
            business: get("YOUR_BUSINESS")
                .unwrap_or_else(|| SenderPersona::DEFAULT_BUSINESS.to_string()),
        };

        Ok(Self {
            bind_address,
            log_json,
            http_timeout,
            persona,
            openai_api_key: get("OPENAI_API_KEY"),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            openai_base_url: get("OPENAI_BASE_URL")
                .map(trim_trailing_slash)
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            twilio_account_sid: get("TWILIO_ACCOUNT_SID"),
            twilio_auth_token: get("TWILIO_AUTH_TOKEN"),
            twilio_phone_number: get("TWILIO_PHONE_NUMBER"),
            twilio_base_url: get("TWILIO_BASE_URL")
                .map(trim_trailing_slash)
                .unwrap_or_else(|| DEFAULT_TWILIO_BASE_URL.to_string()),
        })
    }

    /// Completion settings, or `None` when composing falls back to templates.
    pub fn openai(&self) -> Option<OpenAiSettings> {
        let api_key = self.openai_api_key.clone()?;
        Some(OpenAiSettings {
            api_key,
            model: self.openai_model.clone(),
            base_url: self.openai_base_url.clone(),
            max_tokens: 150,
            temperature: 0.7,
        })
    }

    /// Gateway credentials, or `None` for demo mode.
    pub fn twilio(&self) -> Option<TwilioCredentials> {
        Some(TwilioCredentials {
            account_sid: self.twilio_account_sid.clone()?,
            auth_token: self.twilio_auth_token.clone()?,
            from_number: self.twilio_phone_number.clone()?,
            base_url: self.twilio_base_url.clone(),
        })
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            completion: self.openai_api_key.is_some(),
            gateway: self.twilio().is_some(),
        }
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = &val[1..val.len() - 1];
        }

        out.push((key.to_string(), val.to_string()));
    }
    out
}

fn parse_bool(s: &str) -> bool {
    matches!(
        s.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn trim_trailing_slash(s: String) -> String {
    s.trim_end_matches('/').to_string()
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
