//! Message composition: completion API first, fixed templates as fallback.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    domain::{Category, SenderPersona},
    ports::{CompletionClient, CompletionRequest},
};

/// Produces message text from a category and free-text context.
#[derive(Clone)]
pub struct Composer {
    completion: Option<Arc<dyn CompletionClient>>,
    persona: SenderPersona,
}

impl Composer {
    pub fn new(completion: Option<Arc<dyn CompletionClient>>, persona: SenderPersona) -> Self {
        Self {
            completion,
            persona,
        }
    }

    /// Template-only composer.
    pub fn templates_only(persona: SenderPersona) -> Self {
        Self::new(None, persona)
    }

    pub fn persona(&self) -> &SenderPersona {
        &self.persona
    }

    pub fn has_completion(&self) -> bool {
        self.completion.is_some()
    }

    /// Never fails. Completion errors are logged and replaced by the template.
    pub async fn compose(&self, category: &str, context: &str) -> String {
        if let Some(client) = &self.completion {
            let req = self.completion_request(category, context);
            match client.complete(&req).await {
                Ok(text) => {
                    let text = text.trim();
                    if !text.is_empty() {
                        debug!(category, "composed message via completion API");
                        return text.to_string();
                    }
                    warn!(category, "completion API returned empty text; using template");
                }
                Err(e) => {
                    warn!(error = %e, category, "completion API failed; using template");
                }
            }
        }

        render_template(Category::parse(category), context, &self.persona.name)
    }

    fn completion_request(&self, category: &str, context: &str) -> CompletionRequest {
        CompletionRequest {
            system: system_prompt(&self.persona),
            user: format!("Write a {category} message with this context: {context}"),
        }
    }
}

pub fn system_prompt(persona: &SenderPersona) -> String {
    format!(
        "You are {} from {}. Write SMS messages in a friendly, professional tone that sounds \
         natural and personal. Keep messages concise (under 160 characters when possible). \
         Sign off with your name.",
        persona.name, persona.business
    )
}

/// Deterministic fallback text for a category.
pub fn render_template(category: Category, context: &str, name: &str) -> String {
    match category {
        Category::Followup => format!(
            "Hi! Following up on {context}. Let me know if you have any questions or if there's anything I can help with. - {name}"
        ),
        Category::Reminder => format!(
            "Hey! Just a friendly reminder about {context}. Looking forward to connecting! - {name}"
        ),
        Category::Greeting => format!("Hi there! {context} Hope you're doing well! - {name}"),
        Category::Thankyou => {
            format!("Thank you so much! {context} Really appreciate it! - {name}")
        }
        Category::Update => {
            format!("Quick update: {context} Let me know if you need anything else. - {name}")
        }
        Category::Custom => context.to_string(),
    }
}
