//! System prompt templates
//!
//! Each [`PromptMode`] selects a fixed instructional template that prefixes
//! the conversation. Templates live in an open mapping so new modes can be
//! registered without touching call sites.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Tag selecting which instructional template prefixes a conversation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptMode {
    /// Explain a concept from the knowledge graph
    #[default]
    Knowledge,
    /// Guide the student through a problem
    Homework,
    /// Personalized study advice
    Suggestion,
}

/// Built-in template for knowledge mode
pub const KNOWLEDGE_PROMPT: &str = "\
You are a professional math tutor who helps students understand mathematical concepts. Your job is to:
1. Explain mathematical ideas in plain, accessible language
2. Give worked examples that build intuition
3. Keep answers accurate, concise, and well organized
4. Use analogies and described diagrams where they help

When the student asks about the current topic, ground your answer in the study material provided.";

/// Built-in template for homework mode
pub const HOMEWORK_PROMPT: &str = "\
You are a professional math tutor who helps students work through problems. Your job is to:
1. Lead the student toward the answer instead of handing it over
2. Walk through the reasoning step by step
3. Call out the key steps and what each one tests
4. Finish with a complete solution and a short recap

Follow the order: read the problem, guide the approach, work the solution, summarize the concepts used.";

/// Built-in template for suggestion mode
pub const SUGGESTION_PROMPT: &str = "\
You are a professional math study advisor. Your job is to:
1. Read the student's progress and mastery so far
2. Identify weak spots in their understanding
3. Recommend a personalized study plan
4. Stay encouraging and keep the student motivated

Give concrete, actionable study advice.";

/// Opening delimiter of the study-material block appended to a system prompt
pub const CONTEXT_HEADER: &str = "========== Current study material ==========";

/// Closing delimiter of the study-material block
pub const CONTEXT_FOOTER: &str = "============================================";

const CONTEXT_INSTRUCTION: &str = "Answer the student's questions using the study material above. \
If a question is unrelated to the current topic, answer it normally.";

/// Open mapping from [`PromptMode`] to its system-prompt template
///
/// Pre-populated with the three built-in tutor templates. Registering a
/// template for an existing mode overrides the built-in.
#[derive(Debug, Clone)]
pub struct SystemPrompts {
    templates: HashMap<PromptMode, String>,
}

impl Default for SystemPrompts {
    fn default() -> Self {
        let mut templates = HashMap::new();
        templates.insert(PromptMode::Knowledge, KNOWLEDGE_PROMPT.to_string());
        templates.insert(PromptMode::Homework, HOMEWORK_PROMPT.to_string());
        templates.insert(PromptMode::Suggestion, SUGGESTION_PROMPT.to_string());
        Self { templates }
    }
}

impl SystemPrompts {
    /// Register or override the template for a mode
    pub fn insert(&mut self, mode: PromptMode, template: impl Into<String>) {
        self.templates.insert(mode, template.into());
    }

    /// Get the template for a mode, falling back to the knowledge template
    pub fn get(&self, mode: PromptMode) -> &str {
        self.templates
            .get(&mode)
            .or_else(|| self.templates.get(&PromptMode::Knowledge))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Build the full system prompt for a mode plus optional study context
    ///
    /// The template always comes first; a non-empty context is appended as a
    /// delimited block the model is told to ground its answers in, while still
    /// being allowed to answer unrelated questions.
    pub fn compose(&self, mode: PromptMode, context: Option<&str>) -> String {
        debug!(?mode, has_context = context.is_some(), "compose system prompt");
        let mut prompt = self.get(mode).to_string();

        if let Some(ctx) = context
            && !ctx.is_empty()
        {
            prompt.push_str("\n\n");
            prompt.push_str(CONTEXT_HEADER);
            prompt.push('\n');
            prompt.push_str(ctx);
            prompt.push('\n');
            prompt.push_str(CONTEXT_FOOTER);
            prompt.push_str("\n\n");
            prompt.push_str(CONTEXT_INSTRUCTION);
        }

        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_templates_present() {
        let prompts = SystemPrompts::default();
        assert!(prompts.get(PromptMode::Knowledge).contains("math tutor"));
        assert!(prompts.get(PromptMode::Homework).contains("step by step"));
        assert!(prompts.get(PromptMode::Suggestion).contains("study advisor"));
    }

    #[test]
    fn test_compose_without_context_is_bare_template() {
        let prompts = SystemPrompts::default();
        let composed = prompts.compose(PromptMode::Homework, None);
        assert_eq!(composed, HOMEWORK_PROMPT);
    }

    #[test]
    fn test_compose_template_prefix_and_context_verbatim() {
        let prompts = SystemPrompts::default();
        for mode in [PromptMode::Knowledge, PromptMode::Homework, PromptMode::Suggestion] {
            let composed = prompts.compose(mode, Some("Pythagorean theorem: a^2 + b^2 = c^2"));
            assert!(composed.starts_with(prompts.get(mode)));
            assert!(composed.contains("Pythagorean theorem: a^2 + b^2 = c^2"));
            assert!(composed.contains(CONTEXT_HEADER));
            assert!(composed.contains(CONTEXT_FOOTER));
        }
    }

    #[test]
    fn test_compose_empty_context_ignored() {
        let prompts = SystemPrompts::default();
        let composed = prompts.compose(PromptMode::Knowledge, Some(""));
        assert_eq!(composed, KNOWLEDGE_PROMPT);
    }

    #[test]
    fn test_insert_overrides_builtin() {
        let mut prompts = SystemPrompts::default();
        prompts.insert(PromptMode::Suggestion, "You are a drill sergeant.");
        assert_eq!(prompts.get(PromptMode::Suggestion), "You are a drill sergeant.");
    }
}
