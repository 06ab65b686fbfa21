//! Prompt templates for grounded generation

use crate::types::{RetrievedPassage, SourceList};

use super::citation::citation_token;

/// System instruction and user message for one generation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPrompt {
    pub system_instruction: String,
    pub user_message: String,
}

/// Builds the grounding context and the citation contract
#[derive(Debug, Clone)]
pub struct PromptComposer {
    refusal_token: String,
}

impl PromptComposer {
    pub fn new(refusal_token: impl Into<String>) -> Self {
        Self {
            refusal_token: refusal_token.into(),
        }
    }

    /// Join passage bodies with a blank line
    pub fn build_context(passages: &[RetrievedPassage]) -> String {
        passages
            .iter()
            .map(|p| p.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Compose the prompt for `question` over already-truncated `passages`
    pub fn compose(
        &self,
        question: &str,
        passages: &[RetrievedPassage],
        sources: &SourceList,
    ) -> ComposedPrompt {
        ComposedPrompt {
            system_instruction: self.system_instruction(),
            user_message: Self::user_message(question, &Self::build_context(passages), sources),
        }
    }

    fn system_instruction(&self) -> String {
        format!(
            r#"You are a document-grounded assistant that ONLY uses information from the provided context.

GROUNDING RULES - FOLLOW THEM EXACTLY:
1. Answer using ONLY information explicitly stated in the CONTEXT supplied with the question
2. If the answer is not contained in the context, reply with exactly {refusal} and nothing else
3. NEVER use external knowledge, general knowledge, or training data
4. Cite the context inline with markers of the form {example}, where <id> is one of the AVAILABLE SOURCES
5. NEVER cite an id that is not listed under AVAILABLE SOURCES"#,
            refusal = self.refusal_token,
            example = citation_token("<id>"),
        )
    }

    fn user_message(question: &str, context: &str, sources: &SourceList) -> String {
        format!(
            r#"QUESTION: {question}

CONTEXT:
{context}

AVAILABLE SOURCES:
{sources}"#,
            question = question,
            context = context,
            sources = Self::format_sources_list(sources),
        )
    }

    /// One `- <id>` line per citable source
    fn format_sources_list(sources: &SourceList) -> String {
        if sources.is_empty() {
            return "(none)".to_string();
        }
        sources
            .iter()
            .map(|s| format!("- {}", s))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self::new("NOCONTEXT")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passages() -> Vec<RetrievedPassage> {
        vec![
            RetrievedPassage::new(
                "Paris is the capital of France.",
                Some("geo.pdf".into()),
                Some(0.9),
            ),
            RetrievedPassage::new(
                "The Seine flows through Paris.",
                Some("rivers/seine.txt".into()),
                Some(0.8),
            ),
        ]
    }

    #[test]
    fn test_context_uses_blank_line_separator() {
        assert_eq!(
            PromptComposer::build_context(&passages()),
            "Paris is the capital of France.\n\nThe Seine flows through Paris."
        );
    }

    #[test]
    fn test_system_instruction_carries_contract() {
        let prompt =
            PromptComposer::new("NOCONTEXT").compose("q", &passages(), &SourceList::default());
        assert!(prompt.system_instruction.contains("exactly NOCONTEXT"));
        assert!(prompt.system_instruction.contains("[source:<id>]"));
        assert!(prompt.system_instruction.contains("ONLY"));
    }

    #[test]
    fn test_user_message_lists_question_context_and_sources() {
        let passages = passages();
        let sources = SourceList::from_passages(&passages);
        let prompt = PromptComposer::default().compose("What is the capital?", &passages, &sources);

        assert!(prompt.user_message.starts_with("QUESTION: What is the capital?"));
        assert!(prompt.user_message.contains("The Seine flows through Paris."));
        assert!(prompt.user_message.contains("- geo.pdf\n- seine.txt"));
    }

    #[test]
    fn test_custom_refusal_token() {
        let prompt = PromptComposer::new("NO_ANSWER").compose("q", &[], &SourceList::default());
        assert!(prompt.system_instruction.contains("exactly NO_ANSWER"));
        assert!(prompt.user_message.ends_with("(none)"));
    }
}
