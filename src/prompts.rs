//! Prompt builders for the Accord AI service
//!
//! All prompts sent to the model endpoint are assembled here: the plain
//! chat prompt, the deep-analysis variant, the closed-vocabulary intent
//! fallback, and the structured extraction prompt.

use crate::intent::Intent;

/// Builds the standard chat prompt
///
/// Asks the model to answer the user's question factually and concisely
/// given the conversation history.
pub fn chat_prompt(history: &str, question: &str) -> String {
    format!(
        r#"You are Accord, an AI assistant. Based on the conversation history, answer the user's question factually and concisely.

**Conversation History:**
{history}
---
**User's Question:** "{question}"

Your response:"#
    )
}

/// Builds the deep-analysis prompt used when `analysis_mode` is set
///
/// Asks the model for a three-part unbiased analysis of the conversation:
/// interaction summary, emotional tone, and psychological dynamics.
pub fn analysis_prompt(history: &str) -> String {
    format!(
        r#"You are Accord, an advanced AI psychologist and communication analyst. Your task is to perform a deep, unbiased analysis of the following conversation. Do not take sides. Your analysis should be structured into three parts:

1.  **Interaction Summary:** Briefly summarize the main topics of discussion and who said what.
2.  **Emotional Tone Analysis:** Identify the underlying emotions (e.g., frustration, excitement, confusion) for each participant. Provide brief quotes as evidence.
3.  **Psychological Dynamics:** Analyze the communication patterns. Is one person more dominant? Is there a misunderstanding? Are there signs of collaboration or conflict?

**Conversation History:**
{history}
---
Provide your analysis now:"#
    )
}

/// Builds the closed-vocabulary intent fallback prompt
///
/// The model must reply with exactly one of `YES_EXCEL`, `YES_WORD`
/// or `NO`; anything else is treated as `NO` by the classifier.
pub fn intent_fallback_prompt(question: &str) -> String {
    format!(
        r#"Decide whether the user is asking you to produce a downloadable document.

Reply with exactly one word:
- YES_EXCEL if they want a spreadsheet or tabular file
- YES_WORD if they want a written report or word-processor document
- NO otherwise

User message: "{question}"

Your answer:"#
    )
}

/// Schema description embedded in the extraction prompt for an intent
fn schema_for(intent: Intent) -> &'static str {
    match intent {
        Intent::Spreadsheet => r#"{"Phase": "...", "Action": "...", "Timeline": "..."}"#,
        Intent::Report => r#"{"Topic": "...", "Description": "...", "Key Points": "..."}"#,
        Intent::None => "{}",
    }
}

/// Builds the structured extraction prompt
///
/// Embeds the conversation history, the user's question, and the
/// intent-specific target schema, instructing the model to reply with
/// only a JSON array of objects.
pub fn extraction_prompt(history: &str, question: &str, intent: Intent) -> String {
    let schema = schema_for(intent);
    format!(
        r#"You are Accord, an AI assistant. Extract the structured data the user is asking about from the conversation.

**Conversation History:**
{history}
---
**User's Question:** "{question}"

Reply with ONLY a JSON array of objects, each shaped like:
{schema}

No prose, no markdown fences, just the JSON array:"#
    )
}
