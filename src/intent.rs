//! Intent classification for document requests
//!
//! Given a user utterance, decides whether the user wants no document, a
//! spreadsheet, or a text report. Keyword rules run first as an ordered
//! decision list; a model-driven closed-vocabulary fallback runs second.

use crate::gateway::ModelGateway;
use crate::prompts;

/// The inferred document-output request type for a user turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// No document requested; answer with plain chat
    None,
    /// The user wants a spreadsheet file
    Spreadsheet,
    /// The user wants a word-processor report
    Report,
}

/// One rule of the keyword decision list
#[derive(Debug, Clone, Copy)]
pub struct IntentRule {
    /// Keywords matched case-insensitively as substrings
    pub keywords: &'static [&'static str],
    /// Intent produced when any keyword matches
    pub intent: Intent,
}

/// The default decision list, evaluated in order with first match winning.
///
/// Tier order is observable behavior: explicit format words are checked
/// before content words, and Report words before Spreadsheet words, so an
/// utterance matching both explicit sets resolves to Report.
pub const DEFAULT_RULES: &[IntentRule] = &[
    IntentRule {
        keywords: &["word", "doc", "docx", "ms word", "report"],
        intent: Intent::Report,
    },
    IntentRule {
        keywords: &["excel", "spreadsheet", "csv", "xlsx", "sheet", "sheets"],
        intent: Intent::Spreadsheet,
    },
    // Structured content implies tabular export
    IntentRule {
        keywords: &["roadmap", "plan", "table", "tasks", "steps"],
        intent: Intent::Spreadsheet,
    },
    IntentRule {
        keywords: &["summary", "overview", "brief"],
        intent: Intent::Report,
    },
];

/// Classify an utterance against an explicit rule list
///
/// Returns `None` when no rule matches; the caller decides whether to
/// consult the model fallback.
pub fn classify_with_rules(rules: &[IntentRule], utterance: &str) -> Option<Intent> {
    let lowered = utterance.to_lowercase();
    for rule in rules {
        if rule.keywords.iter().any(|k| lowered.contains(k)) {
            return Some(rule.intent);
        }
    }
    None
}

/// Classify an utterance using the default keyword rules only
pub fn classify_keywords(utterance: &str) -> Option<Intent> {
    classify_with_rules(DEFAULT_RULES, utterance)
}

/// Map a model fallback reply onto an intent
///
/// The first closed-vocabulary keyword found in the reply wins; anything
/// else (including an empty reply) maps to `Intent::None`.
fn map_fallback_reply(reply: &str) -> Intent {
    let upper = reply.to_uppercase();
    let excel = upper.find("YES_EXCEL");
    let word = upper.find("YES_WORD");
    match (excel, word) {
        (Some(e), Some(w)) if e <= w => Intent::Spreadsheet,
        (Some(_), None) => Intent::Spreadsheet,
        (_, Some(_)) => Intent::Report,
        _ => Intent::None,
    }
}

/// Classify an utterance, consulting the model when no keyword matches
///
/// A gateway failure degrades to `Intent::None` rather than propagating;
/// intent detection is never the reason a request fails.
pub async fn classify(gateway: &dyn ModelGateway, utterance: &str) -> Intent {
    if let Some(intent) = classify_keywords(utterance) {
        tracing::debug!("Keyword rule matched: {:?}", intent);
        return intent;
    }

    let prompt = prompts::intent_fallback_prompt(utterance);
    match gateway.generate(&prompt).await {
        Ok(reply) => {
            let intent = map_fallback_reply(&reply);
            tracing::debug!("Model fallback classified as {:?}", intent);
            intent
        }
        Err(err) => {
            tracing::warn!("Intent fallback call failed, assuming no intent: {:#}", err);
            Intent::None
        }
    }
}
