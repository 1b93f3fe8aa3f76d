// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Prompt building and description validation

use serde::Serialize;

use crate::config::GenerationConfig;

/// System role sent with every request
pub const SYSTEM_ROLE: &str =
    "You are an expert SQL analyst providing technical column documentation.";

/// Phrases stripped from generated text, matched literally
pub const FILLER_PHRASES: [&str; 4] = [
    "as mentioned above",
    "as noted",
    "it is worth noting that",
    "it should be noted that",
];

const REQUIREMENTS: [&str; 7] = [
    "Explain both business meaning and technical derivation",
    "Describe key transformations and their purpose",
    "Note important filters or conditions",
    "Highlight data quality considerations",
    "Keep it concise - no repetition",
    "Use technical language appropriate for data documentation",
    "Maximum 3 sentences",
];

/// One request to a text-generation service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub system_role: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl GenerationRequest {
    /// Request describing the column serialized in `payload`
    pub fn for_column(payload: &str, config: &GenerationConfig) -> Self {
        Self {
            system_role: SYSTEM_ROLE.to_string(),
            prompt: build_prompt(payload),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

/// User prompt embedding a column context payload
pub fn build_prompt(payload: &str) -> String {
    let mut prompt = String::from(
        "Generate a precise, non-repetitive technical description for this SQL column:\n\n",
    );
    prompt.push_str(payload);
    prompt.push_str("\n\nRequirements:\n");
    for (n, requirement) in REQUIREMENTS.iter().enumerate() {
        prompt.push_str(&format!("{}. {}\n", n + 1, requirement));
    }
    prompt
}

/// Strip filler phrases and make sure the text ends with a period
///
/// Removal is a plain substring replacement, so a phrase embedded in a
/// longer word is removed too.
pub fn validate_description(text: &str) -> String {
    let mut description = text.to_string();
    for phrase in FILLER_PHRASES {
        description = description.replace(phrase, "");
    }

    let mut description = description.trim().to_string();
    if !description.ends_with('.') {
        description.push('.');
    }
    description
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_payload_and_requirements() {
        let prompt = build_prompt("{\"name\": \"total\"}");
        assert!(prompt.contains("{\"name\": \"total\"}"));
        assert!(prompt.contains("1. Explain both business meaning and technical derivation"));
        assert!(prompt.contains("7. Maximum 3 sentences"));
    }

    #[test]
    fn test_request_uses_config_sampling() {
        let config = GenerationConfig {
            max_tokens: 64,
            temperature: 0.2,
            ..Default::default()
        };
        let request = GenerationRequest::for_column("{}", &config);
        assert_eq!(request.system_role, SYSTEM_ROLE);
        assert_eq!(request.max_tokens, 64);
        assert_eq!(request.temperature, 0.2);
    }

    #[test]
    fn test_validate_strips_filler_and_adds_period() {
        assert_eq!(
            validate_description("Total revenue, as noted, per order"),
            "Total revenue, , per order."
        );
        assert_eq!(
            validate_description("it should be noted that amounts are gross."),
            "amounts are gross."
        );
    }

    #[test]
    fn test_validate_trims_before_period_check() {
        assert_eq!(validate_description("  Order total  "), "Order total.");
        assert_eq!(validate_description("Order total.\n"), "Order total.");
        assert_eq!(validate_description(""), ".");
    }

    #[test]
    fn test_validate_is_case_sensitive_substring_removal() {
        // Capitalized phrases are kept
        assert_eq!(validate_description("As noted earlier"), "As noted earlier.");
        // Phrase inside a longer word is removed
        assert_eq!(validate_description("has notedly"), "hly.");
    }
}
