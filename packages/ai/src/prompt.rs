//! Extraction prompt templates.
//!
//! Both templates ask for the same thing: verbatim key/value pairs with the
//! sentence they came from, unclassifiable text as `raw_text` rows, and a
//! bare JSON list as the only output. [`PromptStyle::Detailed`] spells the
//! rules out with examples; [`PromptStyle::Concise`] is the short form used
//! by interactive runs.

use serde::Deserialize;
use strum_macros::{AsRefStr, Display, EnumString};

/// Which instruction template wraps each chunk.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PromptStyle {
    /// Full rule list with examples of inferred keys and the output shape.
    #[default]
    Detailed,
    /// Short rule list.
    Concise,
}

/// Wraps `chunk` in the instruction template for `style`.
#[must_use]
pub fn build_prompt(style: PromptStyle, chunk: &str) -> String {
    match style {
        PromptStyle::Detailed => format!(
            r#"You are a document parser. Extract ALL possible key:value information
from the given text strictly in its original wording.

RULES:
- Do NOT summarize or rephrase any text.
- Infer keys logically (for example Date of Birth, Salary, Degree, Organization, Address).
- Values MUST stay exactly as they appear in the text.
- Include a "context" for each pair containing the FULL sentence or paragraph it came from.
- If a part of the text cannot be turned into a key:value pair, output it as:
  {{"key":"raw_text", "value":"<text>", "context":"<text>"}}

Return ONLY a valid JSON list like:
[
  {{"key":"...", "value":"...", "context":"..."}}
]

TEXT:
"""{chunk}""""#
        ),
        PromptStyle::Concise => format!(
            r#"Extract key:value pairs from the text below.
Rules:
- No paraphrasing
- Values must be exact
- Provide a "context" per row
- If not identifiable, return it as {{"key":"raw_text","value":"<text>","context":"<text>"}}

Return only a JSON list.
Text: """{chunk}""""#
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_chunk_in_triple_quotes() {
        for style in [PromptStyle::Detailed, PromptStyle::Concise] {
            let prompt = build_prompt(style, "Name: Alice Age: 30");
            assert!(prompt.contains(r#""""Name: Alice Age: 30""""#), "{style}");
        }
    }

    #[test]
    fn detailed_prompt_states_the_rules() {
        let prompt = build_prompt(PromptStyle::Detailed, "x");
        assert!(prompt.contains("Do NOT summarize or rephrase"));
        assert!(prompt.contains(r#"{"key":"raw_text", "value":"<text>", "context":"<text>"}"#));
        assert!(prompt.contains("Return ONLY a valid JSON list"));
    }

    #[test]
    fn concise_prompt_asks_for_json_list_only() {
        let prompt = build_prompt(PromptStyle::Concise, "x");
        assert!(prompt.contains("Return only a JSON list."));
        assert!(prompt.contains(r#"{"key":"raw_text","value":"<text>","context":"<text>"}"#));
    }

    #[test]
    fn parses_style_names() {
        assert_eq!("concise".parse::<PromptStyle>().unwrap(), PromptStyle::Concise);
        assert_eq!(PromptStyle::Detailed.to_string(), "detailed");
    }
}
