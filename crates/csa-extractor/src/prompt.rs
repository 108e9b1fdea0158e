//! LLM prompt engineering for contract field extraction

use csa_domain::{FieldSpec, FIELD_CATALOG};

/// Builds the extraction prompt for one contract
pub struct PromptBuilder<'a> {
    contract_text: &'a str,
    fields: &'a [FieldSpec],
}

impl<'a> PromptBuilder<'a> {
    /// Create a prompt builder asking for the full field catalog
    pub fn new(contract_text: &'a str) -> Self {
        Self {
            contract_text,
            fields: &FIELD_CATALOG,
        }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\nFields to extract:\n");
        for field in self.fields {
            prompt.push_str(&format!("- {}: {}\n", field.name, field.description));
        }

        prompt.push_str("\nContract text:\n");
        prompt.push_str(self.contract_text);
        prompt.push('\n');

        prompt
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"You are a legal contract summarizer. Extract the following information from the contract text below.

For each field, return:
- The exact text from the contract, if it exists.
- The value null (without quotes) if the field is not present.

Return the result strictly as JSON, starting with '{' and ending with '}'. No explanations, no code blocks, no markdown. The field names must exactly match the list below."#;
