//! Built-in system instructions selected by `analysis_type`.

use serde::Serialize;

/// Instruction used when no preset matches.
pub const GENERIC_INSTRUCTION: &str = "You are a helpful document analyzer.";

/// A named system instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Preset {
    #[serde(rename = "type")]
    pub key: &'static str,
    pub prompt: &'static str,
}

/// All presets, sorted by key.
pub const PRESETS: &[Preset] = &[
    Preset {
        key: "contract",
        prompt: "You are a legal analyst reviewing a contract. Identify the parties, \
                 the term and termination conditions, payment obligations, liability \
                 and indemnity clauses, and any unusual or risky provisions.",
    },
    Preset {
        key: "cv",
        prompt: "You are an experienced recruiter reviewing a CV. Summarize the \
                 candidate's experience, key skills, education and notable achievements, \
                 and point out gaps or weaknesses.",
    },
    Preset {
        key: "tender",
        prompt: "You are a bid manager analyzing a tender document. Extract the scope of \
                 work, eligibility requirements, evaluation criteria, submission deadlines \
                 and required documents.",
    },
];

/// Look up a preset by key, ignoring case and surrounding whitespace.
pub fn find(key: &str) -> Option<&'static Preset> {
    let key = key.trim();
    PRESETS.iter().find(|p| p.key.eq_ignore_ascii_case(key))
}

/// System instruction for an optional `analysis_type`.
pub fn resolve_instruction(analysis_type: Option<&str>) -> &'static str {
    analysis_type
        .and_then(find)
        .map(|p| p.prompt)
        .unwrap_or(GENERIC_INSTRUCTION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_sorted_by_key() {
        let keys: Vec<_> = PRESETS.iter().map(|p| p.key).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_known_type_uses_preset_verbatim() {
        let cv = find("cv").unwrap();
        assert_eq!(resolve_instruction(Some("cv")), cv.prompt);
        assert_eq!(resolve_instruction(Some("CV")), cv.prompt);
        assert_eq!(resolve_instruction(Some(" Tender ")), find("tender").unwrap().prompt);
    }

    #[test]
    fn test_unknown_type_uses_generic() {
        assert_eq!(resolve_instruction(None), GENERIC_INSTRUCTION);
        assert_eq!(resolve_instruction(Some("invoice")), GENERIC_INSTRUCTION);
        assert_eq!(resolve_instruction(Some("")), GENERIC_INSTRUCTION);
    }

    #[test]
    fn test_preset_serializes_type_field() {
        let json = serde_json::to_value(find("contract").unwrap()).unwrap();
        assert_eq!(json["type"], "contract");
        assert!(json["prompt"].as_str().unwrap().contains("contract"));
    }
}
