//! Prompt templates sent to the model.
//!
//! Both prompts are fixed text with a single `{…}` placeholder. The
//! parsers in `wonik-core` are written against the answer shapes these
//! prompts ask for, so a wording change here needs a matching parser test.

/// Work/rest recommendation for a condition. Placeholder: `{subject}`.
pub const RECOMMENDATION_PROMPT: &str = "You are a health advisor. For a patient with {subject}, provide ONLY:
1. Work pattern: [number] minutes work, [number] minutes rest
2. Three tips in bullet points

Format example:
Work pattern: 45 minutes work, 15 minutes rest
Tips:
- Drink water regularly
- Take breaks
- Stretch often

Be brief. No disclaimers.";

/// Labelled medication summary. Placeholder: `{name}`.
pub const MEDICATION_INFO_PROMPT: &str = "당신은 약사입니다. '{name}' 약물에 대해 아래 형식으로만 한국어로 답하세요.
분류: [약물 분류]
효능: [주요 효능]
복용법: [일반적인 복용 방법]
주의사항: [항목1], [항목2], [항목3]
부작용: [항목1], [항목2], [항목3]

각 항목은 한 줄로 짧게 작성하세요. 면책 문구는 쓰지 마세요.";

/// Simple template interpolation.
///
/// Replaces `{key}` with the corresponding value. Unknown placeholders are
/// left as they are.
#[must_use]
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{key}}}"), value);
    }
    result
}

/// Identifies a prompt by purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptId {
    /// Work/rest pattern, schedule and tips for a condition.
    Recommendation,
    /// Category, effects, usage, warnings and side effects of a drug.
    MedicationInfo,
}

impl PromptId {
    /// Raw template text.
    #[must_use]
    pub fn template(self) -> &'static str {
        match self {
            Self::Recommendation => RECOMMENDATION_PROMPT,
            Self::MedicationInfo => MEDICATION_INFO_PROMPT,
        }
    }

    /// Name of the single placeholder the template expects.
    #[must_use]
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Recommendation => "subject",
            Self::MedicationInfo => "name",
        }
    }

    /// Render the template with `value` in its placeholder.
    #[must_use]
    pub fn render(self, value: &str) -> String {
        render_template(self.template(), &[(self.placeholder(), value)])
    }
}

/// Recommendation prompt for `subject`.
#[must_use]
pub fn recommendation_prompt(subject: &str) -> String {
    PromptId::Recommendation.render(subject)
}

/// Medication-info prompt for `name`.
#[must_use]
pub fn medication_info_prompt(name: &str) -> String {
    PromptId::MedicationInfo.render(name)
}
