//! Advice orchestration: prompt the model, parse the answer, and fall back
//! to the offline knowledge base when the model is unavailable.

use std::time::Duration;

use tracing::{info, warn};
use wonik_core::config::{LlmConfig, RecommendationConfig};
use wonik_core::parser::{parse_recommendation_with, MAX_TIPS};
use wonik_core::{
    lookup_medication, lookup_recommendation, parse_medication_info, MedicationInfoRecord,
    RecommendationRecord,
};
use wonik_llm::prompt::{medication_info_prompt, recommendation_prompt};
use wonik_llm::{Inference, ModelInfo, OllamaClient};

/// Turns a condition or drug name into a complete record.
///
/// The `get_*` methods never fail: any [`wonik_llm::LlmError`] is logged
/// and answered from the offline tables instead.
#[derive(Debug, Clone)]
pub struct Advisor<C = OllamaClient> {
    client: C,
    default_model: String,
    max_tips: usize,
}

impl Advisor<OllamaClient> {
    /// Build an advisor around an [`OllamaClient`] configured from `llm`.
    #[must_use]
    pub fn from_config(llm: &LlmConfig, recommendation: &RecommendationConfig) -> Self {
        let client = OllamaClient::new(llm.base_url.as_str())
            .with_generate_timeout(Duration::from_millis(llm.generate_timeout_ms))
            .with_status_timeout(Duration::from_millis(llm.status_timeout_ms));
        Self::new(client, llm.default_model.as_str()).with_max_tips(recommendation.max_tips)
    }
}

impl<C: Inference> Advisor<C> {
    /// Advisor using `client`, asking `default_model` unless a call names another.
    #[must_use]
    pub fn new(client: C, default_model: impl Into<String>) -> Self {
        Self {
            client,
            default_model: default_model.into(),
            max_tips: MAX_TIPS,
        }
    }

    /// Cap the number of tips kept from a model answer, clamped to `1..=MAX_TIPS`.
    #[must_use]
    pub fn with_max_tips(mut self, max_tips: usize) -> Self {
        self.max_tips = max_tips.clamp(1, MAX_TIPS);
        self
    }

    /// Model used when a call does not name one.
    #[must_use]
    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// The underlying inference client.
    #[must_use]
    pub fn client(&self) -> &C {
        &self.client
    }

    fn resolve_model<'a>(&'a self, model: Option<&'a str>) -> &'a str {
        model
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(&self.default_model)
    }

    /// Work/rest recommendation for `subject`.
    pub async fn get_recommendation(&self, subject: &str, model: Option<&str>) -> RecommendationRecord {
        let model = self.resolve_model(model);
        info!(subject, model, "Generating recommendation");

        match self.client.invoke(&recommendation_prompt(subject), model).await {
            Ok(raw) => parse_recommendation_with(&raw, subject, self.max_tips),
            Err(e) => {
                warn!(subject, model, error = %e, "Recommendation falling back to offline data");
                lookup_recommendation(subject)
            }
        }
    }

    /// Reference information for the medication `name`.
    pub async fn get_medication_info(&self, name: &str, model: Option<&str>) -> MedicationInfoRecord {
        let model = self.resolve_model(model);
        info!(name, model, "Generating medication info");

        match self.client.invoke(&medication_info_prompt(name), model).await {
            Ok(raw) => parse_medication_info(&raw, name),
            Err(e) => {
                warn!(name, model, error = %e, "Medication info falling back to offline data");
                lookup_medication(name)
            }
        }
    }

    /// Installed models; empty when the server is unavailable.
    pub async fn list_models(&self) -> Vec<ModelInfo> {
        self.client.list_models().await
    }

    /// Whether the inference server is reachable.
    pub async fn probe_status(&self) -> bool {
        self.client.probe_status().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use wonik_llm::LlmError;

    use super::*;

    #[derive(Debug, Clone, Copy)]
    enum Mode {
        Answer(&'static str),
        Unreachable,
        Malformed,
        Timeout,
    }

    struct StubInference {
        mode: Mode,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl StubInference {
        fn new(mode: Mode) -> Self {
            Self {
                mode,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().expect("lock").clone()
        }
    }

    impl Inference for StubInference {
        async fn invoke(&self, prompt: &str, model: &str) -> Result<String, LlmError> {
            self.calls
                .lock()
                .expect("lock")
                .push((prompt.to_string(), model.to_string()));
            match self.mode {
                Mode::Answer(text) => Ok(text.to_string()),
                Mode::Unreachable => Err(LlmError::Unreachable("connection refused".into())),
                Mode::Malformed => Err(LlmError::MalformedResponse("not json".into())),
                Mode::Timeout => Err(LlmError::Timeout(40_000)),
            }
        }

        async fn list_models(&self) -> Vec<ModelInfo> {
            vec![ModelInfo {
                name: "gemma3:1b".into(),
                size: "1B".into(),
            }]
        }

        async fn probe_status(&self) -> bool {
            matches!(self.mode, Mode::Answer(_))
        }
    }

    fn advisor(mode: Mode) -> Advisor<StubInference> {
        Advisor::new(StubInference::new(mode), "gemma3:1b")
    }

    const ANSWER: &str = "\
Work pattern: 45 minutes work, 15 minutes rest
Tips:
- Drink a full glass of water every hour
- Dim the monitor and avoid bright screens
- Stretch your neck and shoulders gently";

    #[tokio::test]
    async fn unreachable_server_gives_offline_record() {
        let advisor = advisor(Mode::Unreachable);
        let record = advisor.get_recommendation("타이레놀", None).await;
        assert!(record.same_content(&lookup_recommendation("타이레놀")));
        assert_eq!(record.subject, "타이레놀");
    }

    #[tokio::test]
    async fn malformed_answer_gives_fresh_offline_record() {
        let advisor = advisor(Mode::Malformed);
        let before = chrono::Utc::now();
        let record = advisor.get_recommendation("편두통", None).await;
        assert_eq!(record.subject, "편두통");
        assert!(record.same_content(&lookup_recommendation("편두통")));
        assert!(record.generated_at >= before);
    }

    #[tokio::test]
    async fn timeout_falls_back_for_medication_info() {
        let advisor = advisor(Mode::Timeout);
        let info = advisor.get_medication_info("아스피린", None).await;
        assert!(info.same_content(&lookup_medication("아스피린")));
    }

    #[tokio::test]
    async fn successful_answer_is_parsed() {
        let advisor = advisor(Mode::Answer(ANSWER));
        let record = advisor.get_recommendation("편두통", None).await;
        assert_eq!(record.pattern, "45분 업무 → 15분 휴식");
        assert_eq!(record.tips.len(), 3);
        assert_eq!(record.tips[0], "Drink a full glass of water every hour");
    }

    #[tokio::test]
    async fn max_tips_is_applied() {
        let advisor = advisor(Mode::Answer(ANSWER)).with_max_tips(1);
        let record = advisor.get_recommendation("편두통", None).await;
        assert_eq!(record.tips.len(), 1);
    }

    const SIX_TIPS: &str = "\
Work pattern: 45 minutes work, 15 minutes rest
Tips:
- Drink a full glass of water every hour
- Dim the monitor and avoid bright screens
- Stretch your neck and shoulders gently
- Walk around the office after lunch
- Keep a regular bedtime on weekdays
- Write down headache triggers in a diary";

    #[tokio::test]
    async fn configured_max_tips_above_four_is_clamped() {
        let config = wonik_core::WonikConfig::from_toml("[recommendation]\nmax_tips = 6").expect("config");
        let capped = advisor(Mode::Answer(SIX_TIPS)).with_max_tips(config.recommendation.max_tips);
        let record = capped.get_recommendation("편두통", None).await;
        assert_eq!(record.tips.len(), MAX_TIPS);

        let floored = advisor(Mode::Answer(SIX_TIPS)).with_max_tips(0);
        let record = floored.get_recommendation("편두통", None).await;
        assert_eq!(record.tips.len(), 1);
    }

    #[tokio::test]
    async fn model_override_and_default() {
        let advisor = advisor(Mode::Unreachable);
        advisor.get_recommendation("고혈압", Some("llama3.2:3b")).await;
        advisor.get_recommendation("고혈압", None).await;
        advisor.get_recommendation("고혈압", Some("  ")).await;

        let models: Vec<String> = advisor.client().calls().into_iter().map(|(_, m)| m).collect();
        assert_eq!(models, vec!["llama3.2:3b", "gemma3:1b", "gemma3:1b"]);
    }

    #[tokio::test]
    async fn prompts_carry_the_name() {
        let advisor = advisor(Mode::Unreachable);
        advisor.get_recommendation("관절염", None).await;
        advisor.get_medication_info("메트포르민", None).await;

        let calls = advisor.client().calls();
        assert!(calls[0].0.contains("For a patient with 관절염,"));
        assert!(calls[1].0.contains("'메트포르민'"));
    }

    #[tokio::test]
    async fn labelled_medication_answer_is_tagged() {
        let advisor = advisor(Mode::Answer("분류: 해열진통제\n효능: 통증 완화"));
        let info = advisor.get_medication_info("타이레놀", None).await;
        assert_eq!(info.category, "해열진통제");
        assert_eq!(info.effects, "통증 완화");
        assert!(!info.warnings.is_empty());
    }

    #[tokio::test]
    async fn forwards_models_and_status() {
        assert_eq!(advisor(Mode::Answer("")).list_models().await.len(), 1);
        assert!(advisor(Mode::Answer("")).probe_status().await);
        assert!(!advisor(Mode::Unreachable).probe_status().await);
    }

    #[test]
    fn from_config_uses_configured_model() {
        let advisor = Advisor::from_config(&LlmConfig::default(), &RecommendationConfig::default());
        assert_eq!(advisor.default_model(), "gemma3:1b");
        assert_eq!(advisor.client().base_url(), "http://127.0.0.1:11434");
    }
}
