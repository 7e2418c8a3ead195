//! UI-facing facade over the advisor and the medication store.
//!
//! Every mutating call returns a `{success, …}` outcome instead of a
//! `Result`, so a presentation layer can forward it as JSON unchanged.
//! Ids arrive as strings and are coerced numerically.

use serde::Serialize;
use tracing::warn;
use wonik_core::validation::{sanitize_input, validate_dosage, validate_medication_name, validate_time};
use wonik_core::{
    AttachedInfo, MedicationEntity, MedicationId, MedicationInfoRecord, MedicationPatch,
    MedicationStore, NewMedication, RecommendationRecord, WonikConfig, WonikError,
};
use wonik_llm::{Inference, ModelInfo, OllamaClient};

use crate::advisor::Advisor;

/// Result of [`HealthApi::add_medication`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddOutcome {
    /// Whether the medication was stored.
    pub success: bool,
    /// Id of the new row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<MedicationId>,
    /// User-facing failure message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of an update or an attach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateOutcome {
    /// Whether the row was updated.
    pub success: bool,
    /// The row after the update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<MedicationEntity>,
    /// User-facing failure message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of [`HealthApi::delete_medication`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    /// Whether the statement ran.
    pub success: bool,
    /// Rows removed (0 when the id did not exist).
    pub changes: usize,
    /// User-facing failure message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<wonik_core::error::Result<MedicationId>> for AddOutcome {
    fn from(result: wonik_core::error::Result<MedicationId>) -> Self {
        match result {
            Ok(id) => Self {
                success: true,
                id: Some(id),
                error: None,
            },
            Err(e) => Self {
                success: false,
                id: None,
                error: Some(e.to_string()),
            },
        }
    }
}

impl From<wonik_core::error::Result<MedicationEntity>> for UpdateOutcome {
    fn from(result: wonik_core::error::Result<MedicationEntity>) -> Self {
        match result {
            Ok(entity) => Self {
                success: true,
                entity: Some(entity),
                error: None,
            },
            Err(e) => Self {
                success: false,
                entity: None,
                error: Some(e.to_string()),
            },
        }
    }
}

impl From<wonik_core::error::Result<usize>> for DeleteOutcome {
    fn from(result: wonik_core::error::Result<usize>) -> Self {
        match result {
            Ok(changes) => Self {
                success: true,
                changes,
                error: None,
            },
            Err(e) => Self {
                success: false,
                changes: 0,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Sanitize every field, then validate the ones with rules.
fn clean_new(fields: &NewMedication) -> wonik_core::error::Result<NewMedication> {
    let cleaned = NewMedication {
        name: sanitize_input(&fields.name),
        dosage: sanitize_input(&fields.dosage),
        time: sanitize_input(&fields.time),
        notes: sanitize_input(&fields.notes),
    };
    validate_medication_name(&cleaned.name)?;
    validate_dosage(&cleaned.dosage)?;
    validate_time(&cleaned.time)?;
    Ok(cleaned)
}

fn clean_patch(patch: &MedicationPatch) -> wonik_core::error::Result<MedicationPatch> {
    let sanitize = |field: &Option<String>| field.as_deref().map(sanitize_input);
    let cleaned = MedicationPatch {
        name: sanitize(&patch.name),
        dosage: sanitize(&patch.dosage),
        time: sanitize(&patch.time),
        notes: sanitize(&patch.notes),
        ai_info: patch.ai_info.clone(),
    };
    if let Some(name) = &cleaned.name {
        validate_medication_name(name)?;
    }
    if let Some(dosage) = &cleaned.dosage {
        validate_dosage(dosage)?;
    }
    if let Some(time) = &cleaned.time {
        validate_time(time)?;
    }
    Ok(cleaned)
}

/// The operations a presentation layer needs.
#[derive(Debug)]
pub struct HealthApi<C = OllamaClient> {
    advisor: Advisor<C>,
    store: MedicationStore,
}

impl HealthApi<OllamaClient> {
    /// Open the configured database and build an Ollama-backed advisor.
    ///
    /// # Errors
    ///
    /// Returns [`WonikError::Database`] if the database cannot be opened.
    pub fn from_config(config: &WonikConfig) -> wonik_core::error::Result<Self> {
        let store = MedicationStore::open(&config.persistence.db_path, &config.persistence)?;
        let advisor = Advisor::from_config(&config.llm, &config.recommendation);
        Ok(Self::new(advisor, store))
    }
}

impl<C: Inference> HealthApi<C> {
    /// Combine an advisor and an open store.
    #[must_use]
    pub fn new(advisor: Advisor<C>, store: MedicationStore) -> Self {
        Self { advisor, store }
    }

    /// The advisor behind the advice calls.
    #[must_use]
    pub fn advisor(&self) -> &Advisor<C> {
        &self.advisor
    }

    // ------------------------------------------------------------------
    // Medications
    // ------------------------------------------------------------------

    /// Sanitize, validate and store a medication.
    pub fn add_medication(&mut self, fields: &NewMedication) -> AddOutcome {
        let result = clean_new(fields).and_then(|cleaned| self.store.add(&cleaned));
        if let Err(e) = &result {
            warn!(name = %fields.name, error = %e, "Adding medication failed");
        }
        result.into()
    }

    /// All medications, newest first. Empty if the store cannot be read.
    pub fn medications(&self) -> Vec<MedicationEntity> {
        self.store.all().unwrap_or_else(|e| {
            warn!(error = %e, "Listing medications failed");
            Vec::new()
        })
    }

    /// One medication; `None` for unknown or non-numeric ids.
    pub fn medication(&self, id: &str) -> Option<MedicationEntity> {
        let result = id.parse::<MedicationId>().and_then(|id| self.store.get(id));
        result.unwrap_or_else(|e| {
            warn!(id, error = %e, "Reading medication failed");
            None
        })
    }

    /// Apply a partial update.
    pub fn update_medication(&mut self, id: &str, patch: &MedicationPatch) -> UpdateOutcome {
        let result = id.parse::<MedicationId>().and_then(|parsed| {
            let cleaned = clean_patch(patch)?;
            self.store.update(parsed, &cleaned)
        });
        if let Err(e) = &result {
            warn!(id, error = %e, "Updating medication failed");
        }
        result.into()
    }

    /// Delete a medication. Unknown ids succeed with zero changes.
    pub fn delete_medication(&mut self, id: &str) -> DeleteOutcome {
        let result = id
            .parse::<MedicationId>()
            .and_then(|parsed| self.store.delete(parsed));
        if let Err(e) = &result {
            warn!(id, error = %e, "Deleting medication failed");
        }
        result.into()
    }

    /// Number of stored medications; 0 if the store cannot be read.
    pub fn medication_count(&self) -> usize {
        self.store.count().unwrap_or_else(|e| {
            warn!(error = %e, "Counting medications failed");
            0
        })
    }

    // ------------------------------------------------------------------
    // Advice
    // ------------------------------------------------------------------

    /// Recommendation for a condition.
    pub async fn recommendation(&self, subject: &str, model: Option<&str>) -> RecommendationRecord {
        self.advisor.get_recommendation(subject, model).await
    }

    /// Reference information for a medication.
    pub async fn medication_info(&self, name: &str, model: Option<&str>) -> MedicationInfoRecord {
        self.advisor.get_medication_info(name, model).await
    }

    /// Installed models.
    pub async fn models(&self) -> Vec<ModelInfo> {
        self.advisor.list_models().await
    }

    /// Whether the inference server is reachable.
    pub async fn status(&self) -> bool {
        self.advisor.probe_status().await
    }

    /// Fetch medication info for a stored medication's name and attach it.
    pub async fn attach_medication_info(&mut self, id: &str, model: Option<&str>) -> UpdateOutcome {
        let result = self.try_attach_medication_info(id, model).await;
        if let Err(e) = &result {
            warn!(id, error = %e, "Attaching medication info failed");
        }
        result.into()
    }

    /// Fetch a recommendation for `subject` and attach it to a stored medication.
    pub async fn attach_recommendation(
        &mut self,
        id: &str,
        subject: &str,
        model: Option<&str>,
    ) -> UpdateOutcome {
        let result = self.try_attach_recommendation(id, subject, model).await;
        if let Err(e) = &result {
            warn!(id, subject, error = %e, "Attaching recommendation failed");
        }
        result.into()
    }

    async fn try_attach_medication_info(
        &mut self,
        id: &str,
        model: Option<&str>,
    ) -> wonik_core::error::Result<MedicationEntity> {
        let entity = self.require(id)?;
        let info = self.advisor.get_medication_info(&entity.name, model).await;
        self.store
            .update(entity.id, &MedicationPatch::attach(AttachedInfo::MedicationInfo(info)))
    }

    async fn try_attach_recommendation(
        &mut self,
        id: &str,
        subject: &str,
        model: Option<&str>,
    ) -> wonik_core::error::Result<MedicationEntity> {
        let entity = self.require(id)?;
        let record = self.advisor.get_recommendation(subject, model).await;
        self.store
            .update(entity.id, &MedicationPatch::attach(AttachedInfo::Recommendation(record)))
    }

    fn require(&self, id: &str) -> wonik_core::error::Result<MedicationEntity> {
        let parsed = id.parse::<MedicationId>()?;
        self.store.get(parsed)?.ok_or(WonikError::NotFound(parsed))
    }
}

#[cfg(test)]
mod tests {
    use wonik_core::lookup_medication;
    use wonik_llm::LlmError;

    use super::*;

    struct Offline;

    impl Inference for Offline {
        async fn invoke(&self, _prompt: &str, _model: &str) -> Result<String, LlmError> {
            Err(LlmError::Unreachable("connection refused".into()))
        }

        async fn list_models(&self) -> Vec<ModelInfo> {
            Vec::new()
        }

        async fn probe_status(&self) -> bool {
            false
        }
    }

    fn api() -> HealthApi<Offline> {
        let store = MedicationStore::open_in_memory().expect("in-memory store");
        HealthApi::new(Advisor::new(Offline, "gemma3:1b"), store)
    }

    fn medication(name: &str, dosage: &str, time: &str) -> NewMedication {
        NewMedication {
            name: name.into(),
            dosage: dosage.into(),
            time: time.into(),
            notes: String::new(),
        }
    }

    #[test]
    fn add_then_read_back() {
        let mut api = api();
        let outcome = api.add_medication(&medication("타이레놀", "500mg", "08:30"));
        assert!(outcome.success);
        let id = outcome.id.expect("id");

        let stored = api.medication(&id.to_string()).expect("stored");
        assert_eq!(stored.name, "타이레놀");
        assert_eq!(stored.dosage, "500mg");
        assert_eq!(api.medication_count(), 1);
    }

    #[test]
    fn add_sanitizes_before_validating() {
        let mut api = api();
        let outcome = api.add_medication(&medication("<b>아스피린</b>", "", ""));
        assert!(outcome.success);
        assert_eq!(api.medications()[0].name, "아스피린");
    }

    #[test]
    fn add_reports_validation_message() {
        let mut api = api();
        let outcome = api.add_medication(&medication("타이레놀@#$", "", ""));
        assert!(!outcome.success);
        assert_eq!(
            outcome.error.as_deref(),
            Some("약물 이름에는 한글, 영문, 숫자, 공백, 하이픈, 마침표만 사용할 수 있습니다.")
        );

        let outcome = api.add_medication(&medication("타이레놀", "", "25:00"));
        assert_eq!(outcome.error.as_deref(), Some("올바른 시간 형식을 입력해주세요. (예: 08:30)"));
        assert_eq!(api.medication_count(), 0);
    }

    #[test]
    fn ids_are_coerced_numerically() {
        let mut api = api();
        let id = api.add_medication(&medication("메트포르민", "", "")).id.expect("id");

        assert!(api.medication(&format!(" {id} ")).is_some());
        assert!(api.medication("abc").is_none());

        let outcome = api.delete_medication("abc");
        assert!(!outcome.success);
        assert_eq!(outcome.changes, 0);
    }

    #[test]
    fn delete_reports_changes() {
        let mut api = api();
        let id = api.add_medication(&medication("오메가3", "", "")).id.expect("id");

        let first = api.delete_medication(&id.to_string());
        assert!(first.success);
        assert_eq!(first.changes, 1);

        let again = api.delete_medication(&id.to_string());
        assert!(again.success);
        assert_eq!(again.changes, 0);
    }

    #[test]
    fn update_validates_present_fields() {
        let mut api = api();
        let id = api.add_medication(&medication("이부프로펜", "200mg", "")).id.expect("id");

        let patch = MedicationPatch {
            time: Some("21:00".into()),
            ..MedicationPatch::default()
        };
        let outcome = api.update_medication(&id.to_string(), &patch);
        assert!(outcome.success);
        let entity = outcome.entity.expect("entity");
        assert_eq!(entity.time, "21:00");
        assert_eq!(entity.dosage, "200mg");

        let bad = MedicationPatch {
            dosage: Some("많이".into()),
            ..MedicationPatch::default()
        };
        assert!(!api.update_medication(&id.to_string(), &bad).success);
    }

    #[test]
    fn empty_update_succeeds_without_changes() {
        let mut api = api();
        let id = api.add_medication(&medication("메트포르민", "500mg", "08:00")).id.expect("id");
        let before = api.medication(&id.to_string()).expect("stored");

        let outcome = api.update_medication(&id.to_string(), &MedicationPatch::default());
        assert!(outcome.success);
        assert_eq!(outcome.entity, Some(before));
    }

    #[test]
    fn update_unknown_id_fails() {
        let mut api = api();
        let outcome = api.update_medication("999", &MedicationPatch::default());
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("Medication not found: 999"));
    }

    #[test]
    fn outcomes_serialize_without_empty_fields() {
        let ok = AddOutcome::from(Ok::<_, WonikError>(MedicationId(7)));
        assert_eq!(
            serde_json::to_value(&ok).expect("json"),
            serde_json::json!({"success": true, "id": 7})
        );

        let failed = DeleteOutcome::from(Err::<usize, _>(WonikError::InvalidId("x".into())));
        let json = serde_json::to_value(&failed).expect("json");
        assert_eq!(json["success"], false);
        assert_eq!(json["changes"], 0);
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn attach_offline_medication_info() {
        let mut api = api();
        let id = api.add_medication(&medication("타이레놀", "", "")).id.expect("id");

        let outcome = api.attach_medication_info(&id.to_string(), None).await;
        assert!(outcome.success);
        let Some(AttachedInfo::MedicationInfo(info)) = outcome.entity.expect("entity").ai_info else {
            panic!("expected medication info");
        };
        assert!(info.same_content(&lookup_medication("타이레놀")));
    }

    #[tokio::test]
    async fn attach_recommendation_to_missing_row() {
        let mut api = api();
        let outcome = api.attach_recommendation("42", "편두통", None).await;
        assert!(!outcome.success);
        assert!(outcome.entity.is_none());
    }

    #[tokio::test]
    async fn offline_server_reports_status() {
        let api = api();
        assert!(!api.status().await);
        assert!(api.models().await.is_empty());
    }
}
