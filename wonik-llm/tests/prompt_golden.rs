//! Golden checks for rendered prompts.
//!
//! The answer parsers key on the labels and example lines these prompts
//! ask for, so each case pins the phrases the parsers depend on.

use wonik_llm::prompt::{self, PromptId};

struct GoldenCase {
    name: &'static str,
    id: PromptId,
    value: &'static str,
    prompt_must_contain: Vec<&'static str>,
    prompt_must_not_contain: Vec<&'static str>,
}

fn golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            name: "recommendation_migraine",
            id: PromptId::Recommendation,
            value: "편두통",
            prompt_must_contain: vec![
                "For a patient with 편두통,",
                "Work pattern: [number] minutes work, [number] minutes rest",
                "Three tips in bullet points",
                "- Drink water regularly",
            ],
            prompt_must_not_contain: vec!["{subject}", "TODO"],
        },
        GoldenCase {
            name: "recommendation_free_text_subject",
            id: PromptId::Recommendation,
            value: "오래 앉아 있으면 허리가 아픔",
            prompt_must_contain: vec!["For a patient with 오래 앉아 있으면 허리가 아픔,"],
            prompt_must_not_contain: vec!["{subject}"],
        },
        GoldenCase {
            name: "recommendation_english_subject",
            id: PromptId::Recommendation,
            value: "dry eye",
            prompt_must_contain: vec!["For a patient with dry eye,", "No disclaimers."],
            prompt_must_not_contain: vec!["{subject}"],
        },
        GoldenCase {
            name: "medication_info_tylenol",
            id: PromptId::MedicationInfo,
            value: "타이레놀",
            prompt_must_contain: vec![
                "'타이레놀'",
                "분류:",
                "효능:",
                "복용법:",
                "주의사항:",
                "부작용:",
            ],
            prompt_must_not_contain: vec!["{name}", "TODO"],
        },
        GoldenCase {
            name: "medication_info_latin_name",
            id: PromptId::MedicationInfo,
            value: "Metformin",
            prompt_must_contain: vec!["'Metformin'"],
            prompt_must_not_contain: vec!["{name}"],
        },
    ]
}

#[test]
fn golden_prompts_render_without_unresolved_vars() {
    for case in &golden_cases() {
        let rendered = case.id.render(case.value);

        for needle in &case.prompt_must_contain {
            assert!(
                rendered.contains(needle),
                "[{}] rendered prompt missing '{}'\n---\n{}",
                case.name,
                needle,
                rendered
            );
        }

        for needle in &case.prompt_must_not_contain {
            assert!(
                !rendered.contains(needle),
                "[{}] rendered prompt unexpectedly contains '{}'",
                case.name,
                needle
            );
        }
    }
}

#[test]
fn golden_set_covers_every_prompt() {
    let cases = golden_cases();
    for id in [PromptId::Recommendation, PromptId::MedicationInfo] {
        assert!(
            cases.iter().any(|case| case.id == id),
            "no golden case for {id:?}"
        );
    }
}

#[test]
fn medication_prompt_lists_labels_in_tagger_order() {
    let labels = ["분류:", "효능:", "복용법:", "주의사항:", "부작용:"];
    let positions: Vec<usize> = labels
        .iter()
        .map(|label| {
            prompt::MEDICATION_INFO_PROMPT
                .find(label)
                .unwrap_or_else(|| panic!("missing {label}"))
        })
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn helpers_match_prompt_ids() {
    assert_eq!(
        prompt::recommendation_prompt("고혈압"),
        PromptId::Recommendation.render("고혈압")
    );
    assert_eq!(
        prompt::medication_info_prompt("아스피린"),
        PromptId::MedicationInfo.render("아스피린")
    );
}
