//! Offline knowledge base.
//!
//! Canned advice for common conditions and medications, used both to fill
//! gaps in a parsed model response and as the whole answer when the model
//! is unreachable. The tables are `const` data in a fixed order; lookups are
//! the only way in.
//!
//! ## Matching
//!
//! Input and keys are normalized (whitespace removed, ASCII lower-cased) and
//! an entry matches when either string contains the other. The first entry
//! in table order wins, so the order below is part of the contract: `"두통"`
//! resolves to `편두통` because that key contains it, and an empty name
//! resolves to the first entry.

use chrono::Utc;
use tracing::debug;

use crate::types::{MedicationInfoRecord, RecommendationRecord};

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

/// Canned recommendation without a timestamp.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationTemplate {
    /// Condition name written into the record.
    pub subject: &'static str,
    /// Work/rest rhythm.
    pub pattern: &'static str,
    /// Schedule hint.
    pub schedule: &'static str,
    /// Tips.
    pub tips: &'static [&'static str],
}

impl RecommendationTemplate {
    fn instantiate(&self, subject: &str) -> RecommendationRecord {
        RecommendationRecord {
            subject: subject.to_string(),
            pattern: self.pattern.to_string(),
            schedule: self.schedule.to_string(),
            tips: self.tips.iter().map(|t| (*t).to_string()).collect(),
            generated_at: Utc::now(),
        }
    }
}

/// Canned medication information without a timestamp.
#[derive(Debug, Clone, Copy)]
pub struct MedicationTemplate {
    /// Medication name written into the record.
    pub name: &'static str,
    /// Drug class.
    pub category: &'static str,
    /// Indications.
    pub effects: &'static str,
    /// How to take it.
    pub usage: &'static str,
    /// Precautions.
    pub warnings: &'static [&'static str],
    /// Side effects.
    pub side_effects: &'static [&'static str],
}

impl MedicationTemplate {
    fn instantiate(&self, name: &str) -> MedicationInfoRecord {
        MedicationInfoRecord {
            name: name.to_string(),
            category: self.category.to_string(),
            effects: self.effects.to_string(),
            usage: self.usage.to_string(),
            warnings: self.warnings.iter().map(|t| (*t).to_string()).collect(),
            side_effects: self.side_effects.iter().map(|t| (*t).to_string()).collect(),
            generated_at: Utc::now(),
        }
    }
}

/// A keyed entry of a knowledge table.
#[derive(Debug, Clone, Copy)]
pub struct KnownEntry<T> {
    /// Canonical condition or medication name.
    pub key: &'static str,
    /// Canned record.
    pub template: T,
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Condition table, in matching order.
pub const RECOMMENDATIONS: &[KnownEntry<RecommendationTemplate>] = &[
    KnownEntry {
        key: "편두통",
        template: RecommendationTemplate {
            subject: "편두통",
            pattern: "45분 업무 → 15분 휴식",
            schedule: "오전 집중 업무, 오후 가벼운 업무",
            tips: &[
                "화면 밝기를 낮추고 블루라이트 차단",
                "규칙적인 수분 섭취와 간식",
                "조용하고 어두운 환경 유지",
                "스트레스 유발 업무는 오전에 처리",
            ],
        },
    },
    KnownEntry {
        key: "목디스크",
        template: RecommendationTemplate {
            subject: "목디스크",
            pattern: "30분 업무 → 5분 스트레칭",
            schedule: "1시간마다 자세 변경 필수",
            tips: &[
                "모니터 높이를 눈높이에 맞춤",
                "목과 어깨 스트레칭 필수",
                "인체공학적 의자와 쿠션 사용",
                "전화통화 시 헤드셋 사용",
            ],
        },
    },
    KnownEntry {
        key: "허리디스크",
        template: RecommendationTemplate {
            subject: "허리디스크",
            pattern: "40분 업무 → 10분 기립/걷기",
            schedule: "앉기/서기 교대 근무",
            tips: &[
                "높이 조절 책상 사용 권장",
                "허리 받침대 필수 사용",
                "무거운 물건 들기 금지",
                "코어 근육 강화 운동",
            ],
        },
    },
    KnownEntry {
        key: "당뇨병",
        template: RecommendationTemplate {
            subject: "당뇨병",
            pattern: "50분 업무 → 10분 활동",
            schedule: "식사 시간 엄격히 준수",
            tips: &[
                "규칙적인 식사와 간식 시간",
                "혈당 체크 알림 설정",
                "스트레스 관리 명상/호흡",
                "당뇨 응급키트 항상 준비",
            ],
        },
    },
    KnownEntry {
        key: "고혈압",
        template: RecommendationTemplate {
            subject: "고혈압",
            pattern: "55분 업무 → 5분 휴식",
            schedule: "스트레스 높은 업무 분산",
            tips: &[
                "카페인 섭취 제한",
                "규칙적인 심호흡 운동",
                "짠 음식 피하기",
                "혈압 측정 정기 체크",
            ],
        },
    },
    KnownEntry {
        key: "안구건조증",
        template: RecommendationTemplate {
            subject: "안구건조증",
            pattern: "20분 화면 → 20초 먼 곳 보기",
            schedule: "20-20-20 규칙 준수",
            tips: &[
                "인공눈물 정기 점안",
                "실내 습도 40-60% 유지",
                "화면 거리 60cm 이상",
                "눈 깜빡임 의식적으로 하기",
            ],
        },
    },
    KnownEntry {
        key: "관절염",
        template: RecommendationTemplate {
            subject: "관절염",
            pattern: "45분 업무 → 10분 관절 운동",
            schedule: "오전 워밍업 후 업무 시작",
            tips: &[
                "관절 보호대 착용",
                "따뜻한 환경 유지",
                "반복 동작 최소화",
                "인체공학적 도구 사용",
            ],
        },
    },
];

/// Returned, renamed to the caller's subject, when no condition matches.
pub const DEFAULT_RECOMMENDATION: RecommendationTemplate = RecommendationTemplate {
    subject: "일반",
    pattern: "50분 업무 → 10분 휴식",
    schedule: "규칙적인 업무 패턴 유지",
    tips: &[
        "충분한 수분 섭취",
        "규칙적인 스트레칭",
        "적절한 실내 온도 유지",
        "스트레스 관리 필수",
    ],
};

/// Medication table, in matching order.
pub const MEDICATIONS: &[KnownEntry<MedicationTemplate>] = &[
    KnownEntry {
        key: "타이레놀",
        template: MedicationTemplate {
            name: "타이레놀",
            category: "해열진통제 (아세트아미노펜)",
            effects: "두통, 치통, 생리통 등 통증 완화 및 해열",
            usage: "1회 500~1000mg, 4~6시간 간격, 하루 4000mg 이하",
            warnings: &["음주 중 복용 금지", "간 질환자는 의사와 상담", "다른 아세트아미노펜 제제와 중복 복용 금지"],
            side_effects: &["드물게 발진", "과량 복용 시 간 손상"],
        },
    },
    KnownEntry {
        key: "아스피린",
        template: MedicationTemplate {
            name: "아스피린",
            category: "비스테로이드성 소염진통제 / 항혈소판제",
            effects: "통증 완화, 해열, 저용량 복용 시 혈전 예방",
            usage: "식후 충분한 물과 함께 복용",
            warnings: &["위궤양 병력이 있으면 복용 전 상담", "수술 전 복용 중단 여부 확인", "15세 미만 소아 복용 주의"],
            side_effects: &["속쓰림", "위장 출혈", "멍이 잘 듦"],
        },
    },
    KnownEntry {
        key: "이부프로펜",
        template: MedicationTemplate {
            name: "이부프로펜",
            category: "비스테로이드성 소염진통제",
            effects: "염증성 통증, 근육통, 발열 완화",
            usage: "1회 200~400mg, 식후 복용, 하루 1200mg 이하",
            warnings: &["공복 복용 피하기", "신장 질환자 주의", "다른 소염진통제와 병용 금지"],
            side_effects: &["소화불량", "위통", "부종"],
        },
    },
    KnownEntry {
        key: "아모잘탄",
        template: MedicationTemplate {
            name: "아모잘탄",
            category: "고혈압 복합제 (암로디핀/로살탄)",
            effects: "혈압 강하",
            usage: "하루 1회 같은 시간에 복용",
            warnings: &["임신 중 복용 금지", "갑작스러운 중단 금지", "자몽 주스 섭취 주의"],
            side_effects: &["어지러움", "발목 부종", "두통"],
        },
    },
    KnownEntry {
        key: "메트포르민",
        template: MedicationTemplate {
            name: "메트포르민",
            category: "경구 혈당강하제 (비구아나이드계)",
            effects: "제2형 당뇨병 혈당 조절",
            usage: "식사와 함께 또는 식후 복용",
            warnings: &["조영제 검사 전 의사와 상담", "과음 피하기", "신장 기능 정기 검사"],
            side_effects: &["설사", "메스꺼움", "금속성 입맛"],
        },
    },
    KnownEntry {
        key: "오메가3",
        template: MedicationTemplate {
            name: "오메가3",
            category: "건강기능식품 (지방산)",
            effects: "혈중 중성지방 개선, 혈행 개선",
            usage: "하루 1회 식후 복용",
            warnings: &["항응고제 복용 시 상담", "수술 전 복용 중단 고려"],
            side_effects: &["생선 냄새 트림", "소화불량"],
        },
    },
];

/// Returned, renamed to the caller's name, when no medication matches.
pub const DEFAULT_MEDICATION: MedicationTemplate = MedicationTemplate {
    name: "일반 의약품",
    category: "정보 없음",
    effects: "의사 또는 약사에게 효능을 확인하세요",
    usage: "처방전 또는 제품 설명서의 용법을 따르세요",
    warnings: &[
        "정해진 용량과 시간을 지켜 복용",
        "다른 약과 함께 복용 시 약사와 상담",
        "이상 반응 시 복용 중단 후 상담",
    ],
    side_effects: &["개인에 따라 다를 수 있음"],
};

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Remove all whitespace and ASCII lower-case the rest.
#[must_use]
pub fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// First entry (in table order) whose normalized key contains, or is
/// contained in, the normalized `name`.
#[must_use]
pub fn find_entry<'a, T>(table: &'a [KnownEntry<T>], name: &str) -> Option<&'a KnownEntry<T>> {
    let needle = normalize(name);
    table.iter().find(|entry| {
        let key = normalize(entry.key);
        needle.contains(&key) || key.contains(&needle)
    })
}

/// Canned recommendation for `subject`. Never fails.
#[must_use]
pub fn lookup_recommendation(subject: &str) -> RecommendationRecord {
    match find_entry(RECOMMENDATIONS, subject) {
        Some(entry) => {
            debug!(subject, key = entry.key, "Offline recommendation hit");
            entry.template.instantiate(entry.template.subject)
        }
        None => {
            debug!(subject, "No offline recommendation, using default");
            DEFAULT_RECOMMENDATION.instantiate(subject)
        }
    }
}

/// Canned medication information for `name`. Never fails.
#[must_use]
pub fn lookup_medication(name: &str) -> MedicationInfoRecord {
    match find_entry(MEDICATIONS, name) {
        Some(entry) => {
            debug!(name, key = entry.key, "Offline medication hit");
            entry.template.instantiate(entry.template.name)
        }
        None => {
            debug!(name, "No offline medication info, using default");
            DEFAULT_MEDICATION.instantiate(name)
        }
    }
}
