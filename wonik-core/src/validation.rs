//! Input validation and sanitizing for medication fields.
//!
//! Messages are the exact strings shown to the user.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Maximum medication name length, in characters.
pub const MAX_NAME_CHARS: usize = 50;

/// Maximum dosage length, in characters.
pub const MAX_DOSAGE_CHARS: usize = 20;

static NAME_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[가-힣ㄱ-ㅎㅏ-ㅣa-zA-Z0-9 \-.]+$").expect("Invalid name regex")
});

static DOSAGE_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+(?:\.[0-9]+)?\s*[a-zA-Zμ가-힣]*$").expect("Invalid dosage regex")
});

static TIME_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[01][0-9]|2[0-3]):[0-5][0-9]$").expect("Invalid time regex"));

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("Invalid script regex")
});

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex"));

/// Why a field was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Name missing or blank.
    #[error("약물 이름을 입력해주세요.")]
    NameMissing,
    /// Name longer than [`MAX_NAME_CHARS`].
    #[error("약물 이름은 50자 이하로 입력해주세요.")]
    NameTooLong,
    /// Name contains characters outside the allowed set.
    #[error("약물 이름에는 한글, 영문, 숫자, 공백, 하이픈, 마침표만 사용할 수 있습니다.")]
    NameCharacters,
    /// Dosage longer than [`MAX_DOSAGE_CHARS`].
    #[error("용량은 20자 이하로 입력해주세요.")]
    DosageTooLong,
    /// Dosage is not a number followed by an optional unit.
    #[error("올바른 용량 형식을 입력해주세요. (예: 5mg, 10정)")]
    DosageFormat,
    /// Time is not `HH:MM` on a 24-hour clock.
    #[error("올바른 시간 형식을 입력해주세요. (예: 08:30)")]
    TimeFormat,
}

/// Validate a medication name.
///
/// # Errors
/// Returns the first rule the name breaks.
pub fn validate_medication_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::NameMissing);
    }
    if trimmed.chars().count() > MAX_NAME_CHARS {
        return Err(ValidationError::NameTooLong);
    }
    if !NAME_CHARS.is_match(trimmed) {
        return Err(ValidationError::NameCharacters);
    }
    Ok(())
}

/// Validate an optional dosage. Blank is accepted.
///
/// # Errors
/// Returns [`ValidationError::DosageTooLong`] or [`ValidationError::DosageFormat`].
pub fn validate_dosage(dosage: &str) -> Result<(), ValidationError> {
    let trimmed = dosage.trim();
    if trimmed.is_empty() {
        return Ok(());
    }
    if trimmed.chars().count() > MAX_DOSAGE_CHARS {
        return Err(ValidationError::DosageTooLong);
    }
    if !DOSAGE_FORMAT.is_match(trimmed) {
        return Err(ValidationError::DosageFormat);
    }
    Ok(())
}

/// Validate an optional `HH:MM` time. Blank is accepted.
///
/// # Errors
/// Returns [`ValidationError::TimeFormat`].
pub fn validate_time(time: &str) -> Result<(), ValidationError> {
    let trimmed = time.trim();
    if trimmed.is_empty() || TIME_FORMAT.is_match(trimmed) {
        Ok(())
    } else {
        Err(ValidationError::TimeFormat)
    }
}

/// Strip script blocks, markup and the characters `< > & " '`.
#[must_use]
pub fn sanitize_input(input: &str) -> String {
    let without_scripts = SCRIPT_BLOCK.replace_all(input, "");
    let without_tags = HTML_TAG.replace_all(&without_scripts, "");
    without_tags
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '&' | '"' | '\''))
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_names() {
        for name in [
            "타이레놀",
            "아모잘탄",
            "Aspirin",
            "Vitamin-D3",
            "Co.Codamol",
            "비타민D3",
            "Omega-3",
            "CoQ10",
            "타이레놀 서방정",
            "a",
        ] {
            assert_eq!(validate_medication_name(name), Ok(()), "{name}");
        }
        assert_eq!(validate_medication_name(&"a".repeat(50)), Ok(()));
    }

    #[test]
    fn blank_names_are_missing() {
        assert_eq!(validate_medication_name(""), Err(ValidationError::NameMissing));
        assert_eq!(validate_medication_name("   "), Err(ValidationError::NameMissing));
        assert_eq!(
            ValidationError::NameMissing.to_string(),
            "약물 이름을 입력해주세요."
        );
    }

    #[test]
    fn long_names_rejected_by_character_count() {
        assert_eq!(
            validate_medication_name(&"a".repeat(51)),
            Err(ValidationError::NameTooLong)
        );
        // 50 Hangul syllables are 150 bytes but still within the limit.
        assert_eq!(validate_medication_name(&"약".repeat(50)), Ok(()));
    }

    #[test]
    fn special_characters_rejected() {
        assert_eq!(
            validate_medication_name("타이레놀@#$"),
            Err(ValidationError::NameCharacters)
        );
        assert_eq!(
            validate_medication_name("Aspirin%"),
            Err(ValidationError::NameCharacters)
        );
    }

    #[test]
    fn dosages() {
        for dosage in ["5mg", "10정", "2.5ml", "1캡슐", ""] {
            assert_eq!(validate_dosage(dosage), Ok(()), "{dosage}");
        }
        assert_eq!(validate_dosage("매우많이"), Err(ValidationError::DosageFormat));
        assert_eq!(
            validate_dosage(&"a".repeat(21)),
            Err(ValidationError::DosageTooLong)
        );
    }

    #[test]
    fn times() {
        for time in ["08:30", "23:59", "00:00", ""] {
            assert_eq!(validate_time(time), Ok(()), "{time}");
        }
        for time in ["25:00", "12:60", "8:30"] {
            assert_eq!(validate_time(time), Err(ValidationError::TimeFormat), "{time}");
        }
    }

    #[test]
    fn sanitize_strips_markup_and_specials() {
        assert_eq!(sanitize_input("<script>alert(\"xss\")</script>타이레놀"), "타이레놀");
        assert_eq!(sanitize_input("<b>볼드텍스트</b>"), "볼드텍스트");
        assert_eq!(sanitize_input("타이레놀<>&\"'"), "타이레놀");
        assert_eq!(sanitize_input("Aspirin & Co"), "Aspirin  Co");
        assert_eq!(sanitize_input("정상적인 약물명"), "정상적인 약물명");
        assert_eq!(sanitize_input("Vitamin-D3"), "Vitamin-D3");
    }
}
