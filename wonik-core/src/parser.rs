//! Turns a free-form model answer into a [`RecommendationRecord`].
//!
//! Each field is extracted independently and anything the text does not
//! provide is filled from the offline knowledge base, so parsing is total:
//!
//! 1. **Pattern** — ordered [`DurationMatcher`]s; the first whose match holds
//!    two positive integers wins.
//! 2. **Schedule** — time-of-day lines mapped onto canned hints.
//! 3. **Tips** — bold `**Label:** text` spans, then bulleted or numbered
//!    lines, deduplicated by prefix and capped.
//! 4. **Backfill** — empty fields copied from [`lookup_recommendation`].

use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use tracing::debug;

use crate::knowledge::lookup_recommendation;
use crate::types::RecommendationRecord;

/// Default upper bound on extracted tips.
pub const MAX_TIPS: usize = 4;

/// Schedule hint for answers that talk about mornings or afternoons.
pub const SCHEDULE_FOCUS_MORNINGS: &str = "오전 집중 업무, 오후 가벼운 업무";

/// Schedule hint for answers that talk about lunch.
pub const SCHEDULE_STRICT_MEALS: &str = "식사 시간 엄격히 준수";

/// Candidates are compared on this many leading characters.
const DEDUP_PREFIX_CHARS: usize = 20;

const SCHEDULE_KEYWORDS: &[&str] = &["morning", "afternoon", "evening", "lunch", "오전", "오후", "점심"];
const CLOCK_MARKERS: &[&str] = &["AM", "PM", "시"];
const HALF_DAY_WORDS: &[&str] = &["morning", "afternoon", "오전", "오후"];
const MEAL_WORDS: &[&str] = &["lunch", "점심"];

// ---------------------------------------------------------------------------
// Duration matchers
// ---------------------------------------------------------------------------

/// One strategy for locating a work/rest span in free text.
#[derive(Debug)]
pub struct DurationMatcher {
    /// Short name used in logs.
    pub name: &'static str,
    regex: Regex,
}

impl DurationMatcher {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).expect("Invalid duration regex"),
        }
    }

    /// The first span of `text` this matcher recognises.
    #[must_use]
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex.find(text).map(|m| m.as_str())
    }
}

/// Matchers in the order they are tried.
pub static DURATION_MATCHERS: LazyLock<Vec<DurationMatcher>> = LazyLock::new(|| {
    vec![
        // "45 minutes work followed by 15 minutes rest", "90 minutes of focused work with 10-minute breaks"
        DurationMatcher::new(
            "minutes-work-then-rest",
            r"(?i)[0-9]+\s*(?:minutes?|mins?|분)\s*(?:of\s+)?(?:focused\s+)?(?:work|업무).*?[0-9]+[\s\-]*(?:minutes?|mins?|분)\s*(?:of\s+)?(?:rest|break|휴식)",
        ),
        // "50-min deep work, then a 10 min break"
        DurationMatcher::new(
            "loose-units",
            r"(?i)[0-9]+[\s\-]?(?:min|분).*?(?:work|업무).*?[0-9]+[\s\-]?(?:min|분).*?(?:rest|break|휴식)",
        ),
        // "Work pattern: work 45 minutes, rest 15 minutes"
        DurationMatcher::new(
            "keyword-first",
            r"(?i)work.*?[0-9]+\s*(?:minutes?|mins?).*?rest.*?[0-9]+\s*(?:minutes?|mins?)",
        ),
    ]
});

static INTEGER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").expect("Invalid integer regex"));

static BOLD_TIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^:*\n]+):\*\*[ \t]*([^*\n]+)").expect("Invalid bold tip regex"));

static BULLET_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[*\-•]|[0-9]+\.)\s+").expect("Invalid bullet regex"));

/// Render a work/rest pair the way the UI displays it.
#[must_use]
pub fn format_pattern(work_minutes: u32, rest_minutes: u32) -> String {
    format!("{work_minutes}분 업무 → {rest_minutes}분 휴식")
}

/// First two positive integers of the first matching span.
#[must_use]
pub fn extract_durations(text: &str) -> Option<(u32, u32)> {
    DURATION_MATCHERS.iter().find_map(|matcher| {
        let span = matcher.find(text)?;
        let mut numbers = INTEGER.find_iter(span).map(|m| m.as_str().parse::<u32>());
        match (numbers.next(), numbers.next()) {
            (Some(Ok(work)), Some(Ok(rest))) if work > 0 && rest > 0 => {
                debug!(matcher = matcher.name, work, rest, "Work/rest durations found");
                Some((work, rest))
            }
            _ => None,
        }
    })
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

fn mentions_any(line_lower: &str, words: &[&str]) -> bool {
    words.iter().any(|w| line_lower.contains(w))
}

/// Canned schedule hint for the most relevant time-of-day line, if any.
#[must_use]
pub fn extract_schedule(text: &str) -> Option<&'static str> {
    let candidates: Vec<&str> = text
        .lines()
        .filter(|line| mentions_any(&line.to_ascii_lowercase(), SCHEDULE_KEYWORDS))
        .collect();

    let line = candidates
        .iter()
        .find(|line| CLOCK_MARKERS.iter().any(|m| line.contains(m)))
        .or_else(|| candidates.first())?;

    let lower = line.to_ascii_lowercase();
    if mentions_any(&lower, HALF_DAY_WORDS) {
        Some(SCHEDULE_FOCUS_MORNINGS)
    } else if mentions_any(&lower, MEAL_WORDS) {
        Some(SCHEDULE_STRICT_MEALS)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Tips
// ---------------------------------------------------------------------------

fn mentions_pattern(candidate: &str) -> bool {
    let lower = candidate.to_ascii_lowercase();
    lower.contains("pattern") || lower.contains("work/rest") || candidate.contains("패턴")
}

/// Ordered, prefix-deduplicated tip list.
#[derive(Debug, Default)]
struct TipCollector {
    tips: Vec<String>,
}

impl TipCollector {
    fn offer(&mut self, candidate: String) {
        let prefix: String = candidate.chars().take(DEDUP_PREFIX_CHARS).collect();
        if self.tips.iter().any(|tip| tip.contains(&prefix)) {
            return;
        }
        self.tips.push(candidate);
    }
}

/// Bold spans first, then bullet lines; at most `max_tips` entries.
#[must_use]
pub fn extract_tips(text: &str, max_tips: usize) -> Vec<String> {
    let mut collector = TipCollector::default();

    for m in BOLD_TIP.find_iter(text) {
        let cleaned = m.as_str().replace("**", "").trim().to_string();
        if cleaned.chars().count() > 10 && !mentions_pattern(&cleaned) {
            collector.offer(cleaned);
        }
    }

    for line in text.lines() {
        let trimmed = line.trim();
        let Some(prefix) = BULLET_PREFIX.find(trimmed) else {
            continue;
        };
        let content = trimmed[prefix.end()..].replace("**", "").trim().to_string();
        if content.chars().count() > 20 && !mentions_pattern(&content) {
            collector.offer(content);
        }
    }

    let mut tips = collector.tips;
    tips.truncate(max_tips);
    tips
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Parse with the default tip cap.
#[must_use]
pub fn parse_recommendation(raw: &str, subject: &str) -> RecommendationRecord {
    parse_recommendation_with(raw, subject, MAX_TIPS)
}

/// Parse `raw` into a fully populated record for `subject`.
///
/// `max_tips` is clamped to `1..=MAX_TIPS`.
#[must_use]
pub fn parse_recommendation_with(raw: &str, subject: &str, max_tips: usize) -> RecommendationRecord {
    let max_tips = max_tips.clamp(1, MAX_TIPS);
    let pattern = extract_durations(raw)
        .map(|(work, rest)| format_pattern(work, rest))
        .unwrap_or_default();
    let schedule = extract_schedule(raw).map(str::to_string).unwrap_or_default();
    let tips = extract_tips(raw, max_tips);

    let mut record = RecommendationRecord {
        subject: subject.to_string(),
        pattern,
        schedule,
        tips,
        generated_at: Utc::now(),
    };

    if record.pattern.is_empty() || record.schedule.is_empty() || record.tips.is_empty() {
        let fallback = lookup_recommendation(subject);
        if record.pattern.is_empty() {
            debug!(subject, "No work/rest pattern in response, using offline value");
            record.pattern = fallback.pattern;
        }
        if record.schedule.is_empty() {
            record.schedule = fallback.schedule;
        }
        if record.tips.is_empty() {
            debug!(subject, "No tips in response, using offline values");
            record.tips = fallback.tips;
            record.tips.truncate(max_tips);
        }
    }

    debug!(
        subject,
        pattern = %record.pattern,
        schedule = %record.schedule,
        tips = record.tips.len(),
        "Parsed recommendation"
    );
    record
}
