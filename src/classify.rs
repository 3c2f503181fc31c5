// Classification and ranking.
//
// Bands come from fixed cut points, status and priority labels are mapped
// onto a small closed set of classes regardless of the language or spelling
// they arrive in, and leaderboards are ranked with a stable sort so equal
// scores keep their input order.
use crate::types::Counts;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

pub const GOOD_THRESHOLD: f64 = 75.0;
pub const FAIR_THRESHOLD: f64 = 50.0;

/// Coarse qualitative classification of a 0–100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Band {
    Good,
    Fair,
    Poor,
    NotApplicable,
}

impl Band {
    /// `None` and non-finite scores are `NotApplicable`.
    pub fn for_score(score: Option<f64>) -> Band {
        match score {
            Some(s) if s.is_finite() => {
                if s >= GOOD_THRESHOLD {
                    Band::Good
                } else if s >= FAIR_THRESHOLD {
                    Band::Fair
                } else {
                    Band::Poor
                }
            }
            _ => Band::NotApplicable,
        }
    }
}

/// Semantic colour of a cell or bar; the backend decides the actual paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Tone {
    Positive,
    Info,
    Negative,
    Warning,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StatusClass {
    Completed,
    InProgress,
    Delayed,
    Started,
    Other,
}

static STATUS_ALIASES: Lazy<HashMap<&'static str, StatusClass>> = Lazy::new(|| {
    use StatusClass::*;
    HashMap::from([
        ("completed", Completed),
        ("complete", Completed),
        ("done", Completed),
        ("finished", Completed),
        ("closed", Completed),
        ("zakończone", Completed),
        ("zakonczone", Completed),
        ("ukończone", Completed),
        ("in progress", InProgress),
        ("inprogress", InProgress),
        ("ongoing", InProgress),
        ("w toku", InProgress),
        ("w trakcie", InProgress),
        ("delayed", Delayed),
        ("overdue", Delayed),
        ("late", Delayed),
        ("opóźnione", Delayed),
        ("opoznione", Delayed),
        ("started", Started),
        ("rozpoczęte", Started),
        ("rozpoczete", Started),
    ])
});

impl StatusClass {
    /// Classify a status label, long-form or short code, in any supported
    /// language: `"Completed"`, `"DONE"` and `"Zakończone"` are the same.
    pub fn of(status: &str) -> StatusClass {
        STATUS_ALIASES
            .get(normalize_label(status).as_str())
            .copied()
            .unwrap_or(StatusClass::Other)
    }

    fn position(self) -> usize {
        match self {
            StatusClass::Completed => 0,
            StatusClass::InProgress => 1,
            StatusClass::Delayed => 2,
            StatusClass::Started => 3,
            StatusClass::Other => 4,
        }
    }

    pub fn tone(self) -> Option<Tone> {
        match self {
            StatusClass::Completed => Some(Tone::Positive),
            StatusClass::InProgress => Some(Tone::Info),
            StatusClass::Delayed => Some(Tone::Negative),
            StatusClass::Started => Some(Tone::Warning),
            StatusClass::Other => None,
        }
    }
}

/// Tone of a task's status cell. Completed and in-progress win over the
/// delayed flag; the flag wins over a started status.
pub fn task_status_tone(status: &str, delayed: bool) -> Option<Tone> {
    match StatusClass::of(status) {
        c @ (StatusClass::Completed | StatusClass::InProgress) => c.tone(),
        _ if delayed => Some(Tone::Negative),
        c => c.tone(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PriorityClass {
    Critical,
    High,
    Medium,
    Low,
    Other,
}

static PRIORITY_ALIASES: Lazy<HashMap<&'static str, PriorityClass>> = Lazy::new(|| {
    use PriorityClass::*;
    HashMap::from([
        ("critical", Critical),
        ("urgent", Critical),
        ("krytyczny", Critical),
        ("pilny", Critical),
        ("high", High),
        ("wysoki", High),
        ("medium", Medium),
        ("normal", Medium),
        ("średni", Medium),
        ("sredni", Medium),
        ("normalny", Medium),
        ("low", Low),
        ("niski", Low),
    ])
});

impl PriorityClass {
    pub fn of(priority: &str) -> PriorityClass {
        PRIORITY_ALIASES
            .get(normalize_label(priority).as_str())
            .copied()
            .unwrap_or(PriorityClass::Other)
    }

    fn position(self) -> usize {
        match self {
            PriorityClass::Critical => 0,
            PriorityClass::High => 1,
            PriorityClass::Medium => 2,
            PriorityClass::Low => 3,
            PriorityClass::Other => 4,
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            PriorityClass::Critical => Tone::Negative,
            PriorityClass::High => Tone::Warning,
            PriorityClass::Medium => Tone::Info,
            PriorityClass::Low => Tone::Positive,
            PriorityClass::Other => Tone::Neutral,
        }
    }
}

fn normalize_label(label: &str) -> String {
    label
        .trim()
        .to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Status counts in canonical order: completed, in progress, delayed,
/// started, then anything unrecognized in first-seen order.
pub fn ordered_statuses(counts: &Counts) -> Vec<(&str, u64)> {
    order_by(counts, |label| StatusClass::of(label).position())
}

/// Priority counts in canonical order: critical, high, medium, low, then
/// anything unrecognized in first-seen order.
pub fn ordered_priorities(counts: &Counts) -> Vec<(&str, u64)> {
    order_by(counts, |label| PriorityClass::of(label).position())
}

fn order_by<F>(counts: &Counts, position: F) -> Vec<(&str, u64)>
where
    F: Fn(&str) -> usize,
{
    let mut entries: Vec<(&str, u64)> = counts.iter().collect();
    // Stable: labels sharing a class keep their first-seen order.
    entries.sort_by_key(|(label, _)| position(*label));
    entries
}

/// A record placed on a leaderboard.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry<'a, T> {
    pub record: &'a T,
    pub score: Option<f64>,
    pub rank: usize,
}

/// Rank records by score, highest first.
///
/// Ranks are 1-based and consecutive. Equal scores keep input order.
/// Records without a score (or with a non-finite one) follow every scored
/// record, still in input order.
pub fn rank_by<T, F>(records: &[T], score: F) -> Vec<RankedEntry<'_, T>>
where
    F: Fn(&T) -> Option<f64>,
{
    let mut scored: Vec<(&T, Option<f64>)> = records
        .iter()
        .map(|r| (r, score(r).filter(|s| s.is_finite())))
        .collect();
    scored.sort_by(|a, b| match (a.1, b.1) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    scored
        .into_iter()
        .enumerate()
        .map(|(idx, (record, score))| RankedEntry {
            record,
            score,
            rank: idx + 1,
        })
        .collect()
}
