// Report parameters.
//
// Callers hand over a loose string-keyed bag (JSON object). It is validated
// once, here, into `ReportParams`; composers only ever see the typed form.
// Absent keys and JSON `null` fall back to defaults; a present key with a
// value that cannot be coerced is a `MalformedParameter`.
use crate::error::ReportError;
use crate::labels::Language;
use crate::types::Counts;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde_json::Value;
use tracing::{debug, warn};

/// The loose parameter bag accepted at the boundary.
pub type ParamBag = serde_json::Map<String, Value>;

pub const COMPLETED_PERCENTAGE: &str = "completedPercentage";
pub const DELAYED_COUNT: &str = "delayedCount";
pub const DATE_FROM: &str = "dateFrom";
pub const DATE_TO: &str = "dateTo";
pub const TASKS_BY_STATUS: &str = "tasksByStatus";
pub const TEAMS_WITH_TASKS_COUNT: &str = "teamsWithTasksCount";
pub const TOTAL_TEAMS_COUNT: &str = "totalTeamsCount";
pub const TOTAL_TASKS_COUNT: &str = "totalTasksCount";
pub const TOTAL_COMPLETED_TASKS_COUNT: &str = "totalCompletedTasksCount";
pub const OVERALL_COMPLETION_RATE: &str = "overallCompletionRate";
pub const LANGUAGE: &str = "language";
pub const GENERATED_AT: &str = "generatedAt";

const KNOWN_KEYS: [&str; 12] = [
    COMPLETED_PERCENTAGE,
    DELAYED_COUNT,
    DATE_FROM,
    DATE_TO,
    TASKS_BY_STATUS,
    TEAMS_WITH_TASKS_COUNT,
    TOTAL_TEAMS_COUNT,
    TOTAL_TASKS_COUNT,
    TOTAL_COMPLETED_TASKS_COUNT,
    OVERALL_COMPLETION_RATE,
    LANGUAGE,
    GENERATED_AT,
];

/// Reporting period, shown only when both ends are known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportParams {
    pub completed_percentage: Option<u8>,
    pub delayed_count: Option<u64>,
    pub period: Option<Period>,
    pub tasks_by_status: Counts,
    pub teams_with_tasks_count: Option<u64>,
    pub total_teams_count: Option<u64>,
    pub total_tasks_count: Option<u64>,
    pub total_completed_tasks_count: Option<u64>,
    pub overall_completion_rate: Option<f64>,
    pub language: Language,
    pub generated_at: NaiveDateTime,
}

impl ReportParams {
    /// Defaults for every option, stamped with `generated_at`.
    pub fn at(generated_at: NaiveDateTime) -> Self {
        Self {
            completed_percentage: None,
            delayed_count: None,
            period: None,
            tasks_by_status: Counts::new(),
            teams_with_tasks_count: None,
            total_teams_count: None,
            total_tasks_count: None,
            total_completed_tasks_count: None,
            overall_completion_rate: None,
            language: Language::default(),
            generated_at,
        }
    }

    /// Validate a bag, stamping the current local time when it carries no
    /// `generatedAt`.
    pub fn from_bag(bag: &ParamBag) -> Result<Self, ReportError> {
        Self::from_bag_at(bag, Local::now().naive_local())
    }

    /// Validate a bag, using `now` when it carries no `generatedAt`.
    pub fn from_bag_at(bag: &ParamBag, now: NaiveDateTime) -> Result<Self, ReportError> {
        for key in bag.keys() {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                debug!(key = %key, "ignoring unrecognized report parameter");
            }
        }

        let completed_percentage = match lookup(bag, COMPLETED_PERCENTAGE) {
            Some(v) => {
                let pct = coerce_u64(COMPLETED_PERCENTAGE, v, "an integer between 0 and 100")?;
                if pct > 100 {
                    return Err(ReportError::malformed(
                        COMPLETED_PERCENTAGE,
                        "an integer between 0 and 100",
                        pct,
                    ));
                }
                Some(pct as u8)
            }
            None => None,
        };

        let from = lookup(bag, DATE_FROM)
            .map(|v| coerce_display(DATE_FROM, v))
            .transpose()?;
        let to = lookup(bag, DATE_TO)
            .map(|v| coerce_display(DATE_TO, v))
            .transpose()?;
        let period = match (from, to) {
            (Some(from), Some(to)) => Some(Period { from, to }),
            _ => None,
        };

        let tasks_by_status = match lookup(bag, TASKS_BY_STATUS) {
            Some(v) => coerce_counts(TASKS_BY_STATUS, v)?,
            None => Counts::new(),
        };

        let language = match lookup(bag, LANGUAGE) {
            Some(Value::String(tag)) => Language::from_tag(tag).unwrap_or_else(|| {
                warn!(tag = %tag, "unknown report language, falling back to English");
                Language::English
            }),
            Some(other) => return Err(ReportError::malformed(LANGUAGE, "a language tag", other)),
            None => Language::default(),
        };

        let generated_at = match lookup(bag, GENERATED_AT) {
            Some(v) => coerce_timestamp(GENERATED_AT, v)?,
            None => now,
        };

        Ok(Self {
            completed_percentage,
            delayed_count: optional_u64(bag, DELAYED_COUNT)?,
            period,
            tasks_by_status,
            teams_with_tasks_count: optional_u64(bag, TEAMS_WITH_TASKS_COUNT)?,
            total_teams_count: optional_u64(bag, TOTAL_TEAMS_COUNT)?,
            total_tasks_count: optional_u64(bag, TOTAL_TASKS_COUNT)?,
            total_completed_tasks_count: optional_u64(bag, TOTAL_COMPLETED_TASKS_COUNT)?,
            overall_completion_rate: lookup(bag, OVERALL_COMPLETION_RATE)
                .map(|v| coerce_f64(OVERALL_COMPLETION_RATE, v))
                .transpose()?,
            language,
            generated_at,
        })
    }

    pub fn with_completed_percentage(mut self, pct: u8) -> Self {
        self.completed_percentage = Some(pct.min(100));
        self
    }

    pub fn with_delayed_count(mut self, count: u64) -> Self {
        self.delayed_count = Some(count);
        self
    }

    pub fn with_period(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.period = Some(Period {
            from: from.into(),
            to: to.into(),
        });
        self
    }

    pub fn with_tasks_by_status(mut self, counts: Counts) -> Self {
        self.tasks_by_status = counts;
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }
}

fn lookup<'a>(bag: &'a ParamBag, key: &str) -> Option<&'a Value> {
    bag.get(key).filter(|v| !v.is_null())
}

fn optional_u64(bag: &ParamBag, key: &'static str) -> Result<Option<u64>, ReportError> {
    lookup(bag, key)
        .map(|v| coerce_u64(key, v, "a non-negative integer"))
        .transpose()
}

fn coerce_u64(key: &'static str, v: &Value, expected: &'static str) -> Result<u64, ReportError> {
    let parsed = match v {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ReportError::malformed(key, expected, v))
}

fn coerce_f64(key: &'static str, v: &Value) -> Result<f64, ReportError> {
    let parsed = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|f| f.is_finite())
        .ok_or_else(|| ReportError::malformed(key, "a number", v))
}

fn coerce_display(key: &'static str, v: &Value) -> Result<String, ReportError> {
    match v {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(ReportError::malformed(key, "a display string", v)),
    }
}

fn coerce_counts(key: &'static str, v: &Value) -> Result<Counts, ReportError> {
    let Value::Object(map) = v else {
        return Err(ReportError::malformed(key, "a map of status to count", v));
    };
    let mut counts = Counts::new();
    for (label, count) in map {
        if count.is_null() {
            continue;
        }
        counts.add(label, coerce_u64(key, count, "non-negative integer counts")?);
    }
    Ok(counts)
}

fn coerce_timestamp(key: &'static str, v: &Value) -> Result<NaiveDateTime, ReportError> {
    let Value::String(s) = v else {
        return Err(ReportError::malformed(key, "a timestamp string", v));
    };
    let s = s.trim();
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.naive_local())
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| ReportError::malformed(key, "a timestamp string", v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bag(v: Value) -> ParamBag {
        match v {
            Value::Object(map) => map,
            _ => panic!("test bag must be an object"),
        }
    }

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn empty_bag_yields_defaults() {
        let params = ReportParams::from_bag_at(&ParamBag::new(), noon()).unwrap();
        assert_eq!(params, ReportParams::at(noon()));
    }

    #[test]
    fn recognized_keys_are_coerced() {
        let params = ReportParams::from_bag_at(
            &bag(json!({
                "completedPercentage": "85",
                "delayedCount": 2,
                "dateFrom": "2024-01-01",
                "dateTo": "2024-01-31",
                "tasksByStatus": {"DONE": 3, "DELAYED": 1.0},
                "overallCompletionRate": 72.5,
                "language": "pl",
                "generatedAt": "2024-02-01 08:30:00",
                "somethingElse": [1, 2, 3]
            })),
            noon(),
        )
        .unwrap();
        assert_eq!(params.completed_percentage, Some(85));
        assert_eq!(params.delayed_count, Some(2));
        assert_eq!(params.period.as_ref().map(|p| p.to.as_str()), Some("2024-01-31"));
        assert_eq!(params.tasks_by_status.get("DELAYED"), Some(1));
        assert_eq!(params.overall_completion_rate, Some(72.5));
        assert_eq!(params.language, Language::Polish);
        assert_eq!(params.generated_at.format("%H:%M").to_string(), "08:30");
    }

    #[test]
    fn period_needs_both_bounds() {
        let params =
            ReportParams::from_bag_at(&bag(json!({"dateFrom": "2024-01-01"})), noon()).unwrap();
        assert_eq!(params.period, None);
    }

    #[test]
    fn null_counts_as_absent() {
        let params =
            ReportParams::from_bag_at(&bag(json!({"completedPercentage": null})), noon()).unwrap();
        assert_eq!(params.completed_percentage, None);
    }

    #[test]
    fn malformed_values_are_reported_with_their_key() {
        let cases = [
            json!({"completedPercentage": "most"}),
            json!({"completedPercentage": 140}),
            json!({"delayedCount": -1}),
            json!({"tasksByStatus": ["DONE"]}),
            json!({"tasksByStatus": {"DONE": "many"}}),
            json!({"overallCompletionRate": true}),
            json!({"dateFrom": {"y": 2024}}),
            json!({"generatedAt": "yesterday"}),
        ];
        for case in cases {
            let err = ReportParams::from_bag_at(&bag(case.clone()), noon()).unwrap_err();
            assert!(
                matches!(err, ReportError::MalformedParameter { .. }),
                "{case} gave {err:?}"
            );
        }
    }

    #[test]
    fn status_map_keeps_document_order() {
        let bag: ParamBag =
            serde_json::from_str(r#"{"tasksByStatus": {"Zeta": 1, "DONE": 2, "Alpha": 3}}"#).unwrap();
        let params = ReportParams::from_bag_at(&bag, noon()).unwrap();
        let labels: Vec<_> = params.tasks_by_status.iter().map(|(l, _)| l).collect();
        assert_eq!(labels, ["Zeta", "DONE", "Alpha"]);
    }

    #[test]
    fn unknown_language_falls_back_to_english() {
        let params = ReportParams::from_bag_at(&bag(json!({"language": "xx"})), noon()).unwrap();
        assert_eq!(params.language, Language::English);
    }
}
