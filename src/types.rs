// Input record types.
//
// Records are immutable once built: fields are private, read through
// accessors, and assembled with the `builder()` of each type. JSON input
// deserializes straight into these types (camelCase keys); CSV input goes
// through the flat row types in `loader`.
use chrono::NaiveDate;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Ordered label→count pairs (tasks by status, tasks by priority).
///
/// Keeps the order in which entries were supplied so unrecognized labels can
/// be listed in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counts(Vec<(String, u64)>);

impl Counts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` to `label`, appending the label if it is new.
    pub fn add(&mut self, label: &str, count: u64) {
        match self.0.iter_mut().find(|(l, _)| l == label) {
            Some((_, c)) => *c = c.saturating_add(count),
            None => self.0.push((label.to_string(), count)),
        }
    }

    pub fn with(mut self, label: &str, count: u64) -> Self {
        self.add(label, count);
        self
    }

    pub fn get(&self, label: &str) -> Option<u64> {
        self.0.iter().find(|(l, _)| l == label).map(|(_, c)| *c)
    }

    /// Sum of all counts, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.0.iter().fold(0u64, |acc, (_, c)| acc.saturating_add(*c))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(l, c)| (l.as_str(), *c))
    }
}

impl<'a> FromIterator<(&'a str, u64)> for Counts {
    fn from_iter<I: IntoIterator<Item = (&'a str, u64)>>(iter: I) -> Self {
        let mut counts = Counts::new();
        for (label, count) in iter {
            counts.add(label, count);
        }
        counts
    }
}

impl Serialize for Counts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, count) in &self.0 {
            map.serialize_entry(label, count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Counts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CountsVisitor;

        impl<'de> Visitor<'de> for CountsVisitor {
            type Value = Counts;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of labels to non-negative counts")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Counts, M::Error> {
                let mut counts = Counts::new();
                while let Some((label, count)) = access.next_entry::<String, u64>()? {
                    counts.add(&label, count);
                }
                Ok(counts)
            }

            fn visit_unit<E>(self) -> Result<Counts, E> {
                Ok(Counts::new())
            }
        }

        deserializer.deserialize_any(CountsVisitor)
    }
}

// ---------------------------------------------------------------------------
// Construction progress
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructionTask {
    #[serde(alias = "taskName")]
    name: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    planned_end: Option<NaiveDate>,
    #[serde(default)]
    actual_end: Option<NaiveDate>,
    #[serde(default, alias = "isDelayed")]
    delayed: bool,
    #[serde(default)]
    delay_in_days: Option<i64>,
    #[serde(default)]
    completion_percentage: Option<u8>,
}

impl ConstructionTask {
    pub fn builder(name: impl Into<String>, status: impl Into<String>) -> ConstructionTaskBuilder {
        ConstructionTaskBuilder {
            inner: ConstructionTask {
                name: name.into(),
                status: status.into(),
                planned_end: None,
                actual_end: None,
                delayed: false,
                delay_in_days: None,
                completion_percentage: None,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn planned_end(&self) -> Option<NaiveDate> {
        self.planned_end
    }

    pub fn actual_end(&self) -> Option<NaiveDate> {
        self.actual_end
    }

    pub fn is_delayed(&self) -> bool {
        self.delayed
    }

    pub fn delay_in_days(&self) -> Option<i64> {
        self.delay_in_days
    }

    /// Completion in percent, never above 100.
    pub fn completion_percentage(&self) -> Option<u8> {
        self.completion_percentage.map(|p| p.min(100))
    }
}

#[derive(Debug, Clone)]
pub struct ConstructionTaskBuilder {
    inner: ConstructionTask,
}

impl ConstructionTaskBuilder {
    pub fn planned_end(mut self, date: NaiveDate) -> Self {
        self.inner.planned_end = Some(date);
        self
    }

    pub fn actual_end(mut self, date: NaiveDate) -> Self {
        self.inner.actual_end = Some(date);
        self
    }

    pub fn delayed(mut self, delayed: bool) -> Self {
        self.inner.delayed = delayed;
        self
    }

    pub fn delay_in_days(mut self, days: i64) -> Self {
        self.inner.delay_in_days = Some(days);
        self
    }

    pub fn completion_percentage(mut self, pct: u8) -> Self {
        self.inner.completion_percentage = Some(pct.min(100));
        self
    }

    pub fn build(self) -> ConstructionTask {
        self.inner
    }
}

// ---------------------------------------------------------------------------
// Employee load
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetail {
    #[serde(default)]
    task_id: Option<i64>,
    #[serde(default)]
    task_name: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    start_date: Option<NaiveDate>,
    #[serde(default)]
    deadline_date: Option<NaiveDate>,
    #[serde(default)]
    completed_date: Option<NaiveDate>,
    #[serde(default)]
    estimated_hours: Option<f64>,
    #[serde(default, alias = "isDelayed")]
    delayed: bool,
}

impl TaskDetail {
    pub fn builder(task_name: impl Into<String>, status: impl Into<String>) -> TaskDetailBuilder {
        TaskDetailBuilder {
            inner: TaskDetail {
                task_id: None,
                task_name: task_name.into(),
                status: status.into(),
                priority: None,
                start_date: None,
                deadline_date: None,
                completed_date: None,
                estimated_hours: None,
                delayed: false,
            },
        }
    }

    pub fn task_id(&self) -> Option<i64> {
        self.task_id
    }

    pub fn task_name(&self) -> &str {
        &self.task_name
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn priority(&self) -> Option<&str> {
        self.priority.as_deref()
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn deadline_date(&self) -> Option<NaiveDate> {
        self.deadline_date
    }

    pub fn completed_date(&self) -> Option<NaiveDate> {
        self.completed_date
    }

    pub fn estimated_hours(&self) -> Option<f64> {
        self.estimated_hours
    }

    pub fn is_delayed(&self) -> bool {
        self.delayed
    }
}

#[derive(Debug, Clone)]
pub struct TaskDetailBuilder {
    inner: TaskDetail,
}

impl TaskDetailBuilder {
    pub fn task_id(mut self, id: i64) -> Self {
        self.inner.task_id = Some(id);
        self
    }

    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.inner.priority = Some(priority.into());
        self
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.inner.start_date = Some(date);
        self
    }

    pub fn deadline_date(mut self, date: NaiveDate) -> Self {
        self.inner.deadline_date = Some(date);
        self
    }

    pub fn completed_date(mut self, date: NaiveDate) -> Self {
        self.inner.completed_date = Some(date);
        self
    }

    pub fn estimated_hours(mut self, hours: f64) -> Self {
        self.inner.estimated_hours = Some(hours);
        self
    }

    pub fn delayed(mut self, delayed: bool) -> Self {
        self.inner.delayed = delayed;
        self
    }

    pub fn build(self) -> TaskDetail {
        self.inner
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeLoad {
    employee_id: i64,
    employee_name: String,
    #[serde(default)]
    task_count: u32,
    #[serde(default)]
    total_hours: f64,
    #[serde(default, alias = "fteEquivalent")]
    fte: Option<f64>,
    #[serde(default)]
    tasks: Vec<TaskDetail>,
    #[serde(default)]
    tasks_by_status: Counts,
}

impl EmployeeLoad {
    pub fn builder(employee_id: i64, employee_name: impl Into<String>) -> EmployeeLoadBuilder {
        EmployeeLoadBuilder {
            inner: EmployeeLoad {
                employee_id,
                employee_name: employee_name.into(),
                task_count: 0,
                total_hours: 0.0,
                fte: None,
                tasks: Vec::new(),
                tasks_by_status: Counts::new(),
            },
        }
    }

    pub fn employee_id(&self) -> i64 {
        self.employee_id
    }

    pub fn employee_name(&self) -> &str {
        &self.employee_name
    }

    pub fn task_count(&self) -> u32 {
        self.task_count
    }

    pub fn total_hours(&self) -> f64 {
        self.total_hours
    }

    pub fn fte(&self) -> Option<f64> {
        self.fte
    }

    pub fn tasks(&self) -> &[TaskDetail] {
        &self.tasks
    }

    pub fn tasks_by_status(&self) -> &Counts {
        &self.tasks_by_status
    }
}

#[derive(Debug, Clone)]
pub struct EmployeeLoadBuilder {
    inner: EmployeeLoad,
}

impl EmployeeLoadBuilder {
    pub fn task_count(mut self, count: u32) -> Self {
        self.inner.task_count = count;
        self
    }

    pub fn total_hours(mut self, hours: f64) -> Self {
        self.inner.total_hours = hours;
        self
    }

    pub fn fte(mut self, fte: f64) -> Self {
        self.inner.fte = Some(fte);
        self
    }

    pub fn task(mut self, task: TaskDetail) -> Self {
        self.inner.tasks.push(task);
        self
    }

    pub fn tasks_by_status(mut self, counts: Counts) -> Self {
        self.inner.tasks_by_status = counts;
        self
    }

    pub fn build(self) -> EmployeeLoad {
        self.inner
    }
}

// ---------------------------------------------------------------------------
// Team efficiency
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamEfficiency {
    team_name: String,
    #[serde(default)]
    total_tasks: Option<u64>,
    #[serde(default)]
    completed_tasks: Option<u64>,
    #[serde(default)]
    on_time_tasks: Option<u64>,
    #[serde(default)]
    delayed_tasks: Option<u64>,
    #[serde(default)]
    avg_delay_days: Option<f64>,
    #[serde(default)]
    active_members: Option<u32>,
    #[serde(default)]
    tasks_per_member: Option<f64>,
    #[serde(default)]
    tasks_by_priority: Counts,
    #[serde(default)]
    efficiency_score: Option<f64>,
    #[serde(default)]
    has_no_tasks: bool,
}

impl TeamEfficiency {
    pub fn builder(team_name: impl Into<String>) -> TeamEfficiencyBuilder {
        TeamEfficiencyBuilder {
            inner: TeamEfficiency {
                team_name: team_name.into(),
                total_tasks: None,
                completed_tasks: None,
                on_time_tasks: None,
                delayed_tasks: None,
                avg_delay_days: None,
                active_members: None,
                tasks_per_member: None,
                tasks_by_priority: Counts::new(),
                efficiency_score: None,
                has_no_tasks: false,
            },
        }
    }

    pub fn team_name(&self) -> &str {
        &self.team_name
    }

    pub fn total_tasks(&self) -> Option<u64> {
        self.total_tasks
    }

    pub fn completed_tasks(&self) -> Option<u64> {
        self.completed_tasks
    }

    pub fn on_time_tasks(&self) -> Option<u64> {
        self.on_time_tasks
    }

    pub fn delayed_tasks(&self) -> Option<u64> {
        self.delayed_tasks
    }

    pub fn avg_delay_days(&self) -> Option<f64> {
        self.avg_delay_days
    }

    pub fn active_members(&self) -> Option<u32> {
        self.active_members
    }

    pub fn tasks_per_member(&self) -> Option<f64> {
        self.tasks_per_member
    }

    pub fn tasks_by_priority(&self) -> &Counts {
        &self.tasks_by_priority
    }

    pub fn efficiency_score(&self) -> Option<f64> {
        self.efficiency_score
    }

    pub fn has_no_tasks_flag(&self) -> bool {
        self.has_no_tasks
    }
}

#[derive(Debug, Clone)]
pub struct TeamEfficiencyBuilder {
    inner: TeamEfficiency,
}

impl TeamEfficiencyBuilder {
    pub fn total_tasks(mut self, n: u64) -> Self {
        self.inner.total_tasks = Some(n);
        self
    }

    pub fn completed_tasks(mut self, n: u64) -> Self {
        self.inner.completed_tasks = Some(n);
        self
    }

    pub fn on_time_tasks(mut self, n: u64) -> Self {
        self.inner.on_time_tasks = Some(n);
        self
    }

    pub fn delayed_tasks(mut self, n: u64) -> Self {
        self.inner.delayed_tasks = Some(n);
        self
    }

    pub fn avg_delay_days(mut self, days: f64) -> Self {
        self.inner.avg_delay_days = Some(days);
        self
    }

    pub fn active_members(mut self, n: u32) -> Self {
        self.inner.active_members = Some(n);
        self
    }

    pub fn tasks_per_member(mut self, n: f64) -> Self {
        self.inner.tasks_per_member = Some(n);
        self
    }

    pub fn tasks_by_priority(mut self, counts: Counts) -> Self {
        self.inner.tasks_by_priority = counts;
        self
    }

    pub fn efficiency_score(mut self, score: f64) -> Self {
        self.inner.efficiency_score = Some(score);
        self
    }

    pub fn has_no_tasks(mut self, flag: bool) -> Self {
        self.inner.has_no_tasks = flag;
        self
    }

    pub fn build(self) -> TeamEfficiency {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_keep_first_seen_order_and_merge_duplicates() {
        let counts = Counts::new().with("Low", 2).with("High", 1).with("Low", 3);
        let seen: Vec<_> = counts.iter().collect();
        assert_eq!(seen, vec![("Low", 5), ("High", 1)]);
        assert_eq!(counts.total(), 6);
    }

    #[test]
    fn counts_saturate_instead_of_overflowing() {
        let counts = Counts::new().with("DONE", u64::MAX).with("DELAYED", 1).with("DONE", 5);
        assert_eq!(counts.get("DONE"), Some(u64::MAX));
        assert_eq!(counts.total(), u64::MAX);
    }

    #[test]
    fn counts_deserialize_in_document_order() {
        let counts: Counts = serde_json::from_str(r#"{"Zeta": 1, "Alpha": 2}"#).unwrap();
        let labels: Vec<_> = counts.iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn team_deserializes_from_camel_case_json() {
        let team: TeamEfficiency = serde_json::from_str(
            r#"{"teamName":"Alpha","totalTasks":10,"efficiencyScore":80.5,
                "tasksByPriority":{"High":3},"hasNoTasks":false}"#,
        )
        .unwrap();
        assert_eq!(team.team_name(), "Alpha");
        assert_eq!(team.total_tasks(), Some(10));
        assert_eq!(team.tasks_by_priority().get("High"), Some(3));
        assert_eq!(team.avg_delay_days(), None);
    }

    #[test]
    fn completion_percentage_is_capped_at_100() {
        let task = ConstructionTask::builder("Roof", "DONE")
            .completion_percentage(140)
            .build();
        assert_eq!(task.completion_percentage(), Some(100));
    }
}
