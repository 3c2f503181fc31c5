// Metric derivation.
//
// Pure functions over borrowed records. Every rate is a percentage clamped to
// [0, 100] and is exactly 0 when its divisor is 0. A score that cannot be
// defined travels as `None` and is shown as "not applicable" downstream.
use crate::classify::StatusClass;
use crate::types::{ConstructionTask, Counts, EmployeeLoad, TeamEfficiency};
use crate::util::average;

/// `part / whole` as a percentage, 0 when `whole` is 0.
pub fn rate(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 * 100.0 / whole as f64).clamp(0.0, 100.0)
}

pub fn completion_rate(completed: u64, total: u64) -> f64 {
    rate(completed, total)
}

pub fn on_time_rate(on_time: u64, completed: u64) -> f64 {
    rate(on_time, completed)
}

/// Value relative to the largest value of a series, as 0–100.
pub fn relative_to_max(value: f64, max: f64) -> f64 {
    if !(max > 0.0) || !value.is_finite() {
        return 0.0;
    }
    (value * 100.0 / max).clamp(0.0, 100.0)
}

/// How a delay figure should be shown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Delay {
    Measured(f64),
    /// The owner has tasks but supplied no delay; counted as 0.
    NotRecorded,
    /// The owner has no tasks, so a delay means nothing.
    NotApplicable,
}

impl Delay {
    /// Numeric value used in aggregates.
    pub fn days(self) -> f64 {
        match self {
            Delay::Measured(d) => d,
            Delay::NotRecorded | Delay::NotApplicable => 0.0,
        }
    }
}

/// Mean delay over delayed construction tasks; absent delays count as 0 and
/// an empty set yields 0.
pub fn mean_delay_of_delayed(tasks: &[ConstructionTask]) -> f64 {
    let delays: Vec<f64> = tasks
        .iter()
        .filter(|t| t.is_delayed())
        .map(|t| t.delay_in_days().unwrap_or(0) as f64)
        .collect();
    average(&delays)
}

/// Derived figures for one team.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamMetrics {
    pub applicable: bool,
    pub completion_rate: Option<f64>,
    pub on_time_rate: Option<f64>,
    pub delay: Delay,
    pub efficiency: Option<f64>,
}

/// A team has no tasks when it says so or when its task total is 0.
pub fn team_has_no_tasks(team: &TeamEfficiency) -> bool {
    team.has_no_tasks_flag() || team.total_tasks() == Some(0)
}

/// Efficiency score in [0, 100], or `None` when the team has no tasks or no
/// usable score.
pub fn team_efficiency(team: &TeamEfficiency) -> Option<f64> {
    if team_has_no_tasks(team) {
        return None;
    }
    team.efficiency_score()
        .filter(|s| s.is_finite())
        .map(|s| s.clamp(0.0, 100.0))
}

pub fn team_metrics(team: &TeamEfficiency) -> TeamMetrics {
    let applicable = !team_has_no_tasks(team);
    if !applicable {
        return TeamMetrics {
            applicable,
            completion_rate: None,
            on_time_rate: None,
            delay: Delay::NotApplicable,
            efficiency: None,
        };
    }
    let completion_rate = match (team.completed_tasks(), team.total_tasks()) {
        (Some(done), Some(total)) => Some(completion_rate(done, total)),
        _ => None,
    };
    let on_time_rate = match (team.on_time_tasks(), team.completed_tasks()) {
        (Some(on_time), Some(done)) => Some(on_time_rate(on_time, done)),
        _ => None,
    };
    let delay = match team.avg_delay_days() {
        Some(d) if d.is_finite() => Delay::Measured(d),
        _ => Delay::NotRecorded,
    };
    TeamMetrics {
        applicable,
        completion_rate,
        on_time_rate,
        delay,
        efficiency: team_efficiency(team),
    }
}

/// Derived figures for one employee.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeMetrics {
    pub has_tasks: bool,
    pub completion_rate: Option<f64>,
    pub delayed_tasks: u64,
    pub hours_per_task: Option<f64>,
    pub status_counts: Counts,
    pub priority_counts: Counts,
}

pub fn employee_has_tasks(employee: &EmployeeLoad) -> bool {
    employee.task_count() > 0 || !employee.tasks().is_empty()
}

/// Status counts as supplied, or tallied from task details when the record
/// carries none.
pub fn employee_status_counts(employee: &EmployeeLoad) -> Counts {
    if !employee.tasks_by_status().is_empty() {
        return employee.tasks_by_status().clone();
    }
    employee.tasks().iter().map(|t| (t.status(), 1)).collect()
}

/// Priority counts tallied from task details that name a priority.
pub fn employee_priority_counts(employee: &EmployeeLoad) -> Counts {
    employee
        .tasks()
        .iter()
        .filter_map(|t| t.priority())
        .map(|p| (p, 1))
        .collect()
}

pub fn employee_metrics(employee: &EmployeeLoad) -> EmployeeMetrics {
    let has_tasks = employee_has_tasks(employee);
    let status_counts = employee_status_counts(employee);
    let priority_counts = employee_priority_counts(employee);

    let completion_rate = if has_tasks && !status_counts.is_empty() {
        let done = count_class(&status_counts, StatusClass::Completed);
        Some(completion_rate(done, status_counts.total()))
    } else {
        None
    };

    let delayed_tasks = if employee.tasks().is_empty() {
        count_class(&status_counts, StatusClass::Delayed)
    } else {
        employee.tasks().iter().filter(|t| t.is_delayed()).count() as u64
    };

    let hours_per_task = match employee.task_count() {
        0 => None,
        n => Some(employee.total_hours() / n as f64),
    };

    EmployeeMetrics {
        has_tasks,
        completion_rate,
        delayed_tasks,
        hours_per_task,
        status_counts,
        priority_counts,
    }
}

fn count_class(counts: &Counts, class: StatusClass) -> u64 {
    counts
        .iter()
        .filter(|(label, _)| StatusClass::of(label) == class)
        .fold(0u64, |acc, (_, c)| acc.saturating_add(c))
}

/// Share of each label in a distribution, as (label, count, percent,
/// percent of the largest count).
pub fn distribution(entries: &[(&str, u64)]) -> Vec<Share> {
    let total = entries.iter().fold(0u64, |acc, (_, c)| acc.saturating_add(*c));
    let max = entries.iter().map(|(_, c)| *c).max().unwrap_or(0);
    entries
        .iter()
        .map(|(label, count)| Share {
            label: label.to_string(),
            count: *count,
            percent: rate(*count, total),
            relative: relative_to_max(*count as f64, max as f64),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Share {
    pub label: String,
    pub count: u64,
    pub percent: f64,
    pub relative: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaskDetail;

    #[test]
    fn rates_guard_zero_divisor_and_clamp() {
        assert_eq!(completion_rate(5, 0), 0.0);
        assert_eq!(on_time_rate(0, 0), 0.0);
        assert_eq!(completion_rate(12, 10), 100.0);
        assert_eq!(completion_rate(3, 4), 75.0);
    }

    #[test]
    fn mean_delay_over_empty_subset_is_zero() {
        let tasks = vec![ConstructionTask::builder("A", "DONE").build()];
        assert_eq!(mean_delay_of_delayed(&tasks), 0.0);
    }

    #[test]
    fn mean_delay_counts_only_delayed_tasks() {
        let tasks = vec![
            ConstructionTask::builder("A", "DELAYED").delayed(true).delay_in_days(4).build(),
            ConstructionTask::builder("B", "DELAYED").delayed(true).build(),
            ConstructionTask::builder("C", "DONE").delay_in_days(30).build(),
        ];
        assert_eq!(mean_delay_of_delayed(&tasks), 2.0);
    }

    #[test]
    fn team_without_tasks_has_no_metrics() {
        let flagged = TeamEfficiency::builder("Idle")
            .has_no_tasks(true)
            .efficiency_score(90.0)
            .build();
        let zero = TeamEfficiency::builder("Zero").total_tasks(0).efficiency_score(10.0).build();
        for team in [&flagged, &zero] {
            let m = team_metrics(team);
            assert!(!m.applicable);
            assert_eq!(m.efficiency, None);
            assert_eq!(m.delay, Delay::NotApplicable);
        }
    }

    #[test]
    fn team_delay_absent_is_not_recorded() {
        let team = TeamEfficiency::builder("A").total_tasks(4).completed_tasks(2).build();
        let m = team_metrics(&team);
        assert_eq!(m.delay, Delay::NotRecorded);
        assert_eq!(m.delay.days(), 0.0);
        assert_eq!(m.completion_rate, Some(50.0));
        assert_eq!(m.on_time_rate, None);
    }

    #[test]
    fn employee_counts_fall_back_to_task_details() {
        let employee = EmployeeLoad::builder(1, "Ann")
            .task_count(3)
            .total_hours(30.0)
            .task(TaskDetail::builder("a", "DONE").priority("High").build())
            .task(TaskDetail::builder("b", "IN_PROGRESS").priority("Low").delayed(true).build())
            .task(TaskDetail::builder("c", "Completed").priority("High").build())
            .build();
        let m = employee_metrics(&employee);
        assert_eq!(m.status_counts.get("DONE"), Some(1));
        assert_eq!(m.priority_counts.get("High"), Some(2));
        assert_eq!(m.delayed_tasks, 1);
        assert_eq!(m.hours_per_task, Some(10.0));
        let rate = m.completion_rate.unwrap();
        assert!((rate - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn distribution_shares_and_relative_widths() {
        let shares = distribution(&[("High", 3), ("Low", 7)]);
        assert_eq!(shares[0].percent, 30.0);
        assert_eq!(shares[1].percent, 70.0);
        assert_eq!(shares[1].relative, 100.0);
        assert!((shares[0].relative - 300.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn distribution_of_huge_counts_stays_in_range() {
        let shares = distribution(&[("DONE", u64::MAX), ("DELAYED", 1)]);
        assert_eq!(shares[0].percent, 100.0);
        assert!(shares[1].percent >= 0.0 && shares[1].percent < 1e-9);
        assert_eq!(shares[0].relative, 100.0);
    }
}
