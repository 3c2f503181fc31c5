use super::{
    band_cell, footer, pair, percent_cell, period_pair, priority_blocks, status_table,
    ReportComposer, ReportKind,
};
use crate::blocks::{Align, Bar, Block, BlockTree, Cell, Column, TableBuilder, Tag};
use crate::classify::{rank_by, task_status_tone, Band, Tone};
use crate::labels::Catalog;
use crate::metrics::{employee_has_tasks, employee_metrics, relative_to_max, EmployeeMetrics};
use crate::params::ReportParams;
use crate::types::{EmployeeLoad, TaskDetail};
use crate::util::{format_date, format_int, format_number};

/// Employee workload: hours per person, a ranking by hours and a detailed
/// section for every employee.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmployeeLoadReport;

impl ReportComposer for EmployeeLoadReport {
    type Record = EmployeeLoad;

    const KIND: ReportKind = ReportKind::EmployeeLoad;

    fn compose(&self, employees: &[EmployeeLoad], params: &ReportParams) -> BlockTree {
        let cat = params.language.catalog();
        let metrics: Vec<EmployeeMetrics> = employees.iter().map(employee_metrics).collect();

        let mut tree = BlockTree::new();
        tree.push(Block::title(cat.employee_title));
        if let Some(period) = period_pair(params, cat) {
            tree.push(Block::KeyValueList { pairs: vec![period] });
        }

        if !employees.is_empty() {
            tree.push(Block::heading(cat.workload_heading));
            tree.push(workload_table(employees, cat));
            tree.push(totals(employees, cat));
        }
        tree.push(Block::italic(cat.employee_legend));

        if let Some(chart) = workload_chart(employees, &metrics) {
            tree.push(Block::heading(cat.workload_chart));
            tree.push(chart);
        }

        if !employees.is_empty() {
            tree.push(Block::heading(cat.workload_ranking));
            tree.push(leaderboard(employees, &metrics, cat));
        }

        for (employee, m) in employees.iter().zip(&metrics) {
            tree.push(employee_section(employee, m, cat));
        }

        tree.push(footer(params, cat));
        tree
    }
}

fn fte_text(fte: Option<f64>, cat: &Catalog) -> String {
    fte.map(|f| format_number(f, 2))
        .unwrap_or_else(|| cat.not_specified.to_string())
}

fn workload_table(employees: &[EmployeeLoad], cat: &Catalog) -> Block {
    let mut table = TableBuilder::new(vec![
        Column::new(cat.employee, 3.0, Align::Left),
        Column::new(cat.task_count, 1.0, Align::Center),
        Column::new(cat.total_hours, 1.0, Align::Right),
        Column::new(cat.fte, 1.0, Align::Center),
    ]);
    for e in employees {
        table.row(vec![
            Cell::plain(e.employee_name()),
            Cell::plain(format_int(e.task_count())),
            Cell::plain(format_number(e.total_hours(), 2)),
            Cell::plain(fte_text(e.fte(), cat)),
        ]);
    }
    table.build()
}

fn totals(employees: &[EmployeeLoad], cat: &Catalog) -> Block {
    let tasks: u64 = employees.iter().map(|e| u64::from(e.task_count())).sum();
    let hours: f64 = employees.iter().map(EmployeeLoad::total_hours).sum();
    Block::KeyValueList {
        pairs: vec![pair(
            cat.total,
            Cell::plain(format!(
                "{} {}, {} {}",
                format_int(tasks),
                cat.tasks,
                format_number(hours, 2),
                cat.hours
            )),
        )],
    }
}

/// Hours relative to the heaviest load. Employees without tasks are left
/// out; `None` when nobody is left.
fn workload_chart(employees: &[EmployeeLoad], metrics: &[EmployeeMetrics]) -> Option<Block> {
    let with_tasks: Vec<(&EmployeeLoad, &EmployeeMetrics)> = employees
        .iter()
        .zip(metrics)
        .filter(|(_, m)| m.has_tasks)
        .collect();
    let max = with_tasks
        .iter()
        .map(|(e, _)| e.total_hours())
        .fold(0.0_f64, f64::max);
    let bars: Vec<Bar> = with_tasks
        .into_iter()
        .map(|(e, m)| Bar {
            label: e.employee_name().to_string(),
            value: relative_to_max(e.total_hours(), max),
            caption: format_number(e.total_hours(), 1),
            tag: Tag::Band(Band::for_score(m.completion_rate)),
        })
        .collect();
    (!bars.is_empty()).then_some(Block::BarChart { bars })
}

fn leaderboard(employees: &[EmployeeLoad], metrics: &[EmployeeMetrics], cat: &Catalog) -> Block {
    let rows: Vec<(&EmployeeLoad, &EmployeeMetrics)> = employees.iter().zip(metrics).collect();
    let ranked = rank_by(&rows, |(e, m)| m.has_tasks.then(|| e.total_hours()));

    let mut table = TableBuilder::new(vec![
        Column::new(cat.rank, 1.0, Align::Center),
        Column::new(cat.employee, 3.0, Align::Left),
        Column::new(cat.total_hours, 1.0, Align::Right),
        Column::new(cat.completion_rate, 1.0, Align::Center),
        Column::new(cat.band, 1.0, Align::Center),
    ]);
    for entry in ranked {
        let (employee, m) = *entry.record;
        let hours = match entry.score {
            Some(h) => Cell::plain(format_number(h, 1)),
            None => Cell::tagged(cat.not_applicable, Tag::Band(Band::NotApplicable)),
        };
        table.row(vec![
            Cell::plain(entry.rank.to_string()),
            Cell::plain(employee.employee_name()),
            hours,
            percent_cell(m.completion_rate, cat),
            band_cell(m.completion_rate, cat),
        ]);
    }
    table.build()
}

fn employee_section(employee: &EmployeeLoad, m: &EmployeeMetrics, cat: &Catalog) -> Block {
    let heading = employee.employee_name().to_string();
    if !employee_has_tasks(employee) {
        return Block::Section {
            heading,
            blocks: vec![Block::italic(cat.no_tasks_notice)],
        };
    }

    let delayed_tag = (m.delayed_tasks > 0).then_some(Tag::Tone(Tone::Negative));
    let mut blocks = vec![Block::KeyValueList {
        pairs: vec![
            pair(cat.employee_id, Cell::plain(employee.employee_id().to_string())),
            pair(cat.task_count, Cell::plain(format_int(employee.task_count()))),
            pair(cat.total_hours, Cell::plain(format_number(employee.total_hours(), 2))),
            pair(cat.fte, Cell::plain(fte_text(employee.fte(), cat))),
            pair(
                cat.hours_per_task,
                Cell::plain(
                    m.hours_per_task
                        .map(|h| format_number(h, 1))
                        .unwrap_or_else(|| cat.not_applicable.to_string()),
                ),
            ),
            pair(cat.completion_rate, percent_cell(m.completion_rate, cat)),
            pair(
                cat.delayed_tasks,
                Cell::with_tag(format_int(m.delayed_tasks), delayed_tag),
            ),
        ],
    }];

    blocks.extend(priority_blocks(&m.priority_counts, cat));

    if !m.status_counts.is_empty() {
        blocks.push(Block::heading(cat.tasks_by_status));
        blocks.push(status_table(&m.status_counts, cat));
    }

    if !employee.tasks().is_empty() {
        blocks.push(Block::heading(cat.task_details));
        blocks.push(task_details(employee.tasks(), cat));
    }

    Block::Section { heading, blocks }
}

fn task_details(tasks: &[TaskDetail], cat: &Catalog) -> Block {
    let date = |d: Option<chrono::NaiveDate>| {
        d.map(format_date).unwrap_or_else(|| cat.none.to_string())
    };
    let mut table = TableBuilder::new(vec![
        Column::new(cat.task_id, 1.0, Align::Center),
        Column::new(cat.task, 3.0, Align::Left),
        Column::new(cat.status, 2.0, Align::Center),
        Column::new(cat.priority, 1.0, Align::Center),
        Column::new(cat.start, 2.0, Align::Center),
        Column::new(cat.deadline, 2.0, Align::Center),
        Column::new(cat.completed, 2.0, Align::Center),
        Column::new(cat.estimated_hours, 1.0, Align::Right),
        Column::new(cat.delayed, 1.0, Align::Center),
    ]);
    for t in tasks {
        let delayed_tag = t.is_delayed().then_some(Tag::Tone(Tone::Negative));
        table.row(vec![
            Cell::plain(
                t.task_id()
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| cat.none.to_string()),
            ),
            Cell::plain(t.task_name()),
            Cell::with_tag(t.status(), task_status_tone(t.status(), t.is_delayed()).map(Tag::Tone)),
            Cell::plain(t.priority().unwrap_or(cat.none)),
            Cell::plain(date(t.start_date())),
            Cell::plain(date(t.deadline_date())),
            Cell::plain(date(t.completed_date())),
            Cell::plain(
                t.estimated_hours()
                    .map(|h| format_number(h, 1))
                    .unwrap_or_else(|| cat.none.to_string()),
            ),
            Cell::with_tag(cat.yes_no(t.is_delayed()), delayed_tag),
        ]);
    }
    table.build()
}
