use super::{footer, pair, period_pair, status_table, ReportComposer, ReportKind};
use crate::blocks::{Align, Bar, Block, BlockTree, Cell, Column, TableBuilder, Tag};
use crate::classify::{rank_by, task_status_tone, Band, Tone};
use crate::labels::Catalog;
use crate::metrics::mean_delay_of_delayed;
use crate::params::ReportParams;
use crate::types::ConstructionTask;
use crate::util::{format_date, format_int, format_number};

/// Construction progress: overall completion, status breakdown, the task
/// register and an analysis of delayed tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstructionProgressReport;

impl ReportComposer for ConstructionProgressReport {
    type Record = ConstructionTask;

    const KIND: ReportKind = ReportKind::ConstructionProgress;

    fn compose(&self, tasks: &[ConstructionTask], params: &ReportParams) -> BlockTree {
        let cat = params.language.catalog();
        let mut tree = BlockTree::new();
        tree.push(Block::title(cat.construction_title));

        let mut pairs = Vec::new();
        if let Some(pct) = params.completed_percentage {
            pairs.push(pair(cat.completed_tasks, Cell::plain(format!("{}%", pct))));
        }
        if let Some(delayed) = params.delayed_count {
            let tag = (delayed > 0).then_some(Tag::Tone(Tone::Negative));
            pairs.push(pair(cat.delayed_tasks, Cell::with_tag(format_int(delayed), tag)));
        }
        pairs.extend(period_pair(params, cat));
        if !pairs.is_empty() {
            tree.push(Block::KeyValueList { pairs });
        }

        if !params.tasks_by_status.is_empty() {
            tree.push(Block::heading(cat.tasks_by_status));
            tree.push(status_table(&params.tasks_by_status, cat));
        }
        tree.push(Block::italic(cat.status_legend));

        if let Some(pct) = params.completed_percentage {
            tree.push(progress_section(pct, cat));
        }

        tree.push(Block::Section {
            heading: cat.task_register.to_string(),
            blocks: vec![task_register(tasks, cat)],
        });

        if tasks.iter().any(ConstructionTask::is_delayed) {
            tree.push(delayed_analysis(tasks, cat));
        }

        tree.push(footer(params, cat));
        tree
    }
}

fn progress_section(pct: u8, cat: &Catalog) -> Block {
    let value = f64::from(pct);
    Block::Section {
        heading: cat.progress_heading.to_string(),
        blocks: vec![
            Block::text(cat.progress_label),
            Block::BarChart {
                bars: vec![Bar {
                    label: cat.completed_tasks.to_string(),
                    value,
                    caption: format!("{}%", pct),
                    tag: Tag::Band(Band::for_score(Some(value))),
                }],
            },
        ],
    }
}

fn task_register(tasks: &[ConstructionTask], cat: &Catalog) -> Block {
    let mut table = TableBuilder::new(vec![
        Column::new(cat.task, 3.0, Align::Left),
        Column::new(cat.status, 2.0, Align::Center),
        Column::new(cat.planned_end, 2.0, Align::Center),
        Column::new(cat.actual_end, 2.0, Align::Center),
        Column::new(cat.delay_days, 1.0, Align::Center),
        Column::new(cat.completion_pct, 1.0, Align::Center),
    ]);
    for task in tasks {
        let status_tag = task_status_tone(task.status(), task.is_delayed()).map(Tag::Tone);
        let planned = task
            .planned_end()
            .map(format_date)
            .unwrap_or_else(|| cat.not_specified.to_string());
        let actual = task
            .actual_end()
            .map(format_date)
            .unwrap_or_else(|| cat.not_finished.to_string());
        let completion = task
            .completion_percentage()
            .map(|p| format!("{}%", p))
            .unwrap_or_else(|| cat.none.to_string());
        table.row(vec![
            Cell::plain(task.name()),
            Cell::with_tag(task.status(), status_tag),
            Cell::plain(planned),
            Cell::plain(actual),
            delay_cell(task, cat),
            Cell::plain(completion),
        ]);
    }
    table.build()
}

fn delay_cell(task: &ConstructionTask, cat: &Catalog) -> Cell {
    match task.delay_in_days() {
        Some(days) if task.is_delayed() && days > 0 => {
            Cell::tagged(format_int(days), Tag::Tone(Tone::Negative))
        }
        Some(days) => Cell::plain(format_int(days)),
        None => Cell::plain(cat.none),
    }
}

/// Delayed tasks, worst first, followed by their mean delay.
fn delayed_analysis(tasks: &[ConstructionTask], cat: &Catalog) -> Block {
    let delayed: Vec<&ConstructionTask> = tasks.iter().filter(|t| t.is_delayed()).collect();
    let ranked = rank_by(&delayed, |t| Some(t.delay_in_days().unwrap_or(0) as f64));

    let mut table = TableBuilder::new(vec![
        Column::new(cat.rank, 1.0, Align::Center),
        Column::new(cat.task, 3.0, Align::Left),
        Column::new(cat.planned_end, 2.0, Align::Center),
        Column::new(cat.delay_days, 1.0, Align::Center),
    ]);
    for entry in &ranked {
        let task = *entry.record;
        table.row(vec![
            Cell::plain(entry.rank.to_string()),
            Cell::plain(task.name()),
            Cell::plain(
                task.planned_end()
                    .map(format_date)
                    .unwrap_or_else(|| cat.not_specified.to_string()),
            ),
            delay_cell(task, cat),
        ]);
    }

    let mean = mean_delay_of_delayed(tasks);
    Block::Section {
        heading: cat.delayed_analysis.to_string(),
        blocks: vec![
            table.build(),
            Block::KeyValueList {
                pairs: vec![pair(
                    cat.average_delay,
                    Cell::plain(format!("{} {}", format_number(mean, 1), cat.days)),
                )],
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn params() -> ReportParams {
        let at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        ReportParams::at(at)
    }

    fn table_of(block: &Block) -> &crate::blocks::Table {
        match block {
            Block::Table(t) => t,
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn empty_input_still_has_title_register_and_footer() {
        let tree = ConstructionProgressReport.compose(&[], &params());
        let blocks = tree.blocks();
        assert_eq!(blocks[0], Block::title("Construction Progress Report"));
        assert!(matches!(blocks.last(), Some(Block::Paragraph { .. })));
        assert!(!tree.walk().iter().any(|b| matches!(b, Block::BarChart { .. })));
        let register = tree
            .walk()
            .into_iter()
            .find_map(|b| match b {
                Block::Table(t) => Some(t),
                _ => None,
            })
            .unwrap();
        assert!(register.rows.is_empty());
    }

    #[test]
    fn delayed_analysis_ranks_worst_first() {
        let tasks = vec![
            ConstructionTask::builder("Roof", "DELAYED").delayed(true).delay_in_days(3).build(),
            ConstructionTask::builder("Walls", "DONE").build(),
            ConstructionTask::builder("Floor", "DELAYED").delayed(true).delay_in_days(9).build(),
        ];
        let block = delayed_analysis(&tasks, &crate::labels::ENGLISH);
        let Block::Section { blocks, .. } = block else {
            panic!("expected section");
        };
        let table = table_of(&blocks[0]);
        assert_eq!(table.rows[0][1].text, "Floor");
        assert_eq!(table.rows[1][1].text, "Roof");
        assert_eq!(table.rows[0][3].tag, Some(Tag::Tone(Tone::Negative)));
        let Block::KeyValueList { pairs } = &blocks[1] else {
            panic!("expected key values");
        };
        assert_eq!(pairs[0].value.text, "6.0 days");
    }

    #[test]
    fn missing_dates_use_placeholders() {
        let tasks = vec![ConstructionTask::builder("Survey", "STARTED").build()];
        let table = table_of(&task_register(&tasks, &crate::labels::ENGLISH)).clone();
        let row = &table.rows[0];
        assert_eq!(row[1].tag, Some(Tag::Tone(Tone::Warning)));
        assert_eq!(row[2].text, "Not specified");
        assert_eq!(row[3].text, "Not finished");
        assert_eq!(row[4].text, "-");
        assert_eq!(row[5].text, "-");
    }

    #[test]
    fn delayed_count_is_flagged_when_positive() {
        let tree = ConstructionProgressReport.compose(&[], &params().with_delayed_count(3));
        let Block::KeyValueList { pairs } = &tree.blocks()[1] else {
            panic!("expected summary key values");
        };
        assert_eq!(pairs[0].key, "Delayed tasks");
        assert_eq!(pairs[0].value.text, "3");
        assert_eq!(pairs[0].value.tag, Some(Tag::Tone(Tone::Negative)));

        let tree = ConstructionProgressReport.compose(&[], &params().with_delayed_count(0));
        let Block::KeyValueList { pairs } = &tree.blocks()[1] else {
            panic!("expected summary key values");
        };
        assert_eq!(pairs[0].value.tag, None);
    }

    #[test]
    fn progress_chart_only_with_percentage() {
        let tree = ConstructionProgressReport.compose(&[], &params().with_completed_percentage(0));
        let bar = tree
            .walk()
            .into_iter()
            .find_map(|b| match b {
                Block::BarChart { bars } => bars.first().cloned(),
                _ => None,
            })
            .unwrap();
        assert_eq!(bar.value, 0.0);
        assert_eq!(bar.caption, "0%");
        assert_eq!(bar.tag, Tag::Band(Band::Poor));
    }
}
