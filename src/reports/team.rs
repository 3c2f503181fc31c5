use super::{
    band_cell, count_cell, footer, pair, percent_cell, period_pair, priority_blocks, score_cell,
    ReportComposer, ReportKind,
};
use crate::blocks::{Align, Bar, Block, BlockTree, Cell, Column, Pair, TableBuilder, Tag};
use crate::classify::{rank_by, Band};
use crate::labels::Catalog;
use crate::metrics::{team_metrics, Delay, TeamMetrics};
use crate::params::ReportParams;
use crate::types::TeamEfficiency;
use crate::util::{format_int, format_number, format_percent};

/// Team efficiency: aggregate figures, a per-team summary, a ranking by
/// efficiency score and a performance section per team.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeamEfficiencyReport;

impl ReportComposer for TeamEfficiencyReport {
    type Record = TeamEfficiency;

    const KIND: ReportKind = ReportKind::TeamEfficiency;

    fn compose(&self, teams: &[TeamEfficiency], params: &ReportParams) -> BlockTree {
        let cat = params.language.catalog();
        let metrics: Vec<TeamMetrics> = teams.iter().map(team_metrics).collect();

        let mut tree = BlockTree::new();
        tree.push(Block::title(cat.team_title));

        let pairs = aggregates(params, cat);
        if !pairs.is_empty() {
            tree.push(Block::KeyValueList { pairs });
        }

        tree.push(Block::heading(cat.team_summary));
        tree.push(summary_table(teams, &metrics, cat));
        tree.push(Block::italic(cat.team_legend));

        if let Some(chart) = efficiency_chart(teams, &metrics) {
            tree.push(Block::heading(cat.efficiency_chart));
            tree.push(chart);
        }

        if !teams.is_empty() {
            tree.push(Block::heading(cat.efficiency_ranking));
            tree.push(leaderboard(teams, &metrics, cat));
            tree.push(Block::heading(cat.team_analysis));
            for (team, m) in teams.iter().zip(&metrics) {
                tree.push(team_section(team, m, cat));
            }
        }

        tree.push(footer(params, cat));
        tree
    }
}

fn aggregates(params: &ReportParams, cat: &Catalog) -> Vec<Pair> {
    let mut pairs: Vec<Pair> = period_pair(params, cat).into_iter().collect();
    if let Some(with) = params.teams_with_tasks_count {
        let value = match params.total_teams_count {
            Some(total) => format!("{} / {}", format_int(with), format_int(total)),
            None => format_int(with),
        };
        pairs.push(pair(cat.teams_with_tasks, Cell::plain(value)));
    }
    if let Some(total) = params.total_tasks_count {
        pairs.push(pair(cat.total_tasks, Cell::plain(format_int(total))));
    }
    if let Some(done) = params.total_completed_tasks_count {
        pairs.push(pair(cat.total_completed, Cell::plain(format_int(done))));
    }
    if let Some(rate) = params.overall_completion_rate {
        pairs.push(pair(
            cat.overall_completion,
            Cell::with_tag(format_percent(rate), Some(Tag::Band(Band::for_score(Some(rate))))),
        ));
    }
    pairs
}

fn delay_text(delay: Delay, cat: &Catalog) -> String {
    match delay {
        Delay::Measured(days) => format_number(days, 1),
        Delay::NotRecorded => cat.none.to_string(),
        Delay::NotApplicable => cat.not_applicable.to_string(),
    }
}

fn summary_table(teams: &[TeamEfficiency], metrics: &[TeamMetrics], cat: &Catalog) -> Block {
    let mut table = TableBuilder::new(vec![
        Column::new(cat.team, 3.0, Align::Left),
        Column::new(cat.total_tasks, 1.0, Align::Center),
        Column::new(cat.completed, 1.0, Align::Center),
        Column::new(cat.on_time, 1.0, Align::Center),
        Column::new(cat.delayed, 1.0, Align::Center),
        Column::new(cat.avg_delay_days, 1.0, Align::Center),
        Column::new(cat.members, 1.0, Align::Center),
        Column::new(cat.tasks_per_member, 1.0, Align::Center),
    ]);
    for (team, m) in teams.iter().zip(metrics) {
        let name = Cell::plain(team.team_name());
        if !m.applicable {
            let na = || Cell::tagged(cat.not_applicable, Tag::Band(Band::NotApplicable));
            let mut row = vec![name];
            row.extend((0..7).map(|_| na()));
            table.row(row);
            continue;
        }
        table.row(vec![
            name,
            count_cell(team.total_tasks(), cat),
            count_cell(team.completed_tasks(), cat),
            count_cell(team.on_time_tasks(), cat),
            count_cell(team.delayed_tasks(), cat),
            Cell::plain(delay_text(m.delay, cat)),
            count_cell(team.active_members().map(u64::from), cat),
            Cell::plain(
                team.tasks_per_member()
                    .map(|n| format_number(n, 1))
                    .unwrap_or_else(|| cat.none.to_string()),
            ),
        ]);
    }
    table.build()
}

/// Bars for teams with a defined score; `None` when no team has one.
fn efficiency_chart(teams: &[TeamEfficiency], metrics: &[TeamMetrics]) -> Option<Block> {
    let bars: Vec<Bar> = teams
        .iter()
        .zip(metrics)
        .filter_map(|(team, m)| {
            m.efficiency.map(|score| Bar {
                label: team.team_name().to_string(),
                value: score,
                caption: format_number(score, 1),
                tag: Tag::Band(Band::for_score(Some(score))),
            })
        })
        .collect();
    (!bars.is_empty()).then_some(Block::BarChart { bars })
}

fn leaderboard(teams: &[TeamEfficiency], metrics: &[TeamMetrics], cat: &Catalog) -> Block {
    let rows: Vec<(&TeamEfficiency, &TeamMetrics)> = teams.iter().zip(metrics).collect();
    let ranked = rank_by(&rows, |(_, m)| m.efficiency);

    let mut table = TableBuilder::new(vec![
        Column::new(cat.rank, 1.0, Align::Center),
        Column::new(cat.team, 3.0, Align::Left),
        Column::new(cat.efficiency_score, 1.0, Align::Center),
        Column::new(cat.band, 1.0, Align::Center),
    ]);
    for entry in ranked {
        let (team, _) = *entry.record;
        table.row(vec![
            Cell::plain(entry.rank.to_string()),
            Cell::plain(team.team_name()),
            score_cell(entry.score, cat),
            band_cell(entry.score, cat),
        ]);
    }
    table.build()
}

fn team_section(team: &TeamEfficiency, m: &TeamMetrics, cat: &Catalog) -> Block {
    let heading = team.team_name().to_string();
    if !m.applicable {
        return Block::Section {
            heading,
            blocks: vec![Block::italic(cat.no_tasks_notice)],
        };
    }

    let delay = match m.delay {
        Delay::Measured(days) => format!("{} {}", format_number(days, 1), cat.days),
        other => delay_text(other, cat),
    };
    let mut blocks = vec![Block::KeyValueList {
        pairs: vec![
            pair(cat.completion_rate, percent_cell(m.completion_rate, cat)),
            pair(cat.on_time_rate, percent_cell(m.on_time_rate, cat)),
            pair(cat.avg_delay_days, Cell::plain(delay)),
            pair(cat.efficiency_score, score_cell(m.efficiency, cat)),
            pair(cat.band, band_cell(m.efficiency, cat)),
        ],
    }];
    blocks.extend(priority_blocks(team.tasks_by_priority(), cat));
    Block::Section { heading, blocks }
}
