//! Report composers and the composition contract.
//!
//! Each report kind implements [`ReportComposer`]: records and validated
//! parameters in, a [`BlockTree`] out. Composition is pure. It never mutates
//! its inputs, never fails, and returns the same tree for the same inputs.
//! [`ReportGenerator`] pairs a composer with a rendering backend and is the
//! entry point callers use.
use crate::blocks::{Align, Bar, Block, BlockTree, Cell, Column, Pair, TableBuilder, Tag};
use crate::classify::{ordered_priorities, ordered_statuses, Band, PriorityClass, StatusClass, Tone};
use crate::error::ReportError;
use crate::labels::Catalog;
use crate::metrics::distribution;
use crate::output::RenderBackend;
use crate::params::{ParamBag, ReportParams};
use crate::types::Counts;
use crate::util::{format_int, format_number, format_percent, format_timestamp};
use chrono::{Local, NaiveDateTime};
use std::path::{Path, PathBuf};
use tracing::debug;

pub mod construction;
pub mod employee;
pub mod team;

pub use construction::ConstructionProgressReport;
pub use employee::EmployeeLoadReport;
pub use team::TeamEfficiencyReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    ConstructionProgress,
    EmployeeLoad,
    TeamEfficiency,
}

impl ReportKind {
    /// Tag used for file names and storage subdirectories.
    pub fn slug(self) -> &'static str {
        match self {
            ReportKind::ConstructionProgress => "construction-progress",
            ReportKind::EmployeeLoad => "employee-load",
            ReportKind::TeamEfficiency => "team-efficiency",
        }
    }
}

pub trait ReportComposer {
    type Record;

    const KIND: ReportKind;

    fn compose(&self, records: &[Self::Record], params: &ReportParams) -> BlockTree;
}

/// A composer bound to the backend that materializes its output.
///
/// Bag-level calls stamp the footer with the bag's `generatedAt`, else with
/// the time pinned by [`ReportGenerator::at`], else with the local time of
/// the call. Only the first two make repeated calls identical.
#[derive(Debug, Clone, Default)]
pub struct ReportGenerator<C, B> {
    composer: C,
    backend: B,
    generated_at: Option<NaiveDateTime>,
}

impl<C, B> ReportGenerator<C, B>
where
    C: ReportComposer,
    B: RenderBackend,
{
    pub fn new(composer: C, backend: B) -> Self {
        Self {
            composer,
            backend,
            generated_at: None,
        }
    }

    /// Pin the generation time used when a bag carries no `generatedAt`.
    pub fn at(mut self, generated_at: NaiveDateTime) -> Self {
        self.generated_at = Some(generated_at);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Validate `bag` and compose the block tree.
    pub fn compose(&self, records: &[C::Record], bag: &ParamBag) -> Result<BlockTree, ReportError> {
        let now = self
            .generated_at
            .unwrap_or_else(|| Local::now().naive_local());
        let params = ReportParams::from_bag_at(bag, now)?;
        Ok(self.compose_with(records, &params))
    }

    pub fn compose_with(&self, records: &[C::Record], params: &ReportParams) -> BlockTree {
        let tree = self.composer.compose(records, params);
        debug!(
            kind = C::KIND.slug(),
            records = records.len(),
            blocks = tree.len(),
            "report composed"
        );
        tree
    }

    /// Compose and materialize into an in-memory document.
    pub fn render(&self, records: &[C::Record], bag: &ParamBag) -> Result<Vec<u8>, ReportError> {
        let tree = self.compose(records, bag)?;
        Ok(self.backend.materialize(&tree)?)
    }

    /// Compose and materialize into `path`, returning the written path.
    pub fn render_to_path(
        &self,
        records: &[C::Record],
        bag: &ParamBag,
        path: &Path,
    ) -> Result<PathBuf, ReportError> {
        let tree = self.compose(records, bag)?;
        self.backend.materialize_to(&tree, path)
    }
}

// ---------------------------------------------------------------------------
// Shared composition pieces
// ---------------------------------------------------------------------------

pub(crate) fn pair(key: &str, value: Cell) -> Pair {
    Pair {
        key: key.to_string(),
        value,
    }
}

pub(crate) fn period_pair(params: &ReportParams, cat: &Catalog) -> Option<Pair> {
    params.period.as_ref().map(|p| {
        pair(
            cat.period.trim_end_matches([':', ' ']),
            Cell::plain(format!("{}{}{}", p.from, cat.period_to, p.to)),
        )
    })
}

pub(crate) fn footer(params: &ReportParams, cat: &Catalog) -> Block {
    Block::italic(format!("{}{}", cat.generated, format_timestamp(params.generated_at)))
}

/// Score cell tagged with its band; "N/A" when undefined.
pub(crate) fn score_cell(score: Option<f64>, cat: &Catalog) -> Cell {
    let band = Band::for_score(score);
    match score {
        Some(s) if band != Band::NotApplicable => Cell::tagged(format_number(s, 1), Tag::Band(band)),
        _ => Cell::tagged(cat.not_applicable, Tag::Band(Band::NotApplicable)),
    }
}

pub(crate) fn band_cell(score: Option<f64>, cat: &Catalog) -> Cell {
    let band = Band::for_score(score);
    Cell::tagged(cat.band(band), Tag::Band(band))
}

pub(crate) fn percent_cell(pct: Option<f64>, cat: &Catalog) -> Cell {
    match pct {
        Some(p) => Cell::plain(format_percent(p)),
        None => Cell::plain(cat.not_applicable),
    }
}

pub(crate) fn count_cell(n: Option<u64>, cat: &Catalog) -> Cell {
    match n {
        Some(n) => Cell::plain(format_int(n)),
        None => Cell::plain(cat.none),
    }
}

/// Status breakdown table in canonical status order with one-decimal
/// percentages and a tone per recognized status.
pub(crate) fn status_table(counts: &Counts, cat: &Catalog) -> Block {
    let shares = distribution(&ordered_statuses(counts));
    let mut table = TableBuilder::new(vec![
        Column::new(cat.status, 2.0, Align::Left),
        Column::new(cat.count, 1.0, Align::Center),
        Column::new(cat.percent, 1.0, Align::Center),
    ]);
    for share in shares {
        let tone = StatusClass::of(&share.label).tone().unwrap_or(Tone::Neutral);
        table.row(vec![
            Cell::tagged(share.label, Tag::Tone(tone)),
            Cell::plain(format_int(share.count)),
            Cell::plain(format_percent(share.percent)),
        ]);
    }
    table.build()
}

/// Priority distribution: a bar chart scaled to the largest count, then a
/// percentage table. Empty when there is nothing to show.
pub(crate) fn priority_blocks(counts: &Counts, cat: &Catalog) -> Vec<Block> {
    if counts.is_empty() {
        return Vec::new();
    }
    let shares = distribution(&ordered_priorities(counts));
    let bars = shares
        .iter()
        .map(|share| Bar {
            label: share.label.clone(),
            value: share.relative,
            caption: format_int(share.count),
            tag: Tag::Tone(PriorityClass::of(&share.label).tone()),
        })
        .collect();
    let mut table = TableBuilder::new(vec![
        Column::new(cat.priority, 2.0, Align::Left),
        Column::new(cat.count, 1.0, Align::Center),
        Column::new(cat.percent, 1.0, Align::Center),
    ]);
    for share in &shares {
        table.row(vec![
            Cell::plain(share.label.clone()),
            Cell::plain(format_int(share.count)),
            Cell::plain(format_percent(share.percent)),
        ]);
    }
    vec![
        Block::heading(cat.tasks_by_priority),
        Block::BarChart { bars },
        table.build(),
    ]
}
