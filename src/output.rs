// Rendering backends.
//
// A backend turns a `BlockTree` into bytes. Composition never touches this
// module; callers pick a backend and hand it the finished tree.
use crate::blocks::{Align, Bar, Block, BlockTree, Cell, Emphasis, Pair, Run, Table, Tag};
use crate::error::{BackendError, ReportError};
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tracing::info;

/// Width of a full bar in the text chart, in characters.
const BAR_WIDTH: usize = 40;

pub trait RenderBackend {
    /// File extension of the produced document, without the dot.
    fn extension(&self) -> &'static str;

    fn materialize(&self, tree: &BlockTree) -> Result<Vec<u8>, BackendError>;

    /// Materialize into `dest`, creating its parent directory first.
    ///
    /// The tree is rendered before the file is opened, so a backend failure
    /// leaves nothing behind. The file handle is closed on every path.
    fn materialize_to(&self, tree: &BlockTree, dest: &Path) -> Result<PathBuf, ReportError> {
        let bytes = self.materialize(tree)?;
        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ReportError::storage(parent, e))?;
        }
        let mut file = File::create(dest).map_err(|e| ReportError::storage(dest, e))?;
        file.write_all(&bytes)
            .and_then(|_| file.flush())
            .map_err(|e| ReportError::storage(dest, e))?;
        info!(path = %dest.display(), bytes = bytes.len(), "report written");
        Ok(dest.to_path_buf())
    }
}

/// Serializes the tree as pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBackend;

impl RenderBackend for JsonBackend {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn materialize(&self, tree: &BlockTree) -> Result<Vec<u8>, BackendError> {
        Ok(serde_json::to_vec_pretty(tree)?)
    }
}

/// Renders the tree as Markdown-flavoured plain text: tables through
/// `tabled`, bar charts as rows of `#`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextBackend {
    /// Append band/tone hints such as `[Good]` to tagged cells.
    pub show_tags: bool,
}

impl TextBackend {
    pub fn with_tags() -> Self {
        Self { show_tags: true }
    }

    pub fn render_string(&self, tree: &BlockTree) -> Result<String, BackendError> {
        let mut out = String::new();
        for block in tree.blocks() {
            self.write_block(&mut out, block, 1)?;
        }
        Ok(out)
    }

    fn write_block(&self, out: &mut String, block: &Block, depth: usize) -> Result<(), BackendError> {
        match block {
            Block::Title { text } => writeln!(out, "# {}\n", text)?,
            Block::Heading { text } => writeln!(out, "{} {}\n", "#".repeat(depth + 1), text)?,
            Block::Paragraph { runs } => writeln!(out, "{}\n", runs_to_string(runs))?,
            Block::KeyValueList { pairs } => {
                for Pair { key, value } in pairs {
                    writeln!(out, "- **{}:** {}", key, self.cell_text(value))?;
                }
                writeln!(out)?;
            }
            Block::Table(table) => writeln!(out, "{}\n", self.table_string(table))?,
            Block::BarChart { bars } => {
                for line in self.chart_lines(bars) {
                    writeln!(out, "{}", line)?;
                }
                writeln!(out)?;
            }
            Block::Section { heading, blocks } => {
                writeln!(out, "{} {}\n", "#".repeat(depth + 1), heading)?;
                for inner in blocks {
                    self.write_block(out, inner, depth + 1)?;
                }
            }
        }
        Ok(())
    }

    fn cell_text(&self, cell: &Cell) -> String {
        match (self.show_tags, cell.tag) {
            (true, Some(tag)) => format!("{} [{}]", cell.text, tag_name(tag)),
            _ => cell.text.clone(),
        }
    }

    fn table_string(&self, table: &Table) -> String {
        if table.rows.is_empty() {
            return "(no rows)".to_string();
        }
        let mut builder = Builder::default();
        builder.push_record(table.columns.iter().map(|c| c.header.clone()));
        for row in &table.rows {
            builder.push_record(row.iter().map(|cell| self.cell_text(cell)));
        }
        let mut rendered = builder.build();
        rendered.with(Style::markdown());
        for (idx, column) in table.columns.iter().enumerate() {
            let alignment = match column.align {
                Align::Left => Alignment::left(),
                Align::Center => Alignment::center(),
                Align::Right => Alignment::right(),
            };
            rendered.modify(Columns::single(idx), alignment);
        }
        rendered.to_string()
    }

    fn chart_lines(&self, bars: &[Bar]) -> Vec<String> {
        let label_width = bars.iter().map(|b| b.label.chars().count()).max().unwrap_or(0);
        bars.iter()
            .map(|bar| {
                let filled = ((bar.value.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
                let mut line = format!(
                    "{:<width$} | {:<bar_width$} {}",
                    bar.label,
                    "#".repeat(filled),
                    bar.caption,
                    width = label_width,
                    bar_width = BAR_WIDTH
                );
                if self.show_tags {
                    let _ = write!(line, " [{}]", tag_name(bar.tag));
                }
                line.trim_end().to_string()
            })
            .collect()
    }
}

impl RenderBackend for TextBackend {
    fn extension(&self) -> &'static str {
        "md"
    }

    fn materialize(&self, tree: &BlockTree) -> Result<Vec<u8>, BackendError> {
        Ok(self.render_string(tree)?.into_bytes())
    }
}

fn runs_to_string(runs: &[Run]) -> String {
    runs.iter()
        .map(|run| match run.emphasis {
            Emphasis::Normal => run.text.clone(),
            Emphasis::Bold => format!("**{}**", run.text),
            Emphasis::Italic => format!("_{}_", run.text),
        })
        .collect()
}

fn tag_name(tag: Tag) -> String {
    match tag {
        Tag::Band(band) => format!("{:?}", band),
        Tag::Tone(tone) => format!("{:?}", tone),
    }
}
