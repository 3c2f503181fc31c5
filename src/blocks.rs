//! Abstract presentation blocks.
//!
//! A `BlockTree` is an ordered list of blocks that describes what a report
//! contains and how it should read, with no notion of fonts, pages or paint.
//! Rendering backends walk it; composers only ever produce it.
use crate::classify::{Band, Tone};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Emphasis {
    Normal,
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Semantic colour hint attached to a cell or bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tag {
    Band(Band),
    Tone(Tone),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Run {
    pub text: String,
    pub emphasis: Emphasis,
}

impl Run {
    pub fn new(text: impl Into<String>, emphasis: Emphasis) -> Self {
        Self {
            text: text.into(),
            emphasis,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub text: String,
    pub tag: Option<Tag>,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tag: None,
        }
    }

    pub fn tagged(text: impl Into<String>, tag: Tag) -> Self {
        Self {
            text: text.into(),
            tag: Some(tag),
        }
    }

    pub fn with_tag(text: impl Into<String>, tag: Option<Tag>) -> Self {
        Self {
            text: text.into(),
            tag,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pair {
    pub key: String,
    pub value: Cell,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub header: String,
    /// Relative width; backends normalise across the table.
    pub weight: f32,
    pub align: Align,
}

impl Column {
    pub fn new(header: impl Into<String>, weight: f32, align: Align) -> Self {
        Self {
            header: header.into(),
            weight,
            align,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Cell>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    /// Bar length, 0–100.
    pub value: f64,
    /// Text printed next to the bar.
    pub caption: String,
    pub tag: Tag,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Title { text: String },
    Heading { text: String },
    Paragraph { runs: Vec<Run> },
    KeyValueList { pairs: Vec<Pair> },
    Table(Table),
    /// A chart in meaning; backends without charts draw it as a table.
    BarChart { bars: Vec<Bar> },
    Section { heading: String, blocks: Vec<Block> },
}

impl Block {
    pub fn title(text: impl Into<String>) -> Self {
        Block::Title { text: text.into() }
    }

    pub fn heading(text: impl Into<String>) -> Self {
        Block::Heading { text: text.into() }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Block::Paragraph {
            runs: vec![Run::new(text, Emphasis::Normal)],
        }
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Block::Paragraph {
            runs: vec![Run::new(text, Emphasis::Italic)],
        }
    }

    /// Bold label followed by a normal value on one line.
    pub fn labelled(label: impl Into<String>, value: impl Into<String>) -> Self {
        Block::Paragraph {
            runs: vec![
                Run::new(label, Emphasis::Bold),
                Run::new(value, Emphasis::Normal),
            ],
        }
    }
}

/// Ordered sequence of blocks making up one report.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BlockTree {
    blocks: Vec<Block>,
}

impl BlockTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Depth-first walk over every block, nested ones included.
    pub fn walk(&self) -> Vec<&Block> {
        fn visit<'a>(blocks: &'a [Block], out: &mut Vec<&'a Block>) {
            for block in blocks {
                out.push(block);
                if let Block::Section { blocks, .. } = block {
                    visit(blocks, out);
                }
            }
        }
        let mut out = Vec::new();
        visit(&self.blocks, &mut out);
        out
    }
}

/// Builder for table blocks with a fixed column set.
#[derive(Debug, Clone)]
pub struct TableBuilder {
    table: Table,
}

impl TableBuilder {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            table: Table {
                columns,
                rows: Vec::new(),
            },
        }
    }

    pub fn row(&mut self, cells: Vec<Cell>) -> &mut Self {
        debug_assert_eq!(cells.len(), self.table.columns.len());
        self.table.rows.push(cells);
        self
    }

    pub fn build(self) -> Block {
        Block::Table(self.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_descends_into_sections() {
        let mut tree = BlockTree::new();
        tree.push(Block::title("T"));
        tree.push(Block::Section {
            heading: "S".into(),
            blocks: vec![Block::text("inner")],
        });
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.walk().len(), 3);
    }

    #[test]
    fn blocks_serialize_with_kind_tag() {
        let json = serde_json::to_value(Block::title("Report")).unwrap();
        assert_eq!(json["kind"], "title");
        assert_eq!(json["text"], "Report");
    }
}
