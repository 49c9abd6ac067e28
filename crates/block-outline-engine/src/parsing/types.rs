use std::collections::{BTreeMap, HashMap};

use serde::{Serialize, Serializer, ser::SerializeMap};

use super::SEPARATOR;

/// The structural category of an outline block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BlockKind {
    /// The reserved span between the leading `---` delimiters.
    Frontmatter,
    /// An ATX heading and everything nested under it.
    Heading {
        /// Number of `#` characters (1-6).
        level: u8,
    },
    /// A zero-indentation list item plus its indented continuation lines.
    ListItem,
    /// A run of plain content (including fenced code) under a heading or the root.
    ContentRun,
}

/// An inclusive `[start, end]` line range in the caller's numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockRange {
    pub start: usize,
    pub end: usize,
}

impl BlockRange {
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of lines covered.
    #[must_use]
    pub fn len(self) -> usize {
        self.end + 1 - self.start
    }

    /// Always false: a range covers at least one line.
    #[must_use]
    pub fn is_empty(self) -> bool {
        false
    }

    #[must_use]
    pub fn contains(self, other: BlockRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    #[must_use]
    pub fn contains_line(self, line: usize) -> bool {
        (self.start..=self.end).contains(&line)
    }
}

impl Serialize for BlockRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.start, self.end).serialize(serializer)
    }
}

impl From<(usize, usize)> for BlockRange {
    fn from((start, end): (usize, usize)) -> Self {
        Self { start, end }
    }
}

/// A keyed, resolved outline entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub key: String,
    pub kind: BlockKind,
    pub range: BlockRange,
}

/// Blocks in the order their keys were first minted.
///
/// Serializes as a map of `key -> [start, end]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blocks {
    entries: Vec<Block>,
    index: HashMap<String, usize>,
}

impl Blocks {
    pub(crate) fn from_entries(entries: Vec<Block>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, b)| (b.key.clone(), i))
            .collect();
        Self { entries, index }
    }

    pub fn get(&self, key: &str) -> Option<&Block> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    pub fn range(&self, key: &str) -> Option<BlockRange> {
        self.get(key).map(|b| b.range)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|b| b.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sorted key -> range view, convenient for diffing two parses.
    pub fn to_map(&self) -> BTreeMap<String, BlockRange> {
        self.entries
            .iter()
            .map(|b| (b.key.clone(), b.range))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Blocks {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for Blocks {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for block in &self.entries {
            map.serialize_entry(&block.key, &block.range)?;
        }
        map.end()
    }
}

/// Line numbers of unchecked task items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IncompleteTasks {
    /// Every `[ ]` task line, at any indentation.
    pub all: Vec<usize>,
    /// `[ ]` task lines with no leading whitespace.
    pub top: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tasks {
    /// `None` when the document has no unchecked tasks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incomplete: Option<IncompleteTasks>,
}

/// Result of parsing one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Outline {
    pub blocks: Blocks,
    pub task_lines: Vec<usize>,
    pub tasks: Tasks,
    pub codeblock_ranges: Vec<BlockRange>,
}

impl Outline {
    /// Blocks nested below `key`, in document order.
    ///
    /// Nesting is read from the key itself: a descendant's key is the parent's
    /// key followed by the separator. The root content key `#` is treated as
    /// having no descendants.
    pub fn children<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Block> + 'a {
        self.blocks.iter().filter(move |b| {
            key != super::ROOT_KEY
                && b.key.len() > key.len()
                && b.key.starts_with(key)
                && b.key[key.len()..].starts_with(SEPARATOR)
        })
    }

    /// The source lines covered by `key`, joined with `\n`.
    ///
    /// `source` and `start_index` must be the ones the outline was parsed with.
    pub fn block_text(&self, source: &str, start_index: usize, key: &str) -> Option<String> {
        let range = self.blocks.range(key)?;
        let first = range.start.checked_sub(start_index)?;
        let count = range.len();
        Some(
            source
                .split('\n')
                .skip(first)
                .take(count)
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }
}
