use std::collections::HashMap;

use super::{
    ROOT_KEY,
    types::{Block, BlockKind, BlockRange, Blocks},
};

#[derive(Debug, Clone)]
struct PendingBlock {
    key: String,
    kind: BlockKind,
    start: usize,
    /// `None` until the token that closes the block is seen.
    end: Option<usize>,
}

/// Ranges keyed in minting order, possibly still open.
#[derive(Debug, Default)]
pub struct BlockTable {
    entries: Vec<PendingBlock>,
    index: HashMap<String, usize>,
}

impl BlockTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Starts a new open range at `start`. Reopens `key` if it already exists.
    pub fn open(&mut self, key: &str, kind: BlockKind, start: usize) {
        if self.reopen(key) {
            return;
        }
        self.index.insert(key.to_string(), self.entries.len());
        self.entries.push(PendingBlock {
            key: key.to_string(),
            kind,
            start,
            end: None,
        });
    }

    /// Clears the end of an existing range so it extends again; keeps its start.
    pub fn reopen(&mut self, key: &str) -> bool {
        match self.index.get(key) {
            Some(&i) => {
                self.entries[i].end = None;
                true
            }
            None => false,
        }
    }

    /// Ends `key` at `line` unless it is already closed.
    pub fn close(&mut self, key: &str, line: usize) {
        if let Some(&i) = self.index.get(key) {
            let entry = &mut self.entries[i];
            if entry.end.is_none() {
                entry.end = Some(line.max(entry.start));
            }
        }
    }

    /// Closes every range still open at `last_line` and freezes the table.
    pub fn resolve(self, last_line: usize) -> Blocks {
        let entries = self
            .entries
            .into_iter()
            .map(|p| Block {
                range: BlockRange::new(p.start, p.end.unwrap_or(last_line.max(p.start))),
                key: p.key,
                kind: p.kind,
            })
            .collect();
        Blocks::from_entries(entries)
    }
}

/// Tracks the single open list item and the single open content run.
///
/// A content run keyed by the root may stay open underneath a list item; any
/// other content run is closed before a list item opens.
#[derive(Debug, Default)]
pub struct RangeCloser {
    list_item: Option<String>,
    content_run: Option<String>,
}

impl RangeCloser {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when neither a list item nor a content run is open.
    pub fn is_idle(&self) -> bool {
        self.list_item.is_none() && self.content_run.is_none()
    }

    pub fn has_list_item(&self) -> bool {
        self.list_item.is_some()
    }

    pub fn has_content_run(&self) -> bool {
        self.content_run.is_some()
    }

    pub fn set_list_item(&mut self, key: String) {
        self.list_item = Some(key);
    }

    pub fn set_content_run(&mut self, key: String) {
        self.content_run = Some(key);
    }

    pub fn close_list_item(&mut self, table: &mut BlockTable, line: usize) {
        if let Some(key) = self.list_item.take() {
            table.close(&key, line);
        }
    }

    pub fn close_content_run(&mut self, table: &mut BlockTable, line: usize) {
        if let Some(key) = self.content_run.take() {
            table.close(&key, line);
        }
    }

    /// Closes the open content run unless it is the root run.
    pub fn close_nested_content_run(&mut self, table: &mut BlockTable, line: usize) {
        if self.content_run.as_deref() != Some(ROOT_KEY) {
            self.close_content_run(table, line);
        }
    }

    pub fn close_all(&mut self, table: &mut BlockTable, line: usize) {
        self.close_list_item(table, line);
        self.close_content_run(table, line);
    }
}
