use std::collections::HashMap;

use super::{SEPARATOR, frames::HeadingFrame};

/// Mints disambiguated block keys.
///
/// Holds the three counter maps of a parse: occurrences of top-level heading
/// titles, occurrences of nested titles per parent, and the sequential
/// sub-block counter per parent. None of them reset during a parse.
///
/// Every minting method takes a `taken` predicate over already emitted keys;
/// a candidate that collides with an existing key is skipped by bumping the
/// counter that produced it.
#[derive(Debug, Default)]
pub struct KeyBuilder {
    top_level_titles: HashMap<String, usize>,
    nested_titles: HashMap<(String, String), usize>,
    sub_blocks: HashMap<String, usize>,
}

/// Key and disambiguated title of a new heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintedHeading {
    pub title: String,
    pub key: String,
}

impl KeyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys a heading of `level` titled `title` under `parent`.
    ///
    /// Without a parent the key is `level` separators plus the title, and
    /// repeated titles get a `[n]` suffix. Under a parent the key is the
    /// parent key, one separator per level of depth, and the title; repeated
    /// titles under the same parent get a `#{n}` suffix.
    pub fn heading(
        &mut self,
        parent: Option<&HeadingFrame>,
        level: u8,
        title: &str,
        taken: impl Fn(&str) -> bool,
    ) -> MintedHeading {
        match parent {
            None => {
                let prefix = separators(usize::from(level));
                let count = self.top_level_titles.entry(title.to_string()).or_insert(0);
                loop {
                    *count += 1;
                    let title = if *count > 1 {
                        format!("{title}[{count}]")
                    } else {
                        title.to_string()
                    };
                    let key = format!("{prefix}{title}");
                    if !taken(&key) {
                        return MintedHeading { title, key };
                    }
                }
            }
            Some(parent) => {
                let depth = usize::from(level.saturating_sub(parent.level).max(1));
                let prefix = format!("{}{}", parent.key, separators(depth));
                let count = self
                    .nested_titles
                    .entry((parent.key.clone(), title.to_string()))
                    .or_insert(0);
                loop {
                    *count += 1;
                    let title = if *count > 1 {
                        format!("{title}{SEPARATOR}{{{count}}}")
                    } else {
                        title.to_string()
                    };
                    let key = format!("{prefix}{title}");
                    if !taken(&key) {
                        return MintedHeading { title, key };
                    }
                }
            }
        }
    }

    /// Keys the next numbered sub-block under `parent_key` (`""` for the root).
    pub fn sub_block(&mut self, parent_key: &str, taken: impl Fn(&str) -> bool) -> String {
        let count = self.sub_blocks.entry(parent_key.to_string()).or_insert(0);
        loop {
            *count += 1;
            let key = format!("{parent_key}{SEPARATOR}{{{count}}}");
            if !taken(&key) {
                return key;
            }
        }
    }

    /// Keys a list item by its `word_len` longest words.
    ///
    /// Falls back to a numbered sub-block when the item has no words left
    /// after its checkbox is removed. A label already used under the same
    /// parent gets a `#{n}` suffix starting at 2.
    pub fn list_item_label(
        &mut self,
        parent_key: &str,
        text: &str,
        word_len: usize,
        taken: impl Fn(&str) -> bool,
    ) -> String {
        let label = longest_words_label(strip_checkbox(text), word_len);
        if label.is_empty() {
            return self.sub_block(parent_key, taken);
        }
        let key = format!("{parent_key}{SEPARATOR}{label}");
        if !taken(&key) {
            return key;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{key}{SEPARATOR}{{{n}}}");
            if !taken(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

fn separators(count: usize) -> String {
    std::iter::repeat_n(SEPARATOR, count).collect()
}

/// Removes a leading `[ ]`, `[x]` or `[X]` checkbox.
pub fn strip_checkbox(text: &str) -> &str {
    ["[ ]", "[x]", "[X]"]
        .iter()
        .find_map(|marker| text.strip_prefix(marker))
        .map_or(text, str::trim_start)
}

/// Joins the `limit` longest words of `text` in their original order.
///
/// Equal lengths rank by first occurrence.
pub fn longest_words_label(text: &str, limit: usize) -> String {
    let mut ranked: Vec<(usize, &str)> = text.split_whitespace().enumerate().collect();
    ranked.sort_by(|a, b| b.1.chars().count().cmp(&a.1.chars().count()));
    ranked.truncate(limit);
    ranked.sort_by_key(|(position, _)| *position);
    ranked
        .into_iter()
        .map(|(_, word)| word)
        .collect::<Vec<_>>()
        .join(" ")
}
