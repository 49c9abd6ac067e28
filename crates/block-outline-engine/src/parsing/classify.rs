use std::sync::OnceLock;

use regex::Regex;

/// A recognized `#` heading line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingSig<'a> {
    /// Number of `#` characters (1-6).
    pub level: u8,
    /// Heading text with surrounding whitespace removed.
    pub title: &'a str,
}

/// A recognized zero-indentation list item line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItemSig<'a> {
    /// Item text after the marker.
    pub text: &'a str,
}

/// A line that looks like a `[ ]`/`[x]` checkbox item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSig {
    pub complete: bool,
}

/// Classification of a single line containing only local facts.
///
/// Produced without reference to surrounding lines; the builder combines it
/// with its current mode via [`LineClass::role`].
#[derive(Debug, Clone)]
pub struct LineClass<'a> {
    /// Zero-based position in the document.
    pub index: usize,
    /// Line number in the caller's numbering.
    pub number: usize,
    /// Line text without its trailing carriage return.
    pub text: &'a str,
    /// Number of leading whitespace bytes.
    pub indent: usize,
    pub is_blank: bool,
    /// Exactly `---` once trimmed.
    pub is_frontmatter_delimiter: bool,
    /// Starts with three backticks once trimmed.
    pub is_fence: bool,
    pub heading: Option<HeadingSig<'a>>,
    pub list_item: Option<ListItemSig<'a>>,
    pub task: Option<TaskSig>,
}

/// Scan state the role of a line depends on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanMode {
    pub frontmatter_seen: bool,
    pub in_frontmatter: bool,
    pub in_code_block: bool,
}

/// What a line means at its position in the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineRole<'c, 'a> {
    FrontmatterOpen,
    FrontmatterClose,
    FrontmatterBody,
    Fence,
    CodeBody,
    Blank,
    Heading(&'c HeadingSig<'a>),
    ListItem(&'c ListItemSig<'a>),
    /// Indented line that is neither heading nor blank.
    Indented,
    Content,
}

impl<'a> LineClass<'a> {
    /// Resolves the structural role of this line under `mode`.
    ///
    /// Frontmatter wins over everything, then fences, then code block bodies;
    /// headings and list items are only recognized outside code blocks.
    pub fn role<'c>(&'c self, mode: ScanMode) -> LineRole<'c, 'a> {
        if self.is_frontmatter_delimiter {
            if mode.in_frontmatter {
                return LineRole::FrontmatterClose;
            }
            if self.index == 0 && !mode.frontmatter_seen {
                return LineRole::FrontmatterOpen;
            }
        }
        if mode.in_frontmatter {
            return LineRole::FrontmatterBody;
        }
        if self.is_fence {
            return LineRole::Fence;
        }
        if mode.in_code_block {
            return LineRole::CodeBody;
        }
        if self.is_blank {
            return LineRole::Blank;
        }
        if let Some(heading) = &self.heading {
            return LineRole::Heading(heading);
        }
        if let Some(item) = &self.list_item {
            return LineRole::ListItem(item);
        }
        if self.indent > 0 {
            return LineRole::Indented;
        }
        LineRole::Content
    }
}

fn heading_regex() -> &'static Regex {
    static HEADING_REGEX: OnceLock<Regex> = OnceLock::new();
    HEADING_REGEX.get_or_init(|| Regex::new(r"^(#{1,6})\s+(.+)$").expect("Invalid heading regex"))
}

fn list_item_regex() -> &'static Regex {
    static LIST_ITEM_REGEX: OnceLock<Regex> = OnceLock::new();
    LIST_ITEM_REGEX
        .get_or_init(|| Regex::new(r"^(?:[-*]|\d+\.)\s+(.+)$").expect("Invalid list item regex"))
}

fn task_regex() -> &'static Regex {
    static TASK_REGEX: OnceLock<Regex> = OnceLock::new();
    TASK_REGEX
        .get_or_init(|| Regex::new(r"^(?:[-*]|\d+\.)\s+\[( |x|X)\]").expect("Invalid task regex"))
}

/// Classifies individual lines for the outline scan.
pub struct MarkdownLineClassifier;

impl MarkdownLineClassifier {
    pub const FRONTMATTER_DELIMITER: &'static str = "---";
    pub const FENCE: &'static str = "```";

    /// Classifies a line into a [`LineClass`] containing local facts.
    pub fn classify<'a>(&self, index: usize, number: usize, raw: &'a str) -> LineClass<'a> {
        let text = raw.strip_suffix('\r').unwrap_or(raw);
        let trimmed = text.trim();
        let indent = text.len() - text.trim_start().len();

        let heading = heading_regex().captures(trimmed).and_then(|caps| {
            let hashes = caps.get(1)?.as_str();
            let title = caps.get(2)?.as_str().trim();
            (!title.is_empty()).then_some(HeadingSig {
                level: hashes.len() as u8,
                title,
            })
        });

        let list_item = list_item_regex()
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim_end())
            .filter(|item| !item.is_empty())
            .map(|item| ListItemSig { text: item });

        let task = task_regex()
            .captures(trimmed)
            .and_then(|caps| caps.get(1))
            .map(|m| TaskSig {
                complete: m.as_str() != " ",
            });

        LineClass {
            index,
            number,
            text,
            indent,
            is_blank: trimmed.is_empty(),
            is_frontmatter_delimiter: trimmed == Self::FRONTMATTER_DELIMITER,
            is_fence: trimmed.starts_with(Self::FENCE),
            heading,
            list_item,
            task,
        }
    }
}
