//! # Outline Parsing
//!
//! Single-pass scan that turns a markdown document into a flat map of
//! hierarchical block keys to inclusive line ranges.
//!
//! ## Parsing Phases
//!
//! 1. **Line Classification** (`classify`): each line is reduced to a `LineClass`
//!    of local facts (blank, indentation, fence, heading, list item, task marker).
//!    The builder combines those facts with its scan mode to get a `LineRole`.
//!
//! 2. **Outline Construction** (`builder`): an `OutlineBuilder` keeps the heading
//!    frame stack, the open list item / content run, and the auxiliary trackers,
//!    and resolves every range when the document ends.
//!
//! ## Modules
//!
//! - **`types`**: output model (`Outline`, `Block`, `BlockKind`, `BlockRange`, `Tasks`)
//! - **`options`**: `ParseOptions` (start index, line-derived list keys)
//! - **`classify`**: `MarkdownLineClassifier`, `LineClass`, `LineRole`
//! - **`frames`**: `FrameStack` of open headings
//! - **`keys`**: `KeyBuilder` minting disambiguated block keys
//! - **`ranges`**: `BlockTable` of pending ranges and the `RangeCloser`
//! - **`trackers`**: task line and fence span accumulators
//! - **`builder`**: `OutlineBuilder` state machine
//!
//! ## Key Invariants
//!
//! - Every emitted range has `start <= end`
//! - Keys are unique within one outline
//! - A child block's range lies inside its parent's range
//! - Identical input and options give identical output

pub mod builder;
pub mod classify;
pub mod frames;
pub mod keys;
pub mod options;
pub mod ranges;
pub mod trackers;
pub mod types;

#[cfg(test)]
mod tests;

pub use builder::OutlineBuilder;
pub use classify::{LineClass, LineRole, MarkdownLineClassifier};
pub use options::ParseOptions;
pub use types::{Block, BlockKind, BlockRange, IncompleteTasks, Outline, Tasks};

/// Key of the content that appears before the first heading.
pub const ROOT_KEY: &str = "#";

/// Reserved key of the document-initial frontmatter span.
pub const FRONTMATTER_KEY: &str = "#---frontmatter---";

/// Character joining ancestor keys to their descendants.
pub const SEPARATOR: char = '#';

/// Parses `source` into its block outline.
///
/// Never fails: unterminated structures are closed at the last line.
pub fn parse_outline(source: &str, options: &ParseOptions) -> Outline {
    let classifier = MarkdownLineClassifier;
    let mut builder = OutlineBuilder::new(options);

    for (index, text) in source.split('\n').enumerate() {
        let lc = classifier.classify(index, index + options.start_index, text);
        builder.push(&lc);
    }

    let outline = builder.finish();
    log::trace!(
        "parsed outline: {} blocks, {} task lines, {} code blocks",
        outline.blocks.len(),
        outline.task_lines.len(),
        outline.codeblock_ranges.len()
    );
    outline
}
