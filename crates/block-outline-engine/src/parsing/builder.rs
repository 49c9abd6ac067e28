use super::{
    FRONTMATTER_KEY, ROOT_KEY,
    classify::{HeadingSig, LineClass, LineRole, ListItemSig, ScanMode},
    frames::{FrameStack, HeadingFrame},
    keys::KeyBuilder,
    options::ParseOptions,
    ranges::{BlockTable, RangeCloser},
    trackers::{FenceTracker, TaskTracker},
    types::{BlockKind, Outline},
};

/// Single-pass outline state machine.
///
/// Feed it every line of a document in order with [`push`](Self::push), then
/// call [`finish`](Self::finish) to close whatever is still open.
pub struct OutlineBuilder<'o> {
    options: &'o ParseOptions,
    mode: ScanMode,
    frames: FrameStack,
    keys: KeyBuilder,
    table: BlockTable,
    closer: RangeCloser,
    tasks: TaskTracker,
    fences: FenceTracker,
    last_line: Option<usize>,
}

impl<'o> OutlineBuilder<'o> {
    pub fn new(options: &'o ParseOptions) -> Self {
        Self {
            options,
            mode: ScanMode::default(),
            frames: FrameStack::new(),
            keys: KeyBuilder::new(),
            table: BlockTable::new(),
            closer: RangeCloser::new(),
            tasks: TaskTracker::new(),
            fences: FenceTracker::new(),
            last_line: None,
        }
    }

    pub fn push(&mut self, lc: &LineClass<'_>) {
        self.last_line = Some(lc.number);
        let line = lc.number;

        match lc.role(self.mode) {
            LineRole::FrontmatterOpen => {
                self.mode.in_frontmatter = true;
                self.mode.frontmatter_seen = true;
                self.table.open(FRONTMATTER_KEY, BlockKind::Frontmatter, line);
            }
            LineRole::FrontmatterClose => {
                self.mode.in_frontmatter = false;
                self.table.close(FRONTMATTER_KEY, line);
            }
            LineRole::FrontmatterBody | LineRole::CodeBody | LineRole::Blank => {}
            LineRole::Fence => {
                self.mode.in_code_block = !self.mode.in_code_block;
                self.fences.toggle(line);
                if self.closer.is_idle() {
                    self.open_content_run(line);
                }
            }
            LineRole::Heading(heading) => {
                self.tasks.record(lc);
                self.open_heading(heading, line);
            }
            LineRole::ListItem(item) => {
                self.tasks.record(lc);
                self.open_list_item(item, line);
            }
            LineRole::Indented => {
                self.tasks.record(lc);
                if !self.closer.has_list_item() {
                    self.push_content(line);
                }
            }
            LineRole::Content => {
                self.tasks.record(lc);
                self.push_content(line);
            }
        }
    }

    pub fn finish(self) -> Outline {
        let (task_lines, tasks) = self.tasks.finish();
        let blocks = match self.last_line {
            Some(last) => self.table.resolve(last),
            None => self.table.resolve(self.options.start_index),
        };
        Outline {
            blocks,
            task_lines,
            tasks,
            codeblock_ranges: self.fences.finish(),
        }
    }

    fn open_heading(&mut self, heading: &HeadingSig<'_>, line: usize) {
        let prev = line.saturating_sub(1);

        for frame in self.frames.pop_to(heading.level) {
            self.table.close(&frame.key, prev);
        }
        self.closer.close_all(&mut self.table, prev);

        let table = &self.table;
        let minted = self.keys.heading(
            self.frames.innermost(),
            heading.level,
            heading.title,
            |k| table.contains(k),
        );
        self.table
            .open(&minted.key, BlockKind::Heading { level: heading.level }, line);
        self.frames.push(HeadingFrame {
            level: heading.level,
            title: minted.title,
            key: minted.key,
        });
    }

    fn open_list_item(&mut self, item: &ListItemSig<'_>, line: usize) {
        let prev = line.saturating_sub(1);
        self.closer.close_list_item(&mut self.table, prev);
        self.closer.close_nested_content_run(&mut self.table, prev);

        let parent_key = self.frames.parent_key();
        let table = &self.table;
        let key = if self.options.line_keys {
            self.keys.list_item_label(
                parent_key,
                item.text,
                self.options.word_len(),
                |k| table.contains(k),
            )
        } else {
            self.keys.sub_block(parent_key, |k| table.contains(k))
        };
        self.table.open(&key, BlockKind::ListItem, line);
        self.closer.set_list_item(key);
    }

    /// Plain content: ends an open list item, then continues or starts a run.
    fn push_content(&mut self, line: usize) {
        if self.closer.has_list_item() {
            self.closer.close_list_item(&mut self.table, line.saturating_sub(1));
        }
        if !self.closer.has_content_run() {
            self.open_content_run(line);
        }
    }

    /// Starts a content run under the innermost heading.
    ///
    /// Before the first heading every run shares the root key and extends the
    /// same range instead of taking a new counter slot.
    fn open_content_run(&mut self, line: usize) {
        let key = if self.frames.is_empty() {
            ROOT_KEY.to_string()
        } else {
            let table = &self.table;
            self.keys
                .sub_block(self.frames.parent_key(), |k| table.contains(k))
        };
        self.table.open(&key, BlockKind::ContentRun, line);
        self.closer.set_content_run(key);
    }
}
