/// An open heading whose descendants are still being scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingFrame {
    /// Heading level (1-6).
    pub level: u8,
    /// Title after duplicate disambiguation.
    pub title: String,
    pub key: String,
}

/// The chain of currently open ancestor headings, outermost first.
#[derive(Debug, Default)]
pub struct FrameStack {
    frames: Vec<HeadingFrame>,
}

impl FrameStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every frame at `level` or deeper, innermost first.
    pub fn pop_to(&mut self, level: u8) -> Vec<HeadingFrame> {
        let keep = self
            .frames
            .iter()
            .rposition(|f| f.level < level)
            .map_or(0, |i| i + 1);
        let mut closed = self.frames.split_off(keep);
        closed.reverse();
        closed
    }

    pub fn push(&mut self, frame: HeadingFrame) {
        self.frames.push(frame);
    }

    /// Nearest open ancestor, if any heading is open.
    pub fn innermost(&self) -> Option<&HeadingFrame> {
        self.frames.last()
    }

    /// Key new sub-blocks hang from: the innermost heading, or `""` for the root.
    pub fn parent_key(&self) -> &str {
        self.innermost().map_or("", |f| f.key.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }
}
