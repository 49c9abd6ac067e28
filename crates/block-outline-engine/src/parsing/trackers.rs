use super::{
    classify::LineClass,
    types::{BlockRange, IncompleteTasks, Tasks},
};

/// Collects checkbox task line numbers.
#[derive(Debug, Default)]
pub struct TaskTracker {
    lines: Vec<usize>,
    incomplete_all: Vec<usize>,
    incomplete_top: Vec<usize>,
}

impl TaskTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, lc: &LineClass<'_>) {
        let Some(task) = lc.task else {
            return;
        };
        self.lines.push(lc.number);
        if !task.complete {
            self.incomplete_all.push(lc.number);
            if lc.indent == 0 {
                self.incomplete_top.push(lc.number);
            }
        }
    }

    /// Returns `(task_lines, tasks)`.
    pub fn finish(self) -> (Vec<usize>, Tasks) {
        let incomplete = (!self.incomplete_all.is_empty()).then_some(IncompleteTasks {
            all: self.incomplete_all,
            top: self.incomplete_top,
        });
        (self.lines, Tasks { incomplete })
    }
}

/// Pairs fence delimiters into code block ranges.
#[derive(Debug, Default)]
pub struct FenceTracker {
    pending: Option<usize>,
    ranges: Vec<BlockRange>,
}

impl FenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a fence delimiter on `line`, opening or closing a span.
    pub fn toggle(&mut self, line: usize) {
        match self.pending.take() {
            Some(start) => self.ranges.push(BlockRange::new(start, line)),
            None => self.pending = Some(line),
        }
    }

    /// Completed spans; an unterminated fence is dropped.
    pub fn finish(self) -> Vec<BlockRange> {
        self.ranges
    }
}
