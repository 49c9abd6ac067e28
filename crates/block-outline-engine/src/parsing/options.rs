/// Caller-tunable parse settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Number reported for the first line of the document.
    pub start_index: usize,
    /// Key top-level list items by their longest words instead of a counter.
    pub line_keys: bool,
    /// How many words a line-derived list key keeps.
    pub list_key_word_len: usize,
}

impl ParseOptions {
    pub const DEFAULT_START_INDEX: usize = 1;
    pub const DEFAULT_LIST_KEY_WORD_LEN: usize = 10;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start_index(mut self, start_index: usize) -> Self {
        self.start_index = start_index;
        self
    }

    pub fn with_line_keys(mut self, line_keys: bool) -> Self {
        self.line_keys = line_keys;
        self
    }

    /// Sets the list key word count; zero falls back to the default.
    pub fn with_list_key_word_len(mut self, len: usize) -> Self {
        if len == 0 {
            log::warn!(
                "list_key_word_len must be at least 1, using {}",
                Self::DEFAULT_LIST_KEY_WORD_LEN
            );
            self.list_key_word_len = Self::DEFAULT_LIST_KEY_WORD_LEN;
        } else {
            self.list_key_word_len = len;
        }
        self
    }

    /// Word count actually used for line-derived keys.
    pub(crate) fn word_len(&self) -> usize {
        if self.list_key_word_len == 0 {
            Self::DEFAULT_LIST_KEY_WORD_LEN
        } else {
            self.list_key_word_len
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            start_index: Self::DEFAULT_START_INDEX,
            line_keys: false,
            list_key_word_len: Self::DEFAULT_LIST_KEY_WORD_LEN,
        }
    }
}
