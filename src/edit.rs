use thiserror::Error;

/// A byte-span replacement applied to an in-memory document.
///
/// Every change to a [`Document`](crate::ts::Document) goes through this
/// primitive so that the tree's modification stamp and node identities are
/// updated in one place.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "TextEdit does nothing until applied to a document"]
pub struct TextEdit {
    /// Starting byte offset (inclusive)
    pub byte_start: usize,
    /// Ending byte offset (exclusive)
    pub byte_end: usize,
    /// New text to insert at [byte_start, byte_end)
    pub new_text: String,
    /// Text expected at [byte_start, byte_end) before applying, if checked
    pub expected_before: Option<String>,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EditError {
    #[error("Invalid byte range: [{byte_start}, {byte_end}) in text of length {text_len}")]
    InvalidByteRange {
        byte_start: usize,
        byte_end: usize,
        text_len: usize,
    },

    #[error("Byte range [{byte_start}, {byte_end}) does not fall on UTF-8 character boundaries")]
    InvalidUtf8Edit { byte_start: usize, byte_end: usize },

    #[error("Before-text verification failed at byte {byte_start}: expected {expected:?}, found {found:?}")]
    BeforeTextMismatch {
        byte_start: usize,
        expected: String,
        found: String,
    },
}

impl TextEdit {
    /// Replace `[byte_start, byte_end)` with `new_text`.
    pub fn replace(byte_start: usize, byte_end: usize, new_text: impl Into<String>) -> Self {
        Self {
            byte_start,
            byte_end,
            new_text: new_text.into(),
            expected_before: None,
        }
    }

    /// Insert `text` at `offset`.
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::replace(offset, offset, text)
    }

    /// Delete `[byte_start, byte_end)`.
    pub fn delete(byte_start: usize, byte_end: usize) -> Self {
        Self::replace(byte_start, byte_end, "")
    }

    /// Require the replaced span to currently read `expected`.
    pub fn expecting(mut self, expected: impl Into<String>) -> Self {
        self.expected_before = Some(expected.into());
        self
    }

    /// End offset of the inserted text once applied.
    pub fn new_end(&self) -> usize {
        self.byte_start + self.new_text.len()
    }

    /// Check the edit against `text` without applying it.
    pub fn validate(&self, text: &str) -> Result<(), EditError> {
        if self.byte_start > self.byte_end || self.byte_end > text.len() {
            return Err(EditError::InvalidByteRange {
                byte_start: self.byte_start,
                byte_end: self.byte_end,
                text_len: text.len(),
            });
        }

        if !text.is_char_boundary(self.byte_start) || !text.is_char_boundary(self.byte_end) {
            return Err(EditError::InvalidUtf8Edit {
                byte_start: self.byte_start,
                byte_end: self.byte_end,
            });
        }

        if let Some(expected) = &self.expected_before {
            let found = &text[self.byte_start..self.byte_end];
            if found != expected {
                return Err(EditError::BeforeTextMismatch {
                    byte_start: self.byte_start,
                    expected: expected.clone(),
                    found: found.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Produce the edited text.
    pub fn apply_to(&self, text: &str) -> Result<String, EditError> {
        self.validate(text)?;

        let mut out = String::with_capacity(
            text.len() - (self.byte_end - self.byte_start) + self.new_text.len(),
        );
        out.push_str(&text[..self.byte_start]);
        out.push_str(&self.new_text);
        out.push_str(&text[self.byte_end..]);
        Ok(out)
    }
}
