/// Read position of one session within the shared message.
///
/// Cursors are owned by a single session and never shared, so independent
/// readers can walk the same content at their own pace.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReadCursor {
    offset: usize,
}

impl ReadCursor {
    /// A cursor at the start of the message.
    pub const fn new() -> Self {
        Self { offset: 0 }
    }

    /// Current offset into the message.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Move forward by `count` bytes.
    pub fn advance(&mut self, count: usize) {
        self.offset = self.offset.saturating_add(count);
    }

    /// Rewind to the start of the message.
    pub fn reset(&mut self) {
        self.offset = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_and_reset() {
        let mut cursor = ReadCursor::new();
        cursor.advance(3);
        cursor.advance(4);
        assert_eq!(cursor.offset(), 7);
        cursor.reset();
        assert_eq!(cursor, ReadCursor::default());
    }
}
