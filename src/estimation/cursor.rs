use crate::types::PhonemeSegment;

/// Raised when a grapheme needs more segments than the cursor has left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentMismatch {
    pub requested: usize,
    pub remaining: usize,
}

/// Forward-only reader over one sample's filtered phoneme segments.
#[derive(Debug, Clone)]
pub struct AlignmentCursor<'a> {
    segments: &'a [PhonemeSegment],
    position: usize,
}

impl<'a> AlignmentCursor<'a> {
    pub fn new(segments: &'a [PhonemeSegment]) -> Self {
        Self {
            segments,
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.segments.len() - self.position
    }

    pub fn rest(&self) -> &'a [PhonemeSegment] {
        &self.segments[self.position..]
    }

    /// Takes the next `n` segments. On mismatch the cursor does not move.
    pub fn advance(&mut self, n: usize) -> Result<&'a [PhonemeSegment], AlignmentMismatch> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(AlignmentMismatch {
                requested: n,
                remaining,
            });
        }
        let taken = &self.segments[self.position..self.position + n];
        self.position += n;
        Ok(taken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments() -> Vec<PhonemeSegment> {
        vec![
            PhonemeSegment::new("k", 0, 500),
            PhonemeSegment::new("a", 500, 1200),
            PhonemeSegment::new("N", 1200, 2000),
        ]
    }

    #[test]
    fn advance_slices_in_order() {
        let segs = segments();
        let mut cursor = AlignmentCursor::new(&segs);
        assert_eq!(cursor.advance(2).unwrap(), &segs[..2]);
        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.advance(1).unwrap(), &segs[2..]);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn advance_zero_is_empty_and_keeps_position() {
        let segs = segments();
        let mut cursor = AlignmentCursor::new(&segs);
        assert!(cursor.advance(0).unwrap().is_empty());
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn overrun_reports_mismatch_without_moving() {
        let segs = segments();
        let mut cursor = AlignmentCursor::new(&segs);
        cursor.advance(2).unwrap();
        let err = cursor.advance(2).unwrap_err();
        assert_eq!(
            err,
            AlignmentMismatch {
                requested: 2,
                remaining: 1
            }
        );
        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.rest(), &segs[2..]);
    }
}
