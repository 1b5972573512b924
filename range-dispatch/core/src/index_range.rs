// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::DispatchError;

/// Half-open interval `[begin, end)` of dispatch indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexRange {
    begin: i64,
    end: i64,
}

impl IndexRange {
    /// Builds a range, rejecting `begin > end` and lengths `usize` cannot count
    pub fn new(begin: i64, end: i64) -> Result<Self, DispatchError> {
        if begin > end {
            return Err(DispatchError::InvalidRange { begin, end });
        }
        if usize::try_from(end.abs_diff(begin)).is_err() {
            return Err(DispatchError::Configuration(format!(
                "range [{}, {}) has more indices than this target can address",
                begin, end
            )));
        }
        Ok(Self { begin, end })
    }

    pub fn begin(&self) -> i64 {
        self.begin
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn len(&self) -> usize {
        usize::try_from(self.end.abs_diff(self.begin)).unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    pub fn iter(&self) -> std::ops::Range<i64> {
        self.begin..self.end
    }

    /// Sub-range covering chunk `ordinal` when the range is cut into pieces of `chunk_size`.
    /// The last chunk may be shorter.
    pub fn chunk(&self, ordinal: usize, chunk_size: usize) -> IndexRange {
        let len = self.len();
        let start = ordinal.saturating_mul(chunk_size).min(len);
        let stop = start.saturating_add(chunk_size).min(len);
        IndexRange {
            begin: self.begin.saturating_add_unsigned(start as u64),
            end: self.begin.saturating_add_unsigned(stop as u64),
        }
    }

    /// Number of chunks of `chunk_size` needed to cover the range
    pub fn chunk_count(&self, chunk_size: usize) -> usize {
        self.len().div_ceil(chunk_size.max(1))
    }

    /// Splits into at most `parts` contiguous, non-empty sub-ranges whose lengths
    /// differ by at most one. An empty range yields no parts.
    pub fn split(&self, parts: usize) -> Vec<IndexRange> {
        let len = self.len();
        let parts = parts.min(len);
        if parts == 0 {
            return Vec::new();
        }

        let base = len / parts;
        let remainder = len % parts;
        let mut begin = self.begin;
        (0..parts)
            .map(|part| {
                let size = base + usize::from(part < remainder);
                let end = begin.saturating_add_unsigned(size as u64);
                let piece = IndexRange { begin, end };
                begin = end;
                piece
            })
            .collect()
    }
}

impl IntoIterator for IndexRange {
    type Item = i64;
    type IntoIter = std::ops::Range<i64>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
