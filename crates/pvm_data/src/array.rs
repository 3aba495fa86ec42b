use alloc::vec::Vec;

// -----------------------------------------------------------------------------
// ArrayChunk

/// One contiguous piece of an array returned by [`PvArray::get`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrayChunk<'a, T> {
    /// Index of `data[0]` within the whole array.
    pub offset: usize,
    pub data: &'a [T],
}

impl<T> ArrayChunk<'_, T> {
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// -----------------------------------------------------------------------------
// PvArray

/// Segmented array storage.
///
/// Reads go through [`get`](Self::get), which returns at most one segment's
/// worth of data. Callers reassemble the array by looping until they have
/// seen [`len`](Self::len) elements.
///
/// # Examples
///
/// ```
/// use pvm_data::PvArray;
///
/// let array = PvArray::from_segments([vec![1, 2, 3], vec![4, 5]]);
/// assert_eq!(array.len(), 5);
///
/// let mut out = Vec::new();
/// while out.len() < array.len() {
///     let chunk = array.get(out.len(), array.len() - out.len());
///     out.extend_from_slice(chunk.data);
/// }
/// assert_eq!(out, [1, 2, 3, 4, 5]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PvArray<T> {
    segments: Vec<Vec<T>>,
    len: usize,
}

impl<T> PvArray<T> {
    pub const fn new() -> Self {
        Self {
            segments: Vec::new(),
            len: 0,
        }
    }

    /// Stores `values` as a single segment.
    pub fn from_vec(values: Vec<T>) -> Self {
        let mut array = Self::new();
        array.push_segment(values);
        array
    }

    /// Stores each vector as its own segment. Empty vectors are dropped.
    pub fn from_segments(segments: impl IntoIterator<Item = Vec<T>>) -> Self {
        let mut array = Self::new();
        segments.into_iter().for_each(|s| array.push_segment(s));
        array
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Appends a segment to the end of the array.
    pub fn push_segment(&mut self, segment: Vec<T>) {
        if !segment.is_empty() {
            self.len += segment.len();
            self.segments.push(segment);
        }
    }

    /// Replaces the content with a single segment.
    pub fn put(&mut self, values: Vec<T>) {
        self.segments.clear();
        self.len = 0;
        self.push_segment(values);
    }

    /// Reads up to `len` elements starting at `offset`.
    ///
    /// The returned chunk never spans two segments, so it may be shorter
    /// than requested. It is empty when `offset` is past the end.
    pub fn get(&self, offset: usize, len: usize) -> ArrayChunk<'_, T> {
        let mut start = 0;
        for segment in &self.segments {
            let end = start + segment.len();
            if offset < end {
                let from = offset - start;
                let to = segment.len().min(from.saturating_add(len));
                return ArrayChunk {
                    offset,
                    data: &segment[from..to],
                };
            }
            start = end;
        }
        ArrayChunk { offset, data: &[] }
    }

    /// Iterates every element, crossing segments.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &T> {
        self.segments.iter().flatten()
    }
}

impl<T> Default for PvArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::PvArray;

    #[test]
    fn get_stops_at_segment_boundary() {
        let array = PvArray::from_segments([vec![0, 1, 2], vec![3, 4, 5], vec![6, 7, 8], vec![9]]);
        assert_eq!(array.len(), 10);
        assert_eq!(array.segment_count(), 4);

        let chunk = array.get(1, 10);
        assert_eq!(chunk.offset, 1);
        assert_eq!(chunk.data, &[1, 2]);

        let chunk = array.get(3, 2);
        assert_eq!(chunk.data, &[3, 4]);

        assert_eq!(array.get(9, 5).data, &[9]);
        assert!(array.get(10, 1).is_empty());
    }

    #[test]
    fn put_replaces_segments() {
        let mut array = PvArray::from_segments([vec!["a"], vec!["b"]]);
        array.put(vec!["c", "d", "e"]);
        assert_eq!(array.segment_count(), 1);
        assert_eq!(array.get(0, 3).data, &["c", "d", "e"]);

        array.put(Vec::new());
        assert!(array.is_empty());
        assert_eq!(array.segment_count(), 0);
    }
}
