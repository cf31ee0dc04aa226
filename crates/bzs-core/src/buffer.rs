use crate::error::BzsError;

/// Owned, fixed-capacity byte store with explicit fill and consume cursors.
///
/// The same type backs every buffer in the workspace: the destination
/// buffer of the incremental streams (only the fill cursor moves), the
/// source window of the file engine (both cursors move, [`compact`] recycles
/// the space in place), and the growing output of the one-shot path
/// ([`resize`]).
///
/// ```text
///   0          head            tail                capacity
///   ├──────────┼───────────────┼───────────────────┤
///   │ consumed │   pending()   │    spare_mut()    │
///   └──────────┴───────────────┴───────────────────┘
/// ```
///
/// Invariant: `head <= tail <= capacity`. The backing store is allocated
/// once, up front, and is never grown implicitly.
///
/// [`compact`]: ByteBuffer::compact
/// [`resize`]: ByteBuffer::resize
#[derive(Clone, Debug)]
pub struct ByteBuffer {
    data: Vec<u8>,
    head: usize,
    tail: usize,
}

impl ByteBuffer {
    /// Allocate a zeroed buffer of exactly `capacity` bytes.
    ///
    /// # Errors
    ///
    /// [`BzsError::AllocateFailed`] if the allocator cannot provide the
    /// memory.
    pub fn allocate(capacity: usize) -> Result<Self, BzsError> {
        let mut data = Vec::new();
        data.try_reserve_exact(capacity)
            .map_err(|_| BzsError::AllocateFailed)?;
        data.resize(capacity, 0);
        Ok(Self {
            data,
            head: 0,
            tail: 0,
        })
    }

    /// Reallocate to `new_capacity`, preserving content up to
    /// `min(len, new_capacity)`.
    ///
    /// # Errors
    ///
    /// [`BzsError::AllocateFailed`] if growing the store fails. The buffer
    /// is left untouched in that case.
    pub fn resize(&mut self, new_capacity: usize) -> Result<(), BzsError> {
        if new_capacity > self.data.len() {
            let extra = new_capacity - self.data.len();
            self.data
                .try_reserve_exact(extra)
                .map_err(|_| BzsError::AllocateFailed)?;
        }
        self.data.resize(new_capacity, 0);
        self.data.shrink_to(new_capacity);
        self.tail = self.tail.min(new_capacity);
        self.head = self.head.min(self.tail);
        Ok(())
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of bytes filled so far, counted from the buffer origin.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tail
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tail == 0
    }

    /// Free space after the fill cursor.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.tail
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.tail == self.data.len()
    }

    /// Everything filled so far, from the origin to the fill cursor.
    #[must_use]
    pub fn filled(&self) -> &[u8] {
        &self.data[..self.tail]
    }

    /// Filled bytes that have not been consumed yet.
    #[must_use]
    pub fn pending(&self) -> &[u8] {
        &self.data[self.head..self.tail]
    }

    /// Writable region after the fill cursor. Commit what was written with
    /// [`commit`](Self::commit).
    pub fn spare_mut(&mut self) -> &mut [u8] {
        self.as_mutable_view(self.tail, self.remaining())
    }

    /// Mutable view of `length` bytes starting at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset + length` exceeds the capacity.
    pub fn as_mutable_view(&mut self, offset: usize, length: usize) -> &mut [u8] {
        &mut self.data[offset..offset + length]
    }

    /// Advance the fill cursor by `n` bytes written into
    /// [`spare_mut`](Self::spare_mut).
    pub fn commit(&mut self, n: usize) {
        debug_assert!(n <= self.remaining(), "commit past capacity");
        self.tail = (self.tail + n).min(self.data.len());
    }

    /// Advance the consume cursor by `n` pending bytes.
    pub fn consume(&mut self, n: usize) {
        debug_assert!(n <= self.pending().len(), "consume past fill cursor");
        self.head = (self.head + n).min(self.tail);
    }

    /// Move pending bytes to the origin so the free region is one
    /// contiguous tail.
    pub fn compact(&mut self) {
        if self.head == 0 {
            return;
        }
        self.data.copy_within(self.head..self.tail, 0);
        self.tail -= self.head;
        self.head = 0;
    }

    /// Reset both cursors. Capacity is kept.
    pub fn clear(&mut self) {
        self.head = 0;
        self.tail = 0;
    }

    /// Copy out the filled region and reset the buffer.
    pub fn take(&mut self) -> Vec<u8> {
        let out = self.filled().to_vec();
        self.clear();
        out
    }

    /// Consume the buffer, returning only the filled bytes.
    #[must_use]
    pub fn into_vec(mut self) -> Vec<u8> {
        self.data.truncate(self.tail);
        self.data
    }
}
