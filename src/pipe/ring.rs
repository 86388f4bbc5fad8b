/*!
 * Ring Buffer
 * Fixed-capacity circular byte storage with wrapping head/tail cursors
 */

use crate::core::types::Size;

/// Circular byte buffer addressed by wrapping `head`/`tail` cursors.
///
/// One slot is always reserved to disambiguate empty from full: `head ==
/// tail` means empty, `(tail + 1) % capacity == head` means full, and a ring
/// of `capacity` bytes holds at most `capacity - 1` payload bytes. Purely
/// sequential; the owning pipe provides all locking.
pub struct RingBuffer {
    storage: Box<[u8]>,
    head: Size,
    tail: Size,
}

impl RingBuffer {
    /// `capacity` is the ring size in bytes, minimum 2.
    pub fn new(capacity: Size) -> Self {
        debug_assert!(capacity >= 2, "ring needs the reserved slot plus one payload byte");
        Self {
            storage: vec![0u8; capacity].into_boxed_slice(),
            head: 0,
            tail: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> Size {
        self.storage.len()
    }

    /// Bytes currently buffered.
    #[inline]
    pub fn occupied(&self) -> Size {
        let capacity = self.capacity();
        (self.tail + capacity - self.head) % capacity
    }

    /// Bytes that can still be written (`capacity - 1 - occupied`).
    #[inline]
    pub fn free_space(&self) -> Size {
        self.capacity() - 1 - self.occupied()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        (self.tail + 1) % self.capacity() == self.head
    }

    /// Copy up to `min(src.len(), free_space())` bytes in at the tail,
    /// splitting into two contiguous segments across the wrap point.
    /// Returns the count actually copied; never blocks, never fails.
    pub fn write_chunk(&mut self, src: &[u8]) -> Size {
        let count = src.len().min(self.free_space());
        let capacity = self.capacity();

        let first = count.min(capacity - self.tail);
        self.storage[self.tail..self.tail + first].copy_from_slice(&src[..first]);
        if first < count {
            self.storage[..count - first].copy_from_slice(&src[first..count]);
        }

        self.tail = (self.tail + count) % capacity;
        count
    }

    /// Copy up to `min(dst.len(), occupied())` bytes out from the head,
    /// symmetric to `write_chunk`. Returns the count actually copied.
    pub fn read_chunk(&mut self, dst: &mut [u8]) -> Size {
        let count = dst.len().min(self.occupied());
        let capacity = self.capacity();

        let first = count.min(capacity - self.head);
        dst[..first].copy_from_slice(&self.storage[self.head..self.head + first]);
        if first < count {
            dst[first..count].copy_from_slice(&self.storage[..count - first]);
        }

        self.head = (self.head + count) % capacity;
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::VecDeque;

    #[test]
    fn test_new_ring_is_empty() {
        let ring = RingBuffer::new(8);
        assert!(ring.is_empty());
        assert!(!ring.is_full());
        assert_eq!(ring.occupied(), 0);
        assert_eq!(ring.free_space(), 7);
    }

    #[test]
    fn test_one_slot_reserved() {
        let mut ring = RingBuffer::new(8);
        let written = ring.write_chunk(&[0xAB; 8]);

        assert_eq!(written, 7);
        assert!(ring.is_full());
        assert_eq!(ring.free_space(), 0);
    }

    #[test]
    fn test_wraparound_copy_splits() {
        let mut ring = RingBuffer::new(8);

        assert_eq!(ring.write_chunk(&[0, 1, 2, 3, 4]), 5);
        let mut drained = [0u8; 3];
        assert_eq!(ring.read_chunk(&mut drained), 3);
        assert_eq!(drained, [0, 1, 2]);

        // Tail sits at 5, so this write wraps past the end of storage.
        assert_eq!(ring.write_chunk(&[5, 6, 7, 8, 9]), 5);
        assert!(ring.is_full());

        let mut rest = [0u8; 7];
        assert_eq!(ring.read_chunk(&mut rest), 7);
        assert_eq!(rest, [3, 4, 5, 6, 7, 8, 9]);
        assert!(ring.is_empty());
    }

    #[test]
    fn test_short_reads_and_writes_report_actual_counts() {
        let mut ring = RingBuffer::new(4);

        assert_eq!(ring.write_chunk(&[1, 2, 3, 4, 5]), 3);
        assert_eq!(ring.write_chunk(&[6]), 0);

        let mut buf = [0u8; 8];
        assert_eq!(ring.read_chunk(&mut buf), 3);
        assert_eq!(&buf[..3], &[1, 2, 3]);
        assert_eq!(ring.read_chunk(&mut buf), 0);
    }

    proptest! {
        // Exercises arbitrary interleavings against a queue model: occupancy
        // stays within [0, capacity - 1] and bytes come out in FIFO order.
        #[test]
        fn prop_occupancy_bounded_and_fifo(
            ops in proptest::collection::vec((any::<bool>(), 1usize..16), 1..64),
        ) {
            let mut ring = RingBuffer::new(13);
            let mut model: VecDeque<u8> = VecDeque::new();
            let mut next = 0u8;

            for (is_write, len) in ops {
                if is_write {
                    let chunk: Vec<u8> = (0..len)
                        .map(|_| {
                            let byte = next;
                            next = next.wrapping_add(1);
                            byte
                        })
                        .collect();
                    let written = ring.write_chunk(&chunk);
                    model.extend(&chunk[..written]);
                } else {
                    let mut buf = vec![0u8; len];
                    let read = ring.read_chunk(&mut buf);
                    let expected: Vec<u8> = model.drain(..read).collect();
                    prop_assert_eq!(&buf[..read], &expected[..]);
                }

                prop_assert!(ring.occupied() <= ring.capacity() - 1);
                prop_assert_eq!(ring.occupied(), model.len());
                prop_assert_eq!(ring.free_space(), ring.capacity() - 1 - model.len());
                prop_assert_eq!(ring.is_empty(), model.is_empty());
                prop_assert_eq!(ring.is_full(), model.len() == ring.capacity() - 1);
            }
        }
    }
}
