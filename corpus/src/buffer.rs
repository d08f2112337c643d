//! Fixed-capacity FIFO ring buffer.
//!
//! [`RingBuffer`] is a plain data structure with wraparound head and tail cursors. It performs
//! no locking: callers share it through [`crate::concurrency::gate::SyncGate`], which also
//! guarantees that [`RingBuffer::push`] is only called with a free slot and
//! [`RingBuffer::pop`] only with an occupied one.

/// Fixed-capacity FIFO queue of owned items.
#[derive(Debug)]
pub struct RingBuffer<T> {
    slots: Box<[Option<T>]>,
    /// Index of the next slot to pop.
    head: usize,
    /// Index of the next slot to fill.
    tail: usize,
    len: usize,
}

impl<T> RingBuffer<T> {
    /// Creates an empty buffer holding at most `capacity` items.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring buffer capacity must be greater than 0");

        let slots = (0..capacity)
            .map(|_| None)
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Self {
            slots,
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    /// Appends `item` at the tail.
    ///
    /// Hands the item back when the buffer is full.
    pub fn push(&mut self, item: T) -> Result<(), T> {
        if self.is_full() {
            return Err(item);
        }

        self.slots[self.tail] = Some(item);
        self.tail = (self.tail + 1) % self.capacity();
        self.len += 1;

        Ok(())
    }

    /// Removes and returns the head item, or [`None`] when empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let item = self.slots[self.head].take();
        self.head = (self.head + 1) % self.capacity();
        self.len -= 1;

        item
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::VecDeque;

    #[test]
    fn pops_in_insertion_order() {
        let mut buffer = RingBuffer::new(3);

        buffer.push("a").unwrap();
        buffer.push("b").unwrap();
        buffer.push("c").unwrap();

        assert_eq!(buffer.pop(), Some("a"));
        assert_eq!(buffer.pop(), Some("b"));
        assert_eq!(buffer.pop(), Some("c"));
        assert_eq!(buffer.pop(), None);
    }

    #[test]
    fn full_buffer_hands_item_back() {
        let mut buffer = RingBuffer::new(2);

        buffer.push(1).unwrap();
        buffer.push(2).unwrap();

        assert!(buffer.is_full());
        assert_eq!(buffer.push(3), Err(3));
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn empty_buffer_pops_nothing() {
        let mut buffer = RingBuffer::<u32>::new(4);

        assert!(buffer.is_empty());
        assert_eq!(buffer.pop(), None);
        assert_eq!(buffer.len(), 0);
    }

    #[test]
    fn cursors_wrap_around() {
        let mut buffer = RingBuffer::new(3);

        for round in 0..10 {
            buffer.push(round * 2).unwrap();
            buffer.push(round * 2 + 1).unwrap();
            assert_eq!(buffer.pop(), Some(round * 2));
            assert_eq!(buffer.pop(), Some(round * 2 + 1));
        }

        assert!(buffer.is_empty());
    }

    #[test]
    #[should_panic(expected = "capacity must be greater than 0")]
    fn zero_capacity_is_rejected() {
        let _ = RingBuffer::<u8>::new(0);
    }

    #[test]
    fn random_operations_match_bounded_queue_model() {
        const CAPACITY: usize = 12;

        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut buffer = RingBuffer::new(CAPACITY);
        let mut model = VecDeque::new();
        let mut pushed = 0usize;
        let mut popped = 0usize;

        for step in 0..10_000u32 {
            if rng.gen_bool(0.5) {
                let result = buffer.push(step);
                if model.len() < CAPACITY {
                    assert_eq!(result, Ok(()));
                    model.push_back(step);
                    pushed += 1;
                } else {
                    assert_eq!(result, Err(step));
                }
            } else {
                let item = buffer.pop();
                assert_eq!(item, model.pop_front());
                if item.is_some() {
                    popped += 1;
                }
            }

            assert_eq!(buffer.len(), pushed - popped);
            assert!(buffer.len() <= CAPACITY);
            assert_eq!(buffer.is_full(), model.len() == CAPACITY);
            assert_eq!(buffer.is_empty(), model.is_empty());
        }
    }
}
