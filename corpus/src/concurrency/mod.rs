//! Concurrency primitives coordinating crawlers and the classifier.
//!
//! Crawlers and the classifier never talk to each other directly. They interact only through:
//!
//! - the [`gate`] module, a mutex-protected ring buffer plus two counting semaphores that
//!   replace busy waiting with blocking waits for free slots and for buffered items;
//! - the [`shutdown`] module, a one-way latch tripped by the classifier when the collection
//!   goal is reached and observed by crawlers.
//!
//! # Safety Guarantees
//!
//! - **No lock held while blocked**: semaphores are acquired before the buffer lock and
//!   released after it.
//! - **No lost items**: the latch is checked by crawlers under the buffer lock, and the
//!   classifier only exits once the latch is tripped and the buffer is empty.
//! - **No stuck workers**: closing the gate wakes every blocked task.

pub mod gate;
pub mod shutdown;
