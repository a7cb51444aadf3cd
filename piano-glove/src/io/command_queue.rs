//! Lock-free voice command hand-off between the polling loop and the audio
//! interrupt.
//!
//! [`CommandQueue`] is a Lamport single-producer single-consumer ring.
//! [`split`](CommandQueue::split) hands out exactly one [`CommandSender`]
//! and one [`CommandReceiver`], so the one-producer/one-consumer contract
//! is enforced by the borrow checker instead of by convention.
//!
//! ```
//! use piano_glove::io::CommandQueue;
//! use piano_glove::synth::{VoiceCommand, VoiceId, VoiceSink};
//!
//! let mut queue: CommandQueue<8> = CommandQueue::new();
//! let (mut tx, mut rx) = queue.split();
//!
//! tx.send(VoiceCommand::Stop { voice: VoiceId::new(1) }).unwrap();
//! assert_eq!(rx.recv(), Some(VoiceCommand::Stop { voice: VoiceId::new(1) }));
//! assert_eq!(rx.recv(), None);
//! ```

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicUsize, Ordering};

use crate::synth::{VoiceCommand, VoiceId, VoiceSink};

/// Queue slots used by the firmware wiring. Usable capacity is one less.
pub const COMMAND_QUEUE_SLOTS: usize = 16;

const IDLE: VoiceCommand = VoiceCommand::Stop {
    voice: VoiceId::new(0),
};

/// Fixed-capacity ring of [`VoiceCommand`]s with `N - 1` usable slots.
pub struct CommandQueue<const N: usize> {
    buffer: [UnsafeCell<VoiceCommand>; N],
    /// Next slot to write; advanced only by the sender.
    head: AtomicUsize,
    /// Next slot to read; advanced only by the receiver.
    tail: AtomicUsize,
}

// SAFETY: a slot is written only by the sender while `head` has not been
// published past it, and read only by the receiver while `tail` has not been
// published past it. `split` takes `&mut self`, so at most one of each exists.
unsafe impl<const N: usize> Sync for CommandQueue<N> {}

impl<const N: usize> CommandQueue<N> {
    pub const fn new() -> Self {
        assert!(N >= 2, "command queue needs at least 2 slots");

        #[allow(clippy::declare_interior_mutable_const)]
        const SLOT: UnsafeCell<VoiceCommand> = UnsafeCell::new(IDLE);

        CommandQueue {
            buffer: [SLOT; N],
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
        }
    }

    /// Split into the producer and consumer halves.
    pub fn split(&mut self) -> (CommandSender<'_, N>, CommandReceiver<'_, N>) {
        (CommandSender { queue: self }, CommandReceiver { queue: self })
    }

    pub const fn capacity(&self) -> usize {
        N - 1
    }

    fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        (head + N - tail) % N
    }
}

impl<const N: usize> Default for CommandQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer half, owned by the polling loop.
pub struct CommandSender<'a, const N: usize> {
    queue: &'a CommandQueue<N>,
}

impl<const N: usize> CommandSender<'_, N> {
    /// Enqueue `cmd`, or hand it back if the queue is full.
    pub fn push(&mut self, cmd: VoiceCommand) -> Result<(), VoiceCommand> {
        let q = self.queue;
        let head = q.head.load(Ordering::Relaxed);
        let next = (head + 1) % N;

        if next == q.tail.load(Ordering::Acquire) {
            return Err(cmd);
        }

        // SAFETY: only the sender writes, and `next != tail` means the
        // receiver is not reading this slot.
        unsafe {
            *q.buffer[head].get() = cmd;
        }

        q.head.store(next, Ordering::Release);
        Ok(())
    }

    pub fn is_full(&self) -> bool {
        self.queue.len() == N - 1
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.len() == 0
    }
}

impl<const N: usize> VoiceSink for CommandSender<'_, N> {
    fn send(&mut self, cmd: VoiceCommand) -> Result<(), VoiceCommand> {
        self.push(cmd)
    }
}

/// Consumer half, owned by the audio interrupt.
pub struct CommandReceiver<'a, const N: usize> {
    queue: &'a CommandQueue<N>,
}

impl<'q, const N: usize> CommandReceiver<'q, N> {
    pub fn recv(&mut self) -> Option<VoiceCommand> {
        let q = self.queue;
        let tail = q.tail.load(Ordering::Relaxed);

        if tail == q.head.load(Ordering::Acquire) {
            return None;
        }

        // SAFETY: only the receiver reads, and `tail != head` means the
        // sender has published this slot.
        let cmd = unsafe { *q.buffer[tail].get() };

        q.tail.store((tail + 1) % N, Ordering::Release);
        Some(cmd)
    }

    /// Iterate until the queue is empty.
    pub fn drain(&mut self) -> Drain<'_, 'q, N> {
        Drain { receiver: self }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.len() == 0
    }
}

/// Iterator returned by [`CommandReceiver::drain`].
pub struct Drain<'r, 'q, const N: usize> {
    receiver: &'r mut CommandReceiver<'q, N>,
}

impl<const N: usize> Iterator for Drain<'_, '_, N> {
    type Item = VoiceCommand;

    fn next(&mut self) -> Option<VoiceCommand> {
        self.receiver.recv()
    }
}
