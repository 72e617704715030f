use std::sync::mpsc::{self, Receiver, SyncSender, TryRecvError, TrySendError};

use crate::error::QueueError;
use crate::input::InputEvent;

pub const DEFAULT_CAPACITY: usize = 1024;

/// Producer half. Cheap to clone and safe to hand to another thread.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: SyncSender<InputEvent>,
}

impl EventSender {
    /// Never blocks: a full queue drops the event.
    pub fn send(&self, event: InputEvent) -> Result<(), QueueError> {
        self.sender.try_send(event).map_err(|err| match err {
            TrySendError::Full(_) => QueueError::Full,
            TrySendError::Disconnected(_) => QueueError::Disconnected,
        })
    }
}

/// Consumer half, owned by the simulation loop.
#[derive(Debug)]
pub struct EventQueue {
    receiver: Receiver<InputEvent>,
}

impl EventQueue {
    pub fn bounded(capacity: usize) -> (EventSender, EventQueue) {
        let (sender, receiver) = mpsc::sync_channel(capacity);
        (EventSender { sender }, EventQueue { receiver })
    }

    /// Pending events in arrival order. Stops at the first empty poll, so
    /// events sent while draining may land in the next iteration.
    pub fn drain(&self) -> impl Iterator<Item = InputEvent> + '_ {
        std::iter::from_fn(move || match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn drains_in_order() -> Result<(), QueueError> {
        let (sender, queue) = EventQueue::bounded(8);
        sender.send(InputEvent::Step)?;
        sender.send(InputEvent::ToggleRunning)?;
        let events: Vec<_> = queue.drain().collect();
        assert_eq!(events, vec![InputEvent::Step, InputEvent::ToggleRunning]);
        assert_eq!(queue.drain().count(), 0);
        Ok(())
    }

    #[test]
    fn full_queue_drops_events() {
        let (sender, queue) = EventQueue::bounded(1);
        assert_eq!(sender.send(InputEvent::Step), Ok(()));
        assert_eq!(sender.send(InputEvent::Step), Err(QueueError::Full));
        assert_eq!(queue.drain().count(), 1);
    }

    #[test]
    fn send_after_consumer_dropped() {
        let (sender, queue) = EventQueue::bounded(1);
        drop(queue);
        assert_eq!(sender.send(InputEvent::Step), Err(QueueError::Disconnected));
    }

    #[test]
    fn accepts_events_from_other_threads() {
        let (sender, queue) = EventQueue::bounded(16);
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let sender = sender.clone();
                thread::spawn(move || sender.send(InputEvent::Randomize))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().expect("sender thread panicked"), Ok(()));
        }
        assert_eq!(queue.drain().count(), 4);
    }
}
