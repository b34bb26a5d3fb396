//! Unbounded crossbeam channel carrying pipeline events to a listener.

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::Event;

/// Sending half, cloned into every stage and hashing worker
#[derive(Clone)]
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    /// Deliver an event; dropped silently once the listener is gone
    pub fn send(&self, event: Event) {
        let _ = self.inner.send(event);
    }
}

/// Listening half, drained by the CLI's progress thread
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Blocks between events; ends when every sender is dropped
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }
}

pub struct EventChannel;

impl EventChannel {
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (EventSender, EventReceiver) {
        let (sender, receiver) = unbounded();
        (
            EventSender { inner: sender },
            EventReceiver { inner: receiver },
        )
    }
}

/// Sender with no listener, for runs nobody watches
pub fn null_sender() -> EventSender {
    let (sender, _receiver) = EventChannel::new();
    sender
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{GroupEvent, PipelineEvent};
    use std::thread;

    #[test]
    fn worker_events_reach_the_listener() {
        let (sender, receiver) = EventChannel::new();

        thread::scope(|scope| {
            for size in [2, 3] {
                let sender = sender.clone();
                scope.spawn(move || sender.send(Event::Group(GroupEvent::GroupFound { size })));
            }
        });
        drop(sender);

        let mut sizes: Vec<usize> = receiver
            .iter()
            .filter_map(|e| match e {
                Event::Group(GroupEvent::GroupFound { size }) => Some(size),
                _ => None,
            })
            .collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![2, 3]);
    }

    #[test]
    fn sending_without_listener_is_harmless() {
        null_sender().send(Event::Pipeline(PipelineEvent::Cancelled));
    }
}
