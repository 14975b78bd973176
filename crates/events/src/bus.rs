//! Event publishing/subscription abstraction (mechanics only).
//!
//! A bus fans each published message out to every live subscription.
//! Delivery is best-effort: a subscriber that went away is dropped on the
//! next publish, and nothing is buffered for subscribers that join later.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvError};

/// A subscription to an event stream.
///
/// Each subscription gets its own copy of every message published after it
/// was created (broadcast semantics).
///
/// ```ignore
/// let subscription = bus.subscribe();
///
/// // Ends once the bus is dropped.
/// while let Ok(event) = subscription.recv() {
///     render(event);
/// }
/// ```
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    ///
    /// Fails once the bus has been dropped and everything delivered was read.
    pub fn recv(&self) -> Result<M, RecvError> {
        self.receiver.recv()
    }

    /// Drain everything already delivered, without blocking.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}

/// Domain-agnostic event bus (pub/sub abstraction).
///
/// `publish()` can fail (e.g. a poisoned lock). Publishers treat that as a
/// lost notification, never as a failed mutation: the state change has
/// already happened by the time its event is published.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
