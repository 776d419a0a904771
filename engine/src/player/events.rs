//! Controller Events
//!
//! Fire-and-forget notifications for anything that wants to react to the
//! player (FOV kicks while sprinting, dash trails, slide sounds, HUD).
//! Listeners run synchronously, in registration order, on the thread that
//! produced the event.

use std::fmt;

use super::mode::MovementMode;
use crate::physics::ActorId;

/// Something the player controller did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerEvent {
    DashStarted { character: ActorId },
    DashStopped { character: ActorId },
    SprintStarted { character: ActorId },
    SprintStopped { character: ActorId },
    SlideStarted { character: ActorId },
    SlideStopped { character: ActorId },
    VaultTriggered { character: ActorId },
    /// Every mode transition, fired after the entry effects applied.
    ModeChanged {
        character: ActorId,
        from: MovementMode,
        to: MovementMode,
    },
}

impl ControllerEvent {
    /// The character the event is about.
    pub fn character(&self) -> ActorId {
        match *self {
            ControllerEvent::DashStarted { character }
            | ControllerEvent::DashStopped { character }
            | ControllerEvent::SprintStarted { character }
            | ControllerEvent::SprintStopped { character }
            | ControllerEvent::SlideStarted { character }
            | ControllerEvent::SlideStopped { character }
            | ControllerEvent::VaultTriggered { character }
            | ControllerEvent::ModeChanged { character, .. } => character,
        }
    }
}

impl fmt::Display for ControllerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerEvent::DashStarted { character } => write!(f, "{character} dash started"),
            ControllerEvent::DashStopped { character } => write!(f, "{character} dash stopped"),
            ControllerEvent::SprintStarted { character } => write!(f, "{character} sprint started"),
            ControllerEvent::SprintStopped { character } => write!(f, "{character} sprint stopped"),
            ControllerEvent::SlideStarted { character } => write!(f, "{character} slide started"),
            ControllerEvent::SlideStopped { character } => write!(f, "{character} slide stopped"),
            ControllerEvent::VaultTriggered { character } => write!(f, "{character} vaulted"),
            ControllerEvent::ModeChanged { character, from, to } => {
                write!(f, "{character} {from} -> {to}")
            }
        }
    }
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&ControllerEvent)>;

/// Ordered list of event listeners.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u64,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It sees every event emitted from now on.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&ControllerEvent) + 'static,
    {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Deliver `event` to every listener in registration order.
    pub fn emit(&mut self, event: ControllerEvent) {
        tracing::trace!(%event, "controller event");
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
