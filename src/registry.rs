//! Page-wide listener registry

use crate::event::{EventKind, ListenerOptions, MONITORED_EVENTS};
use crate::target::{EventTarget, Listener, ListenerId};
use log::debug;
use std::rc::Rc;

/// Owns the monitored listeners attached to the global target
pub struct ListenerRegistry {
    target: Rc<dyn EventTarget>,
    id: ListenerId,
    options: ListenerOptions,
    attached: bool,
}

impl ListenerRegistry {
    /// Attach `listener` for every monitored event kind
    pub fn attach(target: Rc<dyn EventTarget>, listener: Listener, options: ListenerOptions) -> Self {
        let id = ListenerId::next();
        for kind in MONITORED_EVENTS {
            target.add_event_listener(kind, id, Rc::clone(&listener), options);
        }
        debug!("attached input listener {:?} for {} event kinds", id, MONITORED_EVENTS.len());
        Self {
            target,
            id,
            options,
            attached: true,
        }
    }

    /// Remove every monitored listener. Only the first call has an effect.
    ///
    /// Returns whether listeners were removed by this call.
    pub fn teardown(&mut self) -> bool {
        if !self.attached {
            return false;
        }
        for kind in MONITORED_EVENTS {
            self.target.remove_event_listener(kind, self.id, self.options);
        }
        self.attached = false;
        debug!("removed input listener {:?}", self.id);
        true
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Kinds currently being listened to
    pub fn kinds(&self) -> &'static [EventKind] {
        if self.attached {
            &MONITORED_EVENTS
        } else {
            &[]
        }
    }

    pub fn listener_id(&self) -> ListenerId {
        self.id
    }
}
