//! Handler chain
//!
//! Ordered registry of message handlers, unique by [`HandlerKind`].
//! Dispatch walks handlers in registration order; there is no priority.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, trace};

use crate::event::MessageEvent;
use crate::handler::{HandlerKind, MessageHandler};

/// How far an event travels down the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// Stop at the first handler that reports `Handled`
    #[default]
    Interrupt,
    /// Offer the event to every handler
    Broadcast,
}

/// Ordered, kind-unique list of handlers
#[derive(Default)]
pub struct HandlerChain {
    handlers: Vec<Arc<dyn MessageHandler>>,
}

impl HandlerChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handler unless one of the same kind is already registered
    pub fn append(&mut self, handler: Arc<dyn MessageHandler>) -> &mut Self {
        let kind = handler.kind();
        if self.position(&kind).is_some() {
            debug!("Handler '{}' already registered, ignoring append", kind);
        } else {
            self.handlers.push(handler);
        }
        self
    }

    /// Swap in a handler at the slot of its kind, or append if the kind is new
    pub fn replace(&mut self, handler: Arc<dyn MessageHandler>) -> &mut Self {
        match self.position(&handler.kind()) {
            Some(idx) => self.handlers[idx] = handler,
            None => self.handlers.push(handler),
        }
        self
    }

    pub fn contains(&self, kind: &HandlerKind) -> bool {
        self.position(kind).is_some()
    }

    pub fn handler(&self, kind: &HandlerKind) -> Option<Arc<dyn MessageHandler>> {
        self.position(kind).map(|idx| Arc::clone(&self.handlers[idx]))
    }

    /// Remove this exact handler instance. Returns whether it was present.
    pub fn remove(&mut self, handler: &Arc<dyn MessageHandler>) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|h| !same_handler(h, handler));
        self.handlers.len() != before
    }

    /// Remove every handler of a kind. Returns how many were removed.
    pub fn remove_kind(&mut self, kind: &HandlerKind) -> usize {
        let before = self.handlers.len();
        self.handlers.retain(|h| &h.kind() != kind);
        before - self.handlers.len()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered kinds in dispatch order
    pub fn kinds(&self) -> Vec<HandlerKind> {
        self.handlers.iter().map(|h| h.kind()).collect()
    }

    /// Offer an event to the handlers in registration order
    ///
    /// Returns true if at least one handler reported `Handled`.
    pub fn dispatch(&self, event: &MessageEvent<'_>, mode: DispatchMode) -> bool {
        let mut handled = false;

        for handler in &self.handlers {
            let result = handler.handle(event);
            trace!(
                "Handler '{}' -> {:?} for '{}'",
                handler.kind(),
                result,
                event.name()
            );

            if result.is_handled() {
                handled = true;
                if mode == DispatchMode::Interrupt {
                    break;
                }
            }
        }

        debug!(
            "Dispatched '{}' ({:?}) to {} handler(s): handled={}",
            event.name(),
            mode,
            self.handlers.len(),
            handled
        );
        handled
    }

    fn position(&self, kind: &HandlerKind) -> Option<usize> {
        self.handlers.iter().position(|h| &h.kind() == kind)
    }
}

impl std::fmt::Debug for HandlerChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerChain")
            .field("kinds", &self.kinds())
            .finish()
    }
}

/// Identity comparison on the data pointer (vtable pointers may differ across codegen units)
fn same_handler(a: &Arc<dyn MessageHandler>, b: &Arc<dyn MessageHandler>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventName, HandlerResult};
    use parking_lot::Mutex;

    /// Records its name into a shared log and returns a fixed result
    struct Recorder {
        kind: &'static str,
        result: HandlerResult,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl MessageHandler for Recorder {
        fn kind(&self) -> HandlerKind {
            HandlerKind::new_static(self.kind)
        }

        fn handle(&self, _event: &MessageEvent<'_>) -> HandlerResult {
            self.log.lock().push(self.kind);
            self.result
        }
    }

    fn recorder(
        kind: &'static str,
        result: HandlerResult,
        log: &Arc<Mutex<Vec<&'static str>>>,
    ) -> Arc<dyn MessageHandler> {
        Arc::new(Recorder {
            kind,
            result,
            log: Arc::clone(log),
        })
    }

    fn abc_chain(log: &Arc<Mutex<Vec<&'static str>>>) -> HandlerChain {
        let mut chain = HandlerChain::new();
        chain
            .append(recorder("a", HandlerResult::Unhandled, log))
            .append(recorder("b", HandlerResult::Handled, log))
            .append(recorder("c", HandlerResult::Handled, log));
        chain
    }

    #[test]
    fn test_append_same_kind_is_noop() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let first = recorder("a", HandlerResult::Unhandled, &log);
        let second = recorder("a", HandlerResult::Handled, &log);

        let mut chain = HandlerChain::new();
        chain.append(Arc::clone(&first)).append(second);

        let kind = HandlerKind::new_static("a");
        assert_eq!(chain.len(), 1);
        assert!(chain.contains(&kind));
        let found = chain.handler(&kind).unwrap();
        assert!(same_handler(&found, &first));
    }

    #[test]
    fn test_replace_keeps_position() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain = abc_chain(&log);
        let new_a = recorder("a", HandlerResult::Handled, &log);

        chain.replace(Arc::clone(&new_a));

        assert_eq!(chain.len(), 3);
        assert_eq!(chain.kinds()[0], HandlerKind::new_static("a"));
        let found = chain.handler(&HandlerKind::new_static("a")).unwrap();
        assert!(same_handler(&found, &new_a));
    }

    #[test]
    fn test_replace_unseen_kind_appends() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain = abc_chain(&log);

        chain.replace(recorder("d", HandlerResult::Handled, &log));

        assert_eq!(chain.len(), 4);
        assert_eq!(chain.kinds()[3], HandlerKind::new_static("d"));
    }

    #[test]
    fn test_interrupt_stops_at_first_handled() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = abc_chain(&log);

        let handled = chain.dispatch(&MessageEvent::new(EventName::Tap), DispatchMode::Interrupt);

        assert!(handled);
        assert_eq!(*log.lock(), vec!["a", "b"]);
    }

    #[test]
    fn test_broadcast_reaches_every_handler() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = abc_chain(&log);

        let handled = chain.dispatch(&MessageEvent::new(EventName::Tap), DispatchMode::Broadcast);

        assert!(handled);
        assert_eq!(*log.lock(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_unhandled_everywhere_returns_false() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain = HandlerChain::new();
        chain
            .append(recorder("a", HandlerResult::Unhandled, &log))
            .append(recorder("b", HandlerResult::Unhandled, &log));

        assert!(!chain.dispatch(&MessageEvent::new(EventName::Copy), DispatchMode::Interrupt));
        assert_eq!(log.lock().len(), 2);
    }

    #[test]
    fn test_empty_chain_dispatch() {
        let chain = HandlerChain::new();
        assert!(chain.is_empty());
        assert!(!chain.dispatch(&MessageEvent::new(EventName::Tap), DispatchMode::Interrupt));
        assert!(!chain.dispatch(&MessageEvent::new(EventName::Tap), DispatchMode::Broadcast));
    }

    #[test]
    fn test_remove_by_identity() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain = abc_chain(&log);
        let stranger = recorder("b", HandlerResult::Handled, &log);

        // Same kind, different instance
        assert!(!chain.remove(&stranger));
        assert_eq!(chain.len(), 3);

        let b = chain.handler(&HandlerKind::new_static("b")).unwrap();
        assert!(chain.remove(&b));
        assert_eq!(
            chain.kinds(),
            vec![HandlerKind::new_static("a"), HandlerKind::new_static("c")]
        );
    }

    #[test]
    fn test_remove_kind() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain = abc_chain(&log);

        assert_eq!(chain.remove_kind(&HandlerKind::new_static("c")), 1);
        assert_eq!(chain.remove_kind(&HandlerKind::new_static("c")), 0);
        assert!(!chain.contains(&HandlerKind::new_static("c")));
        assert_eq!(chain.len(), 2);
    }
}
