//! Chat session - the per-conversation interaction context
//!
//! Owns the handler chain and the shared selection state. Created when a
//! conversation opens and dropped with it.

use std::sync::Arc;

use crate::chain::{DispatchMode, HandlerChain};
use crate::config::SessionConfig;
use crate::event::MessageEvent;
use crate::handlers::{ChatActions, MessageActionHandler, SelectionHandler};
use crate::selection::{SelectionNotifier, SharedSelection};

pub struct ChatSession {
    config: SessionConfig,
    chain: HandlerChain,
    selection: SharedSelection,
}

impl ChatSession {
    /// Build a session with the default handlers: selection first, then message actions
    pub fn new(config: SessionConfig, actions: Arc<dyn ChatActions>) -> Self {
        let selection = SelectionNotifier::new().shared();
        let animation = config.edit_animation();

        let mut chain = HandlerChain::new();
        chain
            .append(Arc::new(SelectionHandler::new(
                Arc::clone(&selection),
                animation,
            )))
            .append(Arc::new(
                MessageActionHandler::new(actions).with_selection(Arc::clone(&selection), animation),
            ));

        Self {
            config,
            chain,
            selection,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Dispatch using the configured mode
    pub fn dispatch(&self, event: &MessageEvent<'_>) -> bool {
        self.chain.dispatch(event, self.config.dispatch_mode)
    }

    pub fn dispatch_with(&self, event: &MessageEvent<'_>, mode: DispatchMode) -> bool {
        self.chain.dispatch(event, mode)
    }

    pub fn chain(&self) -> &HandlerChain {
        &self.chain
    }

    /// Register or swap handlers
    pub fn chain_mut(&mut self) -> &mut HandlerChain {
        &mut self.chain
    }

    pub fn selection(&self) -> &SharedSelection {
        &self.selection
    }

    /// Enter or leave edit mode with the configured animation
    pub fn set_editing(&self, editing: bool) {
        self.selection
            .lock()
            .set_editing(editing, self.config.edit_animation());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Completion, EventName, HandlerResult};
    use crate::handler::{HandlerKind, MessageHandler};
    use crate::handlers::MemoryTranscript;
    use crate::item::{ChatItem, ItemId, Role};
    use parking_lot::Mutex;

    fn session() -> (ChatSession, Arc<MemoryTranscript>) {
        let transcript = Arc::new(MemoryTranscript::new(vec![
            ChatItem::new("u1", Role::User, "hi"),
            ChatItem::new("a1", Role::Assistant, "hello"),
        ]));
        let session = ChatSession::new(SessionConfig::default(), transcript.clone());
        (session, transcript)
    }

    /// Counts every event it sees without claiming any
    struct Tally(Mutex<usize>);

    impl MessageHandler for Tally {
        fn kind(&self) -> HandlerKind {
            HandlerKind::new_static("tally")
        }

        fn handle(&self, _event: &MessageEvent<'_>) -> HandlerResult {
            *self.0.lock() += 1;
            HandlerResult::Unhandled
        }
    }

    #[test]
    fn test_default_handlers_in_order() {
        let (session, _) = session();
        assert_eq!(
            session.chain().kinds(),
            vec![SelectionHandler::KIND, MessageActionHandler::KIND]
        );
    }

    #[test]
    fn test_select_then_bulk_delete() {
        let (session, transcript) = session();
        let items = transcript.items();

        assert!(session.dispatch(&MessageEvent::new(EventName::Select).with_target(&items[0])));
        assert!(session.dispatch(&MessageEvent::new(EventName::Tap).with_target(&items[1])));
        assert_eq!(session.selection().lock().selected_count(), 2);

        assert!(session.dispatch(&MessageEvent::new(EventName::Delete)));

        assert!(transcript.is_empty());
        assert!(!session.selection().lock().is_editing());
    }

    #[test]
    fn test_completions_read_selection_during_dispatch() {
        let (session, transcript) = session();
        let items = transcript.items();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let ui_selection = Arc::clone(session.selection());
        let sink = Arc::clone(&seen);
        let completion = Completion::new(move |_result| {
            let selection = ui_selection.lock();
            sink.lock().push((selection.is_editing(), selection.selected_count()));
        });

        session.dispatch(
            &MessageEvent::new(EventName::Select)
                .with_target(&items[0])
                .with_completion(completion.clone()),
        );
        session.dispatch(
            &MessageEvent::new(EventName::Tap)
                .with_target(&items[1])
                .with_completion(completion.clone()),
        );
        session.dispatch(&MessageEvent::new(EventName::Delete).with_completion(completion));

        assert_eq!(*seen.lock(), vec![(true, 1), (true, 2), (false, 0)]);
    }

    #[test]
    fn test_tap_outside_edit_mode_is_unhandled() {
        let (session, transcript) = session();
        let items = transcript.items();

        assert!(!session.dispatch(&MessageEvent::new(EventName::Tap).with_target(&items[0])));
    }

    #[test]
    fn test_broadcast_reaches_extra_handler() {
        let (mut session, transcript) = session();
        let tally = Arc::new(Tally(Mutex::new(0)));
        session.chain_mut().append(tally.clone());
        let items = transcript.items();
        let copy = MessageEvent::new(EventName::Copy).with_target(&items[1]);

        session.dispatch(&copy);
        assert_eq!(*tally.0.lock(), 0);

        session.dispatch_with(&copy, DispatchMode::Broadcast);
        assert_eq!(*tally.0.lock(), 1);
    }

    #[test]
    fn test_set_editing_off_clears_selection() {
        let (session, _) = session();
        session.set_editing(true);
        session.selection().lock().select(&ItemId::from("u1"));

        session.set_editing(false);

        assert_eq!(session.selection().lock().selected_count(), 0);
    }
}
