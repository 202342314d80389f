//! Selection notifier
//!
//! Edit-mode flag plus the set of selected chat items, broadcast to
//! weakly-held observers after every mutation. Observers that have been
//! dropped are pruned on the next notification pass.
//!
//! Leaving edit mode clears the selected set.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::debug;

use crate::item::ItemId;

/// Receives edit-mode and selection updates
///
/// Called synchronously from the mutating call. Implementations must not
/// call back into the notifier.
pub trait SelectionObserver: Send + Sync {
    /// `duration` is an animation hint for the UI only
    fn editing_changed(&self, editing: bool, duration: Duration);

    /// Full selected set after the change (not a delta)
    fn selection_changed(&self, selected: &HashSet<ItemId>);
}

/// Selection state as shared between a session and its handlers
pub type SharedSelection = Arc<Mutex<SelectionNotifier>>;

#[derive(Default)]
pub struct SelectionNotifier {
    editing: bool,
    selected: HashSet<ItemId>,
    observers: Vec<Weak<dyn SelectionObserver>>,
}

impl SelectionNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap into the shared form handlers hold
    pub fn shared(self) -> SharedSelection {
        Arc::new(Mutex::new(self))
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Enter or leave edit mode
    ///
    /// Leaving clears the selection and always reports the empty set.
    pub fn set_editing(&mut self, editing: bool, duration: Duration) {
        debug!("Selection: editing={} ({:?})", editing, duration);
        self.editing = editing;
        if !editing {
            self.selected.clear();
        }

        self.notify(|observer| observer.editing_changed(editing, duration));
        if !editing {
            let selected = &self.selected;
            Self::each_live(&mut self.observers, |observer| {
                observer.selection_changed(selected)
            });
        }
    }

    /// Flip membership of an item. Returns whether it is now selected.
    pub fn toggle_selection(&mut self, item: &ItemId) -> bool {
        let now_selected = if self.selected.remove(item) {
            false
        } else {
            self.selected.insert(item.clone());
            true
        };
        self.notify_selection();
        now_selected
    }

    /// Returns whether the item was newly added
    pub fn select(&mut self, item: &ItemId) -> bool {
        let added = self.selected.insert(item.clone());
        self.notify_selection();
        added
    }

    /// Returns whether the item was selected before
    pub fn deselect(&mut self, item: &ItemId) -> bool {
        let removed = self.selected.remove(item);
        self.notify_selection();
        removed
    }

    pub fn select_all<'a, I>(&mut self, items: I)
    where
        I: IntoIterator<Item = &'a ItemId>,
    {
        self.selected.extend(items.into_iter().cloned());
        self.notify_selection();
    }

    pub fn deselect_all(&mut self) {
        self.selected.clear();
        self.notify_selection();
    }

    pub fn is_selected(&self, item: &ItemId) -> bool {
        self.selected.contains(item)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn selected_items(&self) -> &HashSet<ItemId> {
        &self.selected
    }

    /// Selected ids in a stable order (for display and batch actions)
    pub fn selected_sorted(&self) -> Vec<ItemId> {
        let mut ids: Vec<_> = self.selected.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Register an observer. Adding the same observer twice is a no-op.
    pub fn add_observer<O: SelectionObserver + 'static>(&mut self, observer: &Arc<O>) {
        self.insert_observer(Arc::downgrade(observer) as Weak<dyn SelectionObserver>);
    }

    /// Same as [`SelectionNotifier::add_observer`] for already type-erased observers
    pub fn add_dyn_observer(&mut self, observer: &Arc<dyn SelectionObserver>) {
        self.insert_observer(Arc::downgrade(observer));
    }

    pub fn remove_observer<O: SelectionObserver + 'static>(&mut self, observer: &Arc<O>) {
        self.drop_observer(&(Arc::downgrade(observer) as Weak<dyn SelectionObserver>));
    }

    pub fn remove_dyn_observer(&mut self, observer: &Arc<dyn SelectionObserver>) {
        self.drop_observer(&Arc::downgrade(observer));
    }

    /// Number of observers still alive
    pub fn observer_count(&self) -> usize {
        self.observers.iter().filter(|w| w.strong_count() > 0).count()
    }

    fn insert_observer(&mut self, weak: Weak<dyn SelectionObserver>) {
        if !self.observers.iter().any(|w| same_observer(w, &weak)) {
            self.observers.push(weak);
        }
    }

    fn drop_observer(&mut self, weak: &Weak<dyn SelectionObserver>) {
        self.observers.retain(|w| !same_observer(w, weak));
    }

    fn notify_selection(&mut self) {
        debug!("Selection: {} item(s) selected", self.selected.len());
        let selected = &self.selected;
        Self::each_live(&mut self.observers, |observer| {
            observer.selection_changed(selected)
        });
    }

    fn notify(&mut self, f: impl Fn(&dyn SelectionObserver)) {
        Self::each_live(&mut self.observers, f);
    }

    /// Call `f` on every live observer, dropping the dead ones
    fn each_live(
        observers: &mut Vec<Weak<dyn SelectionObserver>>,
        f: impl Fn(&dyn SelectionObserver),
    ) {
        observers.retain(|weak| match weak.upgrade() {
            Some(observer) => {
                f(observer.as_ref());
                true
            }
            None => false,
        });
    }
}

impl std::fmt::Debug for SelectionNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionNotifier")
            .field("editing", &self.editing)
            .field("selected", &self.selected)
            .field("observers", &self.observers.len())
            .finish()
    }
}

fn same_observer(a: &Weak<dyn SelectionObserver>, b: &Weak<dyn SelectionObserver>) -> bool {
    std::ptr::addr_eq(a.as_ptr(), b.as_ptr())
}
