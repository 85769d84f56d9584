use marquee_protocol::ElementId;

/// Page-wide state shared by every overlay: scroll lock and focus.
///
/// Owned by the overlay manager, which is its only writer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PageState {
    /// Number of open exclusive overlays holding the scroll lock.
    scroll_locks: usize,
    /// Element the host last reported (or we last moved) focus to.
    focused: Option<ElementId>,
}

impl PageState {
    /// Take a scroll lock. Returns true when the page just became locked.
    pub(crate) fn lock_scroll(&mut self) -> bool {
        self.scroll_locks += 1;
        self.scroll_locks == 1
    }

    /// Release a scroll lock. Returns true when the page just became unlocked.
    pub(crate) fn unlock_scroll(&mut self) -> bool {
        if self.scroll_locks == 0 {
            return false;
        }
        self.scroll_locks -= 1;
        self.scroll_locks == 0
    }

    pub(crate) fn scroll_locks(&self) -> usize {
        self.scroll_locks
    }

    pub(crate) fn focused(&self) -> Option<&ElementId> {
        self.focused.as_ref()
    }

    pub(crate) fn set_focused(&mut self, element: Option<ElementId>) {
        self.focused = element;
    }
}
