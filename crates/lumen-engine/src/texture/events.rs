use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::TextureId;

/// Lifecycle notification posted by a [`LogicalTexture`](super::LogicalTexture).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TextureEvent {
    /// The source finished loading.
    Loaded,
    /// Pixel content or dimensions changed.
    Updated,
    /// GPU copies should be released.
    Disposed,
    /// The source failed to load.
    Error,
}

/// Shared queue a subscriber drains at its own pace.
///
/// Single-threaded: a mailbox belongs to one rendering context and is only
/// touched from the thread that owns it.
#[derive(Debug, Clone, Default)]
pub struct Mailbox {
    queue: Rc<RefCell<VecDeque<(TextureId, TextureEvent)>>>,
}

impl Mailbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&self, texture: TextureId, event: TextureEvent) {
        self.queue.borrow_mut().push_back((texture, event));
    }

    /// Removes and returns every pending event in posting order.
    pub fn drain(&self) -> Vec<(TextureId, TextureEvent)> {
        self.queue.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_one_queue() {
        let a = Mailbox::new();
        let b = a.clone();
        let id = TextureId::next();

        a.post(id, TextureEvent::Updated);
        b.post(id, TextureEvent::Disposed);

        assert_eq!(a.len(), 2);
        assert_eq!(
            b.drain(),
            vec![(id, TextureEvent::Updated), (id, TextureEvent::Disposed)]
        );
        assert!(a.is_empty());
    }
}
