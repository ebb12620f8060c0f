//! Selection state for a message list: up/down movement and removal.
//!
//! Movement clamps at both ends, it never wraps. When the selected message is
//! removed (e.g. marked as read), the selection stays at the same position,
//! which now holds the next message.

/// A list of message ids with at most one selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<String>,
    selected: Option<usize>,
}

impl Selection {
    /// Start with the first message selected (if any).
    pub fn new(ids: Vec<String>) -> Self {
        let selected = (!ids.is_empty()).then_some(0);
        Self { ids, selected }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Id of the selected message.
    pub fn selected(&self) -> Option<&str> {
        self.selected.map(|i| self.ids[i].as_str())
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Select a message by id. Returns `false` if it is not in the list.
    pub fn select(&mut self, id: &str) -> bool {
        match self.ids.iter().position(|i| i == id) {
            Some(index) => {
                self.selected = Some(index);
                true
            }
            None => false,
        }
    }

    /// Move one up, stopping at the first message.
    pub fn move_up(&mut self) {
        if let Some(index) = self.selected {
            self.selected = Some(index.saturating_sub(1));
        }
    }

    /// Move one down, stopping at the last message.
    pub fn move_down(&mut self) {
        if self.ids.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(index) => (index + 1).min(self.ids.len() - 1),
            None => 0,
        });
    }

    /// Drop a message from the list. Returns `false` if it was not there.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(position) = self.ids.iter().position(|i| i == id) else {
            return false;
        };
        self.ids.remove(position);

        self.selected = match self.selected {
            _ if self.ids.is_empty() => None,
            Some(index) if index > position => Some(index - 1),
            Some(index) => Some(index.min(self.ids.len() - 1)),
            None => None,
        };
        true
    }
}
