//! Id allocation for cross-references in saved configurations

use super::node::ChannelHandle;
use std::collections::HashMap;
use std::rc::Rc;

/// Maps channels to small integer ids for one save or load session.
///
/// Id `0` is reserved for "not connected". The table holds a handle to every
/// channel it has seen, so ids stay valid until the table is dropped.
pub struct IdTable {
    next_id: usize,
    ids: HashMap<usize, usize>,
    channels: HashMap<usize, ChannelHandle>,
}

fn channel_key(channel: &ChannelHandle) -> usize {
    Rc::as_ptr(channel) as *const () as usize
}

impl IdTable {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ids: HashMap::new(),
            channels: HashMap::new(),
        }
    }

    /// Id of `channel`, allocating the next free one on first sight
    pub fn emplace(&mut self, channel: &ChannelHandle) -> usize {
        let key = channel_key(channel);
        if let Some(id) = self.ids.get(&key) {
            return *id;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.ids.insert(key, id);
        self.channels.insert(id, Rc::clone(channel));
        id
    }

    /// Record that `channel` is known as `id`, replacing any previous owner of
    /// that id. Used when loading, where ids come from the document.
    pub fn insert(&mut self, id: usize, channel: ChannelHandle) {
        if id == 0 {
            return;
        }
        if let Some(previous) = self.channels.get(&id) {
            self.ids.remove(&channel_key(previous));
        }
        self.ids.insert(channel_key(&channel), id);
        self.channels.insert(id, channel);
        self.next_id = self.next_id.max(id + 1);
    }

    /// Channel known as `id`
    pub fn get(&self, id: usize) -> Option<ChannelHandle> {
        self.channels.get(&id).cloned()
    }

    /// Id already assigned to `channel`, if any
    pub fn id_of(&self, channel: &ChannelHandle) -> Option<usize> {
        self.ids.get(&channel_key(channel)).copied()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl Default for IdTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::SignalChannel;
    use crate::runtime::sample::SignalType;

    fn channel(name: &str) -> ChannelHandle {
        Rc::new(SignalChannel::new(name, "#ffffff", SignalType::Digital))
    }

    #[test]
    fn test_emplace_is_stable() {
        let mut table = IdTable::new();
        let a = channel("a");
        let b = channel("b");

        assert_eq!(table.emplace(&a), 1);
        assert_eq!(table.emplace(&b), 2);
        assert_eq!(table.emplace(&a), 1);
        assert_eq!(table.len(), 2);
        assert!(Rc::ptr_eq(&table.get(2).unwrap(), &b));
        assert!(table.get(0).is_none());
    }

    #[test]
    fn test_insert_replaces_and_advances() {
        let mut table = IdTable::new();
        let a = channel("a");
        let b = channel("b");

        table.insert(5, a.clone());
        assert_eq!(table.id_of(&a), Some(5));

        table.insert(5, b.clone());
        assert_eq!(table.id_of(&a), None);
        assert_eq!(table.id_of(&b), Some(5));

        let c = channel("c");
        assert_eq!(table.emplace(&c), 6);

        table.insert(0, c.clone());
        assert_eq!(table.id_of(&c), Some(6));
    }
}
