//! Recycling id allocation shared by tiles and brushes

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Hands out numeric ids, reusing released ids (oldest first) before minting new ones
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdAllocator {
    current_id: u32,
    #[serde(default)]
    recycle_list: VecDeque<u32>,
}

impl IdAllocator {
    /// Create an allocator whose first fresh id is `first`
    pub fn new(first: u32) -> Self {
        Self {
            current_id: first,
            recycle_list: VecDeque::new(),
        }
    }

    /// Take the next id
    pub fn next_id(&mut self) -> u32 {
        if let Some(id) = self.recycle_list.pop_front() {
            return id;
        }
        let id = self.current_id;
        self.current_id += 1;
        id
    }

    /// Return an id so it can be handed out again
    pub fn recycle(&mut self, id: u32) {
        if id < self.current_id && !self.recycle_list.contains(&id) {
            self.recycle_list.push_back(id);
        }
    }

    /// Mark an externally chosen id as taken
    pub fn reserve(&mut self, id: u32) {
        self.recycle_list.retain(|&r| r != id);
        if id >= self.current_id {
            self.current_id = id + 1;
        }
    }

    /// Forget every id handed out so far
    pub fn reset(&mut self, first: u32) {
        self.current_id = first;
        self.recycle_list.clear();
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential() {
        let mut ids = IdAllocator::default();
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.next_id(), 2);
        assert_eq!(ids.next_id(), 3);
    }

    #[test]
    fn test_recycled_ids_come_back_first_in_first_out() {
        let mut ids = IdAllocator::default();
        for _ in 0..4 {
            ids.next_id();
        }
        ids.recycle(3);
        ids.recycle(1);
        ids.recycle(1);

        assert_eq!(ids.next_id(), 3);
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.next_id(), 5);
    }

    #[test]
    fn test_reserve_skips_taken_ids() {
        let mut ids = IdAllocator::default();
        ids.reserve(7);
        assert_eq!(ids.next_id(), 8);

        ids.recycle(2);
        ids.reserve(2);
        assert_eq!(ids.next_id(), 9);
    }

    #[test]
    fn test_json_shape() {
        let mut ids = IdAllocator::default();
        ids.next_id();
        ids.next_id();
        ids.recycle(1);

        let json = serde_json::to_value(&ids).unwrap();
        assert_eq!(json["currentId"], 3);
        assert_eq!(json["recycleList"], serde_json::json!([1]));
    }
}
