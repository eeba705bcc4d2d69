//! The process-wide user-state store shared by every dispatched handler.

use std::collections::HashMap;

use dashmap::DashMap;
use serde_json::Value;
use tracing::debug;

use egram_core::StateError;

use crate::state::StateTag;

/// One user's conversation record. Exists only while a state is set.
#[derive(Debug, Clone)]
pub struct UserStateRecord {
    pub state: StateTag,
    pub data: HashMap<String, Value>,
}

/// Mapping from user id to conversation state and associated data.
///
/// Owned by the dispatcher and shared (behind `Arc`) with every concurrently
/// executing handler; the backing map is sharded, so pooled dispatch mutates
/// it without a separate locking discipline.
#[derive(Debug, Default)]
pub struct StateStore {
    records: DashMap<i64, UserStateRecord>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upserts the record for `user_id`: replaces the state tag and merges
    /// `data` over any existing data (existing keys not named are preserved).
    pub fn set_state<I>(&self, tag: StateTag, user_id: i64, data: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut entry = self
            .records
            .entry(user_id)
            .or_insert_with(|| UserStateRecord {
                state: tag,
                data: HashMap::new(),
            });
        entry.state = tag;
        entry.data.extend(data);
        debug!(user_id, state = %tag, "state set");
    }

    /// The stringified current tag, or `None` when no record exists.
    pub fn get_state(&self, user_id: i64) -> Option<String> {
        self.records.get(&user_id).map(|r| r.state.to_string())
    }

    /// The current tag itself; used by handler matching.
    pub fn get_tag(&self, user_id: i64) -> Option<StateTag> {
        self.records.get(&user_id).map(|r| r.state)
    }

    /// A copy of the user's data, or an empty map when no record exists.
    pub fn get_data(&self, user_id: i64) -> HashMap<String, Value> {
        self.records
            .get(&user_id)
            .map(|r| r.data.clone())
            .unwrap_or_default()
    }

    /// Merges `data` into the user's record. The state must have been set
    /// first.
    pub fn set_data<I>(&self, user_id: i64, data: I) -> Result<(), StateError>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut entry = self
            .records
            .get_mut(&user_id)
            .ok_or(StateError::NotSet(user_id))?;
        entry.data.extend(data);
        Ok(())
    }

    /// Deletes the whole record. A missing user is a no-op.
    pub fn remove_state(&self, user_id: i64) {
        if self.records.remove(&user_id).is_some() {
            debug!(user_id, "state removed");
        }
    }

    /// Empties the user's data in place, keeping the state tag. Errors when
    /// no record exists.
    pub fn clear_data(&self, user_id: i64) -> Result<(), StateError> {
        let mut entry = self
            .records
            .get_mut(&user_id)
            .ok_or(StateError::NotSet(user_id))?;
        entry.data.clear();
        Ok(())
    }
}
