use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use egram_core::StateError;

use crate::state::StateTag;
use crate::store::StateStore;

/// Per-user view over the shared [`StateStore`], handed to handlers that
/// registered with the event+context signature.
#[derive(Debug, Clone)]
pub struct FsmContext {
    user_id: i64,
    store: Arc<StateStore>,
}

impl FsmContext {
    pub fn new(user_id: i64, store: Arc<StateStore>) -> Self {
        Self { user_id, store }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn set_state<I>(&self, tag: StateTag, data: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        self.store.set_state(tag, self.user_id, data);
    }

    pub fn get_state(&self) -> Option<String> {
        self.store.get_state(self.user_id)
    }

    pub fn get_data(&self) -> HashMap<String, Value> {
        self.store.get_data(self.user_id)
    }

    pub fn set_data<I>(&self, data: I) -> Result<(), StateError>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        self.store.set_data(self.user_id, data)
    }

    pub fn clear_data(&self) -> Result<(), StateError> {
        self.store.clear_data(self.user_id)
    }

    /// Ends the conversation: deletes the user's record entirely.
    pub fn finish(&self) {
        self.store.remove_state(self.user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_context_delegates_to_store() {
        let store = Arc::new(StateStore::new());
        let ctx = FsmContext::new(5, store.clone());

        ctx.set_state(StateTag::new("Flow", "ASKED"), [("q".to_string(), json!("name"))]);
        assert_eq!(store.get_state(5), Some("Flow:ASKED".to_string()));
        assert_eq!(ctx.get_data().get("q"), Some(&json!("name")));

        ctx.finish();
        assert_eq!(ctx.get_state(), None);
    }

    #[test]
    fn test_set_state_keeps_previous_data() {
        let store = Arc::new(StateStore::new());
        let ctx = FsmContext::new(5, store);

        ctx.set_state(StateTag::new("Flow", "A"), [("k".to_string(), json!(1))]);
        ctx.set_state(StateTag::new("Flow", "B"), []);
        assert_eq!(ctx.get_data().get("k"), Some(&json!(1)));
    }
}
