use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::{App, Plugin, PluginError};

type Slot = Arc<dyn Any + Send + Sync>;

/// Shared application state, one container per state type.
///
/// Containers are created on first use with `S::default()` and live as long
/// as the store. Clones of the store share the same containers.
#[derive(Clone, Default)]
pub struct Store {
    states: Arc<RwLock<HashMap<TypeId, Slot>>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn use_state<S>(&self) -> Arc<tokio::sync::RwLock<S>>
    where
        S: Default + Send + Sync + 'static,
    {
        let mut states = self.states.write().unwrap_or_else(PoisonError::into_inner);
        let slot = states
            .entry(TypeId::of::<tokio::sync::RwLock<S>>())
            .or_insert_with(|| Arc::new(tokio::sync::RwLock::new(S::default())) as Slot)
            .clone();

        slot.downcast::<tokio::sync::RwLock<S>>()
            .unwrap_or_else(|_| unreachable!("store slot is keyed by its own type"))
    }

    pub fn len(&self) -> usize {
        self.states
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").field("states", &self.len()).finish()
    }
}

impl Plugin for Store {
    const NAME: &'static str = "store";
    type Options = ();

    fn requires(&self) -> &'static [&'static str] {
        &["router"]
    }

    fn install(self, app: &mut App, _options: ()) -> Result<(), PluginError> {
        app.provide(self);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        value: u32,
    }

    #[derive(Default)]
    struct Draft {
        text: String,
    }

    #[tokio::test]
    async fn same_type_shares_one_container() {
        let store = Store::new();

        store.use_state::<Counter>().write().await.value += 1;
        store.use_state::<Counter>().write().await.value += 1;

        assert_eq!(store.use_state::<Counter>().read().await.value, 2);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn different_types_are_isolated() {
        let store = Store::new();
        store.use_state::<Draft>().write().await.text.push_str("hello");

        assert_eq!(store.use_state::<Counter>().read().await.value, 0);
        assert_eq!(store.use_state::<Draft>().read().await.text, "hello");
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = Store::new();
        let clone = store.clone();
        clone.use_state::<Counter>().write().await.value = 7;

        assert_eq!(store.use_state::<Counter>().read().await.value, 7);
    }
}
