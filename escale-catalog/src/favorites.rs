use async_trait::async_trait;
use escale_core::repository::FavoritesStore;
use escale_core::CoreResult;
use std::collections::{BTreeSet, HashMap};
use tokio::sync::RwLock;

/// Adds `id` if absent, removes it if present. Returns the new membership.
pub fn toggle_favorite(favorites: &mut BTreeSet<String>, id: &str) -> bool {
    if favorites.remove(id) {
        false
    } else {
        favorites.insert(id.to_string());
        true
    }
}

/// Process-local favourites, used for single-node setups and tests.
#[derive(Default)]
pub struct InMemoryFavorites {
    by_user: RwLock<HashMap<String, BTreeSet<String>>>,
}

impl InMemoryFavorites {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FavoritesStore for InMemoryFavorites {
    async fn toggle(&self, user_id: &str, episode_id: &str) -> CoreResult<bool> {
        let mut guard = self.by_user.write().await;
        let favorites = guard.entry(user_id.to_string()).or_default();
        Ok(toggle_favorite(favorites, episode_id))
    }

    async fn list(&self, user_id: &str) -> CoreResult<BTreeSet<String>> {
        let guard = self.by_user.read().await;
        Ok(guard.get(user_id).cloned().unwrap_or_default())
    }
}
