use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use tracing::error;

use glyph_config::{commands, AVATAR_CACHE_TTL_SECS};
use glyph_core::ProfileId;

use crate::ports::BackendGateway;

#[derive(Debug, Clone)]
struct CachedAvatar {
    data_url: String,
    fetched_at: DateTime<Utc>,
}

/// Avatar data URLs keyed by profile id, refetched once they go stale.
pub struct AvatarCache {
    gateway: Arc<dyn BackendGateway>,
    ttl: Duration,
    entries: Mutex<HashMap<ProfileId, CachedAvatar>>,
}

impl AvatarCache {
    pub fn new(gateway: Arc<dyn BackendGateway>) -> Self {
        Self::with_ttl(gateway, Duration::seconds(AVATAR_CACHE_TTL_SECS))
    }

    pub fn with_ttl(gateway: Arc<dyn BackendGateway>, ttl: Duration) -> Self {
        Self {
            gateway,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Empty string when there is no id or the backend has no avatar.
    pub async fn avatar(&self, profile_id: &str) -> String {
        if profile_id.is_empty() {
            return String::new();
        }

        let now = Utc::now();
        if let Some(hit) = self.fresh(profile_id, now) {
            return hit;
        }

        match self.gateway.fetch_avatar(profile_id).await {
            Ok(Some(data_url)) if !data_url.is_empty() => {
                self.lock().insert(
                    profile_id.to_string(),
                    CachedAvatar {
                        data_url: data_url.clone(),
                        fetched_at: Utc::now(),
                    },
                );
                data_url
            }
            Ok(_) => String::new(),
            Err(e) => {
                error!(command = commands::FETCH_AVATAR, id = %profile_id, "Error fetching avatar: {e}");
                String::new()
            }
        }
    }

    fn fresh(&self, profile_id: &str, now: DateTime<Utc>) -> Option<String> {
        let mut entries = self.lock();
        let entry = entries.get(profile_id)?;
        if now - entry.fetched_at < self.ttl {
            return Some(entry.data_url.clone());
        }
        entries.remove(profile_id);
        None
    }

    pub fn invalidate(&self, profile_id: &str) {
        self.lock().remove(profile_id);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<ProfileId, CachedAvatar>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
