//! The cache gateway state machine.
//!
//! `install` populates a named cache from a fixed manifest, all or
//! nothing: if any entry fails, nothing is committed and the gateway
//! stays inactive. Once active, `fetch` answers cached paths locally and
//! passes everything else through to the network without caching it.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use futures::future::try_join_all;
use strum_macros::{AsRefStr, Display};

use crate::GatewayError;
use crate::host::{DisplayedNotification, NotificationHost};
use crate::network::{Network, Response};
use crate::push::PushPayload;

/// Name of the shell cache.
pub const DEFAULT_CACHE_NAME: &str = "incident-watch-v1";

/// Shell assets needed to boot the dashboard offline.
pub const DEFAULT_MANIFEST: &[&str] = &[
    "/",
    "/index.html",
    "/styles.css",
    "/app.js",
    "/data-province.js",
];

/// Most displayed notifications remembered for click handling. Older
/// ones are forgotten and their clicks report an unknown id.
pub const MAX_SHOWN_NOTIFICATIONS: usize = 100;

/// Cache name and manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Name of the cache; bump it to invalidate an old install.
    pub cache_name: String,
    /// Ordered asset paths to precache.
    pub manifest: Vec<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            cache_name: DEFAULT_CACHE_NAME.to_string(),
            manifest: DEFAULT_MANIFEST.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Lifecycle of the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum GatewayState {
    /// Not installed yet.
    Idle,
    /// Install in progress.
    Installing,
    /// Cache populated; fetches are answered from it.
    Active,
    /// The last install failed.
    Failed,
}

/// Cache-first asset gateway plus push delivery.
pub struct CacheGateway {
    config: GatewayConfig,
    network: Arc<dyn Network>,
    host: Arc<dyn NotificationHost>,
    state: RwLock<GatewayState>,
    cache: RwLock<HashMap<String, Response>>,
    shown: Mutex<VecDeque<(String, String)>>,
}

impl CacheGateway {
    /// Creates an idle gateway.
    #[must_use]
    pub fn new(
        config: GatewayConfig,
        network: Arc<dyn Network>,
        host: Arc<dyn NotificationHost>,
    ) -> Self {
        Self {
            config,
            network,
            host,
            state: RwLock::new(GatewayState::Idle),
            cache: RwLock::new(HashMap::new()),
            shown: Mutex::new(VecDeque::new()),
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> GatewayState {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns `true` once an install has completed.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state() == GatewayState::Active
    }

    /// Gateway configuration.
    #[must_use]
    pub const fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn set_state(&self, state: GatewayState) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = state;
    }

    /// Fetches every manifest entry and commits them to the cache.
    ///
    /// The gateway becomes active only after every entry is fetched.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InstallFailed`] naming the first entry that
    /// failed or answered with a non-2xx status. The cache is left
    /// untouched and the state becomes [`GatewayState::Failed`].
    pub async fn install(&self) -> Result<(), GatewayError> {
        log::info!(
            "Installing cache {} ({} entries)",
            self.config.cache_name,
            self.config.manifest.len()
        );
        self.set_state(GatewayState::Installing);

        let fetches = self.config.manifest.iter().map(|path| async move {
            let response = self
                .network
                .fetch(path)
                .await
                .map_err(|e| GatewayError::InstallFailed {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;
            if !response.is_success() {
                return Err(GatewayError::InstallFailed {
                    path: path.clone(),
                    reason: format!("status {}", response.status),
                });
            }
            Ok((path.clone(), response))
        });

        match try_join_all(fetches).await {
            Ok(entries) => {
                *self.cache.write().unwrap_or_else(PoisonError::into_inner) =
                    entries.into_iter().collect();
                self.set_state(GatewayState::Active);
                log::info!("Cache {} active", self.config.cache_name);
                Ok(())
            }
            Err(e) => {
                self.set_state(GatewayState::Failed);
                log::error!("Cache install failed: {e}");
                Err(e)
            }
        }
    }

    /// Answers `path` from the cache when active and cached, otherwise
    /// from the network. Network responses are never cached.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] if the pass-through fetch fails.
    pub async fn fetch(&self, path: &str) -> Result<Response, GatewayError> {
        if self.is_active() {
            let hit = self
                .cache
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .get(path)
                .cloned();
            if let Some(response) = hit {
                log::trace!("cache hit {path}");
                return Ok(response);
            }
        }

        log::debug!("cache miss {path}, going to network");
        self.network.fetch(path).await
    }

    /// Number of notifications still awaiting a click.
    #[must_use]
    pub fn shown_len(&self) -> usize {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Number of cached entries.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Handles an inbound push: parses the payload and shows a system
    /// notification for it.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidPushPayload`] for malformed payloads
    /// or [`GatewayError::Host`] if the notification can't be shown.
    pub fn push(&self, payload: &[u8]) -> Result<DisplayedNotification, GatewayError> {
        let notification = PushPayload::parse(payload)?.into_notification();
        self.host.show_notification(&notification)?;

        {
            let mut shown = self.shown.lock().unwrap_or_else(PoisonError::into_inner);
            shown.push_back((notification.id.clone(), notification.options.url.clone()));
            while shown.len() > MAX_SHOWN_NOTIFICATIONS {
                if let Some((id, _)) = shown.pop_front() {
                    log::debug!("Forgetting unclicked notification {id}");
                }
            }
        }
        log::debug!("Displayed push notification {}", notification.id);

        Ok(notification)
    }

    /// Handles a click on a displayed notification: dismisses it and opens
    /// its url. Returns the opened url.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UnknownNotification`] if `id` was never
    /// shown, was already clicked, or was pushed out by newer ones, or [`GatewayError::Host`] if the
    /// window can't be opened.
    pub fn notification_click(&self, id: &str) -> Result<String, GatewayError> {
        let url = {
            let mut shown = self.shown.lock().unwrap_or_else(PoisonError::into_inner);
            shown
                .iter()
                .position(|(shown_id, _)| shown_id == id)
                .and_then(|index| shown.remove(index))
                .map(|(_, url)| url)
        }
        .ok_or_else(|| GatewayError::UnknownNotification { id: id.to_string() })?;

        self.host.close(id);
        self.host.open_window(&url)?;
        Ok(url)
    }
}
