//! Application state shared across handlers

use dealdesk_pack::{PackError, RulePack};
use std::sync::Arc;

/// Shared application state. The rule pack is loaded once at startup and
/// read-only afterwards, so handlers share it without locking.
pub struct AppState {
    pub pack: Arc<RulePack>,
}

impl AppState {
    /// Create with the embedded default rule pack.
    pub fn new() -> Result<Self, PackError> {
        Ok(Self {
            pack: Arc::new(RulePack::load_default()?),
        })
    }

    /// Create with an already-loaded pack (fixture packs in tests).
    pub fn with_pack(pack: RulePack) -> Self {
        Self {
            pack: Arc::new(pack),
        }
    }

    /// Create from the environment: `DEALDESK_PACK_DIR` selects a
    /// versioned pack directory, otherwise the embedded pack is used.
    /// Fails fast on a missing or malformed pack.
    pub fn from_env() -> Result<Self, PackError> {
        let pack = match std::env::var("DEALDESK_PACK_DIR") {
            Ok(dir) => {
                tracing::info!("Loading rule pack from {}", dir);
                RulePack::load_dir(&dir)?
            }
            Err(_) => {
                tracing::info!("Loading embedded rule pack");
                RulePack::load_default()?
            }
        };
        Ok(Self::with_pack(pack))
    }
}
