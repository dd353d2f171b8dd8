//! Best-effort background persistence of the cart.
//!
//! Each session spawns one writer task. The task watches the cart state and,
//! whenever it changes, serializes the latest cart and overwrites the stored
//! blob. Changes that arrive while a write is in flight are coalesced: only
//! the newest cart is written next. Failures are logged and otherwise
//! ignored; nothing is retried.
//!
//! The writer publishes the revision of every cart it has finished with
//! (written or failed), which is what [`crate::CartProvider::flush`] waits on.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use go_marketplace_core::Cart;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::storage::{KeyValueStore, StorageError};

/// Spawn the writer task for one session.
///
/// The task ends once the cart state's sender is dropped and the last
/// pending change has been handled.
pub(crate) fn spawn_writer(
    storage: Arc<dyn KeyValueStore>,
    key: String,
    state: watch::Receiver<Cart>,
    revision: Arc<AtomicU64>,
    written: watch::Sender<u64>,
) -> JoinHandle<()> {
    tokio::spawn(run_writer(storage, key, state, revision, written))
}

#[instrument(skip_all, fields(key = %key))]
async fn run_writer(
    storage: Arc<dyn KeyValueStore>,
    key: String,
    mut state: watch::Receiver<Cart>,
    revision: Arc<AtomicU64>,
    written: watch::Sender<u64>,
) {
    debug!("Cart writer started");

    while state.changed().await.is_ok() {
        // Revisions are bumped while the state lock is held, so reading it
        // under the borrow pairs the snapshot with its exact revision.
        let (encoded, snapshot_revision) = {
            let cart = state.borrow_and_update();
            (cart.to_json(), revision.load(Ordering::Acquire))
        };

        match write(storage.as_ref(), &key, encoded).await {
            Ok(()) => debug!(revision = snapshot_revision, "Cart persisted"),
            Err(e) => warn!(
                error = %e,
                revision = snapshot_revision,
                "Failed to persist cart; keeping in-memory state"
            ),
        }

        written.send_replace(snapshot_revision);
    }

    info!("Cart writer stopped");
}

async fn write(
    storage: &dyn KeyValueStore,
    key: &str,
    encoded: Result<String, serde_json::Error>,
) -> Result<(), StorageError> {
    storage.set_item(key, encoded?).await
}
