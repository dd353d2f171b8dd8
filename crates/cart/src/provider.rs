//! Session-scoped cart provider and the handles consumers use.
//!
//! A [`CartProvider`] is created once at application start. It hydrates the
//! cart from storage, owns the authoritative in-memory cart for the rest of
//! the session and runs the background writer. Consumers never touch the
//! provider directly; they receive a [`CartHandle`], which is cheap to clone
//! and pass around.
//!
//! Handles only hold a weak reference to the session. Once the provider is
//! shut down or dropped, every handle call fails with
//! [`CartError::OutsideProvider`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use go_marketplace_core::{Cart, LineItem, NewLineItem};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::config::CartConfig;
use crate::error::{CartError, Result};
use crate::persistence;
use crate::storage::KeyValueStore;

/// State shared between the provider and its handles.
struct Session {
    state: watch::Sender<Cart>,
    /// Bumped once per effective change, always under the state lock.
    revision: Arc<AtomicU64>,
}

impl Session {
    /// Apply `mutation` to the cart, notifying observers only if it reports
    /// a change.
    fn mutate(&self, mutation: impl FnOnce(&mut Cart) -> bool) -> bool {
        self.state.send_if_modified(|cart| {
            let changed = mutation(cart);
            if changed {
                self.revision.fetch_add(1, Ordering::AcqRel);
            }
            changed
        })
    }
}

/// Owner of one cart session.
pub struct CartProvider {
    session: Arc<Session>,
    key: String,
    written: watch::Receiver<u64>,
    writer: JoinHandle<()>,
}

impl CartProvider {
    /// Start a session: hydrate the cart from `storage` and spawn the writer.
    ///
    /// Hydration completes before this returns, so no mutation can run
    /// against a cart that has not been loaded yet. A missing, unreadable or
    /// malformed stored cart starts the session with an empty cart.
    ///
    /// Must be called from within a Tokio runtime.
    #[instrument(skip_all, fields(key = tracing::field::Empty))]
    pub async fn start(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        tracing::Span::current().record("key", key.as_str());

        let cart = hydrate(storage.as_ref(), &key).await;
        let (state, changes) = watch::channel(cart);
        let revision = Arc::new(AtomicU64::new(0));
        let (written_tx, written) = watch::channel(0);

        let writer = persistence::spawn_writer(
            storage,
            key.clone(),
            changes,
            Arc::clone(&revision),
            written_tx,
        );

        Self {
            session: Arc::new(Session { state, revision }),
            key,
            written,
            writer,
        }
    }

    /// Start a session on the on-device store described by `config`.
    pub async fn from_config(config: &CartConfig) -> Self {
        Self::start(config.storage(), config.storage_key.clone()).await
    }

    /// Get a handle to this session's cart.
    #[must_use]
    pub fn cart(&self) -> CartHandle {
        CartHandle {
            session: Arc::downgrade(&self.session),
        }
    }

    /// Storage key the cart is persisted under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Wait until every change made before this call has been written or
    /// has failed to write.
    pub async fn flush(&self) {
        let target = self.session.revision.load(Ordering::Acquire);
        let mut written = self.written.clone();
        if written.wait_for(|done| *done >= target).await.is_err() {
            warn!(revision = target, "Cart writer stopped before flush completed");
        }
    }

    /// End the session.
    ///
    /// Pending changes are flushed and the writer is stopped. Handles handed
    /// out by this provider fail from now on.
    pub async fn shutdown(self) {
        self.flush().await;

        let Self {
            session, writer, ..
        } = self;
        drop(session);

        if let Err(e) = writer.await {
            warn!(error = %e, "Cart writer task failed");
        }
        info!("Cart session ended");
    }
}

impl std::fmt::Debug for CartProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartProvider")
            .field("key", &self.key)
            .field("revision", &self.session.revision.load(Ordering::Relaxed))
            .field("written", &*self.written.borrow())
            .finish_non_exhaustive()
    }
}

/// Consumer-facing access to a session's cart.
#[derive(Clone)]
pub struct CartHandle {
    session: Weak<Session>,
}

impl CartHandle {
    fn session(&self) -> Result<Arc<Session>> {
        self.session.upgrade().ok_or(CartError::OutsideProvider)
    }

    /// Current line-items in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `CartError::OutsideProvider` if the session has ended.
    pub fn products(&self) -> Result<Vec<LineItem>> {
        Ok(self.session()?.state.borrow().items().to_vec())
    }

    /// Current cart, including derived totals.
    ///
    /// # Errors
    ///
    /// Returns `CartError::OutsideProvider` if the session has ended.
    pub fn snapshot(&self) -> Result<Cart> {
        Ok(self.session()?.state.borrow().clone())
    }

    /// Add a product, or bump its quantity if it is already in the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::OutsideProvider` if the session has ended.
    pub fn add_to_cart(&self, item: NewLineItem) -> Result<()> {
        let session = self.session()?;
        let id = item.id.clone();
        let changed = session.mutate(|cart| cart.add(item));
        debug!(product_id = %id, changed, "add_to_cart");
        Ok(())
    }

    /// Bump the quantity of a product. Unknown IDs are ignored.
    ///
    /// # Errors
    ///
    /// Returns `CartError::OutsideProvider` if the session has ended.
    pub fn increment(&self, id: &str) -> Result<()> {
        let changed = self.session()?.mutate(|cart| cart.increment(id));
        debug!(product_id = %id, changed, "increment");
        Ok(())
    }

    /// Lower the quantity of a product by one.
    ///
    /// A product with a single unit stays in the cart unchanged. Unknown IDs
    /// are ignored.
    ///
    /// # Errors
    ///
    /// Returns `CartError::OutsideProvider` if the session has ended.
    pub fn decrement(&self, id: &str) -> Result<()> {
        let changed = self.session()?.mutate(|cart| cart.decrement(id));
        debug!(product_id = %id, changed, "decrement");
        Ok(())
    }

    /// Observe the cart. The receiver is notified after every change.
    ///
    /// # Errors
    ///
    /// Returns `CartError::OutsideProvider` if the session has ended.
    pub fn subscribe(&self) -> Result<watch::Receiver<Cart>> {
        Ok(self.session()?.state.subscribe())
    }
}

impl std::fmt::Debug for CartHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartHandle")
            .field("active", &(self.session.strong_count() > 0))
            .finish()
    }
}

/// Load the stored cart, falling back to an empty one.
async fn hydrate(storage: &dyn KeyValueStore, key: &str) -> Cart {
    match storage.get_item(key).await {
        Ok(None) => {
            debug!("No stored cart, starting empty");
            Cart::new()
        }
        Ok(Some(blob)) => match Cart::from_json(&blob) {
            Ok(cart) => {
                info!(lines = cart.len(), "Cart hydrated");
                cart
            }
            Err(e) => {
                warn!(error = %e, "Stored cart is malformed, starting empty");
                Cart::new()
            }
        },
        Err(e) => {
            warn!(error = %e, "Failed to read stored cart, starting empty");
            Cart::new()
        }
    }
}
