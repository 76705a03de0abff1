//! Persistent cart store.
//!
//! The whole cart is serialised as one JSON array under [`CART_STORAGE_KEY`].
//! Reading never fails: a missing, unreadable, or corrupt value is an empty
//! cart. A successful write raises the cart-changed signal.

use std::sync::{Mutex, PoisonError};

use tracing::{debug, warn};

use super::events::{CartEvents, CartSubscription};
use super::storage::{KeyValueStorage, StorageError};
use super::Cart;

/// Storage key holding the serialised cart.
pub const CART_STORAGE_KEY: &str = "shopping_cart";

/// Durable cart storage with change notification.
pub trait CartStore: Send + Sync {
    /// Current cart; empty when nothing valid is stored.
    fn read(&self) -> Cart;

    /// Persist a cart and notify listeners.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend rejects the write. Listeners are
    /// not notified in that case.
    fn write(&self, cart: &Cart) -> Result<(), StorageError>;

    /// Read, change, and write the cart as one step.
    ///
    /// Updates through the same store never interleave, however many
    /// services share it.
    ///
    /// # Errors
    ///
    /// Returns an error if the changed cart cannot be written.
    fn update(&self, apply: impl FnOnce(&mut Cart)) -> Result<Cart, StorageError>;

    /// Register a cart-changed listener.
    fn subscribe(&self) -> CartSubscription;
}

/// [`CartStore`] over any [`KeyValueStorage`].
#[derive(Debug)]
pub struct PersistentCartStore<S> {
    storage: S,
    events: CartEvents,
    update_lock: Mutex<()>,
}

impl<S: KeyValueStorage> PersistentCartStore<S> {
    #[must_use]
    pub fn new(storage: S) -> Self {
        Self::with_events(storage, CartEvents::new())
    }

    /// Share an existing signal, e.g. one already handed to UI listeners.
    #[must_use]
    pub const fn with_events(storage: S, events: CartEvents) -> Self {
        Self {
            storage,
            events,
            update_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub const fn events(&self) -> &CartEvents {
        &self.events
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }
}

impl<S: KeyValueStorage> CartStore for PersistentCartStore<S> {
    fn read(&self) -> Cart {
        let raw = match self.storage.get_item(CART_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Cart::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read cart from storage, using empty cart");
                return Cart::new();
            }
        };

        match serde_json::from_str::<Cart>(&raw) {
            Ok(cart) => cart,
            Err(e) => {
                warn!(error = %e, "Stored cart is corrupt, using empty cart");
                Cart::new()
            }
        }
    }

    fn write(&self, cart: &Cart) -> Result<(), StorageError> {
        let raw = serde_json::to_string(cart)?;
        self.storage.set_item(CART_STORAGE_KEY, &raw)?;
        self.events.notify();
        debug!(lines = cart.len(), "Cart persisted");
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut Cart)) -> Result<Cart, StorageError> {
        let _guard = self.update_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut cart = self.read();
        apply(&mut cart);
        self.write(&cart)?;
        Ok(cart)
    }

    fn subscribe(&self) -> CartSubscription {
        self.events.subscribe()
    }
}

impl<T: CartStore> CartStore for std::sync::Arc<T> {
    fn read(&self) -> Cart {
        (**self).read()
    }

    fn write(&self, cart: &Cart) -> Result<(), StorageError> {
        (**self).write(cart)
    }

    fn update(&self, apply: impl FnOnce(&mut Cart)) -> Result<Cart, StorageError> {
        (**self).update(apply)
    }

    fn subscribe(&self) -> CartSubscription {
        (**self).subscribe()
    }
}
