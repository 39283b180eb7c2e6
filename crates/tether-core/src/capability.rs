// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Named, optionally-registered feature components.
//!
//! A [`CapabilityTable`] maps a [`CapabilityId`] to a shared component. Lookups
//! go through a typed [`CapabilityKey`], so a caller asking for the keyboard
//! gets an `Arc<dyn KeyboardCapability>` back, or `None` when nothing was
//! registered. Absence means "feature unavailable", never an error.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// The identifier a capability is registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CapabilityId(&'static str);

impl CapabilityId {
    /// Creates an identifier from a static name.
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Returns the identifier's name.
    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A typed handle pairing a [`CapabilityId`] with the component type stored
/// under it. `T` is usually a trait object such as `dyn KeyboardCapability`.
pub struct CapabilityKey<T: ?Sized> {
    id: CapabilityId,
    _component: PhantomData<fn() -> Box<T>>,
}

impl<T: ?Sized> CapabilityKey<T> {
    /// Creates a key for the given identifier.
    pub const fn new(id: CapabilityId) -> Self {
        Self {
            id,
            _component: PhantomData,
        }
    }

    /// Returns the identifier behind this key.
    pub const fn id(&self) -> CapabilityId {
        self.id
    }
}

impl<T: ?Sized> Clone for CapabilityKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for CapabilityKey<T> {}

impl<T: ?Sized> fmt::Debug for CapabilityKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CapabilityKey").field(&self.id).finish()
    }
}

/// Reacts to hardware keyboard attachment changes.
pub trait KeyboardCapability: Send + Sync {
    /// A hardware keyboard became available.
    fn set_hardware_keyboard_open(&self);
    /// The hardware keyboard was hidden or detached.
    fn set_hardware_keyboard_closed(&self);
}

/// The key under which the keyboard integration registers itself.
pub const KEYBOARD: CapabilityKey<dyn KeyboardCapability> =
    CapabilityKey::new(CapabilityId::new("keyboard"));

/// A table of registered capabilities keyed by [`CapabilityId`].
///
/// Each entry stores an `Arc<T>` behind `dyn Any`, where `T` is the type named
/// by the key used at registration.
#[derive(Default)]
pub struct CapabilityTable {
    entries: HashMap<CapabilityId, Box<dyn Any + Send + Sync>>,
}

impl CapabilityTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registers `component` under `key`.
    ///
    /// Returns `true` if an earlier registration under the same identifier was
    /// replaced.
    pub fn register<T>(&mut self, key: CapabilityKey<T>, component: Arc<T>) -> bool
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let replaced = self.entries.insert(key.id(), Box::new(component)).is_some();
        if replaced {
            log::warn!("Capability '{}' registered twice; keeping the latest.", key.id());
        } else {
            log::debug!("Capability '{}' registered.", key.id());
        }
        replaced
    }

    /// Looks up the component registered under `key`.
    ///
    /// Returns `None` if nothing was registered, or if the entry was registered
    /// with a different component type.
    #[must_use]
    pub fn get<T>(&self, key: CapabilityKey<T>) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let entry = self.entries.get(&key.id())?;
        let component = entry.downcast_ref::<Arc<T>>();
        if component.is_none() {
            log::warn!(
                "Capability '{}' is registered with a different component type.",
                key.id()
            );
        }
        component.cloned()
    }

    /// Returns `true` if anything is registered under `id`.
    #[must_use]
    pub fn contains(&self, id: CapabilityId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Returns the registered identifiers in sorted order.
    pub fn ids(&self) -> Vec<CapabilityId> {
        let mut ids: Vec<_> = self.entries.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Returns the number of registered capabilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no capability is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for CapabilityTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityTable")
            .field("ids", &self.ids())
            .finish()
    }
}
