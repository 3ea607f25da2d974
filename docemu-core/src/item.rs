//! Core traits for items stored in a container.
//!
//! A container does not enforce a single item type: values of different types can live
//! side by side under distinct keys. Storage is type-erased through [`AnyItem`], and typed
//! retrieval checks the runtime type so that a mismatch looks exactly like a missing item.

use bson::{Bson, de::deserialize_from_bson, ser::serialize_to_bson};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Value, from_value, to_value};
use std::any::{Any, type_name};
use std::fmt;

use crate::{error::EmulatorResult, identifier::Identifiable};

/// Bound satisfied by every value that can be stored in a container.
///
/// This trait is implemented automatically for all `Identifiable + Clone + Send + Sync`
/// types with a `'static` lifetime.
pub trait Item: Identifiable + Clone + Send + Sync + 'static {}

impl<T> Item for T where T: Identifiable + Clone + Send + Sync + 'static {}

/// Extension trait providing serialization utilities for items.
///
/// This trait is automatically implemented for all serde-enabled [`Item`]s.
pub trait ItemExt: Item + Serialize + DeserializeOwned {
    /// Converts this item to a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn to_json(&self) -> EmulatorResult<Value>;

    /// Creates an item from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails or the structure is invalid.
    fn from_json(value: Value) -> EmulatorResult<Self>;

    /// Converts this item to a BSON value.
    fn to_bson(&self) -> EmulatorResult<Bson>;

    /// Creates an item from a BSON value.
    fn from_bson(bson: Bson) -> EmulatorResult<Self>;
}

impl<T: Item + Serialize + DeserializeOwned> ItemExt for T {
    fn to_json(&self) -> EmulatorResult<Value> {
        Ok(to_value(self)?)
    }

    fn from_json(value: Value) -> EmulatorResult<Self> {
        Ok(from_value(value)?)
    }

    fn to_bson(&self) -> EmulatorResult<Bson> {
        Ok(serialize_to_bson(self)?)
    }

    fn from_bson(bson: Bson) -> EmulatorResult<Self> {
        Ok(deserialize_from_bson(bson)?)
    }
}

/// Type-erased item, as held by a document store.
///
/// Most users never see this trait; it exists so that a single store can hold values of
/// many item types and hand them back only to callers asking for the right one.
pub trait AnyItem: Send + Sync {
    /// Returns a reference to the item as a generic `Any` type.
    fn as_any(&self) -> &dyn Any;

    /// Returns the name of the concrete item type, for diagnostics.
    fn item_type_name(&self) -> &'static str;

    /// Clones the item into a new boxed `AnyItem`.
    fn clone_box(&self) -> Box<dyn AnyItem>;
}

impl dyn AnyItem {
    /// Returns `true` if this trait object contains a `T`.
    pub fn is<T: Item>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Attempts to downcast a reference to a specific item type.
    ///
    /// Returns `Some(&T)` if this trait object contains a `T`, otherwise `None`.
    pub fn downcast_ref<T: Item>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Clones the contained value out as a `T`, if it is one.
    pub fn cloned<T: Item>(&self) -> Option<T> {
        self.downcast_ref::<T>().cloned()
    }
}

impl<T: Item> AnyItem for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn item_type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn clone_box(&self) -> Box<dyn AnyItem> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn AnyItem> {
    fn clone(&self) -> Box<dyn AnyItem> {
        self.clone_box()
    }
}

impl fmt::Debug for dyn AnyItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyItem")
            .field("type", &self.item_type_name())
            .finish()
    }
}

/// Conversion trait for converting any item into a boxed `AnyItem`.
pub trait IntoAnyItem {
    /// Converts this value into a boxed `AnyItem`.
    fn into_any_item(self) -> Box<dyn AnyItem>;
}

impl<T: Item> IntoAnyItem for T {
    fn into_any_item(self) -> Box<dyn AnyItem> {
        Box::new(self) as Box<dyn AnyItem>
    }
}
