//! Identity-keyed stores owned by the coordinators
//!
//! `objects` holds the wrapper objects, one store per entity kind. `callbacks`
//! holds the ordered listener lists scoped to those objects.

pub mod callbacks;
pub mod objects;

pub use callbacks::{CallbackStore, ListenerList};
pub use objects::{HalObject, ObjectRegistry, ObjectStats, ObjectStore};
