/// Flat-file persistence for the CMS collections.
///
/// Each collection is one pretty-printed JSON document under the data
/// directory. [`JsonFile`] owns the per-file lock and the atomic write.
pub mod json_file;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub use json_file::JsonFile;

/// Records addressable by their string id.
pub trait Record {
    fn id(&self) -> &str;
}

pub fn position<T: Record>(items: &[T], id: &str) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}

/// Generates an id that no record in `items` carries yet.
pub fn unused_id<T: Record>(items: &[T]) -> String {
    loop {
        let id = crate::utils::generate_id();
        if position(items, &id).is_none() {
            return id;
        }
    }
}

/// Set whenever a JSON document is written, cleared by the auto-save.
#[derive(Clone, Default, Debug)]
pub struct DirtyFlag(Arc<AtomicBool>);

impl DirtyFlag {
    pub fn mark(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clears the flag, returning whether it was set.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }
}
