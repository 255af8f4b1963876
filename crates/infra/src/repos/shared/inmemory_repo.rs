use std::sync::{Mutex, MutexGuard, PoisonError};

/// Useful functions for creating inmemory repositories

fn lock<T>(collection: &Mutex<Vec<T>>) -> MutexGuard<'_, Vec<T>> {
    // A panic while holding the lock cannot leave a `Vec` half written
    collection.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn insert_many<T: Clone>(vals: &[T], collection: &Mutex<Vec<T>>) -> u64 {
    let mut collection = lock(collection);
    collection.extend_from_slice(vals);
    vals.len() as u64
}

pub fn find_by<T: Clone, F: FnMut(&T) -> bool>(collection: &Mutex<Vec<T>>, mut compare: F) -> Vec<T> {
    let collection = lock(collection);
    collection.iter().filter(|item| compare(item)).cloned().collect()
}

pub fn count<T>(collection: &Mutex<Vec<T>>) -> u64 {
    lock(collection).len() as u64
}

pub fn clear<T>(collection: &Mutex<Vec<T>>) {
    lock(collection).clear();
}
