#![allow(dead_code)]

use multitable::async_trait::async_trait;
use multitable::{Collection, Entity, Predicate};
use std::fmt;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum Call<T> {
    Find(Predicate<T>),
    InsertOne(T),
    ReplaceOne(Predicate<T>, T),
    DeleteOne(Predicate<T>),
    DeleteMany(Predicate<T>),
}

#[derive(Debug)]
pub struct Unavailable;

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("collection unavailable")
    }
}

impl std::error::Error for Unavailable {}

/// Collection double answering `find` with canned documents and recording every call.
pub struct RecordingCollection<T> {
    found: Mutex<Vec<T>>,
    calls: Mutex<Vec<Call<T>>>,
    deleted: u64,
    failing: bool,
}

impl<T: Clone> RecordingCollection<T> {
    pub fn new() -> Self {
        RecordingCollection { found: Mutex::new(Vec::new()), calls: Mutex::new(Vec::new()), deleted: 0, failing: false }
    }

    pub fn finding(documents: Vec<T>) -> Self {
        let collection = Self::new();
        *collection.found.lock().unwrap() = documents;
        collection
    }

    pub fn deleting(mut self, deleted: u64) -> Self {
        self.deleted = deleted;
        self
    }

    pub fn failing() -> Self {
        RecordingCollection { failing: true, ..Self::new() }
    }

    pub fn calls(&self) -> Vec<Call<T>> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call<T>) -> Result<(), Unavailable> {
        self.calls.lock().unwrap().push(call);
        if self.failing { Err(Unavailable) } else { Ok(()) }
    }
}

#[async_trait]
impl<T: Entity + Clone> Collection<T> for RecordingCollection<T> {
    type Error = Unavailable;

    async fn find(&self, filter: &Predicate<T>) -> Result<Vec<T>, Unavailable> {
        self.record(Call::Find(filter.clone()))?;
        Ok(self.found.lock().unwrap().clone())
    }

    async fn insert_one(&self, document: &T) -> Result<(), Unavailable> {
        self.record(Call::InsertOne(document.clone()))
    }

    async fn replace_one(&self, filter: &Predicate<T>, replacement: &T) -> Result<(), Unavailable> {
        self.record(Call::ReplaceOne(filter.clone(), replacement.clone()))
    }

    async fn delete_one(&self, filter: &Predicate<T>) -> Result<bool, Unavailable> {
        self.record(Call::DeleteOne(filter.clone()))?;
        Ok(true)
    }

    async fn delete_many(&self, filter: &Predicate<T>) -> Result<u64, Unavailable> {
        self.record(Call::DeleteMany(filter.clone()))?;
        Ok(self.deleted)
    }
}
