//! Common test utilities for rprefs integration tests
//!
//! Provides shared fixtures: a store that records every commit, a store that
//! can be told to reject writes, and the domain types used across tests.

#![allow(dead_code)]

use rprefs::{Edit, Error, MemoryStore, NativeValue, PreferenceEnum, PreferenceStore, Result};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

// =============================================================================
// Domain Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SomeEnum {
    Default,
    Nice,
    Crap,
}

impl PreferenceEnum for SomeEnum {
    fn name(&self) -> &'static str {
        match self {
            SomeEnum::Default => "DEFAULT",
            SomeEnum::Nice => "NICE",
            SomeEnum::Crap => "CRAP",
        }
    }

    fn variants() -> &'static [Self] {
        &[SomeEnum::Default, SomeEnum::Nice, SomeEnum::Crap]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub age: u32,
}

impl Person {
    pub fn new(name: &str, age: u32) -> Self {
        Self {
            name: name.to_string(),
            age,
        }
    }
}

/// Shape `Person` had before `age` was added
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonOldFormat {
    pub name: String,
}

// =============================================================================
// Recording Store
// =============================================================================

/// Memory store that keeps a log of every committed batch
#[derive(Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    commits: Mutex<Vec<Vec<Edit>>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All batches committed so far
    pub fn commits(&self) -> Vec<Vec<Edit>> {
        self.commits.lock().unwrap().clone()
    }

    /// The most recent batch
    pub fn last_commit(&self) -> Option<Vec<Edit>> {
        self.commits.lock().unwrap().last().cloned()
    }

    /// Put a raw value without going through an accessor
    pub fn seed(&self, key: &str, value: NativeValue) {
        self.inner
            .commit(vec![Edit::Put {
                key: key.to_string(),
                value,
            }])
            .unwrap();
    }
}

impl PreferenceStore for RecordingStore {
    fn contains(&self, key: &str) -> Result<bool> {
        self.inner.contains(key)
    }

    fn get(&self, key: &str) -> Result<Option<NativeValue>> {
        self.inner.get(key)
    }

    fn commit(&self, edits: Vec<Edit>) -> Result<()> {
        self.commits.lock().unwrap().push(edits.clone());
        self.inner.commit(edits)
    }

    fn keys(&self) -> Result<Vec<String>> {
        self.inner.keys()
    }

    fn backend_name(&self) -> &'static str {
        "recording"
    }
}

// =============================================================================
// Failing Store
// =============================================================================

/// Memory store whose commits can be switched to fail
#[derive(Default)]
pub struct FailingStore {
    inner: MemoryStore,
    failing: AtomicBool,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl PreferenceStore for FailingStore {
    fn contains(&self, key: &str) -> Result<bool> {
        self.inner.contains(key)
    }

    fn get(&self, key: &str) -> Result<Option<NativeValue>> {
        self.inner.get(key)
    }

    fn commit(&self, edits: Vec<Edit>) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::FileWrite {
                path: "/dev/full".into(),
                source: std::io::Error::other("no space left on device"),
            });
        }
        self.inner.commit(edits)
    }

    fn keys(&self) -> Result<Vec<String>> {
        self.inner.keys()
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }
}
