//! Test utilities for TraitCal
//!
//! This module provides an in-memory mock of the storage seam for
//! generator and API tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::{Day, TraitTemplate};
use crate::store::{CalendarFile, Store};

/// In-memory implementation of [`Store`] for testing
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    days: Arc<Mutex<Vec<Day>>>,
    templates: Arc<Mutex<Vec<TraitTemplate>>>,
    calendars: Arc<Mutex<HashMap<&'static str, String>>>,
    fail_next: Arc<Mutex<Option<String>>>,
}

impl MemoryStore {
    /// Create a store pre-loaded with input documents
    pub fn new(days: Vec<Day>, templates: Vec<TraitTemplate>) -> Self {
        Self {
            days: Arc::new(Mutex::new(days)),
            templates: Arc::new(Mutex::new(templates)),
            calendars: Arc::new(Mutex::new(HashMap::new())),
            fail_next: Arc::new(Mutex::new(None)),
        }
    }

    /// Configure the store to fail its next operation
    pub fn fail_next_operation(&self, error_message: &str) {
        *self.fail_next.lock().unwrap() = Some(error_message.to_string());
    }

    /// Read back a written calendar feed, if any
    pub fn calendar(&self, file: CalendarFile) -> Option<String> {
        self.calendars.lock().unwrap().get(file.file_name()).cloned()
    }

    /// The currently persisted day documents
    pub fn days(&self) -> Vec<Day> {
        self.days.lock().unwrap().clone()
    }

    /// The currently persisted trait templates
    pub fn templates(&self) -> Vec<TraitTemplate> {
        self.templates.lock().unwrap().clone()
    }

    fn check_failure(&self) -> Result<()> {
        if let Some(message) = self.fail_next.lock().unwrap().take() {
            return Err(Error::internal(message));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn load_days(&self) -> Result<Vec<Day>> {
        self.check_failure()?;
        Ok(self.days.lock().unwrap().clone())
    }

    async fn load_templates(&self) -> Result<Vec<TraitTemplate>> {
        self.check_failure()?;
        Ok(self.templates.lock().unwrap().clone())
    }

    async fn persist_days(&self, days: &[Day]) -> Result<()> {
        self.check_failure()?;
        *self.days.lock().unwrap() = days.to_vec();
        Ok(())
    }

    async fn persist_templates(&self, templates: &[TraitTemplate]) -> Result<()> {
        self.check_failure()?;
        *self.templates.lock().unwrap() = templates.to_vec();
        Ok(())
    }

    async fn read_calendar(&self, file: CalendarFile) -> Result<String> {
        self.check_failure()?;
        self.calendar(file)
            .ok_or_else(|| Error::not_found(format!("Calendar {} has not been generated", file.file_name())))
    }

    async fn write_calendar(&self, file: CalendarFile, ics: &str) -> Result<()> {
        self.check_failure()?;
        self.calendars
            .lock()
            .unwrap()
            .insert(file.file_name(), ics.to_string());
        Ok(())
    }
}
