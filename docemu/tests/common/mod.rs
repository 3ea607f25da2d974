//! Shared fixtures for docemu integration tests.

#![allow(dead_code)]

use docemu::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Identifiable)]
pub struct Person {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

impl Person {
    pub fn new(id: &str, first_name: &str, last_name: &str) -> Self {
        Self {
            id: id.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        }
    }
}

/// A second item type sharing a container with [`Person`].
#[derive(Debug, Clone, PartialEq, Eq, Identifiable)]
pub struct Pet {
    pub id: String,
    pub owner: Option<String>,
}
