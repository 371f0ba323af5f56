pub mod demo;

pub use demo::*;
use multitable::{Entity, Identity};
use serde::{Deserialize, Serialize};

#[derive(Entity, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Student {
    #[pk]
    pub id: Identity,
    pub full_name: String,
    pub gpa: f64,
}

#[derive(Entity, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Teacher {
    #[pk]
    pub id: Identity,
    pub full_name: String,
    pub subject: String,
    #[transient]
    #[serde(default)]
    pub courses: Vec<String>,
}

impl Student {
    pub fn new(full_name: &str, gpa: f64) -> Self {
        Student { id: Identity::from(full_name), full_name: full_name.to_string(), gpa }
    }
}

impl Teacher {
    pub fn new(full_name: &str, subject: &str) -> Self {
        Teacher { id: Identity::from(full_name), full_name: full_name.to_string(), subject: subject.to_string(), courses: Vec::new() }
    }
}
