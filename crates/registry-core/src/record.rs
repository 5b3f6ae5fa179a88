//! Frog observation record types

use std::fmt;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::ToSql;
use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};

/// IUCN conservation status of a species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConservationStatus {
    LeastConcern,
    NearThreatened,
    Vulnerable,
    Endangered,
    CriticallyEndangered,
    Extinct,
}

impl ConservationStatus {
    /// All statuses, in the order the form presents them
    pub const ALL: [ConservationStatus; 6] = [
        ConservationStatus::LeastConcern,
        ConservationStatus::NearThreatened,
        ConservationStatus::Vulnerable,
        ConservationStatus::Endangered,
        ConservationStatus::CriticallyEndangered,
        ConservationStatus::Extinct,
    ];

    /// Human-readable form, as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            ConservationStatus::LeastConcern => "Least Concern",
            ConservationStatus::NearThreatened => "Near Threatened",
            ConservationStatus::Vulnerable => "Vulnerable",
            ConservationStatus::Endangered => "Endangered",
            ConservationStatus::CriticallyEndangered => "Critically Endangered",
            ConservationStatus::Extinct => "Extinct",
        }
    }
}

impl Default for ConservationStatus {
    fn default() -> Self {
        // The form pre-selects Least Concern
        Self::LeastConcern
    }
}

impl fmt::Display for ConservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConservationStatus {
    type Err = RegistryError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Least Concern" => Ok(ConservationStatus::LeastConcern),
            "Near Threatened" => Ok(ConservationStatus::NearThreatened),
            "Vulnerable" => Ok(ConservationStatus::Vulnerable),
            "Endangered" => Ok(ConservationStatus::Endangered),
            "Critically Endangered" => Ok(ConservationStatus::CriticallyEndangered),
            "Extinct" => Ok(ConservationStatus::Extinct),
            other => Err(RegistryError::Validation(format!(
                "Unknown conservation status: {}",
                other
            ))),
        }
    }
}

impl ToSql for ConservationStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for ConservationStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: RegistryError| FromSqlError::Other(Box::new(e)))
    }
}

/// A new observation as entered in the form, before an id is assigned
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFrogRecord {
    pub species_name: String,
    pub genus: String,
    pub habitat: String,
    pub conservation_status: ConservationStatus,
}

impl NewFrogRecord {
    /// Build a record from form input, trimming surrounding whitespace
    pub fn new(
        species_name: &str,
        genus: &str,
        habitat: &str,
        conservation_status: ConservationStatus,
    ) -> Self {
        Self {
            species_name: species_name.trim().to_string(),
            genus: genus.trim().to_string(),
            habitat: habitat.trim().to_string(),
            conservation_status,
        }
    }

    /// All text fields are required; whitespace-only input counts as empty
    pub fn validate(&self) -> Result<()> {
        if self.species_name.trim().is_empty() {
            return Err(RegistryError::Validation(
                "Species name is required".to_string(),
            ));
        }
        if self.genus.trim().is_empty() {
            return Err(RegistryError::Validation("Genus is required".to_string()));
        }
        if self.habitat.trim().is_empty() {
            return Err(RegistryError::Validation("Habitat is required".to_string()));
        }
        Ok(())
    }
}

/// A stored observation row, with the species name decrypted (or replaced
/// by the sentinel marker when decryption failed)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrogRecord {
    pub id: i64,
    pub species_name: String,
    pub genus: String,
    pub habitat: String,
    pub conservation_status: ConservationStatus,
}
