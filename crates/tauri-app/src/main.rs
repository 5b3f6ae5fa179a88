//! Frog Species Registry - Desktop Application
//!
//! A single-user form for recording frog species observations. Species
//! names are encrypted at rest; everything else in the row is plaintext.

#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tauri::State;

use registry_core::{ConservationStatus, FrogRecord, NewFrogRecord, Registry, RegistryError};

/// Application state managed by Tauri
pub struct AppState {
    pub registry: Mutex<Registry>,
}

/// Record response for frontend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    pub id: i64,
    pub species_name: String,
    pub genus: String,
    pub habitat: String,
    pub conservation_status: String,
}

impl From<FrogRecord> for RecordResponse {
    fn from(r: FrogRecord) -> Self {
        Self {
            id: r.id,
            species_name: r.species_name,
            genus: r.genus,
            habitat: r.habitat,
            conservation_status: r.conservation_status.to_string(),
        }
    }
}

// ============================================================================
// Registry Commands
// ============================================================================

#[tauri::command]
fn save_record(
    species_name: String,
    genus: String,
    habitat: String,
    conservation_status: String,
    state: State<'_, AppState>,
) -> Result<i64, String> {
    let status: ConservationStatus = conservation_status
        .parse()
        .map_err(|e: RegistryError| e.to_string())?;

    let record = NewFrogRecord::new(&species_name, &genus, &habitat, status);

    let registry = state
        .registry
        .lock()
        .map_err(|_| "Registry state poisoned".to_string())?;
    registry.save_record(&record).map_err(|e| e.to_string())
}

#[tauri::command]
fn list_records(state: State<'_, AppState>) -> Result<Vec<RecordResponse>, String> {
    let registry = state
        .registry
        .lock()
        .map_err(|_| "Registry state poisoned".to_string())?;
    let records = registry.list_records().map_err(|e| e.to_string())?;
    Ok(records.into_iter().map(RecordResponse::from).collect())
}

#[tauri::command]
fn conservation_statuses() -> Vec<String> {
    ConservationStatus::ALL
        .iter()
        .map(|s| s.to_string())
        .collect()
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let registry = Registry::new().expect("Failed to open registry");
    let app_state = AppState {
        registry: Mutex::new(registry),
    };

    tauri::Builder::default()
        .manage(app_state)
        .invoke_handler(tauri::generate_handler![
            save_record,
            list_records,
            conservation_statuses,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
