use fitslot_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `trainers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Trainer {
    pub id: DbId,
    pub name: String,
    /// IANA timezone identifier the trainer's schedule is expressed in.
    pub timezone: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a trainer.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTrainer {
    pub name: String,
    pub timezone: String,
}
