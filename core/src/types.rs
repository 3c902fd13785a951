//! Domain DTOs for the BlackRoad API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! integration tests catch any drift between the two crates. Field names on
//! the wire are snake_case, matching the Rust names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A deployable offering managed by the BlackRoad service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// A product running in a named environment. `status` is server-defined.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deployment {
    pub id: String,
    pub product_id: String,
    pub environment: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Request payload for creating a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Request payload for creating a deployment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewDeployment {
    pub product_id: String,
    pub environment: String,
}
