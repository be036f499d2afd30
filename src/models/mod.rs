//! Core data models for fleetcost
//!
//! Input records (equipment facts, category assumptions) and the identifiers
//! they use. Derived records live next to the services that produce them.

pub mod category;
pub mod equipment;
pub mod ids;

pub use category::{
    CategoryDefaults, CategoryDefaultsOverride, CategoryTable, UsageUnit, FALLBACK_CATEGORY,
};
pub use equipment::{AllocationType, Equipment, EquipmentStatus, FinancingType, RecoveryMethod};
pub use ids::EquipmentId;
