use thiserror::Error;

pub mod center;
pub mod delivery;
pub mod network;
pub mod vehicle;

pub use crate::utils::num::Num;

/// Cities are opaque names.
pub type City = String;

pub type DeliveryId = String;
pub type VehicleId = String;

/// Errors raised while setting up deliveries and fleets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProblemError {
    #[error("delivery {id} has a negative weight ({weight})")]
    NegativeWeight { id: DeliveryId, weight: Num },
    #[error("delivery {id} has a negative deadline ({deadline})")]
    NegativeDeadline { id: DeliveryId, deadline: Num },
    #[error("vehicle {id} needs a positive capacity, got {capacity}")]
    NonPositiveCapacity { id: VehicleId, capacity: Num },
    #[error("vehicle {id} has negative operating hours ({hours})")]
    NegativeHours { id: VehicleId, hours: Num },
    #[error("vehicle id {id} is used more than once")]
    DuplicateVehicle { id: VehicleId },
    #[error("distribution center {city} is configured more than once")]
    DuplicateCenter { city: City },
}
