use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::problem::delivery::Delivery;
use crate::problem::{City, Num, VehicleId};

/// Why a delivery could not be placed on any vehicle.
///
/// Counts are per vehicle attempt, so one vehicle can appear in several
/// counters (e.g. too slow for the deadline and over its hours).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", rename_all = "kebab-case")]
pub enum FailureReason {
    Unreachable { destination: City },
    NoVehicles,
    CapacityInsufficient { vehicles: usize, checked: usize },
    RouteInvalid { attempts: usize },
    DeadlineExceeded { attempts: usize, deadline: Num },
    HoursExceeded { attempts: usize },
    ExistingDeadlineViolated { attempts: usize },
}

impl FailureReason {
    pub fn code(&self) -> &'static str {
        match self {
            FailureReason::Unreachable { .. } => "unreachable",
            FailureReason::NoVehicles => "no-vehicles",
            FailureReason::CapacityInsufficient { .. } => "capacity-insufficient",
            FailureReason::RouteInvalid { .. } => "route-invalid",
            FailureReason::DeadlineExceeded { .. } => "deadline-exceeded",
            FailureReason::HoursExceeded { .. } => "hours-exceeded",
            FailureReason::ExistingDeadlineViolated { .. } => "existing-deadline-violated",
        }
    }
}

impl Display for FailureReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::Unreachable { destination } => write!(
                f,
                "destination '{destination}' is unreachable from every distribution center"
            ),
            FailureReason::NoVehicles => write!(f, "no vehicles in any distribution center"),
            FailureReason::CapacityInsufficient { vehicles, checked } if vehicles == checked => {
                write!(f, "all {checked} vehicles lacked capacity")
            }
            FailureReason::CapacityInsufficient { vehicles, checked } => {
                write!(f, "{vehicles} of {checked} vehicles lacked capacity")
            }
            FailureReason::RouteInvalid { attempts } => {
                write!(f, "{attempts} attempts found no route through all stops")
            }
            FailureReason::DeadlineExceeded { attempts, deadline } => write!(
                f,
                "{attempts} attempts would exceed the delivery's deadline ({deadline}h)"
            ),
            FailureReason::HoursExceeded { attempts } => {
                write!(f, "{attempts} attempts would exceed vehicle operating hours")
            }
            FailureReason::ExistingDeadlineViolated { attempts } => write!(
                f,
                "{attempts} attempts would violate deadlines of deliveries already on the truck"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum AllocationOutcome {
    Allocated {
        vehicle_id: VehicleId,
        center: City,
        route: Vec<City>,
        total_time: Num,
        deadline_met: bool,
    },
    Rejected {
        reasons: Vec<FailureReason>,
    },
}

/// Result for one input delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationRecord {
    pub delivery: Delivery,
    #[serde(flatten)]
    pub outcome: AllocationOutcome,
}

impl AllocationRecord {
    pub fn is_allocated(&self) -> bool {
        matches!(self.outcome, AllocationOutcome::Allocated { .. })
    }

    pub fn vehicle_id(&self) -> Option<&str> {
        match &self.outcome {
            AllocationOutcome::Allocated { vehicle_id, .. } => Some(vehicle_id),
            AllocationOutcome::Rejected { .. } => None,
        }
    }

    pub fn reasons(&self) -> &[FailureReason] {
        match &self.outcome {
            AllocationOutcome::Allocated { .. } => &[],
            AllocationOutcome::Rejected { reasons } => reasons,
        }
    }

    pub fn has_reason(&self, code: &str) -> bool {
        self.reasons().iter().any(|it| it.code() == code)
    }
}

/// One record per input delivery, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AllocationReport {
    pub records: Vec<AllocationRecord>,
}

impl AllocationReport {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn allocated(&self) -> impl Iterator<Item = &AllocationRecord> {
        self.records.iter().filter(|it| it.is_allocated())
    }

    pub fn rejected(&self) -> impl Iterator<Item = &AllocationRecord> {
        self.records.iter().filter(|it| !it.is_allocated())
    }

    pub fn num_allocated(&self) -> usize {
        self.allocated().count()
    }

    pub fn num_rejected(&self) -> usize {
        self.rejected().count()
    }

    pub fn num_late(&self) -> usize {
        self.records
            .iter()
            .filter(|it| {
                matches!(
                    it.outcome,
                    AllocationOutcome::Allocated {
                        deadline_met: false,
                        ..
                    }
                )
            })
            .count()
    }

    pub fn record(&self, delivery_id: &str) -> Option<&AllocationRecord> {
        self.records.iter().find(|it| it.delivery.id() == delivery_id)
    }
}
