use std::fmt::{Display, Formatter};

use crate::problem::vehicle::Vehicle;
use crate::problem::{City, Num, ProblemError, VehicleId};

/// A hub in `city` owning a fleet.
///
/// The fleet is only extended during setup; once handed to the router the
/// membership is fixed.
#[derive(Debug, Clone)]
pub struct DistributionCenter {
    city: City,
    fleet: Vec<Vehicle>,
}

impl DistributionCenter {
    pub fn new(city: impl Into<City>) -> Self {
        Self {
            city: city.into(),
            fleet: vec![],
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn fleet(&self) -> &[Vehicle] {
        &self.fleet
    }

    pub(crate) fn fleet_mut(&mut self) -> &mut [Vehicle] {
        &mut self.fleet
    }

    /// Adds a vehicle based at this center.
    pub fn add_vehicle(
        &mut self,
        id: impl Into<VehicleId>,
        capacity: impl Into<Num>,
        max_hours: impl Into<Num>,
    ) -> Result<&Vehicle, ProblemError> {
        let id = id.into();
        let capacity = capacity.into();
        let max_hours = max_hours.into();
        if capacity <= Num::ZERO {
            return Err(ProblemError::NonPositiveCapacity { id, capacity });
        }
        if max_hours < Num::ZERO {
            return Err(ProblemError::NegativeHours {
                id,
                hours: max_hours,
            });
        }
        if self.fleet.iter().any(|v| v.id() == id) {
            return Err(ProblemError::DuplicateVehicle { id });
        }
        self.fleet
            .push(Vehicle::new(id, self.city.clone(), capacity, max_hours));
        Ok(&self.fleet[self.fleet.len() - 1])
    }

    pub fn with_vehicle(
        mut self,
        id: impl Into<VehicleId>,
        capacity: impl Into<Num>,
        max_hours: impl Into<Num>,
    ) -> Result<Self, ProblemError> {
        self.add_vehicle(id, capacity, max_hours)?;
        Ok(self)
    }
}

impl Display for DistributionCenter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} vehicles)", self.city, self.fleet.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vehicles_start_at_the_center() {
        let center = DistributionCenter::new("Recife")
            .with_vehicle("Re-1", 5000, 20)
            .unwrap();
        assert_eq!(center.fleet().len(), 1);
        assert_eq!(center.fleet()[0].depot(), "Recife");
        assert_eq!(center.to_string(), "Recife (1 vehicles)");
    }

    #[test]
    fn rejects_invalid_vehicles() {
        let mut center = DistributionCenter::new("Recife");
        assert!(matches!(
            center.add_vehicle("Re-1", 0, 20),
            Err(ProblemError::NonPositiveCapacity { .. })
        ));
        assert!(matches!(
            center.add_vehicle("Re-1", 100, -1),
            Err(ProblemError::NegativeHours { .. })
        ));
        center.add_vehicle("Re-1", 100, 10).unwrap();
        assert!(matches!(
            center.add_vehicle("Re-1", 100, 10),
            Err(ProblemError::DuplicateVehicle { .. })
        ));
    }
}
