use std::fmt::{Debug, Formatter};

use citygraph::{CityGraph, GraphError, QueueKind, ShortestPathProvider};

use crate::problem::center::DistributionCenter;
use crate::problem::{Num, ProblemError};
use crate::routing::{Router, RouterConfig};

/// The city graph together with the configured distribution centers.
///
/// This is the setup-time view; [`LogisticsNetwork::router`] hands a fresh
/// copy of the fleet to a [`Router`] so the network itself is never mutated
/// by an allocation run.
#[derive(Clone)]
pub struct LogisticsNetwork {
    pub graph: CityGraph<Num>,
    centers: Vec<DistributionCenter>,
}

impl LogisticsNetwork {
    pub fn new(queue: QueueKind) -> Self {
        Self {
            graph: CityGraph::with_queue(queue),
            centers: vec![],
        }
    }

    pub fn add_edge(
        &mut self,
        a: &str,
        b: &str,
        weight: impl Into<Num>,
    ) -> Result<(), GraphError> {
        self.graph.add_edge(a, b, weight.into())
    }

    pub fn add_center(&mut self, center: DistributionCenter) -> Result<(), ProblemError> {
        if self.centers.iter().any(|c| c.city() == center.city()) {
            return Err(ProblemError::DuplicateCenter {
                city: center.city().to_string(),
            });
        }
        for vehicle in center.fleet() {
            if self.vehicle_ids().any(|id| id == vehicle.id()) {
                return Err(ProblemError::DuplicateVehicle {
                    id: vehicle.id().to_string(),
                });
            }
        }
        self.centers.push(center);
        Ok(())
    }

    /// Adds a vehicle to the center in `city`, creating the center on first use.
    pub fn add_vehicle(
        &mut self,
        city: &str,
        id: &str,
        capacity: impl Into<Num>,
        max_hours: impl Into<Num>,
    ) -> Result<(), ProblemError> {
        if self.vehicle_ids().any(|it| it == id) {
            return Err(ProblemError::DuplicateVehicle { id: id.to_string() });
        }
        let idx = match self.centers.iter().position(|c| c.city() == city) {
            Some(idx) => idx,
            None => {
                self.centers.push(DistributionCenter::new(city));
                self.centers.len() - 1
            }
        };
        self.centers[idx].add_vehicle(id, capacity, max_hours)?;
        Ok(())
    }

    pub fn centers(&self) -> &[DistributionCenter] {
        &self.centers
    }

    pub fn num_vehicles(&self) -> usize {
        self.centers.iter().map(|c| c.fleet().len()).sum()
    }

    fn vehicle_ids(&self) -> impl Iterator<Item = &str> {
        self.centers
            .iter()
            .flat_map(|c| c.fleet().iter().map(|v| v.id()))
    }

    pub fn is_center(&self, city: &str) -> bool {
        self.centers.iter().any(|c| c.city() == city)
    }

    /// Graph cities that are not distribution centers, in insertion order.
    pub fn destinations(&self) -> Vec<String> {
        self.graph
            .cities()
            .filter(|city| !self.is_center(city))
            .map(str::to_string)
            .collect()
    }

    /// A router over this graph with an untouched copy of the fleet.
    pub fn router(&self, config: RouterConfig) -> Router<'_, CityGraph<Num>> {
        Router::new(&self.graph, self.centers.clone(), config)
    }
}

impl Debug for LogisticsNetwork {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogisticsNetwork: {} cities, {} edges, {} centers, {} vehicles",
            self.graph.num_cities(),
            self.graph.num_edges(),
            self.centers.len(),
            self.num_vehicles()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicate_centers_and_vehicle_ids() {
        let mut network = LogisticsNetwork::new(QueueKind::BinaryHeap);
        network
            .add_center(DistributionCenter::new("Recife").with_vehicle("T-1", 100, 10).unwrap())
            .unwrap();
        assert!(matches!(
            network.add_center(DistributionCenter::new("Recife")),
            Err(ProblemError::DuplicateCenter { .. })
        ));
        assert!(matches!(
            network.add_center(DistributionCenter::new("Belém").with_vehicle("T-1", 100, 10).unwrap()),
            Err(ProblemError::DuplicateVehicle { .. })
        ));
    }

    #[test]
    fn destinations_exclude_centers() {
        let mut network = LogisticsNetwork::new(QueueKind::BinaryHeap);
        network.add_edge("Recife", "Natal", 4).unwrap();
        network.add_edge("Recife", "Fortaleza", 5).unwrap();
        network.add_center(DistributionCenter::new("Recife")).unwrap();
        assert_eq!(network.destinations(), vec!["Natal", "Fortaleza"]);
    }
}
