//! The five-hub map of Brazil used for demos and smoke tests.

use citygraph::QueueKind;

use crate::problem::center::DistributionCenter;
use crate::problem::delivery::Delivery;
use crate::problem::network::LogisticsNetwork;
use crate::problem::ProblemError;

pub const CENTERS: [&str; 5] = ["Belém", "Recife", "Brasília", "São Paulo", "Florianópolis"];

/// Travel time in hours.
pub const EDGES: [(&str, &str, u32); 17] = [
    ("Belém", "Manaus", 10),
    ("Recife", "Fortaleza", 5),
    ("Recife", "Salvador", 6),
    ("Brasília", "Salvador", 7),
    ("São Paulo", "Curitiba", 4),
    ("Florianópolis", "Curitiba", 3),
    ("Florianópolis", "Porto Alegre", 5),
    ("São Paulo", "Porto Alegre", 7),
    ("Brasília", "Goiânia", 4),
    ("Brasília", "Campo Grande", 9),
    ("São Paulo", "Rio de Janeiro", 6),
    ("São Paulo", "Vitória", 8),
    ("Recife", "Natal", 4),
    // between centers
    ("Belém", "Brasília", 12),
    ("Recife", "Brasília", 10),
    ("Brasília", "São Paulo", 8),
    ("São Paulo", "Florianópolis", 6),
];

pub const VEHICLE_CAPACITY_KG: u32 = 6000;
pub const VEHICLE_MAX_HOURS: u32 = 22;

/// The sample map with `vehicles_per_center` identical trucks at each hub,
/// named by the first two letters of the city (`Re-1`, `Re-2`, ...).
pub fn brazil_network(vehicles_per_center: usize) -> anyhow::Result<LogisticsNetwork> {
    let mut network = LogisticsNetwork::new(QueueKind::BinaryHeap);
    for (a, b, hours) in EDGES {
        network.add_edge(a, b, hours)?;
    }
    for city in CENTERS {
        network.add_center(DistributionCenter::new(city))?;
        let prefix: String = city.chars().take(2).collect();
        for i in 0..vehicles_per_center {
            network.add_vehicle(
                city,
                &format!("{prefix}-{}", i + 1),
                VEHICLE_CAPACITY_KG,
                VEHICLE_MAX_HOURS,
            )?;
        }
    }
    Ok(network)
}

/// A small fixed batch over the sample map.
pub fn demo_deliveries() -> Result<Vec<Delivery>, ProblemError> {
    [
        ("E01", "Salvador", 1200, 12),
        ("E02", "Curitiba", 2000, 14),
        ("E03", "Manaus", 800, 20),
        ("E04", "Porto Alegre", 2500, 16),
        ("E05", "Fortaleza", 1500, 10),
    ]
    .into_iter()
    .map(|(id, destination, weight, deadline)| Delivery::new(id, destination, weight, deadline))
    .collect()
}
