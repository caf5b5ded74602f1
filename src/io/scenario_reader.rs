use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ahash::AHashSet;
use anyhow::Context;
use citygraph::QueueKind;
use log::info;

use crate::problem::delivery::Delivery;
use crate::problem::network::LogisticsNetwork;
use crate::problem::Num;
use crate::routing::DeadlinePolicy;

mod toml {
    use std::fs::File;
    use std::io::Read;

    use citygraph::QueueKind;
    use serde::Deserialize;

    use crate::routing::DeadlinePolicy;

    #[derive(Debug, Deserialize)]
    pub struct Config {
        pub network: Network,
        pub fleet: Fleet,
        pub orders: Option<Orders>,
        #[serde(default)]
        pub router: Router,
    }

    #[derive(Debug, Deserialize)]
    pub struct Network {
        pub edges_csv: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct Fleet {
        pub csv: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct Orders {
        pub csv: String,
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct Router {
        pub max_exact_stops: Option<usize>,
        pub deadline_policy: Option<DeadlinePolicy>,
        pub queue: Option<Queue>,
    }

    #[derive(Debug, Clone, Copy, Deserialize)]
    #[serde(rename_all = "kebab-case")]
    pub enum Queue {
        BinaryHeap,
        LinearScan,
    }

    impl From<Queue> for QueueKind {
        fn from(queue: Queue) -> Self {
            match queue {
                Queue::BinaryHeap => QueueKind::BinaryHeap,
                Queue::LinearScan => QueueKind::LinearScan,
            }
        }
    }

    pub fn read_config(path: impl Into<String>) -> anyhow::Result<Config> {
        let mut s = String::new();
        File::open(path.into())?.read_to_string(&mut s)?;
        parse_config(s.as_str())
    }

    pub fn parse_config(s: &str) -> anyhow::Result<Config> {
        Ok(toml::from_str(s)?)
    }
}

/// `[router]` values of a scenario; unset entries fall back to the defaults
/// or to the command line.
#[derive(Debug, Default, Clone, Copy)]
pub struct RouterSettings {
    pub max_exact_stops: Option<usize>,
    pub deadline_policy: Option<DeadlinePolicy>,
}

#[derive(Debug)]
pub struct Scenario {
    pub name: String,
    pub network: LogisticsNetwork,
    pub deliveries: Vec<Delivery>,
    pub router: RouterSettings,
}

#[derive(Debug)]
pub struct IOEdge {
    pub city_a: String,
    pub city_b: String,
    pub weight: Num,
}

#[derive(Debug)]
pub struct IOVehicle {
    pub center: String,
    pub id: String,
    pub capacity: Num,
    pub max_hours: Num,
}

/// Non-empty lines that are not `#` comments, with their 1-based number.
fn data_lines(reader: impl BufRead) -> impl Iterator<Item = anyhow::Result<(usize, String)>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(idx, next_line)| match next_line {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() || trimmed.starts_with('#') {
                    None
                } else {
                    Some(Ok((idx + 1, trimmed.to_string())))
                }
            }
            Err(err) => Some(Err(anyhow::Error::from(err))),
        })
}

fn next_field<'a>(split: &mut impl Iterator<Item = &'a str>, name: &str) -> anyhow::Result<&'a str> {
    let field = split
        .next()
        .with_context(|| format!("expected next split: {name}"))?
        .trim();
    anyhow::ensure!(!field.is_empty(), "empty field: {name}");
    Ok(field)
}

pub fn read_edges(reader: impl BufRead) -> anyhow::Result<Vec<IOEdge>> {
    let mut edges = vec![];
    for next_line in data_lines(reader) {
        let (line_no, line) = next_line?;
        // city_a,city_b,weight
        let mut split = line.split(',');
        let edge = (|| {
            let city_a = next_field(&mut split, "city_a")?.to_string();
            let city_b = next_field(&mut split, "city_b")?.to_string();
            let weight = next_field(&mut split, "weight")?.parse::<Num>()?;
            anyhow::Ok(IOEdge {
                city_a,
                city_b,
                weight,
            })
        })()
        .with_context(|| format!("edge on line {line_no}"))?;
        edges.push(edge);
    }
    Ok(edges)
}

pub fn read_fleet(reader: impl BufRead) -> anyhow::Result<Vec<IOVehicle>> {
    let mut vehicles = vec![];
    for next_line in data_lines(reader) {
        let (line_no, line) = next_line?;
        // center,vehicle_id,capacity_kg,max_hours
        let mut split = line.split(',');
        let vehicle = (|| {
            let center = next_field(&mut split, "center")?.to_string();
            let id = next_field(&mut split, "vehicle_id")?.to_string();
            let capacity = next_field(&mut split, "capacity_kg")?.parse::<Num>()?;
            let max_hours = next_field(&mut split, "max_hours")?.parse::<Num>()?;
            anyhow::Ok(IOVehicle {
                center,
                id,
                capacity,
                max_hours,
            })
        })()
        .with_context(|| format!("vehicle on line {line_no}"))?;
        vehicles.push(vehicle);
    }
    Ok(vehicles)
}

/// Delivery ids must be unique within a file.
pub fn read_orders(reader: impl BufRead) -> anyhow::Result<Vec<Delivery>> {
    let mut deliveries = vec![];
    let mut ids = AHashSet::new();
    for next_line in data_lines(reader) {
        let (line_no, line) = next_line?;
        // id,destination,weight_kg,deadline_hours
        let mut split = line.split(',');
        let delivery = (|| {
            let id = next_field(&mut split, "id")?;
            anyhow::ensure!(ids.insert(id.to_string()), "duplicate delivery id {id}");
            let destination = next_field(&mut split, "destination")?;
            let weight = next_field(&mut split, "weight_kg")?.parse::<Num>()?;
            let deadline = next_field(&mut split, "deadline_hours")?.parse::<Num>()?;
            anyhow::Ok(Delivery::new(id, destination, weight, deadline)?)
        })()
        .with_context(|| format!("order on line {line_no}"))?;
        deliveries.push(delivery);
    }
    Ok(deliveries)
}

fn open(directory: &Path, file: &str) -> anyhow::Result<BufReader<File>> {
    let path = directory.join(file);
    let f = File::open(&path).with_context(|| format!("cannot open {}", path.display()))?;
    Ok(BufReader::new(f))
}

pub(crate) fn load_instance(toml_path: impl Into<String>) -> anyhow::Result<Scenario> {
    let toml_path = toml_path.into();
    let config = toml::read_config(toml_path.clone())
        .with_context(|| format!("reading scenario {toml_path}"))?;
    let path = Path::new(toml_path.as_str());
    let name = path
        .file_stem()
        .map(|it| it.to_string_lossy().to_string())
        .unwrap_or_else(|| toml_path.clone());
    let directory = path.parent().unwrap_or_else(|| Path::new("."));

    let queue = config.router.queue.map(QueueKind::from).unwrap_or_default();
    let mut network = LogisticsNetwork::new(queue);

    let edges = read_edges(open(directory, &config.network.edges_csv)?)
        .with_context(|| format!("reading {}", config.network.edges_csv))?;
    for edge in &edges {
        network
            .add_edge(&edge.city_a, &edge.city_b, edge.weight)
            .with_context(|| format!("edge {} - {}", edge.city_a, edge.city_b))?;
    }

    let vehicles = read_fleet(open(directory, &config.fleet.csv)?)
        .with_context(|| format!("reading {}", config.fleet.csv))?;
    for vehicle in &vehicles {
        network
            .add_vehicle(&vehicle.center, &vehicle.id, vehicle.capacity, vehicle.max_hours)
            .with_context(|| format!("vehicle {}", vehicle.id))?;
    }

    let deliveries = match &config.orders {
        Some(orders) => read_orders(open(directory, &orders.csv)?)
            .with_context(|| format!("reading {}", orders.csv))?,
        None => vec![],
    };

    info!(
        "scenario {name}: {} edges, {} vehicles, {} orders",
        edges.len(),
        vehicles.len(),
        deliveries.len()
    );

    Ok(Scenario {
        name,
        network,
        deliveries,
        router: RouterSettings {
            max_exact_stops: config.router.max_exact_stops,
            deadline_policy: config.router.deadline_policy,
        },
    })
}
