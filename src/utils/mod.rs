use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

use crate::problem::delivery::Delivery;
use crate::problem::{City, ProblemError};

pub mod logging;
pub mod num;
pub mod validator;

pub type Random = Pcg64Mcg;

pub fn create_seeded_rng(seed: i128) -> Random {
    let mut rng = Pcg64Mcg::from_seed(seed.to_le_bytes());
    // discard the first three
    rng.next_u64();
    rng.next_u64();
    rng.next_u64();
    rng
}

/// Bounds for synthetic orders, both inclusive.
#[derive(Debug, Clone, Copy)]
pub struct DeliveryGeneratorSettings {
    pub min_weight: u32,
    pub max_weight: u32,
    pub min_deadline: u32,
    pub max_deadline: u32,
}

impl Default for DeliveryGeneratorSettings {
    fn default() -> Self {
        Self {
            min_weight: 500,
            max_weight: 3000,
            min_deadline: 8,
            max_deadline: 200,
        }
    }
}

/// `count` orders `E000, E001, ...` to uniformly drawn destinations, with
/// integral weight (kg) and deadline (h) drawn from `settings`.
pub fn generate_deliveries(
    rng: &mut Random,
    count: usize,
    destinations: &[City],
    settings: &DeliveryGeneratorSettings,
) -> Result<Vec<Delivery>, ProblemError> {
    if destinations.is_empty() {
        return Ok(vec![]);
    }
    (0..count)
        .map(|i| {
            let destination = &destinations[rng.gen_range(0..destinations.len())];
            let weight = rng.gen_range(settings.min_weight..=settings.max_weight);
            let deadline = rng.gen_range(settings.min_deadline..=settings.max_deadline);
            Delivery::new(format!("E{i:03}"), destination.as_str(), weight, deadline)
        })
        .collect()
}
