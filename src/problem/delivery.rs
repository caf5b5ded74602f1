use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::problem::{City, DeliveryId, Num, ProblemError};

/// An order to carry `weight` kg to `destination` within `deadline` hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Delivery {
    id: DeliveryId,
    destination: City,
    weight: Num,
    deadline: Num,
    /// serving distribution center, decided by the router
    origin: Option<City>,
}

impl Delivery {
    pub fn new(
        id: impl Into<DeliveryId>,
        destination: impl Into<City>,
        weight: impl Into<Num>,
        deadline: impl Into<Num>,
    ) -> Result<Self, ProblemError> {
        let id = id.into();
        let weight = weight.into();
        let deadline = deadline.into();
        if weight < Num::ZERO {
            return Err(ProblemError::NegativeWeight { id, weight });
        }
        if deadline < Num::ZERO {
            return Err(ProblemError::NegativeDeadline { id, deadline });
        }
        Ok(Self {
            id,
            destination: destination.into(),
            weight,
            deadline,
            origin: None,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn weight(&self) -> Num {
        self.weight
    }

    pub fn deadline(&self) -> Num {
        self.deadline
    }

    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// Records the serving center. Only the first call has an effect.
    pub(crate) fn set_origin(&mut self, city: &str) {
        if self.origin.is_none() {
            self.origin = Some(city.to_string());
        }
    }

    pub fn is_met_at(&self, arrival: Num) -> bool {
        arrival <= self.deadline
    }
}

impl Display for Delivery {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> {} | {}kg | deadline {}h",
            self.id, self.destination, self.weight, self.deadline
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_values() {
        assert!(matches!(
            Delivery::new("E1", "Recife", -1, 10),
            Err(ProblemError::NegativeWeight { .. })
        ));
        assert!(matches!(
            Delivery::new("E1", "Recife", 10, -0.5),
            Err(ProblemError::NegativeDeadline { .. })
        ));
    }

    #[test]
    fn origin_is_written_once() {
        let mut delivery = Delivery::new("E1", "Natal", 500, 12).unwrap();
        assert_eq!(delivery.origin(), None);
        delivery.set_origin("Recife");
        delivery.set_origin("Belém");
        assert_eq!(delivery.origin(), Some("Recife"));
    }

    #[test]
    fn deadline_is_inclusive() {
        let delivery = Delivery::new("E1", "Natal", 500, 12).unwrap();
        assert!(delivery.is_met_at(Num::from(12)));
        assert!(!delivery.is_met_at(Num::from(12.001)));
    }
}
