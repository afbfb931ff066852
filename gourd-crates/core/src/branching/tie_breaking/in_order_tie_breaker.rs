use super::Direction;
use super::TieBreaker;

/// A tie-breaker which simply selects the first variable that it receives with the "best" value
/// according to the provided [`Direction`].
///
/// Offering the variables in increasing index order therefore breaks ties towards the lowest
/// index.
#[derive(Debug)]
pub struct InOrderTieBreaker<Var, Value> {
    /// The selected variable and its value, [`None`] if nothing has been considered yet
    selected: Option<(Var, Value)>,
    direction: Direction,
}

impl<Var, Value> InOrderTieBreaker<Var, Value> {
    pub fn new(direction: Direction) -> Self {
        Self {
            selected: None,
            direction,
        }
    }
}

impl<Var: Copy, Value: PartialOrd> TieBreaker<Var, Value> for InOrderTieBreaker<Var, Value> {
    fn consider(&mut self, variable: Var, value: Value) {
        let improves = match &self.selected {
            None => true,
            Some((_, selected_value)) => match self.direction {
                Direction::Maximum => value > *selected_value,
                Direction::Minimum => value < *selected_value,
            },
        };

        if improves {
            self.selected = Some((variable, value));
        }
    }

    fn select(&mut self) -> Option<Var> {
        self.selected.take().map(|(variable, _)| variable)
    }

    fn get_direction(&self) -> Direction {
        self.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::variables::DomainId;

    #[test]
    fn first_of_equal_minimum_values_is_selected() {
        let mut breaker = InOrderTieBreaker::new(Direction::Minimum);

        breaker.consider(DomainId::new(0), 10);
        breaker.consider(DomainId::new(1), 5);
        breaker.consider(DomainId::new(2), 5);

        assert_eq!(Some(DomainId::new(1)), breaker.select());
    }

    #[test]
    fn maximum_direction_keeps_the_largest() {
        let mut breaker = InOrderTieBreaker::new(Direction::Maximum);

        breaker.consider(DomainId::new(0), 1);
        breaker.consider(DomainId::new(1), 7);
        breaker.consider(DomainId::new(2), 3);

        assert_eq!(Some(DomainId::new(1)), breaker.select());
    }

    #[test]
    fn selecting_resets_the_breaker() {
        let mut breaker = InOrderTieBreaker::new(Direction::Minimum);
        breaker.consider(DomainId::new(0), 1);

        let _ = breaker.select();

        assert_eq!(None, breaker.select());
    }
}
