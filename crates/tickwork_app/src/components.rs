//! Game components.

use tickwork_entity::Component;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    #[must_use]
    pub fn full(max: i32) -> Self {
        Self { current: max, max }
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.current <= 0
    }

    /// Heal by `amount`, capped at `max`. Returns the amount actually healed.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.current;
        self.current = (self.current + amount).min(self.max);
        self.current - before
    }
}

impl Component for Health {
    fn type_name() -> &'static str {
        "Health"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heal_caps_at_max() {
        let mut health = Health { current: 95, max: 100 };
        assert_eq!(health.heal(10), 5);
        assert_eq!(health, Health::full(100));
    }

    #[test]
    fn test_dead_at_zero() {
        assert!(Health { current: 0, max: 10 }.is_dead());
        assert!(!Health::full(1).is_dead());
    }
}
