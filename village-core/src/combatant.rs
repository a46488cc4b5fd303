//! Hit point bookkeeping shared by heroes and monsters.

/// Current and maximum hit points.
///
/// `current` never leaves `[0, maximum]`; the only mutators are
/// [`Vitals::take_damage`], [`Vitals::heal`] and [`Vitals::raise_maximum`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vitals {
    current: u32,
    maximum: u32,
}

impl Vitals {
    pub fn new(maximum: u32) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    /// Rebuild vitals from stored values, clamping `current` to `maximum`.
    pub fn restore(current: u32, maximum: u32) -> Self {
        Self {
            current: current.min(maximum),
            maximum,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn maximum(&self) -> u32 {
        self.maximum
    }

    /// Subtract damage, stopping at zero. Returns the damage actually taken.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.current);
        self.current -= taken;
        taken
    }

    /// Restore hit points up to the maximum. Returns the amount healed.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let old = self.current;
        self.current = self.current.saturating_add(amount).min(self.maximum);
        self.current - old
    }

    /// Raise the maximum without healing the current deficit.
    pub fn raise_maximum(&mut self, amount: u32) {
        self.maximum = self.maximum.saturating_add(amount);
    }

    pub fn refill(&mut self) {
        self.current = self.maximum;
    }

    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }

    pub fn ratio(&self) -> f32 {
        if self.maximum == 0 {
            return 0.0;
        }
        self.current as f32 / self.maximum as f32
    }
}

/// Anything with hit points that can take part in a battle.
pub trait Combatant {
    fn name(&self) -> &str;
    fn vitals(&self) -> &Vitals;
    fn vitals_mut(&mut self) -> &mut Vitals;

    fn current_hp(&self) -> u32 {
        self.vitals().current()
    }

    fn max_hp(&self) -> u32 {
        self.vitals().maximum()
    }

    fn is_alive(&self) -> bool {
        !self.vitals().is_depleted()
    }

    fn take_damage(&mut self, amount: u32) -> u32 {
        self.vitals_mut().take_damage(amount)
    }

    fn heal(&mut self, amount: u32) -> u32 {
        self.vitals_mut().heal(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_vitals() {
        let mut hp = Vitals::new(20);
        assert_eq!(hp.current(), 20);

        assert_eq!(hp.take_damage(5), 5);
        assert_eq!(hp.current(), 15);

        assert_eq!(hp.heal(10), 5);
        assert_eq!(hp.current(), 20); // Capped at max

        assert_eq!(hp.take_damage(50), 20);
        assert_eq!(hp.current(), 0);
        assert!(hp.is_depleted());
    }

    #[test]
    fn test_restore_clamps() {
        let hp = Vitals::restore(40, 25);
        assert_eq!(hp.current(), 25);
        assert_eq!(hp.maximum(), 25);
    }

    #[test]
    fn test_raise_maximum_keeps_deficit() {
        let mut hp = Vitals::new(20);
        hp.take_damage(4);
        hp.raise_maximum(5);
        assert_eq!(hp.current(), 16);
        assert_eq!(hp.maximum(), 25);
    }

    #[test]
    fn test_hp_stays_in_bounds_under_random_sequences() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut hp = Vitals::new(30);
        for _ in 0..10_000 {
            let amount = rng.gen_range(0..40);
            if rng.gen_bool(0.5) {
                hp.take_damage(amount);
            } else {
                hp.heal(amount);
            }
            assert!(hp.current() <= hp.maximum());
        }
    }
}
