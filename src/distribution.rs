use rand::RngCore;

use crate::config::{Config, ConfigError};
use crate::queues::request::{Resource, Time};

/// Non-negative 31-bit draw, the range of a C `rand()`.
pub fn draw<R: RngCore + ?Sized> (rng: &mut R) -> i64 {
    i64::from(rng.next_u32() >> 1)
}

/// Delay in [min, max), reduced modulo the width. The reduction is slightly
/// biased for widths that are not powers of two; traces rely on it.
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub struct UniformDelay {
    min: Time,
    max: Time,
}

impl UniformDelay {
    // Bounds come from a validated config: 0 <= min < max
    pub(crate) fn new (min: Time, max: Time) -> Self {
        UniformDelay { min, max }
    }

    /// Absolute time of the next occurrence, counting from 'now'.
    pub fn next_time<R: RngCore + ?Sized> (&self, rng: &mut R, now: Time) -> Time {
        now + self.min + draw(rng) % (self.max - self.min)
    }
}

/// Leaves the network with a probability resolved to thousandths.
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub struct QuitChance {
    per_mille: i64,
}

impl QuitChance {
    pub fn new (probability: f64) -> Self {
        QuitChance { per_mille: (probability * 1000.).round() as i64 }
    }

    pub fn quits<R: RngCore + ?Sized> (&self, rng: &mut R) -> bool {
        draw(rng) % 1000 < self.per_mille
    }
}

/// Every random draw a run makes, built once from the configuration.
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct Delays {
    pub arrival: UniformDelay,
    pub cpu: UniformDelay,
    pub disk1: UniformDelay,
    pub disk2: UniformDelay,
    pub quit: QuitChance,
}

impl Delays {
    pub fn from_config (config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Delays {
            arrival: UniformDelay::new(config.arrive_min, config.arrive_max),
            cpu: UniformDelay::new(config.cpu_min, config.cpu_max),
            disk1: UniformDelay::new(config.disk1_min, config.disk1_max),
            disk2: UniformDelay::new(config.disk2_min, config.disk2_max),
            quit: QuitChance::new(config.quit_prob),
        })
    }

    pub fn service (&self, resource: Resource) -> &UniformDelay {
        match resource {
            Resource::Cpu   => &self.cpu,
            Resource::Disk1 => &self.disk1,
            Resource::Disk2 => &self.disk2,
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use rand::{Error, RngCore};

    /// Replays fixed 31-bit draws, cycling when exhausted.
    pub struct ScriptedRng {
        draws: Vec<u32>,
        next: usize,
    }

    impl ScriptedRng {
        pub fn new (draws: &[u32]) -> Self {
            ScriptedRng { draws: draws.to_vec(), next: 0 }
        }
    }

    impl RngCore for ScriptedRng {
        fn next_u32 (&mut self) -> u32 {
            let v = self.draws[self.next % self.draws.len()];
            self.next += 1;
            v << 1
        }

        fn next_u64 (&mut self) -> u64 {
            u64::from(self.next_u32())
        }

        fn fill_bytes (&mut self, dest: &mut [u8]) {
            for b in dest.iter_mut() {
                *b = self.next_u32() as u8;
            }
        }

        fn try_fill_bytes (&mut self, dest: &mut [u8]) -> Result<(), Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::testing::ScriptedRng;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn draws_are_non_negative() {
        let mut rng = StdRng::from_seed([7; 32]);
        for _ in 0..1000 {
            let d = draw(&mut rng);
            assert!(d >= 0 && d <= i64::from(i32::max_value()));
        }
    }

    #[test]
    fn delay_reduces_modulo_width_and_offsets_from_now() {
        let delay = UniformDelay::new(50, 500);
        let mut rng = ScriptedRng::new(&[0, 449, 450, 1000]);
        assert_eq!(delay.next_time(&mut rng, 100), 150);
        assert_eq!(delay.next_time(&mut rng, 100), 599);
        assert_eq!(delay.next_time(&mut rng, 100), 150);
        assert_eq!(delay.next_time(&mut rng, 0), 50 + 1000 % 450);
    }

    #[test]
    fn delay_stays_in_half_open_range() {
        let delay = UniformDelay::new(1, 5);
        let mut rng = StdRng::from_seed([3; 32]);
        for now in 0..500 {
            let t = delay.next_time(&mut rng, now);
            assert!(t >= now + 1 && t < now + 5);
        }
    }

    #[test]
    fn unit_width_is_deterministic() {
        let delay = UniformDelay::new(1, 2);
        let mut rng = StdRng::from_seed([11; 32]);
        for now in 0..50 {
            assert_eq!(delay.next_time(&mut rng, now), now + 1);
        }
    }

    #[test]
    fn quit_threshold_is_rounded_per_mille() {
        let q = QuitChance::new(0.2);
        let mut rng = ScriptedRng::new(&[199, 200, 1199, 1200]);
        assert!(q.quits(&mut rng));
        assert!(!q.quits(&mut rng));
        assert!(q.quits(&mut rng));
        assert!(!q.quits(&mut rng));

        let mut rng = ScriptedRng::new(&[999, 0]);
        assert!(QuitChance::new(1.).quits(&mut rng));
        assert!(!QuitChance::new(0.).quits(&mut rng));
        assert!(QuitChance::new(0.0004).per_mille == 0);
        assert!(QuitChance::new(0.0006).per_mille == 1);
    }

    #[test]
    fn service_delays_follow_their_resource() {
        let mut config = Config::default();
        config.disk1_min = 10;
        config.disk1_max = 20;
        let delays = Delays::from_config(&config).unwrap();
        assert_eq!(delays.service(Resource::Disk1), &UniformDelay::new(10, 20));
        assert_eq!(delays.service(Resource::Disk2), &UniformDelay::new(50, 500));
        assert_eq!(delays.service(Resource::Cpu), &UniformDelay::new(1, 5));
    }

    #[test]
    fn unvalidated_bounds_are_rejected() {
        let mut config = Config::default();
        config.cpu_min = 5;
        assert!(matches!(Delays::from_config(&config),
                         Err(ConfigError::InvertedBounds { lower: "CPU_MIN", upper: "CPU_MAX" })));

        config.cpu_min = -1;
        assert!(matches!(Delays::from_config(&config), Err(ConfigError::NegativeDelay { option: "CPU_MIN" })));
    }
}
