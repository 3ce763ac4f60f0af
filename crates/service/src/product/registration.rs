use rand::Rng;

/// Source of candidate registration numbers.
pub trait RegistrationNumberSource: Send + Sync {
    fn next_candidate(&self) -> i32;
}

/// Uniform draw over all numbers with exactly `digits` decimal digits.
#[derive(Debug, Clone, Copy)]
pub struct RandomRegistrationNumbers {
    low: i32,
    high: i32,
}

impl RandomRegistrationNumbers {
    /// `digits` is clamped to `1..=9` so the range fits an `i32`.
    pub fn new(digits: u32) -> Self {
        let digits = digits.clamp(1, 9);
        Self { low: 10i32.pow(digits - 1), high: 10i32.pow(digits) - 1 }
    }

    pub fn range(&self) -> (i32, i32) { (self.low, self.high) }
}

impl RegistrationNumberSource for RandomRegistrationNumbers {
    fn next_candidate(&self) -> i32 {
        rand::thread_rng().gen_range(self.low..=self.high)
    }
}
