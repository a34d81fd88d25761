/// A bar chart bucket. `min` and `max` are the whole-number bounds shown in
/// the label; `max` of `None` is open ended.
///
/// The first band starts at `min` inclusive. Every later band starts just
/// above the previous band's `max`, so a price of 100 belongs only to `0-100`
/// and a price of 100.50 belongs to `101-200`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBand {
    pub min: u32,
    pub max: Option<u32>,
}

pub const PRICE_BANDS: [PriceBand; 10] = [
    PriceBand::new(0, Some(100)),
    PriceBand::new(101, Some(200)),
    PriceBand::new(201, Some(300)),
    PriceBand::new(301, Some(400)),
    PriceBand::new(401, Some(500)),
    PriceBand::new(501, Some(600)),
    PriceBand::new(601, Some(700)),
    PriceBand::new(701, Some(800)),
    PriceBand::new(801, Some(900)),
    PriceBand::new(901, None),
];

impl PriceBand {
    pub const fn new(min: u32, max: Option<u32>) -> Self {
        Self { min, max }
    }

    pub fn label(&self) -> String {
        match self.max {
            Some(max) => format!("{}-{}", self.min, max),
            None => format!("{}-Infinity", self.min),
        }
    }

    /// The exclusive lower bound, or `None` when `min` itself is included.
    pub fn exclusive_lower(&self) -> Option<f64> {
        if self.min == 0 {
            None
        } else {
            Some(f64::from(self.min - 1))
        }
    }

    pub fn contains(&self, price: f64) -> bool {
        let above_lower = match self.exclusive_lower() {
            Some(lower) => price > lower,
            None => price >= f64::from(self.min),
        };
        let below_upper = self.max.map_or(true, |max| price <= f64::from(max));

        above_lower && below_upper
    }
}
