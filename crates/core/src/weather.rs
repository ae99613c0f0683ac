use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

pub const MIN_TEMPERATURE: i32 = 50;
pub const MAX_TEMPERATURE: i32 = 90;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum WeatherCondition {
    Sunny,
    #[serde(rename = "Partly Cloudy")]
    PartlyCloudy,
    Cloudy,
    Rainy,
}

impl WeatherCondition {
    pub const ALL: [WeatherCondition; 4] = [
        WeatherCondition::Sunny,
        WeatherCondition::PartlyCloudy,
        WeatherCondition::Cloudy,
        WeatherCondition::Rainy,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            WeatherCondition::Sunny => "Sunny",
            WeatherCondition::PartlyCloudy => "Partly Cloudy",
            WeatherCondition::Cloudy => "Cloudy",
            WeatherCondition::Rainy => "Rainy",
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One day's forecast. Temperature is in °F.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Weather {
    pub temperature: i32,
    pub condition: WeatherCondition,
}

impl Weather {
    pub fn new(temperature: i32, condition: WeatherCondition) -> Self {
        Self {
            temperature,
            condition,
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°F {}", self.temperature, self.condition)
    }
}

pub trait WeatherSource {
    fn next_weather(&mut self) -> Weather;
}

/// Uniform draws over 50..=90 °F and the four conditions.
#[derive(Debug, Clone)]
pub struct RandomWeather<R = StdRng> {
    rng: R,
}

impl RandomWeather<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl<R: Rng> RandomWeather<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> WeatherSource for RandomWeather<R> {
    fn next_weather(&mut self) -> Weather {
        let temperature = self.rng.gen_range(MIN_TEMPERATURE..=MAX_TEMPERATURE);
        let condition = WeatherCondition::ALL[self.rng.gen_range(0..WeatherCondition::ALL.len())];
        Weather::new(temperature, condition)
    }
}

/// Always reports the same reading.
#[derive(Debug, Clone, Copy)]
pub struct FixedWeather(pub Weather);

impl WeatherSource for FixedWeather {
    fn next_weather(&mut self) -> Weather {
        self.0
    }
}
