pub mod config;
pub mod dispatch;
pub mod economy;
pub mod error;
pub mod registry;
pub mod session;
pub mod types;
pub mod weather;

pub use dispatch::dispatch;
pub use economy::{DailyResults, SupplyOrder};
pub use error::{GameError, GameResult};
pub use registry::{SessionRegistry, SessionSummary};
pub use session::{Operation, Session, Status, TurnReport, FINAL_DAY};
pub use types::{Inventory, ResourceKind};
pub use weather::{FixedWeather, RandomWeather, Weather, WeatherCondition, WeatherSource};
