use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::economy::{self, DailyResults, SupplyOrder};
use crate::error::{GameError, GameResult};
use crate::types::Inventory;
use crate::weather::{Weather, WeatherSource};

pub const FINAL_DAY: u32 = 14;
pub const STARTING_MONEY: f64 = 20.00;
pub const DEFAULT_PRICE_PER_CUP: f64 = 0.25;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Status {
    Buying,
    Pricing,
    Selling,
    Reporting,
    GameOver,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Buying => "buying",
            Status::Pricing => "pricing",
            Status::Selling => "selling",
            Status::Reporting => "reporting",
            Status::GameOver => "gameOver",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::GameOver)
    }

    /// Transition table for the daily cycle. `NextDay` always lands on
    /// `Buying` here; the final-day check happens in [`Session::next_day`].
    pub fn after(self, operation: Operation) -> GameResult<Status> {
        match (self, operation) {
            (Status::Buying, Operation::BuySupplies) => Ok(Status::Pricing),
            (Status::Pricing, Operation::SetPrice) => Ok(Status::Selling),
            (Status::Selling, Operation::SellLemonade) => Ok(Status::Reporting),
            (Status::Reporting, Operation::NextDay) => Ok(Status::Buying),
            (status, operation) => Err(GameError::IllegalTransition { operation, status }),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operations that move a session through its daily cycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    BuySupplies,
    SetPrice,
    SellLemonade,
    NextDay,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::BuySupplies => "buy_supplies",
            Operation::SetPrice => "set_price",
            Operation::SellLemonade => "sell_lemonade",
            Operation::NextDay => "next_day",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = GameError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "buy_supplies" => Ok(Operation::BuySupplies),
            "set_price" => Ok(Operation::SetPrice),
            "sell_lemonade" => Ok(Operation::SellLemonade),
            "next_day" => Ok(Operation::NextDay),
            other => Err(GameError::UnknownOperation(other.to_string())),
        }
    }
}

/// Full state of one game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub day: u32,
    pub money: f64,
    pub inventory: Inventory,
    pub cost_per_cup: f64,
    pub price_per_cup: f64,
    pub weather: Weather,
    pub status: Status,
}

impl Session {
    pub fn new(weather: Weather) -> Self {
        Self {
            day: 1,
            money: STARTING_MONEY,
            inventory: Inventory::default(),
            cost_per_cup: 0.0,
            price_per_cup: DEFAULT_PRICE_PER_CUP,
            weather,
            status: Status::Buying,
        }
    }

    pub fn is_over(&self) -> bool {
        self.status.is_terminal()
    }

    /// Whole-order purchase: either everything is bought or nothing is.
    pub fn buy_supplies(&self, order: &SupplyOrder) -> GameResult<Session> {
        let status = self.status.after(Operation::BuySupplies)?;

        let total_cost = economy::purchase_cost(order);
        if total_cost > self.money {
            return Err(GameError::InsufficientFunds {
                cost: total_cost,
                available: self.money,
            });
        }

        debug!(day = self.day, total_cost, "supplies purchased");
        Ok(Session {
            money: self.money - total_cost,
            inventory: order.deliver_to(&self.inventory),
            cost_per_cup: economy::cost_per_cup(total_cost, order.cups),
            status,
            ..self.clone()
        })
    }

    pub fn set_price(&self, price: f64) -> GameResult<Session> {
        let status = self.status.after(Operation::SetPrice)?;
        if !price.is_finite() || price < 0.0 {
            return Err(GameError::invalid(format!(
                "price must be a non-negative number, got {price}"
            )));
        }

        debug!(day = self.day, price, "price set");
        Ok(Session {
            price_per_cup: price,
            status,
            ..self.clone()
        })
    }

    pub fn sell_lemonade(&self) -> GameResult<(Session, DailyResults)> {
        let status = self.status.after(Operation::SellLemonade)?;
        let outcome = economy::resolve_sale(
            &self.inventory,
            &self.weather,
            self.price_per_cup,
            self.cost_per_cup,
        );

        let next = Session {
            money: self.money + outcome.results.revenue,
            inventory: outcome.inventory,
            status,
            ..self.clone()
        };
        Ok((next, outcome.results))
    }

    /// Advances to the next morning, or ends the game after the final day.
    /// Weather is only drawn when a new day actually starts.
    pub fn next_day<W: WeatherSource + ?Sized>(&self, weather: &mut W) -> GameResult<Session> {
        let status = self.status.after(Operation::NextDay)?;

        if self.day >= FINAL_DAY {
            return Ok(Session {
                status: Status::GameOver,
                ..self.clone()
            });
        }

        Ok(Session {
            day: self.day + 1,
            weather: weather.next_weather(),
            inventory: self.inventory.melt_ice(),
            status,
            ..self.clone()
        })
    }
}

/// Result envelope handed back for every mutating operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TurnReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_results: Option<DailyResults>,
    pub game_state: Session,
}

impl TurnReport {
    pub fn ok(game_state: Session) -> Self {
        Self {
            success: true,
            message: None,
            daily_results: None,
            game_state,
        }
    }

    pub fn with_results(game_state: Session, results: DailyResults) -> Self {
        Self {
            daily_results: Some(results),
            ..Self::ok(game_state)
        }
    }

    pub fn rejected(game_state: Session, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            daily_results: None,
            game_state,
        }
    }
}
