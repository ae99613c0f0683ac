//! Name-based entry point: "invoke operation X with arguments Y".
//!
//! Argument and result shapes follow the JSON wire format used by the tool
//! surface (`gameId`, `cups`, `price`, `gameState`, ...).

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::economy::SupplyOrder;
use crate::error::{GameError, GameResult};
use crate::registry::SessionRegistry;
use crate::session::Operation;
use crate::weather::WeatherSource;

pub const START_GAME: &str = "start_game";
pub const GET_GAME_STATE: &str = "get_game_state";
pub const LIST_GAMES: &str = "list_games";

/// Every operation name accepted by [`dispatch`].
pub const OPERATION_NAMES: [&str; 7] = [
    START_GAME,
    GET_GAME_STATE,
    LIST_GAMES,
    "buy_supplies",
    "set_price",
    "sell_lemonade",
    "next_day",
];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GameRef {
    game_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuyArgs {
    game_id: String,
    #[serde(default)]
    cups: u32,
    #[serde(default)]
    lemons: u32,
    #[serde(default)]
    sugar: u32,
    #[serde(default)]
    ice: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceArgs {
    game_id: String,
    price: PriceInput,
}

/// Prices may arrive as a JSON number or a numeric string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PriceInput {
    Number(f64),
    Text(String),
}

impl PriceInput {
    fn value(&self) -> GameResult<f64> {
        match self {
            PriceInput::Number(value) => Ok(*value),
            PriceInput::Text(raw) => raw
                .trim()
                .parse::<f64>()
                .map_err(|_| GameError::invalid(format!("price is not a number: {raw:?}"))),
        }
    }
}

pub async fn dispatch<W: WeatherSource>(
    registry: &SessionRegistry<W>,
    operation: &str,
    arguments: Value,
) -> GameResult<Value> {
    match operation {
        START_GAME => {
            let (game_id, session) = registry.create().await;
            Ok(json!({ "gameId": game_id, "gameState": session }))
        }
        GET_GAME_STATE => {
            let args: GameRef = parse_arguments(arguments)?;
            let session = registry.get(&args.game_id).await?;
            Ok(json!({ "gameState": session }))
        }
        LIST_GAMES => Ok(json!({ "games": registry.list().await })),
        other => {
            let report = match other.parse::<Operation>()? {
                Operation::BuySupplies => {
                    let args: BuyArgs = parse_arguments(arguments)?;
                    let order = SupplyOrder {
                        cups: args.cups,
                        lemons: args.lemons,
                        sugar: args.sugar,
                        ice: args.ice,
                    };
                    registry.buy_supplies(&args.game_id, &order).await?
                }
                Operation::SetPrice => {
                    let args: PriceArgs = parse_arguments(arguments)?;
                    let price = args.price.value()?;
                    registry.set_price(&args.game_id, price).await?
                }
                Operation::SellLemonade => {
                    let args: GameRef = parse_arguments(arguments)?;
                    registry.sell_lemonade(&args.game_id).await?
                }
                Operation::NextDay => {
                    let args: GameRef = parse_arguments(arguments)?;
                    registry.next_day(&args.game_id).await?
                }
            };
            Ok(json!(report))
        }
    }
}

fn parse_arguments<T: DeserializeOwned>(arguments: Value) -> GameResult<T> {
    let arguments = match arguments {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(arguments).map_err(|err| GameError::invalid(err.to_string()))
}
