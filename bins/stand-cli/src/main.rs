use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use mcp_adapter::{McpRequest, McpResponse};
use serde_json::Value;
use stand_core::config::{AppConfig, CONFIG};
use stand_core::{dispatch, SessionRegistry, Status, SupplyOrder};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "stand-cli", about = "Play lemonade stand games from the command line", version)]
struct Cli {
    /// Weather seed; overrides LEMONADE_WEATHER_SEED
    #[arg(long, global = true)]
    seed: Option<u64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Play a full game with the same purchase and price every day
    Play {
        #[arg(long, default_value_t = 20)]
        cups: u32,
        #[arg(long, default_value_t = 8)]
        lemons: u32,
        #[arg(long, default_value_t = 8)]
        sugar: u32,
        #[arg(long, default_value_t = 30)]
        ice: u32,
        /// Price per cup in dollars
        #[arg(long, short = 'p', default_value_t = 0.25)]
        price: f64,
    },
    /// Run JSON-lines tool calls ({"tool": ..., "payload": ...}) against one registry
    Script {
        /// Script file; reads stdin when omitted or "-"
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;
    let cli = Cli::parse();
    let config: &AppConfig = &CONFIG;
    let registry = SessionRegistry::with_seed(cli.seed.or(config.weather_seed));

    match cli.command {
        Commands::Play {
            cups,
            lemons,
            sugar,
            ice,
            price,
        } => {
            let order = SupplyOrder {
                cups,
                lemons,
                sugar,
                ice,
            };
            play(&registry, order, price).await?
        }
        Commands::Script { file } => run_script(&registry, file).await?,
    }

    Ok(())
}

fn init_tracing() -> Result<()> {
    if tracing::subscriber::set_global_default(
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .finish(),
    )
    .is_err()
    {
        // tracing already initialised; ignore.
    }
    Ok(())
}

async fn play(registry: &SessionRegistry, order: SupplyOrder, price: f64) -> Result<()> {
    let (game_id, session) = registry.create().await;
    println!("game {game_id}: starting with ${:.2}", session.money);
    println!(
        "{:>3}  {:<20} {:>5} {:>8} {:>8} {:>8} {:>8}",
        "day", "weather", "sold", "missed", "revenue", "profit", "money"
    );

    loop {
        let bought = registry.buy_supplies(&game_id, &order).await?;
        if !bought.success {
            warn!(day = bought.game_state.day, "cannot afford supplies; selling leftovers");
            registry
                .buy_supplies(&game_id, &SupplyOrder::default())
                .await?;
        }

        registry.set_price(&game_id, price).await?;
        let sold = registry.sell_lemonade(&game_id).await?;
        let state = &sold.game_state;
        if let Some(results) = sold.daily_results {
            println!(
                "{:>3}  {:<20} {:>5} {:>8} {:>8.2} {:>8.2} {:>8.2}",
                state.day,
                state.weather.to_string(),
                results.sales,
                results.unsatisfied_customers,
                results.revenue,
                results.profit,
                state.money
            );
        }

        let next = registry.next_day(&game_id).await?;
        if next.game_state.status == Status::GameOver {
            println!("game over: finished with ${:.2}", next.game_state.money);
            return Ok(());
        }
    }
}

async fn run_script(registry: &SessionRegistry, file: Option<PathBuf>) -> Result<()> {
    let source = match file {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read script {}", path.display()))?,
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read script from stdin")?;
            buffer
        }
    };

    let mut last_game_id: Option<String> = None;
    for (index, line) in source.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut request: McpRequest = serde_json::from_str(line)
            .with_context(|| format!("line {} is not a valid request: {}", index + 1, line))?;
        fill_game_id(&mut request.payload, last_game_id.as_deref())?;
        debug!(tool = %request.tool, "dispatching scripted call");

        let response = match dispatch(registry, &request.tool, request.payload).await {
            Ok(payload) => {
                if let Some(game_id) = payload.get("gameId").and_then(Value::as_str) {
                    last_game_id = Some(game_id.to_string());
                }
                McpResponse::ok(payload)
            }
            Err(err) => McpResponse::error(err.to_string()),
        };
        println!("{}", serde_json::to_string(&response)?);
    }

    Ok(())
}

/// Calls that omit `gameId` target the most recently started game.
fn fill_game_id(payload: &mut Value, last_game_id: Option<&str>) -> Result<()> {
    let Some(game_id) = last_game_id else {
        return Ok(());
    };

    if payload.is_null() {
        *payload = Value::Object(Default::default());
    }
    match payload {
        Value::Object(map) => {
            map.entry("gameId")
                .or_insert_with(|| Value::String(game_id.to_string()));
            Ok(())
        }
        other => bail!("payload must be a JSON object, got {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_game_id_is_filled_from_last_game() {
        let mut payload = json!({ "price": 0.3 });
        fill_game_id(&mut payload, Some("g-1")).unwrap();
        assert_eq!(payload, json!({ "price": 0.3, "gameId": "g-1" }));

        let mut payload = Value::Null;
        fill_game_id(&mut payload, Some("g-1")).unwrap();
        assert_eq!(payload, json!({ "gameId": "g-1" }));
    }

    #[test]
    fn explicit_game_id_wins() {
        let mut payload = json!({ "gameId": "mine" });
        fill_game_id(&mut payload, Some("g-1")).unwrap();
        assert_eq!(payload["gameId"], "mine");
    }

    #[test]
    fn nothing_to_fill_before_a_game_starts() {
        let mut payload = Value::Null;
        fill_game_id(&mut payload, None).unwrap();
        assert!(payload.is_null());
        assert!(fill_game_id(&mut json!([1, 2]), Some("g-1")).is_err());
    }
}
