use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::economy::SupplyOrder;
use crate::error::{GameError, GameResult};
use crate::session::{Session, Status, TurnReport};
use crate::weather::{RandomWeather, WeatherSource};

const INSUFFICIENT_FUNDS_MESSAGE: &str = "Not enough money!";

/// Lightweight view used when enumerating sessions.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub game_id: String,
    pub day: u32,
    pub money: f64,
    pub status: Status,
    pub created_at: DateTime<Utc>,
}

struct Entry {
    session: Session,
    created_at: DateTime<Utc>,
}

struct Inner<W> {
    sessions: HashMap<String, Entry>,
    weather: W,
}

/// Process-wide owner of every running game.
///
/// A single lock guards both the session map and the weather source, so each
/// operation sees and commits a session atomically. Sessions are never
/// evicted; memory grows with the number of games started.
pub struct SessionRegistry<W = RandomWeather> {
    inner: Mutex<Inner<W>>,
}

impl SessionRegistry<RandomWeather> {
    pub fn with_seed(seed: Option<u64>) -> Self {
        Self::new(RandomWeather::from_seed_option(seed))
    }
}

impl Default for SessionRegistry<RandomWeather> {
    fn default() -> Self {
        Self::with_seed(None)
    }
}

impl<W: WeatherSource> SessionRegistry<W> {
    pub fn new(weather: W) -> Self {
        Self {
            inner: Mutex::new(Inner {
                sessions: HashMap::new(),
                weather,
            }),
        }
    }

    #[instrument(skip_all)]
    pub async fn create(&self) -> (String, Session) {
        let mut inner = self.inner.lock().await;
        let game_id = Uuid::new_v4().to_string();
        let session = Session::new(inner.weather.next_weather());

        inner.sessions.insert(
            game_id.clone(),
            Entry {
                session: session.clone(),
                created_at: Utc::now(),
            },
        );
        info!(%game_id, weather = %session.weather, "new game started");
        debug!(open_sessions = inner.sessions.len(), "registry size");

        (game_id, session)
    }

    pub async fn get(&self, game_id: &str) -> GameResult<Session> {
        let inner = self.inner.lock().await;
        inner
            .sessions
            .get(game_id)
            .map(|entry| entry.session.clone())
            .ok_or_else(|| GameError::NotFound(game_id.to_string()))
    }

    /// Summaries ordered by creation time, oldest first.
    pub async fn list(&self) -> Vec<SessionSummary> {
        let inner = self.inner.lock().await;
        let mut summaries: Vec<SessionSummary> = inner
            .sessions
            .iter()
            .map(|(game_id, entry)| SessionSummary {
                game_id: game_id.clone(),
                day: entry.session.day,
                money: entry.session.money,
                status: entry.session.status,
                created_at: entry.created_at,
            })
            .collect();
        summaries.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.game_id.cmp(&b.game_id))
        });
        summaries
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.sessions.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Insufficient funds is reported in the envelope rather than as an error.
    #[instrument(skip(self, order))]
    pub async fn buy_supplies(
        &self,
        game_id: &str,
        order: &SupplyOrder,
    ) -> GameResult<TurnReport> {
        let mut inner = self.inner.lock().await;
        let entry = lookup(&mut inner.sessions, game_id)?;

        match entry.session.buy_supplies(order) {
            Ok(next) => {
                entry.session = next.clone();
                Ok(TurnReport::ok(next))
            }
            Err(GameError::InsufficientFunds { cost, available }) => {
                warn!(cost, available, "purchase rejected");
                Ok(TurnReport::rejected(
                    entry.session.clone(),
                    INSUFFICIENT_FUNDS_MESSAGE,
                ))
            }
            Err(err) => Err(rejected(err)),
        }
    }

    #[instrument(skip(self))]
    pub async fn set_price(&self, game_id: &str, price: f64) -> GameResult<TurnReport> {
        let mut inner = self.inner.lock().await;
        let entry = lookup(&mut inner.sessions, game_id)?;

        let next = entry.session.set_price(price).map_err(rejected)?;
        entry.session = next.clone();
        Ok(TurnReport::ok(next))
    }

    #[instrument(skip(self))]
    pub async fn sell_lemonade(&self, game_id: &str) -> GameResult<TurnReport> {
        let mut inner = self.inner.lock().await;
        let entry = lookup(&mut inner.sessions, game_id)?;

        let (next, results) = entry.session.sell_lemonade().map_err(rejected)?;
        info!(
            day = next.day,
            sales = results.sales,
            revenue = results.revenue,
            profit = results.profit,
            unsatisfied = results.unsatisfied_customers,
            "day closed"
        );
        entry.session = next.clone();
        Ok(TurnReport::with_results(next, results))
    }

    #[instrument(skip(self))]
    pub async fn next_day(&self, game_id: &str) -> GameResult<TurnReport> {
        let mut inner = self.inner.lock().await;
        let Inner { sessions, weather } = &mut *inner;
        let entry = lookup(sessions, game_id)?;

        let next = entry.session.next_day(weather).map_err(rejected)?;
        if next.is_over() {
            info!(money = next.money, "game over");
        } else {
            debug!(day = next.day, weather = %next.weather, "new day");
        }
        entry.session = next.clone();
        Ok(TurnReport::ok(next))
    }
}

fn lookup<'a>(
    sessions: &'a mut HashMap<String, Entry>,
    game_id: &str,
) -> GameResult<&'a mut Entry> {
    sessions
        .get_mut(game_id)
        .ok_or_else(|| GameError::NotFound(game_id.to_string()))
}

fn rejected(err: GameError) -> GameError {
    warn!(%err, "operation rejected");
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::FINAL_DAY;
    use crate::weather::{FixedWeather, Weather, WeatherCondition};

    fn registry() -> SessionRegistry<FixedWeather> {
        SessionRegistry::new(FixedWeather(Weather::new(80, WeatherCondition::Sunny)))
    }

    #[tokio::test]
    async fn created_sessions_are_retrievable_and_distinct() {
        let registry = registry();
        let (first, session) = registry.create().await;
        let (second, _) = registry.create().await;

        assert_ne!(first, second);
        assert_eq!(registry.get(&first).await.unwrap(), session);
        assert_eq!(registry.len().await, 2);

        let listed: Vec<String> = registry.list().await.into_iter().map(|s| s.game_id).collect();
        assert!(listed.contains(&first));
        assert!(listed.contains(&second));
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let registry = registry();
        assert_eq!(
            registry.sell_lemonade("missing").await.unwrap_err(),
            GameError::NotFound("missing".to_string())
        );
        assert!(registry.get("missing").await.is_err());
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn insufficient_funds_leaves_session_untouched() {
        let registry = registry();
        let (game_id, before) = registry.create().await;
        let order = SupplyOrder {
            lemons: 1_000,
            ..SupplyOrder::default()
        };

        let report = registry.buy_supplies(&game_id, &order).await.unwrap();
        assert!(!report.success);
        assert_eq!(report.message.as_deref(), Some("Not enough money!"));
        assert_eq!(report.game_state, before);
        assert_eq!(registry.get(&game_id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn illegal_transition_is_not_committed() {
        let registry = registry();
        let (game_id, before) = registry.create().await;

        let err = registry.next_day(&game_id).await.unwrap_err();
        assert!(matches!(err, GameError::IllegalTransition { .. }));
        assert_eq!(registry.get(&game_id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn accepted_operations_are_committed() {
        let registry = registry();
        let (game_id, _) = registry.create().await;
        let order = SupplyOrder {
            cups: 10,
            lemons: 4,
            sugar: 4,
            ice: 15,
        };

        registry.buy_supplies(&game_id, &order).await.unwrap();
        registry.set_price(&game_id, 0.25).await.unwrap();
        let report = registry.sell_lemonade(&game_id).await.unwrap();
        let results = report.daily_results.unwrap();
        assert_eq!(results.sales, 10);
        assert_eq!(results.unsatisfied_customers, 31);

        let stored = registry.get(&game_id).await.unwrap();
        assert_eq!(stored.status, Status::Reporting);
        assert_eq!(stored.inventory.ice, 0);

        let report = registry.next_day(&game_id).await.unwrap();
        assert_eq!(report.game_state.day, 2);
        assert!(report.game_state.day <= FINAL_DAY);
    }
}
