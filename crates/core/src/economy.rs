//! Pricing, production and demand rules for a single day of trading.
//!
//! Everything in here is a pure function over a snapshot of the stand; the
//! session state machine decides when each rule applies.

use serde::{Deserialize, Serialize};

use crate::types::{Inventory, ResourceKind};
use crate::weather::{Weather, WeatherCondition};

pub const CUPS_PER_PITCHER: u32 = 10;
pub const LEMONS_PER_PITCHER: u32 = 4;
pub const SUGAR_PER_PITCHER: u32 = 4;
pub const ICE_PER_PITCHER: u32 = 15;

const CHEAP_PRICE_CEILING: f64 = 0.15;
const CHEAP_PRICE_BONUS: i64 = 10;
const PREMIUM_PRICE_FLOOR: f64 = 0.50;
const PREMIUM_PRICE_PENALTY_RATE: f64 = 30.0;

/// Fixed supplier price for one unit of a resource.
pub fn unit_price(kind: ResourceKind) -> f64 {
    match kind {
        ResourceKind::Cups => 0.05,
        ResourceKind::Lemons => 0.10,
        ResourceKind::Sugar => 0.08,
        ResourceKind::Ice => 0.02,
    }
}

/// Quantities requested in a single purchase. Omitted kinds are zero.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SupplyOrder {
    pub cups: u32,
    pub lemons: u32,
    pub sugar: u32,
    pub ice: u32,
}

impl SupplyOrder {
    pub fn quantity(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Cups => self.cups,
            ResourceKind::Lemons => self.lemons,
            ResourceKind::Sugar => self.sugar,
            ResourceKind::Ice => self.ice,
        }
    }

    /// Inventory after this order is delivered.
    pub fn deliver_to(&self, inventory: &Inventory) -> Inventory {
        let mut next = *inventory;
        for kind in ResourceKind::ALL {
            let slot = next.get_mut(kind);
            *slot = slot.saturating_add(self.quantity(kind));
        }
        next
    }
}

pub fn purchase_cost(order: &SupplyOrder) -> f64 {
    ResourceKind::ALL
        .iter()
        .map(|kind| f64::from(order.quantity(*kind)) * unit_price(*kind))
        .fold(0.0, |total, line| total + line)
}

/// Cost basis of this purchase alone; leftover stock from earlier days is ignored.
pub fn cost_per_cup(total_cost: f64, cups: u32) -> f64 {
    total_cost / f64::from(cups.max(1))
}

/// Ingredients consumed to pour `cups` cups, floor-rounded per ingredient.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngredientUse {
    pub lemons: u32,
    pub sugar: u32,
    pub ice: u32,
}

pub fn ingredients_for(cups: u32) -> IngredientUse {
    let scaled = |per_pitcher: u32| -> u32 {
        let used = u64::from(cups) * u64::from(per_pitcher) / u64::from(CUPS_PER_PITCHER);
        u32::try_from(used).unwrap_or(u32::MAX)
    };
    IngredientUse {
        lemons: scaled(LEMONS_PER_PITCHER),
        sugar: scaled(SUGAR_PER_PITCHER),
        ice: scaled(ICE_PER_PITCHER),
    }
}

/// How much lemonade the current stock can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recipe {
    pub pitchers: u32,
    pub max_cups: u32,
    pub lemons_used: u32,
    pub sugar_used: u32,
    pub ice_used: u32,
}

impl Recipe {
    pub fn for_inventory(inventory: &Inventory) -> Self {
        let pitchers = (inventory.lemons / LEMONS_PER_PITCHER)
            .min(inventory.sugar / SUGAR_PER_PITCHER)
            .min(inventory.ice / ICE_PER_PITCHER);
        let max_cups = pitchers
            .saturating_mul(CUPS_PER_PITCHER)
            .min(inventory.cups);
        let used = ingredients_for(max_cups);

        Self {
            pitchers,
            max_cups,
            lemons_used: used.lemons,
            sugar_used: used.sugar,
            ice_used: used.ice,
        }
    }
}

fn weather_bonus(condition: WeatherCondition) -> i64 {
    match condition {
        WeatherCondition::Sunny => 15,
        WeatherCondition::PartlyCloudy => 10,
        WeatherCondition::Cloudy => 5,
        WeatherCondition::Rainy => -10,
    }
}

/// Customers drawn to the stand before supply limits apply. Never negative.
pub fn potential_customers(weather: &Weather, price: f64) -> u32 {
    let mut customers = i64::from(weather.temperature).div_euclid(3);
    customers += weather_bonus(weather.condition);

    // Both elasticity rules are checked on their own.
    if price <= CHEAP_PRICE_CEILING {
        customers += CHEAP_PRICE_BONUS;
    }
    if price > PREMIUM_PRICE_FLOOR {
        let penalty = ((price - PREMIUM_PRICE_FLOOR) * PREMIUM_PRICE_PENALTY_RATE).floor() as i64;
        customers = customers.saturating_sub(penalty);
    }

    u32::try_from(customers.max(0)).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyResults {
    pub sales: u32,
    pub revenue: f64,
    pub profit: f64,
    pub potential_customers: u32,
    pub unsatisfied_customers: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaleOutcome {
    pub results: DailyResults,
    pub inventory: Inventory,
}

pub fn resolve_sale(
    inventory: &Inventory,
    weather: &Weather,
    price: f64,
    cost_per_cup: f64,
) -> SaleOutcome {
    let recipe = Recipe::for_inventory(inventory);
    let potential = potential_customers(weather, price);
    let sales = potential.min(recipe.max_cups);

    let revenue = f64::from(sales) * price;
    let profit = revenue - cost_per_cup * f64::from(sales);

    let used = ingredients_for(sales);
    let remaining = Inventory {
        cups: inventory.cups.saturating_sub(sales),
        lemons: inventory.lemons.saturating_sub(used.lemons),
        sugar: inventory.sugar.saturating_sub(used.sugar),
        ice: inventory.ice,
    }
    .melt_ice();

    SaleOutcome {
        results: DailyResults {
            sales,
            revenue,
            profit,
            potential_customers: potential,
            unsatisfied_customers: potential.saturating_sub(sales),
        },
        inventory: remaining,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn one_pitcher() -> Inventory {
        Inventory {
            cups: 10,
            lemons: 4,
            sugar: 4,
            ice: 15,
        }
    }

    #[test]
    fn purchase_cost_sums_unit_prices() {
        let order = SupplyOrder {
            cups: 10,
            lemons: 4,
            sugar: 4,
            ice: 15,
        };
        assert!((purchase_cost(&order) - 1.52).abs() < EPSILON);
        assert_eq!(purchase_cost(&SupplyOrder::default()), 0.0);
    }

    #[test]
    fn cost_per_cup_divides_by_at_least_one() {
        assert!((cost_per_cup(1.52, 10) - 0.152).abs() < EPSILON);
        assert!((cost_per_cup(0.4, 0) - 0.4).abs() < EPSILON);
    }

    #[test]
    fn delivery_adds_each_requested_quantity() {
        let order = SupplyOrder {
            cups: 3,
            ice: 9,
            ..SupplyOrder::default()
        };
        let next = order.deliver_to(&one_pitcher());
        assert_eq!(
            next,
            Inventory {
                cups: 13,
                lemons: 4,
                sugar: 4,
                ice: 24
            }
        );
    }

    #[test]
    fn recipe_is_limited_by_scarcest_ingredient() {
        let inventory = Inventory {
            cups: 100,
            lemons: 12,
            sugar: 40,
            ice: 30,
        };
        let recipe = Recipe::for_inventory(&inventory);
        assert_eq!(recipe.pitchers, 2);
        assert_eq!(recipe.max_cups, 20);
        assert_eq!(recipe.lemons_used, 8);
        assert_eq!(recipe.sugar_used, 8);
        assert_eq!(recipe.ice_used, 30);
    }

    #[test]
    fn recipe_is_limited_by_cups_on_hand() {
        let inventory = Inventory {
            cups: 7,
            lemons: 8,
            sugar: 8,
            ice: 30,
        };
        let recipe = Recipe::for_inventory(&inventory);
        assert_eq!(recipe.max_cups, 7);
        assert_eq!(recipe.lemons_used, 2);
        assert_eq!(recipe.sugar_used, 2);
        assert_eq!(recipe.ice_used, 10);
    }

    #[test]
    fn demand_follows_temperature_and_condition() {
        let sunny = Weather::new(80, WeatherCondition::Sunny);
        assert_eq!(potential_customers(&sunny, 0.25), 41);

        let partly = Weather::new(60, WeatherCondition::PartlyCloudy);
        assert_eq!(potential_customers(&partly, 0.25), 30);

        let cloudy = Weather::new(61, WeatherCondition::Cloudy);
        assert_eq!(potential_customers(&cloudy, 0.25), 25);

        let rainy = Weather::new(50, WeatherCondition::Rainy);
        assert_eq!(potential_customers(&rainy, 0.25), 6);
    }

    #[test]
    fn cheap_lemonade_draws_extra_customers() {
        let weather = Weather::new(75, WeatherCondition::Cloudy);
        assert_eq!(potential_customers(&weather, 0.15), 40);
        assert_eq!(potential_customers(&weather, 0.16), 30);
    }

    #[test]
    fn premium_prices_lose_customers_and_floor_at_zero() {
        let weather = Weather::new(90, WeatherCondition::Sunny);
        assert_eq!(potential_customers(&weather, 0.50), 45);
        assert_eq!(potential_customers(&weather, 1.00), 30);
        assert_eq!(potential_customers(&weather, 5.00), 0);
        assert_eq!(potential_customers(&weather, f64::MAX), 0);
    }

    #[test]
    fn demand_never_rises_with_premium_price() {
        let weather = Weather::new(85, WeatherCondition::PartlyCloudy);
        let mut previous = potential_customers(&weather, 0.51);
        for step in 1..400 {
            let price = 0.51 + f64::from(step) * 0.01;
            let current = potential_customers(&weather, price);
            assert!(current <= previous, "demand rose at price {price}");
            previous = current;
        }
    }

    #[test]
    fn sale_scenario_on_a_hot_sunny_day() {
        let weather = Weather::new(80, WeatherCondition::Sunny);
        let outcome = resolve_sale(&one_pitcher(), &weather, 0.25, 0.152);

        assert_eq!(outcome.results.potential_customers, 41);
        assert_eq!(outcome.results.sales, 10);
        assert_eq!(outcome.results.unsatisfied_customers, 31);
        assert!((outcome.results.revenue - 2.50).abs() < EPSILON);
        assert!((outcome.results.profit - 0.98).abs() < EPSILON);
        assert_eq!(outcome.inventory, Inventory::default());
    }

    #[test]
    fn sale_consumes_ingredients_for_actual_sales_only() {
        let inventory = Inventory {
            cups: 50,
            lemons: 20,
            sugar: 20,
            ice: 75,
        };
        let weather = Weather::new(50, WeatherCondition::Rainy);
        let outcome = resolve_sale(&inventory, &weather, 0.25, 0.1);

        assert_eq!(outcome.results.sales, 6);
        assert_eq!(outcome.results.unsatisfied_customers, 0);
        assert_eq!(
            outcome.inventory,
            Inventory {
                cups: 44,
                lemons: 18,
                sugar: 18,
                ice: 0
            }
        );
    }

    #[test]
    fn nothing_sells_without_a_full_pitcher() {
        let inventory = Inventory {
            cups: 30,
            lemons: 3,
            sugar: 10,
            ice: 40,
        };
        let weather = Weather::new(88, WeatherCondition::Sunny);
        let outcome = resolve_sale(&inventory, &weather, 0.30, 0.05);

        assert_eq!(outcome.results.sales, 0);
        assert_eq!(outcome.results.revenue, 0.0);
        assert_eq!(outcome.inventory.cups, 30);
        assert_eq!(outcome.inventory.lemons, 3);
        assert_eq!(outcome.inventory.ice, 0);
    }
}
