//! Restaurant and dish lookup tools over an in-memory catalogue.

use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};
use toolscope_context::CallScope;
use toolscope_models::ToolDefinition;
use toolscope_tools::{
    FaultInjector, Tool, ToolError, ToolFuture, ToolRegistry, TransientFault, decode_args,
    encode_output,
};

/// Parameters for the `query_restaurants` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QueryRestaurantsParams {
    /// The location of the restaurant.
    pub location: String,
    /// Top n restaurants in the location, sorted by score.
    #[serde(default)]
    pub topn: Option<usize>,
}

/// Parameters for the `query_dishes` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QueryDishesParams {
    /// The id of one restaurant.
    pub restaurant_id: String,
    /// Top n dishes in the restaurant, sorted by score.
    #[serde(default)]
    pub topn: Option<usize>,
}

/// A restaurant as returned to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    /// Stable id, used by `query_dishes`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// City the restaurant is in.
    pub place: String,
    /// Short description.
    pub desc: String,
    /// Score out of 10.
    pub score: u8,
}

/// A dish as returned to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dish {
    /// Dish name.
    pub name: String,
    /// Short description.
    pub desc: String,
    /// Price in yuan.
    pub price: u32,
    /// Score out of 10.
    pub score: u8,
}

// (id, name, place, desc, score)
const RESTAURANTS: &[(&str, &str, &str, &str, u8)] = &[
    ("bj-1", "Sichuan Corner", "Beijing", "Numbing and spicy Sichuan classics", 9),
    ("bj-2", "Hunan Fire", "Beijing", "Smoky Hunan cooking, very hot", 8),
    ("bj-3", "Quanjude", "Beijing", "Roast duck since 1864", 7),
    ("sh-1", "Old Jesse", "Shanghai", "Home-style Shanghainese", 9),
    ("sh-2", "Din Tai Fung", "Shanghai", "Soup dumplings", 8),
];

// (restaurant id, name, desc, price, score)
const DISHES: &[(&str, &str, &str, u32, u8)] = &[
    ("bj-1", "Mapo Tofu", "Silken tofu in chilli bean sauce", 38, 9),
    ("bj-1", "Boiled Fish", "Fish slices in chilli oil", 88, 9),
    ("bj-1", "Dan Dan Noodles", "Noodles with spicy pork", 28, 7),
    ("bj-2", "Chopped Chilli Fish Head", "Steamed with pickled chillies", 98, 9),
    ("bj-2", "Farmer's Pork", "Stir-fried pork belly with green chilli", 58, 8),
    ("bj-3", "Peking Duck", "Carved at the table", 268, 9),
    ("sh-1", "Red-braised Pork", "Slow-cooked in soy and sugar", 78, 9),
    ("sh-2", "Xiaolongbao", "Pork soup dumplings", 60, 9),
];

/// Looks up restaurants in a location.
#[derive(Debug)]
pub struct QueryRestaurants {
    faults: FaultInjector,
}

impl QueryRestaurants {
    /// Default number of restaurants returned.
    pub const DEFAULT_TOPN: usize = 3;

    /// Creates the tool with fault injection disabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            faults: FaultInjector::disabled(),
        }
    }

    /// Makes the backing service fail transiently, driven by `faults`.
    #[must_use]
    pub fn with_faults(mut self, faults: FaultInjector) -> Self {
        self.faults = faults.with_fault(TransientFault::retryable(
            "service temporarily unavailable",
            "The restaurant service is temporarily unavailable. Please retry later.",
        ));
        self
    }

    fn lookup(params: &QueryRestaurantsParams) -> Vec<Restaurant> {
        let mut found: Vec<Restaurant> = RESTAURANTS
            .iter()
            .filter(|(_, _, place, _, _)| place.eq_ignore_ascii_case(&params.location))
            .map(|&(id, name, place, desc, score)| Restaurant {
                id: id.to_string(),
                name: name.to_string(),
                place: place.to_string(),
                desc: desc.to_string(),
                score,
            })
            .collect();
        found.sort_by(|a, b| b.score.cmp(&a.score));
        found.truncate(params.topn.unwrap_or(Self::DEFAULT_TOPN));
        found
    }
}

impl Default for QueryRestaurants {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for QueryRestaurants {
    fn definition(&self) -> ToolDefinition {
        tool_def::<QueryRestaurantsParams>("query_restaurants", "Query restaurants")
    }

    fn execute<'a>(&'a self, _scope: &'a CallScope, args: &'a str) -> ToolFuture<'a> {
        Box::pin(async move {
            let params: QueryRestaurantsParams = decode_args(args)?;
            self.faults.check()?;
            encode_output(&Self::lookup(&params))
        })
    }
}

/// Lists the dishes of one restaurant.
#[derive(Debug, Default)]
pub struct QueryDishes;

impl QueryDishes {
    /// Default number of dishes returned.
    pub const DEFAULT_TOPN: usize = 5;
}

impl Tool for QueryDishes {
    fn definition(&self) -> ToolDefinition {
        tool_def::<QueryDishesParams>("query_dishes", "Query the dishes a restaurant serves")
    }

    fn execute<'a>(&'a self, _scope: &'a CallScope, args: &'a str) -> ToolFuture<'a> {
        Box::pin(async move {
            let params: QueryDishesParams = decode_args(args)?;
            if !RESTAURANTS.iter().any(|(id, ..)| *id == params.restaurant_id) {
                return Err(ToolError::execution(format!(
                    "no restaurant with id '{}'",
                    params.restaurant_id
                )));
            }
            let mut dishes: Vec<Dish> = DISHES
                .iter()
                .filter(|(owner, ..)| *owner == params.restaurant_id)
                .map(|&(_, name, desc, price, score)| Dish {
                    name: name.to_string(),
                    desc: desc.to_string(),
                    price,
                    score,
                })
                .collect();
            dishes.sort_by(|a, b| b.score.cmp(&a.score));
            dishes.truncate(params.topn.unwrap_or(Self::DEFAULT_TOPN));
            encode_output(&dishes)
        })
    }
}

fn tool_def<T: JsonSchema>(name: &str, description: &str) -> ToolDefinition {
    let mut schema = schema_for!(T).to_value();
    if let Some(obj) = schema.as_object_mut() {
        obj.remove("$schema");
        obj.insert("additionalProperties".to_string(), serde_json::json!(false));
    }
    ToolDefinition::new(name, description, schema)
}

/// Builds a registry holding both tools, each behind a
/// [`SafeTool`](toolscope_tools::SafeTool).
#[must_use]
pub fn registry(faults: FaultInjector) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register_safe(QueryRestaurants::new().with_faults(faults));
    registry.register_safe(QueryDishes);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use toolscope_context::{ExecutionState, bind_state};

    #[tokio::test]
    async fn restaurants_sorted_and_limited() {
        let out = QueryRestaurants::new()
            .execute(&CallScope::new(), r#"{"location":"beijing","topn":2}"#)
            .await
            .unwrap();
        let found: Vec<Restaurant> = serde_json::from_str(&out).unwrap();
        let ids: Vec<_> = found.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["bj-1", "bj-2"]);
    }

    #[tokio::test]
    async fn unknown_restaurant_is_an_execution_error() {
        let err = QueryDishes
            .execute(&CallScope::new(), r#"{"restaurant_id":"nowhere"}"#)
            .await
            .unwrap_err();
        assert!(!err.is_argument_error());
    }

    #[tokio::test]
    async fn registry_downgrades_injected_faults() {
        let registry = registry(FaultInjector::with_probability(1.0).with_seed(1));
        let state = Arc::new(ExecutionState::new());
        let scope = bind_state(&CallScope::new(), Arc::clone(&state));

        let out = registry
            .execute(&scope, "query_restaurants", r#"{"location":"Beijing"}"#)
            .await
            .unwrap();

        let fault = TransientFault::parse(&out).unwrap();
        assert!(fault.should_retry());
        assert_eq!(fault.error, "service temporarily unavailable");
        assert_eq!(state.outcome(), Some(false));
    }

    #[test]
    fn definitions_carry_schemas() {
        let registry = registry(FaultInjector::disabled());
        let defs = registry.definitions();
        assert_eq!(defs[0].name, "query_restaurants");
        assert_eq!(defs[0].parameters["required"], serde_json::json!(["location"]));
        assert_eq!(defs[1].parameters["additionalProperties"], serde_json::json!(false));
    }
}
