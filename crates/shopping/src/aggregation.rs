use sqlx::SqlitePool;
use sqlx::prelude::FromRow;

use crate::error::ShoppingResult;

/// Fixed attachment name for the downloadable report
pub const SHOPPING_LIST_FILENAME: &str = "my_shopping_cart.txt";

/// Body returned when the user's cart holds no recipes
pub const EMPTY_CART_MESSAGE: &str = "Shopping cart is empty!";

/// One line of the aggregated shopping list: a (name, unit) group with the
/// summed amount across every cart recipe
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct AggregatedIngredient {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

/// Collect every ingredient row behind the user's cart, grouped by
/// (name, measurement unit) with amounts summed. One grouped query; ordered
/// by ingredient name so the report is deterministic.
pub async fn aggregate_cart(
    pool: &SqlitePool,
    user_id: i64,
) -> ShoppingResult<Vec<AggregatedIngredient>> {
    let items = sqlx::query_as::<_, AggregatedIngredient>(
        "SELECT i.name, i.measurement_unit, SUM(ri.amount) AS amount
         FROM shopping_cart sc
         JOIN recipe_ingredients ri ON ri.recipe_id = sc.recipe_id
         JOIN ingredients i ON i.id = ri.ingredient_id
         WHERE sc.user_id = ?1
         GROUP BY i.name, i.measurement_unit
         ORDER BY i.name, i.measurement_unit",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    tracing::debug!(user_id, items = items.len(), "shopping cart aggregated");

    Ok(items)
}

/// Render the aggregated ingredients as the numbered plain-text report
pub fn render_shopping_list(items: &[AggregatedIngredient]) -> String {
    if items.is_empty() {
        return EMPTY_CART_MESSAGE.to_string();
    }

    let mut report = String::from("Shopping list:\n\n");
    report.push_str(
        &items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                format!(
                    "{}. {} {} ({})",
                    index + 1,
                    item.name,
                    item.amount,
                    item.measurement_unit
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, unit: &str, amount: i64) -> AggregatedIngredient {
        AggregatedIngredient {
            name: name.to_string(),
            measurement_unit: unit.to_string(),
            amount,
        }
    }

    #[test]
    fn test_render_empty_cart_uses_fixed_message() {
        assert_eq!(render_shopping_list(&[]), EMPTY_CART_MESSAGE);
    }

    #[test]
    fn test_render_numbers_items_from_one() {
        let report = render_shopping_list(&[item("Salt", "g", 15), item("Sugar", "g", 3)]);

        assert_eq!(report, "Shopping list:\n\n1. Salt 15 (g)\n2. Sugar 3 (g)");
    }

    #[test]
    fn test_render_single_item_has_no_trailing_newline() {
        let report = render_shopping_list(&[item("Milk", "ml", 500)]);

        assert!(report.ends_with("1. Milk 500 (ml)"));
    }
}
