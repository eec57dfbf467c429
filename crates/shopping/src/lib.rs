mod aggregation;
mod error;

pub use error::{ShoppingError, ShoppingResult};

pub use aggregation::{
    AggregatedIngredient, EMPTY_CART_MESSAGE, SHOPPING_LIST_FILENAME, aggregate_cart,
    render_shopping_list,
};
