mod catalog;
mod error;
mod query;
mod relations;
mod write;

pub use catalog::{
    Ingredient, IngredientSeed, Tag, load_ingredients, query_ingredient_by_id, query_ingredients,
    query_tag_by_id, query_tags, seed_tags,
};
pub use error::{RecipeError, RecipeResult};
pub use query::{
    RecipeDetail, RecipeFilter, RecipeIngredientDetail, query_recipe_by_id, query_recipes,
};
pub use relations::{
    RecipeSummary, add_favorite, add_to_cart, remove_favorite, remove_from_cart,
};
pub use write::{
    IngredientAmount, RecipeInput, RecipeUpdate, create_recipe, delete_recipe, update_recipe,
    validate_payload,
};
