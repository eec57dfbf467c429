use thiserror::Error;

pub type RecipeResult<T> = Result<T, RecipeError>;

#[derive(Error, Debug)]
pub enum RecipeError {
    #[error("Recipe not found")]
    NotFound,

    #[error("Ingredient {0} does not exist!")]
    IngredientNotFound(i64),

    #[error("Only the author may modify this recipe")]
    PermissionDenied,

    #[error("{0}")]
    ValidationError(String),

    #[error("Recipe is already in favorites!")]
    AlreadyFavorited,

    #[error("Recipe is not in favorites!")]
    NotFavorited,

    #[error("Recipe is already in the shopping cart!")]
    AlreadyInCart,

    #[error("Recipe is not in the shopping cart!")]
    NotInCart,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error(transparent)]
    UserError(#[from] foodgram_user::UserError),
}
