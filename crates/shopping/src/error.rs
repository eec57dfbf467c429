use thiserror::Error;

pub type ShoppingResult<T> = Result<T, ShoppingError>;

#[derive(Error, Debug)]
pub enum ShoppingError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}
