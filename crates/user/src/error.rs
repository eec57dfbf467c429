use thiserror::Error;

pub type UserResult<T> = Result<T, UserError>;

#[derive(Error, Debug)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("Unable to log in with provided credentials.")]
    InvalidCredentials,

    #[error("You cannot subscribe to yourself!")]
    SelfSubscription,

    #[error("You are already subscribed!")]
    AlreadySubscribed,

    #[error("Subscription does not exist!")]
    NotSubscribed,

    #[error("{0}")]
    ValidationError(String),

    #[error("Password hashing error: {0}")]
    HashingError(String),

    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}
