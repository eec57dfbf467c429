mod account;
mod error;
mod jwt;
mod password;
mod subscription;

pub use account::{
    ChangePasswordInput, RegisterInput, User, UserProfile, authenticate_user, change_password,
    query_user_by_email, query_user_by_id, query_user_profile, query_users, register_user,
};
pub use error::{UserError, UserResult};
pub use jwt::{Claims, generate_jwt, validate_jwt};
pub use password::{hash_password, verify_password};
pub use subscription::{
    RecipeSummary, SubscriptionProfile, query_subscriptions, subscribe, unsubscribe,
};
