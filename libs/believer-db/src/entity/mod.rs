// Holding graph entities
pub mod account_link;
pub mod social_account;
pub mod token;
pub mod token_holder;

// Re-exports for convenience
pub use account_link::AccountLink;
pub use social_account::SocialAccount;
pub use token::Token;
pub use token_holder::TokenHolder;
