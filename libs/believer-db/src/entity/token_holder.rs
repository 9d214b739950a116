
use sqlx::{
    types::{chrono, BigDecimal},
    Executor, Postgres,
};

/// TokenHolder entity representing a wallet holding a token
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct TokenHolder {
    pub id: i32,
    pub token_address: String,
    pub wallet_address: String,
    pub balance: Option<BigDecimal>,
    pub last_updated: Option<chrono::DateTime<chrono::Utc>>,
}

impl TokenHolder {
    /// Get every holding record across all tokens
    pub async fn find_all<'c, E>(connection: E) -> Result<Vec<TokenHolder>, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query_as::<_, TokenHolder>(
            "SELECT * FROM token_holders ORDER BY token_address, wallet_address",
        )
        .fetch_all(connection)
        .await
    }

    /// Get holding records for one token
    pub async fn find_by_token<'c, E>(
        token_address: &str,
        connection: E,
    ) -> Result<Vec<TokenHolder>, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query_as::<_, TokenHolder>(
            "SELECT * FROM token_holders WHERE token_address = LOWER($1) ORDER BY wallet_address",
        )
        .bind(token_address)
        .fetch_all(connection)
        .await
    }
}
