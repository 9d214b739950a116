
use sqlx::{
    types::{chrono, BigDecimal},
    Executor, Postgres,
};

/// Token node of the holding graph
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Token {
    pub id: i32,
    pub address: String,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub market_cap: Option<BigDecimal>,
    pub last_updated: Option<chrono::DateTime<chrono::Utc>>,
}

impl Token {
    /// Find token by address (addresses are stored lowercase)
    pub async fn find_by_address<'c, E>(
        address: &str,
        connection: E,
    ) -> Result<Option<Token>, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query_as::<_, Token>("SELECT * FROM tokens WHERE address = LOWER($1)")
            .bind(address)
            .fetch_optional(connection)
            .await
    }

    /// Get every token in the graph
    pub async fn find_all<'c, E>(connection: E) -> Result<Vec<Token>, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query_as::<_, Token>("SELECT * FROM tokens ORDER BY address")
            .fetch_all(connection)
            .await
    }

    /// Get market cap for a token, `None` when the token or its cap is missing
    pub async fn find_market_cap<'c, E>(
        address: &str,
        connection: E,
    ) -> Result<Option<BigDecimal>, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        let cap: Option<Option<BigDecimal>> =
            sqlx::query_scalar("SELECT market_cap FROM tokens WHERE address = LOWER($1)")
                .bind(address)
                .fetch_optional(connection)
                .await?;

        Ok(cap.flatten())
    }
}
