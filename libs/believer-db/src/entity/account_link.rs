
use sqlx::{Executor, Postgres};

/// Undirected ACCOUNT edge between two graph nodes (wallets, social
/// accounts or intermediate accounts such as ENS names)
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct AccountLink {
    pub source_key: String,
    pub target_key: String,
}

impl AccountLink {
    /// Get every edge touching one of the given nodes, in either direction
    pub async fn find_touching<'c, E>(
        node_keys: &[String],
        connection: E,
    ) -> Result<Vec<AccountLink>, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query_as::<_, AccountLink>(
            r#"
            SELECT source_key, target_key
            FROM account_links
            WHERE source_key = ANY($1) OR target_key = ANY($1)
            "#,
        )
        .bind(node_keys)
        .fetch_all(connection)
        .await
    }
}
