
use sqlx::{Executor, Postgres};

/// Farcaster account node carrying a credibility score
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct SocialAccount {
    pub id: i32,
    pub fid: i64,
    pub node_key: String,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub fc_cred_score: Option<f64>,
}

impl SocialAccount {
    /// Find accounts sitting on any of the given graph nodes
    pub async fn find_by_node_keys<'c, E>(
        node_keys: &[String],
        connection: E,
    ) -> Result<Vec<SocialAccount>, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query_as::<_, SocialAccount>(
            "SELECT * FROM social_accounts WHERE node_key = ANY($1) ORDER BY fid",
        )
        .bind(node_keys)
        .fetch_all(connection)
        .await
    }
}
