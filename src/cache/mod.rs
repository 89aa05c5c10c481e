use anyhow::Result;
use redis::AsyncCommands;
use tracing::debug;

/// Redis-backed key/value store for the session token. A disabled cache
/// answers every read with a miss and drops writes.
pub struct Cache {
    client: Option<redis::Client>,
}

impl Cache {
    pub fn new(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)?;
        Ok(Cache { client: Some(client) })
    }

    pub fn disabled() -> Self {
        Cache { client: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    async fn connection(&self) -> Option<redis::aio::MultiplexedConnection> {
        let client = self.client.as_ref()?;
        match client.get_multiplexed_async_connection().await {
            Ok(conn) => Some(conn),
            Err(e) => {
                debug!("redis connection failed: {e}");
                None
            }
        }
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let Some(mut conn) = self.connection().await else {
            return Ok(None);
        };
        let val: Option<String> = conn.get(key).await?;
        Ok(val)
    }

    pub async fn set(&self, key: &str, value: &str, ttl_secs: Option<u64>) -> Result<()> {
        let Some(mut conn) = self.connection().await else {
            return Ok(());
        };
        match ttl_secs {
            Some(ttl) => conn.set_ex::<_, _, ()>(key, value, ttl).await?,
            None => conn.set::<_, _, ()>(key, value).await?,
        }
        Ok(())
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        if let Some(mut conn) = self.connection().await {
            conn.del::<_, ()>(key).await?;
        }
        Ok(())
    }

    pub async fn ping(&self) -> bool {
        let Some(mut conn) = self.connection().await else {
            return false;
        };
        let result: redis::RedisResult<String> = redis::cmd("PING").query_async(&mut conn).await;
        result.is_ok()
    }
}
