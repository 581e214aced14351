//! Redis implementation of the link repository.
//!
//! Records are stored as hashes under `url:<id>` with the fields `alias`,
//! `urlToDirect` and `visits`. A RediSearch index over the `alias` field
//! serves lookups:
//!
//! ```text
//! FT.CREATE idx:url ON HASH PREFIX 1 url: SCHEMA alias TAG CASESENSITIVE
//! ```
//!
//! Alias uniqueness is enforced at write time. Each create runs a Lua script
//! that claims the key `alias:<alias>` with `SETNX` and writes the record
//! hash in the same atomic step, so two concurrent creates for one alias
//! cannot both succeed.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, RedisError, Script, Value};
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::entities::{LinkRecord, NewLinkRecord};
use crate::domain::repositories::{LinkRepository, StoreError, StoreResult};
use crate::utils::query_escape::tag_query;

/// Key prefix of record hashes, also the index prefix.
pub const RECORD_KEY_PREFIX: &str = "url:";

/// Key prefix of alias reservation keys.
pub const ALIAS_KEY_PREFIX: &str = "alias:";

const FIELD_ALIAS: &str = "alias";
const FIELD_TARGET_URL: &str = "urlToDirect";
const FIELD_VISITS: &str = "visits";

/// KEYS[1] = alias reservation key, KEYS[2] = record key.
/// ARGV = id, alias, target url. Returns 1 when created, 0 when the alias is taken.
const CREATE_SCRIPT: &str = r#"
if redis.call('SETNX', KEYS[1], ARGV[1]) == 0 then
    return 0
end
redis.call('HSET', KEYS[2], 'alias', ARGV[2], 'urlToDirect', ARGV[3], 'visits', 0)
return 1
"#;

/// KEYS[1] = record key. Returns the new count, or -1 if the record does not exist.
const INCREMENT_SCRIPT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 0 then
    return -1
end
return redis.call('HINCRBY', KEYS[1], 'visits', 1)
"#;

const CONNECT_ATTEMPTS: usize = 5;

/// Number of index hits inspected per lookup.
const SEARCH_LIMIT: usize = 10;

/// Connection and query settings for [`RedisLinkRepository`].
#[derive(Debug, Clone)]
pub struct RedisStoreOptions {
    /// Name of the RediSearch index over record hashes.
    pub index_name: String,
    /// Upper bound for every individual store operation.
    pub operation_timeout: Duration,
}

impl Default for RedisStoreOptions {
    fn default() -> Self {
        Self {
            index_name: "idx:url".to_string(),
            operation_timeout: Duration::from_secs(2),
        }
    }
}

/// Redis + RediSearch link store.
///
/// Holds a single `ConnectionManager`, which multiplexes concurrent requests
/// over one connection and reconnects on failure. Cloning the manager is
/// cheap and each operation works on its own clone.
pub struct RedisLinkRepository {
    connection: ConnectionManager,
    options: RedisStoreOptions,
    create_script: Script,
    increment_script: Script,
}

impl RedisLinkRepository {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// The initial connection is retried with jittered exponential backoff.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the URL is invalid or no
    /// connection could be established.
    pub async fn connect(redis_url: &str, options: RedisStoreOptions) -> StoreResult<Self> {
        info!(
            "Connecting to Redis at {}",
            crate::config::mask_connection_string(redis_url)
        );

        let client = Client::open(redis_url).map_err(|e| {
            StoreError::Unavailable(format!("Failed to create Redis client: {}", e))
        })?;

        let strategy = ExponentialBackoff::from_millis(2)
            .factor(50)
            .max_delay(Duration::from_secs(2))
            .map(jitter)
            .take(CONNECT_ATTEMPTS - 1);

        let manager = Retry::spawn(strategy, || {
            let client = client.clone();
            async move {
                ConnectionManager::new(client).await.inspect_err(|e| {
                    warn!(error = %e, "Redis connection attempt failed");
                })
            }
        })
        .await
        .map_err(|e| StoreError::Unavailable(format!("Failed to connect to Redis: {}", e)))?;

        let repository = Self::new(manager, options);

        let mut conn = repository.connection.clone();
        repository.bounded("ping", conn.ping::<()>()).await?;

        info!("Connected to Redis");
        Ok(repository)
    }

    /// Wraps an existing connection.
    pub fn new(connection: ConnectionManager, options: RedisStoreOptions) -> Self {
        Self {
            connection,
            options,
            create_script: Script::new(CREATE_SCRIPT),
            increment_script: Script::new(INCREMENT_SCRIPT),
        }
    }

    /// Creates the alias search index if it does not exist yet.
    ///
    /// Returns `true` if the index was created, `false` if it already existed.
    pub async fn ensure_index(&self) -> StoreResult<bool> {
        let mut conn = self.connection.clone();
        let mut cmd = redis::cmd("FT.CREATE");
        cmd.arg(&self.options.index_name)
            .arg("ON")
            .arg("HASH")
            .arg("PREFIX")
            .arg(1)
            .arg(RECORD_KEY_PREFIX)
            .arg("SCHEMA")
            .arg(FIELD_ALIAS)
            .arg("TAG")
            .arg("CASESENSITIVE");

        let after = self.options.operation_timeout;
        let result = tokio::time::timeout(after, cmd.query_async::<()>(&mut conn))
            .await
            .map_err(|_| StoreError::Timeout {
                operation: "ensure_index",
                after,
            })?;

        match result {
            Ok(()) => {
                info!(index = %self.options.index_name, "Created search index");
                Ok(true)
            }
            Err(e) if e.to_string().contains("Index already exists") => {
                debug!(index = %self.options.index_name, "Search index already exists");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Drops the search index definition. Record hashes are kept.
    pub async fn drop_index(&self) -> StoreResult<()> {
        let mut conn = self.connection.clone();
        let mut cmd = redis::cmd("FT.DROPINDEX");
        cmd.arg(&self.options.index_name);

        self.bounded("drop_index", cmd.query_async::<()>(&mut conn)).await
    }

    /// Name of the search index this repository queries.
    pub fn index_name(&self) -> &str {
        &self.options.index_name
    }

    /// Runs `fut` under the configured operation timeout.
    async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> StoreResult<T>
    where
        F: Future<Output = Result<T, RedisError>>,
    {
        let after = self.options.operation_timeout;
        match tokio::time::timeout(after, fut).await {
            Ok(result) => result.map_err(StoreError::from),
            Err(_) => Err(StoreError::Timeout { operation, after }),
        }
    }

    /// Searches the index and returns the keys of matching record hashes.
    async fn search_keys(&self, alias: &str) -> StoreResult<Vec<String>> {
        let mut conn = self.connection.clone();
        let cmd = search_command(&self.options.index_name, alias);

        let reply = self
            .bounded("find_by_alias", cmd.query_async::<Value>(&mut conn))
            .await?;
        parse_search_keys(reply)
    }

    async fn load_record(&self, key: &str) -> StoreResult<Option<LinkRecord>> {
        let mut conn = self.connection.clone();
        let fields: HashMap<String, String> =
            self.bounded("find_by_alias", conn.hgetall(key)).await?;

        if fields.is_empty() {
            return Ok(None);
        }

        record_from_hash(key, fields).map(Some)
    }
}

#[async_trait]
impl LinkRepository for RedisLinkRepository {
    async fn find_by_alias(&self, alias: &str) -> StoreResult<Option<LinkRecord>> {
        for key in self.search_keys(alias).await? {
            if let Some(record) = self.load_record(&key).await?
                && record.alias == alias
            {
                return Ok(Some(record));
            }
        }

        debug!(alias, "No record for alias");
        Ok(None)
    }

    async fn create(&self, new_record: NewLinkRecord) -> StoreResult<LinkRecord> {
        let id = Uuid::new_v4().to_string();
        let mut conn = self.connection.clone();

        let mut invocation = self.create_script.prepare_invoke();
        invocation
            .key(alias_key(&new_record.alias))
            .key(record_key(&id))
            .arg(&id)
            .arg(&new_record.alias)
            .arg(&new_record.target_url);

        let created: i64 = self
            .bounded("create", invocation.invoke_async(&mut conn))
            .await?;

        if created == 0 {
            return Err(StoreError::AliasTaken(new_record.alias));
        }

        debug!(alias = %new_record.alias, id = %id, "Record created");
        Ok(new_record.into_record(id))
    }

    async fn increment_visits(&self, id: &str) -> StoreResult<u64> {
        let mut conn = self.connection.clone();

        let mut invocation = self.increment_script.prepare_invoke();
        invocation.key(record_key(id));

        let visits: i64 = self
            .bounded("increment_visits", invocation.invoke_async(&mut conn))
            .await?;

        u64::try_from(visits).map_err(|_| StoreError::MissingRecord(id.to_string()))
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.connection.clone();
        self.bounded("ping", conn.ping::<()>()).await.is_ok()
    }
}

impl From<RedisError> for StoreError {
    fn from(e: RedisError) -> Self {
        if e.is_timeout()
            || e.is_io_error()
            || e.is_connection_dropped()
            || e.is_connection_refusal()
        {
            StoreError::Unavailable(e.to_string())
        } else {
            StoreError::Query(e.to_string())
        }
    }
}

/// Key of the record hash for `id`.
pub fn record_key(id: &str) -> String {
    format!("{}{}", RECORD_KEY_PREFIX, id)
}

/// Key of the reservation entry for `alias`.
pub fn alias_key(alias: &str) -> String {
    format!("{}{}", ALIAS_KEY_PREFIX, alias)
}

/// Builds the `FT.SEARCH` lookup for `alias`, returning keys only.
fn search_command(index_name: &str, alias: &str) -> redis::Cmd {
    let mut cmd = redis::cmd("FT.SEARCH");
    cmd.arg(index_name)
        .arg(tag_query(FIELD_ALIAS, alias))
        .arg("NOCONTENT")
        .arg("LIMIT")
        .arg(0)
        .arg(SEARCH_LIMIT);
    cmd
}

/// Extracts document keys from an `FT.SEARCH ... NOCONTENT` reply.
///
/// The RESP2 reply is `[total, key1, key2, ...]`; a RESP3 reply is a map
/// with a `results` array of `{id: key}` maps.
fn parse_search_keys(reply: Value) -> StoreResult<Vec<String>> {
    match reply {
        Value::Array(items) => Ok(items.into_iter().skip(1).filter_map(value_to_string).collect()),
        Value::Map(entries) => {
            let results = entries
                .into_iter()
                .find(|(k, _)| value_to_string(k.clone()).as_deref() == Some("results"))
                .map(|(_, v)| v);

            let Some(Value::Array(results)) = results else {
                return Ok(Vec::new());
            };

            Ok(results
                .into_iter()
                .filter_map(|result| match result {
                    Value::Map(fields) => fields
                        .into_iter()
                        .find(|(k, _)| value_to_string(k.clone()).as_deref() == Some("id"))
                        .and_then(|(_, v)| value_to_string(v)),
                    _ => None,
                })
                .collect())
        }
        other => Err(StoreError::Query(format!(
            "Unexpected FT.SEARCH reply: {:?}",
            other
        ))),
    }
}

fn value_to_string(value: Value) -> Option<String> {
    match value {
        Value::BulkString(bytes) => String::from_utf8(bytes).ok(),
        Value::SimpleString(s) => Some(s),
        Value::Int(i) => Some(i.to_string()),
        _ => None,
    }
}

/// Builds a record from the fields of hash `key`.
fn record_from_hash(key: &str, mut fields: HashMap<String, String>) -> StoreResult<LinkRecord> {
    let id = key
        .strip_prefix(RECORD_KEY_PREFIX)
        .ok_or_else(|| malformed(key, "key outside record prefix"))?
        .to_string();

    let alias = fields
        .remove(FIELD_ALIAS)
        .ok_or_else(|| malformed(key, "missing alias"))?;
    let target_url = fields
        .remove(FIELD_TARGET_URL)
        .ok_or_else(|| malformed(key, "missing urlToDirect"))?;
    let visits = match fields.remove(FIELD_VISITS) {
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|_| malformed(key, &format!("visits is not a counter: {}", raw)))?,
        None => 0,
    };

    Ok(LinkRecord::new(id, alias, target_url, visits))
}

fn malformed(key: &str, reason: &str) -> StoreError {
    StoreError::MalformedRecord {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn bulk(s: &str) -> Value {
        Value::BulkString(s.as_bytes().to_vec())
    }

    #[test]
    fn test_key_format() {
        assert_eq!(record_key("abc"), "url:abc");
        assert_eq!(alias_key("my-link"), "alias:my-link");
    }

    #[test]
    fn test_alias_keys_outside_index_prefix() {
        assert!(!alias_key("x").starts_with(RECORD_KEY_PREFIX));
    }

    #[test]
    fn test_record_from_hash() {
        let record = record_from_hash(
            "url:1234",
            hash(&[
                ("alias", "my-link"),
                ("urlToDirect", "https://example.com"),
                ("visits", "7"),
            ]),
        )
        .unwrap();

        assert_eq!(
            record,
            LinkRecord::new(
                "1234".into(),
                "my-link".into(),
                "https://example.com".into(),
                7
            )
        );
    }

    #[test]
    fn test_record_from_hash_missing_visits_defaults_to_zero() {
        let record = record_from_hash(
            "url:1",
            hash(&[("alias", "abcde"), ("urlToDirect", "example.com")]),
        )
        .unwrap();
        assert_eq!(record.visits, 0);
    }

    #[test]
    fn test_record_from_hash_rejects_missing_fields() {
        let result = record_from_hash("url:1", hash(&[("alias", "abcde")]));
        assert!(matches!(result, Err(StoreError::MalformedRecord { .. })));

        let result = record_from_hash("url:1", hash(&[("urlToDirect", "https://e.com")]));
        assert!(matches!(result, Err(StoreError::MalformedRecord { .. })));
    }

    #[test]
    fn test_record_from_hash_rejects_bad_counter() {
        let result = record_from_hash(
            "url:1",
            hash(&[
                ("alias", "abcde"),
                ("urlToDirect", "https://e.com"),
                ("visits", "-3"),
            ]),
        );
        assert!(matches!(result, Err(StoreError::MalformedRecord { .. })));
    }

    #[test]
    fn test_record_from_hash_rejects_foreign_key() {
        let result = record_from_hash(
            "other:1",
            hash(&[("alias", "abcde"), ("urlToDirect", "https://e.com")]),
        );
        assert!(matches!(result, Err(StoreError::MalformedRecord { .. })));
    }

    #[test]
    fn test_parse_resp2_search_reply() {
        let reply = Value::Array(vec![Value::Int(2), bulk("url:a"), bulk("url:b")]);
        assert_eq!(parse_search_keys(reply).unwrap(), vec!["url:a", "url:b"]);
    }

    #[test]
    fn test_parse_empty_search_reply() {
        let reply = Value::Array(vec![Value::Int(0)]);
        assert!(parse_search_keys(reply).unwrap().is_empty());
    }

    #[test]
    fn test_parse_resp3_search_reply() {
        let reply = Value::Map(vec![
            (bulk("total_results"), Value::Int(1)),
            (
                bulk("results"),
                Value::Array(vec![Value::Map(vec![(bulk("id"), bulk("url:a"))])]),
            ),
        ]);
        assert_eq!(parse_search_keys(reply).unwrap(), vec!["url:a"]);
    }

    #[test]
    fn test_parse_unexpected_reply() {
        assert!(matches!(
            parse_search_keys(Value::Nil),
            Err(StoreError::Query(_))
        ));
    }

    #[test]
    fn test_search_command_escapes_hyphen() {
        let cmd = search_command("idx:url", "my-link");

        let mut expected = redis::cmd("FT.SEARCH");
        expected
            .arg("idx:url")
            .arg(r"@alias:{my\-link}")
            .arg("NOCONTENT")
            .arg("LIMIT")
            .arg("0")
            .arg("10");

        assert_eq!(cmd.get_packed_command(), expected.get_packed_command());
    }

    #[test]
    fn test_search_command_keeps_query_syntax_inert() {
        let packed = search_command("idx:url", "a|b}*@x -y").get_packed_command();
        let needle = br"@alias:{a\|b\}\*\@x\ \-y}";

        assert!(
            packed.windows(needle.len()).any(|w| w == needle),
            "{}",
            String::from_utf8_lossy(&packed)
        );
    }

    #[test]
    fn test_increment_script_checks_existence_first() {
        let exists = INCREMENT_SCRIPT.find("EXISTS").unwrap();
        let hincrby = INCREMENT_SCRIPT.find("HINCRBY").unwrap();
        assert!(exists < hincrby);
        assert!(INCREMENT_SCRIPT.contains(&format!("'{}'", FIELD_VISITS)));
    }

    #[test]
    fn test_create_script_claims_alias_before_writing() {
        let setnx = CREATE_SCRIPT.find("SETNX").unwrap();
        let hset = CREATE_SCRIPT.find("HSET").unwrap();
        assert!(setnx < hset);
    }

    #[test]
    fn test_default_options() {
        let options = RedisStoreOptions::default();
        assert_eq!(options.index_name, "idx:url");
        assert_eq!(options.operation_timeout, Duration::from_secs(2));
    }
}
