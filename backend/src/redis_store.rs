use crate::error::{Result, StoreError};
use crate::store::{apply_changes, new_todo, TodoStore};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, Cmd, ExistenceCheck, SetOptions};
use shared::{Todo, TodoId, UpdateTodoRequest};

/// Ids in creation order.
const ORDER_KEY: &str = "todos:order";

fn todo_key(id: &TodoId) -> String {
    format!("todo:{}", id)
}

/// `SET key json XX`: only overwrites a todo that still exists, so a
/// concurrent delete is never undone.
fn overwrite_existing(key: &str, todo_json: &str) -> Cmd {
    Cmd::set_options(
        key,
        todo_json,
        SetOptions::default().conditional_set(ExistenceCheck::XX),
    )
}

/// Pair ordered ids with their `MGET` replies, skipping holes and bad records.
fn collect_listed(ids: Vec<String>, records: Vec<Option<String>>) -> Vec<Todo> {
    ids.into_iter()
        .zip(records)
        .filter_map(|(id, record)| match record.map(|json| serde_json::from_str::<Todo>(&json)) {
            Some(Ok(todo)) => Some(todo),
            Some(Err(e)) => {
                tracing::warn!(%id, error = %e, "skipping unreadable todo");
                None
            }
            None => {
                tracing::warn!(%id, "order list references missing todo");
                None
            }
        })
        .collect()
}

/// Todos stored as JSON strings under `todo:{id}`, ordered by `todos:order`.
#[derive(Debug, Clone)]
pub struct RedisStore {
    client: Client,
}

impl RedisStore {
    pub fn open(url: &str) -> Result<Self> {
        Ok(Self {
            client: Client::open(url)?,
        })
    }
}

#[async_trait]
impl TodoStore for RedisStore {
    async fn list(&self) -> Result<Vec<Todo>> {
        let mut conn = self.client.get_async_connection().await?;

        let ids: Vec<String> = conn.lrange(ORDER_KEY, 0, -1).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = ids.iter().map(|id| todo_key(&TodoId::from(id.as_str()))).collect();
        let records: Vec<Option<String>> = conn.mget(keys).await?;

        Ok(collect_listed(ids, records))
    }

    async fn create(&self, text: String) -> Result<Todo> {
        let todo = new_todo(&text)?;
        let todo_json = serde_json::to_string(&todo)?;

        let mut conn = self.client.get_async_connection().await?;
        redis::pipe()
            .atomic()
            .set(todo_key(&todo.id), &todo_json)
            .ignore()
            .rpush(ORDER_KEY, todo.id.as_str())
            .ignore()
            .query_async::<_, ()>(&mut conn)
            .await?;

        Ok(todo)
    }

    async fn update(&self, id: &TodoId, changes: UpdateTodoRequest) -> Result<Todo> {
        let mut conn = self.client.get_async_connection().await?;
        let key = todo_key(id);

        let todo_json: Option<String> = conn.get(&key).await?;
        let mut todo: Todo = serde_json::from_str(&todo_json.ok_or(StoreError::NotFound)?)?;

        apply_changes(&mut todo, changes)?;

        let updated_json = serde_json::to_string(&todo)?;
        let reply: Option<String> = overwrite_existing(&key, &updated_json)
            .query_async(&mut conn)
            .await?;
        if reply.is_none() {
            return Err(StoreError::NotFound);
        }

        Ok(todo)
    }

    async fn delete(&self, id: &TodoId) -> Result<()> {
        let mut conn = self.client.get_async_connection().await?;

        let (deleted, _): (usize, usize) = redis::pipe()
            .atomic()
            .del(todo_key(id))
            .lrem(ORDER_KEY, 0, id.as_str())
            .query_async(&mut conn)
            .await?;

        if deleted == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_keys_are_namespaced() {
        assert_eq!(todo_key(&TodoId::from("abc")), "todo:abc");
    }

    #[test]
    fn update_only_overwrites_existing_key() {
        let packed = overwrite_existing("todo:1", "{}").get_packed_command();
        let packed = String::from_utf8(packed).unwrap();
        assert!(packed.contains("SET"));
        assert!(packed.contains("todo:1"));
        assert!(packed.ends_with("$2\r\nXX\r\n"));
    }

    #[test]
    fn listing_keeps_order_and_skips_bad_records() {
        let ids = vec!["b".to_string(), "gone".to_string(), "bad".to_string(), "a".to_string()];
        let records = vec![
            Some(r#"{"_id":"b","text":"second","completed":false}"#.to_string()),
            None,
            Some("not json".to_string()),
            Some(r#"{"_id":"a","text":"first","completed":true}"#.to_string()),
        ];

        let todos = collect_listed(ids, records);

        let ids: Vec<&str> = todos.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert!(todos[1].completed);
    }

    #[test]
    fn open_rejects_malformed_url() {
        assert!(matches!(
            RedisStore::open("not a url"),
            Err(StoreError::Backend(_))
        ));
    }
}
