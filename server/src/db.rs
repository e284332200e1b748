//! SQLite persistence for todos.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use todo_core::{Todo, TodoInput};

pub type DbPool = SqlitePool;

const CREATE_TODOS_TABLE: &str = "\
    CREATE TABLE IF NOT EXISTS todos ( \
        id INTEGER PRIMARY KEY, \
        title TEXT NOT NULL, \
        is_important BOOLEAN NOT NULL DEFAULT 0 \
    )";

const CREATE_TITLE_INDEX: &str = "CREATE INDEX IF NOT EXISTS ix_todos_title ON todos (title)";

/// Column list for `todos` queries.
const TODO_COLUMNS: &str = "id, title, is_important";

/// Open a connection pool for `database_url`, creating the file if needed.
///
/// An in-memory database lives only as long as its connection, so it is
/// pinned to a single connection that is never recycled.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool_options = if is_in_memory(database_url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(max_connections)
    };

    pool_options.connect_with(options).await
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Create the `todos` table and its title index if they do not exist yet.
pub async fn init_schema(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_TODOS_TABLE).execute(pool).await?;
    sqlx::query(CREATE_TITLE_INDEX).execute(pool).await?;
    Ok(())
}

/// A row from the `todos` table.
#[derive(Debug, Clone, FromRow)]
pub struct TodoRow {
    pub id: i64,
    pub title: String,
    pub is_important: bool,
}

impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        Todo {
            id: row.id,
            title: row.title,
            is_important: row.is_important,
        }
    }
}

/// Single-row data access for the `todos` table.
pub struct TodoRepo;

impl TodoRepo {
    /// Every stored todo, in storage order.
    pub async fn list_all(conn: &mut SqliteConnection) -> Result<Vec<Todo>, sqlx::Error> {
        let query = format!("SELECT {TODO_COLUMNS} FROM todos");
        let rows = sqlx::query_as::<_, TodoRow>(&query)
            .fetch_all(conn)
            .await?;
        Ok(rows.into_iter().map(Todo::from).collect())
    }

    pub async fn find_by_id(
        conn: &mut SqliteConnection,
        id: i64,
    ) -> Result<Option<Todo>, sqlx::Error> {
        let query = format!("SELECT {TODO_COLUMNS} FROM todos WHERE id = ?");
        let row = sqlx::query_as::<_, TodoRow>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await?;
        Ok(row.map(Todo::from))
    }

    /// Insert a new todo and return it with its assigned id.
    pub async fn create(conn: &mut SqliteConnection, input: &TodoInput) -> Result<Todo, sqlx::Error> {
        let query = format!(
            "INSERT INTO todos (title, is_important) VALUES (?, ?) RETURNING {TODO_COLUMNS}"
        );
        let row = sqlx::query_as::<_, TodoRow>(&query)
            .bind(&input.title)
            .bind(input.is_important)
            .fetch_one(conn)
            .await?;
        Ok(row.into())
    }

    /// Overwrite both mutable fields of the todo with `id`.
    ///
    /// Returns `None` without touching the table if no row has that id.
    pub async fn update(
        conn: &mut SqliteConnection,
        id: i64,
        input: &TodoInput,
    ) -> Result<Option<Todo>, sqlx::Error> {
        let query = format!(
            "UPDATE todos SET title = ?, is_important = ? WHERE id = ? RETURNING {TODO_COLUMNS}"
        );
        let row = sqlx::query_as::<_, TodoRow>(&query)
            .bind(&input.title)
            .bind(input.is_important)
            .bind(id)
            .fetch_optional(conn)
            .await?;
        Ok(row.map(Todo::from))
    }

    /// Remove the todo with `id`. Returns whether a row was deleted.
    pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use sqlx::pool::PoolConnection;
    use sqlx::Sqlite;

    use super::*;

    async fn memory_pool() -> DbPool {
        let pool = create_pool("sqlite::memory:", 5).await.unwrap();
        init_schema(&pool).await.unwrap();
        pool
    }

    async fn conn(pool: &DbPool) -> PoolConnection<Sqlite> {
        pool.acquire().await.unwrap()
    }

    fn input(title: &str, is_important: bool) -> TodoInput {
        TodoInput {
            title: title.to_string(),
            is_important,
        }
    }

    #[test]
    fn detects_in_memory_urls() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://file:todos?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://todos.db"));
    }

    #[test]
    fn row_maps_to_todo() {
        let todo = Todo::from(TodoRow {
            id: 3,
            title: "Read".to_string(),
            is_important: true,
        });
        assert_eq!(todo.id, 3);
        assert_eq!(todo.title, "Read");
        assert!(todo.is_important);
    }

    #[tokio::test]
    async fn init_schema_is_idempotent() {
        let pool = memory_pool().await;
        init_schema(&pool).await.unwrap();
        let mut conn = conn(&pool).await;
        assert!(TodoRepo::list_all(&mut conn).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_assigns_unique_ids() {
        let pool = memory_pool().await;
        let mut conn = conn(&pool).await;

        let first = TodoRepo::create(&mut conn, &input("a", false)).await.unwrap();
        let second = TodoRepo::create(&mut conn, &input("b", true)).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(second.title, "b");
        assert!(second.is_important);
    }

    #[tokio::test]
    async fn find_by_id_returns_created_row() {
        let pool = memory_pool().await;
        let mut conn = conn(&pool).await;

        let created = TodoRepo::create(&mut conn, &input("Buy milk", false))
            .await
            .unwrap();
        let found = TodoRepo::find_by_id(&mut conn, created.id).await.unwrap();

        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn find_by_id_missing_is_none() {
        let pool = memory_pool().await;
        let mut conn = conn(&pool).await;
        assert_eq!(TodoRepo::find_by_id(&mut conn, 99).await.unwrap(), None);
    }

    #[tokio::test]
    async fn list_all_returns_every_row() {
        let pool = memory_pool().await;
        let mut conn = conn(&pool).await;

        TodoRepo::create(&mut conn, &input("a", false)).await.unwrap();
        TodoRepo::create(&mut conn, &input("b", false)).await.unwrap();

        let todos = TodoRepo::list_all(&mut conn).await.unwrap();
        let mut titles: Vec<&str> = todos.iter().map(|t| t.title.as_str()).collect();
        titles.sort_unstable();
        assert_eq!(titles, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn update_overwrites_both_fields() {
        let pool = memory_pool().await;
        let mut conn = conn(&pool).await;

        let created = TodoRepo::create(&mut conn, &input("Buy milk", true))
            .await
            .unwrap();
        let updated = TodoRepo::update(&mut conn, created.id, &input("Buy oat milk", false))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "Buy oat milk");
        assert!(!updated.is_important);
    }

    #[tokio::test]
    async fn update_missing_does_not_create() {
        let pool = memory_pool().await;
        let mut conn = conn(&pool).await;

        let result = TodoRepo::update(&mut conn, 42, &input("ghost", false))
            .await
            .unwrap();

        assert!(result.is_none());
        assert!(TodoRepo::list_all(&mut conn).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let pool = memory_pool().await;
        let mut conn = conn(&pool).await;

        let created = TodoRepo::create(&mut conn, &input("gone", false)).await.unwrap();
        assert!(TodoRepo::delete(&mut conn, created.id).await.unwrap());
        assert_eq!(TodoRepo::find_by_id(&mut conn, created.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_missing_leaves_table_alone() {
        let pool = memory_pool().await;
        let mut conn = conn(&pool).await;

        TodoRepo::create(&mut conn, &input("keep", false)).await.unwrap();
        assert!(!TodoRepo::delete(&mut conn, 99).await.unwrap());
        assert_eq!(TodoRepo::list_all(&mut conn).await.unwrap().len(), 1);
    }
}
