//! Cached to-do repository decorator.

use std::sync::Arc;

use async_trait::async_trait;

use campus_core::cache::{todo_board_key, KeyValueStore};
use campus_core::school::{NewTodo, TodoBoard, TodoTask};
use campus_core::storage::{Result, TodoRepository};

use super::{CacheAside, CachePolicy};

/// Cached to-do repository decorator.
///
/// Each user's board is one cached document; every write to a task
/// invalidates its owner's board.
pub struct CachedTodoRepository<R, C>
where
    R: TodoRepository,
    C: KeyValueStore,
{
    repository: Arc<R>,
    aside: CacheAside<C>,
    policy: CachePolicy,
}

impl<R, C> CachedTodoRepository<R, C>
where
    R: TodoRepository,
    C: KeyValueStore,
{
    pub fn new(repository: Arc<R>, cache: Arc<C>, policy: CachePolicy) -> Self {
        Self {
            repository,
            aside: CacheAside::new(cache, &policy),
            policy,
        }
    }
}

#[async_trait]
impl<R, C> TodoRepository for CachedTodoRepository<R, C>
where
    R: TodoRepository + 'static,
    C: KeyValueStore + 'static,
{
    async fn get_board(&self, user_id: i64) -> Result<TodoBoard> {
        let load = async { self.repository.get_board(user_id).await.map(Some) };
        let board = self
            .aside
            .read(&todo_board_key(user_id), self.policy.list(), load)
            .await?;
        Ok(board.unwrap_or_default())
    }

    async fn create_todo(&self, todo: &NewTodo) -> Result<TodoTask> {
        let task = self
            .aside
            .write(None, self.repository.create_todo(todo), |t: &TodoTask| {
                vec![todo_board_key(t.user_id)]
            })
            .await?;

        tracing::debug!(user_id = task.user_id, task_id = task.id, "Created to-do");
        Ok(task)
    }

    async fn finish_todo(&self, user_id: i64, task_id: i64) -> Result<()> {
        self.aside
            .write(None, self.repository.finish_todo(user_id, task_id), |_| {
                vec![todo_board_key(user_id)]
            })
            .await
    }

    async fn delete_todo(&self, user_id: i64, task_id: i64) -> Result<()> {
        self.aside
            .write(None, self.repository.delete_todo(user_id, task_id), |_| {
                vec![todo_board_key(user_id)]
            })
            .await
    }
}
