//! Keeps a local snapshot of the todo list consistent with the server.
//!
//! # Design
//! Every mutation is a full server round trip followed by a wholesale reload
//! of the list; nothing is applied locally before the server confirms it.
//! Failures are logged, turned into a single notification and reported back
//! as an [`Outcome`]; they never leave the controller as errors.

use crate::client::TodoClient;
use crate::confirm::Confirm;
use crate::error::ApiError;
use crate::notify::{Notification, NotificationLevel, Notifier};
use crate::transport::Transport;
use crate::types::{CreateTodo, TodoId, TodoItem, UpdateTodo};

pub const MSG_EMPTY_TITLE: &str = "Please enter a title";
pub const MSG_ADDED: &str = "Todo added!";
pub const MSG_ADD_FAILED: &str = "Error adding todo";
pub const MSG_UPDATED: &str = "Todo updated!";
pub const MSG_UPDATE_FAILED: &str = "Update failed";
pub const MSG_DELETED: &str = "Todo deleted";
pub const MSG_DELETE_FAILED: &str = "Failed to delete";
pub const MSG_TOGGLE_FAILED: &str = "Failed to toggle";
pub const MSG_LOAD_FAILED: &str = "Failed to load todos";
pub const MSG_CONFIRM_DELETE: &str = "Are you sure you want to delete this todo?";

/// What a controller operation ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The server accepted the operation.
    Applied,
    /// Local validation refused the input; nothing was sent.
    Rejected,
    /// The request failed; local state is unchanged.
    Failed,
    /// The user declined the confirmation prompt.
    Cancelled,
    /// There was nothing to do.
    Skipped,
}

/// Owns the todo snapshot and the edit slot, and routes every change through
/// the remote API.
pub struct TodoSyncController<T, N, C> {
    client: TodoClient,
    transport: T,
    notifier: N,
    confirm: C,
    items: Vec<TodoItem>,
    is_loading: bool,
    editing: Option<TodoId>,
    draft_title: String,
}

impl<T, N, C> TodoSyncController<T, N, C>
where
    T: Transport,
    N: Notifier,
    C: Confirm,
{
    pub fn new(client: TodoClient, transport: T, notifier: N, confirm: C) -> Self {
        Self {
            client,
            transport,
            notifier,
            confirm,
            items: Vec::new(),
            is_loading: false,
            editing: None,
            draft_title: String::new(),
        }
    }

    /// The snapshot exactly as the server last returned it.
    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    /// Snapshot in display order: pending items first, completed items
    /// after, relative order kept within each group.
    pub fn displayed(&self) -> Vec<&TodoItem> {
        let (pending, done): (Vec<&TodoItem>, Vec<&TodoItem>) =
            self.items.iter().partition(|item| !item.completed);
        pending.into_iter().chain(done).collect()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn editing(&self) -> Option<TodoId> {
        self.editing
    }

    pub fn draft_title(&self) -> &str {
        &self.draft_title
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Initial load when a list view opens.
    pub async fn start(&mut self) -> Outcome {
        self.refresh().await
    }

    /// Reload the snapshot. Only failures are announced.
    pub async fn refresh(&mut self) -> Outcome {
        match self.reload().await {
            Ok(()) => Outcome::Applied,
            Err(_) => {
                self.emit(NotificationLevel::Error, MSG_LOAD_FAILED);
                Outcome::Failed
            }
        }
    }

    pub fn set_draft(&mut self, title: &str) {
        self.draft_title = title.to_string();
    }

    pub async fn create(&mut self, title: &str) -> Outcome {
        if title.trim().is_empty() {
            self.emit(NotificationLevel::Warning, MSG_EMPTY_TITLE);
            return Outcome::Rejected;
        }

        match self.send_create(title).await {
            Ok(created) => {
                tracing::info!(id = created.id, "Created todo");
                self.draft_title.clear();
                self.settle(Some(Notification::new(NotificationLevel::Success, MSG_ADDED)))
                    .await;
                Outcome::Applied
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to create todo");
                self.emit(NotificationLevel::Error, MSG_ADD_FAILED);
                Outcome::Failed
            }
        }
    }

    /// Put `item` in the edit slot, discarding any edit in progress.
    pub fn begin_edit(&mut self, item: &TodoItem) {
        if let Some(previous) = self.editing.filter(|id| *id != item.id) {
            tracing::debug!(previous, next = item.id, "Discarding unfinished edit");
        }
        self.editing = Some(item.id);
        self.draft_title = item.title.clone();
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.draft_title.clear();
    }

    pub async fn commit_edit(&mut self) -> Outcome {
        let Some(id) = self.editing else {
            return Outcome::Skipped;
        };
        if self.draft_title.trim().is_empty() {
            self.emit(NotificationLevel::Warning, MSG_EMPTY_TITLE);
            return Outcome::Rejected;
        }

        let input = UpdateTodo {
            title: Some(self.draft_title.clone()),
            ..UpdateTodo::default()
        };
        match self.send_update(id, &input).await {
            Ok(_) => {
                tracing::info!(id, "Updated todo");
                self.cancel_edit();
                self.settle(Some(Notification::new(NotificationLevel::Success, MSG_UPDATED)))
                    .await;
                Outcome::Applied
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "Failed to update todo");
                self.emit(NotificationLevel::Error, MSG_UPDATE_FAILED);
                Outcome::Failed
            }
        }
    }

    /// The single submit action of the list view: saves the active edit, or
    /// adds the draft as a new todo when nothing is being edited.
    pub async fn submit(&mut self) -> Outcome {
        if self.editing.is_some() {
            return self.commit_edit().await;
        }
        let title = self.draft_title.clone();
        self.create(&title).await
    }

    pub async fn remove(&mut self, id: TodoId) -> Outcome {
        if !self.confirm.confirm(MSG_CONFIRM_DELETE).await {
            tracing::debug!(id, "Delete declined");
            return Outcome::Cancelled;
        }

        match self.send_delete(id).await {
            Ok(()) => {
                tracing::info!(id, "Deleted todo");
                if self.editing == Some(id) {
                    self.cancel_edit();
                }
                self.settle(Some(Notification::new(NotificationLevel::Info, MSG_DELETED)))
                    .await;
                Outcome::Applied
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "Failed to delete todo");
                self.emit(NotificationLevel::Error, MSG_DELETE_FAILED);
                Outcome::Failed
            }
        }
    }

    pub async fn toggle_completed(&mut self, id: TodoId) -> Outcome {
        match self.send_toggle(id).await {
            Ok(()) => {
                tracing::debug!(id, "Toggled todo");
                self.settle(None).await;
                Outcome::Applied
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "Failed to toggle todo");
                self.emit(NotificationLevel::Error, MSG_TOGGLE_FAILED);
                Outcome::Failed
            }
        }
    }

    /// Reload after a successful mutation, emitting at most one notification
    /// for the whole operation.
    async fn settle(&mut self, success: Option<Notification>) {
        match (self.reload().await, success) {
            (Ok(()), Some(notification)) => self.notifier.notify(notification),
            (Ok(()), None) => {}
            (Err(_), Some(notification)) => self.emit(
                NotificationLevel::Warning,
                format!("{} ({})", notification.message, MSG_LOAD_FAILED.to_lowercase()),
            ),
            (Err(_), None) => self.emit(NotificationLevel::Error, MSG_LOAD_FAILED),
        }
    }

    /// Fetch the list and swap it in. A failed fetch leaves the old
    /// snapshot in place. If the future is dropped mid-request the loading
    /// flag stays set.
    async fn reload(&mut self) -> Result<(), ApiError> {
        self.is_loading = true;
        let result = self.fetch_list().await;
        self.is_loading = false;
        match result {
            Ok(items) => {
                tracing::debug!(count = items.len(), "Snapshot replaced");
                self.items = items;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load todos, keeping previous snapshot");
                Err(e)
            }
        }
    }

    async fn fetch_list(&self) -> Result<Vec<TodoItem>, ApiError> {
        let response = self.transport.execute(self.client.build_list_todos()).await?;
        self.client.parse_list_todos(response)
    }

    async fn send_create(&self, title: &str) -> Result<TodoItem, ApiError> {
        let request = self.client.build_create_todo(&CreateTodo::titled(title))?;
        let response = self.transport.execute(request).await?;
        self.client.parse_create_todo(response)
    }

    async fn send_update(&self, id: TodoId, input: &UpdateTodo) -> Result<TodoItem, ApiError> {
        let request = self.client.build_update_todo(id, input)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_update_todo(response)
    }

    async fn send_delete(&self, id: TodoId) -> Result<(), ApiError> {
        let response = self.transport.execute(self.client.build_delete_todo(id)).await?;
        self.client.parse_delete_todo(response)
    }

    async fn send_toggle(&self, id: TodoId) -> Result<(), ApiError> {
        let response = self.transport.execute(self.client.build_toggle_todo(id)).await?;
        self.client.parse_toggle_todo(response)
    }

    fn emit(&self, level: NotificationLevel, message: impl Into<String>) {
        self.notifier.notify(Notification::new(level, message));
    }
}
