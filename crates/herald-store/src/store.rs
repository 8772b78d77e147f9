//! High-level transactional `NotificationStore` API.
//!
//! Composes the repositories into atomic operations over a connection
//! pool. Creation inserts the record and its recipient link in a single
//! transaction, so callers never observe a notification without its
//! link. The store is the shipped [`CreationSink`] implementation.

use chrono::Utc;
use herald_core::entity::EntityRef;
use herald_core::record::{Notification, Notifying, ResolvedNotification};
use herald_core::sink::{CreationSink, SinkError};
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::connection::{ConnectionConfig, ConnectionPool, PooledConnection, new_file, new_in_memory};
use crate::errors::{Result, StoreError};
use crate::migrations::run_migrations;
use crate::repositories::notification::NotificationRepo;
use crate::repositories::notifying::NotifyingRepo;
use crate::row_types::{NotificationRow, NotifyingRow};

/// `SQLite`-backed notification store.
pub struct NotificationStore {
    pool: ConnectionPool,
}

impl NotificationStore {
    /// Wrap an existing pool. Assumes migrations have been run.
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }

    /// Open an in-memory store with migrations applied (for testing).
    pub fn in_memory() -> Result<Self> {
        let pool = new_in_memory(&ConnectionConfig::default())?;
        {
            let conn = pool.get()?;
            let _ = run_migrations(&conn)?;
        }
        Ok(Self { pool })
    }

    /// Open a file-backed store, creating the schema if needed.
    pub fn open(path: &str, config: &ConnectionConfig) -> Result<Self> {
        let pool = new_file(path, config)?;
        {
            let conn = pool.get()?;
            let _ = run_migrations(&conn)?;
        }
        Ok(Self { pool })
    }

    fn conn(&self) -> Result<PooledConnection> {
        Ok(self.pool.get()?)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Creation
    // ─────────────────────────────────────────────────────────────────────

    /// Persist one notification and, when a recipient was resolved, its
    /// delivery link — atomically.
    pub fn create_notification(
        &self,
        notifiable: &EntityRef,
        resolved: &ResolvedNotification,
    ) -> Result<Notification> {
        let conn = self.conn()?;
        let tx = conn.unchecked_transaction()?;

        let row = NotificationRow {
            id: format!("ntf_{}", Uuid::now_v7()),
            notifiable_kind: notifiable.kind.clone(),
            notifiable_id: notifiable.id,
            owner_kind: resolved.owner.as_ref().map(|o| o.kind.clone()),
            owner_id: resolved.owner.as_ref().map(|o| o.id),
            key: resolved.key.clone(),
            parameters: serde_json::to_string(&resolved.parameters)?,
            custom_fields: serde_json::to_string(&resolved.custom_fields)?,
            created_at: Utc::now().to_rfc3339(),
        };
        NotificationRepo::insert(&tx, &row)?;

        if let Some(recipient) = &resolved.recipient {
            NotifyingRepo::insert(&tx, &link_row(&row.id, recipient))?;
        }

        tx.commit()?;
        debug!(id = %row.id, key = %row.key, "notification persisted");
        row_to_notification(row)
    }

    /// Link an additional recipient to an existing notification.
    pub fn add_recipient(&self, notification_id: &str, recipient: &EntityRef) -> Result<Notifying> {
        let conn = self.conn()?;
        if NotificationRepo::get_by_id(&conn, notification_id)?.is_none() {
            return Err(StoreError::NotificationNotFound(notification_id.to_string()));
        }

        let row = link_row(notification_id, recipient);
        NotifyingRepo::insert(&conn, &row)?;
        Ok(row_to_notifying(row))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Read/unread tracking
    // ─────────────────────────────────────────────────────────────────────

    /// Mark the notification read for a recipient.
    ///
    /// Errors with [`StoreError::LinkNotFound`] when no link joins the
    /// pair.
    pub fn mark_read_for(&self, notification_id: &str, recipient: &EntityRef) -> Result<()> {
        let conn = self.conn()?;
        let affected = NotifyingRepo::mark_read(&conn, notification_id, recipient)?;
        if affected == 0 {
            return Err(link_not_found(notification_id, recipient));
        }
        Ok(())
    }

    /// Whether the recipient has read the notification.
    pub fn read_by(&self, notification_id: &str, recipient: &EntityRef) -> Result<bool> {
        let conn = self.conn()?;
        NotifyingRepo::read_state(&conn, notification_id, recipient)?
            .ok_or_else(|| link_not_found(notification_id, recipient))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────

    /// Get a notification by id.
    pub fn get(&self, id: &str) -> Result<Notification> {
        let conn = self.conn()?;
        let row = NotificationRepo::get_by_id(&conn, id)?
            .ok_or_else(|| StoreError::NotificationNotFound(id.to_string()))?;
        row_to_notification(row)
    }

    /// Total number of stored notifications.
    pub fn count(&self) -> Result<i64> {
        let conn = self.conn()?;
        NotificationRepo::count(&conn)
    }

    /// Notifications whose source is the given entity.
    pub fn for_notifiable(&self, entity: &EntityRef) -> Result<Vec<Notification>> {
        let conn = self.conn()?;
        rows_to_notifications(NotificationRepo::for_notifiable(&conn, entity)?)
    }

    /// Notifications attributed to the given owner.
    pub fn for_owner(&self, entity: &EntityRef) -> Result<Vec<Notification>> {
        let conn = self.conn()?;
        rows_to_notifications(NotificationRepo::for_owner(&conn, entity)?)
    }

    /// Notifications directed at the given recipient.
    pub fn for_recipient(&self, entity: &EntityRef) -> Result<Vec<Notification>> {
        let conn = self.conn()?;
        rows_to_notifications(NotificationRepo::for_recipient(&conn, entity, false)?)
    }

    /// Unread notifications directed at the given recipient.
    pub fn unread_for_recipient(&self, entity: &EntityRef) -> Result<Vec<Notification>> {
        let conn = self.conn()?;
        rows_to_notifications(NotificationRepo::for_recipient(&conn, entity, true)?)
    }

    /// Recipient links of a notification.
    pub fn recipients_of(&self, notification_id: &str) -> Result<Vec<Notifying>> {
        let conn = self.conn()?;
        Ok(NotifyingRepo::for_notification(&conn, notification_id)?
            .into_iter()
            .map(row_to_notifying)
            .collect())
    }

    /// Delete a notification; its links cascade.
    pub fn delete(&self, id: &str) -> Result<()> {
        let conn = self.conn()?;
        if !NotificationRepo::delete(&conn, id)? {
            return Err(StoreError::NotificationNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Run any pending schema migrations on the pool.
    pub fn migrate(&self) -> Result<u32> {
        let conn = self.conn()?;
        run_migrations(&conn)
    }
}

impl CreationSink for NotificationStore {
    fn create(
        &self,
        notifiable: &EntityRef,
        resolved: &ResolvedNotification,
    ) -> std::result::Result<Notification, SinkError> {
        self.create_notification(notifiable, resolved)
            .map_err(SinkError::new)
    }
}

impl std::fmt::Debug for NotificationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationStore")
            .field("pool_size", &self.pool.max_size())
            .finish()
    }
}

fn link_row(notification_id: &str, recipient: &EntityRef) -> NotifyingRow {
    NotifyingRow {
        id: format!("nfy_{}", Uuid::now_v7()),
        notification_id: notification_id.to_string(),
        recipient_kind: recipient.kind.clone(),
        recipient_id: recipient.id,
        read: false,
    }
}

fn link_not_found(notification_id: &str, recipient: &EntityRef) -> StoreError {
    StoreError::LinkNotFound {
        notification_id: notification_id.to_string(),
        recipient: recipient.to_string(),
    }
}

fn row_to_notification(row: NotificationRow) -> Result<Notification> {
    let owner = match (row.owner_kind, row.owner_id) {
        (Some(kind), Some(id)) => Some(EntityRef::new(kind, id)),
        _ => None,
    };
    let parameters: Map<String, Value> = serde_json::from_str(&row.parameters)?;
    let custom_fields: Map<String, Value> = serde_json::from_str(&row.custom_fields)?;
    let created_at = chrono::DateTime::parse_from_rfc3339(&row.created_at)?.with_timezone(&Utc);

    Ok(Notification {
        id: row.id,
        notifiable: EntityRef::new(row.notifiable_kind, row.notifiable_id),
        owner,
        key: row.key,
        parameters,
        custom_fields,
        created_at,
    })
}

fn rows_to_notifications(rows: Vec<NotificationRow>) -> Result<Vec<Notification>> {
    rows.into_iter().map(row_to_notification).collect()
}

fn row_to_notifying(row: NotifyingRow) -> Notifying {
    Notifying {
        id: row.id,
        notification_id: row.notification_id,
        recipient: EntityRef::new(row.recipient_kind, row.recipient_id),
        read: row.read,
    }
}
