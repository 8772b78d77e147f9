//! Notification repository — record CRUD and the association queries.

use herald_core::entity::EntityRef;
use rusqlite::{Connection, OptionalExtension, params};

use crate::errors::Result;
use crate::row_types::NotificationRow;

const COLUMNS: &str = "id, notifiable_kind, notifiable_id, owner_kind, owner_id, \
                       key, parameters, custom_fields, created_at";

/// Notification repository — stateless, every method takes `&Connection`.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Insert a single notification row.
    pub fn insert(conn: &Connection, row: &NotificationRow) -> Result<()> {
        let _ = conn.execute(
            "INSERT INTO notifications (id, notifiable_kind, notifiable_id, owner_kind, owner_id,
             key, parameters, custom_fields, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                row.id,
                row.notifiable_kind,
                row.notifiable_id,
                row.owner_kind,
                row.owner_id,
                row.key,
                row.parameters,
                row.custom_fields,
                row.created_at,
            ],
        )?;
        Ok(())
    }

    /// Get a single notification by id.
    pub fn get_by_id(conn: &Connection, id: &str) -> Result<Option<NotificationRow>> {
        let row = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM notifications WHERE id = ?1"),
                params![id],
                Self::map_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Notifications whose source is the given entity, in insertion order.
    pub fn for_notifiable(conn: &Connection, entity: &EntityRef) -> Result<Vec<NotificationRow>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM notifications
             WHERE notifiable_kind = ?1 AND notifiable_id = ?2
             ORDER BY rowid ASC"
        ))?;
        let rows = stmt
            .query_map(params![entity.kind, entity.id], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Notifications attributed to the given owner, in insertion order.
    pub fn for_owner(conn: &Connection, entity: &EntityRef) -> Result<Vec<NotificationRow>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM notifications
             WHERE owner_kind = ?1 AND owner_id = ?2
             ORDER BY rowid ASC"
        ))?;
        let rows = stmt
            .query_map(params![entity.kind, entity.id], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Notifications linked to the given recipient, optionally unread only.
    pub fn for_recipient(
        conn: &Connection,
        entity: &EntityRef,
        unread_only: bool,
    ) -> Result<Vec<NotificationRow>> {
        let mut sql = format!(
            "SELECT n.id, n.notifiable_kind, n.notifiable_id, n.owner_kind, n.owner_id,
                    n.key, n.parameters, n.custom_fields, n.created_at
             FROM notifications n
             JOIN notifyings ny ON ny.notification_id = n.id
             WHERE ny.recipient_kind = ?1 AND ny.recipient_id = ?2"
        );
        if unread_only {
            sql.push_str(" AND ny.read = 0");
        }
        sql.push_str(" ORDER BY n.rowid ASC");

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![entity.kind, entity.id], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Total number of notifications.
    pub fn count(conn: &Connection) -> Result<i64> {
        let count = conn.query_row("SELECT COUNT(*) FROM notifications", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Delete a notification by id. Returns whether a row was removed.
    pub fn delete(conn: &Connection, id: &str) -> Result<bool> {
        let affected = conn.execute("DELETE FROM notifications WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<NotificationRow> {
        Ok(NotificationRow {
            id: row.get(0)?,
            notifiable_kind: row.get(1)?,
            notifiable_id: row.get(2)?,
            owner_kind: row.get(3)?,
            owner_id: row.get(4)?,
            key: row.get(5)?,
            parameters: row.get(6)?,
            custom_fields: row.get(7)?,
            created_at: row.get(8)?,
        })
    }
}
