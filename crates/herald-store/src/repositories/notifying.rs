//! Notifying repository — recipient links and read/unread state.

use herald_core::entity::EntityRef;
use rusqlite::{Connection, OptionalExtension, params};

use crate::errors::{Result, StoreError};
use crate::row_types::NotifyingRow;

/// Notifying repository — stateless, every method takes `&Connection`.
pub struct NotifyingRepo;

impl NotifyingRepo {
    /// Insert a recipient link.
    ///
    /// The schema enforces at most one link per (notification, recipient)
    /// pair; a second insert is [`StoreError::DuplicateRecipient`].
    pub fn insert(conn: &Connection, row: &NotifyingRow) -> Result<()> {
        let outcome = conn.execute(
            "INSERT INTO notifyings (id, notification_id, recipient_kind, recipient_id, read)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                row.id,
                row.notification_id,
                row.recipient_kind,
                row.recipient_id,
                row.read,
            ],
        );

        match outcome {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(StoreError::DuplicateRecipient {
                    notification_id: row.notification_id.clone(),
                    recipient: format!("{}#{}", row.recipient_kind, row.recipient_id),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// All links for a notification.
    pub fn for_notification(conn: &Connection, notification_id: &str) -> Result<Vec<NotifyingRow>> {
        let mut stmt = conn.prepare(
            "SELECT id, notification_id, recipient_kind, recipient_id, read
             FROM notifyings WHERE notification_id = ?1 ORDER BY rowid ASC",
        )?;
        let rows = stmt
            .query_map(params![notification_id], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Read flag for the link joining a notification and a recipient.
    pub fn read_state(
        conn: &Connection,
        notification_id: &str,
        recipient: &EntityRef,
    ) -> Result<Option<bool>> {
        let read = conn
            .query_row(
                "SELECT read FROM notifyings
                 WHERE notification_id = ?1 AND recipient_kind = ?2 AND recipient_id = ?3",
                params![notification_id, recipient.kind, recipient.id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(read)
    }

    /// Set read = true on every link matching the pair. Returns the number
    /// of links updated.
    pub fn mark_read(
        conn: &Connection,
        notification_id: &str,
        recipient: &EntityRef,
    ) -> Result<usize> {
        let affected = conn.execute(
            "UPDATE notifyings SET read = 1
             WHERE notification_id = ?1 AND recipient_kind = ?2 AND recipient_id = ?3",
            params![notification_id, recipient.kind, recipient.id],
        )?;
        Ok(affected)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<NotifyingRow> {
        Ok(NotifyingRow {
            id: row.get(0)?,
            notification_id: row.get(1)?,
            recipient_kind: row.get(2)?,
            recipient_id: row.get(3)?,
            read: row.get(4)?,
        })
    }
}
