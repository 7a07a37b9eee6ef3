use serde::{Deserialize, Serialize};

use crate::clock::{Timestamp, update_timestamp};

/// Id of the user an action is attributed to.
pub type ActorId = i32;

/// Provenance of a persisted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditFields {
    /// Actor that created the record; `None` for system-initiated writes.
    pub created_by: Option<ActorId>,
    pub created_at: Timestamp,
    /// Actor of the last explicitly attributed mutation.
    pub updated_by: Option<ActorId>,
    /// Absent until the first update.
    pub updated_at: Option<Timestamp>,
}

impl AuditFields {
    /// Fields of a freshly created record.
    #[must_use]
    pub fn created(by: Option<ActorId>, at: Timestamp) -> Self {
        Self {
            created_by: by,
            created_at: at,
            updated_by: None,
            updated_at: None,
        }
    }

    /// Apply an update: refresh `updated_at`, and record the actor when one is given.
    ///
    /// Creation fields are never touched, and an absent actor keeps the last
    /// recorded `updated_by`.
    pub fn stamp_update(&mut self, by: Option<ActorId>, now: Timestamp) {
        self.updated_at = Some(update_timestamp(
            Some(self.created_at),
            self.updated_at,
            now,
        ));
        if by.is_some() {
            self.updated_by = by;
        }
    }

    /// Last time the record changed, creation included.
    #[must_use]
    pub fn last_modified(&self) -> Timestamp {
        self.updated_at.unwrap_or(self.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn at(secs: i64) -> Timestamp {
        Utc.timestamp_opt(secs, 0).single().unwrap()
    }

    #[test]
    fn created_has_no_update_data() {
        let fields = AuditFields::created(Some(7), at(100));
        assert_eq!(fields.created_by, Some(7));
        assert_eq!(fields.updated_by, None);
        assert_eq!(fields.updated_at, None);
        assert_eq!(fields.last_modified(), at(100));
    }

    #[test]
    fn stamp_update_keeps_creation_and_previous_actor() {
        let mut fields = AuditFields::created(Some(7), at(100));

        fields.stamp_update(Some(9), at(200));
        assert_eq!(fields.updated_by, Some(9));
        assert_eq!(fields.updated_at, Some(at(200)));

        fields.stamp_update(None, at(300));
        assert_eq!(fields.updated_by, Some(9));
        assert_eq!(fields.updated_at, Some(at(300)));
        assert_eq!(fields.created_by, Some(7));
        assert_eq!(fields.created_at, at(100));
    }

    #[test]
    fn serializes_with_field_names() {
        let fields = AuditFields::created(None, at(0));
        let json = serde_json::to_value(fields).unwrap();
        assert!(json["created_by"].is_null());
        assert!(json["updated_at"].is_null());
        assert!(json["created_at"].is_string());
    }
}
