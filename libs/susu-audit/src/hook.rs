use sea_orm::ActiveValue;

use crate::clock::{Timestamp, insertion_timestamp, update_timestamp, utc_now};

/// Active model whose timestamps are stamped on save.
///
/// Usually implemented through [`impl_audited!`](crate::impl_audited).
pub trait AuditedActiveModel {
    fn created_at_value(&self) -> &ActiveValue<Timestamp>;
    fn updated_at_value(&self) -> &ActiveValue<Option<Timestamp>>;
    fn set_created_at(&mut self, at: Timestamp);
    fn set_updated_at(&mut self, at: Timestamp);
}

fn current<T>(value: &ActiveValue<T>) -> Option<T>
where
    T: Into<sea_orm::Value> + Clone,
{
    match value {
        ActiveValue::Set(v) | ActiveValue::Unchanged(v) => Some(v.clone()),
        ActiveValue::NotSet => None,
    }
}

/// Stamp audit timestamps on a model right before it is written.
///
/// Insert: `created_at` is filled in unless the caller supplied one.
/// Update: `updated_at` is refreshed unconditionally.
/// Actor columns are left exactly as the caller set them.
pub fn audit_before_save<A: AuditedActiveModel>(mut model: A, insert: bool) -> A {
    let now = utc_now();
    if insert {
        let created_at = insertion_timestamp(current(model.created_at_value()), now);
        model.set_created_at(created_at);
        tracing::trace!(%created_at, "stamped created_at");
    } else {
        let updated_at = update_timestamp(
            current(model.created_at_value()),
            current(model.updated_at_value()).flatten(),
            now,
        );
        model.set_updated_at(updated_at);
        tracing::trace!(%updated_at, "stamped updated_at");
    }
    model
}
