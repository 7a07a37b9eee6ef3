//! Audit attribution for persisted records.
//!
//! Every audited row carries four columns: `created_by`, `created_at`,
//! `updated_by` and `updated_at`. The timestamps are stamped by the ORM save
//! hook ([`audit_before_save`]) at flush time. Actor ids are never inferred:
//! services copy them from the request's security context before saving.
//!
//! The stamping rules live in plain functions ([`insertion_timestamp`],
//! [`update_timestamp`]) so they can be exercised without a database.

mod clock;
mod fields;
#[cfg(feature = "sea-orm")]
mod hook;

pub use clock::{Timestamp, insertion_timestamp, update_timestamp, utc_now};
pub use fields::{ActorId, AuditFields};
#[cfg(feature = "sea-orm")]
pub use hook::{AuditedActiveModel, audit_before_save};

#[cfg(feature = "sea-orm")]
#[doc(hidden)]
pub mod __private {
    pub use async_trait;
    pub use sea_orm;
}

/// Attach audit stamping to a sea-orm `ActiveModel`.
///
/// The entity must expose `created_at: DateTimeUtc` and
/// `updated_at: Option<DateTimeUtc>` columns. The macro implements
/// [`AuditedActiveModel`] and an `ActiveModelBehavior` whose `before_save`
/// calls [`audit_before_save`], so the entity must not implement
/// `ActiveModelBehavior` itself.
///
/// ```ignore
/// susu_audit::impl_audited!(ActiveModel);
/// ```
#[cfg(feature = "sea-orm")]
#[macro_export]
macro_rules! impl_audited {
    ($active_model:ty) => {
        impl $crate::AuditedActiveModel for $active_model {
            fn created_at_value(&self) -> &$crate::__private::sea_orm::ActiveValue<$crate::Timestamp> {
                &self.created_at
            }

            fn updated_at_value(
                &self,
            ) -> &$crate::__private::sea_orm::ActiveValue<::core::option::Option<$crate::Timestamp>> {
                &self.updated_at
            }

            fn set_created_at(&mut self, at: $crate::Timestamp) {
                self.created_at = $crate::__private::sea_orm::ActiveValue::Set(at);
            }

            fn set_updated_at(&mut self, at: $crate::Timestamp) {
                self.updated_at = $crate::__private::sea_orm::ActiveValue::Set(::core::option::Option::Some(at));
            }
        }

        #[$crate::__private::async_trait::async_trait]
        impl $crate::__private::sea_orm::ActiveModelBehavior for $active_model {
            async fn before_save<C>(
                self,
                _db: &C,
                insert: bool,
            ) -> ::core::result::Result<Self, $crate::__private::sea_orm::DbErr>
            where
                C: $crate::__private::sea_orm::ConnectionTrait,
            {
                ::core::result::Result::Ok($crate::audit_before_save(self, insert))
            }
        }
    };
}
