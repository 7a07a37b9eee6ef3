use serde::{Deserialize, Serialize};

/// Who is acting, and on behalf of which business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SecurityContext {
    actor_id: Option<i32>,
    business_id: Option<i32>,
}

impl SecurityContext {
    #[must_use]
    pub fn builder() -> SecurityContextBuilder {
        SecurityContextBuilder::default()
    }

    /// Context for work not initiated by a user (maintenance commands, backfills).
    #[must_use]
    pub fn system() -> Self {
        Self::default()
    }

    /// Context acting as the given user, with no active business.
    #[must_use]
    pub fn for_actor(actor_id: i32) -> Self {
        Self::builder().actor_id(actor_id).build()
    }

    /// User the current action is attributed to; `None` for system work.
    #[must_use]
    pub fn actor_id(&self) -> Option<i32> {
        self.actor_id
    }

    /// Business the actor is currently operating in, if any.
    #[must_use]
    pub fn business_id(&self) -> Option<i32> {
        self.business_id
    }

    #[must_use]
    pub fn is_system(&self) -> bool {
        self.actor_id.is_none()
    }
}

#[derive(Debug, Default)]
pub struct SecurityContextBuilder {
    actor_id: Option<i32>,
    business_id: Option<i32>,
}

impl SecurityContextBuilder {
    #[must_use]
    pub fn actor_id(mut self, actor_id: i32) -> Self {
        self.actor_id = Some(actor_id);
        self
    }

    #[must_use]
    pub fn business_id(mut self, business_id: i32) -> Self {
        self.business_id = Some(business_id);
        self
    }

    #[must_use]
    pub fn build(self) -> SecurityContext {
        SecurityContext {
            actor_id: self.actor_id,
            business_id: self.business_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_context_has_no_actor() {
        let ctx = SecurityContext::system();
        assert!(ctx.is_system());
        assert_eq!(ctx.actor_id(), None);
        assert_eq!(ctx.business_id(), None);
    }

    #[test]
    fn builder_sets_actor_and_business() {
        let ctx = SecurityContext::builder().actor_id(7).business_id(3).build();
        assert_eq!(ctx.actor_id(), Some(7));
        assert_eq!(ctx.business_id(), Some(3));
        assert!(!ctx.is_system());
    }

    #[test]
    fn for_actor_leaves_business_empty() {
        let ctx = SecurityContext::for_actor(12);
        assert_eq!(ctx.actor_id(), Some(12));
        assert_eq!(ctx.business_id(), None);
    }

    #[test]
    fn serde_roundtrip_keeps_fields() {
        let ctx = SecurityContext::builder().actor_id(1).business_id(2).build();
        let json = serde_json::to_string(&ctx).unwrap();
        let back: SecurityContext = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ctx);
    }
}
