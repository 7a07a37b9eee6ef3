use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;
use susu_errors::Problem;
use susu_security::SecurityContext;

pub const ACTOR_HEADER: &str = "x-actor-id";
pub const BUSINESS_HEADER: &str = "x-business-id";

/// Security context resolved by the upstream gateway.
///
/// A request without `x-actor-id` runs as the system context.
#[derive(Debug, Clone, Copy)]
pub struct Actor(pub SecurityContext);

fn header_id(parts: &Parts, name: &str) -> Result<Option<i32>, Problem> {
    let Some(value) = parts.headers.get(name) else {
        return Ok(None);
    };
    value
        .to_str()
        .ok()
        .and_then(|v| v.trim().parse::<i32>().ok())
        .map(Some)
        .ok_or_else(|| {
            Problem::new(
                StatusCode::BAD_REQUEST,
                "invalid_header",
                format!("header {name} must be an integer id"),
            )
        })
}

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let mut builder = SecurityContext::builder();
        if let Some(actor_id) = header_id(parts, ACTOR_HEADER)? {
            builder = builder.actor_id(actor_id);
        }
        if let Some(business_id) = header_id(parts, BUSINESS_HEADER)? {
            builder = builder.business_id(business_id);
        }
        Ok(Actor(builder.build()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(req: Request<()>) -> Result<Actor, Problem> {
        let (mut parts, ()) = req.into_parts();
        Actor::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn missing_headers_give_system_context() {
        let Actor(ctx) = extract(Request::new(())).await.unwrap();
        assert!(ctx.is_system());
    }

    #[tokio::test]
    async fn headers_fill_actor_and_business() {
        let req = Request::builder()
            .header(ACTOR_HEADER, "7")
            .header(BUSINESS_HEADER, "3")
            .body(())
            .unwrap();
        let Actor(ctx) = extract(req).await.unwrap();
        assert_eq!(ctx.actor_id(), Some(7));
        assert_eq!(ctx.business_id(), Some(3));
    }

    #[tokio::test]
    async fn non_numeric_actor_is_rejected() {
        let req = Request::builder()
            .header(ACTOR_HEADER, "alice")
            .body(())
            .unwrap();
        let err = extract(req).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "invalid_header");
    }
}
