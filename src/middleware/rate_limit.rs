use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

#[derive(Debug)]
struct Window {
    opened_at: Instant,
    served: u32,
}

/// Fixed one-second window limiter shared by every route.
#[derive(Clone, Debug)]
pub struct RequestBudget {
    per_second: u32,
    window: Arc<Mutex<Window>>,
}

impl RequestBudget {
    pub fn new(per_second: u32) -> Self {
        Self {
            per_second: per_second.max(1),
            window: Arc::new(Mutex::new(Window {
                opened_at: Instant::now(),
                served: 0,
            })),
        }
    }

    fn try_acquire(&self) -> bool {
        let mut guard = self.window.lock().expect("request budget mutex poisoned");
        let now = Instant::now();
        if now.duration_since(guard.opened_at) >= Duration::from_secs(1) {
            guard.opened_at = now;
            guard.served = 0;
        }
        if guard.served < self.per_second {
            guard.served += 1;
            true
        } else {
            false
        }
    }
}

pub async fn throttle_middleware(
    State(budget): State<RequestBudget>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if !budget.try_acquire() {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({"error":"rate_limit_exceeded"})),
        )
            .into_response();
    }
    next.run(req).await
}
