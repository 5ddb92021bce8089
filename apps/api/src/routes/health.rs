use axum::Json;
use serde_json::{json, Value};

/// Public route map, shown by `GET /` and by the 404 fallback.
pub fn endpoint_index() -> Value {
    json!({
        "health": "GET /",
        "mcq": "POST /api/generate-mcqs",
        "study": "POST /api/generate-study-material",
        "resume": "POST /api/analyze",
        "chat": "POST /api/chat"
    })
}

/// GET /
/// Returns a simple status object with service version and the route map.
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "status": "running",
        "message": "Career guidance API is running!",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": endpoint_index()
    }))
}
