use axum::Json;

pub async fn get_root() -> Json<Vec<String>> {
    Json(vec!["/1.0".to_string()])
}
