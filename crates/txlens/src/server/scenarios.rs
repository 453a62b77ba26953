use axum::Json;

use txlens_core::scenarios::{demo_scenarios, DemoScenario};

pub(super) async fn list_scenarios() -> Json<Vec<DemoScenario>> {
    Json(demo_scenarios())
}
