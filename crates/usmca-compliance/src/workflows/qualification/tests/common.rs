use axum::response::Response;
use serde_json::Value;

use crate::workflows::numeric::DeclaredNumber;
use crate::workflows::qualification::domain::{Component, ComponentSubmission};
use crate::workflows::qualification::QualificationEvaluator;

pub(super) fn evaluator() -> QualificationEvaluator {
    QualificationEvaluator::default()
}

pub(super) fn component(origin: &str, percent: f64) -> Component {
    Component::new(format!("{origin} part"), origin, percent)
}

pub(super) fn textile_components() -> Vec<Component> {
    vec![
        Component::new("Cotton fabric", "US", 60.0).with_hs_code("520811"),
        Component::new("Thread and trims", "MX", 15.0),
        Component::new("Cut and sew labor", "CA", 25.0),
    ]
}

pub(super) fn electronics_components() -> Vec<Component> {
    vec![
        Component::new("Microcontroller", "TW", 45.0).with_hs_code("854231"),
        Component::new("Housing", "MX", 30.0),
        Component::new("Power supply", "CA", 25.0),
    ]
}

pub(super) fn submission(origin: &str, value: DeclaredNumber) -> ComponentSubmission {
    ComponentSubmission {
        description: format!("{origin} part"),
        origin_country: origin.to_string(),
        value_percentage: value,
        hs_code: None,
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
