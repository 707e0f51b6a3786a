use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use lead_router_api::{create_router, AppState};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt; // for oneshot

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn create_rule(app: &axum::Router, body: serde_json::Value) -> serde_json::Value {
    let response = app.clone().oneshot(post("/api/rules", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[tokio::test]
async fn test_full_rule_lifecycle() {
    // 1. Setup shared state and router
    let app_state = Arc::new(AppState::new());
    let app = create_router(app_state);

    // 2. Create a premium rule and a catch-all behind it
    let premium = create_rule(
        &app,
        json!({
            "name": "maharashtra-premium",
            "rule_type": "combined",
            "priority": 1,
            "conditions": {
                "states": ["Maharashtra"],
                "lead_type": "premium",
                "min_lead_score": 80
            },
            "distribution": {
                "strategy": "weighted",
                "agents": [
                    { "id": "closer-1", "weight": 40 },
                    { "id": "closer-2", "weight": 35 },
                    { "id": "closer-3", "weight": 25 }
                ]
            }
        }),
    )
    .await;
    let premium_id = premium["id"].as_str().unwrap().to_string();

    create_rule(
        &app,
        json!({
            "name": "catch-all",
            "rule_type": "combined",
            "priority": 2,
            "distribution": {
                "strategy": "round-robin",
                "agents": [{ "id": "fallback-agent" }]
            }
        }),
    )
    .await;

    // 3. List is priority-sorted
    let response = app
        .clone()
        .oneshot(Request::get("/api/rules").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let rules = body_json(response).await;
    assert_eq!(rules.as_array().unwrap().len(), 2);
    assert_eq!(rules[0]["name"], "maharashtra-premium");
    assert_eq!(rules[1]["name"], "catch-all");

    // 4. A qualifying lead goes to the premium pool
    let response = app
        .clone()
        .oneshot(post(
            "/api/route",
            json!({ "state": "Maharashtra", "lead_type": "premium", "lead_score": 85 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let outcome = body_json(response).await;
    assert_eq!(outcome["outcome"], "assigned");
    assert_eq!(outcome["rule_name"], "maharashtra-premium");
    let agent = outcome["agent_id"].as_str().unwrap();
    assert!(["closer-1", "closer-2", "closer-3"].contains(&agent));

    // 5. A low score falls through to the catch-all
    let response = app
        .clone()
        .oneshot(post(
            "/api/route",
            json!({ "state": "Maharashtra", "lead_type": "premium", "lead_score": 70 }),
        ))
        .await
        .unwrap();
    let outcome = body_json(response).await;
    assert_eq!(outcome["outcome"], "assigned");
    assert_eq!(outcome["rule_name"], "catch-all");
    assert_eq!(outcome["agent_id"], "fallback-agent");

    // 6. Delete without confirmation is refused and changes nothing
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/rules/{}", premium_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let error = body_json(response).await;
    assert_eq!(error["error"], "confirmation_required");

    let response = app
        .clone()
        .oneshot(Request::get("/api/rules").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);

    // 7. Confirmed delete removes the rule
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/rules/{}?confirm=true", premium_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // 8. The premium lead now lands on the catch-all
    let response = app
        .clone()
        .oneshot(post(
            "/api/route",
            json!({ "state": "Maharashtra", "lead_type": "premium", "lead_score": 85 }),
        ))
        .await
        .unwrap();
    let outcome = body_json(response).await;
    assert_eq!(outcome["rule_name"], "catch-all");
}

#[tokio::test]
async fn test_toggle_hides_a_rule_from_routing() {
    let app_state = Arc::new(AppState::new());
    let app = create_router(app_state);

    let rule = create_rule(
        &app,
        json!({
            "name": "kerala-desk",
            "rule_type": "state-based",
            "priority": 1,
            "conditions": { "states": ["Kerala"] },
            "distribution": {
                "strategy": "round-robin",
                "agents": [{ "id": "agent-1" }]
            }
        }),
    )
    .await;
    let id = rule["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(post(format!("/api/rules/{}/toggle", id).as_str(), json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let toggled = body_json(response).await;
    assert_eq!(toggled["active"], false);

    // invisible to the matcher...
    let response = app
        .clone()
        .oneshot(post("/api/route", json!({ "state": "Kerala" })))
        .await
        .unwrap();
    let outcome = body_json(response).await;
    assert_eq!(outcome["outcome"], "no-match");

    // ...but still retrievable by id
    let response = app
        .clone()
        .oneshot(
            Request::get(format!("/api/rules/{}", id).as_str())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched["active"], false);
}

#[tokio::test]
async fn test_duplicate_and_reorder() {
    let app_state = Arc::new(AppState::new());
    let app = create_router(app_state);

    let first = create_rule(
        &app,
        json!({
            "name": "first",
            "rule_type": "state-based",
            "priority": 1,
            "conditions": { "states": ["Goa"] },
            "distribution": { "strategy": "round-robin", "agents": [{ "id": "a" }] }
        }),
    )
    .await;
    let second = create_rule(
        &app,
        json!({
            "name": "second",
            "rule_type": "state-based",
            "priority": 2,
            "conditions": { "states": ["Goa"] },
            "distribution": { "strategy": "round-robin", "agents": [{ "id": "b" }] }
        }),
    )
    .await;
    let first_id = first["id"].as_str().unwrap().to_string();
    let second_id = second["id"].as_str().unwrap().to_string();

    // Duplicate lands at the end, deactivated, suffixed
    let response = app
        .clone()
        .oneshot(post(
            format!("/api/rules/{}/duplicate", first_id).as_str(),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let copy = body_json(response).await;
    assert_eq!(copy["name"], "first (Copy)");
    assert_eq!(copy["active"], false);
    assert_eq!(copy["priority"], 3);
    assert_ne!(copy["id"], first["id"]);

    // Reorder: second before first; priorities reassigned 1-indexed
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/rules/reorder")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({ "order": [second_id, first_id] }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let rules = body_json(response).await;
    assert_eq!(rules[0]["name"], "second");
    assert_eq!(rules[0]["priority"], 1);
    assert_eq!(rules[1]["name"], "first");
    assert_eq!(rules[1]["priority"], 2);

    // Routing follows the new order
    let response = app
        .clone()
        .oneshot(post("/api/route", json!({ "state": "Goa" })))
        .await
        .unwrap();
    let outcome = body_json(response).await;
    assert_eq!(outcome["rule_name"], "second");
}

#[tokio::test]
async fn test_rule_type_filter_and_bad_filter() {
    let app_state = Arc::new(AppState::new());
    let app = create_router(app_state);

    create_rule(
        &app,
        json!({
            "name": "states",
            "rule_type": "state-based",
            "distribution": { "strategy": "round-robin", "agents": [{ "id": "a" }] }
        }),
    )
    .await;
    create_rule(
        &app,
        json!({
            "name": "languages",
            "rule_type": "language-based",
            "distribution": { "strategy": "round-robin", "agents": [{ "id": "b" }] }
        }),
    )
    .await;

    let response = app
        .clone()
        .oneshot(
            Request::get("/api/rules?rule_type=language-based")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let rules = body_json(response).await;
    assert_eq!(rules.as_array().unwrap().len(), 1);
    assert_eq!(rules[0]["name"], "languages");

    let response = app
        .clone()
        .oneshot(
            Request::get("/api/rules?rule_type=bogus")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_routing_with_no_rules_reports_no_match() {
    let app_state = Arc::new(AppState::new());
    let app = create_router(app_state);

    let response = app
        .clone()
        .oneshot(post("/api/route", json!({ "state": "Punjab", "lead_score": 50 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let outcome = body_json(response).await;
    assert_eq!(outcome["outcome"], "no-match");
}
