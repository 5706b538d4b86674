pub mod products;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::root::{health_check, index};
use crate::state::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .merge(products::routes())
}

/// Full application with middleware, shared by the server and the tests.
pub fn build_app(state: AppState) -> Router {
    create_router()
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::build_app;
    use crate::repositories::{InMemoryProductRepository, NameMatch};
    use crate::services::CatalogService;
    use crate::state::AppState;

    const SEED: [(&str, &str, &str, bool, &str); 9] = [
        ("Hat", "A red fedora", "59.95", true, "CLOTHS"),
        ("Shoes", "Blue shoes", "120.50", false, "CLOTHS"),
        ("Big Mac", "1/4 lb burger", "5.99", true, "FOOD"),
        ("Sheets", "Full bed sheets", "87.00", true, "HOUSEWARES"),
        ("Apple", "Red delicious", "0.99", true, "FOOD"),
        ("Banana", "Yellow banana", "0.49", true, "FOOD"),
        ("Hammer", "Claw hammer", "14.99", true, "TOOLS"),
        ("Wrench", "Adjustable wrench", "12.50", true, "TOOLS"),
        ("Tire", "All season tire", "99.00", true, "AUTOMOTIVE"),
    ];

    fn app(name_match: NameMatch) -> axum::Router {
        let repo = Arc::new(InMemoryProductRepository::new());
        build_app(AppState::new(CatalogService::new(repo, name_match)))
    }

    async fn send(app: &axum::Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn product_json(name: &str, description: &str, price: &str, available: bool, category: &str) -> Value {
        json!({
            "name": name,
            "description": description,
            "price": price,
            "available": available,
            "category": category,
        })
    }

    async fn seeded(name_match: NameMatch) -> axum::Router {
        let app = app(name_match);
        for (name, description, price, available, category) in SEED {
            let body = product_json(name, description, price, available, category);
            let (status, _) = send(&app, json_request(Method::POST, "/products", &body)).await;
            assert_eq!(status, StatusCode::CREATED, "could not seed {name}");
        }
        app
    }

    fn names(body: &Value) -> Vec<String> {
        body.as_array()
            .expect("a JSON array")
            .iter()
            .map(|p| p["name"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn home_page_and_health() {
        let app = app(NameMatch::Exact);
        let resp = app.clone().oneshot(get("/")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let html = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(String::from_utf8_lossy(&html).contains("Product Catalog Administration"));

        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "OK");
    }

    #[tokio::test]
    async fn create_then_retrieve_matches() {
        let app = app(NameMatch::Exact);
        let body = product_json("Fedora", "A red hat", "12.50", true, "CLOTHS");
        let req = json_request(Method::POST, "/products", &body);
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let location = resp.headers()[header::LOCATION].to_str().unwrap().to_string();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let created: Value = serde_json::from_slice(&bytes).unwrap();
        let id = created["id"].as_i64().expect("assigned id");
        assert_eq!(location, format!("/products/{id}"));

        let (status, found) = send(&app, get(&location)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found, created);
        assert_eq!(found["name"], "Fedora");
        assert_eq!(found["description"], "A red hat");
        assert_eq!(found["price"], "12.50");
        assert_eq!(found["available"], true);
        assert_eq!(found["category"], "CLOTHS");
    }

    #[tokio::test]
    async fn retrieve_missing_product() {
        let app = app(NameMatch::Exact);
        let (status, body) = send(&app, get("/products/99999")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Product with id '99999' was not found.");
        assert_eq!(body["status"], 404);
    }

    #[tokio::test]
    async fn update_changes_fields_but_not_id() {
        let app = seeded(NameMatch::Exact).await;
        let (_, hats) = send(&app, get("/products?name=Hat")).await;
        let id = hats[0]["id"].as_i64().unwrap();

        let changes = json!({
            "id": id + 1000,
            "name": "Hat",
            "description": "A fedora",
            "price": "59.95",
            "available": true,
            "category": "CLOTHS",
        });
        let uri = format!("/products/{id}");
        let (status, updated) = send(&app, json_request(Method::PUT, &uri, &changes)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["id"], id);
        assert_eq!(updated["description"], "A fedora");

        let (_, found) = send(&app, get(&uri)).await;
        assert_eq!(found["description"], "A fedora");
        assert_eq!(found["name"], "Hat");
    }

    #[tokio::test]
    async fn update_missing_product() {
        let app = app(NameMatch::Exact);
        let body = product_json("Hat", "A red fedora", "59.95", true, "CLOTHS");
        let (status, body) = send(&app, json_request(Method::PUT, "/products/0", &body)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Product with id '0' was not found.");
    }

    #[tokio::test]
    async fn non_numeric_id_is_not_found_json() {
        let app = app(NameMatch::Exact);
        let (status, body) = send(&app, get("/products/abc")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Product with id 'abc' was not found.");

        let (status, body) = send(&app, get("/products/99999999999999999999")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], 404);

        let product = product_json("Hat", "A red fedora", "59.95", true, "CLOTHS");
        let (status, _) = send(&app, json_request(Method::PUT, "/products/abc", &product)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_missing_product_is_not_found_before_validation() {
        let app = app(NameMatch::Exact);
        let (status, body) = send(&app, json_request(Method::PUT, "/products/424242", &json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Product with id '424242' was not found.");
    }

    #[tokio::test]
    async fn update_existing_product_still_validates_body() {
        let app = seeded(NameMatch::Exact).await;
        let (_, hats) = send(&app, get("/products?name=Hat")).await;
        let uri = format!("/products/{}", hats[0]["id"]);

        let (status, body) = send(&app, json_request(Method::PUT, &uri, &json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid product: missing name");

        let (_, found) = send(&app, get(&uri)).await;
        assert_eq!(found["description"], "A red fedora");
    }

    #[tokio::test]
    async fn create_rejects_sub_cent_prices() {
        let app = app(NameMatch::Exact);
        let body = product_json("Hat", "A red fedora", "12.505", true, "CLOTHS");
        let (status, resp) = send(&app, json_request(Method::POST, "/products", &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp["message"], "Invalid product: price '12.505' has more than 2 decimal places");

        let body = json!({
            "name": "Hat",
            "description": "A red fedora",
            "price": 34.5,
            "available": true,
            "category": "CLOTHS",
        });
        let (status, created) = send(&app, json_request(Method::POST, "/products", &body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["price"], "34.50");
    }

    #[tokio::test]
    async fn delete_then_retrieve_is_not_found() {
        let app = seeded(NameMatch::Exact).await;
        let (_, hats) = send(&app, get("/products?name=Hat")).await;
        let uri = format!("/products/{}", hats[0]["id"]);

        let delete = Request::builder().method(Method::DELETE).uri(&uri).body(Body::empty()).unwrap();
        let resp = app.clone().oneshot(delete).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(resp.into_body().collect().await.unwrap().to_bytes().is_empty());

        let (status, body) = send(&app, get(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["message"].as_str().unwrap().ends_with("was not found."));

        let again = Request::builder().method(Method::DELETE).uri(&uri).body(Body::empty()).unwrap();
        let (status, _) = send(&app, again).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn search_without_filters_lists_all() {
        let app = seeded(NameMatch::Exact).await;
        let (status, body) = send(&app, get("/products")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&body).len(), 9);
        assert_eq!(names(&body)[0], "Hat");
        for product in body.as_array().unwrap() {
            for field in ["id", "name", "description", "available", "category", "price"] {
                assert!(product.get(field).is_some(), "missing {field}");
            }
        }
    }

    #[tokio::test]
    async fn search_by_name() {
        let app = seeded(NameMatch::Exact).await;
        let (_, body) = send(&app, get("/products?name=Hammer")).await;
        assert_eq!(names(&body), ["Hammer"]);
    }

    #[tokio::test]
    async fn search_by_category() {
        let app = seeded(NameMatch::Exact).await;
        let (_, body) = send(&app, get("/products?category=FOOD")).await;
        assert_eq!(names(&body), ["Big Mac", "Apple", "Banana"]);
    }

    #[tokio::test]
    async fn search_by_availability() {
        let app = seeded(NameMatch::Exact).await;
        let (_, body) = send(&app, get("/products?available=False")).await;
        assert_eq!(names(&body), ["Shoes"]);

        let (_, body) = send(&app, get("/products?available=true")).await;
        assert_eq!(names(&body).len(), 8);
    }

    #[tokio::test]
    async fn search_by_name_and_category() {
        let app = seeded(NameMatch::Exact).await;
        let (_, body) = send(&app, get("/products?name=Hammer&category=TOOLS")).await;
        assert_eq!(names(&body), ["Hammer"]);
    }

    #[tokio::test]
    async fn search_by_price() {
        let app = seeded(NameMatch::Exact).await;
        let (_, body) = send(&app, get("/products?price=12.5")).await;
        assert_eq!(names(&body), ["Wrench"]);
    }

    #[tokio::test]
    async fn search_by_name_substring_policy() {
        let app = seeded(NameMatch::Substring).await;
        let (_, body) = send(&app, get("/products?name=Ha")).await;
        assert_eq!(names(&body), ["Hat", "Hammer"]);
    }

    #[tokio::test]
    async fn search_rejects_bad_params() {
        let app = app(NameMatch::Exact);
        let (status, body) = send(&app, get("/products?category=toys")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid category: toys");

        let (status, _) = send(&app, get("/products?price=cheap")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_rejects_bad_payloads() {
        let app = app(NameMatch::Exact);

        let mut body = product_json("Hat", "A red fedora", "59.95", true, "CLOTHS");
        body["available"] = json!("true");
        let (status, _) = send(&app, json_request(Method::POST, "/products", &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let body = product_json("Hat", "A red fedora", "59.95", true, "UNKNOWN_CATEGORY");
        let (status, resp) = send(&app, json_request(Method::POST, "/products", &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp["message"], "Invalid attribute: 'UNKNOWN_CATEGORY'");

        let body = json!({ "description": "nameless" });
        let (status, resp) = send(&app, json_request(Method::POST, "/products", &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp["message"], "Invalid product: missing name");

        let (_, all) = send(&app, get("/products")).await;
        assert!(names(&all).is_empty());
    }

    #[tokio::test]
    async fn create_requires_json_content_type() {
        let app = app(NameMatch::Exact);
        let body = product_json("Hat", "A red fedora", "59.95", true, "CLOTHS").to_string();

        let no_type = Request::builder()
            .method(Method::POST)
            .uri("/products")
            .body(Body::from(body.clone()))
            .unwrap();
        let (status, resp) = send(&app, no_type).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(resp["message"], "Content-Type must be application/json");

        let html = Request::builder()
            .method(Method::POST)
            .uri("/products")
            .header(header::CONTENT_TYPE, "text/html")
            .body(Body::from(body))
            .unwrap();
        let (status, _) = send(&app, html).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn unsupported_method_is_rejected() {
        let app = app(NameMatch::Exact);
        let (status, _) = send(&app, json_request(Method::PUT, "/products", &json!({}))).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }
}
