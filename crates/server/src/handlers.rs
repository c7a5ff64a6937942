//! Request handlers for the prediction API.

use crate::error::AppResult;
use crate::AppState;
use axum::{extract::State, Json};
use model::Factor;
use pipeline::MovieInput;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::info;

/// Response body for `POST /calculate`
#[derive(Debug, Serialize)]
pub struct CalculateResponse {
    /// Probability of cult status, 0 to 100
    pub probability: f64,

    /// Per-feature breakdown of the prediction
    pub factors: BTreeMap<String, Factor>,

    /// The movie as submitted, echoed back for the UI
    pub movie_details: MovieInput,
}

/// `GET /` landing route
pub async fn welcome() -> Json<Value> {
    Json(json!({ "message": "Welcome to the Cult Classic Calculator API" }))
}

/// `POST /calculate` scores a movie against the loaded model
pub async fn calculate(
    State(state): State<AppState>,
    Json(movie): Json<MovieInput>,
) -> AppResult<Json<CalculateResponse>> {
    let explanation = state.artifact.explain_input(&movie)?;
    info!(
        "Scored '{}' ({}) at {:.1}% cult",
        movie.title, movie.year, explanation.probability
    );

    Ok(Json(CalculateResponse {
        probability: explanation.probability,
        factors: explanation.factors,
        movie_details: movie,
    }))
}

#[cfg(test)]
mod tests {
    use crate::create_router;
    use axum::body::Body;
    use axum::http::{header, HeaderValue, Request, StatusCode};
    use http_body_util::BodyExt;
    use model::{DecisionTree, ModelArtifact, TreeParams};
    use pipeline::FeatureSchema;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const TEST_ORIGIN: &str = "http://localhost:3000";

    /// Router over a small model: 70s/80s horror is cult, modern
    /// drama is not. Feature layout:
    /// [release_year, runtime, revenue, adult, budget, Horror, Drama]
    fn test_app() -> axum::Router {
        let schema = FeatureSchema::from_genres(vec!["Horror".to_string(), "Drama".to_string()]);
        let rows = vec![
            vec![1975.0, 95.0, 2_000_000.0, 0.0, 500_000.0, 1.0, 0.0],
            vec![1982.0, 88.0, 1_500_000.0, 0.0, 300_000.0, 1.0, 0.0],
            vec![1978.0, 101.0, 3_200_000.0, 0.0, 700_000.0, 1.0, 0.0],
            vec![2015.0, 142.0, 800_000_000.0, 0.0, 200_000_000.0, 0.0, 1.0],
            vec![2018.0, 130.0, 650_000_000.0, 0.0, 150_000_000.0, 0.0, 1.0],
            vec![2012.0, 125.0, 900_000_000.0, 0.0, 250_000_000.0, 0.0, 1.0],
        ];
        let labels = vec![1, 1, 1, 0, 0, 0];
        let tree = DecisionTree::fit(&rows, &labels, TreeParams::default()).unwrap();
        let artifact = ModelArtifact::new(schema, tree).unwrap();

        create_router(
            crate::AppState::new(artifact),
            HeaderValue::from_static(TEST_ORIGIN),
        )
    }

    fn cult_movie_body() -> Value {
        json!({
            "title": "Lost Cult Gem",
            "year": 1979,
            "runtime": 92,
            "tagline": "They said it could not be filmed",
            "description": "A low budget oddity that found its audience",
            "genre": "Horror",
            "revenue": 1_200_000.0,
            "budget": 450_000.0,
            "adult": false
        })
    }

    fn post_calculate(body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/calculate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn response_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_welcome_route() {
        let app = test_app();
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(
            body["message"],
            "Welcome to the Cult Classic Calculator API"
        );
    }

    #[tokio::test]
    async fn test_calculate_scores_a_cult_movie() {
        let app = test_app();
        let response = app.oneshot(post_calculate(&cult_movie_body())).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;

        assert_eq!(body["probability"], 100.0);
        assert_eq!(body["movie_details"]["title"], "Lost Cult Gem");
        assert_eq!(body["movie_details"]["year"], 1979);

        let factors = body["factors"].as_object().unwrap();
        assert_eq!(factors.len(), 7);
        for factor in factors.values() {
            assert!(factor["score"].is_number());
            assert!(factor["weight"].is_number());
            assert!(factor["details"].is_string());
        }
    }

    #[tokio::test]
    async fn test_calculate_scores_a_studio_movie_low() {
        let app = test_app();
        let body = json!({
            "title": "Quarterly Franchise Entry",
            "year": 2016,
            "runtime": 138,
            "tagline": "",
            "description": "",
            "genre": "Drama",
            "revenue": 750_000_000.0,
            "budget": 180_000_000.0,
            "adult": false
        });
        let response = app.oneshot(post_calculate(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["probability"], 0.0);
    }

    #[tokio::test]
    async fn test_calculate_rejects_year_as_string() {
        let app = test_app();
        let mut body = cult_movie_body();
        body["year"] = json!("1979");
        let response = app.oneshot(post_calculate(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_calculate_rejects_missing_field() {
        let app = test_app();
        let mut body = cult_movie_body();
        body.as_object_mut().unwrap().remove("budget");
        let response = app.oneshot(post_calculate(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_calculate_accepts_unknown_genre() {
        let app = test_app();
        let mut body = cult_movie_body();
        body["genre"] = json!("Giallo");
        let response = app.oneshot(post_calculate(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        let probability = body["probability"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&probability));
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin_only() {
        let app = test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ORIGIN, TEST_ORIGIN)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .map(|v| v.to_str().unwrap()),
            Some(TEST_ORIGIN)
        );

        let app = test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ORIGIN, "http://spam.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
