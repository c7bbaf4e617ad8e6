use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use colloq_server::config::Config;
use colloq_server::models::{EventDetails, EventType, Online, Organizer, Ticket, Venue};
use colloq_server::routes::create_routes;
use colloq_server::state::AppState;
use colloq_server::store::{MemoryStore, Store};

struct TestApp {
    router: Router,
    store: Arc<MemoryStore>,
    config: Config,
}

impl TestApp {
    fn new() -> Self {
        let config = Config {
            bcrypt_cost: 4,
            ..Config::default()
        };
        let store = Arc::new(MemoryStore::new());
        let router = create_routes(AppState::new(config.clone(), store.clone()));

        Self {
            router,
            store,
            config,
        }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, value)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, None).await
    }

    /// Signs up and logs in, returning the session token.
    async fn login_as(&self, name: &str, email: &str) -> String {
        let (status, _) = self
            .send(
                Method::POST,
                "/signup",
                Some(json!({ "name": name, "email": email, "password": "secret-pass" })),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = self
            .send(
                Method::POST,
                "/login",
                Some(json!({ "email": email, "password": "secret-pass" })),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["data"]["token"].as_str().unwrap().to_string()
    }

    /// Tomorrow's date in the organizers' local zone.
    fn tomorrow(&self) -> String {
        (Utc::now() + Duration::days(1))
            .with_timezone(&self.config.offset())
            .format("%Y-%m-%d")
            .to_string()
    }

    fn meetup_form(&self) -> Value {
        json!({
            "title": "Meetup",
            "description": "x",
            "type": "Meetup",
            "tags": ["tech"],
            "eventFormat": "virtual",
            "platform": "Zoom",
            "startDate": self.tomorrow(),
            "startTime": "10:00",
            "endTime": "11:00",
            "organizerEmail": "a@b.com",
            "ticketType": "free"
        })
    }

    async fn create_event(&self, token: &str, form: Value) -> String {
        let (status, body) = self
            .send(Method::POST, "/events", Some(form), Some(token))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["eventId"].as_str().unwrap().to_string()
    }
}

fn error_message(body: &Value) -> &str {
    body["error"]["message"].as_str().unwrap()
}

#[tokio::test]
async fn health_check_reports_ok() {
    let app = TestApp::new();
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn virtual_meetup_is_created_and_listed() {
    let app = TestApp::new();
    let token = app.login_as("Asha", "asha@example.com").await;

    let id = app.create_event(&token, app.meetup_form()).await;

    let (status, body) = app.get("/events").await;
    assert_eq!(status, StatusCode::OK);
    let events = body["data"]["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);

    let event = &events[0];
    assert_eq!(event["id"], id.as_str());
    assert_eq!(event["eventFormat"], "virtual");
    assert_eq!(event["platform"], "Zoom");
    assert!(event.get("venue").is_none());
    assert!(event.get("address").is_none());
    assert_eq!(event["ticket"], json!({ "type": "free" }));
    assert_eq!(event["createdBy"], "asha@example.com");
    assert_eq!(event["organizer"]["email"], "a@b.com");
}

#[tokio::test]
async fn creating_an_event_requires_a_session() {
    let app = TestApp::new();

    let (status, body) = app
        .send(Method::POST, "/events", Some(app.meetup_form()), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(&body), "Unauthorized");

    let (status, _) = app
        .send(Method::POST, "/events", Some(app.meetup_form()), Some("not-a-token"))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_form_is_rejected_with_first_rule() {
    let app = TestApp::new();
    let token = app.login_as("Asha", "asha@example.com").await;

    let mut form = app.meetup_form();
    form["eventFormat"] = json!("in-person");
    form["venue"] = json!("");

    let (status, body) = app
        .send(Method::POST, "/events", Some(form), Some(&token))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(
        error_message(&body),
        "Venue is required for in-person/hybrid events"
    );

    let (_, body) = app.get("/events").await;
    assert!(body["data"]["events"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn organizer_email_defaults_to_session_user() {
    let app = TestApp::new();
    let token = app.login_as("Asha", "asha@example.com").await;

    let mut form = app.meetup_form();
    form["organizerEmail"] = json!("");
    let id = app.create_event(&token, form).await;

    let (status, body) = app.get(&format!("/events/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["organizer"]["email"], "asha@example.com");
}

#[tokio::test]
async fn unknown_event_is_not_found() {
    let app = TestApp::new();

    let (status, body) = app
        .get("/events/5f0c1a2e-8d4b-4c1e-9b7a-2d9f6e3c1a00")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, _) = app.get("/events/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn browse_filters_combine() {
    let app = TestApp::new();
    let token = app.login_as("Asha", "asha@example.com").await;

    app.create_event(&token, app.meetup_form()).await;

    let mut workshop = app.meetup_form();
    workshop["title"] = json!("Rust workshop");
    workshop["type"] = json!("Workshop");
    workshop["tags"] = json!(["rust", "systems"]);
    workshop["eventFormat"] = json!("in-person");
    workshop["venue"] = json!("Innovation Hub");
    workshop["address"] = json!("12 MG Road");
    workshop["ticketType"] = json!("paid");
    workshop["price"] = json!("499");
    app.create_event(&token, workshop).await;

    let titles = |body: &Value| -> Vec<String> {
        body["data"]["events"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["title"].as_str().unwrap().to_string())
            .collect()
    };

    let (_, body) = app.get("/events").await;
    assert_eq!(titles(&body), vec!["Rust workshop", "Meetup"]);

    let (_, body) = app.get("/events?format=virtual").await;
    assert_eq!(titles(&body), vec!["Meetup"]);

    let (_, body) = app.get("/events?tags=systems,tech").await;
    assert_eq!(titles(&body), vec!["Rust workshop", "Meetup"]);

    let (_, body) = app.get("/events?ticketType=paid&type=Meetup").await;
    assert!(titles(&body).is_empty());

    let (_, body) = app.get("/events?type=Workshop&format=&start=2000-01-01").await;
    assert_eq!(titles(&body), vec!["Rust workshop"]);

    let (status, body) = app.get("/events?format=underwater").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Invalid format filter: underwater");

    let (_, body) = app.get("/events/tags").await;
    assert_eq!(body["data"]["tags"], json!(["rust", "systems", "tech"]));
}

#[tokio::test]
async fn registering_twice_is_a_conflict() {
    let app = TestApp::new();
    let organizer = app.login_as("Asha", "asha@example.com").await;
    let attendee = app.login_as("Ravi", "ravi@example.com").await;
    let id = app.create_event(&organizer, app.meetup_form()).await;

    let (status, body) = app
        .send(
            Method::POST,
            "/register-event",
            Some(json!({ "eventId": id })),
            Some(&attendee),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["eventId"], id.as_str());
    assert_eq!(body["data"]["userEmail"], "ravi@example.com");

    let (status, body) = app
        .send(
            Method::POST,
            "/register-event",
            Some(json!({ "eventId": id })),
            Some(&attendee),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_message(&body), "Already registered");

    let (status, body) = app
        .send(Method::GET, "/dashboard", None, Some(&attendee))
        .await;
    assert_eq!(status, StatusCode::OK);
    let events = body["data"]["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["id"], id.as_str());

    let (_, body) = app
        .send(Method::GET, "/dashboard", None, Some(&organizer))
        .await;
    assert!(body["data"]["events"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn registration_needs_session_and_known_event() {
    let app = TestApp::new();
    let token = app.login_as("Ravi", "ravi@example.com").await;

    let body = json!({ "eventId": "5f0c1a2e-8d4b-4c1e-9b7a-2d9f6e3c1a00" });
    let (status, _) = app
        .send(Method::POST, "/register-event", Some(body.clone()), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(Method::POST, "/register-event", Some(body), Some(&token))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send(Method::GET, "/dashboard", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn registration_closes_after_deadline() {
    let app = TestApp::new();
    let token = app.login_as("Ravi", "ravi@example.com").await;

    let now = Utc::now();
    let event = app
        .store
        .insert_event(EventDetails {
            title: "Closed".into(),
            description: "desc".into(),
            event_type: EventType::Conference,
            tags: vec!["ai".into()],
            venue: Venue::Virtual(Online {
                platform: "Zoom".into(),
                meeting_link: None,
                notes: None,
            }),
            start_date_time: now + Duration::days(2),
            end_date_time: now + Duration::days(3),
            organizer: Organizer {
                email: "org@example.com".into(),
                social: None,
            },
            ticket: Ticket::Free,
            registration_deadline: Some(now - Duration::hours(1)),
            created_by: "org@example.com".into(),
            created_at: now - Duration::days(1),
        })
        .await
        .unwrap();

    let (status, body) = app
        .send(
            Method::POST,
            "/register-event",
            Some(json!({ "eventId": event.id })),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Registration for this event has closed");
}

#[tokio::test]
async fn signup_rules() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            Method::POST,
            "/signup",
            Some(json!({ "name": "Asha", "email": "asha@example.com" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "All fields are required");

    let (status, body) = app
        .send(
            Method::POST,
            "/signup",
            Some(json!({ "name": "Asha", "email": "asha@example.com", "password": "12345" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Password must be at least 6 characters");

    app.login_as("Asha", "asha@example.com").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/signup",
            Some(json!({ "name": "Other", "email": "asha@example.com", "password": "another-pass" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_message(&body), "User already exists");
}

#[tokio::test]
async fn login_rules() {
    let app = TestApp::new();
    app.login_as("Asha", "asha@example.com").await;

    let (status, body) = app
        .send(Method::POST, "/login", Some(json!({ "email": "asha@example.com" })), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Please enter email and password");

    let (status, body) = app
        .send(
            Method::POST,
            "/login",
            Some(json!({ "email": "nobody@example.com", "password": "secret-pass" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        error_message(&body),
        "No account found with this email. Please sign up first."
    );

    let (status, body) = app
        .send(
            Method::POST,
            "/login",
            Some(json!({ "email": "asha@example.com", "password": "wrong-pass" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(&body), "Invalid password");
}

#[tokio::test]
async fn malformed_json_uses_error_envelope() {
    let app = TestApp::new();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/signup")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn paid_price_beyond_cents_or_ten_digits_is_a_validation_error() {
    let app = TestApp::new();
    let token = app.login_as("Asha", "asha@example.com").await;

    for price in ["0.001", "123456789012345"] {
        let mut form = app.meetup_form();
        form["ticketType"] = json!("paid");
        form["price"] = json!(price);

        let (status, body) = app
            .send(Method::POST, "/events", Some(form), Some(&token))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "price {price}");
        assert_eq!(
            error_message(&body),
            "Valid price is required for paid events"
        );
    }

    let (_, body) = app.get("/events").await;
    assert!(body["data"]["events"].as_array().unwrap().is_empty());
}
