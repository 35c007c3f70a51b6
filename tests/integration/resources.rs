//! REST collection accessors.

use crate::mock_server::*;
use mockito::Matcher;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use subscription_admin::ApiRequest;

const DELAY: Duration = Duration::from_millis(10);

#[derive(Debug, Deserialize, PartialEq)]
struct Plan {
    id: u32,
    name: String,
}

#[tokio::test]
async fn test_plan_crud_paths() {
    let mut fixture = MockServerFixture::new().await;
    fixture.login_as("tok").await;
    let list = fixture
        .server
        .mock("GET", "/api/plans")
        .match_header("authorization", "Bearer tok")
        .with_status(200)
        .with_body(r#"[{"id":1,"name":"Weekly"}]"#)
        .expect(1)
        .create_async()
        .await;
    let update = fixture
        .server
        .mock("PUT", "/api/plans/1")
        .match_body(Matcher::Json(json!({"name": "Weekly+"})))
        .with_status(200)
        .with_body(r#"{"id":1,"name":"Weekly+"}"#)
        .expect(1)
        .create_async()
        .await;
    let delete = fixture
        .server
        .mock("DELETE", "/api/plans/1")
        .with_status(200)
        .with_body(r#"{"deleted":true}"#)
        .expect(1)
        .create_async()
        .await;

    let client = fixture.client(1, DELAY);
    let plans = client.plans();
    assert_eq!(plans.list().await.unwrap()[0]["name"], "Weekly");
    assert_eq!(
        plans.update(1, json!({"name": "Weekly+"})).await.unwrap()["name"],
        "Weekly+"
    );
    assert_eq!(plans.delete(1).await.unwrap(), json!({"deleted": true}));

    list.assert_async().await;
    update.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test]
async fn test_subscribers_of_plan() {
    let mut fixture = MockServerFixture::new().await;
    fixture.login_as("tok").await;
    let mock = fixture
        .server
        .mock("GET", "/api/plans/42/subscribers")
        .with_status(200)
        .with_body(r#"[{"id":"u1"},{"id":"u2"}]"#)
        .expect(1)
        .create_async()
        .await;

    let subs = fixture.client(1, DELAY).subscribers(42).list().await.unwrap();

    mock.assert_async().await;
    assert_eq!(subs.as_array().map(|a| a.len()), Some(2));
}

#[tokio::test]
async fn test_create_application_and_get_staff_member() {
    let mut fixture = MockServerFixture::new().await;
    fixture.login_as("tok").await;
    let create = fixture
        .server
        .mock("POST", "/api/applications")
        .match_body(Matcher::Json(json!({"name": "Sato", "planId": 2})))
        .with_status(201)
        .with_body(r#"{"id":9}"#)
        .expect(1)
        .create_async()
        .await;
    let staff = fixture
        .server
        .mock("GET", "/api/staff/ops%20lead")
        .with_status(200)
        .with_body(r#"{"userId":"ops lead"}"#)
        .expect(1)
        .create_async()
        .await;

    let client = fixture.client(1, DELAY);
    let created = client
        .applications()
        .create(json!({"name": "Sato", "planId": 2}))
        .await
        .unwrap();
    let member = client.staff().get("ops lead").await.unwrap();

    create.assert_async().await;
    staff.assert_async().await;
    assert_eq!(created["id"], 9);
    assert_eq!(member["userId"], "ops lead");
}

#[tokio::test]
async fn test_settings_send_and_scheduler() {
    let mut fixture = MockServerFixture::new().await;
    fixture.login_as("tok").await;
    let get_settings = fixture
        .server
        .mock("GET", "/api/settings")
        .with_status(200)
        .with_body(r#"{"sendHour":8}"#)
        .expect(1)
        .create_async()
        .await;
    let put_settings = fixture
        .server
        .mock("PUT", "/api/settings")
        .match_body(Matcher::Json(json!({"sendHour": 9})))
        .with_status(200)
        .with_body(r#"{"sendHour":9}"#)
        .expect(1)
        .create_async()
        .await;
    let send = fixture
        .server
        .mock("POST", "/api/send-manual")
        .match_body(Matcher::Json(json!({"planId": 1, "message": "hello"})))
        .with_status(200)
        .with_body(r#"{"sent":3}"#)
        .expect(1)
        .create_async()
        .await;
    let sync = fixture
        .server
        .mock("POST", "/api/scheduler/sync")
        .match_body(Matcher::Json(json!({})))
        .with_status(200)
        .with_body(r#"{"synced":true}"#)
        .expect(1)
        .create_async()
        .await;

    let client = fixture.client(1, DELAY);
    assert_eq!(client.settings().await.unwrap()["sendHour"], 8);
    assert_eq!(
        client.update_settings(json!({"sendHour": 9})).await.unwrap()["sendHour"],
        9
    );
    assert_eq!(
        client
            .send_manual(json!({"planId": 1, "message": "hello"}))
            .await
            .unwrap()["sent"],
        3
    );
    assert_eq!(client.sync_scheduler().await.unwrap()["synced"], true);

    get_settings.assert_async().await;
    put_settings.assert_async().await;
    send.assert_async().await;
    sync.assert_async().await;
}

#[tokio::test]
async fn test_call_as_decodes_typed_result() {
    let mut fixture = MockServerFixture::new().await;
    fixture.login_as("tok").await;
    let _mock = fixture
        .server
        .mock("GET", "/api/plans")
        .with_status(200)
        .with_body(r#"[{"id":1,"name":"Weekly"},{"id":2,"name":"Monthly"}]"#)
        .create_async()
        .await;

    let client = fixture.client(1, DELAY);
    let plans: Vec<Plan> = client.call_as(ApiRequest::get("/api/plans")).await.unwrap();
    assert_eq!(
        plans,
        vec![
            Plan {
                id: 1,
                name: "Weekly".into()
            },
            Plan {
                id: 2,
                name: "Monthly".into()
            }
        ]
    );

    let err = client
        .call_as::<Vec<u32>>(ApiRequest::get("/api/plans"))
        .await
        .unwrap_err();
    assert!(matches!(err, subscription_admin::Error::Decode { .. }));
}

#[tokio::test]
async fn test_concurrent_calls_are_independent() {
    let mut fixture = MockServerFixture::new().await;
    fixture.login_as("tok").await;
    let ok = fixture
        .server
        .mock("GET", "/api/history")
        .with_status(200)
        .with_body("[]")
        .expect(1)
        .create_async()
        .await;
    let failing = fixture
        .server
        .mock("GET", "/api/staff")
        .with_status(500)
        .expect(2)
        .create_async()
        .await;

    let client = fixture.client(2, DELAY);
    let other = client.clone();
    let history_api = client.history();
    let staff_api = other.staff();
    let (history, staff) = tokio::join!(history_api.list(), staff_api.list());

    ok.assert_async().await;
    failing.assert_async().await;
    assert_eq!(history.unwrap(), json!([]));
    assert!(staff.is_err());
    assert!(fixture.session.is_authenticated());
}
