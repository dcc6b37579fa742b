use chrono::Duration;
use rosterline_db::models::{Activity, UserRole};
use serde_json::{Value, json};

use crate::fixtures::seed::{self, seed_coach};
use crate::fixtures::test_app::{TestApp, test_now};

#[tokio::test]
async fn create_without_type_is_rejected_and_nothing_is_written() {
    let app = TestApp::spawn().await;
    let coach = seed_coach(&app.store, 1, 1);
    let token = app.token_for(coach.user.id.unwrap());

    let resp = app
        .auth_post("/api/activity", &token)
        .json(&json!({ "title": "X" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 422);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "validation");
    assert_eq!(json["message"], "Missing required field: type");
    assert!(app.store.activities().is_empty());
}

#[tokio::test]
async fn each_required_field_is_named_when_missing() {
    let app = TestApp::spawn().await;
    let coach = seed_coach(&app.store, 1, 1);
    let token = app.token_for(coach.user.id.unwrap());
    let complete = json!({
        "type": "announcement",
        "title": "Picture day",
        "description": "Wear the home kit",
        "team_id": coach.team_ids[0].to_hex(),
    });

    for field in ["title", "description", "team_id"] {
        let mut body = complete.clone();
        body[field] = json!("   ");

        let resp = app
            .auth_post("/api/activity", &token)
            .json(&body)
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status().as_u16(), 422, "{field}");
        let json: Value = resp.json().await.unwrap();
        assert_eq!(json["message"], format!("Missing required field: {field}"));
    }
    assert!(app.store.activities().is_empty());
}

#[tokio::test]
async fn create_rejects_bad_team_id_and_oversized_title() {
    let app = TestApp::spawn().await;
    let coach = seed_coach(&app.store, 1, 1);
    let token = app.token_for(coach.user.id.unwrap());

    let resp = app
        .auth_post("/api/activity", &token)
        .json(&json!({
            "type": "announcement",
            "title": "Picture day",
            "description": "Wear the home kit",
            "team_id": "nope",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["message"], "Invalid team_id: nope");

    let resp = app
        .auth_post("/api/activity", &token)
        .json(&json!({
            "type": "announcement",
            "title": "x".repeat(201),
            "description": "Wear the home kit",
            "team_id": coach.team_ids[0].to_hex(),
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);
    assert!(app.store.activities().is_empty());
}

#[tokio::test]
async fn create_backfills_the_team_name() {
    let app = TestApp::spawn().await;
    let coach = seed_coach(&app.store, 1, 1);
    let coach_id = coach.user.id.unwrap();
    let token = app.token_for(coach_id);

    let resp = app
        .auth_post("/api/activity", &token)
        .json(&json!({
            "type": "schedule_change",
            "title": "Practice moved",
            "description": "Thursday practice starts at 18:00",
            "team_id": coach.team_ids[0].to_hex(),
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 201);
    let json: Value = resp.json().await.unwrap();
    let id = json["id"].as_str().unwrap();

    let stored = app.store.activities();
    assert_eq!(stored.len(), 1);
    let activity: &Activity = &stored[0];
    assert_eq!(activity.id.unwrap().to_hex(), id);
    assert_eq!(activity.activity_type, "schedule_change");
    assert_eq!(activity.team_name.as_deref(), Some("Team 00"));
    assert_eq!(activity.created_by, Some(coach_id));
    assert_eq!(activity.created_at.to_chrono(), test_now());
}

#[tokio::test]
async fn create_keeps_a_given_team_name() {
    let app = TestApp::spawn().await;
    let coach = seed_coach(&app.store, 1, 1);
    let token = app.token_for(coach.user.id.unwrap());

    let resp = app
        .auth_post("/api/activity", &token)
        .json(&json!({
            "type": "award",
            "title": "MVP",
            "description": "Sam took MVP",
            "team_id": coach.team_ids[0].to_hex(),
            "team_name": "U12 Hawks",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 201);
    assert_eq!(
        app.store.activities()[0].team_name.as_deref(),
        Some("U12 Hawks")
    );
}

#[tokio::test]
async fn feed_merges_batches_newest_first() {
    let app = TestApp::spawn().await;
    let coach = seed_coach(&app.store, 12, 1);
    let first = coach.team_ids[0];
    let last = coach.team_ids[11];

    // First batch holds more than one batch limit of rows.
    for hour in 1..=12 {
        seed::seed_activity(
            &app.store,
            seed::activity(first, &format!("first {hour}"), -Duration::hours(hour)),
        )
        .await;
    }
    seed::seed_activity(&app.store, seed::activity(last, "last a", -Duration::minutes(90))).await;
    seed::seed_activity(&app.store, seed::activity(last, "last b", -Duration::days(2))).await;
    let token = app.token_for(coach.user.id.unwrap());
    let seeded = app.store.query_count(Activity::COLLECTION);

    let ids: Vec<String> = coach.team_ids.iter().map(|id| id.to_hex()).collect();
    let resp = app
        .auth_get(&format!("/api/activity?team_ids={}", ids.join(",")), &token)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "complete");
    let titles: Vec<&str> = json["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles.len(), 12);
    assert_eq!(&titles[..3], &["first 1", "last a", "first 2"]);
    assert_eq!(titles[11], "last b");
    assert!(!titles.contains(&"first 11"));
    assert_eq!(app.store.query_count(Activity::COLLECTION) - seeded, 2);
}

#[tokio::test]
async fn feed_for_no_teams_is_empty_without_queries() {
    let app = TestApp::spawn().await;
    let coach = seed_coach(&app.store, 1, 1);
    let token = app.token_for(coach.user.id.unwrap());

    let json: Value = app
        .auth_get("/api/activity?team_ids=", &token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(json["items"], json!([]));
    assert_eq!(app.store.query_count(Activity::COLLECTION), 0);
}

#[tokio::test]
async fn feed_rejects_malformed_team_ids() {
    let app = TestApp::spawn().await;
    let coach = seed_coach(&app.store, 1, 1);
    let token = app.token_for(coach.user.id.unwrap());

    let resp = app
        .auth_get("/api/activity?team_ids=abc", &token)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 400);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "bad_request");
}

#[tokio::test]
async fn create_counts_as_an_activities_write() {
    let app = TestApp::spawn().await;
    let coach = seed_coach(&app.store, 1, 1);
    let token = app.token_for(coach.user.id.unwrap());

    let resp = app
        .auth_post("/api/activity", &token)
        .json(&json!({
            "type": "announcement",
            "title": "Picture day",
            "description": "Wear the home kit",
            "team_id": coach.team_ids[0].to_hex(),
            "team_name": "U12 Hawks",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 201);
    assert_eq!(app.store.query_count(Activity::COLLECTION), 1);
}

#[tokio::test]
async fn feed_for_a_foreign_team_is_forbidden() {
    let app = TestApp::spawn().await;
    let coach = seed_coach(&app.store, 1, 1);
    seed::seed_activity(
        &app.store,
        seed::activity(coach.team_ids[0], "private", -Duration::hours(1)),
    )
    .await;
    let outsider = seed::user("Outsider", UserRole::Player, Vec::new());
    app.store.insert_user(outsider.clone());
    let token = app.token_for(outsider.id.unwrap());
    let seeded = app.store.query_count(Activity::COLLECTION);

    let resp = app
        .auth_get(
            &format!("/api/activity?team_ids={}", coach.team_ids[0].to_hex()),
            &token,
        )
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 403);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "forbidden");
    assert_eq!(app.store.query_count(Activity::COLLECTION), seeded);
}

#[tokio::test]
async fn create_for_a_foreign_team_is_forbidden_and_nothing_is_written() {
    let app = TestApp::spawn().await;
    let coach = seed_coach(&app.store, 1, 1);
    let outsider = seed::user("Outsider", UserRole::Coach, Vec::new());
    app.store.insert_user(outsider.clone());
    let token = app.token_for(outsider.id.unwrap());

    let resp = app
        .auth_post("/api/activity", &token)
        .json(&json!({
            "type": "announcement",
            "title": "Free pizza",
            "description": "Not really",
            "team_id": coach.team_ids[0].to_hex(),
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 403);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "forbidden");
    assert!(app.store.activities().is_empty());
}

#[tokio::test]
async fn rostered_player_may_post_to_their_team() {
    let app = TestApp::spawn().await;
    let coach = seed_coach(&app.store, 1, 1);
    // Listed on the roster only, not in their own team list.
    let player_id = coach.players[0][0];
    let mut player = seed::user("Rostered", UserRole::Player, Vec::new());
    player.id = Some(player_id);
    app.store.insert_user(player);
    let token = app.token_for(player_id);

    let resp = app
        .auth_post("/api/activity", &token)
        .json(&json!({
            "type": "announcement",
            "title": "Carpool",
            "description": "Two seats free on Saturday",
            "team_id": coach.team_ids[0].to_hex(),
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 201);
    assert_eq!(app.store.activities()[0].created_by, Some(player_id));
}
