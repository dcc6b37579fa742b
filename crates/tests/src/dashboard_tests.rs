use bson::doc;
use chrono::Duration;
use rosterline_db::models::{Event, EventType, Message, UserRole};
use serde_json::Value;

use crate::fixtures::seed::{self, seed_coach};
use crate::fixtures::test_app::{TestApp, mint_token};

#[tokio::test]
async fn health_needs_no_token() {
    let app = TestApp::spawn().await;

    let resp = app.client.get(app.url("/api/health")).send().await.unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn dashboard_requires_a_valid_token() {
    let app = TestApp::spawn().await;
    let coach = seed_coach(&app.store, 1, 1);

    let resp = app.client.get(app.url("/api/dashboard")).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 401);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "unauthorized");

    let expired = mint_token(&app.settings.jwt, coach.user.id.unwrap(), -Duration::hours(2));
    let resp = app.auth_get("/api/dashboard", &expired).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 401);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["message"], "Token expired");

    let resp = app
        .auth_get("/api/dashboard", "not-a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 401);
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let app = TestApp::spawn().await;
    let token = app.token_for(bson::oid::ObjectId::new());

    let resp = app.auth_get("/api/dashboard", &token).send().await.unwrap();

    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn user_without_teams_gets_an_empty_dashboard() {
    let app = TestApp::spawn().await;
    let loner = seed::user("Loner", UserRole::Player, Vec::new());
    let id = app.store.insert_user(loner);
    let token = app.token_for(id);

    let resp = app.auth_get("/api/dashboard", &token).send().await.unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "complete");
    for key in ["sessions", "messages", "activities", "teams", "pending_requests", "failures"] {
        assert_eq!(json[key], serde_json::json!([]), "{key}");
    }
    assert_eq!(json["unread_count"], 0);
    assert_eq!(app.store.query_count(Event::COLLECTION), 0);
    assert_eq!(app.store.query_count(Message::COLLECTION), 0);
}

#[tokio::test]
async fn twelve_teams_take_two_event_queries_and_sort_ascending() {
    let app = TestApp::spawn().await;
    let coach = seed_coach(&app.store, 12, 3);

    // Seed in reverse so the response order has to come from sorting.
    for (i, team_id) in coach.team_ids.iter().enumerate().rev() {
        app.store.insert_event(seed::event(
            *team_id,
            EventType::Practice,
            Duration::hours(2 + i as i64 * 5),
            &[],
        ));
    }
    let token = app.token_for(coach.user.id.unwrap());

    let resp = app.auth_get("/api/dashboard", &token).send().await.unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "complete");
    let sessions = json["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 12);
    let starts: Vec<&str> = sessions
        .iter()
        .map(|s| s["start_time"].as_str().unwrap())
        .collect();
    let mut sorted = starts.clone();
    sorted.sort();
    assert_eq!(starts, sorted);
    assert_eq!(sessions[0]["team_id"], coach.team_ids[0].to_hex());
    assert_eq!(app.store.query_count(Event::COLLECTION), 2);
    assert_eq!(json["teams"].as_array().unwrap().len(), 12);
}

#[tokio::test]
async fn only_sessions_inside_the_week_are_listed() {
    let app = TestApp::spawn().await;
    let coach = seed_coach(&app.store, 1, 2);
    let team_id = coach.team_ids[0];
    let going = coach.players[0].clone();

    // Clock is 12:00; the window is [today 00:00, today + 7 days).
    app.store.insert_event(seed::event(team_id, EventType::Practice, -Duration::hours(13), &[]));
    app.store.insert_event(seed::event(team_id, EventType::Practice, -Duration::hours(11), &going));
    app.store.insert_event(seed::event(
        team_id,
        EventType::Game,
        Duration::days(6) + Duration::hours(11),
        &[],
    ));
    app.store.insert_event(seed::event(
        team_id,
        EventType::Game,
        Duration::days(6) + Duration::hours(12),
        &[],
    ));
    let token = app.token_for(coach.user.id.unwrap());

    let json: Value = app
        .auth_get("/api/dashboard", &token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let sessions = json["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0]["event_type"], "practice");
    assert_eq!(sessions[0]["going_count"], 2);
    assert_eq!(sessions[1]["event_type"], "game");
}

#[tokio::test]
async fn newest_three_messages_across_batches_with_unread_flags() {
    let app = TestApp::spawn().await;
    let coach = seed_coach(&app.store, 12, 1);
    let coach_id = coach.user.id.unwrap();
    let t = &coach.team_ids;

    app.store.insert_message(seed::message(t[0], "read one", -Duration::hours(1), vec![coach_id]));
    app.store.insert_message(seed::message(t[11], "second batch", -Duration::hours(2), vec![]));
    app.store.insert_message(seed::message(t[5], "newest", -Duration::minutes(30), vec![]));
    app.store.insert_message(seed::message(t[3], "old", -Duration::hours(5), vec![]));
    app.store.insert_message(seed::message(t[11], "older", -Duration::hours(3), vec![]));
    let token = app.token_for(coach_id);

    let json: Value = app
        .auth_get("/api/dashboard", &token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let messages = json["messages"].as_array().unwrap();
    let contents: Vec<&str> = messages
        .iter()
        .map(|m| m["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, vec!["newest", "read one", "second batch"]);
    assert_eq!(messages[0]["unread"], true);
    assert_eq!(messages[1]["unread"], false);
    assert_eq!(json["unread_count"], 2);
    assert_eq!(app.store.query_count(Message::COLLECTION), 2);
}

#[tokio::test]
async fn memberships_and_pending_requests_are_resolved() {
    let app = TestApp::spawn().await;
    let player = seed::user("Player", UserRole::Player, Vec::new());
    let player_id = app.store.insert_user(player);

    let member_of = seed::team("Hawks", vec![player_id]);
    let mut requested = seed::team("Owls", Vec::new());
    requested
        .join_requests
        .push(seed::pending_request(player_id, -Duration::days(1)));
    let mut declined = seed::team("Crows", Vec::new());
    let mut rejection = seed::pending_request(player_id, -Duration::days(2));
    rejection.status = rosterline_db::models::JoinRequestStatus::Declined;
    declined.join_requests.push(rejection);

    let hawks = app.store.insert_team(&member_of).unwrap();
    let owls = app.store.insert_team(&requested).unwrap();
    app.store.insert_team(&declined).unwrap();
    app.store.insert_event(seed::event(owls, EventType::Practice, Duration::hours(3), &[]));
    let token = app.token_for(player_id);

    let json: Value = app
        .auth_get("/api/dashboard", &token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let teams = json["teams"].as_array().unwrap();
    assert_eq!(teams.len(), 1);
    assert_eq!(teams[0]["id"], hawks.to_hex());
    assert_eq!(teams[0]["player_count"], 1);

    let pending = json["pending_requests"].as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["team_id"], owls.to_hex());
    assert_eq!(pending[0]["team_name"], "Owls");

    // A pending request grants no access to the team's schedule.
    assert_eq!(json["sessions"], serde_json::json!([]));
}

#[tokio::test]
async fn malformed_team_documents_do_not_break_the_dashboard() {
    let app = TestApp::spawn().await;
    let coach = seed_coach(&app.store, 1, 1);
    app.store.insert_raw_team(doc! {
        "_id": bson::oid::ObjectId::new(),
        "name": ["not", "a", "name"],
        "coaches": [coach.user.id.unwrap()],
    });
    let token = app.token_for(coach.user.id.unwrap());

    let resp = app.auth_get("/api/dashboard", &token).send().await.unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "complete");
    assert_eq!(json["teams"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn identical_calls_return_equal_data() {
    let app = TestApp::spawn().await;
    let coach = seed_coach(&app.store, 3, 2);
    for team_id in &coach.team_ids {
        app.store.insert_event(seed::event(*team_id, EventType::Game, Duration::days(1), &[]));
        app.store.insert_message(seed::message(*team_id, "hello", -Duration::hours(1), vec![]));
        seed::seed_activity(&app.store, seed::activity(*team_id, "Kit day", -Duration::hours(4))).await;
    }
    let token = app.token_for(coach.user.id.unwrap());

    let first: Value = app.auth_get("/api/dashboard", &token).send().await.unwrap().json().await.unwrap();
    let second: Value = app.auth_get("/api/dashboard", &token).send().await.unwrap().json().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first["sessions"].as_array().unwrap().len(), 3);
    assert_eq!(first["activities"].as_array().unwrap().len(), 3);
}
