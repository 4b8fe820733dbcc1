use rocket::http::{ContentType, Status};
use serde_json::json;

use crate::models::Schedule;
use crate::test::utils::{
    STANDARD_PASSWORD, TestDbBuilder, bearer, create_standard_test_db, login_test_user,
    setup_test_client, simple_workout,
};

async fn list_schedules(
    client: &rocket::local::asynchronous::Client,
    token: &str,
) -> Vec<Schedule> {
    let response = client
        .get("/api/schedules")
        .header(bearer(token))
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::Ok);

    let body = response.into_string().await.unwrap();
    serde_json::from_str(&body).unwrap()
}

#[rocket::async_test]
async fn test_schedule_crud() {
    let test_db = create_standard_test_db().await;
    let alice_id = test_db.user_id("alice@example.com").unwrap();
    let (client, _) = setup_test_client(test_db).await;

    let token = login_test_user(&client, "alice@example.com", STANDARD_PASSWORD).await;

    let response = client
        .post("/api/schedules")
        .header(ContentType::JSON)
        .header(bearer(&token))
        .body(
            json!({
                "name": "Push Pull Legs",
                "workouts": [
                    {
                        "day": "Monday",
                        "exercises": [
                            {
                                "exerciseName": "Bench Press",
                                "sets": [
                                    { "reps": 10, "weight": 100.0 },
                                    { "reps": 8 }
                                ]
                            }
                        ]
                    }
                ]
            })
            .to_string(),
        )
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::Created);

    let body = response.into_string().await.unwrap();
    let created: Schedule = serde_json::from_str(&body).unwrap();

    assert_eq!(created.name, "Push Pull Legs");
    assert_eq!(created.user_id, alice_id);
    assert_eq!(created.workouts.len(), 1);
    assert_eq!(created.workouts[0].day, "Monday");
    assert_eq!(created.workouts[0].exercises[0].sets.len(), 2);
    assert_eq!(created.workouts[0].exercises[0].sets[1].weight, None);

    let schedules = list_schedules(&client, &token).await;
    assert_eq!(schedules.len(), 1);

    // Partial update: name only, workouts untouched.
    let response = client
        .put(format!("/api/schedules/{}", created.id))
        .header(ContentType::JSON)
        .header(bearer(&token))
        .body(json!({ "name": "PPL v2" }).to_string())
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::Ok);

    let body = response.into_string().await.unwrap();
    let updated: Schedule = serde_json::from_str(&body).unwrap();
    assert_eq!(updated.name, "PPL v2");
    assert_eq!(updated.workouts, created.workouts);

    let response = client
        .delete(format!("/api/schedules/{}", created.id))
        .header(bearer(&token))
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::Ok);

    let schedules = list_schedules(&client, &token).await;
    assert!(schedules.is_empty());
}

#[rocket::async_test]
async fn test_schedules_are_owner_scoped() {
    let test_db = TestDbBuilder::new()
        .user("Alice Example", "alice@example.com")
        .user("Bob Example", "bob@example.com")
        .schedule(
            "alice@example.com",
            "Alice's Plan",
            vec![simple_workout("Monday", &[(10, Some(100.0))])],
        )
        .build()
        .await
        .expect("failed to build test database");

    let (client, _) = setup_test_client(test_db).await;

    let alice = login_test_user(&client, "alice@example.com", STANDARD_PASSWORD).await;
    let bob = login_test_user(&client, "bob@example.com", STANDARD_PASSWORD).await;

    let schedules = list_schedules(&client, &alice).await;
    assert_eq!(schedules.len(), 1);
    let schedule_id = schedules[0].id;

    assert!(list_schedules(&client, &bob).await.is_empty());

    // Another user's schedule is indistinguishable from a missing one.
    let response = client
        .put(format!("/api/schedules/{}", schedule_id))
        .header(ContentType::JSON)
        .header(bearer(&bob))
        .body(json!({ "name": "Bob's now" }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);

    let response = client
        .delete(format!("/api/schedules/{}", schedule_id))
        .header(bearer(&bob))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);

    // Untouched for the owner.
    let schedules = list_schedules(&client, &alice).await;
    assert_eq!(schedules.len(), 1);
    assert_eq!(schedules[0].name, "Alice's Plan");
}

#[rocket::async_test]
async fn test_schedule_workouts_are_validated() {
    let test_db = create_standard_test_db().await;
    let (client, _) = setup_test_client(test_db).await;

    let token = login_test_user(&client, "alice@example.com", STANDARD_PASSWORD).await;

    let response = client
        .post("/api/schedules")
        .header(ContentType::JSON)
        .header(bearer(&token))
        .body(
            json!({
                "name": "Bad Plan",
                "workouts": [
                    { "day": "Funday", "exercises": [] }
                ]
            })
            .to_string(),
        )
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::BadRequest);

    let response = client
        .post("/api/schedules")
        .header(ContentType::JSON)
        .header(bearer(&token))
        .body(
            json!({
                "name": "Bad Plan",
                "workouts": [
                    {
                        "day": "Monday",
                        "exercises": [
                            {
                                "exerciseName": "Bench Press",
                                "sets": [ { "reps": 10, "weight": -5.0 } ]
                            }
                        ]
                    }
                ]
            })
            .to_string(),
        )
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::BadRequest);
}
