use rocket::http::{ContentType, Header, Status};
use rocket::local::asynchronous::Client;
use serde_json::json;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::collections::HashMap;
use std::sync::Once;

use crate::api::AuthResponse;
use crate::config::AppConfig;
use crate::db::{create_exercise, create_schedule, create_user};
use crate::error::AppError;
use crate::init_rocket;
use crate::models::{Category, Difficulty, Workout, WorkoutExercise, WorkoutSet};
use crate::schema::apply_schema;

static INIT: Once = Once::new();
pub static STANDARD_PASSWORD: &str = "password123";

#[derive(Default)]
pub struct TestDbBuilder {
    users: Vec<TestUser>,
    exercises: Vec<TestExercise>,
    schedules: Vec<TestSchedule>,
}

pub struct TestUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub struct TestExercise {
    pub owner_email: String,
    pub name: String,
    pub category: Category,
    pub difficulty: Difficulty,
}

pub struct TestSchedule {
    pub owner_email: String,
    pub name: String,
    pub workouts: Vec<Workout>,
}

impl TestDbBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(mut self, name: &str, email: &str) -> Self {
        self.users.push(TestUser {
            name: name.to_string(),
            email: email.to_string(),
            password: STANDARD_PASSWORD.to_string(),
        });
        self
    }

    pub fn exercise(
        mut self,
        owner_email: &str,
        name: &str,
        category: Category,
        difficulty: Difficulty,
    ) -> Self {
        self.exercises.push(TestExercise {
            owner_email: owner_email.to_string(),
            name: name.to_string(),
            category,
            difficulty,
        });
        self
    }

    pub fn schedule(mut self, owner_email: &str, name: &str, workouts: Vec<Workout>) -> Self {
        self.schedules.push(TestSchedule {
            owner_email: owner_email.to_string(),
            name: name.to_string(),
            workouts,
        });
        self
    }

    pub async fn build(self) -> Result<TestDb, AppError> {
        INIT.call_once(|| {
            let _ = env_logger::builder().is_test(true).try_init();
        });

        // Single connection so every query sees the same in-memory database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        apply_schema(&pool).await?;

        let mut user_id_map: HashMap<String, i64> = HashMap::new();

        for user in &self.users {
            let created = create_user(&pool, &user.name, &user.email, &user.password).await?;
            user_id_map.insert(user.email.clone(), created.id);
        }

        for exercise in &self.exercises {
            let owner_id = user_id_map[&exercise.owner_email];
            create_exercise(
                &pool,
                owner_id,
                &exercise.name,
                exercise.category,
                "Barbell",
                exercise.difficulty,
                "",
            )
            .await?;
        }

        for schedule in &self.schedules {
            let owner_id = user_id_map[&schedule.owner_email];
            create_schedule(&pool, owner_id, &schedule.name, &schedule.workouts).await?;
        }

        Ok(TestDb { pool, user_id_map })
    }
}

pub struct TestDb {
    pub pool: Pool<Sqlite>,
    pub user_id_map: HashMap<String, i64>,
}

impl TestDb {
    pub fn user_id(&self, email: &str) -> Option<i64> {
        self.user_id_map.get(email).copied()
    }
}

pub async fn create_standard_test_db() -> TestDb {
    TestDbBuilder::new()
        .user("Alice Example", "alice@example.com")
        .user("Bob Example", "bob@example.com")
        .build()
        .await
        .expect("failed to build test database")
}

pub async fn setup_test_client(test_db: TestDb) -> (Client, TestDb) {
    let rocket = init_rocket(test_db.pool.clone(), AppConfig::for_tests()).await;
    let client = Client::tracked(rocket)
        .await
        .expect("failed to build test client");
    (client, test_db)
}

pub async fn login_test_user(client: &Client, email: &str, password: &str) -> String {
    let response = client
        .post("/api/auth/login")
        .header(ContentType::JSON)
        .body(json!({ "email": email, "password": password }).to_string())
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::Ok);

    let body = response.into_string().await.unwrap();
    let auth: AuthResponse = serde_json::from_str(&body).unwrap();
    auth.token
}

pub fn bearer(token: &str) -> Header<'static> {
    Header::new("Authorization", format!("Bearer {}", token))
}

pub fn simple_workout(day: &str, sets: &[(i64, Option<f64>)]) -> Workout {
    Workout {
        day: day.to_string(),
        exercises: vec![WorkoutExercise {
            exercise_name: "Bench Press".to_string(),
            sets: sets
                .iter()
                .map(|(reps, weight)| WorkoutSet {
                    set_number: None,
                    reps: *reps,
                    weight: *weight,
                })
                .collect(),
        }],
    }
}
