use chrono::{Duration, Utc};
use once_cell::sync::Lazy;
use sqlx::{Pool, Sqlite};
use tracing::{info, instrument};

use crate::auth::{DbSession, DbUser, SESSION_TTL_DAYS, Session, User};
use crate::error::AppError;
use crate::models::{Category, DbExercise, DbSchedule, Difficulty, Exercise, Schedule, Workout};

// --- users ---------------------------------------------------------------

#[instrument(skip(pool))]
pub async fn get_user(pool: &Pool<Sqlite>, id: i64) -> Result<User, AppError> {
    info!("Fetching user by ID");
    let row = sqlx::query_as::<_, DbUser>("SELECT id, name, email FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(user) => Ok(User::from(user)),
        _ => Err(AppError::NotFound(format!(
            "User with id {} not found in database",
            id
        ))),
    }
}

#[instrument(skip_all, fields(email))]
pub async fn create_user(
    pool: &Pool<Sqlite>,
    name: &str,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    info!("Creating new user");

    let existing = sqlx::query_as::<_, DbUser>("SELECT id, name, email FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    if existing.is_some() {
        return Err(AppError::Validation("User already exists".to_string()));
    }

    let hashed_password = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;

    let res = sqlx::query("INSERT INTO users (name, email, password) VALUES (?, ?, ?)")
        .bind(name)
        .bind(email)
        .bind(hashed_password)
        .execute(pool)
        .await?;

    Ok(User {
        id: res.last_insert_rowid(),
        name: name.to_string(),
        email: email.to_string(),
    })
}

#[derive(sqlx::FromRow)]
struct DbCredentials {
    id: i64,
    name: String,
    email: String,
    password: String,
}

/// Resolves credentials to a user, or `None` when either the email is
/// unknown or the password does not match. Callers get no hint which.
#[instrument(skip_all, fields(email))]
pub async fn authenticate_user(
    pool: &Pool<Sqlite>,
    email: &str,
    password: &str,
) -> Result<Option<User>, AppError> {
    info!("Authenticating user");
    let row = sqlx::query_as::<_, DbCredentials>(
        "SELECT id, name, email, password FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(user) => match bcrypt::verify(password, &user.password) {
            Ok(true) => Ok(Some(User {
                id: user.id,
                name: user.name,
                email: user.email,
            })),
            _ => Ok(None),
        },
        _ => Ok(None),
    }
}

// --- sessions ------------------------------------------------------------

/// Mints a fresh bearer token for the user with the standard 30 day expiry.
#[instrument(skip(pool))]
pub async fn issue_session(pool: &Pool<Sqlite>, user_id: i64) -> Result<String, AppError> {
    info!("Issuing session token");

    let token = Session::generate_token();
    let expires_at = (Utc::now() + Duration::days(SESSION_TTL_DAYS)).naive_utc();

    sqlx::query("INSERT INTO sessions (user_id, token, expires_at) VALUES (?, ?, ?)")
        .bind(user_id)
        .bind(&token)
        .bind(expires_at)
        .execute(pool)
        .await?;

    Ok(token)
}

#[instrument(skip(pool, token))]
pub async fn get_session_by_token(pool: &Pool<Sqlite>, token: &str) -> Result<Session, AppError> {
    let session = sqlx::query_as::<_, DbSession>(
        "SELECT id, user_id, token, created_at, expires_at FROM sessions WHERE token = ?",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    match session {
        Some(session) => Ok(Session::from(session)),
        _ => Err(AppError::Authentication("Invalid bearer token".to_string())),
    }
}

#[instrument(skip(pool))]
pub async fn clean_expired_sessions(pool: &Pool<Sqlite>) -> Result<u64, AppError> {
    info!("Cleaning expired sessions");

    let now = Utc::now().naive_utc();

    let result = sqlx::query("DELETE FROM sessions WHERE expires_at < ?")
        .bind(now)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

// --- exercise catalog ----------------------------------------------------

struct DefaultExercise {
    name: &'static str,
    category: Category,
    equipment: &'static str,
    difficulty: Difficulty,
    description: &'static str,
}

static DEFAULT_EXERCISES: Lazy<Vec<DefaultExercise>> = Lazy::new(|| {
    vec![
        DefaultExercise {
            name: "Bench Press",
            category: Category::Chest,
            equipment: "Barbell",
            difficulty: Difficulty::Intermediate,
            description:
                "A compound exercise that primarily targets the chest, shoulders, and triceps.",
        },
        DefaultExercise {
            name: "Squats",
            category: Category::Legs,
            equipment: "Barbell",
            difficulty: Difficulty::Intermediate,
            description:
                "A compound exercise that primarily targets the quadriceps, hamstrings, and glutes.",
        },
        DefaultExercise {
            name: "Pull-ups",
            category: Category::Back,
            equipment: "Body Weight",
            difficulty: Difficulty::Advanced,
            description: "An upper body exercise that targets the lats, biceps, and upper back.",
        },
        DefaultExercise {
            name: "Shoulder Press",
            category: Category::Shoulders,
            equipment: "Dumbbells",
            difficulty: Difficulty::Intermediate,
            description: "An upper body exercise that targets the deltoids and triceps.",
        },
        DefaultExercise {
            name: "Deadlift",
            category: Category::Back,
            equipment: "Barbell",
            difficulty: Difficulty::Advanced,
            description:
                "A compound exercise that targets the lower back, hamstrings, and glutes.",
        },
    ]
});

/// Seeds the shared catalog if no default rows exist yet. The existence
/// query keeps this idempotent across concurrent server instances.
#[instrument(skip(pool))]
pub async fn seed_default_exercises(pool: &Pool<Sqlite>) -> Result<(), AppError> {
    let existing =
        sqlx::query_as::<_, (i64,)>("SELECT id FROM exercises WHERE is_default = 1 LIMIT 1")
            .fetch_optional(pool)
            .await?;

    if existing.is_some() {
        return Ok(());
    }

    info!("Seeding default exercises");
    for exercise in DEFAULT_EXERCISES.iter() {
        sqlx::query(
            "INSERT INTO exercises (name, category, equipment, difficulty, description, is_default)
             VALUES (?, ?, ?, ?, ?, 1)",
        )
        .bind(exercise.name)
        .bind(exercise.category.as_str())
        .bind(exercise.equipment)
        .bind(exercise.difficulty.as_str())
        .bind(exercise.description)
        .execute(pool)
        .await?;
    }

    Ok(())
}

#[instrument(skip(pool))]
pub async fn get_exercises_for_user(
    pool: &Pool<Sqlite>,
    user_id: i64,
) -> Result<Vec<Exercise>, AppError> {
    info!("Getting exercises visible to user");
    let rows = sqlx::query_as::<_, DbExercise>(
        "SELECT * FROM exercises WHERE is_default = 1 OR user_id = ? ORDER BY id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Exercise::from).collect())
}

#[instrument(skip(pool))]
pub async fn get_exercise(pool: &Pool<Sqlite>, id: i64) -> Result<Exercise, AppError> {
    info!("Getting exercise by ID");
    let row = sqlx::query_as::<_, DbExercise>("SELECT * FROM exercises WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(exercise) => Ok(Exercise::from(exercise)),
        _ => Err(AppError::NotFound("Exercise not found".to_string())),
    }
}

/// Name uniqueness is scoped per owner; defaults and other users' custom
/// exercises never collide with the caller's.
#[instrument(skip(pool))]
pub async fn exercise_name_taken(
    pool: &Pool<Sqlite>,
    user_id: i64,
    name: &str,
    exclude_id: Option<i64>,
) -> Result<bool, AppError> {
    let exclude_id = exclude_id.unwrap_or(-1);
    let existing = sqlx::query_as::<_, (i64,)>(
        "SELECT id FROM exercises WHERE user_id = ? AND name = ? AND id != ?",
    )
    .bind(user_id)
    .bind(name)
    .bind(exclude_id)
    .fetch_optional(pool)
    .await?;

    Ok(existing.is_some())
}

#[instrument(skip(pool, description))]
pub async fn create_exercise(
    pool: &Pool<Sqlite>,
    user_id: i64,
    name: &str,
    category: Category,
    equipment: &str,
    difficulty: Difficulty,
    description: &str,
) -> Result<Exercise, AppError> {
    info!("Creating custom exercise");

    if exercise_name_taken(pool, user_id, name, None).await? {
        return Err(AppError::Conflict(format!(
            "Exercise '{}' already exists",
            name
        )));
    }

    let res = sqlx::query(
        "INSERT INTO exercises (name, category, equipment, difficulty, description, is_default, user_id)
         VALUES (?, ?, ?, ?, ?, 0, ?)",
    )
    .bind(name)
    .bind(category.as_str())
    .bind(equipment)
    .bind(difficulty.as_str())
    .bind(description)
    .bind(user_id)
    .execute(pool)
    .await?;

    get_exercise(pool, res.last_insert_rowid()).await
}

#[instrument(skip(pool, description))]
pub async fn update_exercise(
    pool: &Pool<Sqlite>,
    id: i64,
    name: &str,
    category: Category,
    equipment: &str,
    difficulty: Difficulty,
    description: &str,
) -> Result<(), AppError> {
    info!("Updating exercise");
    let now = Utc::now().naive_utc();

    sqlx::query(
        "UPDATE exercises
         SET name = ?, category = ?, equipment = ?, difficulty = ?, description = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(name)
    .bind(category.as_str())
    .bind(equipment)
    .bind(difficulty.as_str())
    .bind(description)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

#[instrument(skip(pool, description))]
pub async fn update_exercise_description(
    pool: &Pool<Sqlite>,
    id: i64,
    description: &str,
) -> Result<(), AppError> {
    info!("Updating exercise description");
    let now = Utc::now().naive_utc();

    sqlx::query("UPDATE exercises SET description = ?, updated_at = ? WHERE id = ?")
        .bind(description)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

#[instrument(skip(pool))]
pub async fn delete_exercise(pool: &Pool<Sqlite>, id: i64) -> Result<(), AppError> {
    info!("Deleting exercise");
    sqlx::query("DELETE FROM exercises WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

// --- schedules -----------------------------------------------------------

#[instrument(skip(pool))]
pub async fn get_schedules_for_user(
    pool: &Pool<Sqlite>,
    user_id: i64,
) -> Result<Vec<Schedule>, AppError> {
    info!("Getting schedules for user");
    let rows =
        sqlx::query_as::<_, DbSchedule>("SELECT * FROM schedules WHERE user_id = ? ORDER BY id")
            .bind(user_id)
            .fetch_all(pool)
            .await?;

    Ok(rows.into_iter().map(Schedule::from).collect())
}

/// Lookup scoped to the owner: a schedule that exists but belongs to
/// someone else is indistinguishable from one that does not exist.
#[instrument(skip(pool))]
pub async fn get_schedule_for_user(
    pool: &Pool<Sqlite>,
    id: i64,
    user_id: i64,
) -> Result<Schedule, AppError> {
    info!("Getting schedule");
    let row = sqlx::query_as::<_, DbSchedule>("SELECT * FROM schedules WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(schedule) => Ok(Schedule::from(schedule)),
        _ => Err(AppError::NotFound("Schedule not found".to_string())),
    }
}

#[instrument(skip(pool, workouts))]
pub async fn create_schedule(
    pool: &Pool<Sqlite>,
    user_id: i64,
    name: &str,
    workouts: &[Workout],
) -> Result<Schedule, AppError> {
    info!("Creating schedule");
    let workouts_json = serde_json::to_string(workouts)?;

    let res = sqlx::query("INSERT INTO schedules (user_id, name, workouts) VALUES (?, ?, ?)")
        .bind(user_id)
        .bind(name)
        .bind(workouts_json)
        .execute(pool)
        .await?;

    get_schedule_for_user(pool, res.last_insert_rowid(), user_id).await
}

#[instrument(skip(pool, workouts))]
pub async fn update_schedule(
    pool: &Pool<Sqlite>,
    id: i64,
    user_id: i64,
    name: &str,
    workouts: &[Workout],
) -> Result<(), AppError> {
    info!("Updating schedule");
    let workouts_json = serde_json::to_string(workouts)?;
    let now = Utc::now().naive_utc();

    let result = sqlx::query(
        "UPDATE schedules SET name = ?, workouts = ?, updated_at = ? WHERE id = ? AND user_id = ?",
    )
    .bind(name)
    .bind(workouts_json)
    .bind(now)
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Schedule not found".to_string()));
    }

    Ok(())
}

#[instrument(skip(pool))]
pub async fn delete_schedule(pool: &Pool<Sqlite>, id: i64, user_id: i64) -> Result<(), AppError> {
    info!("Deleting schedule");
    let result = sqlx::query("DELETE FROM schedules WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Schedule not found".to_string()));
    }

    Ok(())
}
