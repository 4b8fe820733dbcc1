use rocket::State;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::{Deserialize, Serialize, json::Json};
use sqlx::{Pool, Sqlite};
use validator::Validate;

use crate::auth::User;
use crate::db::{
    authenticate_user, create_exercise, create_schedule, create_user, delete_exercise,
    delete_schedule, exercise_name_taken, get_exercise, get_exercises_for_user,
    get_schedule_for_user, get_schedules_for_user, issue_session, seed_default_exercises,
    update_exercise, update_exercise_description, update_schedule,
};
use crate::error::AppError;
use crate::models::{Category, Difficulty, Exercise, Schedule, Workout, validate_workouts};
use crate::stats::{
    DaySummary, PerformanceMetrics, WeekSummary, monthly_summary, performance_metrics,
    weekly_summary,
};

#[derive(Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

// --- auth ----------------------------------------------------------------

#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    name: String,
    #[validate(email(message = "Invalid email address"))]
    email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Serialize, Deserialize)]
pub struct AuthResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub token: String,
}

#[post("/auth/register", data = "<registration>")]
pub async fn api_register(
    registration: Json<RegisterRequest>,
    db: &State<Pool<Sqlite>>,
) -> Result<Custom<Json<AuthResponse>>, AppError> {
    registration
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = create_user(
        db,
        &registration.name,
        &registration.email,
        &registration.password,
    )
    .await?;

    let token = issue_session(db, user.id).await?;

    Ok(Custom(
        Status::Created,
        Json(AuthResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            token,
        }),
    ))
}

#[post("/auth/login", data = "<login>")]
pub async fn api_login(
    login: Json<LoginRequest>,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<AuthResponse>, AppError> {
    match authenticate_user(db, &login.email, &login.password).await? {
        Some(user) => {
            let token = issue_session(db, user.id).await?;

            Ok(Json(AuthResponse {
                id: user.id,
                name: user.name,
                email: user.email,
                token,
            }))
        }
        // Deliberately the same response whether the email or the password
        // was wrong.
        None => Err(AppError::Validation("Invalid credentials".to_string())),
    }
}

#[get("/auth/me")]
pub async fn api_me(user: User) -> Json<User> {
    Json(user)
}

// --- exercise catalog ----------------------------------------------------

#[derive(Deserialize, Validate)]
pub struct CreateExerciseRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    name: String,
    category: Category,
    equipment: String,
    difficulty: Difficulty,
    #[serde(default)]
    description: String,
}

#[derive(Deserialize)]
pub struct UpdateExerciseRequest {
    name: Option<String>,
    category: Option<Category>,
    equipment: Option<String>,
    difficulty: Option<Difficulty>,
    description: Option<String>,
}

#[get("/exercises")]
pub async fn api_get_exercises(
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Vec<Exercise>>, AppError> {
    // First listing seeds the shared defaults.
    seed_default_exercises(db).await?;

    let exercises = get_exercises_for_user(db, user.id).await?;

    Ok(Json(exercises))
}

#[post("/exercises", data = "<request>")]
pub async fn api_create_exercise(
    request: Json<CreateExerciseRequest>,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Custom<Json<Exercise>>, AppError> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let exercise = create_exercise(
        db,
        user.id,
        &request.name,
        request.category,
        &request.equipment,
        request.difficulty,
        &request.description,
    )
    .await?;

    Ok(Custom(Status::Created, Json(exercise)))
}

#[get("/exercises/<id>")]
pub async fn api_get_exercise(
    id: i64,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Exercise>, AppError> {
    let exercise = get_exercise(db, id).await?;

    if !exercise.is_default && exercise.user_id != Some(user.id) {
        return Err(AppError::Forbidden(
            "You do not have access to this exercise".to_string(),
        ));
    }

    Ok(Json(exercise))
}

#[put("/exercises/<id>", data = "<request>")]
pub async fn api_update_exercise(
    id: i64,
    request: Json<UpdateExerciseRequest>,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Exercise>, AppError> {
    let existing = get_exercise(db, id).await?;

    if existing.is_default {
        // Core fields of seeded defaults are immutable for everyone.
        if request.name.is_some()
            || request.category.is_some()
            || request.equipment.is_some()
            || request.difficulty.is_some()
        {
            return Err(AppError::Validation(
                "Only the description of a default exercise can be changed".to_string(),
            ));
        }

        if let Some(description) = &request.description {
            update_exercise_description(db, id, description).await?;
        }

        return Ok(Json(get_exercise(db, id).await?));
    }

    if existing.user_id != Some(user.id) {
        return Err(AppError::Forbidden(
            "You do not own this exercise".to_string(),
        ));
    }

    let name = request.name.clone().unwrap_or(existing.name.clone());
    if name != existing.name && exercise_name_taken(db, user.id, &name, Some(id)).await? {
        return Err(AppError::Conflict(format!(
            "Exercise '{}' already exists",
            name
        )));
    }

    let category = request.category.unwrap_or(existing.category);
    let equipment = request.equipment.clone().unwrap_or(existing.equipment);
    let difficulty = request.difficulty.unwrap_or(existing.difficulty);
    let description = request.description.clone().unwrap_or(existing.description);

    update_exercise(db, id, &name, category, &equipment, difficulty, &description).await?;

    Ok(Json(get_exercise(db, id).await?))
}

#[delete("/exercises/<id>")]
pub async fn api_delete_exercise(
    id: i64,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<MessageResponse>, AppError> {
    let existing = get_exercise(db, id).await?;

    if existing.is_default {
        return Err(AppError::Validation(
            "Cannot delete default exercises".to_string(),
        ));
    }

    if existing.user_id != Some(user.id) {
        return Err(AppError::Forbidden(
            "You do not own this exercise".to_string(),
        ));
    }

    delete_exercise(db, id).await?;

    Ok(Json(MessageResponse::new("Exercise deleted successfully")))
}

// --- schedules -----------------------------------------------------------

#[derive(Deserialize, Validate)]
pub struct CreateScheduleRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    name: String,
    #[serde(default)]
    workouts: Vec<Workout>,
}

#[derive(Deserialize)]
pub struct UpdateScheduleRequest {
    name: Option<String>,
    workouts: Option<Vec<Workout>>,
}

#[get("/schedules")]
pub async fn api_get_schedules(
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Vec<Schedule>>, AppError> {
    let schedules = get_schedules_for_user(db, user.id).await?;

    Ok(Json(schedules))
}

#[post("/schedules", data = "<request>")]
pub async fn api_create_schedule(
    request: Json<CreateScheduleRequest>,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Custom<Json<Schedule>>, AppError> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    validate_workouts(&request.workouts)?;

    let schedule = create_schedule(db, user.id, &request.name, &request.workouts).await?;

    Ok(Custom(Status::Created, Json(schedule)))
}

#[put("/schedules/<id>", data = "<request>")]
pub async fn api_update_schedule(
    id: i64,
    request: Json<UpdateScheduleRequest>,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Schedule>, AppError> {
    let existing = get_schedule_for_user(db, id, user.id).await?;

    if let Some(workouts) = &request.workouts {
        validate_workouts(workouts)?;
    }

    let name = request.name.clone().unwrap_or(existing.name);
    let workouts = request.workouts.clone().unwrap_or(existing.workouts);

    update_schedule(db, id, user.id, &name, &workouts).await?;

    Ok(Json(get_schedule_for_user(db, id, user.id).await?))
}

#[delete("/schedules/<id>")]
pub async fn api_delete_schedule(
    id: i64,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<MessageResponse>, AppError> {
    delete_schedule(db, id, user.id).await?;

    Ok(Json(MessageResponse::new("Schedule deleted successfully")))
}

// --- stats ---------------------------------------------------------------

#[get("/stats/weekly-summary")]
pub async fn api_weekly_summary(
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Vec<DaySummary>>, AppError> {
    let schedules = get_schedules_for_user(db, user.id).await?;

    Ok(Json(weekly_summary(&schedules)))
}

#[get("/stats/monthly-summary")]
pub async fn api_monthly_summary(
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Vec<WeekSummary>>, AppError> {
    let schedules = get_schedules_for_user(db, user.id).await?;

    Ok(Json(monthly_summary(&schedules)))
}

#[get("/stats/performance-metrics")]
pub async fn api_performance_metrics(
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<PerformanceMetrics>, AppError> {
    let schedules = get_schedules_for_user(db, user.id).await?;

    Ok(Json(performance_metrics(&schedules)))
}

#[get("/health")]
pub fn health() -> &'static str {
    "OK"
}
