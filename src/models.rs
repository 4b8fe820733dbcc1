use anyhow::Error;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "Monday" => Ok(Weekday::Monday),
            "Tuesday" => Ok(Weekday::Tuesday),
            "Wednesday" => Ok(Weekday::Wednesday),
            "Thursday" => Ok(Weekday::Thursday),
            "Friday" => Ok(Weekday::Friday),
            "Saturday" => Ok(Weekday::Saturday),
            "Sunday" => Ok(Weekday::Sunday),
            _ => Err(Error::msg(format!("Unknown weekday: {}", s))),
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Category {
    #[default]
    Chest,
    Back,
    Shoulders,
    Arms,
    Legs,
    Core,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Chest => "Chest",
            Category::Back => "Back",
            Category::Shoulders => "Shoulders",
            Category::Arms => "Arms",
            Category::Legs => "Legs",
            Category::Core => "Core",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "Chest" => Ok(Category::Chest),
            "Back" => Ok(Category::Back),
            "Shoulders" => Ok(Category::Shoulders),
            "Arms" => Ok(Category::Arms),
            "Legs" => Ok(Category::Legs),
            "Core" => Ok(Category::Core),
            _ => Err(Error::msg(format!("Unknown category: {}", s))),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "Beginner" => Ok(Difficulty::Beginner),
            "Intermediate" => Ok(Difficulty::Intermediate),
            "Advanced" => Ok(Difficulty::Advanced),
            _ => Err(Error::msg(format!("Unknown difficulty: {}", s))),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub category: Category,
    pub equipment: String,
    pub difficulty: Difficulty,
    pub description: String,
    pub is_default: bool,
    pub user_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbExercise {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub equipment: Option<String>,
    pub difficulty: Option<String>,
    pub description: Option<String>,
    pub is_default: Option<bool>,
    pub user_id: Option<i64>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl From<DbExercise> for Exercise {
    fn from(db: DbExercise) -> Self {
        Self {
            id: db.id.unwrap_or_default(),
            name: db.name.unwrap_or_default(),
            category: Category::from_str(&db.category.unwrap_or_default()).unwrap_or_default(),
            equipment: db.equipment.unwrap_or_default(),
            difficulty: Difficulty::from_str(&db.difficulty.unwrap_or_default()).unwrap_or_default(),
            description: db.description.unwrap_or_default(),
            is_default: db.is_default.unwrap_or_default(),
            user_id: db.user_id,
            created_at: utc_from_naive(db.created_at),
            updated_at: utc_from_naive(db.updated_at),
        }
    }
}

/// One repetition group within an exercise. Weight is optional; older
/// payloads carry a `setNumber` alongside, so both shapes are tolerated.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_number: Option<i64>,
    pub reps: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutExercise {
    pub exercise_name: String,
    #[serde(default)]
    pub sets: Vec<WorkoutSet>,
}

/// A day-tagged collection of exercises. The day stays a plain string so
/// stored rows with an unrecognized day can still be loaded; write paths
/// validate it against `Weekday`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub day: String,
    #[serde(default)]
    pub exercises: Vec<WorkoutExercise>,
}

pub fn validate_workouts(workouts: &[Workout]) -> Result<(), AppError> {
    for workout in workouts {
        Weekday::from_str(&workout.day)
            .map_err(|_| AppError::Validation(format!("Invalid workout day: {}", workout.day)))?;

        for exercise in &workout.exercises {
            if exercise.exercise_name.is_empty() {
                return Err(AppError::Validation(
                    "Exercise name must not be empty".to_string(),
                ));
            }

            for set in &exercise.sets {
                if set.reps < 0 {
                    return Err(AppError::Validation(
                        "Set reps must be non-negative".to_string(),
                    ));
                }
                if set.weight.is_some_and(|w| w < 0.0) {
                    return Err(AppError::Validation(
                        "Set weight must be non-negative".to_string(),
                    ));
                }
            }
        }
    }

    Ok(())
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub workouts: Vec<Workout>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbSchedule {
    pub id: Option<i64>,
    pub user_id: Option<i64>,
    pub name: Option<String>,
    pub workouts: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl From<DbSchedule> for Schedule {
    fn from(db: DbSchedule) -> Self {
        Self {
            id: db.id.unwrap_or_default(),
            user_id: db.user_id.unwrap_or_default(),
            name: db.name.unwrap_or_default(),
            workouts: serde_json::from_str(&db.workouts.unwrap_or_default()).unwrap_or_default(),
            created_at: utc_from_naive(db.created_at),
            updated_at: utc_from_naive(db.updated_at),
        }
    }
}

fn utc_from_naive(dt: Option<NaiveDateTime>) -> DateTime<Utc> {
    dt.map(|dt| DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc))
        .unwrap_or_else(Utc::now)
}
