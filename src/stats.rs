//! Read-only derived views over a user's schedules. Pure functions of the
//! fetched data; the handlers in `api` feed them whatever the store returns.

use serde::{Deserialize, Serialize};

use crate::models::{Schedule, Weekday};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub day: String,
    pub total_volume: f64,
    pub total_sets: i64,
    pub avg_weight: i64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeekSummary {
    pub week: String,
    pub total_volume: f64,
    pub workout_count: i64,
    pub average_intensity: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub total_workouts: i64,
    pub workout_change: String,
    pub total_volume: String,
    pub volume_change: String,
    pub avg_workout_duration: String,
    pub duration_change: String,
    pub weekly_frequency: String,
    pub frequency_change: String,
    pub avg_intensity: String,
    pub intensity_change: String,
    pub personal_records: i64,
    pub records_change: String,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Folds every workout into seven fixed Monday..Sunday buckets.
///
/// Volume accumulates across all workouts mapped to a day, but the set
/// count and average weight are overwritten by each workout processed, so
/// the last workout for a day determines them. Workouts whose day string
/// matches none of the seven names are skipped without error.
pub fn weekly_summary(schedules: &[Schedule]) -> Vec<DaySummary> {
    let mut summary: Vec<DaySummary> = Weekday::ALL
        .iter()
        .map(|day| DaySummary {
            day: day.as_str().to_string(),
            total_volume: 0.0,
            total_sets: 0,
            avg_weight: 0,
        })
        .collect();

    for schedule in schedules {
        for workout in &schedule.workouts {
            let day_index = match Weekday::from_str(&workout.day) {
                Ok(day) => day.index(),
                Err(_) => continue,
            };

            let mut day_total_weight = 0.0;
            let mut day_total_sets: i64 = 0;

            for exercise in &workout.exercises {
                for set in &exercise.sets {
                    let weight = set.weight.unwrap_or(0.0);
                    summary[day_index].total_volume += set.reps as f64 * weight;
                    day_total_weight += weight;
                    day_total_sets += 1;
                }
            }

            summary[day_index].total_sets = day_total_sets;
            summary[day_index].avg_weight = if day_total_sets > 0 {
                (day_total_weight / day_total_sets as f64).round() as i64
            } else {
                0
            };
        }
    }

    summary
}

/// Distributes schedules over four week buckets by `index % 4` rather than
/// calendar date. Volume and workout counts accumulate per bucket;
/// `average_intensity` is overwritten by each schedule processed, so the
/// last schedule mapped to a bucket determines it.
pub fn monthly_summary(schedules: &[Schedule]) -> Vec<WeekSummary> {
    let mut summary: Vec<WeekSummary> = (1..=4)
        .map(|week| WeekSummary {
            week: format!("Week {}", week),
            total_volume: 0.0,
            workout_count: 0,
            average_intensity: 0.0,
        })
        .collect();

    for (index, schedule) in schedules.iter().enumerate() {
        let week_index = index % 4;

        let mut week_total_volume = 0.0;
        let mut week_workout_count: i64 = 0;
        let mut week_total_sets: i64 = 0;

        for workout in &schedule.workouts {
            week_workout_count += 1;

            for exercise in &workout.exercises {
                for set in &exercise.sets {
                    let weight = set.weight.unwrap_or(0.0);
                    week_total_volume += set.reps as f64 * weight;
                    week_total_sets += 1;
                }
            }
        }

        summary[week_index].total_volume += week_total_volume;
        summary[week_index].workout_count += week_workout_count;
        summary[week_index].average_intensity = if week_total_sets > 0 {
            round1(week_total_volume / week_total_sets as f64)
        } else {
            0.0
        };
    }

    summary
}

/// Headline metrics folded over every set. Two minutes are assumed per set
/// for duration. The `*_change` fields are static display copy, not
/// computed from historical data.
pub fn performance_metrics(schedules: &[Schedule]) -> PerformanceMetrics {
    let total_workouts: i64 = schedules
        .iter()
        .map(|schedule| schedule.workouts.len() as i64)
        .sum();

    let mut total_volume = 0.0;
    let mut total_sets: i64 = 0;
    let mut total_duration: i64 = 0;

    for schedule in schedules {
        for workout in &schedule.workouts {
            for exercise in &workout.exercises {
                total_sets += exercise.sets.len() as i64;

                for set in &exercise.sets {
                    let weight = set.weight.unwrap_or(0.0);
                    total_volume += set.reps as f64 * weight;
                    total_duration += 2;
                }
            }
        }
    }

    let avg_duration = if total_workouts > 0 {
        (total_duration as f64 / total_workouts as f64).round() as i64
    } else {
        0
    };

    let weekly_frequency = ((total_workouts as f64 / 4.0).round() as i64).min(7);

    let avg_intensity = if total_sets > 0 {
        round1(total_volume / total_sets as f64)
    } else {
        0.0
    };

    PerformanceMetrics {
        total_workouts,
        workout_change: "+12%".to_string(),
        total_volume: format!("{}k lbs", (total_volume / 1000.0).round() as i64),
        volume_change: "+15%".to_string(),
        avg_workout_duration: format!("{} min", avg_duration),
        duration_change: "+5%".to_string(),
        weekly_frequency: format!("{} days", weekly_frequency),
        frequency_change: "+8%".to_string(),
        avg_intensity: format!("{} lbs", avg_intensity),
        intensity_change: "+10%".to_string(),
        personal_records: (total_workouts as f64 * 0.2).floor() as i64,
        records_change: "+20%".to_string(),
    }
}
