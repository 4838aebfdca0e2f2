//! Dashboard analytics handlers
//!
//! Every view is computed at startup; these only serialize.

use axum::{extract::State, Json};

use crate::models::views::{
    AgeDistribution, AlcoholStats, BmiStats, CognitiveStats, CorrelationDiagnosis,
    DiagnosisCounts, EducationVsDiagnosis, GroupMeans, RadarData, Summary,
};
use crate::AppState;

pub async fn summary(State(state): State<AppState>) -> Json<Summary> {
    Json(state.dashboard.summary.clone())
}

pub async fn diagnosis_counts(State(state): State<AppState>) -> Json<DiagnosisCounts> {
    Json(state.dashboard.diagnosis_counts.clone())
}

pub async fn age_distribution(State(state): State<AppState>) -> Json<AgeDistribution> {
    Json(state.dashboard.age_distribution.clone())
}

pub async fn bmi_stats(State(state): State<AppState>) -> Json<BmiStats> {
    Json(state.dashboard.bmi_stats.clone())
}

pub async fn education_vs_diagnosis(State(state): State<AppState>) -> Json<EducationVsDiagnosis> {
    Json(state.dashboard.education_vs_diagnosis.clone())
}

pub async fn smoking_by_diag(State(state): State<AppState>) -> Json<GroupMeans> {
    Json(state.dashboard.smoking_by_diag.clone())
}

pub async fn alcohol_stats(State(state): State<AppState>) -> Json<AlcoholStats> {
    Json(state.dashboard.alcohol_stats.clone())
}

pub async fn activity_by_diag(State(state): State<AppState>) -> Json<GroupMeans> {
    Json(state.dashboard.activity_by_diag.clone())
}

pub async fn cognitive_stats(State(state): State<AppState>) -> Json<CognitiveStats> {
    Json(state.dashboard.cognitive_stats.clone())
}

pub async fn radar_data(State(state): State<AppState>) -> Json<RadarData> {
    Json(state.dashboard.radar_data.clone())
}

pub async fn correlation_diagnosis(State(state): State<AppState>) -> Json<CorrelationDiagnosis> {
    Json(state.dashboard.correlation_diagnosis.clone())
}
