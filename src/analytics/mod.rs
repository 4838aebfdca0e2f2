//! Analytics Module - cohort dashboard over the patient dataset
//!
//! The table is loaded once and every view is computed up front into a
//! `Dashboard`. Handlers only ever read the finished views.

pub mod stats;
pub mod table;
pub mod views;

pub use table::{ColumnKind, DatasetError, PatientTable};

use crate::models::views::{
    AgeDistribution, AlcoholStats, BmiStats, CognitiveStats, CorrelationDiagnosis,
    DiagnosisCounts, EducationVsDiagnosis, GroupMeans, RadarData, Summary,
};

/// Every dashboard view, precomputed from one table snapshot.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub summary: Summary,
    pub diagnosis_counts: DiagnosisCounts,
    pub age_distribution: AgeDistribution,
    pub bmi_stats: BmiStats,
    pub education_vs_diagnosis: EducationVsDiagnosis,
    pub smoking_by_diag: GroupMeans,
    pub alcohol_stats: AlcoholStats,
    pub activity_by_diag: GroupMeans,
    pub cognitive_stats: CognitiveStats,
    pub radar_data: RadarData,
    pub correlation_diagnosis: CorrelationDiagnosis,
}

impl Dashboard {
    pub fn build(table: &PatientTable) -> Result<Self, DatasetError> {
        let start = std::time::Instant::now();

        let dashboard = Self {
            summary: views::summary(table)?,
            diagnosis_counts: views::diagnosis_counts(table),
            age_distribution: views::age_distribution(table)?,
            bmi_stats: views::bmi_stats(table)?,
            education_vs_diagnosis: views::education_vs_diagnosis(table)?,
            smoking_by_diag: views::smoking_by_diag(table)?,
            alcohol_stats: views::alcohol_stats(table)?,
            activity_by_diag: views::activity_by_diag(table)?,
            cognitive_stats: views::cognitive_stats(table)?,
            radar_data: views::radar_data(table),
            correlation_diagnosis: views::correlation_diagnosis(table)?,
        };

        tracing::info!(
            "Dashboard views computed for {} patients in {:?}",
            table.len(),
            start.elapsed()
        );

        Ok(dashboard)
    }

    pub fn patient_count(&self) -> usize {
        self.summary.total
    }
}
