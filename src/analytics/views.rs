//! View builders - pure functions from the patient table to dashboard views

use std::collections::BTreeMap;

use super::stats::{self, round_to};
use super::table::{Column, DatasetError, PatientTable, DIAGNOSIS};
use crate::models::views::*;

/// Age histogram bins `[lo, hi)`
pub const AGE_BINS: [i64; 6] = [50, 60, 70, 80, 90, 100];

/// Fields summarised by `cognitive_stats`
pub const COGNITIVE_FIELDS: [&str; 8] = [
    "MMSE",
    "MemoryComplaints",
    "BehavioralProblems",
    "Confusion",
    "Disorientation",
    "Forgetfulness",
    "DifficultyCompletingTasks",
    "ADL",
];

/// First seven radar axes; the eighth depends on the dataset
pub const RADAR_FIELDS: [&str; 7] = [
    "MemoryComplaints",
    "BehavioralProblems",
    "Disorientation",
    "Confusion",
    "Forgetfulness",
    "DifficultyCompletingTasks",
    "PersonalityChanges",
];

pub fn summary(table: &PatientTable) -> Result<Summary, DatasetError> {
    let total = table.len();
    let diagnosis_counts = ByDiagnosis(
        table.groups().iter().map(|(code, rows)| (*code, rows.len())).collect(),
    );

    let dementia = diagnosis_counts.get(1).copied().unwrap_or(0);
    let percent_alzheimer = percent(dementia, total);

    let ages: Vec<f64> = table.numeric("Age")?.values().iter().flatten().copied().collect();

    let genders = table.numeric("Gender")?.values();
    let male = genders.iter().filter(|g| **g == Some(1.0)).count();
    let female = genders.iter().filter(|g| **g == Some(0.0)).count();

    Ok(Summary {
        total,
        diagnosis_counts,
        percent_alzheimer,
        mean_age: round_to(stats::mean(&ages), 2),
        gender_male: percent(male, male + female),
        gender_female: percent(female, male + female),
    })
}

pub fn diagnosis_counts(table: &PatientTable) -> DiagnosisCounts {
    let (labels, values) = table
        .groups()
        .iter()
        .map(|(code, rows)| (code.to_string(), rows.len()))
        .unzip();
    DiagnosisCounts { labels, values }
}

pub fn age_distribution(table: &PatientTable) -> Result<AgeDistribution, DatasetError> {
    let labels = AGE_BINS
        .windows(2)
        .map(|w| format!("{}-{}", w[0], w[1] - 1))
        .collect();
    let mut counts = vec![0usize; AGE_BINS.len() - 1];

    for age in table.numeric("Age")?.values().iter().flatten() {
        // Ages are truncated to whole years before binning
        let age = age.trunc() as i64;
        if let Some(i) = AGE_BINS.windows(2).position(|w| w[0] <= age && age < w[1]) {
            counts[i] += 1;
        }
    }

    Ok(AgeDistribution { labels, counts })
}

pub fn bmi_stats(table: &PatientTable) -> Result<BmiStats, DatasetError> {
    let bmi = table.numeric("BMI")?;
    Ok(per_group(table, |rows| {
        let values = table.present_values(bmi, rows);
        let sorted = stats::sorted(&values);
        SpreadStats {
            count: values.len(),
            mean: round_to(stats::mean(&values), 2),
            std: round_to(stats::std_dev(&values), 2),
            min: round_to(stats::min(&values), 2),
            q1: round_to(stats::quantile_sorted(&sorted, 0.25), 2),
            median: round_to(stats::quantile_sorted(&sorted, 0.5), 2),
            q3: round_to(stats::quantile_sorted(&sorted, 0.75), 2),
            max: round_to(stats::max(&values), 2),
        }
    }))
}

pub fn education_vs_diagnosis(table: &PatientTable) -> Result<EducationVsDiagnosis, DatasetError> {
    let education = table.numeric("EducationLevel")?;
    let diagnosis = table.numeric(DIAGNOSIS)?;

    // level -> (no dementia, dementia)
    let mut cells: BTreeMap<OrderedLevel, (usize, usize)> = BTreeMap::new();
    for (level, diag) in education.values().iter().zip(diagnosis.values()) {
        let Some(level) = level else { continue };
        let cell = cells.entry(OrderedLevel(*level)).or_default();
        match diag {
            Some(d) if *d == 0.0 => cell.0 += 1,
            Some(d) if *d == 1.0 => cell.1 += 1,
            _ => {}
        }
    }

    let labels = cells.keys().map(|l| education.format_value(l.0)).collect();
    let (no_dementia, dementia) = cells.values().copied().unzip();

    Ok(EducationVsDiagnosis { labels, no_dementia, dementia })
}

pub fn smoking_by_diag(table: &PatientTable) -> Result<GroupMeans, DatasetError> {
    group_means(table, "Smoking", 3)
}

pub fn activity_by_diag(table: &PatientTable) -> Result<GroupMeans, DatasetError> {
    group_means(table, "PhysicalActivity", 3)
}

pub fn alcohol_stats(table: &PatientTable) -> Result<AlcoholStats, DatasetError> {
    let alcohol = table.numeric("AlcoholConsumption")?;
    Ok(per_group(table, |rows| {
        let values = table.present_values(alcohol, rows);
        let (q1, median, q3) = stats::quartiles(&values);
        AlcoholSummary {
            median: round_to(median, 2),
            q1: round_to(q1, 2),
            q3: round_to(q3, 2),
            mean: round_to(stats::mean(&values), 2),
        }
    }))
}

pub fn cognitive_stats(table: &PatientTable) -> Result<CognitiveStats, DatasetError> {
    let columns = COGNITIVE_FIELDS
        .iter()
        .map(|name| table.numeric(name).map(|c| (*name, c)))
        .collect::<Result<Vec<(&'static str, &Column)>, _>>()?;

    Ok(per_group(table, |rows| {
        ByField(
            columns
                .iter()
                .map(|(name, column)| {
                    let values = table.present_values(column, rows);
                    let (q1, median, q3) = stats::quartiles(&values);
                    let summary = QuartileSummary {
                        mean: round_to(stats::mean(&values), 2),
                        q1: round_to(q1, 2),
                        median: round_to(median, 2),
                        q3: round_to(q3, 2),
                    };
                    (*name, summary)
                })
                .collect(),
        )
    }))
}

/// Radar axes for this dataset: `EmotionalDistress` replaces `ADL` when present
pub fn radar_fields(table: &PatientTable) -> Vec<&'static str> {
    let mut fields = RADAR_FIELDS.to_vec();
    fields.push(if table.has_column("EmotionalDistress") {
        "EmotionalDistress"
    } else {
        "ADL"
    });
    fields
}

pub fn radar_data(table: &PatientTable) -> RadarData {
    let fields = radar_fields(table);
    let columns: Vec<Option<&Column>> = fields
        .iter()
        .map(|f| table.column(f).filter(|c| c.kind.is_numeric()))
        .collect();

    let datasets = table
        .groups()
        .iter()
        .map(|(code, rows)| RadarDataset {
            label: code.to_string(),
            data: columns
                .iter()
                .map(|column| match column {
                    Some(column) => round_to(stats::mean(&table.present_values(column, rows)), 2),
                    None => 0.0,
                })
                .collect(),
        })
        .collect();

    RadarData {
        labels: fields.into_iter().map(String::from).collect(),
        datasets,
    }
}

pub fn correlation_diagnosis(table: &PatientTable) -> Result<CorrelationDiagnosis, DatasetError> {
    let diagnosis = table.numeric(DIAGNOSIS)?.values();

    let mut correlations: Vec<(String, f64)> = table
        .columns()
        .iter()
        .filter(|c| c.kind.is_numeric() && c.name != DIAGNOSIS)
        .filter_map(|column| {
            let pairs: Vec<(f64, f64)> = column
                .values()
                .iter()
                .zip(diagnosis)
                .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
                .collect();
            stats::pearson(&pairs).map(|r| (column.name.clone(), r))
        })
        .collect();

    // Stable: equal coefficients keep column order
    correlations.sort_by(|a, b| b.1.total_cmp(&a.1));

    let (features, values) = correlations
        .into_iter()
        .map(|(name, r)| (name, round_to(r, 3)))
        .unzip();

    Ok(CorrelationDiagnosis { features, values })
}

fn group_means(table: &PatientTable, field: &str, places: i32) -> Result<GroupMeans, DatasetError> {
    let column = table.numeric(field)?;
    Ok(per_group(table, |rows| {
        round_to(stats::mean(&table.present_values(column, rows)), places)
    }))
}

fn per_group<T>(table: &PatientTable, mut f: impl FnMut(&[usize]) -> T) -> ByDiagnosis<T> {
    ByDiagnosis(table.groups().iter().map(|(code, rows)| (*code, f(rows.as_slice()))).collect())
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round_to(100.0 * part as f64 / whole as f64, 2)
}

/// Total order over education levels
#[derive(Debug, Clone, Copy, PartialEq)]
struct OrderedLevel(f64);

impl Eq for OrderedLevel {}

impl PartialOrd for OrderedLevel {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedLevel {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}
