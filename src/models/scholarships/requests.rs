use rust_decimal::Decimal;
use serde::Deserialize;
use ts_rs::TS;

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "scholarship.ts")]
pub struct ScholarshipListParams {
    pub institution_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "scholarship.ts")]
pub struct CreateScholarshipRequest {
    pub institution_id: String,
    pub student_enrollment_id: String,
    #[ts(type = "string")]
    pub percentage: Decimal,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "scholarship.ts")]
pub struct UpdateScholarshipRequest {
    #[ts(type = "string | null")]
    pub percentage: Option<Decimal>,
    pub is_active: Option<bool>,
}
