use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "result.ts")]
pub struct StudentResultsParams {
    pub institution_id: String,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "result.ts")]
pub struct SectionResultsParams {
    pub institution_id: String,
    pub section_id: String,
    pub subject_id: Option<String>,
    pub student_id: Option<String>,
}
