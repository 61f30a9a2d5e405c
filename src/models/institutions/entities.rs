use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_str_enum;

define_str_enum! {
    #[derive(TS)]
    #[ts(export, export_to = "institution.ts")]
    pub enum InstitutionType {
        PreCadet => "pre_cadet",
        Kindergarten => "kindergarten",
        PrimarySchool => "primary_school",
        HighSchool => "high_school",
        HigherSecondary => "higher_secondary",
        University => "university",
        Coaching => "coaching",
        Individual => "individual",
        Others => "others",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "institution.ts")]
pub struct Institution {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub short_code: Option<String>,
    pub address: Option<String>,
    pub institution_type: InstitutionType,
    pub is_active: bool,
    pub admin_id: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
