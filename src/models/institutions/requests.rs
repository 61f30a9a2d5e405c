use serde::Deserialize;
use ts_rs::TS;

use super::entities::InstitutionType;
use crate::models::ValidationErrors;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "institution.ts")]
pub struct CreateInstitutionRequest {
    pub name: String,
    pub description: Option<String>,
    pub short_code: Option<String>,
    pub address: Option<String>,
    pub institution_type: InstitutionType,
}

impl CreateInstitutionRequest {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.ensure(!self.name.trim().is_empty(), "name", "Name is required");
        errors.ensure(self.name.len() <= 255, "name", "Name is too long");
        if let Some(code) = &self.short_code {
            errors.ensure(
                !code.trim().is_empty() && code.len() <= 32,
                "short_code",
                "Short code must be 1-32 characters",
            );
        }
        errors
    }
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "institution.ts")]
pub struct UpdateInstitutionRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub short_code: Option<String>,
    pub address: Option<String>,
    pub institution_type: Option<InstitutionType>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_validation() {
        let req: CreateInstitutionRequest = serde_json::from_value(serde_json::json!({
            "name": " ",
            "short_code": "",
            "institution_type": "high_school"
        }))
        .unwrap();
        let errors = req.validate();
        assert!(errors.has("name"));
        assert!(errors.has("short_code"));
    }

    #[test]
    fn test_unknown_institution_type_rejected() {
        let result = serde_json::from_value::<CreateInstitutionRequest>(serde_json::json!({
            "name": "Dhaka Model School",
            "institution_type": "madrasa"
        }));
        assert!(result.is_err());
    }
}
