//! Loan application data structures and input validation.

use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// Education level of the applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Education {
    Graduate,
    #[serde(rename = "Not Graduate", alias = "NotGraduate")]
    NotGraduate,
}

impl Education {
    /// Numeric encoding used by the trained classifier (Graduate = 0).
    pub fn code(&self) -> u8 {
        match self {
            Education::Graduate => 0,
            Education::NotGraduate => 1,
        }
    }
}

/// Self-employment status of the applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelfEmployed {
    Yes,
    No,
}

impl SelfEmployed {
    /// Numeric encoding used by the trained classifier (No = 0).
    pub fn code(&self) -> u8 {
        match self {
            SelfEmployed::No => 0,
            SelfEmployed::Yes => 1,
        }
    }
}

/// A raw loan application as received on the inference request boundary.
///
/// Assets arrive in one of two forms: a single pre-summed `total_asset`,
/// or the four separate components. Exactly one form must be present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanApplication {
    /// Number of dependents (non-negative)
    pub no_of_dependents: u32,

    /// Education level
    pub education: Education,

    /// Self-employment status
    pub self_employed: SelfEmployed,

    /// Annual income (currency units)
    pub income_annum: f64,

    /// Requested loan amount (currency units)
    pub loan_amount: f64,

    /// Loan term in years
    pub loan_term: u32,

    /// Credit score (300-900)
    pub credit_score: i32,

    /// Pre-summed total asset value, when the client sends one number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_asset: Option<f64>,

    /// Residential assets value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residential_assets_value: Option<f64>,

    /// Commercial assets value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commercial_assets_value: Option<f64>,

    /// Luxury assets value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub luxury_assets_value: Option<f64>,

    /// Bank assets value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_asset_value: Option<f64>,
}

const CREDIT_SCORE_MIN: i32 = 300;
const CREDIT_SCORE_MAX: i32 = 900;

impl LoanApplication {
    /// Validate every field before the feature transform runs.
    ///
    /// Negative or non-finite amounts are rejected, never coerced.
    pub fn validate(&self) -> Result<(), ServiceError> {
        check_amount("income_annum", self.income_annum)?;
        check_amount("loan_amount", self.loan_amount)?;
        if self.loan_amount <= 0.0 {
            return Err(ServiceError::Validation(
                "loan_amount must be positive".into(),
            ));
        }
        if self.loan_term == 0 {
            return Err(ServiceError::Validation("loan_term must be at least 1".into()));
        }
        if !(CREDIT_SCORE_MIN..=CREDIT_SCORE_MAX).contains(&self.credit_score) {
            return Err(ServiceError::Validation(format!(
                "credit_score must be between {} and {}, got {}",
                CREDIT_SCORE_MIN, CREDIT_SCORE_MAX, self.credit_score
            )));
        }
        for (name, value) in [
            ("total_asset", self.total_asset),
            ("residential_assets_value", self.residential_assets_value),
            ("commercial_assets_value", self.commercial_assets_value),
            ("luxury_assets_value", self.luxury_assets_value),
            ("bank_asset_value", self.bank_asset_value),
        ] {
            if let Some(v) = value {
                check_amount(name, v)?;
            }
        }
        self.total_assets()?;
        Ok(())
    }

    /// Resolve the total asset value from whichever form the client sent.
    ///
    /// The four-component sum is the canonical form; a lone pre-summed
    /// `total_asset` is accepted as-is. Sending both is ambiguous and rejected.
    pub fn total_assets(&self) -> Result<f64, ServiceError> {
        let components = [
            self.residential_assets_value,
            self.commercial_assets_value,
            self.luxury_assets_value,
            self.bank_asset_value,
        ];
        let present = components.iter().filter(|c| c.is_some()).count();

        match (self.total_asset, present) {
            (Some(_), 1..) => Err(ServiceError::Validation(
                "send either total_asset or the four asset components, not both".into(),
            )),
            (Some(total), 0) => Ok(total),
            (None, 4) => Ok(components.iter().map(|c| c.unwrap_or(0.0)).sum()),
            (None, 0) => Err(ServiceError::Validation(
                "asset values missing: send total_asset or all four components".into(),
            )),
            (None, _) => Err(ServiceError::Validation(
                "incomplete asset components: all four values are required".into(),
            )),
        }
    }
}

fn check_amount(name: &str, value: f64) -> Result<(), ServiceError> {
    if !value.is_finite() {
        return Err(ServiceError::Validation(format!(
            "{} must be a finite number",
            name
        )));
    }
    if value < 0.0 {
        return Err(ServiceError::Validation(format!(
            "{} must not be negative, got {}",
            name, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_application() -> LoanApplication {
        LoanApplication {
            no_of_dependents: 2,
            education: Education::Graduate,
            self_employed: SelfEmployed::No,
            income_annum: 5_000_000.0,
            loan_amount: 10_000_000.0,
            loan_term: 12,
            credit_score: 750,
            total_asset: None,
            residential_assets_value: Some(8_000_000.0),
            commercial_assets_value: Some(1_000_000.0),
            luxury_assets_value: Some(500_000.0),
            bank_asset_value: Some(2_000_000.0),
        }
    }

    #[test]
    fn test_valid_application_passes() {
        assert!(sample_application().validate().is_ok());
    }

    #[test]
    fn test_categorical_codes() {
        assert_eq!(Education::Graduate.code(), 0);
        assert_eq!(Education::NotGraduate.code(), 1);
        assert_eq!(SelfEmployed::No.code(), 0);
        assert_eq!(SelfEmployed::Yes.code(), 1);
    }

    #[test]
    fn test_education_wire_format_round_trip() {
        let json = serde_json::to_string(&Education::NotGraduate).unwrap();
        assert_eq!(json, "\"Not Graduate\"");
        let back: Education = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Education::NotGraduate);
        // The compact alias is accepted on input too
        let aliased: Education = serde_json::from_str("\"NotGraduate\"").unwrap();
        assert_eq!(aliased, Education::NotGraduate);
    }

    #[test]
    fn test_negative_income_rejected() {
        let mut app = sample_application();
        app.income_annum = -1.0;
        let err = app.validate().unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn test_non_finite_amount_rejected() {
        let mut app = sample_application();
        app.loan_amount = f64::NAN;
        assert!(app.validate().is_err());
        app.loan_amount = f64::INFINITY;
        assert!(app.validate().is_err());
    }

    #[test]
    fn test_zero_income_is_valid() {
        let mut app = sample_application();
        app.income_annum = 0.0;
        assert!(app.validate().is_ok());
    }

    #[test]
    fn test_credit_score_bounds() {
        let mut app = sample_application();
        app.credit_score = 299;
        assert!(app.validate().is_err());
        app.credit_score = 901;
        assert!(app.validate().is_err());
        app.credit_score = 300;
        assert!(app.validate().is_ok());
        app.credit_score = 900;
        assert!(app.validate().is_ok());
    }

    #[test]
    fn test_presummed_total_asset_accepted() {
        let mut app = sample_application();
        app.residential_assets_value = None;
        app.commercial_assets_value = None;
        app.luxury_assets_value = None;
        app.bank_asset_value = None;
        app.total_asset = Some(11_500_000.0);
        assert_eq!(app.total_assets().unwrap(), 11_500_000.0);
    }

    #[test]
    fn test_component_sum() {
        let app = sample_application();
        assert_eq!(app.total_assets().unwrap(), 11_500_000.0);
    }

    #[test]
    fn test_both_asset_forms_rejected() {
        let mut app = sample_application();
        app.total_asset = Some(11_500_000.0);
        assert!(matches!(
            app.total_assets(),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn test_total_with_partial_components_rejected() {
        let mut app = sample_application();
        app.total_asset = Some(11_500_000.0);
        app.commercial_assets_value = None;
        app.luxury_assets_value = None;
        app.bank_asset_value = None;
        assert!(matches!(
            app.total_assets(),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn test_partial_components_rejected() {
        let mut app = sample_application();
        app.bank_asset_value = None;
        assert!(app.validate().is_err());
    }

    #[test]
    fn test_missing_assets_rejected() {
        let mut app = sample_application();
        app.residential_assets_value = None;
        app.commercial_assets_value = None;
        app.luxury_assets_value = None;
        app.bank_asset_value = None;
        assert!(app.validate().is_err());
    }

    #[test]
    fn test_application_deserialization() {
        let json = serde_json::json!({
            "no_of_dependents": 2,
            "education": "Graduate",
            "self_employed": "No",
            "income_annum": 5000000,
            "loan_amount": 10000000,
            "loan_term": 12,
            "credit_score": 750,
            "residential_assets_value": 8000000,
            "commercial_assets_value": 1000000,
            "luxury_assets_value": 500000,
            "bank_asset_value": 2000000
        });
        let app: LoanApplication = serde_json::from_value(json).unwrap();
        assert_eq!(app.no_of_dependents, 2);
        assert_eq!(app.education, Education::Graduate);
        assert!(app.validate().is_ok());
    }
}
