//! Feature extraction for loan approval model inference.
//!
//! This module maps raw applicant fields to the numeric feature vector the
//! trained classifier consumes. The transform must match the preprocessing
//! done at training time exactly: categorical encoding plus log1p on the
//! monetary amounts, in a fixed column order.

use serde_json::json;

use crate::error::ServiceError;
use crate::types::application::LoanApplication;

/// Training column names, in the order the classifier expects them.
pub const FEATURE_NAMES: [&str; 8] = [
    "no_of_dependents",
    "education",
    "self_employed",
    "income_annum",
    "loan_amount",
    "loan_term",
    "credit_score",
    "total_asset",
];

/// Numeric feature vector derived from a validated application.
///
/// Immutable once computed; the fields mirror the training columns.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pub dependents: f64,
    pub education_code: f64,
    pub self_employed_code: f64,
    pub log_income: f64,
    pub log_loan_amount: f64,
    pub loan_term: f64,
    pub credit_score: f64,
    pub log_total_assets: f64,
}

impl FeatureVector {
    /// Fixed-order array for the ONNX session, shape `[1, 8]`.
    pub fn to_vec(&self) -> Vec<f32> {
        vec![
            self.dependents as f32,
            self.education_code as f32,
            self.self_employed_code as f32,
            self.log_income as f32,
            self.log_loan_amount as f32,
            self.loan_term as f32,
            self.credit_score as f32,
            self.log_total_assets as f32,
        ]
    }

    /// JSON record keyed by training column names, for the remote
    /// endpoint contract.
    pub fn to_record(&self) -> serde_json::Value {
        json!({
            "no_of_dependents": self.dependents,
            "education": self.education_code,
            "self_employed": self.self_employed_code,
            "income_annum": self.log_income,
            "loan_amount": self.log_loan_amount,
            "loan_term": self.loan_term,
            "credit_score": self.credit_score,
            "total_asset": self.log_total_assets,
        })
    }
}

/// Transforms validated applications into model input features.
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Create a new feature extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract the feature vector from an application.
    ///
    /// Validation runs first; the transform is never applied to rejected
    /// input. All log transforms are `ln(x + 1)`, so a zero amount maps
    /// to 0.0 instead of a domain error.
    pub fn extract(&self, app: &LoanApplication) -> Result<FeatureVector, ServiceError> {
        app.validate()?;
        let total_assets = app.total_assets()?;

        Ok(FeatureVector {
            dependents: f64::from(app.no_of_dependents),
            education_code: f64::from(app.education.code()),
            self_employed_code: f64::from(app.self_employed.code()),
            log_income: app.income_annum.ln_1p(),
            log_loan_amount: app.loan_amount.ln_1p(),
            loan_term: f64::from(app.loan_term),
            credit_score: f64::from(app.credit_score),
            log_total_assets: total_assets.ln_1p(),
        })
    }

    /// Number of features produced.
    pub fn feature_count(&self) -> usize {
        FEATURE_NAMES.len()
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::application::{Education, SelfEmployed};

    fn application() -> LoanApplication {
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
    fn test_scenario_feature_vector() {
        let extractor = FeatureExtractor::new();
        let fv = extractor.extract(&application()).unwrap();

        assert_eq!(fv.dependents, 2.0);
        assert_eq!(fv.education_code, 0.0);
        assert_eq!(fv.self_employed_code, 0.0);
        assert!((fv.log_income - 5_000_001.0_f64.ln()).abs() < 1e-12);
        assert!((fv.log_loan_amount - 10_000_001.0_f64.ln()).abs() < 1e-12);
        assert_eq!(fv.loan_term, 12.0);
        assert_eq!(fv.credit_score, 750.0);
        assert!((fv.log_total_assets - 11_500_001.0_f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_vector_order_matches_training_columns() {
        let extractor = FeatureExtractor::new();
        let fv = extractor.extract(&application()).unwrap();
        let v = fv.to_vec();

        assert_eq!(v.len(), extractor.feature_count());
        assert_eq!(v[0], 2.0);
        assert_eq!(v[1], 0.0);
        assert_eq!(v[2], 0.0);
        assert_eq!(v[5], 12.0);
        assert_eq!(v[6], 750.0);
    }

    #[test]
    fn test_zero_income_maps_to_zero() {
        let mut app = application();
        app.income_annum = 0.0;
        let fv = FeatureExtractor::new().extract(&app).unwrap();
        assert_eq!(fv.log_income, 0.0);
    }

    #[test]
    fn test_log_income_is_monotonic() {
        let extractor = FeatureExtractor::new();
        let mut prev = f64::MIN;
        for income in [0.0, 1.0, 100_000.0, 5_000_000.0, 50_000_000.0] {
            let mut app = application();
            app.income_annum = income;
            let fv = extractor.extract(&app).unwrap();
            assert!(fv.log_income > prev, "log_income not increasing at {}", income);
            prev = fv.log_income;
        }
    }

    #[test]
    fn test_codes_are_binary() {
        let extractor = FeatureExtractor::new();
        for education in [Education::Graduate, Education::NotGraduate] {
            for self_employed in [SelfEmployed::Yes, SelfEmployed::No] {
                let mut app = application();
                app.education = education;
                app.self_employed = self_employed;
                let fv = extractor.extract(&app).unwrap();
                assert!(fv.education_code == 0.0 || fv.education_code == 1.0);
                assert!(fv.self_employed_code == 0.0 || fv.self_employed_code == 1.0);
            }
        }
    }

    #[test]
    fn test_negative_income_never_reaches_transform() {
        let mut app = application();
        app.income_annum = -100.0;
        let err = FeatureExtractor::new().extract(&app).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn test_presummed_and_component_assets_agree() {
        let extractor = FeatureExtractor::new();
        let from_components = extractor.extract(&application()).unwrap();

        let mut app = application();
        app.residential_assets_value = None;
        app.commercial_assets_value = None;
        app.luxury_assets_value = None;
        app.bank_asset_value = None;
        app.total_asset = Some(11_500_000.0);
        let from_total = extractor.extract(&app).unwrap();

        assert_eq!(from_components, from_total);
    }

    #[test]
    fn test_record_uses_training_column_names() {
        let fv = FeatureExtractor::new().extract(&application()).unwrap();
        let record = fv.to_record();
        for name in FEATURE_NAMES {
            assert!(record.get(name).is_some(), "missing column {}", name);
        }
        assert_eq!(record["credit_score"], 750.0);
    }
}
