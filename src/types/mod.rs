//! Core data types: loan applications in, predictions out.

pub mod application;
pub mod prediction;

pub use application::{Education, LoanApplication, SelfEmployed};
pub use prediction::{ClassifierOutput, LoanStatus, Prediction, DECISION_THRESHOLD};
