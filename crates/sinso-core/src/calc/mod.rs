pub mod analysis;
pub mod engine;
pub mod outcome;

pub use engine::{primary_business, Calculator};
pub use outcome::{
    CalculationResult, Comment, DeductionDetail, RiskAnalysis, RiskLevel, Severity, Step, StepOp,
};
