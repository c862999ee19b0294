use serde::Serialize;
use serde_json::Value;

use super::domain::{AssessmentInput, Questionnaire};

/// Why a questionnaire field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldProblem {
    Missing,
    NotNumeric,
    NotFinite,
    Negative,
    NotWholeNumber,
    NotBoolean,
}

impl FieldProblem {
    pub const fn describe(self) -> &'static str {
        match self {
            FieldProblem::Missing => "is required",
            FieldProblem::NotNumeric => "must be a number",
            FieldProblem::NotFinite => "must be a finite number",
            FieldProblem::Negative => "must not be negative",
            FieldProblem::NotWholeNumber => "must be a whole number",
            FieldProblem::NotBoolean => "must be true or false",
        }
    }
}

/// A single rejected field, reported back so the form can re-prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: &'static str,
    pub problem: FieldProblem,
}

/// Every problem found in a questionnaire, not just the first.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid questionnaire: {}", describe_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn fields(&self) -> Vec<&'static str> {
        self.issues.iter().map(|issue| issue.field).collect()
    }
}

fn describe_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("{} {}", issue.field, issue.problem.describe()))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Turns a partially filled questionnaire into a canonical `AssessmentInput`.
///
/// Farm size and experience are mandatory. Crop count and every flag are
/// optional and default to zero / `false`, so a progressively filled form can
/// be scored at any point.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuestionnaireNormalizer;

impl QuestionnaireNormalizer {
    pub fn normalize(
        &self,
        questionnaire: &Questionnaire,
    ) -> Result<AssessmentInput, ValidationError> {
        let mut issues = Vec::new();

        let farm_size_hectares = required_measure(
            "farm_size_hectares",
            questionnaire.farm_size_hectares.as_ref(),
            &mut issues,
        );
        let experience_years = required_measure(
            "experience_years",
            questionnaire.experience_years.as_ref(),
            &mut issues,
        );
        let crop_count = optional_count("crop_count", questionnaire.crop_count.as_ref(), &mut issues);

        let mut flag = |field: &'static str, raw: &Option<Value>| {
            optional_flag(field, raw.as_ref(), &mut issues)
        };
        let input = AssessmentInput {
            farm_size_hectares,
            experience_years,
            crop_count,
            has_previous_loans: flag("has_previous_loans", &questionnaire.has_previous_loans),
            has_bank_statements: flag("has_bank_statements", &questionnaire.has_bank_statements),
            has_financial_statements: flag(
                "has_financial_statements",
                &questionnaire.has_financial_statements,
            ),
            has_tax_returns: flag("has_tax_returns", &questionnaire.has_tax_returns),
            has_market_contracts: flag("has_market_contracts", &questionnaire.has_market_contracts),
            has_export_license: flag("has_export_license", &questionnaire.has_export_license),
            has_cooperative_membership: flag(
                "has_cooperative_membership",
                &questionnaire.has_cooperative_membership,
            ),
            has_direct_market_access: flag(
                "has_direct_market_access",
                &questionnaire.has_direct_market_access,
            ),
            has_irrigation: flag("has_irrigation", &questionnaire.has_irrigation),
            has_modern_equipment: flag("has_modern_equipment", &questionnaire.has_modern_equipment),
            has_precision_farming: flag(
                "has_precision_farming",
                &questionnaire.has_precision_farming,
            ),
            has_digital_tools: flag("has_digital_tools", &questionnaire.has_digital_tools),
            has_sustainable_practices: flag(
                "has_sustainable_practices",
                &questionnaire.has_sustainable_practices,
            ),
            has_crop_insurance: flag("has_crop_insurance", &questionnaire.has_crop_insurance),
            has_equipment_insurance: flag(
                "has_equipment_insurance",
                &questionnaire.has_equipment_insurance,
            ),
            has_liability_insurance: flag(
                "has_liability_insurance",
                &questionnaire.has_liability_insurance,
            ),
        };

        if issues.is_empty() {
            Ok(input)
        } else {
            Err(ValidationError { issues })
        }
    }
}

fn required_measure(
    field: &'static str,
    raw: Option<&Value>,
    issues: &mut Vec<FieldIssue>,
) -> f64 {
    match raw.map(parse_non_negative) {
        Some(Ok(value)) => value,
        Some(Err(problem)) => {
            issues.push(FieldIssue { field, problem });
            0.0
        }
        None => {
            issues.push(FieldIssue {
                field,
                problem: FieldProblem::Missing,
            });
            0.0
        }
    }
}

fn optional_count(field: &'static str, raw: Option<&Value>, issues: &mut Vec<FieldIssue>) -> u32 {
    let value = match raw.map(parse_non_negative) {
        None | Some(Err(FieldProblem::Missing)) => return 0,
        Some(Err(problem)) => {
            issues.push(FieldIssue { field, problem });
            return 0;
        }
        Some(Ok(value)) => value,
    };

    if value.fract() != 0.0 {
        issues.push(FieldIssue {
            field,
            problem: FieldProblem::NotWholeNumber,
        });
        return 0;
    }

    if value >= u32::MAX as f64 {
        u32::MAX
    } else {
        value as u32
    }
}

/// Unanswered flags read as `false`; form posts may send `"true"` / `"false"`.
fn optional_flag(field: &'static str, raw: Option<&Value>, issues: &mut Vec<FieldIssue>) -> bool {
    let parsed = match raw {
        None | Some(Value::Null) => Some(false),
        Some(Value::Bool(value)) => Some(*value),
        Some(Value::String(text)) => match text.trim().to_ascii_lowercase().as_str() {
            "" | "false" => Some(false),
            "true" => Some(true),
            _ => None,
        },
        Some(_) => None,
    };

    parsed.unwrap_or_else(|| {
        issues.push(FieldIssue {
            field,
            problem: FieldProblem::NotBoolean,
        });
        false
    })
}

/// Accepts JSON numbers and numeric strings (HTML forms post strings).
fn parse_non_negative(value: &Value) -> Result<f64, FieldProblem> {
    let number = match value {
        Value::Null => return Err(FieldProblem::Missing),
        Value::Number(number) => number.as_f64().ok_or(FieldProblem::NotNumeric)?,
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(FieldProblem::Missing);
            }
            trimmed
                .parse::<f64>()
                .map_err(|_| FieldProblem::NotNumeric)?
        }
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => {
            return Err(FieldProblem::NotNumeric)
        }
    };

    if !number.is_finite() {
        return Err(FieldProblem::NotFinite);
    }
    if number < 0.0 {
        return Err(FieldProblem::Negative);
    }

    // folds -0.0 into 0.0
    Ok(number.abs())
}
