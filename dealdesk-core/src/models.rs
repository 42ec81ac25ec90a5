//! Core domain models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::CoreError;

/// Per-state policy on net-listing compensation structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NetPolicy {
    Banned,
    Restricted,
    Allowed,
}

impl Default for NetPolicy {
    /// States absent from the policy table default to allowed.
    fn default() -> Self {
        NetPolicy::Allowed
    }
}

impl FromStr for NetPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BANNED" => Ok(NetPolicy::Banned),
            "RESTRICTED" => Ok(NetPolicy::Restricted),
            "ALLOWED" => Ok(NetPolicy::Allowed),
            other => Err(CoreError::InvalidNetPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for NetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NetPolicy::Banned => "BANNED",
            NetPolicy::Restricted => "RESTRICTED",
            NetPolicy::Allowed => "ALLOWED",
        };
        write!(f, "{}", s)
    }
}

/// Licensing status of the investor on a deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvestorStatus {
    Licensed,
    Unlicensed,
}

impl FromStr for InvestorStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LICENSED" => Ok(InvestorStatus::Licensed),
            "UNLICENSED" => Ok(InvestorStatus::Unlicensed),
            other => Err(CoreError::InvalidInvestorStatus(other.to_string())),
        }
    }
}

/// Commercial compensation structure for Exhibit A.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompensationModel {
    FlatFee,
    CommissionPct,
    NetSpread,
}

impl FromStr for CompensationModel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FLAT_FEE" => Ok(CompensationModel::FlatFee),
            "COMMISSION_PCT" => Ok(CompensationModel::CommissionPct),
            "NET_SPREAD" => Ok(CompensationModel::NetSpread),
            other => Err(CoreError::InvalidCompensationModel(other.to_string())),
        }
    }
}

impl fmt::Display for CompensationModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CompensationModel::FlatFee => "FLAT_FEE",
            CompensationModel::CommissionPct => "COMMISSION_PCT",
            CompensationModel::NetSpread => "NET_SPREAD",
        };
        write!(f, "{}", s)
    }
}

/// How a buy-side or sell-side commission is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommissionType {
    Percentage,
    Flat,
}

/// One side's commission terms (buyer or seller side).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideCommission {
    pub commission_type: CommissionType,
    pub amount: f64,
}

/// Deal facts the caller has already resolved before invoking the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationInput {
    /// Two-letter state code governing the agreement (the property's state).
    #[serde(default)]
    pub governing_state: String,
    /// Property ZIP code, used for local-jurisdiction overlay resolution.
    #[serde(default)]
    pub property_zip: String,
    /// Transaction type, e.g. ASSIGNMENT or DOUBLE_CLOSE.
    #[serde(default)]
    pub transaction_type: String,
    /// Optional property type, e.g. SFR or MULTI_FAMILY.
    pub property_type: Option<String>,
    /// Investor licensing status.
    pub investor_status: InvestorStatus,
    /// Number of deals the investor closed in the trailing 365 days.
    #[serde(default)]
    pub deal_count_last_365: u32,
}

impl EvaluationInput {
    /// Collect every missing required field, not just the first.
    pub fn missing_required_fields(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.governing_state.trim().is_empty() {
            errors.push("governing_state is required".to_string());
        }
        if self.property_zip.trim().is_empty() {
            errors.push("property_zip is required".to_string());
        }
        errors
    }
}

/// Result of rule evaluation for a deal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Whether evaluation produced a usable rule selection.
    pub success: bool,
    /// Terminal error (hard block) if evaluation was refused.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Missing-input errors, aggregated.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation_errors: Vec<String>,
    /// Composed rule id: `{state}_{transaction_type}[_{overlay}]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    /// Clause-category letter -> ordered clause ids. Categories are an
    /// open set; only the letters exercised by current rules appear.
    #[serde(default)]
    pub clauses: BTreeMap<String, Vec<String>>,
    /// Deep-dive module ids triggered by the governing state.
    #[serde(default)]
    pub deep_dive_modules: Vec<String>,
    /// Resolved local-jurisdiction overlay, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay: Option<String>,
    /// Net-listing policy for the governing state.
    #[serde(default)]
    pub net_policy: NetPolicy,
}

impl EvaluationResult {
    /// Evaluation refused because required inputs were missing.
    pub fn invalid(validation_errors: Vec<String>) -> Self {
        Self {
            success: false,
            error: None,
            validation_errors,
            rule_id: None,
            clauses: BTreeMap::new(),
            deep_dive_modules: Vec::new(),
            overlay: None,
            net_policy: NetPolicy::default(),
        }
    }

    /// Evaluation refused by a regulatory hard block. No partial rule
    /// selection is produced for a blocked deal.
    pub fn blocked(message: String, net_policy: NetPolicy, overlay: Option<String>) -> Self {
        Self {
            success: false,
            error: Some(message),
            validation_errors: Vec::new(),
            rule_id: None,
            clauses: BTreeMap::new(),
            deep_dive_modules: Vec::new(),
            overlay,
            net_policy,
        }
    }
}

/// Requested commercial terms, as supplied by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExhibitAInput {
    pub compensation_model: Option<CompensationModel>,
    pub flat_fee_amount: Option<f64>,
    pub commission_pct: Option<f64>,
    pub net_target: Option<f64>,
    pub transaction_type: Option<String>,
    pub buyer_side_commission: Option<SideCommission>,
    pub seller_side_commission: Option<SideCommission>,
    pub agreement_length_days: Option<u32>,
    pub termination_notice_days: Option<u32>,
}

/// Normalized commercial terms after policy enforcement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExhibitATerms {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compensation_model: Option<CompensationModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flat_fee_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commission_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_target: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_side_commission: Option<SideCommission>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_side_commission: Option<SideCommission>,
    pub agreement_length_days: u32,
    pub termination_notice_days: u32,
    /// Set when a requested net-spread structure was rewritten to a flat
    /// fee because the governing state bans net listings.
    pub converted_from_net: bool,
}

/// Outcome of Exhibit A construction. `error` is populated instead of
/// failing hard so callers can inspect the partial terms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExhibitAResult {
    pub terms: ExhibitATerms,
    pub converted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Investor facts supplied by the caller (already fetched upstream).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestorFacts {
    pub name: String,
    pub email: String,
    pub status: InvestorStatus,
    #[serde(default)]
    pub deal_count_last_365: u32,
}

/// Agent facts supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentFacts {
    pub name: String,
    pub email: String,
    pub license_number: String,
}

/// Property and transaction facts for a deal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealFacts {
    #[serde(default)]
    pub governing_state: String,
    #[serde(default)]
    pub property_zip: String,
    #[serde(default)]
    pub property_address: String,
    pub property_type: Option<String>,
    #[serde(default)]
    pub transaction_type: String,
}

/// Fields substituted into the Master Agreement chassis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterInput {
    pub investor_name: String,
    pub investor_email: String,
    pub agent_name: String,
    pub agent_email: String,
    pub agent_license: String,
    pub effective_date: String,
}

/// Property/location fields substituted into the Addendum chassis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddendumInput {
    pub property_address: String,
    pub property_state: String,
    pub property_zip: String,
}

/// Full input for rendering a contract package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderInput {
    pub deal: DealFacts,
    pub investor: InvestorFacts,
    pub agent: AgentFacts,
    #[serde(default)]
    pub terms: ExhibitAInput,
    /// Defaults to today when absent.
    pub effective_date: Option<NaiveDate>,
}

/// Rendered contract package plus all intermediate artifacts, kept for
/// persistence and audit by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation_errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_md: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master_md: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addendum_md: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<EvaluationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exhibit_a_terms: Option<ExhibitATerms>,
    /// Identifier for the rendered package.
    pub package_id: Uuid,
    /// When the package was rendered.
    pub generated_at: DateTime<Utc>,
}

impl RenderResult {
    pub fn success(
        full_md: String,
        master_md: String,
        addendum_md: String,
        evaluation: EvaluationResult,
        exhibit_a_terms: ExhibitATerms,
    ) -> Self {
        Self {
            success: true,
            error: None,
            validation_errors: Vec::new(),
            full_md: Some(full_md),
            master_md: Some(master_md),
            addendum_md: Some(addendum_md),
            evaluation: Some(evaluation),
            exhibit_a_terms: Some(exhibit_a_terms),
            package_id: Uuid::new_v4(),
            generated_at: Utc::now(),
        }
    }

    pub fn failure(error: String, evaluation: Option<EvaluationResult>) -> Self {
        let validation_errors = evaluation
            .as_ref()
            .map(|e| e.validation_errors.clone())
            .unwrap_or_default();
        Self {
            success: false,
            error: Some(error),
            validation_errors,
            full_md: None,
            master_md: None,
            addendum_md: None,
            evaluation,
            exhibit_a_terms: None,
            package_id: Uuid::new_v4(),
            generated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_net_policy_parse_and_default() {
        assert_eq!("BANNED".parse::<NetPolicy>().unwrap(), NetPolicy::Banned);
        assert_eq!(NetPolicy::default(), NetPolicy::Allowed);
        assert!("FORBIDDEN".parse::<NetPolicy>().is_err());
    }

    #[test]
    fn test_compensation_model_wire_format() {
        let json = serde_json::to_string(&CompensationModel::NetSpread).unwrap();
        assert_eq!(json, "\"NET_SPREAD\"");
        let back: CompensationModel = serde_json::from_str("\"FLAT_FEE\"").unwrap();
        assert_eq!(back, CompensationModel::FlatFee);
    }

    #[test]
    fn test_missing_required_fields_aggregates() {
        let input = EvaluationInput {
            governing_state: String::new(),
            property_zip: String::new(),
            transaction_type: "ASSIGNMENT".to_string(),
            property_type: None,
            investor_status: InvestorStatus::Licensed,
            deal_count_last_365: 0,
        };
        let errors = input.missing_required_fields();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("governing_state"));
        assert!(errors[1].contains("property_zip"));
    }

    #[test]
    fn test_render_result_failure_carries_validation_errors() {
        let eval = EvaluationResult::invalid(vec!["governing_state is required".into()]);
        let result = RenderResult::failure("validation failed".into(), Some(eval));
        assert!(!result.success);
        assert_eq!(result.validation_errors.len(), 1);
        assert!(result.full_md.is_none());
    }
}
