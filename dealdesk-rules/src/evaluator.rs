//! The core decision engine
//!
//! Given jurisdiction, transaction, and investor facts, determines the
//! net-listing policy, enforces hard blocks, selects deep-dive modules,
//! and selects clause ids per category. The clause-category mapping is
//! deliberate legal policy expressed as code, not incidental structure.

use dealdesk_core::{EvaluationInput, EvaluationResult, NetPolicy};
use dealdesk_pack::RulePack;
use std::collections::BTreeMap;

use crate::overlay::{resolve_overlay, PHILA_OVERLAY};

pub const CLAUSE_A_AGENCY_STD: &str = "A_AGENCY_STD";
pub const CLAUSE_A_TRANS_BROKER: &str = "A_TRANS_BROKER";
pub const CLAUSE_B_NET_BANNED: &str = "B_NET_BANNED";
pub const CLAUSE_B_NET_RESTR: &str = "B_NET_RESTR";
pub const CLAUSE_B_NET_STD: &str = "B_NET_STD";
pub const CLAUSE_C_EQ_INT_STD: &str = "C_EQ_INT_STD";
pub const CLAUSE_E_LIST_REQ: &str = "E_LIST_REQ";
pub const CLAUSE_E_BROKER_ACK: &str = "E_BROKER_ACK";
pub const CLAUSE_G_NO_SELLER: &str = "G_NO_SELLER";
pub const CLAUSE_H_PAY_BROKER: &str = "H_PAY_BROKER";
pub const CLAUSE_J_PHL_LIC: &str = "J_PHL_LIC";

/// Evaluate the applicable legal rules for a deal.
///
/// Steps run in a fixed order: input validation (aggregating every
/// missing-field error), overlay resolution, net-policy lookup,
/// hard-block enforcement, deep-dive selection, rule-id composition,
/// clause selection. A blocked deal produces no partial rule selection.
pub fn evaluate_rules(input: &EvaluationInput, pack: &RulePack) -> EvaluationResult {
    let validation_errors = input.missing_required_fields();
    if !validation_errors.is_empty() {
        return EvaluationResult::invalid(validation_errors);
    }

    let state = input.governing_state.trim().to_ascii_uppercase();
    let overlay = resolve_overlay(&input.property_zip, pack).map(str::to_string);
    let net_policy = pack.net_policy_for(&state);

    // Hard blocks run before clause selection. The strictly-greater
    // comparison against the configured threshold is observed policy
    // (a threshold of 1 blocks at the second deal).
    for rule in &pack.hard_blocks {
        if rule.state == state
            && rule.investor_status == input.investor_status
            && input.deal_count_last_365 > rule.deal_count_threshold
        {
            tracing::warn!(
                rule_id = %rule.id,
                state = %state,
                deal_count = input.deal_count_last_365,
                "Deal refused by hard block"
            );
            return EvaluationResult::blocked(rule.message.clone(), net_policy, overlay);
        }
    }

    // Every module whose state trigger matches applies, in module-id order.
    let deep_dive_modules: Vec<String> = pack
        .deep_dive_modules
        .iter()
        .filter(|(_, module)| {
            module.trigger.trigger_type == "state" && module.trigger.value == state
        })
        .map(|(id, _)| id.clone())
        .collect();

    let mut rule_id = format!("{}_{}", state, input.transaction_type);
    if let Some(ref name) = overlay {
        rule_id.push('_');
        rule_id.push_str(name);
    }

    let net_clause = match net_policy {
        NetPolicy::Banned => CLAUSE_B_NET_BANNED,
        NetPolicy::Restricted => CLAUSE_B_NET_RESTR,
        NetPolicy::Allowed => CLAUSE_B_NET_STD,
    };

    let mut clauses: BTreeMap<String, Vec<String>> = BTreeMap::new();
    clauses.insert(
        "A".to_string(),
        vec![
            CLAUSE_A_AGENCY_STD.to_string(),
            CLAUSE_A_TRANS_BROKER.to_string(),
        ],
    );
    clauses.insert("B".to_string(), vec![net_clause.to_string()]);
    clauses.insert("C".to_string(), vec![CLAUSE_C_EQ_INT_STD.to_string()]);
    clauses.insert(
        "E".to_string(),
        vec![
            CLAUSE_E_LIST_REQ.to_string(),
            CLAUSE_E_BROKER_ACK.to_string(),
        ],
    );
    clauses.insert("G".to_string(), vec![CLAUSE_G_NO_SELLER.to_string()]);
    clauses.insert("H".to_string(), vec![CLAUSE_H_PAY_BROKER.to_string()]);
    clauses.insert(
        "J".to_string(),
        if overlay.as_deref() == Some(PHILA_OVERLAY) {
            vec![CLAUSE_J_PHL_LIC.to_string()]
        } else {
            Vec::new()
        },
    );

    tracing::debug!(
        rule_id = %rule_id,
        net_policy = %net_policy,
        overlay = ?overlay,
        modules = deep_dive_modules.len(),
        "Evaluated deal rules"
    );

    EvaluationResult {
        success: true,
        error: None,
        validation_errors: Vec::new(),
        rule_id: Some(rule_id),
        clauses,
        deep_dive_modules,
        overlay,
        net_policy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealdesk_core::InvestorStatus;

    fn pack() -> RulePack {
        RulePack::load_default().unwrap()
    }

    fn input(state: &str, zip: &str) -> EvaluationInput {
        EvaluationInput {
            governing_state: state.to_string(),
            property_zip: zip.to_string(),
            transaction_type: "ASSIGNMENT".to_string(),
            property_type: None,
            investor_status: InvestorStatus::Licensed,
            deal_count_last_365: 0,
        }
    }

    #[test]
    fn test_validation_errors_aggregate() {
        let result = evaluate_rules(&input("", ""), &pack());
        assert!(!result.success);
        assert_eq!(result.validation_errors.len(), 2);
        assert!(result.validation_errors[0].contains("governing_state"));
        assert!(result.validation_errors[1].contains("property_zip"));
        assert!(result.rule_id.is_none());
    }

    #[test]
    fn test_il_hard_block_at_two_deals() {
        let mut deal = input("IL", "60601");
        deal.investor_status = InvestorStatus::Unlicensed;
        deal.deal_count_last_365 = 2;
        let result = evaluate_rules(&deal, &pack());
        assert!(!result.success);
        let message = result.error.unwrap();
        assert!(message.contains("Illinois"));
        assert!(message.contains("license"));
        assert!(result.clauses.is_empty());
    }

    #[test]
    fn test_il_hard_block_boundary_passes_at_one() {
        let mut deal = input("IL", "60601");
        deal.investor_status = InvestorStatus::Unlicensed;
        deal.deal_count_last_365 = 1;
        let result = evaluate_rules(&deal, &pack());
        assert!(result.success);
    }

    #[test]
    fn test_licensed_il_investor_not_blocked() {
        let mut deal = input("IL", "60601");
        deal.deal_count_last_365 = 12;
        let result = evaluate_rules(&deal, &pack());
        assert!(result.success);
        assert_eq!(result.net_policy, NetPolicy::Banned);
        assert_eq!(result.clauses["B"], vec![CLAUSE_B_NET_BANNED.to_string()]);
    }

    #[test]
    fn test_rule_id_with_overlay_suffix() {
        let result = evaluate_rules(&input("PA", "19103"), &pack());
        assert!(result.success);
        assert_eq!(result.rule_id.as_deref(), Some("PA_ASSIGNMENT_PHILA"));
        assert_eq!(result.overlay.as_deref(), Some("PHILA"));
    }

    #[test]
    fn test_category_j_gated_on_phila_overlay() {
        let phila = evaluate_rules(&input("PA", "19103"), &pack());
        assert_eq!(phila.clauses["J"], vec![CLAUSE_J_PHL_LIC.to_string()]);

        let pittsburgh = evaluate_rules(&input("PA", "15213"), &pack());
        assert!(pittsburgh.clauses["J"].is_empty());
        assert!(pittsburgh.overlay.is_none());
    }

    #[test]
    fn test_nj_selects_both_deep_dive_modules() {
        let result = evaluate_rules(&input("NJ", "07030"), &pack());
        assert!(result.success);
        assert_eq!(
            result.deep_dive_modules,
            vec!["NJ_ATTORNEY_REVIEW".to_string(), "NJ_DEEP_DIVE".to_string()]
        );
        assert_eq!(result.net_policy, NetPolicy::Restricted);
        assert_eq!(result.clauses["B"], vec![CLAUSE_B_NET_RESTR.to_string()]);
    }

    #[test]
    fn test_state_without_module_contributes_none() {
        let result = evaluate_rules(&input("TX", "75201"), &pack());
        assert!(result.success);
        assert!(result.deep_dive_modules.is_empty());
        assert_eq!(result.net_policy, NetPolicy::Allowed);
    }

    #[test]
    fn test_fixed_categories_always_selected() {
        let result = evaluate_rules(&input("TX", "75201"), &pack());
        assert_eq!(
            result.clauses["A"],
            vec![
                CLAUSE_A_AGENCY_STD.to_string(),
                CLAUSE_A_TRANS_BROKER.to_string()
            ]
        );
        assert_eq!(result.clauses["C"], vec![CLAUSE_C_EQ_INT_STD.to_string()]);
        assert_eq!(
            result.clauses["E"],
            vec![
                CLAUSE_E_LIST_REQ.to_string(),
                CLAUSE_E_BROKER_ACK.to_string()
            ]
        );
        assert_eq!(result.clauses["G"], vec![CLAUSE_G_NO_SELLER.to_string()]);
        assert_eq!(result.clauses["H"], vec![CLAUSE_H_PAY_BROKER.to_string()]);
    }

    #[test]
    fn test_deterministic_across_calls() {
        let pack = pack();
        let deal = input("NJ", "19199");
        let first = evaluate_rules(&deal, &pack);
        let second = evaluate_rules(&deal, &pack);
        assert_eq!(first, second);
    }

    #[test]
    fn test_fixture_pack_substitution() {
        // The pack is injectable: tightening a threshold in a fixture pack
        // changes behavior without touching process-wide state.
        let mut fixture = pack();
        fixture.hard_blocks[0].deal_count_threshold = 0;
        let mut deal = input("IL", "60601");
        deal.investor_status = InvestorStatus::Unlicensed;
        deal.deal_count_last_365 = 1;
        let result = evaluate_rules(&deal, &fixture);
        assert!(!result.success);
        assert!(result.error.is_some());
    }
}
