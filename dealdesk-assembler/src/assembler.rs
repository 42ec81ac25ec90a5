//! Master Agreement and Addendum assemblers

use dealdesk_core::{
    AddendumInput, CompensationModel, EvaluationResult, ExhibitATerms, MasterInput,
};
use dealdesk_pack::RulePack;
use std::collections::HashMap;

use crate::template::substitute;

/// Addendum sections that deep-dive modules may inject into, rendered
/// in this fixed order.
const DEEP_DIVE_SECTIONS: [&str; 3] = ["section_5", "section_6", "section_7"];

/// Render the Master Agreement: straight field substitution into the
/// chassis, no conditional logic.
pub fn assemble_master(input: &MasterInput, pack: &RulePack) -> String {
    let mut values: HashMap<&str, String> = HashMap::new();
    values.insert("investor_name", input.investor_name.clone());
    values.insert("investor_email", input.investor_email.clone());
    values.insert("agent_name", input.agent_name.clone());
    values.insert("agent_email", input.agent_email.clone());
    values.insert("agent_license", input.agent_license.clone());
    values.insert("effective_date", input.effective_date.clone());
    substitute(&pack.templates.master_agreement, &values)
}

/// Render the State Addendum: location fields, the four clause-category
/// blocks, the state-specific provisions block, and the Exhibit A terms.
/// Missing clause ids or module content render as empty, never an error.
pub fn assemble_addendum(
    input: &AddendumInput,
    evaluation: &EvaluationResult,
    terms: &ExhibitATerms,
    pack: &RulePack,
) -> String {
    let mut values: HashMap<&str, String> = HashMap::new();
    values.insert("property_address", input.property_address.clone());
    values.insert("property_state", input.property_state.clone());
    values.insert("property_zip", input.property_zip.clone());
    values.insert(
        "rule_id",
        evaluation.rule_id.clone().unwrap_or_default(),
    );

    // Categories B+H and C+G share contract sections; D+E+J render together.
    values.insert(
        "INSERT_CLAUSE_CATEGORY_A",
        clause_block(&["A"], evaluation, pack),
    );
    values.insert(
        "INSERT_CLAUSE_CATEGORY_B_H",
        clause_block(&["B", "H"], evaluation, pack),
    );
    values.insert(
        "INSERT_CLAUSE_CATEGORY_C_G",
        clause_block(&["C", "G"], evaluation, pack),
    );
    values.insert(
        "INSERT_CLAUSE_CATEGORY_D_E_J",
        clause_block(&["D", "E", "J"], evaluation, pack),
    );
    values.insert(
        "INSERT_DEEP_DIVE_MODULES",
        deep_dive_block(evaluation, pack),
    );

    values.insert(
        "compensation_model",
        terms
            .compensation_model
            .map(|m| m.to_string())
            .unwrap_or_default(),
    );
    values.insert("compensation_amount", compensation_amount(terms));
    values.insert(
        "transaction_type",
        terms.transaction_type.clone().unwrap_or_default(),
    );
    values.insert(
        "agreement_length_days",
        terms.agreement_length_days.to_string(),
    );
    values.insert(
        "termination_notice_days",
        terms.termination_notice_days.to_string(),
    );
    values.insert(
        "net_conversion_note",
        if terms.converted_from_net {
            "*Compensation was restructured from a net-spread basis to a flat fee to comply with the governing state's net-listing policy.*".to_string()
        } else {
            String::new()
        },
    );

    substitute(&pack.templates.addendum, &values)
}

/// Concatenate `**{title}:** {text}` for every selected clause id in the
/// given categories. Unknown clause ids are skipped, not errors.
fn clause_block(categories: &[&str], evaluation: &EvaluationResult, pack: &RulePack) -> String {
    let mut out = String::new();
    for category in categories {
        let Some(clause_ids) = evaluation.clauses.get(*category) else {
            continue;
        };
        for clause_id in clause_ids {
            let Some(clause) = pack.clause_bank.get(clause_id) else {
                tracing::debug!(clause_id = %clause_id, "Selected clause id not in bank, skipping");
                continue;
            };
            if !out.is_empty() {
                out.push_str("\n\n");
            }
            out.push_str("**");
            out.push_str(&clause.title);
            out.push_str(":** ");
            out.push_str(&clause.text);
        }
    }
    out
}

/// Concatenate the injections of every triggered deep-dive module, target
/// section by target section in fixed order; modules concatenate in
/// evaluation order within a section.
fn deep_dive_block(evaluation: &EvaluationResult, pack: &RulePack) -> String {
    let mut out = String::new();
    for section in DEEP_DIVE_SECTIONS {
        for module_id in &evaluation.deep_dive_modules {
            let Some(module) = pack.deep_dive_modules.get(module_id) else {
                continue;
            };
            for injection in &module.injections {
                if injection.target != section {
                    continue;
                }
                if !out.is_empty() {
                    out.push_str("\n\n");
                }
                out.push_str("### ");
                out.push_str(&injection.title);
                out.push_str("\n\n");
                out.push_str(&injection.content);
            }
        }
    }
    out
}

/// Human-readable compensation line for Exhibit A.
fn compensation_amount(terms: &ExhibitATerms) -> String {
    match terms.compensation_model {
        Some(CompensationModel::FlatFee) => match terms.flat_fee_amount {
            Some(amount) => format!("${:.2} flat fee", amount),
            None => "Flat fee to be agreed in writing".to_string(),
        },
        Some(CompensationModel::CommissionPct) => match terms.commission_pct {
            Some(pct) => format!("{}% of the transaction price", pct),
            None => "Commission percentage to be agreed in writing".to_string(),
        },
        Some(CompensationModel::NetSpread) => match terms.net_target {
            Some(target) => format!("Proceeds above a net target of ${:.2}", target),
            None => "Net-spread terms to be agreed in writing".to_string(),
        },
        None => String::new(),
    }
}
