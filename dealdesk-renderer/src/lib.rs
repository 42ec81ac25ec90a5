//! Package Renderer
//!
//! Orchestrates rule evaluation, Exhibit A construction, and document
//! assembly into a single contract package. This is the outer error
//! boundary: every failure from a lower layer is converted into a
//! structured `RenderResult` failure; nothing propagates to the caller.

use chrono::Utc;
use dealdesk_core::{
    AddendumInput, EvaluationInput, MasterInput, RenderInput, RenderResult,
};
use dealdesk_pack::RulePack;
use dealdesk_rules::{build_exhibit_a, evaluate_rules};
use dealdesk_assembler::{assemble_addendum, assemble_master};

/// Separator placed between the Master Agreement and the Addendum in the
/// combined document.
const DOCUMENT_SEPARATOR: &str = "\n\n---\n\n";

/// Render the full contract package for a deal.
///
/// The pipeline is strictly sequential: evaluation must succeed before
/// Exhibit A building runs, and Exhibit A building must complete before
/// assembly runs. A failure at any stage yields a full failure with the
/// stage's error surfaced and no partial documents.
pub fn render_package(input: &RenderInput, pack: &RulePack) -> RenderResult {
    let eval_input = EvaluationInput {
        governing_state: input.deal.governing_state.clone(),
        property_zip: input.deal.property_zip.clone(),
        transaction_type: input.deal.transaction_type.clone(),
        property_type: input.deal.property_type.clone(),
        investor_status: input.investor.status,
        deal_count_last_365: input.investor.deal_count_last_365,
    };

    let evaluation = evaluate_rules(&eval_input, pack);
    if !evaluation.success {
        let message = match &evaluation.error {
            Some(error) => error.clone(),
            None if !evaluation.validation_errors.is_empty() => {
                evaluation.validation_errors.join("; ")
            }
            None => "rule evaluation failed".to_string(),
        };
        tracing::info!(state = %input.deal.governing_state, "Package render refused: {}", message);
        return RenderResult::failure(message, Some(evaluation));
    }

    let exhibit = build_exhibit_a(&input.terms, &evaluation);
    if let Some(error) = exhibit.error {
        tracing::info!("Package render refused: {}", error);
        return RenderResult::failure(error, Some(evaluation));
    }

    let effective_date = input
        .effective_date
        .unwrap_or_else(|| Utc::now().date_naive());

    let master_md = assemble_master(
        &MasterInput {
            investor_name: input.investor.name.clone(),
            investor_email: input.investor.email.clone(),
            agent_name: input.agent.name.clone(),
            agent_email: input.agent.email.clone(),
            agent_license: input.agent.license_number.clone(),
            effective_date: effective_date.to_string(),
        },
        pack,
    );

    let addendum_md = assemble_addendum(
        &AddendumInput {
            property_address: input.deal.property_address.clone(),
            property_state: input.deal.governing_state.trim().to_ascii_uppercase(),
            property_zip: input.deal.property_zip.clone(),
        },
        &evaluation,
        &exhibit.terms,
        pack,
    );

    let full_md = format!(
        "{}{}{}",
        master_md.trim_end(),
        DOCUMENT_SEPARATOR,
        addendum_md.trim_start()
    );

    let result = RenderResult::success(full_md, master_md, addendum_md, evaluation, exhibit.terms);
    tracing::info!(
        package_id = %result.package_id,
        rule_id = ?result.evaluation.as_ref().and_then(|e| e.rule_id.as_deref()),
        converted_from_net = exhibit.converted,
        "Rendered contract package"
    );
    result
}
