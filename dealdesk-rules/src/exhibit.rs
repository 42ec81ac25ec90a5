//! Exhibit A term normalization

use dealdesk_core::{
    CompensationModel, EvaluationResult, ExhibitAInput, ExhibitAResult, ExhibitATerms, NetPolicy,
};

/// Default agreement length when the caller does not specify one.
pub const DEFAULT_AGREEMENT_LENGTH_DAYS: u32 = 180;
/// Default termination notice period.
pub const DEFAULT_TERMINATION_NOTICE_DAYS: u32 = 30;

/// Normalize the requested commercial terms against the evaluated net
/// policy.
///
/// A net-spread request under a banned net policy is silently rewritten
/// to a flat fee at the original net target (or the existing flat-fee
/// amount if no target was given); the net target is removed from the
/// output. Missing required fields populate `error` while the partial
/// terms are still returned — callers check `error` explicitly.
///
/// Only the minimal required-field check runs here; the full terms
/// schema carried by the pack is not enforced.
pub fn build_exhibit_a(input: &ExhibitAInput, evaluation: &EvaluationResult) -> ExhibitAResult {
    let mut terms = ExhibitATerms {
        compensation_model: input.compensation_model,
        flat_fee_amount: input.flat_fee_amount,
        commission_pct: input.commission_pct,
        net_target: input.net_target,
        transaction_type: input.transaction_type.clone(),
        buyer_side_commission: input.buyer_side_commission,
        seller_side_commission: input.seller_side_commission,
        agreement_length_days: input
            .agreement_length_days
            .unwrap_or(DEFAULT_AGREEMENT_LENGTH_DAYS),
        termination_notice_days: input
            .termination_notice_days
            .unwrap_or(DEFAULT_TERMINATION_NOTICE_DAYS),
        converted_from_net: false,
    };

    let mut converted = false;
    if evaluation.net_policy == NetPolicy::Banned
        && terms.compensation_model == Some(CompensationModel::NetSpread)
    {
        terms.flat_fee_amount = terms.net_target.or(terms.flat_fee_amount);
        terms.compensation_model = Some(CompensationModel::FlatFee);
        terms.net_target = None;
        terms.converted_from_net = true;
        converted = true;
        tracing::info!(
            flat_fee = ?terms.flat_fee_amount,
            "Rewrote net-spread compensation to flat fee under banned net policy"
        );
    }

    let mut missing = Vec::new();
    if terms.compensation_model.is_none() {
        missing.push("compensation_model");
    }
    if terms
        .transaction_type
        .as_deref()
        .map_or(true, |t| t.trim().is_empty())
    {
        missing.push("transaction_type");
    }
    let error = if missing.is_empty() {
        None
    } else {
        Some(format!(
            "Exhibit A terms missing required fields: {}",
            missing.join(", ")
        ))
    };

    ExhibitAResult {
        terms,
        converted,
        error,
    }
}
