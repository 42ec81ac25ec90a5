//! RSpec-style tests for the legal engine
//!
//! Uses describe/it-shaped nested modules over the engine library
//! directly, with rstest fixtures supplying the rule pack.

use dealdesk_core::{
    AgentFacts, CompensationModel, DealFacts, EvaluationInput, ExhibitAInput, InvestorFacts,
    InvestorStatus, NetPolicy, RenderInput,
};
use dealdesk_pack::RulePack;
use dealdesk_renderer::render_package;
use dealdesk_rules::{build_exhibit_a, evaluate_rules};
use rstest::{fixture, rstest};

#[fixture]
fn pack() -> RulePack {
    RulePack::load_default().expect("embedded pack must load")
}

fn licensed_input(state: &str, zip: &str) -> EvaluationInput {
    EvaluationInput {
        governing_state: state.to_string(),
        property_zip: zip.to_string(),
        transaction_type: "ASSIGNMENT".to_string(),
        property_type: None,
        investor_status: InvestorStatus::Licensed,
        deal_count_last_365: 0,
    }
}

mod rule_evaluation {
    use super::*;

    #[rstest]
    fn it_is_bit_identical_across_repeated_calls(pack: RulePack) {
        // describe "Rule evaluation"
        //   it "is deterministic for a fixed (input, pack)"
        let input = licensed_input("NJ", "19199");
        let first = serde_json::to_string(&evaluate_rules(&input, &pack)).unwrap();
        let second = serde_json::to_string(&evaluate_rules(&input, &pack)).unwrap();
        assert_eq!(first, second);
    }

    #[rstest]
    fn it_defaults_unlisted_states_to_allowed(pack: RulePack) {
        // context "when the state has no net policy entry"
        //   it "evaluates under the ALLOWED policy"
        let result = evaluate_rules(&licensed_input("TX", "75201"), &pack);
        assert!(result.success);
        assert_eq!(result.net_policy, NetPolicy::Allowed);
    }

    #[rstest]
    fn it_composes_the_rule_id_from_state_transaction_and_overlay(pack: RulePack) {
        let with_overlay = evaluate_rules(&licensed_input("PA", "19103"), &pack);
        assert_eq!(with_overlay.rule_id.as_deref(), Some("PA_ASSIGNMENT_PHILA"));

        let without_overlay = evaluate_rules(&licensed_input("PA", "15213"), &pack);
        assert_eq!(without_overlay.rule_id.as_deref(), Some("PA_ASSIGNMENT"));
    }
}

mod exhibit_a {
    use super::*;

    #[rstest]
    fn it_coerces_net_spread_to_flat_fee_when_banned(pack: RulePack) {
        // context "when the state bans net listings"
        //   it "rewrites the structure instead of rejecting it"
        let evaluation = evaluate_rules(&licensed_input("GA", "30301"), &pack);
        assert_eq!(evaluation.net_policy, NetPolicy::Banned);

        let input = ExhibitAInput {
            compensation_model: Some(CompensationModel::NetSpread),
            net_target: Some(10_000.0),
            transaction_type: Some("ASSIGNMENT".to_string()),
            ..Default::default()
        };
        let result = build_exhibit_a(&input, &evaluation);
        assert!(result.error.is_none());
        assert_eq!(
            result.terms.compensation_model,
            Some(CompensationModel::FlatFee)
        );
        assert_eq!(result.terms.flat_fee_amount, Some(10_000.0));
        assert!(result.terms.net_target.is_none());
        assert!(result.terms.converted_from_net);
    }

    #[rstest]
    fn it_passes_net_spread_through_when_allowed(pack: RulePack) {
        let evaluation = evaluate_rules(&licensed_input("TX", "75201"), &pack);
        let input = ExhibitAInput {
            compensation_model: Some(CompensationModel::NetSpread),
            net_target: Some(10_000.0),
            transaction_type: Some("ASSIGNMENT".to_string()),
            ..Default::default()
        };
        let result = build_exhibit_a(&input, &evaluation);
        assert!(!result.converted);
        assert_eq!(
            result.terms.compensation_model,
            Some(CompensationModel::NetSpread)
        );
    }
}

mod package_rendering {
    use super::*;

    fn render_input(state: &str, zip: &str) -> RenderInput {
        RenderInput {
            deal: DealFacts {
                governing_state: state.to_string(),
                property_zip: zip.to_string(),
                property_address: "1 Test Way".to_string(),
                property_type: None,
                transaction_type: "ASSIGNMENT".to_string(),
            },
            investor: InvestorFacts {
                name: "Ada Buyer".to_string(),
                email: "ada@example.com".to_string(),
                status: InvestorStatus::Licensed,
                deal_count_last_365: 0,
            },
            agent: AgentFacts {
                name: "Grace Agent".to_string(),
                email: "grace@example.com".to_string(),
                license_number: "LIC-1".to_string(),
            },
            terms: ExhibitAInput {
                compensation_model: Some(CompensationModel::FlatFee),
                flat_fee_amount: Some(5_000.0),
                transaction_type: Some("ASSIGNMENT".to_string()),
                ..Default::default()
            },
            effective_date: None,
        }
    }

    #[rstest]
    fn it_includes_philadelphia_provisions_for_phila_deals(pack: RulePack) {
        // context "when the ZIP resolves to the PHILA overlay"
        //   it "renders the city activity license clause"
        let result = render_package(&render_input("PA", "19103"), &pack);
        assert!(result.success);
        let addendum = result.addendum_md.unwrap();
        assert!(addendum.contains("Philadelphia Activity License"));
        assert!(addendum.contains("Pennsylvania RELRA Compliance"));
    }

    #[rstest]
    fn it_omits_city_provisions_outside_the_overlay(pack: RulePack) {
        let result = render_package(&render_input("PA", "15213"), &pack);
        assert!(result.success);
        let addendum = result.addendum_md.unwrap();
        assert!(!addendum.contains("Philadelphia Activity License"));
    }

    #[rstest]
    fn it_renders_nj_attorney_review_after_licensing_conditions(pack: RulePack) {
        let result = render_package(&render_input("NJ", "07030"), &pack);
        assert!(result.success);
        let addendum = result.addendum_md.unwrap();
        let licensing = addendum
            .find("New Jersey Licensing and Net Listing Conditions")
            .unwrap();
        let attorney = addendum.find("Attorney Review Period").unwrap();
        assert!(licensing < attorney);
    }
}
