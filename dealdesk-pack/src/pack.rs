//! Rule pack data model and loading

use dealdesk_core::{InvestorStatus, NetPolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::PackError;

/// Embedded default pack data, versioned alongside the source.
const PACK_CONFIG_JSON: &str = include_str!("../data/pack_config.json");
const CLAUSE_BANK_JSON: &str = include_str!("../data/clause_bank.json");
const DEEP_DIVE_MODULES_JSON: &str = include_str!("../data/deep_dive_modules.json");
const TERMS_SCHEMA_JSON: &str = include_str!("../data/terms_schema.json");
const MASTER_TEMPLATE_MD: &str = include_str!("../data/templates/master_agreement.md");
const ADDENDUM_TEMPLATE_MD: &str = include_str!("../data/templates/addendum.md");

/// A named regulatory prohibition. When a deal matches the bound state,
/// investor status, and exceeds the deal-count threshold, evaluation is
/// refused with the rule's message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardBlockRule {
    pub id: String,
    pub state: String,
    pub investor_status: InvestorStatus,
    /// Blocks when the trailing-365-day deal count is strictly greater
    /// than this value. The strict comparison is observed legal policy;
    /// do not change it without counsel sign-off.
    pub deal_count_threshold: u32,
    pub message: String,
}

/// One clause in the bank, keyed externally by clause id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    pub title: String,
    pub text: String,
}

/// What causes a deep-dive module to apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleTrigger {
    #[serde(rename = "type")]
    pub trigger_type: String,
    pub value: String,
}

/// A block of content a deep-dive module injects into a named addendum
/// section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Injection {
    pub target: String,
    pub title: String,
    pub content: String,
}

/// A per-state injected section bundle for the addendum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeepDiveModule {
    pub trigger: ModuleTrigger,
    pub injections: Vec<Injection>,
}

/// Document chassis templates with `{{placeholder}}` tokens and
/// `{{INSERT_*}}` markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Templates {
    pub master_agreement: String,
    pub addendum: String,
}

/// Top half of the pack: policy tables kept in one config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackConfig {
    version: String,
    governing_law_policy: String,
    net_policy_by_state: BTreeMap<String, NetPolicy>,
    hard_blocks: Vec<HardBlockRule>,
    city_overlay_map: BTreeMap<String, String>,
}

/// The fully-loaded, immutable rule pack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulePack {
    pub version: String,
    /// Fixed to `PROPERTY_STATE`: the agreement is governed by the
    /// property's state, not configurable per call.
    pub governing_law_policy: String,
    pub net_policy_by_state: BTreeMap<String, NetPolicy>,
    pub hard_blocks: Vec<HardBlockRule>,
    pub city_overlay_map: BTreeMap<String, String>,
    pub clause_bank: BTreeMap<String, Clause>,
    pub deep_dive_modules: BTreeMap<String, DeepDiveModule>,
    pub templates: Templates,
    /// JSON-schema shape of valid Exhibit A terms. Loaded and exposed for
    /// callers; the Exhibit A builder itself only checks required fields.
    pub terms_schema: serde_json::Value,
}

impl RulePack {
    /// Load the embedded default pack. Safe to call repeatedly; every call
    /// parses the same embedded data and yields value-equal content.
    pub fn load_default() -> Result<Self, PackError> {
        let pack = Self::from_strings(
            "pack_config.json",
            PACK_CONFIG_JSON,
            CLAUSE_BANK_JSON,
            DEEP_DIVE_MODULES_JSON,
            TERMS_SCHEMA_JSON,
            MASTER_TEMPLATE_MD.to_string(),
            ADDENDUM_TEMPLATE_MD.to_string(),
        )?;
        tracing::debug!(version = %pack.version, "Loaded embedded rule pack");
        Ok(pack)
    }

    /// Load a pack from a versioned directory of data files. The file set
    /// and field names match the embedded pack exactly.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self, PackError> {
        let dir = dir.as_ref();
        let read = |name: &str| -> Result<String, PackError> {
            let path = dir.join(name);
            if !path.exists() {
                return Err(PackError::MissingFile(path.display().to_string()));
            }
            std::fs::read_to_string(&path).map_err(|source| PackError::Io {
                file: path.display().to_string(),
                source,
            })
        };

        let config = read("pack_config.json")?;
        let clause_bank = read("clause_bank.json")?;
        let deep_dives = read("deep_dive_modules.json")?;
        let terms_schema = read("terms_schema.json")?;
        let master = read("templates/master_agreement.md")?;
        let addendum = read("templates/addendum.md")?;

        let pack = Self::from_strings(
            "pack_config.json",
            &config,
            &clause_bank,
            &deep_dives,
            &terms_schema,
            master,
            addendum,
        )?;
        tracing::info!(version = %pack.version, dir = %dir.display(), "Loaded rule pack from directory");
        Ok(pack)
    }

    fn from_strings(
        config_name: &str,
        config_json: &str,
        clause_bank_json: &str,
        deep_dives_json: &str,
        terms_schema_json: &str,
        master_template: String,
        addendum_template: String,
    ) -> Result<Self, PackError> {
        let config: PackConfig =
            serde_json::from_str(config_json).map_err(|source| PackError::Parse {
                file: config_name.to_string(),
                source,
            })?;
        let clause_bank: BTreeMap<String, Clause> =
            serde_json::from_str(clause_bank_json).map_err(|source| PackError::Parse {
                file: "clause_bank.json".to_string(),
                source,
            })?;
        let deep_dive_modules: BTreeMap<String, DeepDiveModule> =
            serde_json::from_str(deep_dives_json).map_err(|source| PackError::Parse {
                file: "deep_dive_modules.json".to_string(),
                source,
            })?;
        let terms_schema: serde_json::Value =
            serde_json::from_str(terms_schema_json).map_err(|source| PackError::Parse {
                file: "terms_schema.json".to_string(),
                source,
            })?;

        let pack = Self {
            version: config.version,
            governing_law_policy: config.governing_law_policy,
            net_policy_by_state: config.net_policy_by_state,
            hard_blocks: config.hard_blocks,
            city_overlay_map: config.city_overlay_map,
            clause_bank,
            deep_dive_modules,
            templates: Templates {
                master_agreement: master_template,
                addendum: addendum_template,
            },
            terms_schema,
        };
        pack.validate()?;
        Ok(pack)
    }

    /// Net-listing policy for a state; absent states are allowed.
    pub fn net_policy_for(&self, state: &str) -> NetPolicy {
        self.net_policy_by_state
            .get(state)
            .copied()
            .unwrap_or_default()
    }

    /// Fail fast on a structurally unusable pack so evaluation never runs
    /// against partial data.
    pub fn validate(&self) -> Result<(), PackError> {
        if self.version.trim().is_empty() {
            return Err(PackError::Invalid("pack version is empty".to_string()));
        }
        if self.governing_law_policy != "PROPERTY_STATE" {
            return Err(PackError::Invalid(format!(
                "unsupported governingLawPolicy '{}', expected PROPERTY_STATE",
                self.governing_law_policy
            )));
        }
        if self.clause_bank.is_empty() {
            return Err(PackError::Invalid("clause bank is empty".to_string()));
        }
        if self.templates.master_agreement.trim().is_empty() {
            return Err(PackError::Invalid(
                "master agreement template is empty".to_string(),
            ));
        }
        if self.templates.addendum.trim().is_empty() {
            return Err(PackError::Invalid("addendum template is empty".to_string()));
        }
        if !self.terms_schema.is_object() {
            return Err(PackError::Invalid(
                "terms schema must be a JSON object".to_string(),
            ));
        }
        for state in self.net_policy_by_state.keys() {
            if state.len() != 2 || !state.chars().all(|c| c.is_ascii_uppercase()) {
                return Err(PackError::Invalid(format!(
                    "netPolicyByState key '{}' is not a 2-letter state code",
                    state
                )));
            }
        }
        for rule in &self.hard_blocks {
            if rule.id.trim().is_empty() || rule.message.trim().is_empty() {
                return Err(PackError::Invalid(format!(
                    "hard block rule '{}' is missing an id or message",
                    rule.id
                )));
            }
        }
        for (id, module) in &self.deep_dive_modules {
            if module.trigger.trigger_type != "state" {
                return Err(PackError::Invalid(format!(
                    "deep-dive module '{}' has unsupported trigger type '{}'",
                    id, module.trigger.trigger_type
                )));
            }
            if module.injections.is_empty() {
                return Err(PackError::Invalid(format!(
                    "deep-dive module '{}' has no injections",
                    id
                )));
            }
            for injection in &module.injections {
                if injection.target.trim().is_empty() {
                    return Err(PackError::Invalid(format!(
                        "deep-dive module '{}' has an injection with no target section",
                        id
                    )));
                }
            }
        }
        Ok(())
    }
}
