use std::collections::HashMap;
use std::sync::Arc;

use domain::error::Result;
use domain::routing::RoutingRuleRepository;
use domain::vehicle::VehicleStatus;
use domain::zone::ZoneRepository;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// One vehicle in a routing batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plate: Option<String>,
    pub tag_code: String,
    pub status: VehicleStatus,
}

/// Batch request: route these vehicles inside one yard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingBatchRequest {
    pub yard_id: Uuid,
    pub items: Vec<RoutingItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingSuggestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plate: Option<String>,
    pub tag_code: String,
    pub status: VehicleStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_name: Option<String>,
    pub justification: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingBatchResponse {
    pub yard_id: Uuid,
    pub suggestions: Vec<RoutingSuggestion>,
}

/// Routes a batch of vehicles to suggested zones by status.
///
/// For each item the rule with the lowest priority value for
/// (yard, status) wins. Items are independent: the engine takes one
/// snapshot read of the yard's rules and zones per batch and evaluates
/// each item against it, so there is no cross-item state.
pub struct ZoneRoutingEngine {
    rules: Arc<dyn RoutingRuleRepository>,
    zones: Arc<dyn ZoneRepository>,
}

impl ZoneRoutingEngine {
    pub fn new(rules: Arc<dyn RoutingRuleRepository>, zones: Arc<dyn ZoneRepository>) -> Self {
        Self { rules, zones }
    }

    pub async fn suggest(&self, request: &RoutingBatchRequest) -> Result<RoutingBatchResponse> {
        let rules = self.rules.find_for_yard(request.yard_id).await?;
        let zone_names: HashMap<Uuid, String> = self
            .zones
            .find_for_yard(request.yard_id)
            .await?
            .into_iter()
            .map(|zone| (zone.id, zone.name))
            .collect();

        debug!(
            yard_id = %request.yard_id,
            rules = rules.len(),
            items = request.items.len(),
            "Routing batch"
        );

        let suggestions = request
            .items
            .iter()
            .map(|item| {
                // Lowest priority value wins; ties are undefined when the
                // (yard, status, priority) uniqueness invariant is violated
                // upstream.
                let best = rules
                    .iter()
                    .filter(|rule| rule.status == item.status)
                    .min_by_key(|rule| rule.priority);

                let mut suggestion = RoutingSuggestion {
                    plate: item.plate.as_ref().map(|p| p.to_uppercase()),
                    tag_code: item.tag_code.to_uppercase(),
                    status: item.status,
                    zone_id: None,
                    zone_name: None,
                    justification: String::new(),
                };

                match best {
                    None => {
                        suggestion.justification = format!(
                            "No rule configured for status {} in this yard. \
                             Configure a zone routing rule.",
                            item.status
                        );
                    }
                    Some(rule) => {
                        let zone_name = zone_names
                            .get(&rule.zone_id)
                            .cloned()
                            .unwrap_or_else(|| rule.zone_id.to_string());
                        suggestion.justification = format!(
                            "Rule: {} -> '{}' (priority {}).",
                            item.status, zone_name, rule.priority
                        );
                        suggestion.zone_id = Some(rule.zone_id);
                        suggestion.zone_name = Some(zone_name);
                    }
                }

                suggestion
            })
            .collect();

        Ok(RoutingBatchResponse {
            yard_id: request.yard_id,
            suggestions,
        })
    }
}
