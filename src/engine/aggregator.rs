use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};

use crate::engine::errors::AggregationError;
use crate::engine::schema::validate_document;
use crate::models::{
    place_of_service_code, AllowedAmount, BillingClass, ClaimRecord, MrfDocument, OutOfNetworkItem, Payment,
    ProviderPayment, ReportingEntity, Tin, TinType, DATE_FORMAT
};
use crate::types::Monetary;

pub const BILLING_CODE_TYPE: &str = "CPT";
pub const MRF_VERSION: &str = "1.0.0";

/// Builds one out-of-network allowed amounts document from a batch of approved claims.
pub struct MrfAggregator {
    reporting_entity: ReportingEntity
}

impl MrfAggregator {
    pub fn new(reporting_entity: ReportingEntity) -> Self {
        Self { reporting_entity }
    }

    /// Groups claims by procedure, provider and place of service, averages the allowed
    /// amount of each group and validates the resulting document.
    ///
    /// `today` stamps `last_updated_on` and the billing code version, so the output is
    /// byte-for-byte reproducible for the same claims and date.
    ///
    /// # Errors
    /// - `NoClaims` if `claims` is empty.
    /// - `Overflow` if a group's allowed amounts cannot be summed.
    /// - `Validation` if the document breaks the schema; nothing is returned in that case.
    pub fn aggregate(&self, claims: &[ClaimRecord], today: NaiveDate) -> Result<MrfDocument, AggregationError> {
        if claims.is_empty() {
            return Err(AggregationError::NoClaims);
        }

        let billing_code_type_version = today.year().to_string();
        let out_of_network = group_claims(claims)
            .into_iter()
            .map(|group| line_item(&group, &billing_code_type_version))
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Aggregated {} claims into {} line items", claims.len(), out_of_network.len());

        let entity = &self.reporting_entity;
        let document = MrfDocument {
            reporting_entity_name: entity.name.clone(),
            reporting_entity_type: entity.entity_type.clone(),
            plan_name: entity.plan_name.clone(),
            plan_id_type: entity.plan_id_type,
            plan_id: entity.plan_id.clone(),
            plan_market_type: entity.plan_market_type,
            out_of_network,
            last_updated_on: today.format(DATE_FORMAT).to_string(),
            version: MRF_VERSION.to_string()
        };

        if let Err(error) = validate_document(&document) {
            warn!("{error}");
            return Err(error.into());
        }

        Ok(document)
    }
}

/// Claims sharing one `(procedure code, provider id, place of service)` key, in arrival order.
struct ClaimGroup<'a> {
    claims: Vec<&'a ClaimRecord>
}

impl ClaimGroup<'_> {
    fn representative(&self) -> &ClaimRecord {
        self.claims[0]
    }
}

fn group_claims(claims: &[ClaimRecord]) -> Vec<ClaimGroup<'_>> {
    let mut groups: Vec<ClaimGroup<'_>> = Vec::new();
    let mut positions: HashMap<(&str, &str, &str), usize> = HashMap::new();

    for claim in claims {
        let key = (claim.procedure_code.as_str(), claim.provider_id.as_str(), claim.place_of_service.as_str());

        let position = *positions.entry(key).or_insert_with(|| {
            groups.push(ClaimGroup { claims: Vec::new() });
            groups.len() - 1
        });

        groups[position].claims.push(claim);
    }

    groups
}

fn line_item(group: &ClaimGroup<'_>, billing_code_type_version: &str) -> Result<OutOfNetworkItem, AggregationError> {
    let first = group.representative();
    let allowed: Vec<Monetary> = group.claims.iter().map(|claim| claim.allowed.clone()).collect();
    let allowed_amount = Monetary::mean(&allowed).ok_or_else(|| AggregationError::Overflow {
        procedure_code: first.procedure_code.clone(),
        provider_id: first.provider_id.clone()
    })?;

    Ok(OutOfNetworkItem {
        name: format!("{} - {}", first.procedure_code, first.provider_name),
        billing_code_type: BILLING_CODE_TYPE.to_string(),
        billing_code: first.procedure_code.clone(),
        billing_code_type_version: billing_code_type_version.to_string(),
        description: format!("Healthcare service provided at {}", first.place_of_service),
        allowed_amounts: vec![AllowedAmount {
            tin: Tin {
                tin_type: TinType::Npi,
                value: first.provider_id.clone()
            },
            service_code: Some(vec![place_of_service_code(&first.place_of_service).to_string()]),
            billing_class: BillingClass::from_claim_type(&first.claim_type),
            payments: vec![Payment {
                allowed_amount,
                billing_code_modifier: None,
                providers: vec![ProviderPayment {
                    billed_charge: first.billed.clone(),
                    npi: vec![first.provider_id.clone()]
                }]
            }]
        }]
    })
}
