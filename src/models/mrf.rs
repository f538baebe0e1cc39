use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::models::{BillingClass, PlanIdType, PlanMarketType, TinType, DATE_FORMAT};
use crate::types::{Monetary, MrfFileId};

/// Identity of the organisation publishing the file.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ReportingEntity {
    pub name: String,
    pub entity_type: String,
    pub plan_name: Option<String>,
    pub plan_id_type: Option<PlanIdType>,
    pub plan_id: Option<String>,
    pub plan_market_type: Option<PlanMarketType>
}

/// An out-of-network allowed amounts file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MrfDocument {
    pub reporting_entity_name: String,
    pub reporting_entity_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_id_type: Option<PlanIdType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_market_type: Option<PlanMarketType>,
    pub out_of_network: Vec<OutOfNetworkItem>,
    pub last_updated_on: String,
    pub version: String
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutOfNetworkItem {
    pub name: String,
    pub billing_code_type: String,
    pub billing_code: String,
    pub billing_code_type_version: String,
    pub description: String,
    pub allowed_amounts: Vec<AllowedAmount>
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllowedAmount {
    pub tin: Tin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_code: Option<Vec<String>>,
    pub billing_class: BillingClass,
    pub payments: Vec<Payment>
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tin {
    #[serde(rename = "type")]
    pub tin_type: TinType,
    pub value: String
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payment {
    #[serde(serialize_with = "Monetary::serialize_number")]
    pub allowed_amount: Monetary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_code_modifier: Option<Vec<String>>,
    pub providers: Vec<ProviderPayment>
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderPayment {
    #[serde(serialize_with = "Monetary::serialize_number")]
    pub billed_charge: Monetary,
    pub npi: Vec<String>
}

/// A published document together with its storage metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MrfFile {
    pub id: MrfFileId,
    pub name: String,
    pub created_at: String,
    pub size: String,
    pub data: MrfDocument
}

impl MrfFile {
    pub fn new(id: MrfFileId, created_at: DateTime<Utc>, data: MrfDocument) -> Result<Self, serde_json::Error> {
        let bytes = serde_json::to_vec(&data)?.len();

        Ok(Self {
            id,
            name: format!("MRF_{}.json", created_at.format(DATE_FORMAT)),
            created_at: created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            size: format!("{} KB", (bytes + 512) / 1024),
            data
        })
    }

    pub fn summary(&self) -> MrfFileSummary {
        MrfFileSummary {
            id: self.id,
            name: self.name.clone(),
            created_at: self.created_at.clone(),
            size: self.size.clone(),
            claims: self.data.out_of_network.clone()
        }
    }
}

/// Listing view of a stored file; `claims` carries the document's line items.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MrfFileSummary {
    pub id: MrfFileId,
    pub name: String,
    pub created_at: String,
    pub size: String,
    pub claims: Vec<OutOfNetworkItem>
}
