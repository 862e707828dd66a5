// Resource shapes shared by the store, the gateway, and the UI.
// Wire format is camelCase JSON, matching the public API surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// CLIENT
// ============================================================================

/// A customer record managed by the CRM.
///
/// `id` and `created_at` are assigned by the store on creation and never
/// change afterwards. The five business fields are replaceable via update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub document: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

/// The writable business fields of a client, as submitted by forms and
/// POST/PUT bodies. Missing fields deserialize as empty and are left to the
/// validators to reject.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub document: String,
    pub address: String,
}

/// Partial update body for PUT: only the named fields are replaced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl From<ClientInput> for ClientPatch {
    fn from(input: ClientInput) -> Self {
        ClientPatch {
            name: Some(input.name),
            email: Some(input.email),
            phone: Some(input.phone),
            document: Some(input.document),
            address: Some(input.address),
        }
    }
}

// ============================================================================
// LOT / CONTRACT / PAYMENT
// Forward-declared shapes only: declared in the store schema but with no
// read/write path yet. Deleting a client does not cascade into these.
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LotStatus {
    Available,
    Reserved,
    Sold,
}

impl LotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LotStatus::Available => "available",
            LotStatus::Reserved => "reserved",
            LotStatus::Sold => "sold",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LotDimensions {
    pub width: f64,
    pub length: f64,
}

/// A land lot offered for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lot {
    pub id: String,
    pub code: String,
    pub location: String,
    pub dimensions: LotDimensions,
    pub total_price: f64,
    pub status: LotStatus,
    pub description: String,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
    Active,
    Completed,
    Defaulted,
}

impl ContractStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractStatus::Active => "active",
            ContractStatus::Completed => "completed",
            ContractStatus::Defaulted => "defaulted",
        }
    }
}

/// Purchase contract tying a client to a lot, paid in installments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: String,
    pub client_id: String,
    pub lot_id: String,
    pub total_amount: f64,
    pub installments: u32,
    pub installment_amount: f64,
    pub start_date: DateTime<Utc>,
    pub status: ContractStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Overdue,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Overdue => "overdue",
        }
    }
}

/// A single installment payment under a contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub contract_id: String,
    pub amount: f64,
    pub due_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    pub status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_wire_format_is_camel_case() {
        let client = Client {
            id: "abc".to_string(),
            name: "Ana Silva".to_string(),
            email: "ana@x.com".to_string(),
            phone: "5551234567".to_string(),
            document: "12345".to_string(),
            address: "Rua A, 10".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&client).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());
        assert!(json.get("_id").is_none());
    }

    #[test]
    fn test_patch_from_input_names_every_field() {
        let input = ClientInput {
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            phone: "5551234567".to_string(),
            document: "12345".to_string(),
            address: "Rua A, 10".to_string(),
        };

        let patch = ClientPatch::from(input.clone());
        assert_eq!(patch.name.as_deref(), Some("Ana"));
        assert_eq!(patch.address.as_deref(), Some("Rua A, 10"));
    }

    #[test]
    fn test_partial_patch_deserializes_missing_fields_as_none() {
        let patch: ClientPatch = serde_json::from_str(r#"{"phone":"5559999999"}"#).unwrap();
        assert_eq!(patch.phone.as_deref(), Some("5559999999"));
        assert!(patch.name.is_none());
        assert!(patch.email.is_none());
    }

    #[test]
    fn test_status_enums_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&LotStatus::Available).unwrap(),
            "\"available\""
        );
        assert_eq!(
            serde_json::to_string(&ContractStatus::Defaulted).unwrap(),
            "\"defaulted\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Overdue).unwrap(),
            "\"overdue\""
        );
    }
}
