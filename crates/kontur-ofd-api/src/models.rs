// OFD API response types
//
// Field names follow the remote JSON exactly (camelCase). Every field has a
// default because the API omits empty values rather than sending nulls.

use serde::{Deserialize, Deserializer, Serialize};

// ── List bodies ──────────────────────────────────────────────────────

/// Object form of a list endpoint body, `{ "data": [...] }`.
///
/// The documented shape is a bare JSON array; some deployments wrap it.
#[derive(Debug, Deserialize)]
pub(crate) struct ListEnvelope<T> {
    #[serde(alias = "Data")]
    pub data: Vec<T>,
}

/// Body of a successful password authentication.
#[derive(Debug, Deserialize)]
pub(crate) struct AuthResponse {
    #[serde(rename = "Sid", default)]
    pub sid: String,
}

// ── Organization ─────────────────────────────────────────────────────

/// An organization on the account, from `GET /v2/organizations`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Organization {
    /// Join key for the organization's cashboxes.
    pub id: String,
    /// Taxpayer identification number.
    pub inn: String,
    /// Tax registration reason code.
    pub kpp: String,
    /// Primary state registration number.
    pub ogrn: String,
    pub short_name: String,
    pub full_name: String,
}

// ── Cashbox ──────────────────────────────────────────────────────────

/// A registered point-of-sale device, from
/// `GET /v2/organizations/{orgId}/cashboxes`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Cashbox {
    /// Registration number; join key for the cashbox's documents.
    pub reg_number: String,
    pub serial_number: String,
    pub address: String,
    pub name: String,
    pub kpp: String,
    pub fiscal_drive: FiscalDrive,
    pub sales_point_name: String,
}

/// Fiscal drive installed in a cashbox.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FiscalDrive {
    /// Drive serial number. The upstream field really is `fiscalDriverNumber`.
    pub fiscal_driver_number: String,
    pub earliest_document_timestamp: String,
}

// ── Receipt ──────────────────────────────────────────────────────────

/// A fiscal document, from
/// `GET /v2/organizations/{orgId}/cashboxes/{regNumber}/documents?date=...`.
///
/// Monetary values are in kopecks as sent by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Receipt {
    pub receipt_code: i64,
    pub user: String,
    pub user_inn: String,
    pub request_number: i64,
    pub date_time: String,
    pub shift_number: i64,
    pub operation_type: i64,
    pub taxation_type: i64,
    pub operator: String,
    pub kkt_reg_id: String,
    pub fiscal_drive_number: String,
    pub retail_place_address: String,
    /// Line items in document order. Grouped entries are flattened.
    #[serde(deserialize_with = "flatten_items")]
    pub items: Vec<ReceiptItem>,
    pub nds18: i64,
    pub total_sum: i64,
    pub cash_total_sum: i64,
    pub ecash_total_sum: i64,
    pub fiscal_document_number: i64,
    pub fiscal_sign: i64,
}

/// One line of a receipt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptItem {
    pub name: String,
    pub price: i64,
    pub quantity: i64,
    pub sum: i64,
}

/// An element of a receipt's `items` array.
///
/// Besides plain lines the service may send a group object that carries its
/// own `items` list. A group must contain that list, so it never decodes as
/// an empty line.
#[derive(Deserialize)]
#[serde(untagged)]
enum ItemEntry {
    Group {
        #[serde(alias = "Items")]
        items: Vec<ItemEntry>,
    },
    Line(ReceiptItem),
}

impl ItemEntry {
    fn flatten_into(self, out: &mut Vec<ReceiptItem>) {
        match self {
            Self::Group { items } => {
                for entry in items {
                    entry.flatten_into(out);
                }
            }
            Self::Line(item) => out.push(item),
        }
    }
}

fn flatten_items<'de, D>(deserializer: D) -> Result<Vec<ReceiptItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Vec::<ItemEntry>::deserialize(deserializer)?;
    let mut items = Vec::with_capacity(entries.len());
    for entry in entries {
        entry.flatten_into(&mut items);
    }
    Ok(items)
}
