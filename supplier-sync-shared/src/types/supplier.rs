//! Supplier entity types.
//!
//! This module defines the supplier snapshot that flows from the source API,
//! through document rendering, into the search index.

use crate::types::child_record::{json_to_text, Item};

/// Source field carrying the supplier's primary key.
pub const SUPPLIER_ID_FIELD: &str = "SupplierId";
/// Source field carrying the supplier's display name.
pub const SUPPLIER_NAME_FIELD: &str = "Supplier";
/// Source field carrying the supplier's lifecycle status.
pub const STATUS_FIELD: &str = "Status";
/// Source field carrying the business relationship (prospective, spend authorized, ...).
pub const BUSINESS_RELATIONSHIP_FIELD: &str = "BusinessRelationship";
/// Source field carrying the tax organization type.
pub const TAX_ORGANIZATION_TYPE_FIELD: &str = "TaxOrganizationType";
/// Source field carrying the last modification timestamp.
pub const LAST_UPDATE_DATE_FIELD: &str = "LastUpdateDate";

/// Identity and profile snapshot for one vendor.
///
/// Profile attributes are never absent: a missing source value becomes an empty
/// string. The rendered `document` is attached exactly once through
/// [`Supplier::with_document`] and cannot be changed afterwards.
///
/// # Fields
///
/// - `supplier_id`: Primary key supplied by the source system
/// - `name`: Supplier display name
/// - `status`: Lifecycle status (e.g. "ACTIVE")
/// - `business_relationship`: Relationship type (e.g. "SPEND_AUTHORIZED")
/// - `tax_organization_type`: Tax organization type (e.g. "CORPORATION")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Supplier {
    pub supplier_id: String,
    pub name: String,
    pub status: String,
    pub business_relationship: String,
    pub tax_organization_type: String,
    document: String,
}

impl Supplier {
    /// Create a new supplier with an empty document.
    ///
    /// # Example
    ///
    /// ```
    /// use supplier_sync_shared::Supplier;
    ///
    /// let supplier = Supplier::new("100", "Acme Corp", "ACTIVE", "SPEND_AUTHORIZED", "CORPORATION");
    /// assert!(supplier.document().is_empty());
    /// ```
    pub fn new(
        supplier_id: impl Into<String>,
        name: impl Into<String>,
        status: impl Into<String>,
        business_relationship: impl Into<String>,
        tax_organization_type: impl Into<String>,
    ) -> Self {
        Self {
            supplier_id: supplier_id.into(),
            name: name.into(),
            status: status.into(),
            business_relationship: business_relationship.into(),
            tax_organization_type: tax_organization_type.into(),
            document: String::new(),
        }
    }

    /// Build a supplier from one item of a supplier list page.
    ///
    /// Returns `None` when the identity field is missing or empty; such records
    /// cannot be keyed in the index and are skipped by callers.
    pub fn from_item(item: &Item) -> Option<Self> {
        let supplier_id = item.get(SUPPLIER_ID_FIELD).and_then(json_to_text)?;
        if supplier_id.is_empty() {
            return None;
        }

        let text = |field: &str| {
            item.get(field)
                .and_then(json_to_text)
                .unwrap_or_default()
        };

        Some(Self::new(
            supplier_id,
            text(SUPPLIER_NAME_FIELD),
            text(STATUS_FIELD),
            text(BUSINESS_RELATIONSHIP_FIELD),
            text(TAX_ORGANIZATION_TYPE_FIELD),
        ))
    }

    /// Attach the rendered document, consuming the supplier.
    pub fn with_document(mut self, document: String) -> Self {
        self.document = document;
        self
    }

    /// The rendered document body, empty until rendering completes.
    pub fn document(&self) -> &str {
        &self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(value: serde_json::Value) -> Item {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_supplier_new() {
        let supplier = Supplier::new("1", "Acme", "ACTIVE", "SPEND_AUTHORIZED", "CORPORATION");

        assert_eq!(supplier.supplier_id, "1");
        assert_eq!(supplier.name, "Acme");
        assert_eq!(supplier.status, "ACTIVE");
        assert_eq!(supplier.business_relationship, "SPEND_AUTHORIZED");
        assert_eq!(supplier.tax_organization_type, "CORPORATION");
        assert_eq!(supplier.document(), "");
    }

    #[test]
    fn test_from_item_numeric_id() {
        let supplier = Supplier::from_item(&item(json!({
            "SupplierId": 300000047507499u64,
            "Supplier": "Lee Supplies",
            "Status": "ACTIVE"
        })))
        .unwrap();

        assert_eq!(supplier.supplier_id, "300000047507499");
        assert_eq!(supplier.name, "Lee Supplies");
        assert_eq!(supplier.business_relationship, "");
        assert_eq!(supplier.tax_organization_type, "");
    }

    #[test]
    fn test_from_item_without_id() {
        assert!(Supplier::from_item(&item(json!({ "Supplier": "No Id" }))).is_none());
        assert!(Supplier::from_item(&item(json!({ "SupplierId": "" }))).is_none());
        assert!(Supplier::from_item(&item(json!({ "SupplierId": null }))).is_none());
    }

    #[test]
    fn test_with_document() {
        let supplier = Supplier::new("1", "Acme", "", "", "").with_document("# Body".to_string());
        assert_eq!(supplier.document(), "# Body");
    }
}
