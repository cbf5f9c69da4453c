//! Request and response types for index operations.

use serde::{Deserialize, Serialize};

use crate::errors::IndexError;

/// Who an ACL entry applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AclType {
    /// Every principal in the tenant.
    Everyone,
    User,
    Group,
}

/// Whether an ACL entry grants or denies access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccessType {
    Grant,
    Deny,
}

/// One access-control entry on an external item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Acl {
    #[serde(rename = "type")]
    pub acl_type: AclType,
    pub value: String,
    pub access_type: AccessType,
}

impl Acl {
    /// Grant access to everyone in the given tenant.
    pub fn everyone(tenant_id: impl Into<String>) -> Self {
        Self {
            acl_type: AclType::Everyone,
            value: tenant_id.into(),
            access_type: AccessType::Grant,
        }
    }
}

/// Body format of an item's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentType {
    Text,
    Html,
}

/// The searchable body of an external item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemContent {
    pub value: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
}

/// Queryable supplier attributes registered in the connection schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemProperties {
    pub supplier_id: String,
    pub supplier: String,
    pub status: String,
    pub business_relationship: String,
    pub tax_organization_type: String,
    /// Deep link back to the supplier in the source system.
    pub url: String,
    pub icon_url: String,
}

/// One item in an external connection, keyed by `id`.
///
/// The id travels in the request path, so it is not part of the serialized body.
/// Writing an item whose id already exists replaces the previous item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalItem {
    #[serde(skip)]
    pub id: String,
    pub acl: Vec<Acl>,
    pub properties: ItemProperties,
    pub content: ItemContent,
}

/// Result of a batch operation for a single item.
#[derive(Debug, Clone)]
pub struct BatchOperationResult {
    /// The item's identifier.
    pub item_id: String,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Error if the operation failed.
    pub error: Option<IndexError>,
}

/// Summary of a batch operation containing aggregate statistics and individual results.
///
/// Individual results keep the order in which the items were submitted, so
/// callers can tell exactly which items failed.
#[derive(Debug, Clone, Default)]
pub struct BatchOperationSummary {
    /// Total number of items in the batch.
    pub total: usize,
    /// Number of successful operations.
    pub succeeded: usize,
    /// Number of failed operations.
    pub failed: usize,
    /// Individual results for each item.
    pub results: Vec<BatchOperationResult>,
}

impl BatchOperationSummary {
    /// Record the outcome of one item.
    pub fn record(&mut self, item_id: impl Into<String>, outcome: Result<(), IndexError>) {
        self.total += 1;
        let item_id = item_id.into();
        match outcome {
            Ok(()) => {
                self.succeeded += 1;
                self.results.push(BatchOperationResult {
                    item_id,
                    success: true,
                    error: None,
                });
            }
            Err(error) => {
                self.failed += 1;
                self.results.push(BatchOperationResult {
                    item_id,
                    success: false,
                    error: Some(error),
                });
            }
        }
    }

    /// True iff no item in the batch failed.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Results of the items that failed.
    pub fn failures(&self) -> impl Iterator<Item = &BatchOperationResult> {
        self.results.iter().filter(|r| !r.success)
    }
}
