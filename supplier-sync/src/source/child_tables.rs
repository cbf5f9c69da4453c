//! Related tables fetched for every supplier.

use std::sync::Arc;

use supplier_sync_shared::ChildRecord;
use tracing::{debug, instrument, warn};

use crate::processor::DocumentRenderer;
use crate::source::client::RestSource;
use crate::source::pager::{Pager, PagerQuery};
use crate::source::retry::RetryPolicy;

/// A related table of a supplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildTable {
    Sites,
    Dff,
    BusinessClassifications,
    Contacts,
    ProductsAndServices,
    Addresses,
}

impl ChildTable {
    /// Every table, in document order.
    pub const ALL: [ChildTable; 6] = [
        ChildTable::Sites,
        ChildTable::Dff,
        ChildTable::BusinessClassifications,
        ChildTable::Contacts,
        ChildTable::ProductsAndServices,
        ChildTable::Addresses,
    ];

    /// Path segment under `<supplier>/child/`.
    pub fn path(self) -> &'static str {
        match self {
            ChildTable::Sites => "sites",
            ChildTable::Dff => "DFF",
            ChildTable::BusinessClassifications => "businessClassifications",
            ChildTable::Contacts => "contacts",
            ChildTable::ProductsAndServices => "productsAndServices",
            ChildTable::Addresses => "addresses",
        }
    }

    /// Fields requested and rendered, in column order.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            ChildTable::Sites => &[
                "SupplierSiteId",
                "SupplierSite",
                "ProcurementBUId",
                "ProcurementBU",
                "SupplierAddressName",
                "Email",
                "PayGroup",
                "PaymentTerms",
            ],
            ChildTable::Dff => &["exigerRelationshipStatus", "exigerRiskLevel"],
            ChildTable::BusinessClassifications => &[
                "Classification",
                "Subclassification",
                "Status",
                "CertifyingAgency",
                "CertificateExpirationDate",
                "Notes",
            ],
            ChildTable::Contacts => &[
                "FirstName",
                "LastName",
                "JobTitle",
                "PhoneNumber",
                "Email",
                "Status",
            ],
            ChildTable::ProductsAndServices => {
                &["CategoryName", "CategoryDescription", "CategoryType"]
            }
            ChildTable::Addresses => &[
                "AddressName",
                "Country",
                "AddressLine1",
                "AddressLine2",
                "AddressLine3",
                "AddressLine4",
                "City",
                "State",
                "PostalCode",
                "Status",
                "AddressPurposeOrderingFlag",
                "AddressPurposeRemitToFlag",
                "AddressPurposeRFQOrBiddingFlag",
            ],
        }
    }

    /// Section heading in the rendered document.
    pub fn heading(self) -> &'static str {
        match self {
            ChildTable::Sites => "Supplier Sites Data",
            ChildTable::Dff => "Descriptive Flexfields Data",
            ChildTable::BusinessClassifications => "Business Classifications Data",
            ChildTable::Contacts => "Contacts Data",
            ChildTable::ProductsAndServices => "Products and Services Data",
            ChildTable::Addresses => "Address Data",
        }
    }

    /// Static paragraph explaining the table to the document's reader.
    pub fn description(self) -> &'static str {
        match self {
            ChildTable::Sites => {
                "This table captures site-specific data for each supplier, allowing for detailed \
                 reasoning about supplier operations, geographic alignment, and procurement \
                 eligibility. It supports scenarios where a supplier operates across multiple \
                 locations, enabling filtering and analysis based on regional or business unit \
                 criteria. This data is especially useful for systems that need to evaluate \
                 supplier presence and compliance within specific operational contexts. Users want \
                 to know if a Supplier is eligible for procurement in their BU (e.g. Business Unit) \
                 as reflected in matching ProcurementBU field."
            }
            ChildTable::Dff => {
                "This table captures third-party risk intelligence from Exiger, providing \
                 structured risk scores and metadata for each supplier. It enables reasoning about \
                 supplier risk exposure (e.g. exigerRiskLevel), compliance posture, and mitigation \
                 needs (e.g. exigerRelationshipStatus)."
            }
            ChildTable::BusinessClassifications => {
                "This table contains information about the various business classifications of a \
                 supplier. It is used to track diversity certifications, their statuses, and the \
                 agencies that issued them. This supports compliance, reporting, and supplier \
                 diversity initiatives."
            }
            ChildTable::Contacts => {
                "This table contains information about the supplier's contacts, including the \
                 contact name (FirstName + LastName), email address, phone number, job title and \
                 contact status. This is useful for understanding who is the primary contact at \
                 the supplier for various purposes."
            }
            ChildTable::ProductsAndServices => {
                "This table captures structured information about the offerings of each supplier, \
                 enabling the LLM to reason about supplier capabilities, match offerings to \
                 business needs, and support procurement decisions. CategoryName identifies the \
                 category of Products and Services offered by the Supplier and serves as a \
                 semantic anchor for identifying and categorizing supplier capabilities. \
                 CategoryDescription is a detailed description of the product or services offered."
            }
            ChildTable::Addresses => {
                "Contains structured location and contact data for each supplier, including \
                 address_line_1, address_line_2, city, state, postal_code, and country. This schema \
                 enables geolocation, regional compliance checks, and communication routing for \
                 supplier entities"
            }
        }
    }
}

impl std::fmt::Display for ChildTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Fetches and renders the related tables of a supplier.
pub struct ChildTableFetcher {
    source: Arc<dyn RestSource>,
    retry: RetryPolicy,
    renderer: DocumentRenderer,
}

impl ChildTableFetcher {
    pub fn new(source: Arc<dyn RestSource>, retry: RetryPolicy) -> Self {
        Self {
            source,
            retry,
            renderer: DocumentRenderer::new(),
        }
    }

    /// URL of `table` for one supplier.
    pub fn table_url(supplier_url: &str, supplier_id: &str, table: ChildTable) -> String {
        format!(
            "{}/{}/child/{}",
            supplier_url.trim_end_matches('/'),
            supplier_id,
            table.path()
        )
    }

    /// Every row of `table` that could be fetched.
    ///
    /// Each page is retried according to the policy. When a page still fails,
    /// paging stops and the rows gathered so far are returned.
    #[instrument(skip(self, supplier_url, table), fields(table = %table))]
    pub async fn fetch_records(
        &self,
        supplier_url: &str,
        supplier_id: &str,
        table: ChildTable,
    ) -> Vec<ChildRecord> {
        let url = Self::table_url(supplier_url, supplier_id, table);
        let mut pager = Pager::new(self.source.clone(), url, PagerQuery::fields(table.fields()));
        let mut records = Vec::new();

        while pager.has_more() {
            let offset = pager.cursor().offset;
            let fetched = self
                .retry
                .run("fetch child table page", || pager.fetch_current())
                .await;

            match fetched {
                Ok(page) => match pager.accept(page) {
                    Some(items) => records.extend(
                        items
                            .iter()
                            .map(|item| ChildRecord::project(item, table.fields())),
                    ),
                    None => break,
                },
                Err(e) => {
                    warn!(
                        supplier_id,
                        table = %table,
                        offset,
                        rows_kept = records.len(),
                        error = %e,
                        "Child table unavailable, keeping rows fetched so far"
                    );
                    pager.abandon();
                }
            }
        }

        debug!(supplier_id, table = %table, rows = records.len(), "Fetched child table");
        records
    }

    /// Rendered table text for `table`, empty when no rows were fetched.
    pub async fn fetch_table(&self, supplier_url: &str, supplier_id: &str, table: ChildTable) -> String {
        let records = self.fetch_records(supplier_url, supplier_id, table).await;
        self.renderer.render_table(table.fields(), &records)
    }
}
