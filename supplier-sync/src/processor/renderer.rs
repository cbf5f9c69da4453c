//! Markdown-style table and document rendering.

use std::collections::HashMap;

use supplier_sync_shared::ChildRecord;

use crate::source::ChildTable;

/// Renders child rows into tables and tables into a supplier document.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentRenderer;

impl DocumentRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render `records` as a table with one column per field.
    ///
    /// A cell the record does not carry is left out of its row rather than
    /// rendered blank, so sparse rows have fewer cells than the header. Trailing
    /// spaces and pipes are trimmed from every data row. An empty record list
    /// renders as an empty string.
    pub fn render_table<S: AsRef<str>>(&self, fields: &[S], records: &[ChildRecord]) -> String {
        if records.is_empty() {
            return String::new();
        }

        let names: Vec<&str> = fields.iter().map(AsRef::as_ref).collect();
        let mut table = format!("| {} |\n", names.join(" | "));
        table.push_str(&format!("| {} |\n", vec!["---"; names.len()].join(" | ")));

        for record in records {
            let mut row = String::from("| ");
            for field in &names {
                if let Some(value) = record.get(field) {
                    row.push_str(value);
                    row.push_str(" | ");
                }
            }
            table.push_str(row.trim_end_matches([' ', '|']));
            table.push('\n');
        }

        table
    }

    /// Assemble a supplier document from rendered tables.
    ///
    /// Sections always follow [`ChildTable::ALL`]. A table missing from
    /// `tables` contributes its heading and description with no rows.
    pub fn render_document(&self, supplier_name: &str, tables: &HashMap<ChildTable, String>) -> String {
        let mut document = format!("# Supplemental information for {}:\n", supplier_name);
        for table in ChildTable::ALL {
            document.push_str(&format!("## {}: \n {}\n", table.heading(), table.description()));
            if let Some(text) = tables.get(&table) {
                document.push_str(text);
            }
        }
        document
    }
}
