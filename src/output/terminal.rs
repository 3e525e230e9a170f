//! Plain terminal tables

use std::io::Write;

use anyhow::Result;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::model::{Relation, Schema};
use crate::store::Store;

use super::OutputFormatter;

/// Terminal output rendered with `tabled`
pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }

    fn write_summary(&self, store: &Store, writer: &mut dyn Write) -> Result<()> {
        let mut builder = Builder::default();
        builder.push_record(["relation", "fields", "rows"].map(String::from));
        for name in store.names() {
            let fields = store.schema(name).map(|s| s.len()).unwrap_or(0);
            let rows = store.relation(name).map(|r| r.len()).unwrap_or(0);
            builder.push_record([name.to_string(), fields.to_string(), rows.to_string()]);
        }

        let mut table = builder.build();
        table.with(Style::modern());
        writeln!(writer, "{}", table)?;
        Ok(())
    }

    fn write_preview(
        &self,
        name: &str,
        schema: &Schema,
        relation: &Relation,
        limit: usize,
        writer: &mut dyn Write,
    ) -> Result<()> {
        writeln!(writer)?;
        writeln!(writer, "{} ({} of {} rows):", name, limit.min(relation.len()), relation.len())?;

        let mut builder = Builder::default();
        builder.push_record(schema.names().map(String::from));
        for row in relation.iter().take(limit) {
            builder.push_record(row.cells.iter().map(|c| c.display().into_owned()));
        }

        let mut table = builder.build();
        table.with(Style::modern());
        writeln!(writer, "{}", table)?;
        Ok(())
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TerminalOutput {
    fn render(&self, store: &Store, preview: usize, writer: &mut dyn Write) -> Result<()> {
        if store.is_empty() {
            writeln!(writer, "No relations loaded.")?;
            return Ok(());
        }

        self.write_summary(store, writer)?;

        if preview > 0 {
            for name in store.names() {
                if let (Some(schema), Some(relation)) = (store.schema(name), store.relation(name)) {
                    self.write_preview(name, schema, relation, preview, writer)?;
                }
            }
        }

        Ok(())
    }
}
