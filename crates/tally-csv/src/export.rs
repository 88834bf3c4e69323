//! Writing an account's records as consecutive CSV blocks.

use std::io::Write;

use serde::Serialize;
use tally_core::{
  ledger::{Credit, Invoice, InvoiceItem, Payment},
  record::{Client, Contact},
};

use crate::Result;

/// Every record set included in an account export.
#[derive(Debug, Clone, Default)]
pub struct ExportSet {
  pub clients:       Vec<Client>,
  pub contacts:      Vec<Contact>,
  pub invoices:      Vec<Invoice>,
  pub invoice_items: Vec<InvoiceItem>,
  pub payments:      Vec<Payment>,
  pub credits:       Vec<Credit>,
}

/// Write one block: a header row of field names (only when `records` is
/// non-empty), one row per record, then a blank line.
pub fn write_block<W, T>(out: &mut W, records: &[T]) -> Result<()>
where
  W: Write,
  T: Serialize,
{
  {
    let mut writer = csv::Writer::from_writer(&mut *out);
    for record in records {
      writer.serialize(record)?;
    }
    writer.flush()?;
  }
  out.write_all(b"\n")?;
  Ok(())
}

/// Write all six blocks in export order.
pub fn write_export<W: Write>(out: &mut W, set: &ExportSet) -> Result<()> {
  write_block(out, &set.clients)?;
  write_block(out, &set.contacts)?;
  write_block(out, &set.invoices)?;
  write_block(out, &set.invoice_items)?;
  write_block(out, &set.payments)?;
  write_block(out, &set.credits)?;
  Ok(())
}
