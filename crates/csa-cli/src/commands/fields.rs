//! Fields command implementation.

use crate::error::Result;
use crate::output::Formatter;
use csa_domain::FIELD_CATALOG;

/// Execute the fields command.
pub fn execute_fields(formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.format_fields(&FIELD_CATALOG)?);
    Ok(())
}
