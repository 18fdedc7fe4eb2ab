//! Config command implementation.

use crate::config::CredenceConfig;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the config command.
pub fn execute_config(config: &CredenceConfig, formatter: &Formatter) -> Result<()> {
    print!("{}", formatter.format_config(config)?);
    Ok(())
}
