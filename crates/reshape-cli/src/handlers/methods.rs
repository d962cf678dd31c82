//! Methods command handler

use crate::error::Result;
use crate::output::OutputWriter;
use reshape_core::Converter;

/// Handle the methods command
pub fn handle_methods(output: &mut OutputWriter) -> Result<()> {
    let methods = Converter::shared().registry().methods();
    output.section("Coercion Methods")?;
    output.methods(&methods)
}
