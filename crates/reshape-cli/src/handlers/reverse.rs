//! Reverse command handler

use super::utils::load_object;
use crate::cli::ReverseArgs;
use crate::error::Result;
use crate::output::OutputWriter;
use reshape_core::Converter;
use tracing::{info, instrument};

/// Handle the reverse command
#[instrument(skip(output), fields(mapping = %args.mapping.display()))]
pub fn handle_reverse(args: ReverseArgs, output: &mut OutputWriter) -> Result<()> {
    let mapping = load_object(&args.mapping)?;
    let reversed = Converter::shared().reverse_mapping(&mapping)?;
    info!(entries = reversed.len(), "Derived reverse mapping");

    match args.save_to {
        Some(path) => output.save_object(&reversed, &path),
        None => {
            output.section("Reverse Mapping")?;
            output.object(&reversed)
        }
    }
}
