//! Convert command handler

use super::utils::load_object;
use crate::cli::ConvertArgs;
use crate::config::Config;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use reshape_core::{Converter, Strategy};
use tracing::{debug, info, instrument};

/// Handle the convert command
#[instrument(skip(config, output), fields(subject = %args.subject.display()))]
pub fn handle_convert(args: ConvertArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let timer = Timer::with_details("convert_command", &format!("file: {}", args.subject.display()));

    let mut subject = load_object(&args.subject)?;
    let mapping = load_object(&args.mapping)?;
    if mapping.is_empty() {
        output.warning("Mapping is empty; only --include-all copies fields")?;
    }

    let options = config
        .convert
        .options(args.include_all, args.strategy.map(Strategy::from));
    info!(strategy = ?options.strategy, include_all = options.include_all, "Converting subject");

    output.info(&format!(
        "Converting {} with {}",
        args.subject.display(),
        args.mapping.display()
    ))?;

    let converted = Converter::shared()
        .convert_with(Some(&mut subject), Some(&mapping), options)?
        .unwrap_or_default();

    debug!(fields = converted.len(), elapsed_ms = timer.elapsed().as_millis() as u64, "Conversion finished");
    output.debug(&format!("Strategy: {:?}", options.strategy))?;

    match args.save_to {
        Some(path) => output.save_object(&converted, &path),
        None => {
            output.section("Result")?;
            output.object(&converted)
        }
    }
}
