use std::io::Write;

use serde::Serialize;
use serde_json::json;
use yonder_core::{ProviderDescriptor, ResultSet, Slot, SlotState};

use crate::cli::OutputFormat;
use crate::error::CliError;

/// One NDJSON line per settled slot, written as completions arrive.
pub fn write_slot_line<W: Write>(writer: &mut W, slot: &Slot) -> Result<(), CliError> {
    serde_json::to_writer(&mut *writer, slot)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub fn render_results<W: Write>(
    writer: &mut W,
    results: &ResultSet,
    format: OutputFormat,
    pretty: bool,
    show_raw: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => write_json(writer, results, pretty)?,
        OutputFormat::Ndjson => {
            let summary = json!({
                "generation": results.generation(),
                "address": results.address(),
                "summary": results.summary(),
            });
            write_json(writer, &summary, false)?;
        }
        OutputFormat::Table => render_table(writer, results, show_raw)?,
    }

    Ok(())
}

pub fn render_providers<W: Write>(
    writer: &mut W,
    descriptors: &[ProviderDescriptor],
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => write_json(writer, &json!({ "providers": descriptors }), pretty)?,
        OutputFormat::Ndjson => {
            for descriptor in descriptors {
                write_json(writer, descriptor, false)?;
            }
        }
        OutputFormat::Table => {
            writeln!(writer, "{:<10} {:<10} COLOR", "ID", "NAME")?;
            for descriptor in descriptors {
                writeln!(
                    writer,
                    "{:<10} {:<10} {}",
                    descriptor.id.as_str(),
                    descriptor.display_name,
                    descriptor.color
                )?;
            }
        }
    }

    Ok(())
}

fn write_json<W: Write, T: Serialize + ?Sized>(
    writer: &mut W,
    value: &T,
    pretty: bool,
) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, value)?;
    } else {
        serde_json::to_writer(&mut *writer, value)?;
    }
    writer.write_all(b"\n")?;
    Ok(())
}

fn render_table<W: Write>(
    writer: &mut W,
    results: &ResultSet,
    show_raw: bool,
) -> Result<(), CliError> {
    writeln!(writer, "address: {}", results.address())?;
    writeln!(
        writer,
        "{:<10} {:<8} {:>8} {:>11} {:>11} {:<14} RESULT",
        "PROVIDER", "STATUS", "LATENCY", "LAT", "LNG", "QUALITY"
    )?;

    for slot in results.slots() {
        let latency = slot
            .latency_ms()
            .map_or_else(|| String::from("-"), |ms| format!("{ms}ms"));

        match &slot.state {
            SlotState::Pending => {
                writeln!(
                    writer,
                    "{:<10} {:<8} {:>8} {:>11} {:>11} {:<14} -",
                    slot.display_name, "pending", latency, "-", "-", "-"
                )?;
            }
            SlotState::Success { result, .. } => {
                writeln!(
                    writer,
                    "{:<10} {:<8} {:>8} {:>11.6} {:>11.6} {:<14} {}",
                    slot.display_name,
                    "success",
                    latency,
                    result.latitude,
                    result.longitude,
                    result.quality.to_string(),
                    result.address
                )?;
                if show_raw {
                    for line in result.raw_pretty().lines() {
                        writeln!(writer, "    {line}")?;
                    }
                }
            }
            SlotState::Error { error, .. } => {
                writeln!(
                    writer,
                    "{:<10} {:<8} {:>8} {:>11} {:>11} {:<14} {}",
                    slot.display_name,
                    "error",
                    latency,
                    "-",
                    "-",
                    "-",
                    error.reason()
                )?;
            }
        }
    }

    let summary = results.summary();
    writeln!(
        writer,
        "{} providers: {} succeeded, {} failed",
        summary.total, summary.succeeded, summary.failed
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use yonder_core::{ErrorMarker, Generation, NormalizedResult, ProviderId, Quality};

    fn settled_results() -> ResultSet {
        let descriptors = vec![
            ProviderDescriptor::new(ProviderId::Esri, "Esri", "#444").expect("descriptor"),
            ProviderDescriptor::new(ProviderId::Gisgraphy, "Gisgraphy", "#984EA3")
                .expect("descriptor"),
        ];
        let generation = Generation::new(1);
        let mut results = ResultSet::new(generation, "Main St", descriptors);

        let result = NormalizedResult::new(
            "X",
            37.0,
            -122.0,
            Quality::new(json!(100)),
            json!({ "name": "X" }),
        )
        .expect("finite coordinates");
        results
            .record(generation, ProviderId::Esri, Ok(result), 12)
            .expect("record esri");
        results
            .record(
                generation,
                ProviderId::Gisgraphy,
                Err(ErrorMarker::no_results()),
                30,
            )
            .expect("record gisgraphy");
        results
    }

    fn render(format: OutputFormat, show_raw: bool) -> String {
        let mut buffer = Vec::new();
        render_results(&mut buffer, &settled_results(), format, false, show_raw)
            .expect("render succeeds");
        String::from_utf8(buffer).expect("utf8 output")
    }

    #[test]
    fn json_output_contains_every_slot() {
        let output = render(OutputFormat::Json, false);
        let value: Value = serde_json::from_str(&output).expect("valid json");

        assert_eq!(value["address"], "Main St");
        assert_eq!(value["slots"][0]["status"], "success");
        assert_eq!(value["slots"][0]["result"]["latitude"], 37.0);
        assert_eq!(value["slots"][1]["status"], "error");
        assert_eq!(value["slots"][1]["error"]["reason"], "No results.");
    }

    #[test]
    fn ndjson_output_ends_with_summary_line() {
        let output = render(OutputFormat::Ndjson, false);
        let value: Value = serde_json::from_str(output.trim_end()).expect("single json line");

        assert_eq!(value["summary"]["succeeded"], 1);
        assert_eq!(value["summary"]["failed"], 1);
    }

    #[test]
    fn table_output_shows_results_and_errors() {
        let output = render(OutputFormat::Table, true);

        assert!(output.contains("37.000000"));
        assert!(output.contains("No results."));
        assert!(output.contains("\"name\": \"X\""));
        assert!(output.contains("2 providers: 1 succeeded, 1 failed"));
    }

    #[test]
    fn slot_lines_are_single_json_objects() {
        let results = settled_results();
        let mut buffer = Vec::new();
        write_slot_line(&mut buffer, &results.slots()[0]).expect("write slot");

        let output = String::from_utf8(buffer).expect("utf8 output");
        assert_eq!(output.lines().count(), 1);
        let value: Value = serde_json::from_str(&output).expect("valid json");
        assert_eq!(value["provider"], "esri");
        assert_eq!(value["latency_ms"], 12);
    }
}
