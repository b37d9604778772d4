//! Output adapters for the text and JSON formats.

use anyhow::{anyhow, Result};
use serde_json::{json, Value};

use crate::config::OutputFormat;
use crate::domain::codec::{describe, frame_json};
use crate::domain::dictionary::compat::CompatibilityReport;
use crate::domain::dictionary::{CommandSpec, Dictionary};
use crate::domain::filters::FilterStatus;
use crate::domain::types::{CommandFrame, CommandPath, PathSelector};
use crate::domain::version::{CompareResult, VersionCode};
use crate::service::dispatcher::{DatagramReport, DecodeOutcome};

/// Formats service results for the selected output format.
pub struct OutputAdapter {
    format: OutputFormat,
}

impl OutputAdapter {
    /// Create a new adapter for the specified format.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    fn to_json(value: &Value) -> Result<String> {
        serde_json::to_string(value).map_err(|e| anyhow!("Failed to serialize output: {}", e))
    }

    /// Result of decoding one command buffer. `frame` is missing when the
    /// filter blocked a buffer whose arguments do not decode.
    pub fn format_decode(
        &self,
        dictionary: &Dictionary,
        path: CommandPath,
        frame: Option<&CommandFrame<'_>>,
        status: FilterStatus,
        outcome: DecodeOutcome,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Text => {
                let description = match frame {
                    Some(frame) => describe(frame, dictionary).to_string(),
                    None => dictionary.selector_name(PathSelector::Command(path)),
                };
                Ok(format!(
                    "{}\npath: {}\nfilter: {}\noutcome: {}",
                    description, path, status, outcome
                ))
            }
            OutputFormat::Json => Self::to_json(&json!({
                "path": path,
                "frame": frame.map(|f| frame_json(f, dictionary)),
                "filter": status,
                "outcome": outcome,
            })),
        }
    }

    /// Result of encoding a command.
    pub fn format_encode(
        &self,
        dictionary: &Dictionary,
        frame: &CommandFrame<'_>,
        bytes: &[u8],
        status: FilterStatus,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Text => Ok(format!(
                "{}\n{}\nfilter: {}",
                hex::encode(bytes),
                describe(frame, dictionary),
                status
            )),
            OutputFormat::Json => Self::to_json(&json!({
                "hex": hex::encode(bytes),
                "frame": frame_json(frame, dictionary),
                "filter": status,
            })),
        }
    }

    /// Frames of a dissected datagram.
    pub fn format_datagram(&self, dictionary: &Dictionary, report: &DatagramReport) -> Result<String> {
        match self.format {
            OutputFormat::Text => {
                let mut lines = Vec::with_capacity(report.frames.len() + 2);
                for (i, entry) in report.frames.iter().enumerate() {
                    let mut line = format!(
                        "#{} {:?} buffer {} ({}) seq {} {} bytes",
                        i, entry.frame_type, entry.buffer_id, entry.kind, entry.seq, entry.payload_len
                    );
                    if let Some(path) = entry.path {
                        line.push_str(&format!(
                            " {}",
                            dictionary.selector_name(PathSelector::Command(path))
                        ));
                    }
                    if let Some(outcome) = entry.outcome {
                        line.push_str(&format!(" -> {}", outcome));
                    }
                    if let Some(error) = &entry.error {
                        line.push_str(&format!(" dropped: {}", error));
                    }
                    lines.push(line);
                }
                lines.push(format!(
                    "dispatched {}, no callback {}, unknown {}, blocked {}, dropped {}",
                    report.dispatched, report.no_callback, report.unknown, report.blocked, report.dropped
                ));
                if let Some(error) = &report.framing_error {
                    lines.push(format!("framing error: {}", error));
                }
                Ok(lines.join("\n"))
            }
            OutputFormat::Json => serde_json::to_string(report)
                .map_err(|e| anyhow!("Failed to serialize output: {}", e)),
        }
    }

    /// Filter status of a command, with the override that decided it.
    pub fn format_filter(
        &self,
        dictionary: &Dictionary,
        path: CommandPath,
        status: FilterStatus,
        matched: Option<PathSelector>,
    ) -> Result<String> {
        let rule = matched.map(|selector| dictionary.selector_name(selector));
        match self.format {
            OutputFormat::Text => Ok(format!(
                "{} ({}): {} [{}]",
                dictionary.selector_name(PathSelector::Command(path)),
                path,
                status,
                rule.as_deref().unwrap_or("default")
            )),
            OutputFormat::Json => Self::to_json(&json!({
                "path": path,
                "filter": status,
                "rule": rule,
            })),
        }
    }

    /// Dictionary listing.
    pub fn format_list<'a>(
        &self,
        dictionary: &Dictionary,
        commands: impl Iterator<Item = &'a CommandSpec>,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Text => Ok(commands
                .map(|spec| {
                    let args: Vec<String> = spec
                        .args
                        .iter()
                        .map(|arg| match arg.family.and_then(|id| dictionary.enums().get(id)) {
                            Some(family) => format!("{}:{}", arg.name, family.name()),
                            None => format!("{}:{}", arg.name, arg.ty),
                        })
                        .collect();
                    format!("{:<12} {}({})", spec.path.to_string(), spec.qualified_name, args.join(", "))
                })
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Json => {
                let entries: Vec<Value> = commands
                    .map(|spec| {
                        json!({
                            "path": spec.path,
                            "name": spec.qualified_name,
                            "comment": spec.comment,
                            "args": spec.args.iter().map(|arg| json!({
                                "name": arg.name,
                                "type": arg.ty,
                                "enum": arg.family
                                    .and_then(|id| dictionary.enums().get(id))
                                    .map(|family| family.name()),
                            })).collect::<Vec<_>>(),
                        })
                    })
                    .collect();
                Self::to_json(&Value::Array(entries))
            }
        }
    }

    /// Append-only check between two dictionaries.
    pub fn format_compat(&self, old: VersionCode, new: VersionCode, report: &CompatibilityReport) -> Result<String> {
        match self.format {
            OutputFormat::Text => {
                let mut lines = vec![format!(
                    "{} -> {}: {} added commands, {} added enum members",
                    old, new, report.added_commands, report.added_enum_members
                )];
                if report.is_compatible() {
                    lines.push("compatible".to_string());
                } else {
                    lines.extend(report.violations.iter().map(|v| format!("violation: {}", v)));
                }
                Ok(lines.join("\n"))
            }
            OutputFormat::Json => Self::to_json(&json!({
                "old_version": old,
                "new_version": new,
                "compatible": report.is_compatible(),
                "report": report,
            })),
        }
    }

    pub fn format_compare(&self, result: CompareResult) -> Result<String> {
        match self.format {
            OutputFormat::Text => Ok(result.to_string()),
            OutputFormat::Json => Self::to_json(&json!({ "result": result })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ArgValue;

    #[test]
    fn test_text_decode_output() {
        let dictionary = Dictionary::builtin().unwrap();
        let path = CommandPath::new(0, 5, 1);
        let frame = CommandFrame::new(path, vec![ArgValue::U8(42)]);
        let out = OutputAdapter::new(OutputFormat::Text)
            .format_decode(&dictionary, path, Some(&frame), FilterStatus::Allowed, DecodeOutcome::Dispatched)
            .unwrap();
        assert_eq!(
            out,
            "common.CommonState.BatteryStateChanged(percent:42)\npath: 0.5.1\nfilter: ALLOWED\noutcome: DISPATCHED"
        );
    }

    #[test]
    fn test_json_filter_output() {
        let dictionary = Dictionary::builtin().unwrap();
        let out = OutputAdapter::new(OutputFormat::Json)
            .format_filter(
                &dictionary,
                CommandPath::new(1, 0, 1),
                FilterStatus::Blocked,
                Some(PathSelector::class(1, 0)),
            )
            .unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["filter"], "BLOCKED");
        assert_eq!(value["rule"], "ardrone3.Piloting");
        assert_eq!(value["path"]["command"], 1);
    }

    #[test]
    fn test_compare_output() {
        let adapter = OutputAdapter::new(OutputFormat::Text);
        assert_eq!(adapter.format_compare(CompareResult::V1Newer).unwrap(), "V1_NEWER");
    }
}
