//! Command-line operations over the codec, the filter and the dictionary.

use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{debug, error, info};

use crate::config::{Config, OutputFormat};
use crate::domain::codec::{describe, parse_args, peek_path, Codec};
use crate::domain::dictionary::compat::check_compatibility;
use crate::domain::dictionary::Dictionary;
use crate::domain::filters::{CommandFilter, FilterStatus};
use crate::domain::types::{CommandFrame, PathSelector};
use crate::domain::version::{compare_version_codes, CompareResult};
use crate::service::adapter::OutputAdapter;
use crate::service::dispatcher::{CommandDecoder, DecodeOutcome};

/// Exit code for success and allowed commands.
pub const EXIT_OK: i32 = 0;

/// Exit code for failures and incompatible dictionaries.
pub const EXIT_ERROR: i32 = 1;

/// Exit code when the decoded or queried command is blocked.
pub const EXIT_BLOCKED: i32 = 2;

fn exit_code_for(status: FilterStatus) -> i32 {
    match status {
        FilterStatus::Allowed => EXIT_OK,
        FilterStatus::Blocked => EXIT_BLOCKED,
        FilterStatus::Unknown | FilterStatus::Error => EXIT_ERROR,
    }
}

/// Load the dictionary named by the configuration, or the builtin one.
pub fn load_dictionary(config: &Config) -> Result<Dictionary> {
    match &config.dictionary {
        Some(path) => Dictionary::from_path(path)
            .with_context(|| format!("Failed to load dictionary {}", path.display())),
        None => Dictionary::builtin().context("Failed to load builtin dictionary"),
    }
}

/// Parse hex input, ignoring whitespace, `:` separators and a `0x` prefix.
pub fn parse_hex(input: &str) -> Result<Vec<u8>> {
    let trimmed = input.trim();
    let trimmed = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let digits: String = trimmed
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    hex::decode(&digits).with_context(|| format!("Invalid hex input '{}'", input.trim()))
}

/// Service behind the `decode`, `encode`, `dissect`, `filter`, `list`,
/// `compat` and `compare-versions` subcommands.
pub struct FrameService {
    config: Config,
    dictionary: Arc<Dictionary>,
    adapter: OutputAdapter,
}

impl FrameService {
    pub fn new(config: Config, format: Option<OutputFormat>) -> Result<Self> {
        let dictionary = Arc::new(load_dictionary(&config)?);
        let adapter = OutputAdapter::new(format.unwrap_or(config.output));
        info!(
            "Dictionary version {} with {} commands",
            dictionary.version(),
            dictionary.len()
        );
        Ok(Self {
            config,
            dictionary,
            adapter,
        })
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    fn codec(&self) -> Codec {
        Codec::new(Arc::clone(&self.dictionary)).with_policy(self.config.decode_policy())
    }

    /// Filter built from the `[filter]` section.
    pub fn filter(&self) -> Result<CommandFilter> {
        CommandFilter::from_config(&self.config.filter, &self.dictionary)
            .context("Invalid filter configuration")
    }

    /// Decoder with the configured filter and a logging listener on every
    /// dictionary command.
    fn decoder(&self) -> Result<CommandDecoder> {
        let mut decoder = CommandDecoder::new(self.codec()).with_filter(self.filter()?);
        for spec in self.dictionary.commands() {
            let dictionary = Arc::clone(&self.dictionary);
            decoder.register(spec.path, move |frame: &CommandFrame<'_>| {
                info!("Received {}", describe(frame, &dictionary));
            });
        }
        Ok(decoder)
    }

    fn read_input(input: Option<String>) -> Result<String> {
        match input {
            Some(text) => Ok(text),
            None => {
                let mut text = String::new();
                io::stdin()
                    .read_to_string(&mut text)
                    .context("Failed to read stdin")?;
                if text.trim().is_empty() {
                    error!("No input received from stdin");
                    bail!("No input received from stdin");
                }
                Ok(text)
            }
        }
    }

    /// Decode one command buffer given as hex.
    pub fn decode(&self, input: Option<String>) -> Result<i32> {
        let bytes = parse_hex(&Self::read_input(input)?)?;
        debug!("Decoding {} bytes", bytes.len());

        let decoder = self.decoder()?;
        let path = peek_path(&bytes).context("Failed to decode command")?;
        let (outcome, frame) = decoder
            .decode_frame(&bytes)
            .context("Failed to decode command")?;
        let status = decoder.status(path);

        // The decoder never parses a blocked buffer; show what we can
        let frame = match frame {
            Some(frame) => Some(frame),
            None => decoder
                .codec()
                .decode(&bytes)
                .map_err(|e| debug!("Blocked buffer does not decode: {}", e))
                .ok(),
        };

        println!(
            "{}",
            self.adapter
                .format_decode(&self.dictionary, path, frame.as_ref(), status, outcome)?
        );
        Ok(if outcome == DecodeOutcome::Blocked {
            EXIT_BLOCKED
        } else {
            EXIT_OK
        })
    }

    /// Encode a command from its name and argument literals.
    pub fn encode(&self, name: &str, literals: &[String]) -> Result<i32> {
        let path = self.dictionary.resolve_path(name)?;
        let spec = self
            .dictionary
            .command(path)
            .with_context(|| format!("Unknown command: {}", name))?;
        let args = parse_args(spec, literals, self.dictionary.enums())
            .with_context(|| format!("Invalid arguments for {}", spec.qualified_name))?;
        let frame = CommandFrame::new(path, args);
        let bytes = self.codec().encode(&frame)?;
        let status = self.filter()?.filter_command(&bytes);
        debug!("Encoded {} into {} bytes", spec.qualified_name, bytes.len());

        println!(
            "{}",
            self.adapter
                .format_encode(&self.dictionary, &frame, &bytes, status)?
        );
        Ok(exit_code_for(status))
    }

    /// Split a datagram into transport frames and decode its command buffers.
    pub fn dissect(&self, input: Option<String>) -> Result<i32> {
        let datagram = parse_hex(&Self::read_input(input)?)?;
        let report = self.decoder()?.decode_datagram(&datagram);
        println!("{}", self.adapter.format_datagram(&self.dictionary, &report)?);
        Ok(if report.framing_error.is_some() {
            EXIT_ERROR
        } else {
            EXIT_OK
        })
    }

    /// Evaluate the configured filter for a command name.
    pub fn filter_command(&self, name: &str) -> Result<i32> {
        let path = self.dictionary.resolve_path(name)?;
        let filter = self.filter()?;
        let status = filter.evaluate(path);
        let matched = filter.table()?.lookup(path).map(|(selector, _)| selector);
        println!(
            "{}",
            self.adapter
                .format_filter(&self.dictionary, path, status, matched)?
        );
        Ok(exit_code_for(status))
    }

    /// List dictionary commands, optionally of one project.
    pub fn list(&self, project: Option<&str>) -> Result<i32> {
        let project_id = match project {
            Some(name) => Some(
                self.dictionary
                    .resolve_selector(name)
                    .ok()
                    .and_then(|selector| match selector {
                        PathSelector::Project(id) => Some(id),
                        _ => None,
                    })
                    .with_context(|| format!("Unknown project: {}", name))?,
            ),
            None => None,
        };
        let commands = self
            .dictionary
            .commands()
            .filter(|spec| project_id.map_or(true, |id| spec.path.project == id));
        println!("{}", self.adapter.format_list(&self.dictionary, commands)?);
        Ok(EXIT_OK)
    }

    /// Check that `new` (the configured dictionary by default) only appends to `old`.
    pub fn compat(&self, old: &Path, new: Option<&Path>) -> Result<i32> {
        let old_dictionary = Dictionary::from_path(old)
            .with_context(|| format!("Failed to load dictionary {}", old.display()))?;
        let new_dictionary = match new {
            Some(path) => Arc::new(
                Dictionary::from_path(path)
                    .with_context(|| format!("Failed to load dictionary {}", path.display()))?,
            ),
            None => Arc::clone(&self.dictionary),
        };
        let report = check_compatibility(&old_dictionary, &new_dictionary);
        for violation in &report.violations {
            debug!("Compatibility violation: {}", violation);
        }
        println!(
            "{}",
            self.adapter.format_compat(
                old_dictionary.version(),
                new_dictionary.version(),
                &report
            )?
        );
        Ok(if report.is_compatible() {
            EXIT_OK
        } else {
            EXIT_ERROR
        })
    }

    /// Compare two version codes.
    pub fn compare_versions(&self, v1: &str, v2: &str) -> Result<i32> {
        let result = CompareResult::from(compare_version_codes(v1, v2));
        println!("{}", self.adapter.format_compare(result)?);
        Ok(EXIT_OK)
    }

    /// Build everything the configuration describes, reporting the first failure.
    pub fn check(&self) -> Result<()> {
        let filter = self.filter()?;
        let overrides = filter.table()?.len();
        info!("Configuration valid: {} filter overrides", overrides);
        Ok(())
    }
}
