//! Command implementations

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use gemma_adapter_xml::{XmlConfig, XmlReader};
use gemma_mapping::MappingRuntime;
use gemma_schema::{Schema, SchemaLoader};
use gemma_tree::Node;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::CliConfig;

/// Response document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    Json,
    Xml,
}

impl InputFormat {
    /// Guess the format from the file extension (`.json*` or `.xml*`)
    pub fn detect(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        if extension.starts_with("json") {
            Some(InputFormat::Json)
        } else if extension.starts_with("xml") {
            Some(InputFormat::Xml)
        } else {
            None
        }
    }
}

/// Inputs shared by the mapping commands
#[derive(Debug, Clone)]
pub struct MappingInputs {
    pub schema: PathBuf,
    pub input: PathBuf,
    pub input_format: Option<InputFormat>,
}

/// Load and validate a mapping schema
pub fn load_schema(path: &Path, root_key: &str) -> Result<Schema> {
    SchemaLoader::new()
        .with_root_key(root_key)
        .load_from_file(path)
        .with_context(|| format!("failed to load schema {}", path.display()))
}

/// Read a response document as JSON or XML
pub fn read_response(path: &Path, format: Option<InputFormat>, xml: &XmlConfig) -> Result<Node> {
    let Some(format) = format.or_else(|| InputFormat::detect(path)) else {
        bail!(
            "cannot tell the format of {} from its extension; pass --input-format",
            path.display()
        );
    };

    match format {
        InputFormat::Json => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            gemma_tree::parse_json(&content)
                .with_context(|| format!("failed to parse JSON {}", path.display()))
        }
        InputFormat::Xml => XmlReader::with_config(xml.clone())
            .read_file(path)
            .with_context(|| format!("failed to read XML {}", path.display())),
    }
}

/// Map a response through a schema and write the JSON result
pub fn run_map(inputs: &MappingInputs, output: Option<&Path>, config: &CliConfig) -> Result<()> {
    info!(
        "Mapping {} with schema {}",
        inputs.input.display(),
        inputs.schema.display()
    );
    let schema = load_schema(&inputs.schema, &config.schema_root)?;
    let response = read_response(&inputs.input, inputs.input_format, &config.xml)?;

    let result = MappingRuntime::new().execute(&schema, &response);
    let text = gemma_tree::to_json_string(&result.document, config.indent)?;
    write_output(&text, output)
}

/// Print the flattened `[path, value]` entries
pub fn run_flatten(inputs: &MappingInputs, config: &CliConfig) -> Result<()> {
    let schema = load_schema(&inputs.schema, &config.schema_root)?;
    let response = read_response(&inputs.input, inputs.input_format, &config.xml)?;

    let entries = MappingRuntime::new().flatten(&schema, &response);
    let pairs = Node::Sequence(
        entries
            .into_iter()
            .map(|entry| Node::Sequence(vec![Node::string(entry.path), entry.value]))
            .collect(),
    );
    let text = gemma_tree::to_json_string(&pairs, config.indent)?;
    write_output(&text, None)
}

/// Validate a schema and list its fields
pub fn run_check(schema_path: &Path, config: &CliConfig) -> Result<()> {
    let schema = load_schema(schema_path, &config.schema_root)?;
    let fields = schema.fields();

    let mut report = format!("{}: {} field(s)\n", schema_path.display(), fields.len());
    for field in &fields {
        report.push_str(&format!(
            "  {} <- {} ({})\n",
            field.output_path, field.spec.path, field.spec.field_type
        ));
    }

    std::io::stdout()
        .write_all(report.as_bytes())
        .context("failed to write to stdout")
}

fn write_output(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, format!("{text}\n"))
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
            Ok(())
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{text}").context("failed to write to stdout")
        }
    }
}
