use clap::{Parser, Subcommand, ValueEnum};
use form_model::{
    FormObjectField, FormSchema, FormValue, MessageCatalog, ValidationResult, values_schema,
};
use serde_json::{Value, json};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Form schema checker and value validator",
    long_about = "Builds form trees from JSON schemas, fills them with values and reports validation errors"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a values document against a form schema.
    Validate {
        /// Path to the FormSchema JSON.
        #[arg(long, value_name = "SCHEMA")]
        schema: PathBuf,
        /// Path to the values JSON file.
        #[arg(long, value_name = "VALUES")]
        values: PathBuf,
        /// Optional message catalog overriding the error wording.
        #[arg(long, value_name = "MESSAGES", env = "FORM_MODEL_MESSAGES")]
        messages: Option<PathBuf>,
        /// Report format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Check a form schema for structural problems.
    Check {
        /// Path to the FormSchema JSON.
        #[arg(long, value_name = "SCHEMA")]
        schema: PathBuf,
    },
    /// Print the JSON Schema of the values produced by a form.
    ValuesSchema {
        /// Path to the FormSchema JSON.
        #[arg(long, value_name = "SCHEMA")]
        schema: PathBuf,
    },
    /// Print the JSON Schema of the FormSchema document format.
    Schema,
}

/// Returned when the values document fails validation; exits with status 1.
#[derive(Debug, Error)]
#[error("validation failed with {errors} error(s)")]
struct ValidationFailed {
    errors: usize,
}

/// Outcome of validating one values document.
struct Report {
    title: String,
    result: ValidationResult,
    values: Value,
    ignored: Vec<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "form_model=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            exit_code(err.as_ref())
        }
    }
}

fn exit_code(err: &(dyn std::error::Error + 'static)) -> ExitCode {
    if err.is::<ValidationFailed>() {
        ExitCode::from(1)
    } else {
        ExitCode::from(2)
    }
}

fn run(command: Command) -> CliResult<()> {
    match command {
        Command::Validate {
            schema,
            values,
            messages,
            format,
        } => run_validate(&schema, &values, messages.as_deref(), format),
        Command::Check { schema } => run_check(&schema),
        Command::ValuesSchema { schema } => {
            let schema = load_schema(&schema)?;
            println!("{}", serde_json::to_string_pretty(&values_schema(&schema))?);
            Ok(())
        }
        Command::Schema => {
            let schema = schemars::schema_for!(FormSchema);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
    }
}

fn run_validate(
    schema_path: &Path,
    values_path: &Path,
    messages_path: Option<&Path>,
    format: OutputFormat,
) -> CliResult<()> {
    let schema = load_schema(schema_path)?;
    let messages = load_messages(messages_path)?;
    let values: Value = serde_json::from_str(&fs::read_to_string(values_path)?)?;

    let mut root = schema.build()?;
    let report = validate_document(&schema, &mut root, &values, &messages);
    tracing::debug!(
        form = %schema.id,
        valid = report.result.is_valid,
        ignored = report.ignored.len(),
        "validated values document"
    );

    match format {
        OutputFormat::Text => print!("{}", render_text(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&render_json(&report))?),
    }

    if report.result.is_valid {
        Ok(())
    } else {
        Err(ValidationFailed {
            errors: report.result.errors.len(),
        }
        .into())
    }
}

fn run_check(schema_path: &Path) -> CliResult<()> {
    let schema = load_schema(schema_path)?;
    schema.check()?;
    println!("Schema '{}' ({}) is well formed.", schema.id, schema.version);
    Ok(())
}

fn load_schema(path: &Path) -> CliResult<FormSchema> {
    let contents = fs::read_to_string(path)?;
    Ok(FormSchema::from_json_str(&contents)?)
}

fn load_messages(path: Option<&Path>) -> CliResult<MessageCatalog> {
    match path {
        Some(path) => Ok(MessageCatalog::from_json_str(&fs::read_to_string(path)?)?),
        None => Ok(MessageCatalog::default()),
    }
}

fn validate_document(
    schema: &FormSchema,
    root: &mut FormObjectField,
    values: &Value,
    messages: &MessageCatalog,
) -> Report {
    let ignored = root.apply_json(values);
    for path in &ignored {
        tracing::warn!(path = %path, "value not applied to the form");
    }
    Report {
        title: schema.title.clone(),
        result: root.validate_values_with(messages),
        values: FormValue::Object(root.values()).to_json(),
        ignored,
    }
}

fn render_text(report: &Report) -> String {
    let mut out = format!("Form: {}\n", report.title);
    if report.result.is_valid {
        out.push_str("Status: valid\n");
    } else {
        out.push_str("Status: invalid\n");
        out.push_str("Validation errors:\n");
        for error in &report.result.errors {
            out.push_str(&format!("  {}: {}\n", error.field_id, error.message));
        }
    }
    if !report.ignored.is_empty() {
        out.push_str(&format!("Ignored values: {}\n", report.ignored.join(", ")));
    }
    out.push_str("Values:\n");
    out.push_str(
        &serde_json::to_string_pretty(&report.values).unwrap_or_else(|_| report.values.to_string()),
    );
    out.push('\n');
    out
}

fn render_json(report: &Report) -> Value {
    json!({
        "title": report.title,
        "valid": report.result.is_valid,
        "errors": report.result.errors,
        "ignored": report.ignored,
        "values": report.values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOODS_SCHEMA: &str = include_str!("../../form-model/tests/fixtures/goods_form.json");

    fn goods_values() -> Value {
        json!({
            "name": "iPhone16Pro",
            "skus": [{ "name": "512G", "number": 10, "price": 1888 }]
        })
    }

    #[test]
    fn validate_document_reports_values_and_ignored_paths() {
        let schema = FormSchema::from_json_str(GOODS_SCHEMA).unwrap();
        let mut root = schema.build().unwrap();
        let mut values = goods_values();
        values["color"] = json!("black");

        let report = validate_document(&schema, &mut root, &values, &MessageCatalog::default());
        assert!(report.result.is_valid);
        assert_eq!(report.ignored, vec!["/color".to_string()]);
        assert_eq!(report.values["skus"][0]["price"], 1888);
    }

    #[test]
    fn render_text_lists_errors() {
        let schema = FormSchema::from_json_str(GOODS_SCHEMA).unwrap();
        let mut root = schema.build().unwrap();
        let report = validate_document(&schema, &mut root, &json!({}), &MessageCatalog::default());

        let text = render_text(&report);
        assert!(text.contains("Status: invalid"));
        assert!(text.contains("name: 名称不能为空"));
        assert!(text.contains("skus: SKU不能为空"));
    }

    #[test]
    fn load_messages_defaults_without_path() {
        let catalog = load_messages(None).unwrap();
        assert_eq!(catalog.required("名称"), "名称不能为空");
    }

    #[test]
    fn validation_failure_maps_to_status_one() {
        let failed: Box<dyn std::error::Error> = ValidationFailed { errors: 2 }.into();
        assert_eq!(failed.to_string(), "validation failed with 2 error(s)");
        assert_eq!(exit_code(failed.as_ref()), ExitCode::from(1));

        let other: Box<dyn std::error::Error> = "missing file".into();
        assert_eq!(exit_code(other.as_ref()), ExitCode::from(2));
    }
}
