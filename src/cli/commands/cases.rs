use super::CommandContext;
use crate::cli::ui::with_spinner;
use aether_cli::api::Case;
use anyhow::{Context, Result};
use clap::{ArgGroup, Args, Subcommand};
use colored::*;
use serde_json::Value;

#[derive(Args)]
pub struct CasesCommands {
    #[command(subcommand)]
    pub command: CasesSubcommands,
}

#[derive(Subcommand)]
pub enum CasesSubcommands {
    /// List all cases stored on the server
    List(ListArgs),
    /// Create or update a case
    Save(SaveArgs),
}

#[derive(Args)]
pub struct ListArgs {
    /// Print the raw JSON array
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
#[command(group(ArgGroup::new("source").required(true).args(["name", "json"])))]
pub struct SaveArgs {
    /// Case name
    #[arg(long)]
    pub name: Option<String>,

    /// Existing case id to update
    #[arg(long, requires = "name")]
    pub id: Option<i64>,

    /// Extra field as key=value, the value is parsed as JSON when possible
    #[arg(long = "field", requires = "name")]
    pub fields: Vec<String>,

    /// Full case document as JSON
    #[arg(long)]
    pub json: Option<String>,
}

pub async fn cases_command(args: CasesCommands, context: &CommandContext) -> Result<()> {
    match args.command {
        CasesSubcommands::List(list) => list_cases(list, context).await,
        CasesSubcommands::Save(save) => save_case(save, context).await,
    }
}

async fn list_cases(args: ListArgs, context: &CommandContext) -> Result<()> {
    let cases = with_spinner("Loading cases", context.gateway.load_all_cases())
        .await
        .context("Failed to load cases")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&cases).context("Failed to format cases")?);
        return Ok(());
    }

    if cases.is_empty() {
        println!("{}", "No cases stored".dimmed());
        return Ok(());
    }

    println!("{}", "Cases:".bold());
    for case in &cases {
        let id = case.id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string());
        println!("  {:>5}  {}", id.cyan(), case.display_name());
    }
    println!();
    println!("{} case(s)", cases.len().to_string().bright_green());
    Ok(())
}

async fn save_case(args: SaveArgs, context: &CommandContext) -> Result<()> {
    let case = build_case(&args)?;

    let saved = with_spinner("Saving case", context.gateway.save_case_as_current(&case))
        .await
        .context("Failed to save case")?;

    let id = saved.id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string());
    println!(
        "{} Saved case {} (id {})",
        "✓".bright_green(),
        saved.display_name().bold(),
        id.cyan()
    );
    Ok(())
}

/// Keys with their own flags
const RESERVED_FIELDS: [&str; 2] = ["id", "name"];

fn build_case(args: &SaveArgs) -> Result<Case> {
    if let Some(json) = &args.json {
        return serde_json::from_str(json).context("Invalid case JSON");
    }

    let name = args.name.as_deref().unwrap_or_default();
    let mut case = Case::new(name);
    case.id = args.id;
    for field in &args.fields {
        let (key, raw) = field
            .split_once('=')
            .with_context(|| format!("Invalid field '{}', expected key=value", field))?;
        let key = key.trim();
        if RESERVED_FIELDS.contains(&key) {
            anyhow::bail!("Field '{}' is reserved, use --{} instead", key, key);
        }
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        case = case.with_field(key, value);
    }
    Ok(case)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn save_args(fields: &[&str]) -> SaveArgs {
        SaveArgs {
            name: Some("Anna".to_string()),
            id: Some(4),
            fields: fields.iter().map(|f| f.to_string()).collect(),
            json: None,
        }
    }

    #[test]
    fn test_build_case_from_fields() {
        let case = build_case(&save_args(&["age=42", "color=blue"])).unwrap();
        assert_eq!(case.id, Some(4));
        assert_eq!(case.name.as_deref(), Some("Anna"));
        assert_eq!(case.fields["age"], Value::from(42));
        assert_eq!(case.fields["color"], Value::from("blue"));
    }

    #[test]
    fn test_build_case_rejects_malformed_field() {
        assert!(build_case(&save_args(&["nonsense"])).is_err());
    }

    #[test]
    fn test_build_case_rejects_reserved_fields() {
        for field in ["id=5", "name=B", " id =5"] {
            let err = build_case(&save_args(&[field])).unwrap_err();
            assert!(err.to_string().contains("reserved"), "{}", field);
        }

        let case = build_case(&save_args(&["identity=x"])).unwrap();
        let body = serde_json::to_string(&case).unwrap();
        assert_eq!(body, r#"{"id":4,"name":"Anna","identity":"x"}"#);
    }

    #[test]
    fn test_build_case_from_json() {
        let args = SaveArgs {
            name: None,
            id: None,
            fields: Vec::new(),
            json: Some(r#"{"id": 7, "name": "Bo", "notes": "x"}"#.to_string()),
        };
        let case = build_case(&args).unwrap();
        assert_eq!(case.id, Some(7));
        assert_eq!(case.fields["notes"], Value::from("x"));
    }
}
