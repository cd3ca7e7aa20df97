use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;

use stratum_core::provider::Provider;
use stratum_core::resource::{ResourceId, Value};
use stratum_provider_aws::AwsProvider;
use stratum_provider_aws::bucket_acl::BucketAclId;
use stratum_provider_aws::config::ProviderConfig;
use stratum_provider_aws::default_tags;
use stratum_provider_aws::schemas;

#[derive(Parser)]
#[command(name = "stratum")]
#[command(about = "S3 bucket ACL identifiers and provider tooling", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bucket ACL identifier commands
    Id {
        #[command(subcommand)]
        command: IdCommands,
    },
    /// Validate a JSON attribute file against a resource schema
    Validate {
        /// Path to JSON file with the resource attributes
        file: PathBuf,

        /// Resource type (e.g., s3.bucket_acl)
        #[arg(long = "type", default_value = "s3.bucket_acl")]
        resource_type: String,
    },
    /// Show the default tags a provider configuration applies
    DefaultTags {
        /// Path to JSON provider configuration
        config: PathBuf,
    },
}

#[derive(Subcommand)]
enum IdCommands {
    /// Build an identifier from its parts
    Format {
        #[arg(long)]
        bucket: String,

        #[arg(long, default_value = "")]
        expected_bucket_owner: String,

        #[arg(long, default_value = "")]
        acl: String,
    },
    /// Split an identifier into its parts
    Parse {
        /// Identifier (e.g., my-bucket,123456789012/private)
        id: String,
    },
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Id { command } => run_id_command(command),
        Commands::Validate {
            file,
            resource_type,
        } => run_validate(&file, &resource_type),
        Commands::DefaultTags { config } => run_default_tags(&config).await,
    };

    match result {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run_id_command(command: IdCommands) -> Result<String, String> {
    match command {
        IdCommands::Format {
            bucket,
            expected_bucket_owner,
            acl,
        } => format_id(&bucket, &expected_bucket_owner, &acl),
        IdCommands::Parse { id } => parse_id(&id),
    }
}

fn format_id(bucket: &str, expected_bucket_owner: &str, acl: &str) -> Result<String, String> {
    if bucket.is_empty() {
        return Err("--bucket must not be empty".to_string());
    }
    Ok(BucketAclId::new(bucket, expected_bucket_owner, acl).to_string())
}

fn parse_id(id: &str) -> Result<String, String> {
    let parsed: BucketAclId = id.parse().map_err(|e| format!("{}", e))?;

    let mut lines = vec![format!("{} {}", "bucket:".bold(), parsed.bucket)];
    if let Some(owner) = parsed.expected_bucket_owner() {
        lines.push(format!("{} {}", "expected_bucket_owner:".bold(), owner));
    }
    if let Some(acl) = parsed.acl() {
        lines.push(format!("{} {}", "acl:".bold(), acl));
    }
    Ok(lines.join("\n"))
}

fn load_attributes(path: &Path) -> Result<HashMap<String, Value>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let json: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;

    match Value::from_json(&json) {
        Some(Value::Map(attributes)) => Ok(attributes),
        _ => Err(format!(
            "{}: expected a JSON object of attributes",
            path.display()
        )),
    }
}

fn run_validate(path: &Path, resource_type: &str) -> Result<String, String> {
    let schema = schemas::find_schema(resource_type)
        .ok_or_else(|| format!("Unknown resource type: {}", resource_type))?;

    let attributes = load_attributes(path)?;

    if let Err(errors) = schema.validate(&attributes) {
        let all_errors: Vec<String> = errors
            .iter()
            .map(|error| format!("{}: {}", resource_type, error))
            .collect();
        return Err(all_errors.join("\n"));
    }

    Ok(format!("{} {} is valid", "✓".green(), path.display()))
}

async fn run_default_tags(path: &Path) -> Result<String, String> {
    let config = ProviderConfig::load(path).map_err(|e| e.to_string())?;
    let provider = AwsProvider::new(config).await;

    let id = ResourceId::new(default_tags::RESOURCE_TYPE, "current");
    let state = provider.read(&id, None).await.map_err(|e| e.to_string())?;

    // Sorted for stable output
    let tags: BTreeMap<&String, serde_json::Value> = state
        .attributes
        .get("tags")
        .and_then(Value::as_map)
        .map(|tags| tags.iter().map(|(k, v)| (k, v.to_json())).collect())
        .unwrap_or_default();

    let output = serde_json::json!({
        "partition": state.identifier,
        "tags": tags,
    });
    serde_json::to_string_pretty(&output).map_err(|e| e.to_string())
}
