use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;

use lantern_core::provider::Provider;
use lantern_core::resource::{ResourceId, Value};
use lantern_core::schema::{AttributeMode, ResourceSchema};
use lantern_provider_aws::lightsail::instance::{self, RESOURCE_TYPE};
use lantern_provider_aws::{AwsProvider, IgnoreTagsConfig, ProviderConfig};

#[derive(Parser)]
#[command(name = "lantern")]
#[command(about = "Read AWS Lightsail instances as declarative data sources", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a Lightsail instance and print its attributes as JSON
    Read(ReadArgs),
    /// Show the aws_lightsail_instance schema
    Schema,
}

#[derive(clap::Args)]
struct ReadArgs {
    /// Lightsail instance name
    name: String,

    /// Availability zone the instance was declared in
    #[arg(long)]
    availability_zone: String,

    /// Blueprint the instance was declared with
    #[arg(long)]
    blueprint_id: String,

    /// Bundle the instance was declared with
    #[arg(long)]
    bundle_id: String,

    /// Lightsail key pair name
    #[arg(long)]
    key_pair_name: Option<String>,

    /// Launch script to echo back (Lightsail never returns it)
    #[arg(long)]
    user_data: Option<String>,

    /// Binding name of the data source block
    #[arg(long, default_value = "this")]
    binding: String,

    /// AWS region (e.g. us-east-1 or aws.Region.us_east_1)
    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,

    /// Provider configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tag key to hide from the output (repeatable)
    #[arg(long = "ignore-tag")]
    ignore_tags: Vec<String>,

    /// Tag key prefix to hide from the output (repeatable)
    #[arg(long = "ignore-tag-prefix")]
    ignore_tag_prefixes: Vec<String>,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Read(args) => run_read(args).await,
        Commands::Schema => {
            print_schema(&instance::schema());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run_read(args: ReadArgs) -> Result<(), String> {
    let config = load_provider_config(
        args.config.as_deref(),
        args.region.as_deref(),
        &args.ignore_tags,
        &args.ignore_tag_prefixes,
    )?;
    log::debug!("Provider configuration: {:?}", config);

    let provider = AwsProvider::new(config).await;
    let id = ResourceId::new(RESOURCE_TYPE, &args.binding);
    let attributes = data_source_attributes(&args);

    let state = provider
        .read_data_source(&id, &args.name, &attributes)
        .await
        .map_err(|e| error_chain(&e))?;

    if !state.exists {
        eprintln!(
            "{} {} not found, removing from state",
            "Warning:".yellow().bold(),
            id
        );
        return Ok(());
    }

    let output = serde_json::to_string_pretty(&state.attributes_json())
        .map_err(|e| format!("Failed to serialize attributes: {}", e))?;
    println!("{}", output);
    Ok(())
}

/// Merge provider settings: config file first, then flags
fn load_provider_config(
    path: Option<&Path>,
    region: Option<&str>,
    ignore_keys: &[String],
    ignore_prefixes: &[String],
) -> Result<ProviderConfig, String> {
    let mut config = match path {
        Some(path) => {
            let attributes = read_config_file(path)?;
            ProviderConfig::from_attributes(&attributes).map_err(|e| {
                format!("Invalid provider configuration in {}: {}", path.display(), e)
            })?
        }
        None => ProviderConfig::default(),
    };

    if let Some(region) = region {
        config = config.with_region(region).map_err(|e| e.to_string())?;
    }

    let mut ignore_tags = IgnoreTagsConfig::new();
    for key in ignore_keys {
        ignore_tags = ignore_tags.with_key(key);
    }
    for prefix in ignore_prefixes {
        ignore_tags = ignore_tags.with_key_prefix(prefix);
    }
    config.ignore_tags.merge(ignore_tags);

    Ok(config)
}

/// Parse a JSON provider block into attributes
fn read_config_file(path: &Path) -> Result<HashMap<String, Value>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let json: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;

    match Value::from_json(&json) {
        Some(Value::Map(attributes)) => Ok(attributes),
        _ => Err(format!("{} must contain a JSON object", path.display())),
    }
}

/// Render an error followed by its sources
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(&format!(": {}", cause));
        source = cause.source();
    }
    message
}

fn data_source_attributes(args: &ReadArgs) -> HashMap<String, Value> {
    let mut attributes = HashMap::new();
    let mut set = |key: &str, value: &str| {
        attributes.insert(key.to_string(), Value::String(value.to_string()));
    };

    set("name", &args.name);
    set("availability_zone", &args.availability_zone);
    set("blueprint_id", &args.blueprint_id);
    set("bundle_id", &args.bundle_id);
    if let Some(key_pair_name) = &args.key_pair_name {
        set("key_pair_name", key_pair_name);
    }
    if let Some(user_data) = &args.user_data {
        set("user_data", user_data);
    }
    attributes
}

fn print_schema(schema: &ResourceSchema) {
    println!("{}", schema.resource_type.cyan().bold());
    if let Some(desc) = &schema.description {
        println!("  {}", desc.dimmed());
    }
    println!();

    for name in schema.attribute_names() {
        let attr = &schema.attributes[name];
        let mode = match attr.mode {
            AttributeMode::Required => "required".red(),
            AttributeMode::Optional => "optional".yellow(),
            AttributeMode::Computed => "computed".green(),
        };
        let mut line = format!("  {:<20} {:<14} {}", name, attr.attr_type.to_string(), mode);
        if let Some(message) = &attr.deprecated {
            line.push_str(&format!(" {}", format!("(deprecated: {})", message).dimmed()));
        }
        println!("{}", line);
    }
}
