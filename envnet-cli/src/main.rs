use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;

use envnet_core::config::{Context, DeploymentConfig};
use envnet_core::graph;
use envnet_core::network::NetworkPlan;
use envnet_core::stack::{self, Stack};
use envnet_provider_aws::schemas::get_schema_config;
use envnet_provider_aws::{
    logical_id, render_manifest, render_template, template_file_name, validate_stack,
};

const MANIFEST_FILE: &str = "manifest.json";

#[derive(Parser)]
#[command(name = "envnet")]
#[command(about = "Generate an environment VPC as a CloudFormation template", long_about = None)]
struct Cli {
    /// Context variable (e.g., -c envType=prod); overrides the context file
    #[arg(short = 'c', long = "context", value_name = "KEY=VALUE", global = true)]
    context: Vec<String>,

    /// cdk.json-style context file
    #[arg(long, value_name = "PATH", global = true)]
    context_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the CloudFormation template and deployment manifest
    Synth {
        /// Output directory
        #[arg(short, long, default_value = "cdk.out")]
        output: PathBuf,

        /// Print the template to stdout instead of writing files
        #[arg(long)]
        stdout: bool,
    },
    /// Validate the declared resources
    Validate,
    /// Show the resolved CIDR plan
    Cidr,
    /// List declared resources in dependency order
    List,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = load_context(&cli.context, cli.context_file.as_deref())
        .and_then(|ctx| run(cli.command, &ctx));

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins over `-v`
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn run(command: Commands, ctx: &Context) -> Result<()> {
    let config = DeploymentConfig::from_context(ctx)?;

    match command {
        Commands::Synth { output, stdout } => {
            let stack = build_stack(&config)?;
            if stdout {
                let template = render_template(&stack)?;
                println!("{}", serde_json::to_string_pretty(&template)?);
                Ok(())
            } else {
                run_synth(&stack, &output)
            }
        }
        Commands::Validate => run_validate(&config),
        Commands::Cidr => {
            print_network_plan(&config, &config.network_plan());
            Ok(())
        }
        Commands::List => run_list(&config),
    }
}

/// Merge the context file (if any) with `-c` flags; flags win
fn load_context(entries: &[String], context_file: Option<&Path>) -> Result<Context> {
    let mut ctx = match context_file {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read context file: {}", path.display()))?;
            Context::from_json_str(&content)
                .with_context(|| format!("Failed to load context file: {}", path.display()))?
        }
        None => Context::new(),
    };
    ctx.merge(Context::from_entries(entries)?);
    log::debug!("Loaded {} context variable(s)", ctx.len());
    Ok(ctx)
}

/// Declare and validate the stack
fn build_stack(config: &DeploymentConfig) -> Result<Stack> {
    let stack = stack::declare(config);
    validate_stack(&stack)?;
    Ok(stack)
}

fn run_synth(stack: &Stack, output: &Path) -> Result<()> {
    let (template_path, manifest_path) = synth_to_dir(stack, output)?;

    println!(
        "{}",
        format!("✓ Synthesized {} ({} resources)", stack.name, stack.resources.len())
            .green()
            .bold()
    );
    println!("  • {}", template_path.display());
    println!("  • {}", manifest_path.display());
    Ok(())
}

/// Write the template and manifest into `dir`, returning their paths.
/// Both documents are rendered before anything is written.
fn synth_to_dir(stack: &Stack, dir: &Path) -> Result<(PathBuf, PathBuf)> {
    let template = serde_json::to_string_pretty(&render_template(stack)?)?;
    let manifest = serde_json::to_string_pretty(&render_manifest(stack))?;

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let template_path = dir.join(template_file_name(stack));
    fs::write(&template_path, template)
        .with_context(|| format!("Failed to write {}", template_path.display()))?;

    let manifest_path = dir.join(MANIFEST_FILE);
    fs::write(&manifest_path, manifest)
        .with_context(|| format!("Failed to write {}", manifest_path.display()))?;

    log::info!("Wrote {} and {}", template_path.display(), manifest_path.display());
    Ok((template_path, manifest_path))
}

fn run_validate(config: &DeploymentConfig) -> Result<()> {
    println!("{}", "Validating...".cyan());

    let stack = build_stack(config)?;

    println!(
        "{}",
        format!(
            "✓ {} resources validated successfully.",
            stack.resources.len()
        )
        .green()
        .bold()
    );

    for resource in &stack.resources {
        println!("  • {}", resource.id);
    }

    Ok(())
}

fn run_list(config: &DeploymentConfig) -> Result<()> {
    let stack = build_stack(config)?;

    println!("{}", format!("Stack {}:", stack.name).cyan().bold());
    for resource in graph::sort_by_dependencies(&stack.resources) {
        let aws_type = get_schema_config(&resource.id.resource_type)
            .map(|c| c.aws_type_name)
            .unwrap_or("?");
        println!(
            "  {} {} ({})",
            logical_id(resource.binding()).bold(),
            aws_type,
            resource.id
        );
    }
    Ok(())
}

fn print_network_plan(config: &DeploymentConfig, plan: &NetworkPlan) {
    println!(
        "{}",
        format!(
            "{} / {} ({} layout)",
            plan.env_type, plan.cidr_group, plan.layout
        )
        .cyan()
        .bold()
    );
    println!("  primary prefix:    {}", plan.allocation.primary);
    println!("  additional prefix: {}", plan.allocation.additional);
    println!("  primary block:     {}", plan.primary_block);
    if plan.has_distinct_additional_block() {
        println!("  additional block:  {}", plan.additional_block);
    } else {
        println!(
            "  additional block:  {} {}",
            plan.additional_block,
            "(same as primary)".dimmed()
        );
    }
    for subnet in &plan.subnets {
        println!(
            "  {:<18} {:<18} {}",
            subnet.role(),
            subnet.cidr.to_string(),
            config.availability_zone(subnet.zone)
        );
    }
    if !config.use_nat_gateway {
        println!("{}", "NAT gateway disabled".yellow());
    }
}
