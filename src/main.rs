//! Semantic ACL command line
//!
//! Evaluates and inspects ACL attributes from a configured attribute store.

use anyhow::bail;
use clap::{Parser, Subcommand};
use semantic_acl::{
    access_control::{AccessEvaluator, AccessGuard, ActionKind, Actor, Resource},
    attributes::{AttributeReader, create_attribute_reader},
    config::{AppConfig, LogFormat, load_config},
};
use serde_json::json;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Semantic ACL - per-resource read and edit restrictions
#[derive(Parser, Debug)]
#[command(name = "semantic-acl")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "SEMANTIC_ACL_CONFIG", global = true)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "SEMANTIC_ACL_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decide whether an actor may perform an action on a resource
    Check {
        /// Resource title, optionally prefixed with its namespace (e.g. Template:Secret)
        #[arg(short, long)]
        resource: String,

        /// Action to check (read, edit)
        #[arg(short, long, default_value = "read")]
        action: String,

        /// Acting user; omit for an anonymous visitor
        #[arg(short, long)]
        user: Option<String>,

        /// Group memberships of the user (repeatable)
        #[arg(short, long = "group")]
        groups: Vec<String>,

        /// Treat the actor as exempt regardless of group rights
        #[arg(long)]
        exempt: bool,
    },

    /// Print the attributes stored for a resource
    Inspect {
        /// Resource title, optionally prefixed with its namespace
        #[arg(short, long)]
        resource: String,

        /// Action whose attributes to print (read, edit)
        #[arg(short, long, default_value = "read")]
        action: String,
    },
}

fn init_logging(config: &AppConfig, cli_level: Option<&str>) {
    let level = cli_level.unwrap_or(&config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    match config.logging.format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

fn parse_action(action: &str) -> anyhow::Result<ActionKind> {
    match ActionKind::try_parse(action) {
        Some(kind) => Ok(kind),
        None => bail!("unknown action '{}', expected 'read' or 'edit'", action),
    }
}

fn build_actor(config: &AppConfig, user: Option<&str>, groups: &[String], exempt: bool) -> Actor {
    let exempt = exempt || config.acl.is_exempt(groups);
    match user {
        Some(name) => Actor::registered(name)
            .with_groups(groups)
            .with_exempt(exempt),
        None => Actor::anonymous().with_groups(groups).with_exempt(exempt),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Configuration comes first so its logging section can apply
    let config = load_config(args.config.as_deref())?;
    init_logging(&config, args.log_level.as_deref());

    info!(version = env!("CARGO_PKG_VERSION"), "Starting semantic-acl");

    let reader = create_attribute_reader(&config.store);
    let guard = AccessGuard::new(AccessEvaluator::new(&config.acl), reader.clone());

    match args.command {
        Command::Check {
            resource,
            action,
            user,
            groups,
            exempt,
        } => {
            let resource = Resource::from_title_in(&resource, config.acl.known_namespaces());
            let action = parse_action(&action)?;
            let actor = build_actor(&config, user.as_deref(), &groups, exempt);
            debug!(actor = ?actor, "Resolved actor");

            let evaluation = guard
                .evaluate(&resource, action, &actor)
                .await
                .inspect_err(|e| error!(error = %e, "Access check failed"))?;

            let output = json!({
                "resource": resource.id,
                "namespace": resource.namespace,
                "action": action,
                "evaluation": evaluation,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Inspect { resource, action } => {
            let resource = Resource::from_title_in(&resource, config.acl.known_namespaces());
            let action = parse_action(&action)?;

            let attributes = reader
                .fetch_attributes(&resource, action)
                .await
                .inspect_err(|e| error!(error = %e, "Failed to read attributes"))?;

            let output = json!({
                "resource": resource.id,
                "namespace": resource.namespace,
                "acl_enabled": guard.evaluator().is_acl_enabled(&resource.namespace),
                "action": action,
                "attributes": attributes,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
