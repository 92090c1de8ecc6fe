use anyhow::bail;
use clap::Subcommand;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::config::{self, DatabaseConfig};
use crate::database::{seed, DatabaseManager, Repository};

#[derive(Subcommand)]
pub enum DbCommands {
    #[command(about = "Create the journal and entry tables if they are missing")]
    Init,

    #[command(about = "Drop and recreate all tables, deleting every journal and entry")]
    Reset {
        #[arg(long, help = "Confirm that all data should be deleted")]
        yes: bool,
    },

    #[command(about = "Insert sample journals and entries")]
    Seed {
        #[arg(long, help = "Subject that owns the sample journals (defaults to DEFAULT_USER)")]
        owner: Option<String>,
    },
}

pub async fn handle(cmd: DbCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let app_config = config::config();
    let repo = open(&app_config.database).await?;

    match cmd {
        DbCommands::Init => {
            DatabaseManager::initialize_schema(repo.pool()).await?;
            report(&output_format, "init", &app_config.database.url, json!({}));
        }
        DbCommands::Reset { yes } => {
            if !yes {
                bail!("refusing to reset {} without --yes", app_config.database.url);
            }
            seed::reset(&repo).await?;
            report(&output_format, "reset", &app_config.database.url, json!({}));
        }
        DbCommands::Seed { owner } => {
            let owner = owner.unwrap_or_else(|| app_config.directory.default_user.clone());
            if owner.is_empty() {
                bail!("no owner given; pass --owner or set DEFAULT_USER");
            }

            let summary = seed::seed(&repo, &owner).await?;
            report(
                &output_format,
                "seed",
                &app_config.database.url,
                json!({
                    "owner": owner,
                    "journals": summary.journals,
                    "entries": summary.entries,
                }),
            );
        }
    }

    Ok(())
}

async fn open(database: &DatabaseConfig) -> anyhow::Result<Repository> {
    let pool = DatabaseManager::connect(database).await?;
    Ok(Repository::new(pool))
}

fn report(output_format: &OutputFormat, action: &str, database_url: &str, details: serde_json::Value) {
    match output_format {
        OutputFormat::Json => {
            let mut body = json!({ "success": true, "action": action, "database": database_url });
            if let (Some(body), Some(details)) = (body.as_object_mut(), details.as_object()) {
                body.extend(details.clone());
            }
            println!("{}", body);
        }
        OutputFormat::Text => {
            println!("{}: {}", action, database_url);
            if let Some(details) = details.as_object() {
                for (key, value) in details {
                    println!("  {}: {}", key, value);
                }
            }
        }
    }
}
