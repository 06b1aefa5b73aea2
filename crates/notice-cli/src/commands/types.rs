//! Notice type management commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use notice_core::error::AppError;
use notice_entity::notice_type::{CreateNoticeType, DEFAULT_SENSITIVITY, NoticeType};

use crate::output::{self, OutputFormat};

/// Arguments for notice type commands
#[derive(Debug, Args)]
pub struct TypesArgs {
    /// Notice type subcommand
    #[command(subcommand)]
    pub command: TypesCommand,
}

/// Notice type subcommands
#[derive(Debug, Subcommand)]
pub enum TypesCommand {
    /// List registered notice types
    List,
    /// Create a notice type or update the one with the same label
    Create {
        /// Unique label
        label: String,
        /// Display name
        display: String,
        /// Description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Default spam sensitivity
        #[arg(short, long, default_value_t = DEFAULT_SENSITIVITY)]
        sensitivity: i32,
    },
}

/// Table row for a notice type
#[derive(Debug, Serialize, Tabled)]
struct NoticeTypeRow {
    label: String,
    display: String,
    sensitivity: i32,
    description: String,
}

impl From<NoticeType> for NoticeTypeRow {
    fn from(t: NoticeType) -> Self {
        Self {
            label: t.label,
            display: t.display,
            sensitivity: t.default_sensitivity,
            description: t.description,
        }
    }
}

/// Execute notice type commands
pub async fn execute(
    args: &TypesArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let state = super::build_state(config).await?;

    match &args.command {
        TypesCommand::List => {
            let rows: Vec<NoticeTypeRow> = state
                .notice_type_service
                .list()
                .await?
                .into_iter()
                .map(NoticeTypeRow::from)
                .collect();
            output::print_list(&rows, format);
        }
        TypesCommand::Create {
            label,
            display,
            description,
            sensitivity,
        } => {
            let (notice_type, change) = state
                .notice_type_service
                .create_notice_type(CreateNoticeType {
                    label: label.clone(),
                    display: display.clone(),
                    description: description.clone(),
                    default_sensitivity: *sensitivity,
                })
                .await?;
            output::print_success(&format!("Notice type '{label}' {change:?}"));
            output::print_item(&notice_type, format);
        }
    }

    state.stores.close().await;
    Ok(())
}
