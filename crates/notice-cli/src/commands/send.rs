//! Send and broadcast commands.

use clap::Args;
use serde_json::{Map, Value};

use notice_core::config::DispatchMode;
use notice_core::error::AppError;
use notice_core::types::ObjectRef;
use notice_core::types::id::UserId;
use notice_service::{BroadcastRequest, EmitRequest, SendRequest};

use crate::output::{self, OutputFormat};

/// Options shared by send and broadcast
#[derive(Debug, Args)]
pub struct EmitOptions {
    /// Notice type label
    #[arg(short, long)]
    pub label: String,

    /// Extra template context as a JSON object
    #[arg(long, default_value = "{}")]
    pub context: String,

    /// Sender object as `content_type/object_id`
    #[arg(long)]
    pub sender: Option<String>,

    /// Enqueue for the worker instead of delivering now
    #[arg(long)]
    pub queue: bool,
}

/// Arguments for the send command
#[derive(Debug, Args)]
pub struct SendArgs {
    #[command(flatten)]
    pub options: EmitOptions,

    /// Recipient user id (repeatable)
    #[arg(short, long = "user", required = true)]
    pub users: Vec<UserId>,
}

/// Arguments for the broadcast command
#[derive(Debug, Args)]
pub struct BroadcastArgs {
    #[command(flatten)]
    pub options: EmitOptions,

    /// User id to leave out (repeatable)
    #[arg(long = "exclude")]
    pub exclude: Vec<UserId>,
}

impl EmitOptions {
    fn extra_context(&self) -> Result<Map<String, Value>, AppError> {
        match serde_json::from_str::<Value>(&self.context)? {
            Value::Object(map) => Ok(map),
            _ => Err(AppError::validation("--context must be a JSON object")),
        }
    }

    fn sender(&self) -> Result<Option<ObjectRef>, AppError> {
        self.sender
            .as_deref()
            .map(|s| {
                let (content_type, object_id) = s.split_once('/').ok_or_else(|| {
                    AppError::validation("--sender must look like content_type/object_id")
                })?;
                ObjectRef::new(content_type, object_id)
            })
            .transpose()
    }

    fn mode(&self) -> DispatchMode {
        if self.queue {
            DispatchMode::Queued
        } else {
            DispatchMode::Immediate
        }
    }
}

/// Execute the send command
pub async fn execute_send(
    args: &SendArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let opts = &args.options;
    let request = EmitRequest::Send(SendRequest {
        users: args.users.clone(),
        label: opts.label.clone(),
        extra_context: opts.extra_context()?,
        sender: opts.sender()?,
    });
    emit(request, opts.mode(), config_path, format).await
}

/// Execute the broadcast command
pub async fn execute_broadcast(
    args: &BroadcastArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let opts = &args.options;
    let request = EmitRequest::Broadcast(BroadcastRequest {
        label: opts.label.clone(),
        extra_context: opts.extra_context()?,
        sender: opts.sender()?,
        exclude: args.exclude.clone(),
    });
    emit(request, opts.mode(), config_path, format).await
}

async fn emit(
    request: EmitRequest,
    mode: DispatchMode,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let state = super::build_state(config).await?;
    let outcome = state.dispatcher.dispatch_with(mode, request).await?;
    output::print_success(&format!("Notice {}", outcome_label(mode)));
    output::print_item(&outcome, format);
    state.stores.close().await;
    Ok(())
}

fn outcome_label(mode: DispatchMode) -> &'static str {
    match mode {
        DispatchMode::Queued => "queued",
        _ => "delivered",
    }
}
