//! Create, update and delete command implementations.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use strapi::{Strapi, UploadFile};

use crate::output;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Collection type, e.g. articles
    pub collection: String,

    /// Entry fields as a JSON object
    #[arg(long, default_value = "{}")]
    pub data: String,

    /// File to attach as [FIELD=]PATH; repeatable
    #[arg(long)]
    pub file: Vec<FileArg>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Collection type, e.g. articles
    pub collection: String,

    /// Entry id
    pub id: String,

    /// Changed fields as a JSON object
    #[arg(long)]
    pub data: String,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Collection type, e.g. articles
    pub collection: String,

    /// Entry id
    pub id: String,
}

#[derive(Args, Debug)]
pub struct DeleteUploadArgs {
    /// Uploaded file id
    pub id: String,
}

/// One `--file` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileArg {
    pub field: Option<String>,
    pub path: PathBuf,
}

impl FromStr for FileArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, path) = match s.split_once('=') {
            Some((field, path)) => (Some(field.to_string()), path),
            None => (None, s),
        };
        if path.is_empty() {
            return Err(format!("missing file path in '{s}'"));
        }
        Ok(Self {
            field: field.filter(|f| !f.is_empty()),
            path: PathBuf::from(path),
        })
    }
}

fn parse_data(data: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(data).context("--data is not valid JSON")?;
    anyhow::ensure!(value.is_object(), "--data must be a JSON object");
    Ok(value)
}

fn content_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    Some(match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "json" => "application/json",
        "txt" | "md" => "text/plain",
        _ => return None,
    })
}

async fn load_file(arg: &FileArg) -> Result<UploadFile> {
    let bytes = tokio::fs::read(&arg.path)
        .await
        .with_context(|| format!("Failed to read {}", arg.path.display()))?;
    let name = arg
        .path
        .file_name()
        .and_then(|name| name.to_str())
        .context("File path has no usable file name")?;

    let mut file = UploadFile::new(name, bytes);
    if let Some(field) = &arg.field {
        file = file.for_field(field);
    }
    if let Some(mime) = content_type(&arg.path) {
        file = file.with_content_type(mime);
    }
    Ok(file)
}

pub async fn run_create(args: CreateArgs, strapi: &Strapi) -> Result<()> {
    let data = parse_data(&args.data)?;
    let query = strapi.collection(&args.collection);

    let created = if args.file.is_empty() {
        query.post(data).await
    } else {
        let mut files = Vec::with_capacity(args.file.len());
        for arg in &args.file {
            files.push(load_file(arg).await?);
        }
        query.post_files(data, &files).await
    }
    .context("Failed to create entry")?;

    output::written(&format!("Created entry in {}", args.collection), &created)
}

pub async fn run_update(args: UpdateArgs, strapi: &Strapi) -> Result<()> {
    let data = parse_data(&args.data)?;
    let updated = strapi
        .collection(&args.collection)
        .put(&args.id, data)
        .await
        .context("Failed to update entry")?;

    output::written(&format!("Updated {} {}", args.collection, args.id), &updated)
}

pub async fn run_delete(args: DeleteArgs, strapi: &Strapi) -> Result<()> {
    strapi
        .collection(&args.collection)
        .delete(&args.id)
        .await
        .context("Failed to delete entry")?;

    output::success(&format!("Deleted {} {}", args.collection, args.id));
    Ok(())
}

pub async fn run_delete_upload(args: DeleteUploadArgs, strapi: &Strapi) -> Result<()> {
    strapi
        .uploads()
        .delete(&args.id)
        .await
        .context("Failed to delete uploaded file")?;

    output::success(&format!("Deleted upload {}", args.id));
    Ok(())
}
