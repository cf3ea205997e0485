use anyhow::anyhow;
use clap::Args;

use studyshare_core::constants::NOTES_TABLE;
use studyshare_core::materials::{MaterialServiceTrait, NewStudyMaterial, RecordId};
use studyshare_core::query::SelectQuery;

use super::listing::print_material;
use crate::main_lib::AppState;

#[derive(Args, Debug)]
pub struct DownloadArgs {
    pub id: RecordId,
}

#[derive(Args, Debug)]
pub struct PublishArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub subject: String,

    #[arg(long)]
    pub grade: String,

    #[arg(long, default_value = "English")]
    pub medium: String,

    #[arg(long = "type", default_value = "Note")]
    pub material_type: String,

    /// Leave empty to publish anonymously
    #[arg(long, default_value = "")]
    pub author: String,

    #[arg(long)]
    pub year: Option<i32>,

    /// URL of the already uploaded file
    #[arg(long)]
    pub file_url: String,

    #[arg(long)]
    pub file_size: Option<String>,
}

pub async fn download(state: &AppState, args: DownloadArgs) -> anyhow::Result<()> {
    let query = SelectQuery::new(NOTES_TABLE).eq("id", args.id.clone());
    let material = state
        .materials
        .list_materials(&query)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("No material with id {}", args.id))?;

    match state.materials.record_download(&material).await {
        Some(url) => println!("{}", url),
        None => println!("'{}' has no file attached", material.title),
    }
    Ok(())
}

pub async fn publish(state: &AppState, args: PublishArgs) -> anyhow::Result<()> {
    let material = state
        .materials
        .publish_material(NewStudyMaterial {
            title: args.title,
            subject: args.subject,
            grade: args.grade,
            medium: args.medium,
            material_type: args.material_type,
            author: args.author,
            year: args.year,
            file_url: args.file_url,
            file_size: args.file_size,
        })
        .await?;
    println!("Published:");
    print_material(&material);
    Ok(())
}
