//! JSON metadata templating for a numbered collection.

use std::path::{Path, PathBuf};

use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{Attribute, CollectionConfig, Creator};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionInfo {
    pub name: String,
    pub family: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetFile {
    pub uri: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Properties {
    pub files: Vec<AssetFile>,
    pub category: String,
    pub creators: Vec<Creator>,
}

/// Off-chain metadata document for item `i` of the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetDocument {
    pub name: String,
    pub symbol: Option<String>,
    pub description: String,
    pub seller_fee_basis_points: u16,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation_url: Option<String>,
    pub attributes: Option<Vec<Attribute>>,
    pub collection: CollectionInfo,
    pub properties: Properties,
}

fn media_url(base: &str, index: u32, ext: &str) -> String {
    format!("{}/{index}.{ext}?ext={ext}", base.trim_end_matches('/'))
}

impl AssetDocument {
    pub fn build(config: &CollectionConfig, index: u32) -> Self {
        let image_ext = &config.image_extension;
        let image = media_url(&config.base_image_url, index, image_ext);
        let mut files = vec![AssetFile {
            uri: image.clone(),
            mime_type: format!("image/{image_ext}"),
        }];

        let animation_url = config.video.as_ref().map(|video| {
            let url = media_url(&video.base_url, index, &video.extension);
            files.push(AssetFile {
                uri: url.clone(),
                mime_type: format!("video/{}", video.extension),
            });
            url
        });
        let category = if animation_url.is_some() { "video" } else { "image" };

        let symbol = config.symbol.clone().filter(|s| !s.is_empty());
        let attributes = match config.attributes.first() {
            Some(first) if !first.trait_type.is_empty() => Some(config.attributes.clone()),
            _ => None,
        };

        Self {
            name: format!("{} #{}", config.nft_name, u64::from(index) + 1),
            symbol,
            description: config.description.clone(),
            seller_fee_basis_points: config.seller_fee_basis_points,
            image,
            animation_url,
            attributes,
            collection: CollectionInfo {
                name: config.collection_name.clone(),
                family: config.family_name.clone(),
            },
            properties: Properties {
                files,
                category: category.to_string(),
                creators: config.creators.clone(),
            },
        }
    }
}

/// Which documents were written and which failed.
#[derive(Debug, Default)]
pub struct TemplatingReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(u32, std::io::Error)>,
}

/// Write `<assets_dir>/<i>.json` for every item, all writes in flight at once.
pub async fn create_json_assets(config: &CollectionConfig, assets_dir: &Path) -> TemplatingReport {
    let writes = (0..config.supply).map(|i| write_asset(config, assets_dir, i));
    let mut report = TemplatingReport::default();
    for (i, result) in (0..config.supply).zip(join_all(writes).await) {
        match result {
            Ok(path) => report.written.push(path),
            Err(e) => {
                warn!("Failed to save json asset #{i}: {e}");
                report.failed.push((i, e));
            }
        }
    }
    info!(
        "Saved {} json assets ({} failed)",
        report.written.len(),
        report.failed.len()
    );
    report
}

async fn write_asset(
    config: &CollectionConfig,
    assets_dir: &Path,
    index: u32,
) -> std::io::Result<PathBuf> {
    let doc = AssetDocument::build(config, index);
    let body = serde_json::to_string_pretty(&doc)?;
    let path = assets_dir.join(format!("{index}.json"));
    tokio::fs::write(&path, body).await?;
    info!("Saved json asset #{index}");
    Ok(path)
}
