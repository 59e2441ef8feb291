use candy_assets_sdk::{
    config::{Attribute, Creator, VideoConfig},
    create_json_assets, CollectionConfig,
};
use serde_json::Value;
use tempfile::TempDir;

fn config(supply: u32) -> CollectionConfig {
    CollectionConfig {
        nft_name: "Tiny Turtle".into(),
        collection_name: "Tiny Turtles".into(),
        family_name: "Turtle Co".into(),
        supply,
        description: "A turtle".into(),
        seller_fee_basis_points: 750,
        creators: vec![
            Creator {
                address: "CreatorWallet111".into(),
                share: 70,
            },
            Creator {
                address: "CreatorWallet222".into(),
                share: 30,
            },
        ],
        base_image_url: "https://img.example/turtles".into(),
        image_extension: "png".into(),
        video: None,
        symbol: Some("TT".into()),
        attributes: vec![Attribute {
            trait_type: "Shell".into(),
            value: "Gold".into(),
        }],
        original_filename_prefix: String::new(),
    }
}

fn read(dir: &TempDir, index: u32) -> anyhow::Result<Value> {
    let raw = std::fs::read_to_string(dir.path().join(format!("{index}.json")))?;
    Ok(serde_json::from_str(&raw)?)
}

#[tokio::test]
async fn writes_every_item() -> anyhow::Result<()> {
    let dir = TempDir::new()?;

    let report = create_json_assets(&config(5), dir.path()).await;

    assert_eq!(report.written.len(), 5);
    assert!(report.failed.is_empty());
    for i in 0..5 {
        let doc = read(&dir, i)?;
        assert_eq!(doc["name"], format!("Tiny Turtle #{}", i + 1));
        assert_eq!(
            doc["image"],
            format!("https://img.example/turtles/{i}.png?ext=png")
        );
    }
    assert!(!dir.path().join("5.json").exists());
    Ok(())
}

#[tokio::test]
async fn document_carries_collection_fields() -> anyhow::Result<()> {
    let dir = TempDir::new()?;

    create_json_assets(&config(1), dir.path()).await;
    let doc = read(&dir, 0)?;

    assert_eq!(doc["symbol"], "TT");
    assert_eq!(doc["description"], "A turtle");
    assert_eq!(doc["seller_fee_basis_points"], 750);
    assert_eq!(doc["collection"]["name"], "Tiny Turtles");
    assert_eq!(doc["attributes"][0]["trait_type"], "Shell");
    assert_eq!(doc["properties"]["category"], "image");
    assert_eq!(doc["properties"]["creators"][1]["share"], 30);
    assert!(doc.get("animation_url").is_none());
    Ok(())
}

#[tokio::test]
async fn video_collection_adds_animation() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let mut c = config(2);
    c.video = Some(VideoConfig {
        base_url: "https://vid.example/".into(),
        extension: "mp4".into(),
    });

    create_json_assets(&c, dir.path()).await;
    let doc = read(&dir, 1)?;

    assert_eq!(doc["animation_url"], "https://vid.example/1.mp4?ext=mp4");
    assert_eq!(doc["properties"]["category"], "video");
    assert_eq!(doc["properties"]["files"][1]["type"], "video/mp4");
    Ok(())
}

#[tokio::test]
async fn missing_directory_reports_failures() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let missing = dir.path().join("not-created");

    let report = create_json_assets(&config(3), &missing).await;

    assert!(report.written.is_empty());
    assert_eq!(
        report.failed.iter().map(|(i, _)| *i).collect::<Vec<_>>(),
        [0, 1, 2]
    );
    Ok(())
}
