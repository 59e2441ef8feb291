use candy_assets_sdk::rename_media_files;
use tempfile::TempDir;

fn touch(dir: &TempDir, name: &str) -> anyhow::Result<()> {
    std::fs::write(dir.path().join(name), name.as_bytes())?;
    Ok(())
}

#[tokio::test]
async fn prefixed_media_is_renamed() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    touch(&dir, "IMG_0.png")?;
    touch(&dir, "IMG_0.mp4")?;
    touch(&dir, "IMG_1.jpeg")?;
    touch(&dir, "IMG_2.gif")?;

    let report = rename_media_files(dir.path(), "IMG_", 3).await;

    assert_eq!(report.renamed.len(), 4);
    assert!(report.failed.is_empty());
    for name in ["0.png", "0.mp4", "1.jpeg", "2.gif"] {
        assert!(dir.path().join(name).exists(), "{name} should exist");
    }
    assert_eq!(std::fs::read_to_string(dir.path().join("0.png"))?, "IMG_0.png");
    assert!(!dir.path().join("IMG_0.png").exists());
    Ok(())
}

#[tokio::test]
async fn absent_files_are_counted_as_missing() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    touch(&dir, "IMG_1.jpg")?;

    let report = rename_media_files(dir.path(), "IMG_", 2).await;

    assert_eq!(report.renamed, [dir.path().join("1.jpg")]);
    assert_eq!(report.missing, 2 * 5 - 1);
    Ok(())
}

#[tokio::test]
async fn items_beyond_supply_are_untouched() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    touch(&dir, "IMG_0.png")?;
    touch(&dir, "IMG_5.png")?;

    rename_media_files(dir.path(), "IMG_", 2).await;

    assert!(dir.path().join("0.png").exists());
    assert!(dir.path().join("IMG_5.png").exists());
    Ok(())
}

#[tokio::test]
async fn other_extensions_are_ignored() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    touch(&dir, "IMG_0.webp")?;

    let report = rename_media_files(dir.path(), "IMG_", 1).await;

    assert!(report.renamed.is_empty());
    assert!(dir.path().join("IMG_0.webp").exists());
    Ok(())
}
