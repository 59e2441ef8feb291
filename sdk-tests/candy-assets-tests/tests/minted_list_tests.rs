use candy_assets_sdk::{MintListError, MintListSource, TokenId};
use candy_assets_tests::{stderr, tokens, updated, ScriptedRunner};
use tempfile::TempDir;

const MINTS: &str = r#"["MintA", "MintB", "MintC"]"#;

#[tokio::test]
async fn existing_cache_is_used_without_snapshot() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let runner = ScriptedRunner::default();
    let source = MintListSource::new(runner.clone(), "CandyMachine1", dir.path());
    std::fs::write(source.cache_path(), MINTS)?;

    let list = source.load(false).await?;

    assert_eq!(list, tokens(&["MintA", "MintB", "MintC"]));
    assert!(runner.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn missing_cache_triggers_snapshot() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let cache = dir.path().join("CandyMachine1_mint_accounts.json");
    let runner = ScriptedRunner::default()
        .snapshot_then(updated())
        .snapshot_writes(&cache, MINTS);
    let source = MintListSource::new(runner.clone(), "CandyMachine1", dir.path());
    assert_eq!(source.cache_path(), cache);

    let list = source.load(false).await?;

    assert_eq!(list.len(), 3);
    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0],
        [
            "snapshot".to_string(),
            "mints".into(),
            "-c".into(),
            "CandyMachine1".into(),
            "--v2".into(),
            "--timeout".into(),
            "240".into(),
            "--output".into(),
            dir.path().display().to_string(),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn forced_refresh_replaces_cache() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let cache = dir.path().join("CandyMachine1_mint_accounts.json");
    std::fs::write(&cache, r#"["Stale"]"#)?;
    let runner = ScriptedRunner::default()
        .snapshot_then(updated())
        .snapshot_writes(&cache, MINTS);
    let source = MintListSource::new(runner.clone(), "CandyMachine1", dir.path());

    let list = source.load(true).await?;

    assert_eq!(list[0], TokenId::from("MintA"));
    assert_eq!(runner.calls().len(), 1);
    Ok(())
}

#[tokio::test]
async fn snapshot_stderr_is_retried() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let cache = dir.path().join("CandyMachine1_mint_accounts.json");
    let runner = ScriptedRunner::default()
        .snapshot_then(stderr("Error: 429 Too Many Requests"))
        .snapshot_then(None)
        .snapshot_then(updated())
        .snapshot_writes(&cache, MINTS);
    let source = MintListSource::new(runner.clone(), "CandyMachine1", dir.path());

    let list = source.load(false).await?;

    assert_eq!(list.len(), 3);
    assert_eq!(runner.calls().len(), 3);
    Ok(())
}

#[tokio::test]
async fn snapshot_failure_without_cache_is_fatal() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let runner = ScriptedRunner::default();
    let source = MintListSource::new(runner.clone(), "CandyMachine1", dir.path());

    let err = source.load(false).await.unwrap_err();

    assert!(matches!(err, MintListError::Snapshot { attempts: 3, .. }));
    assert_eq!(runner.calls().len(), 3);
    Ok(())
}

#[tokio::test]
async fn snapshot_failure_falls_back_to_cache() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let runner = ScriptedRunner::default();
    let source = MintListSource::new(runner.clone(), "CandyMachine1", dir.path());
    std::fs::write(source.cache_path(), MINTS)?;

    let list = source.load(true).await?;

    assert_eq!(list.len(), 3);
    assert_eq!(runner.calls().len(), 3);
    Ok(())
}

#[tokio::test]
async fn empty_cache_is_rejected() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let source = MintListSource::new(ScriptedRunner::default(), "CandyMachine1", dir.path());
    std::fs::write(source.cache_path(), "[]")?;

    let err = source.load(false).await.unwrap_err();

    assert!(matches!(err, MintListError::Empty { .. }));
    Ok(())
}

#[tokio::test]
async fn malformed_cache_is_rejected() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let source = MintListSource::new(ScriptedRunner::default(), "CandyMachine1", dir.path());
    std::fs::write(source.cache_path(), r#"{"mints": []}"#)?;

    let err = source.load(false).await.unwrap_err();

    assert!(matches!(err, MintListError::Malformed { .. }));
    Ok(())
}
