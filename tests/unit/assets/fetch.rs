use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "lantern_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn normalize_path_slash_normalization() {
    assert_eq!(normalize_rel_path("a/b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("a\\b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("./a//b.png").unwrap(), "a/b.png");
    assert!(normalize_rel_path("../x.png").is_err());
    assert!(normalize_rel_path("/abs.png").is_err());
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("./").is_err());
}

#[tokio::test]
async fn fs_fetcher_reads_relative_files() {
    let tmp = temp_dir("fs_fetcher");
    std::fs::create_dir_all(tmp.join("copy")).unwrap();
    std::fs::write(tmp.join("copy/en.txt"), b"hello").unwrap();

    let fetcher = FsFetcher::new(&tmp);
    assert_eq!(fetcher.fetch("copy/en.txt").await.unwrap(), b"hello");
    assert!(fetcher.fetch("copy/missing.txt").await.is_err());
    assert!(fetcher.fetch("../escape.txt").await.is_err());

    std::fs::remove_dir_all(&tmp).ok();
}

#[tokio::test]
async fn memory_fetcher_serves_and_fails() {
    let mut fetcher = MemoryFetcher::new();
    fetcher.insert("a", b"1".to_vec()).insert("b", b"2".to_vec());
    fetcher.fail("b");

    assert_eq!(fetcher.fetch("a").await.unwrap(), b"1");
    assert!(fetcher.fetch("b").await.is_err());
    assert!(fetcher.fetch("c").await.is_err());
    assert_eq!(fetcher.fetched(), vec!["a", "b", "c"]);
    assert_eq!(fetcher.max_in_flight(), 1);
}
