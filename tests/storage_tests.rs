use pac_gateway::storage::{
    MemoryTokenStore, MockTokenStore, TOKEN_STORAGE_KEY, TokenStore,
};

#[test]
fn test_memory_store_round_trip_and_remove() {
    let store = MemoryTokenStore::new();
    assert_eq!(store.get(TOKEN_STORAGE_KEY), None);

    store.set(TOKEN_STORAGE_KEY, "abc");
    assert_eq!(store.get(TOKEN_STORAGE_KEY), Some("abc".to_string()));

    // Overwrite, local-storage style.
    store.set(TOKEN_STORAGE_KEY, "def");
    assert_eq!(store.get(TOKEN_STORAGE_KEY), Some("def".to_string()));

    store.remove(TOKEN_STORAGE_KEY);
    assert_eq!(store.get(TOKEN_STORAGE_KEY), None);
}

#[test]
fn test_with_token_seeds_fixed_key() {
    let store = MemoryTokenStore::with_token("abc");
    assert_eq!(store.get(TOKEN_STORAGE_KEY), Some("abc".to_string()));
    // Only the fixed key is seeded.
    assert_eq!(store.get("other"), None);
}

#[test]
fn test_mock_store_counts_reads_only() {
    let store = MockTokenStore::new();
    assert_eq!(store.read_count(), 0);

    store.set(TOKEN_STORAGE_KEY, "abc");
    store.remove(TOKEN_STORAGE_KEY);
    assert_eq!(store.read_count(), 0, "writes must not count as reads");

    store.get(TOKEN_STORAGE_KEY);
    store.get(TOKEN_STORAGE_KEY);
    assert_eq!(store.read_count(), 2);
}
