//! Property-based tests for key normalization and value round-trips.
//!
//! # Properties Tested
//!
//! 1. **Determinism**: build(k) == build(k) for ANY k
//! 2. **Passthrough**: short strings are stored unhashed
//! 3. **Fixed width**: long strings and structured keys become 32 hex chars
//! 4. **Roundtrip**: get(set(v)) == v, with and without serialization

use cache_facade::backend::InMemoryBackend;
use cache_facade::key::MAX_RAW_KEY_LEN;
use cache_facade::{Cache, CacheKeyBuilder};
use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Profile {
    id: u64,
    name: String,
    tags: Vec<String>,
    active: bool,
}

fn profile_strategy() -> impl Strategy<Value = Profile> {
    (
        any::<u64>(),
        ".*",
        prop::collection::vec("[a-z]{0,8}", 0..5),
        any::<bool>(),
    )
        .prop_map(|(id, name, tags, active)| Profile {
            id,
            name,
            tags,
            active,
        })
}

fn is_digest(s: &str) -> bool {
    s.len() == 32 && s.chars().all(|c| c.is_ascii_hexdigit())
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to build runtime")
        .block_on(future)
}

proptest! {
    #[test]
    fn prop_string_keys_deterministic(prefix in "[a-z:]{0,8}", key in ".*") {
        let keys = CacheKeyBuilder::new(prefix);
        prop_assert_eq!(keys.build(&key).unwrap(), keys.build(&key).unwrap());
    }

    #[test]
    fn prop_short_keys_passthrough(prefix in "[a-z:]{0,8}", key in "[ -~]{0,32}") {
        let keys = CacheKeyBuilder::new(prefix.clone());
        prop_assert_eq!(keys.build(&key).unwrap(), format!("{}{}", prefix, key));
    }

    #[test]
    fn prop_long_keys_hashed(key in "[a-zA-Z0-9]{33,200}") {
        let keys = CacheKeyBuilder::new("p:");
        let storage_key = keys.build(&key).unwrap();
        let digest = storage_key.strip_prefix("p:").unwrap();
        prop_assert!(key.len() > MAX_RAW_KEY_LEN);
        prop_assert!(is_digest(digest));
    }

    #[test]
    fn prop_structured_keys_hashed(profile in profile_strategy()) {
        let keys = CacheKeyBuilder::default();
        let first = keys.build(&profile).unwrap();
        prop_assert!(is_digest(&first));
        prop_assert_eq!(first, keys.build(&profile.clone()).unwrap());
    }

    #[test]
    fn prop_map_keys_order_independent(
        entries in prop::collection::vec(("[a-z]{1,6}", any::<i32>()), 0..10)
    ) {
        let forward: BTreeMap<String, i32> = entries.into_iter().collect();
        let reversed: HashMap<String, i32> = forward.clone().into_iter().rev().collect();

        let keys = CacheKeyBuilder::default();
        prop_assert_eq!(keys.build(&forward).unwrap(), keys.build(&reversed).unwrap());
    }

    #[test]
    fn prop_distinct_ids_distinct_keys(a in any::<u64>(), b in any::<u64>()) {
        prop_assume!(a != b);
        let keys = CacheKeyBuilder::default();
        prop_assert_ne!(keys.build(&("user", a)).unwrap(), keys.build(&("user", b)).unwrap());
    }

    #[test]
    fn prop_roundtrip_serialized(profile in profile_strategy()) {
        let restored: Option<Profile> = block_on(async {
            let cache = Cache::new(InMemoryBackend::new());
            cache.set(&("profile", profile.id), &profile, 0).await.unwrap();
            cache.get(&("profile", profile.id)).await.unwrap()
        });
        prop_assert_eq!(restored, Some(profile));
    }

    #[test]
    fn prop_roundtrip_raw_text(text in ".*") {
        let restored: Option<String> = block_on(async {
            let cache = Cache::new(InMemoryBackend::new()).with_serialization(false);
            cache.set("text", &text, 0).await.unwrap();
            cache.get("text").await.unwrap()
        });
        prop_assert_eq!(restored, Some(text));
    }
}
