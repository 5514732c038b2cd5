//! Signature-hash resolution via the 4byte.directory API

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::parser::parse_interface_with;
use crate::domain::abi::{
    is_hex_signature, CacheKey, Interface, ResolveError, SignatureCache, SignatureCandidate,
    SignatureKind, SignatureSource,
};

pub const DEFAULT_API_URL: &str = "https://www.4byte.directory";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Result pages followed per lookup; popular selectors have a handful at most
const MAX_PAGES: usize = 10;

/// One page of the 4byte API response
#[derive(Debug, Deserialize)]
struct FourBytePage {
    #[serde(default)]
    next: Option<String>,
    results: Vec<SignatureCandidate>,
}

/// HTTP client for 4byte.directory
pub struct FourByteClient {
    http: reqwest::Client,
    base_url: String,
}

impl FourByteClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ResolveError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, kind: SignatureKind) -> String {
        match kind {
            SignatureKind::Function => format!("{}/api/v1/signatures/", self.base_url),
            SignatureKind::Event => format!("{}/api/v1/event-signatures/", self.base_url),
        }
    }

    async fn fetch_page(&self, url: &str, hash: &str) -> Result<FourBytePage, ResolveError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%status, hash, "signature database rejected lookup");
            return Err(ResolveError::Status {
                status: status.as_u16(),
                hash: hash.to_string(),
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl SignatureSource for FourByteClient {
    async fn lookup(
        &self,
        hash: &str,
        kind: SignatureKind,
    ) -> Result<Vec<SignatureCandidate>, ResolveError> {
        let mut url = format!("{}?hex_signature={}", self.endpoint(kind), hash);
        info!(%kind, hash, "querying signature database");

        let mut candidates = Vec::new();
        for _ in 0..MAX_PAGES {
            let page = self.fetch_page(&url, hash).await?;
            candidates.extend(page.results);
            match page.next {
                Some(next) => url = next,
                None => break,
            }
        }

        debug!(hash, count = candidates.len(), "signature lookup finished");
        Ok(candidates)
    }
}

/// Process-lifetime in-memory cache
#[derive(Default)]
pub struct MemorySignatureCache {
    entries: RwLock<HashMap<CacheKey, Vec<SignatureCandidate>>>,
}

impl MemorySignatureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed an entry
    pub async fn seed(&self, key: CacheKey, candidates: Vec<SignatureCandidate>) {
        self.entries.write().await.insert(key, candidates);
    }
}

#[async_trait]
impl SignatureCache for MemorySignatureCache {
    async fn get(&self, key: &CacheKey) -> Option<Vec<SignatureCandidate>> {
        self.entries.read().await.get(key).cloned()
    }

    async fn put(&self, key: CacheKey, candidates: Vec<SignatureCandidate>) {
        self.entries.write().await.insert(key, candidates);
    }
}

/// Cached, coalescing front for a [`SignatureSource`]
pub struct SignatureResolver {
    source: Arc<dyn SignatureSource>,
    cache: Arc<dyn SignatureCache>,
    /// One lock per key currently being fetched; callers hold the only
    /// strong references, so an abandoned lookup leaves a dead entry behind
    inflight: Mutex<HashMap<CacheKey, Weak<Mutex<()>>>>,
}

impl SignatureResolver {
    pub fn new(source: Arc<dyn SignatureSource>, cache: Arc<dyn SignatureCache>) -> Self {
        Self {
            source,
            cache,
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Every candidate text signature for `hash`
    ///
    /// Answers, including empty ones, are cached per `(hash, kind)`; failures
    /// are returned without being cached so a later call retries.
    pub async fn resolve(
        &self,
        hash: &str,
        kind: SignatureKind,
    ) -> Result<Vec<SignatureCandidate>, ResolveError> {
        let key = CacheKey::new(hash, kind)?;
        if let Some(hit) = self.cache.get(&key).await {
            debug!(hash = key.hash(), "signature cache hit");
            return Ok(hit);
        }

        let gate = {
            let mut inflight = self.inflight.lock().await;
            inflight.retain(|_, gate| gate.strong_count() > 0);
            match inflight.get(&key).and_then(Weak::upgrade) {
                Some(gate) => gate,
                None => {
                    let gate = Arc::new(Mutex::new(()));
                    inflight.insert(key.clone(), Arc::downgrade(&gate));
                    gate
                }
            }
        };
        let _guard = gate.lock().await;

        // Another caller may have filled the entry while we waited
        if let Some(hit) = self.cache.get(&key).await {
            return Ok(hit);
        }

        let result = self.source.lookup(key.hash(), kind).await;
        if let Ok(candidates) = &result {
            self.cache.put(key.clone(), candidates.clone()).await;
        }
        self.inflight.lock().await.remove(&key);
        result
    }

    /// Resolve `hash` and parse every candidate into its own interface
    pub async fn resolve_interfaces(
        &self,
        hash: &str,
        kind: SignatureKind,
    ) -> Result<Vec<Interface>, ResolveError> {
        let candidates = self.resolve(hash, kind).await?;
        Ok(candidate_interfaces(&candidates, kind))
    }
}

/// Parse candidate text signatures, skipping any the parser rejects
pub fn candidate_interfaces(candidates: &[SignatureCandidate], kind: SignatureKind) -> Vec<Interface> {
    candidates
        .iter()
        .filter_map(|candidate| {
            parse_interface_with(&candidate.text_signature, kind.default_keyword())
                .map_err(|e| {
                    debug!(
                        signature = %candidate.text_signature,
                        error = %e,
                        "skipping unparsable candidate"
                    )
                })
                .ok()
        })
        .collect()
}

/// The `0x`-prefixed selector of `calldata`, if it has one
pub fn derive_sig_hash(calldata: &str) -> Option<String> {
    let head = calldata.trim().get(..10)?;
    is_hex_signature(head, 4).then(|| head.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn candidate(id: u64, text: &str, hex: &str) -> SignatureCandidate {
        SignatureCandidate {
            id,
            created_at: Utc.with_ymd_and_hms(2018, 5, 11, 0, 0, 0).unwrap(),
            text_signature: text.to_string(),
            hex_signature: hex.to_string(),
            bytes_signature: String::new(),
        }
    }

    /// Counts lookups and optionally fails them
    struct CountingSource {
        calls: AtomicUsize,
        fail: bool,
        answer: Vec<SignatureCandidate>,
    }

    impl CountingSource {
        fn new(answer: Vec<SignatureCandidate>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: false,
                answer,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new(Vec::new())
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SignatureSource for CountingSource {
        async fn lookup(
            &self,
            hash: &str,
            _kind: SignatureKind,
        ) -> Result<Vec<SignatureCandidate>, ResolveError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            if self.fail {
                return Err(ResolveError::Status {
                    status: 502,
                    hash: hash.to_string(),
                });
            }
            Ok(self.answer.clone())
        }
    }

    fn resolver(source: Arc<CountingSource>) -> SignatureResolver {
        SignatureResolver::new(source, Arc::new(MemorySignatureCache::new()))
    }

    #[tokio::test]
    async fn test_repeated_lookup_hits_cache() {
        let source = Arc::new(CountingSource::new(vec![candidate(
            1,
            "transfer(address,uint256)",
            "0xa9059cbb",
        )]));
        let resolver = resolver(source.clone());

        let first = resolver.resolve("0xa9059cbb", SignatureKind::Function).await.unwrap();
        let second = resolver.resolve("0xA9059CBB", SignatureKind::Function).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_kinds_are_cached_separately() {
        let source = Arc::new(CountingSource::new(Vec::new()));
        let resolver = resolver(source.clone());
        let topic = format!("0x{}", "ab".repeat(32));

        resolver.resolve("0xa9059cbb", SignatureKind::Function).await.unwrap();
        resolver.resolve(&topic, SignatureKind::Event).await.unwrap();

        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_lookups_coalesce() {
        let source = Arc::new(CountingSource::new(vec![candidate(
            1,
            "transfer(address,uint256)",
            "0xa9059cbb",
        )]));
        let resolver = resolver(source.clone());

        let (a, b) = tokio::join!(
            resolver.resolve("0xa9059cbb", SignatureKind::Function),
            resolver.resolve("0xa9059cbb", SignatureKind::Function),
        );

        assert_eq!(a.unwrap().len(), 1);
        assert_eq!(b.unwrap().len(), 1);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let source = Arc::new(CountingSource::failing());
        let resolver = resolver(source.clone());

        assert!(resolver.resolve("0xa9059cbb", SignatureKind::Function).await.is_err());
        assert!(resolver.resolve("0xa9059cbb", SignatureKind::Function).await.is_err());
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_abandoned_lookup_does_not_pin_its_gate() {
        let source = Arc::new(CountingSource::new(Vec::new()));
        let resolver = resolver(source.clone());

        let abandoned = tokio::time::timeout(
            Duration::from_millis(1),
            resolver.resolve("0xa9059cbb", SignatureKind::Function),
        )
        .await;
        assert!(abandoned.is_err());
        assert!(resolver
            .inflight
            .lock()
            .await
            .values()
            .all(|gate| gate.strong_count() == 0));

        resolver.resolve("0x23b872dd", SignatureKind::Function).await.unwrap();
        assert!(resolver.inflight.lock().await.is_empty());

        // the abandoned key is fetched again, not stuck behind a dead lock
        resolver.resolve("0xa9059cbb", SignatureKind::Function).await.unwrap();
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn test_empty_answer_is_cached() {
        let source = Arc::new(CountingSource::new(Vec::new()));
        let cache = Arc::new(MemorySignatureCache::new());
        let resolver = SignatureResolver::new(source.clone(), cache.clone());

        assert!(resolver.resolve("0xdeadbeef", SignatureKind::Function).await.unwrap().is_empty());
        assert!(resolver.resolve("0xdeadbeef", SignatureKind::Function).await.unwrap().is_empty());
        assert_eq!(source.calls(), 1);

        let key = CacheKey::new("0xdeadbeef", SignatureKind::Function).unwrap();
        assert!(cache.has(&key).await);
    }

    #[tokio::test]
    async fn test_seeded_cache_skips_source() {
        let source = Arc::new(CountingSource::failing());
        let cache = Arc::new(MemorySignatureCache::new());
        let key = CacheKey::new("0x23b872dd", SignatureKind::Function).unwrap();
        cache
            .seed(key, vec![candidate(2, "transferFrom(address,address,uint256)", "0x23b872dd")])
            .await;
        let resolver = SignatureResolver::new(source.clone(), cache);

        let ifaces = resolver
            .resolve_interfaces("0x23b872dd", SignatureKind::Function)
            .await
            .unwrap();
        assert_eq!(ifaces.len(), 1);
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_hash_is_rejected_before_lookup() {
        let source = Arc::new(CountingSource::new(Vec::new()));
        let resolver = resolver(source.clone());

        let err = resolver.resolve("0x1234", SignatureKind::Function).await.unwrap_err();
        assert!(matches!(err, ResolveError::InvalidHash { .. }));
        assert_eq!(source.calls(), 0);
    }

    #[test]
    fn test_candidate_interfaces_skip_garbage() {
        let candidates = vec![
            candidate(1, "gasprice_bit_ether(int128)", "0x23b872dd"),
            candidate(2, "not a (signature", "0x23b872dd"),
            candidate(3, "transferFrom(address,address,uint256)", "0x23b872dd"),
        ];

        let ifaces = candidate_interfaces(&candidates, SignatureKind::Function);
        assert_eq!(ifaces.len(), 2);
    }

    #[test]
    fn test_derive_sig_hash() {
        assert_eq!(
            derive_sig_hash("0xa9059cbb0000000000000000"),
            Some("0xa9059cbb".to_string())
        );
        assert_eq!(derive_sig_hash("0xa9059cbb"), Some("0xa9059cbb".to_string()));
        assert_eq!(derive_sig_hash("0xa9059c"), None);
        assert_eq!(derive_sig_hash("0xa9059cbg00"), None);
        assert_eq!(derive_sig_hash("a9059cbb00"), None);
    }

    #[test]
    fn test_page_deserializes() {
        let body = r#"{"count":1,"next":null,"previous":null,"results":[{"id":145,"created_at":"2016-07-09T03:58:28.234977Z","text_signature":"transfer(address,uint256)","hex_signature":"0xa9059cbb","bytes_signature":"x"}]}"#;
        let page: FourBytePage = serde_json::from_str(body).unwrap();
        assert!(page.next.is_none());
        assert_eq!(page.results[0].hex_signature, "0xa9059cbb");
    }

    #[test]
    fn test_endpoints() {
        let client = FourByteClient::new("https://example.org/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.endpoint(SignatureKind::Function),
            "https://example.org/api/v1/signatures/"
        );
        assert_eq!(
            client.endpoint(SignatureKind::Event),
            "https://example.org/api/v1/event-signatures/"
        );
    }
}
