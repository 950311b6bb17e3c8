#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tinylink::infrastructure::persistence::MemoryMappingRepository;
use tinylink::prelude::*;
use tinylink::routes::api_router;
use tinylink::utils::token_generator::{AlphanumericGenerator, TokenGenerator};

/// Service over a fresh in-memory store with the OS-backed generator.
pub fn create_test_service() -> (Arc<ShortUrlService>, Arc<MemoryMappingRepository>) {
    let repository = Arc::new(MemoryMappingRepository::new());
    let generator: Arc<dyn TokenGenerator> = Arc::new(AlphanumericGenerator::new());
    let service = service_with(repository.clone(), generator, TokenPolicy::default());

    (Arc::new(service), repository)
}

pub fn service_with(
    repository: Arc<dyn MappingRepository>,
    generator: Arc<dyn TokenGenerator>,
    policy: TokenPolicy,
) -> ShortUrlService {
    ShortUrlService::new(repository, generator).with_policy(policy)
}

pub fn create_test_state() -> (AppState, Arc<MemoryMappingRepository>) {
    let (service, repository) = create_test_service();
    (AppState::new(service), repository)
}

pub fn create_test_server() -> (TestServer, Arc<MemoryMappingRepository>) {
    let (state, repository) = create_test_state();
    let server = TestServer::new(api_router(state)).unwrap();
    (server, repository)
}

/// Generator replaying a fixed list of tokens, then repeating the last one.
pub struct ScriptedGenerator {
    tokens: Mutex<Vec<String>>,
    last: Mutex<Option<String>>,
}

impl ScriptedGenerator {
    pub fn new(tokens: &[&str]) -> Self {
        Self {
            tokens: Mutex::new(tokens.iter().rev().map(|t| t.to_string()).collect()),
            last: Mutex::new(None),
        }
    }
}

impl TokenGenerator for ScriptedGenerator {
    fn generate(&self, _length: usize) -> Result<String, AppError> {
        let mut last = self.last.lock().unwrap();
        if let Some(next) = self.tokens.lock().unwrap().pop() {
            *last = Some(next);
        }
        last.clone()
            .ok_or_else(|| AppError::RandomnessUnavailable("script is empty".into()))
    }
}

/// Store whose every call fails as if the database were down.
pub struct UnavailableRepository;

#[async_trait]
impl MappingRepository for UnavailableRepository {
    async fn find_by_original_url(&self, _: &str) -> Result<Option<ShortUrlMapping>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn find_by_token(&self, _: &str) -> Result<Option<ShortUrlMapping>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn insert_unique(&self, _: NewMapping) -> Result<ShortUrlMapping, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn increment_clicks(&self, _: &str) -> Result<Option<ShortUrlMapping>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
}

pub fn unavailable_server() -> TestServer {
    let repository: Arc<dyn MappingRepository> = Arc::new(UnavailableRepository);
    let generator: Arc<dyn TokenGenerator> = Arc::new(AlphanumericGenerator::new());
    let service = service_with(repository, generator, TokenPolicy::default());

    TestServer::new(api_router(AppState::new(Arc::new(service)))).unwrap()
}

/// Store whose inserts stall for `delay` before reaching the inner store.
pub struct StalledInsertRepository {
    pub inner: MemoryMappingRepository,
    pub delay: Duration,
}

#[async_trait]
impl MappingRepository for StalledInsertRepository {
    async fn find_by_original_url(&self, url: &str) -> Result<Option<ShortUrlMapping>, StoreError> {
        self.inner.find_by_original_url(url).await
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<ShortUrlMapping>, StoreError> {
        self.inner.find_by_token(token).await
    }

    async fn insert_unique(&self, new_mapping: NewMapping) -> Result<ShortUrlMapping, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.insert_unique(new_mapping).await
    }

    async fn increment_clicks(&self, token: &str) -> Result<Option<ShortUrlMapping>, StoreError> {
        self.inner.increment_clicks(token).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.inner.ping().await
    }
}

/// Server whose inserts exceed a 50ms store deadline.
pub fn stalled_insert_server() -> (TestServer, Arc<StalledInsertRepository>) {
    let repository = Arc::new(StalledInsertRepository {
        inner: MemoryMappingRepository::new(),
        delay: Duration::from_secs(10),
    });
    let generator: Arc<dyn TokenGenerator> = Arc::new(AlphanumericGenerator::new());
    let service = service_with(repository.clone(), generator, TokenPolicy::default())
        .with_store_timeout(Duration::from_millis(50));

    let server = TestServer::new(api_router(AppState::new(Arc::new(service)))).unwrap();
    (server, repository)
}
