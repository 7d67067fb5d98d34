//! In-memory stores and embedder shared by the discovery integration tests

#![allow(dead_code)]

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use coursescout::config::DiscoveryConfig;
use coursescout::discovery::ChunkStore;
use coursescout::discovery::DiscoveryService;
use coursescout::discovery::EmbeddingProvider;
use coursescout::discovery::FilterStore;
use coursescout::discovery::RequirementIndex;
use coursescout::models::CandidateFilters;
use coursescout::models::ChunkMatch;
use coursescout::models::CourseMetricRecord;
use coursescout::models::RequirementLink;
use coursescout::CourseScoutError;
use coursescout::Result;
use uuid::Uuid;

pub const DIM: usize = 8;

/// How a fake collaborator answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Behavior {
    #[default]
    Normal,
    Fail,
    Hang,
}

async fn misbehave(behavior: Behavior, what: &str) -> Result<()> {
    match behavior {
        Behavior::Normal => Ok(()),
        Behavior::Fail => Err(CourseScoutError::Http(format!("{what} unavailable"))),
        Behavior::Hang => {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        }
    }
}

pub fn course(code: &str, rating: Option<f64>, hours: Option<&str>) -> CourseMetricRecord {
    CourseMetricRecord {
        course_id: Uuid::new_v4(),
        code: code.to_string(),
        title: format!("{code} title"),
        description: Some(format!("About {code}")),
        course_rating_avg: rating,
        instruction_rating_avg: rating,
        hours_per_week_mode: hours.map(str::to_string),
    }
}

pub fn chunk(course: &CourseMetricRecord, similarity: f32) -> ChunkMatch {
    ChunkMatch {
        chunk_id: Uuid::new_v4(),
        course_id: course.course_id,
        content: format!("{} review at {similarity}", course.code),
        similarity,
    }
}

#[derive(Default)]
pub struct FakeFilterStore {
    pub records: Vec<CourseMetricRecord>,
    pub behavior: Behavior,
    pub calls: AtomicUsize,
}

#[async_trait]
impl FilterStore for FakeFilterStore {
    async fn query_candidates(
        &self,
        filters: &CandidateFilters,
        cap: usize,
    ) -> Result<Vec<CourseMetricRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        misbehave(self.behavior, "filter store").await?;
        let mut rows: Vec<CourseMetricRecord> = self
            .records
            .iter()
            .filter(|r| filters.matches_metrics(r))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.code.cmp(&b.code).then(a.course_id.cmp(&b.course_id)));
        rows.truncate(cap);
        Ok(rows)
    }
}

#[derive(Default)]
pub struct FakeRequirementIndex {
    pub links: Vec<RequirementLink>,
    pub behavior: Behavior,
    pub calls: AtomicUsize,
}

#[async_trait]
impl RequirementIndex for FakeRequirementIndex {
    async fn lookup(
        &self,
        requirement_ids: &[Uuid],
        scope: Option<&[Uuid]>,
    ) -> Result<Vec<RequirementLink>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        misbehave(self.behavior, "requirement index").await?;
        Ok(self
            .links
            .iter()
            .filter(|l| requirement_ids.contains(&l.requirement_id))
            .filter(|l| scope.map_or(true, |s| s.contains(&l.course_id)))
            .copied()
            .collect())
    }
}

#[derive(Default)]
pub struct FakeEmbedder {
    pub behavior: Behavior,
    pub calls: AtomicUsize,
}

#[async_trait]
impl EmbeddingProvider for FakeEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            Behavior::Fail => Err(CourseScoutError::EmbeddingProvider(
                "rate limited".to_string(),
            )),
            other => {
                misbehave(other, "embedder").await?;
                Ok(vec![0.5; DIM])
            }
        }
    }

    fn dimension(&self) -> usize {
        DIM
    }
}

/// Returns preset chunks, honoring scope, floor, ordering and limit
#[derive(Default)]
pub struct FakeChunkStore {
    pub chunks: Vec<ChunkMatch>,
    pub behavior: Behavior,
    pub calls: AtomicUsize,
}

#[async_trait]
impl ChunkStore for FakeChunkStore {
    async fn nearest(
        &self,
        _embedding: &[f32],
        course_ids: &[Uuid],
        similarity_floor: f32,
        limit: usize,
    ) -> Result<Vec<ChunkMatch>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        misbehave(self.behavior, "chunk store").await?;
        let mut rows: Vec<ChunkMatch> = self
            .chunks
            .iter()
            .filter(|c| course_ids.contains(&c.course_id) && c.similarity >= similarity_floor)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.similarity
                .total_cmp(&a.similarity)
                .then(a.chunk_id.cmp(&b.chunk_id))
        });
        rows.truncate(limit);
        Ok(rows)
    }
}

/// A service wired to fakes, with handles kept for call counting
pub struct Harness {
    pub filter_store: Arc<FakeFilterStore>,
    pub requirement_index: Arc<FakeRequirementIndex>,
    pub embedder: Arc<FakeEmbedder>,
    pub chunk_store: Arc<FakeChunkStore>,
    pub service: DiscoveryService,
}

impl Harness {
    pub fn new(
        filter_store: FakeFilterStore,
        requirement_index: FakeRequirementIndex,
        embedder: FakeEmbedder,
        chunk_store: FakeChunkStore,
        config: DiscoveryConfig,
    ) -> Self {
        let filter_store = Arc::new(filter_store);
        let requirement_index = Arc::new(requirement_index);
        let embedder = Arc::new(embedder);
        let chunk_store = Arc::new(chunk_store);
        let service = DiscoveryService::new(
            filter_store.clone(),
            requirement_index.clone(),
            embedder.clone(),
            chunk_store.clone(),
            config,
        );
        Self {
            filter_store,
            requirement_index,
            embedder,
            chunk_store,
            service,
        }
    }

    pub fn with_data(records: Vec<CourseMetricRecord>, chunks: Vec<ChunkMatch>) -> Self {
        Self::new(
            FakeFilterStore {
                records,
                ..Default::default()
            },
            FakeRequirementIndex::default(),
            FakeEmbedder::default(),
            FakeChunkStore {
                chunks,
                ..Default::default()
            },
            DiscoveryConfig::default(),
        )
    }

    pub fn embed_calls(&self) -> usize {
        self.embedder.calls.load(Ordering::SeqCst)
    }

    pub fn chunk_calls(&self) -> usize {
        self.chunk_store.calls.load(Ordering::SeqCst)
    }

    pub fn filter_calls(&self) -> usize {
        self.filter_store.calls.load(Ordering::SeqCst)
    }

    pub fn requirement_calls(&self) -> usize {
        self.requirement_index.calls.load(Ordering::SeqCst)
    }
}
