use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Modal weekly workload bucket, in survey order.
///
/// Labels match the survey options exactly; the filter store stores the label text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HoursBucket {
    #[serde(rename = "3 or fewer")]
    ThreeOrFewer,
    #[serde(rename = "4 - 7")]
    FourToSeven,
    #[serde(rename = "8 - 11")]
    EightToEleven,
    #[serde(rename = "12 - 15")]
    TwelveToFifteen,
    #[serde(rename = "16 - 19")]
    SixteenToNineteen,
    #[serde(rename = "20 or more")]
    TwentyOrMore,
}

impl HoursBucket {
    pub const ALL: [Self; 6] = [
        Self::ThreeOrFewer,
        Self::FourToSeven,
        Self::EightToEleven,
        Self::TwelveToFifteen,
        Self::SixteenToNineteen,
        Self::TwentyOrMore,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::ThreeOrFewer => "3 or fewer",
            Self::FourToSeven => "4 - 7",
            Self::EightToEleven => "8 - 11",
            Self::TwelveToFifteen => "12 - 15",
            Self::SixteenToNineteen => "16 - 19",
            Self::TwentyOrMore => "20 or more",
        }
    }

    /// 1-based position in the survey scale
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::ThreeOrFewer => 1,
            Self::FourToSeven => 2,
            Self::EightToEleven => 3,
            Self::TwelveToFifteen => 4,
            Self::SixteenToNineteen => 5,
            Self::TwentyOrMore => 6,
        }
    }
}

impl fmt::Display for HoursBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for HoursBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|bucket| bucket.label() == trimmed)
            .ok_or_else(|| format!("unknown hours bucket: {s:?}"))
    }
}

/// Per-course aggregate metrics joined with course metadata.
///
/// Missing ratings mean too few survey responses, not a zero rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CourseMetricRecord {
    pub course_id: Uuid,
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub course_rating_avg: Option<f64>,
    pub instruction_rating_avg: Option<f64>,
    pub hours_per_week_mode: Option<String>,
}

impl CourseMetricRecord {
    /// Parsed workload bucket; unknown labels in the store read as absent
    pub fn hours_bucket(&self) -> Option<HoursBucket> {
        self.hours_per_week_mode
            .as_deref()
            .and_then(|label| label.parse().ok())
    }
}

/// A course is linked to a requirement it satisfies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromRow)]
pub struct RequirementLink {
    pub course_id: Uuid,
    pub requirement_id: Uuid,
}

/// A chunk returned by the vector search, with its similarity to the query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ChunkMatch {
    pub chunk_id: Uuid,
    pub course_id: Uuid,
    pub content: String,
    /// `1 - cosine_distance`, unrounded
    pub similarity: f32,
}

/// Structured, validated filters for candidate selection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateFilters {
    pub min_course_rating: Option<f64>,
    pub max_course_rating: Option<f64>,
    pub min_instruction_rating: Option<f64>,
    pub max_instruction_rating: Option<f64>,
    pub hours_buckets: Vec<HoursBucket>,
    /// Deduplicated; a candidate must satisfy every entry
    pub requirement_ids: Vec<Uuid>,
}

impl CandidateFilters {
    /// Whether a record satisfies the numeric and bucket predicates.
    ///
    /// Requirement membership is not checked here.
    pub fn matches_metrics(&self, record: &CourseMetricRecord) -> bool {
        fn within(value: Option<f64>, min: Option<f64>, max: Option<f64>) -> bool {
            if min.is_none() && max.is_none() {
                return true;
            }
            value.is_some_and(|v| min.map_or(true, |m| v >= m) && max.map_or(true, |m| v <= m))
        }

        within(
            record.course_rating_avg,
            self.min_course_rating,
            self.max_course_rating,
        ) && within(
            record.instruction_rating_avg,
            self.min_instruction_rating,
            self.max_instruction_rating,
        ) && (self.hours_buckets.is_empty()
            || record
                .hours_bucket()
                .is_some_and(|bucket| self.hours_buckets.contains(&bucket)))
    }

    pub fn hours_labels(&self) -> Vec<String> {
        self.hours_buckets
            .iter()
            .map(|bucket| bucket.label().to_string())
            .collect()
    }
}

/// Evidence for a course's relevance score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceSnippet {
    pub chunk_id: Uuid,
    pub content: String,
    /// Rounded to three decimals for presentation
    pub similarity: f64,
}

/// A course that cleared the aggregate floor
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCourse {
    pub course_id: Uuid,
    /// Mean similarity of the top chunks, in [0, 1]
    pub score: f32,
    /// Descending similarity, at most `snippets_per_course` entries
    pub top_chunks: Vec<ChunkMatch>,
}

impl ScoredCourse {
    pub fn snippets(&self) -> Vec<EvidenceSnippet> {
        self.top_chunks
            .iter()
            .map(|chunk| EvidenceSnippet {
                chunk_id: chunk.chunk_id,
                content: chunk.content.clone(),
                similarity: round3(chunk.similarity),
            })
            .collect()
    }
}

/// Round to three decimals, only used when shaping responses
pub fn round3(value: f32) -> f64 {
    (f64::from(value) * 1000.0).round() / 1000.0
}

/// Inbound discovery request, as received from callers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub min_course_rating: Option<f64>,
    #[serde(default)]
    pub max_course_rating: Option<f64>,
    #[serde(default)]
    pub min_instruction_rating: Option<f64>,
    #[serde(default)]
    pub max_instruction_rating: Option<f64>,
    #[serde(default)]
    pub hours_buckets: Vec<String>,
    #[serde(default)]
    pub requirement_ids: Vec<String>,
}

/// One course in a discovery response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseResult {
    pub id: Uuid,
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub course_rating_avg: Option<f64>,
    pub instruction_rating_avg: Option<f64>,
    pub hours_per_week_mode: Option<String>,
    pub similarity_score: Option<f64>,
    pub matching_snippets: Vec<EvidenceSnippet>,
}

impl CourseResult {
    pub fn from_record(record: &CourseMetricRecord) -> Self {
        Self {
            id: record.course_id,
            code: record.code.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
            course_rating_avg: record.course_rating_avg,
            instruction_rating_avg: record.instruction_rating_avg,
            hours_per_week_mode: record.hours_per_week_mode.clone(),
            similarity_score: None,
            matching_snippets: Vec::new(),
        }
    }

    pub fn with_score(record: &CourseMetricRecord, scored: &ScoredCourse) -> Self {
        Self {
            similarity_score: Some(round3(scored.score)),
            matching_snippets: scored.snippets(),
            ..Self::from_record(record)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryResponse {
    pub courses: Vec<CourseResult>,
    pub total_candidates: usize,
}

impl DiscoveryResponse {
    pub fn empty() -> Self {
        Self::default()
    }
}
