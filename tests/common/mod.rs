//! Shared fakes for the orchestrator integration tests.
//!
//! `Scripted` answers every collaborator contract with a fixed score (or a
//! failure) and counts calls; `RecordingStore` keeps every persisted score.

#![allow(dead_code)]

use buy_signal::model::{PostMetric, ServiceError, StorageError};
use buy_signal::orchestrator::{Collaborators, Orchestrator};
use buy_signal::services::{
    InflationService, JudgeVerdict, LanguageModelJudge, NewsService, PriceApproximator, ServiceScore, SocialService,
    SocialSignal, TrendService,
};
use buy_signal::history::PriceSeriesResolver;
use buy_signal::storage::ScoreStore;
use chrono::NaiveDate;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()
}

/// Collaborator answering with `score`, or failing when `score` is `None`.
pub struct Scripted {
    score: Option<f64>,
    posts: Option<Vec<PostMetric>>,
    calls: AtomicUsize,
}

impl Scripted {
    pub fn ok(score: f64) -> Arc<Self> {
        Arc::new(Self {
            score: Some(score),
            posts: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            score: None,
            posts: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn with_posts(score: f64, posts: Vec<PostMetric>) -> Arc<Self> {
        Arc::new(Self {
            score: Some(score),
            posts: Some(posts),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn answer(&self) -> Result<f64, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.score.ok_or_else(|| ServiceError::Reported("scripted failure".into()))
    }

    fn service_score(&self) -> Result<ServiceScore, ServiceError> {
        Ok(ServiceScore {
            score: self.answer()?,
            rationale: Some("scripted".into()),
            error: None,
        })
    }
}

#[async_trait::async_trait]
impl NewsService for Scripted {
    async fn score(&self, _product_title: &str) -> Result<ServiceScore, ServiceError> {
        self.service_score()
    }
}

#[async_trait::async_trait]
impl TrendService for Scripted {
    async fn score(&self, _product_title: &str, _category: Option<&str>) -> Result<ServiceScore, ServiceError> {
        self.service_score()
    }
}

#[async_trait::async_trait]
impl InflationService for Scripted {
    async fn score(&self) -> Result<ServiceScore, ServiceError> {
        self.service_score()
    }
}

#[async_trait::async_trait]
impl SocialService for Scripted {
    async fn score(&self, _product_title: &str) -> Result<SocialSignal, ServiceError> {
        Ok(SocialSignal {
            score: self.answer()?,
            posts: self.posts.clone(),
            error: None,
        })
    }
}

/// Judges answer on a 0-10 scale, so the scripted score is divided by ten.
#[async_trait::async_trait]
impl LanguageModelJudge for Scripted {
    async fn score(&self, _title: &str, _description: &str) -> Result<Vec<JudgeVerdict>, ServiceError> {
        let score = self.answer()?;
        Ok(vec![JudgeVerdict {
            judge: "scripted".into(),
            score: Some(score / 10.0),
            error: None,
        }])
    }
}

/// Approximator returning `days` valid lines after a short delay.
pub struct SlowApproximator {
    days: u32,
    calls: AtomicUsize,
}

impl SlowApproximator {
    pub fn new(days: u32) -> Arc<Self> {
        Arc::new(Self {
            days,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl PriceApproximator for SlowApproximator {
    async fn approximate_history(&self, _title: &str, current_price: f64, _days: u32) -> Result<String, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        let start = today() - chrono::Duration::days(self.days as i64);
        Ok((0..self.days)
            .map(|i| {
                let day = start + chrono::Duration::days(i as i64);
                format!("{},{:.2}\n", day.format("%Y-%m-%d"), current_price * (1.0 + (i % 3) as f64 / 100.0))
            })
            .collect())
    }
}

#[derive(Default)]
pub struct RecordingStore {
    pub saved: Mutex<Vec<(String, u8)>>,
    pub fail: bool,
}

impl RecordingStore {
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            saved: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    pub fn saved(&self) -> Vec<(String, u8)> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ScoreStore for RecordingStore {
    async fn persist_composite_score(&self, product_id: &str, score: u8) -> Result<(), StorageError> {
        if self.fail {
            return Err(StorageError::InvalidDate("scripted storage failure".into()));
        }
        self.saved.lock().unwrap().push((product_id.to_string(), score));
        Ok(())
    }
}

/// Every collaborator answers with the same scripted service.
pub fn collaborators(service: Arc<Scripted>, store: Arc<RecordingStore>) -> Collaborators {
    Collaborators {
        news: service.clone(),
        judge: service.clone(),
        social: service.clone(),
        trend: service.clone(),
        inflation: service,
        approximator: None,
        storage: store,
    }
}

pub fn orchestrator(collaborators: Collaborators) -> Orchestrator {
    let approximator = collaborators.approximator.clone();
    Orchestrator::new(collaborators).with_resolver(PriceSeriesResolver::new(approximator).with_today(today()))
}
