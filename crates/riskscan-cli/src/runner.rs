//! Scan driver
//!
//! Walks the subject list in order. Each subject moves through
//! `pending -> extracting -> classifying -> recording -> done`, or stops in
//! `failed` at the first stage error. A failed subject never stops the run.

use crate::config::ScanConfig;
use riskscan_classifier::{
    build_backend, EvidenceExtractor, HttpFetcher, ModelClient, PageFetcher, DEFAULT_MAX_CHARS,
};
use riskscan_core::{ClassificationResult, Evidence, Subject};
use riskscan_store::{CsvSink, RecordSink, ResultRecord};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Per-subject lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectState {
    Pending,
    Extracting,
    Classifying,
    Recording,
    Done,
    Failed,
}

impl fmt::Display for SubjectState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Extracting => "extracting",
            Self::Classifying => "classifying",
            Self::Recording => "recording",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A stage failure, tagged with the state the subject was in
#[derive(Debug, thiserror::Error)]
#[error("{stage} failed: {source}")]
pub struct StageError {
    pub stage: SubjectState,
    #[source]
    pub source: riskscan_core::Error,
}

impl StageError {
    fn at(stage: SubjectState) -> impl FnOnce(riskscan_core::Error) -> Self {
        move |source| Self { stage, source }
    }
}

/// Terminal status of one subject
#[derive(Debug)]
pub enum SubjectStatus {
    Done {
        result: ClassificationResult,
        record: ResultRecord,
    },
    Failed(StageError),
}

/// What happened to one subject
#[derive(Debug)]
pub struct SubjectOutcome {
    pub subject: Subject,
    pub status: SubjectStatus,
}

impl SubjectOutcome {
    pub fn state(&self) -> SubjectState {
        match self.status {
            SubjectStatus::Done { .. } => SubjectState::Done,
            SubjectStatus::Failed(_) => SubjectState::Failed,
        }
    }

    pub fn is_done(&self) -> bool {
        self.state() == SubjectState::Done
    }
}

/// Progress notifications delivered while a run is in flight
#[derive(Debug, Clone, Copy)]
pub enum ScanEvent<'a> {
    /// The subject is about to be fetched
    Started(&'a Subject),
    /// The subject reached `done` or `failed`
    Finished(&'a SubjectOutcome),
}

/// Summary of a whole run
#[derive(Debug)]
pub struct RunReport {
    pub outcomes: Vec<SubjectOutcome>,
    pub destination: String,
}

impl RunReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_done()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Records written during the run, in subject order
    pub fn records(&self) -> impl Iterator<Item = &ResultRecord> {
        self.outcomes.iter().filter_map(|o| match &o.status {
            SubjectStatus::Done { record, .. } => Some(record),
            SubjectStatus::Failed(_) => None,
        })
    }
}

/// Drives subjects through fetch, extraction, classification, and recording
pub struct ScanRunner {
    fetcher: Arc<dyn PageFetcher>,
    extractor: EvidenceExtractor,
    client: ModelClient,
    sink: Box<dyn RecordSink>,
    max_chars: usize,
    pacing: Duration,
}

impl ScanRunner {
    /// Create a runner with the default evidence budget and a one second pace
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        extractor: EvidenceExtractor,
        client: ModelClient,
        sink: Box<dyn RecordSink>,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            client,
            sink,
            max_chars: DEFAULT_MAX_CHARS,
            pacing: Duration::from_secs(1),
        }
    }

    /// Wire up HTTP fetching, the configured backend, and the CSV sink
    pub fn from_config(config: &ScanConfig) -> riskscan_core::Result<Self> {
        let fetcher = HttpFetcher::new(&config.fetch.user_agent, config.fetch.timeout())?;
        let extractor =
            EvidenceExtractor::new()?.with_min_segment_chars(config.fetch.min_segment_chars);
        let backend = build_backend(&config.model)?;
        let client = ModelClient::from_config(backend, &config.model);
        let sink = CsvSink::new(&config.output);

        Ok(Self::new(Arc::new(fetcher), extractor, client, Box::new(sink))
            .with_max_chars(config.fetch.max_chars)
            .with_pacing(config.pacing()))
    }

    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn destination(&self) -> String {
        self.sink.destination()
    }

    /// Process every subject in order
    pub async fn run(&mut self, subjects: &[Subject]) -> RunReport {
        self.run_with(subjects, |_| {}).await
    }

    /// Process every subject, reporting each one as it starts and finishes
    pub async fn run_with<F>(&mut self, subjects: &[Subject], mut on_event: F) -> RunReport
    where
        F: FnMut(ScanEvent<'_>),
    {
        info!(subjects = subjects.len(), destination = %self.destination(), "starting scan");
        let mut outcomes = Vec::with_capacity(subjects.len());

        for subject in subjects {
            on_event(ScanEvent::Started(subject));

            let status = match self.process(subject).await {
                Ok((result, record)) => SubjectStatus::Done { result, record },
                Err(e) => {
                    warn!(
                        subject = %subject.name,
                        stage = %e.stage,
                        error = %e.source,
                        "[FAILED] {}",
                        subject.name
                    );
                    SubjectStatus::Failed(e)
                }
            };

            let outcome = SubjectOutcome {
                subject: subject.clone(),
                status,
            };
            on_event(ScanEvent::Finished(&outcome));

            let done = outcome.is_done();
            outcomes.push(outcome);

            if done && !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }
        }

        let report = RunReport {
            outcomes,
            destination: self.destination(),
        };
        info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            destination = %report.destination,
            "scan complete"
        );
        report
    }

    /// Run one subject through every stage
    pub async fn process(
        &mut self,
        subject: &Subject,
    ) -> Result<(ClassificationResult, ResultRecord), StageError> {
        debug!(subject = %subject.name, state = %SubjectState::Pending, "subject queued");

        let evidence = self
            .extract(subject)
            .await
            .map_err(StageError::at(SubjectState::Extracting))?;

        debug!(
            subject = %subject.name,
            state = %SubjectState::Classifying,
            chars = evidence.char_len()
        );
        let result = self
            .client
            .classify(subject, &evidence)
            .await
            .map_err(StageError::at(SubjectState::Classifying))?;

        debug!(subject = %subject.name, state = %SubjectState::Recording);
        let record = ResultRecord::new(subject, evidence, &result);
        self.sink
            .append(&record)
            .map_err(StageError::at(SubjectState::Recording))?;

        info!(subject = %subject.name, state = %SubjectState::Done, "subject recorded");
        Ok((result, record))
    }

    async fn extract(&self, subject: &Subject) -> riskscan_core::Result<Evidence> {
        debug!(subject = %subject.name, state = %SubjectState::Extracting, url = %subject.url);
        let html = self.fetcher.fetch(&subject.url).await?;
        let evidence = self.extractor.extract(&html, self.max_chars);
        if evidence.is_empty() {
            debug!(
                subject = %subject.name,
                "no paragraph text found, classifying with empty evidence"
            );
        }
        Ok(evidence)
    }
}
