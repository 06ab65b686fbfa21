//! End-to-end pipeline behavior against in-process backends

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use grounded_rag::providers::{GenerationBackend, SearchBackend, SearchHit};
use grounded_rag::{AnswerPipeline, Error, ErrorCategory, RagConfig, RejectReason, Result};

struct FakeSearch {
    hits: Vec<SearchHit>,
    fail: bool,
    calls: AtomicUsize,
    last_top: AtomicUsize,
}

impl FakeSearch {
    fn with_hits(hits: Vec<SearchHit>) -> Arc<Self> {
        Arc::new(Self {
            hits,
            fail: false,
            calls: AtomicUsize::new(0),
            last_top: AtomicUsize::new(0),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            hits: Vec::new(),
            fail: true,
            calls: AtomicUsize::new(0),
            last_top: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl SearchBackend for FakeSearch {
    async fn search(&self, _query: &str, top: usize) -> Result<Vec<SearchHit>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_top.store(top, Ordering::SeqCst);
        if self.fail {
            return Err(Error::search("index unavailable"));
        }
        Ok(self.hits.iter().take(top).cloned().collect())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(!self.fail)
    }

    fn name(&self) -> &str {
        "fake-search"
    }
}

struct FakeLlm {
    reply: String,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<(String, String)>>,
}

impl FakeLlm {
    fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationBackend for FakeLlm {
    async fn complete(&self, system: &str, user: &str, _temperature: f32) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some((system.to_string(), user.to_string()));
        Ok(self.reply.clone())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "fake-llm"
    }

    fn model(&self) -> &str {
        "fake-model"
    }
}

fn hit(content: &str, source: &str, score: f32) -> SearchHit {
    SearchHit {
        content: content.to_string(),
        source: Some(source.to_string()),
        key: None,
        score: Some(score),
    }
}

fn pipeline(search: Arc<FakeSearch>, llm: Arc<FakeLlm>) -> AnswerPipeline {
    AnswerPipeline::new(&RagConfig::default(), search, llm)
}

#[tokio::test]
async fn test_empty_retrieval_never_calls_model() {
    let search = FakeSearch::with_hits(vec![]);
    let llm = FakeLlm::replying("unused [source:a.md]");
    let p = pipeline(search.clone(), llm.clone());

    let err = p.answer("What is the refund window?").await.unwrap_err();

    assert!(matches!(
        err,
        Error::NoContext(RejectReason::TooFewPassages { found: 0, required: 1 })
    ));
    assert_eq!(err.category(), ErrorCategory::NoContext);
    assert_eq!(search.calls.load(Ordering::SeqCst), 1);
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn test_low_confidence_never_calls_model() {
    let search = FakeSearch::with_hits(vec![hit("Unrelated text", "misc.txt", 0.1)]);
    let llm = FakeLlm::replying("unused");
    let p = pipeline(search, llm.clone());

    let err = p.answer("What is the refund window?").await.unwrap_err();

    assert!(matches!(err, Error::NoContext(RejectReason::LowConfidence { .. })));
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn test_score_at_threshold_passes() {
    let search = FakeSearch::with_hits(vec![hit("Refunds within 30 days.", "policy.md", 0.35)]);
    let llm = FakeLlm::replying("Thirty days. [source:policy.md]");
    let p = pipeline(search, llm.clone());

    let result = p.answer("refund window?").await.unwrap();
    assert_eq!(result.answer, "Thirty days. [source:policy.md]");
    assert_eq!(llm.calls(), 1);
}

#[tokio::test]
async fn test_refusal_becomes_no_context() {
    let search = FakeSearch::with_hits(vec![hit("Shipping takes a week.", "shipping.md", 0.9)]);
    let llm = FakeLlm::replying("  NOCONTEXT");
    let p = pipeline(search, llm.clone());

    let err = p.answer("What is the refund window?").await.unwrap_err();

    assert!(matches!(err, Error::NoContext(RejectReason::ModelDeclined)));
    assert_eq!(llm.calls(), 1);
}

#[tokio::test]
async fn test_cited_answer_is_returned_unmodified() {
    let search = FakeSearch::with_hits(vec![
        hit("Refunds within 30 days.", "policy.md", 0.9),
        hit("Contact support for refunds.", "faq.md", 0.8),
        hit("Refunds go to the original card.", "policy.md", 0.7),
    ]);
    let llm = FakeLlm::replying("Refunds are accepted for 30 days [source:policy.md].");
    let p = pipeline(search, llm);

    let result = p.answer("  What is the refund window?  ").await.unwrap();

    assert_eq!(result.answer, "Refunds are accepted for 30 days [source:policy.md].");
    assert!(!result.citations_repaired);
    assert_eq!(result.sources.as_slice(), ["policy.md", "faq.md"]);
    assert_eq!(result.passages_retrieved, 3);
    assert!((result.top_score - 0.9).abs() < f32::EPSILON);
}

#[tokio::test]
async fn test_uncited_answer_gets_sources_appended() {
    let search = FakeSearch::with_hits(vec![
        hit("Refunds within 30 days.", "policy.md", 0.9),
        hit("Contact support for refunds.", "faq.md", 0.8),
    ]);
    let llm = FakeLlm::replying("Refunds are accepted for 30 days.");
    let p = pipeline(search, llm);

    let result = p.answer("What is the refund window?").await.unwrap();

    assert!(result.citations_repaired);
    assert!(result.answer.starts_with("Refunds are accepted for 30 days."));
    assert!(result.answer.contains("[source:policy.md]"));
    assert!(result.answer.contains("[source:faq.md]"));
}

#[tokio::test]
async fn test_uncited_answer_without_sources_is_rejected() {
    let search = FakeSearch::with_hits(vec![SearchHit {
        content: "Refunds within 30 days.".to_string(),
        source: None,
        key: None,
        score: Some(0.9),
    }]);
    let llm = FakeLlm::replying("Refunds are accepted for 30 days.");
    let p = pipeline(search, llm);

    let err = p.answer("What is the refund window?").await.unwrap_err();

    assert!(matches!(err, Error::MissingCitations));
    assert_eq!(err.category(), ErrorCategory::MissingCitations);
}

#[tokio::test]
async fn test_key_is_used_when_source_is_missing() {
    let search = FakeSearch::with_hits(vec![SearchHit {
        content: "Refunds within 30 days.".to_string(),
        source: Some("   ".to_string()),
        key: Some("doc-17".to_string()),
        score: Some(0.9),
    }]);
    let llm = FakeLlm::replying("Thirty days.");
    let p = pipeline(search, llm);

    let result = p.answer("refund window?").await.unwrap();
    assert_eq!(result.sources.as_slice(), ["doc-17"]);
    assert!(result.answer.contains("[source:doc-17]"));
}

#[tokio::test]
async fn test_search_failure_is_infrastructure_error() {
    let search = FakeSearch::failing();
    let llm = FakeLlm::replying("unused");
    let p = pipeline(search, llm.clone());

    let err = p.answer("What is the refund window?").await.unwrap_err();

    assert!(err.is_infrastructure());
    assert!(matches!(err, Error::Search(_)));
    assert_eq!(llm.calls(), 0);
}

struct FailingLlm {
    calls: AtomicUsize,
}

#[async_trait]
impl GenerationBackend for FailingLlm {
    async fn complete(&self, _system: &str, _user: &str, _temperature: f32) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::llm("HTTP 401: invalid api key"))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(false)
    }

    fn name(&self) -> &str {
        "failing-llm"
    }

    fn model(&self) -> &str {
        "none"
    }
}

#[tokio::test]
async fn test_generation_failure_is_infrastructure_error() {
    let search = FakeSearch::with_hits(vec![hit("Refunds within 30 days.", "policy.md", 0.9)]);
    let llm = Arc::new(FailingLlm {
        calls: AtomicUsize::new(0),
    });
    let p = AnswerPipeline::new(&RagConfig::default(), search.clone(), llm.clone());

    let result = p.answer("What is the refund window?").await;

    match result {
        Err(Error::Llm(message)) => assert_eq!(message, "HTTP 401: invalid api key"),
        other => panic!("expected generation error, got {:?}", other),
    }
    assert!(p.answer("again").await.unwrap_err().is_infrastructure());
    assert_eq!(search.calls.load(Ordering::SeqCst), 2);
    assert_eq!(llm.calls.load(Ordering::SeqCst), 2);
    assert_eq!(p.health().await, (true, false));
}

#[tokio::test]
async fn test_blank_query_is_rejected_before_search() {
    let search = FakeSearch::with_hits(vec![hit("text", "a.md", 0.9)]);
    let llm = FakeLlm::replying("unused");
    let p = pipeline(search.clone(), llm.clone());

    let err = p.answer("   \n\t").await.unwrap_err();

    assert!(matches!(err, Error::InvalidQuery(_)));
    assert_eq!(search.calls.load(Ordering::SeqCst), 0);
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn test_prompt_carries_context_sources_and_refusal_token() {
    let search = FakeSearch::with_hits(vec![
        hit("Refunds within 30 days.", "policy.md", 0.9),
        hit("Contact support for refunds.", "faq.md", 0.8),
    ]);
    let llm = FakeLlm::replying("Thirty days [source:policy.md]");
    let p = pipeline(search, llm.clone());

    p.answer("What is the refund window?").await.unwrap();

    let (system, user) = llm.last_prompt.lock().unwrap().clone().unwrap();
    assert!(system.contains("NOCONTEXT"));
    assert!(user.contains("What is the refund window?"));
    assert!(user.contains("Refunds within 30 days.\n\nContact support for refunds."));
    assert!(user.contains("- policy.md"));
    assert!(user.contains("- faq.md"));
}

#[tokio::test]
async fn test_only_top_k_passages_are_grounded() {
    let hits: Vec<SearchHit> = (0..10)
        .map(|i| {
            let score = 0.9 - i as f32 * 0.01;
            hit(&format!("passage {}", i), &format!("doc{}.md", i), score)
        })
        .collect();
    let search = FakeSearch::with_hits(hits);
    let llm = FakeLlm::replying("Answer [source:doc0.md]");

    let mut config = RagConfig::default();
    config.guardrail.top_k = 3;
    config.search.fetch_limit = 10;
    let p = AnswerPipeline::new(&config, search.clone(), llm.clone());

    let result = p.answer("question").await.unwrap();

    assert_eq!(search.last_top.load(Ordering::SeqCst), 10);
    assert_eq!(result.passages_retrieved, 10);
    assert_eq!(result.sources.as_slice(), ["doc0.md", "doc1.md", "doc2.md"]);

    let (_, user) = llm.last_prompt.lock().unwrap().clone().unwrap();
    assert!(user.contains("passage 2"));
    assert!(!user.contains("passage 3"));
}

#[tokio::test]
async fn test_concurrent_queries_share_one_pipeline() {
    let search = FakeSearch::with_hits(vec![hit("Refunds within 30 days.", "policy.md", 0.9)]);
    let llm = FakeLlm::replying("Thirty days [source:policy.md]");
    let p = Arc::new(pipeline(search.clone(), llm.clone()));

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let p = p.clone();
            tokio::spawn(async move { p.answer(&format!("question {}", i)).await })
        })
        .collect();

    for task in tasks {
        assert!(task.await.unwrap().is_ok());
    }
    assert_eq!(search.calls.load(Ordering::SeqCst), 8);
    assert_eq!(llm.calls(), 8);
}
