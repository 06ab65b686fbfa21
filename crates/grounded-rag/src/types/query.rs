//! Query request types

use serde::{Deserialize, Serialize};

/// Question for `POST /api/query` (JSON body) or `POST /query?q=`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The question to answer; missing is treated as blank
    #[serde(default, alias = "q")]
    pub question: String,
}

impl QueryRequest {
    /// Create a new query
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }

    /// Question with surrounding whitespace removed, or `None` if blank
    pub fn normalized(&self) -> Option<&str> {
        let q = self.question.trim();
        (!q.is_empty()).then_some(q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_short_alias() {
        let req: QueryRequest = serde_json::from_str(r#"{"q": "What is RAG?"}"#).unwrap();
        assert_eq!(req.question, "What is RAG?");
    }

    #[test]
    fn test_missing_question_is_blank() {
        let req: QueryRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.normalized(), None);
    }

    #[test]
    fn test_normalized() {
        assert_eq!(QueryRequest::new("  hi  ").normalized(), Some("hi"));
        assert_eq!(QueryRequest::new(" \n ").normalized(), None);
    }
}
