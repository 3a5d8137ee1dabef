//! Scripted driver for tests.

use adforge_core::{CompletionRequest, CompletionResponse};
use adforge_error::{AdforgeResult, ProviderError, ProviderErrorKind};
use adforge_interface::CreativeDriver;
use std::collections::VecDeque;
use std::sync::Mutex;

/// A [`CreativeDriver`] that replays a scripted sequence of responses.
///
/// Each call to [`CreativeDriver::complete`] pops the next scripted entry and
/// records the request, so tests can both steer the pipeline and assert on
/// the prompts it built. Running past the script yields an API error.
///
/// # Example
///
/// ```
/// use adforge_providers::MockDriver;
///
/// let driver = MockDriver::scripted(["{\"satisfaction\": 96, \"issues\": []}"]);
/// assert_eq!(driver.remaining(), 1);
/// ```
#[derive(Default)]
pub struct MockDriver {
    responses: Mutex<VecDeque<Result<String, ProviderError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockDriver {
    /// A driver with no scripted responses; every call fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// A driver that returns the given texts in order.
    pub fn scripted<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let driver = Self::new();
        for response in responses {
            driver.push_text(response);
        }
        driver
    }

    /// Append a successful text response to the script.
    pub fn push_text(&self, text: impl Into<String>) {
        self.responses
            .lock()
            .expect("mock script lock poisoned")
            .push_back(Ok(text.into()));
    }

    /// Append a provider failure to the script.
    pub fn push_error(&self, error: ProviderError) {
        self.responses
            .lock()
            .expect("mock script lock poisoned")
            .push_back(Err(error));
    }

    /// Number of scripted responses not yet consumed.
    pub fn remaining(&self) -> usize {
        self.responses
            .lock()
            .expect("mock script lock poisoned")
            .len()
    }

    /// All requests the pipeline has issued so far.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .expect("mock request lock poisoned")
            .clone()
    }

    /// Number of completion calls made.
    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .expect("mock request lock poisoned")
            .len()
    }
}

#[async_trait::async_trait]
impl CreativeDriver for MockDriver {
    async fn complete(&self, req: &CompletionRequest) -> AdforgeResult<CompletionResponse> {
        self.requests
            .lock()
            .expect("mock request lock poisoned")
            .push(req.clone());

        let next = self
            .responses
            .lock()
            .expect("mock script lock poisoned")
            .pop_front();

        match next {
            Some(Ok(text)) => Ok(CompletionResponse::new(text)),
            Some(Err(error)) => Err(error.into()),
            None => Err(ProviderError::new(ProviderErrorKind::Api {
                status: 500,
                message: "mock script exhausted".to_string(),
            })
            .into()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}
