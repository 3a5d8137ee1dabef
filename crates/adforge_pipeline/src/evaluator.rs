//! Quality evaluation of generated batches.
//!
//! The evaluator sends the batch plus its source brief to the AI provider
//! and receives back a judgment artifact. It never mutates the creative —
//! generation and evaluation stay separated so candidates can be compared
//! fairly across attempts. An evaluator that cannot produce a valid score
//! yields the worst score instead of aborting the job, so the loop can still
//! return the best candidate found earlier.

use crate::prompts::{
    evaluation_system, v1_evaluation_prompt, v1_evaluation_schema, v2_evaluation_prompt,
    v2_evaluation_schema,
};
use crate::repair::parse_with_repair;
use adforge_core::{
    BatchEvaluation, Brief, CompletionRequest, CreativeOutput, DimensionEvaluation,
    QualityEvaluation,
};
use adforge_error::{AdforgeResult, SchemaError, SchemaErrorKind};
use adforge_interface::{ContextDocument, CreativeDriver};
use std::sync::Arc;
use tracing::{instrument, warn};

/// Grades creative batches through the AI provider.
pub struct QualityEvaluator<D> {
    driver: Arc<D>,
    repair_ceiling: u32,
}

impl<D: CreativeDriver> QualityEvaluator<D> {
    /// Creates an evaluator sharing the pipeline's driver.
    pub fn new(driver: Arc<D>, repair_ceiling: u32) -> Self {
        Self {
            driver,
            repair_ceiling,
        }
    }

    /// Evaluate a batch against its brief.
    ///
    /// Never fails: an evaluation that cannot produce a valid score (provider
    /// failure, unrepairable response) is reported as satisfaction 0 with a
    /// diagnostic issue, which the loop treats as "worst candidate".
    #[instrument(skip(self, brief, output, context), fields(version = output.version()))]
    pub async fn evaluate(
        &self,
        brief: &Brief,
        output: &CreativeOutput,
        context: &[ContextDocument],
    ) -> QualityEvaluation {
        match self.try_evaluate(brief, output, context).await {
            Ok(evaluation) => evaluation,
            Err(e) => {
                warn!(error = %e, "Evaluation failed, treating candidate as worst score");
                QualityEvaluation::V1(BatchEvaluation {
                    satisfaction: 0,
                    issues: vec![format!("evaluation failed: {}", e)],
                })
            }
        }
    }

    async fn try_evaluate(
        &self,
        brief: &Brief,
        output: &CreativeOutput,
        context: &[ContextDocument],
    ) -> AdforgeResult<QualityEvaluation> {
        let brief_json = serde_json::to_string_pretty(brief).map_err(|e| {
            SchemaError::new(SchemaErrorKind::Malformed(format!(
                "failed to serialize brief: {}",
                e
            )))
        })?;
        let output_json = serde_json::to_string_pretty(output).map_err(|e| {
            SchemaError::new(SchemaErrorKind::Malformed(format!(
                "failed to serialize output: {}",
                e
            )))
        })?;

        match output {
            CreativeOutput::V1(_) => {
                let prompt = v1_evaluation_prompt(&brief_json, &output_json, context);
                let evaluation: BatchEvaluation = self
                    .grade(prompt, v1_evaluation_schema(), "a quality evaluation with satisfaction and issues")
                    .await?;
                Ok(QualityEvaluation::V1(evaluation))
            }
            CreativeOutput::V2(_) => {
                let prompt = v2_evaluation_prompt(&brief_json, &output_json, context);
                let mut evaluation: DimensionEvaluation = self
                    .grade(prompt, v2_evaluation_schema(), "a dimension scorecard with kill flags")
                    .await?;
                if evaluation.weakest_dimensions.is_empty() {
                    evaluation.weakest_dimensions = evaluation
                        .ranked_weakest()
                        .iter()
                        .map(|name| name.to_string())
                        .collect();
                }
                Ok(QualityEvaluation::V2(evaluation))
            }
        }
    }

    /// One grading call: complete, then extract/validate with repair.
    async fn grade<T>(
        &self,
        prompt: String,
        schema: serde_json::Value,
        expectation: &str,
    ) -> AdforgeResult<T>
    where
        T: serde::de::DeserializeOwned + adforge_core::Validate,
    {
        let request = CompletionRequest {
            system: Some(evaluation_system().to_string()),
            prompt,
            response_schema: Some(schema.clone()),
            ..CompletionRequest::default()
        };
        let raw = self.driver.complete(&request).await?.text;

        let schema_ref = &schema;
        let outcome = parse_with_repair::<T, _, _>(
            &raw,
            expectation,
            self.repair_ceiling,
            |instruction| {
                let driver = Arc::clone(&self.driver);
                let schema = schema_ref.clone();
                async move {
                    let repair_request = CompletionRequest {
                        system: Some(evaluation_system().to_string()),
                        prompt: instruction,
                        response_schema: Some(schema),
                        ..CompletionRequest::default()
                    };
                    driver.complete(&repair_request).await.map(|r| r.text)
                }
            },
        )
        .await?;

        Ok(outcome.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adforge_core::Validate;

    struct FailDriver;

    #[async_trait::async_trait]
    impl CreativeDriver for FailDriver {
        async fn complete(
            &self,
            _req: &CompletionRequest,
        ) -> AdforgeResult<adforge_core::CompletionResponse> {
            Err(adforge_error::ProviderError::new(
                adforge_error::ProviderErrorKind::Timeout(1000),
            )
            .into())
        }
        fn provider_name(&self) -> &'static str {
            "fail"
        }
        fn model_name(&self) -> &str {
            "none"
        }
    }

    fn sample_output() -> (Brief, CreativeOutput) {
        let batch: adforge_core::CreativeBatch = serde_json::from_str(include_str!(
            "../../adforge_core/testdata/creative_batch.json"
        ))
        .unwrap();
        assert!(batch.validate().is_empty());
        (batch.brief.clone(), CreativeOutput::V1(batch))
    }

    #[tokio::test]
    async fn evaluation_failure_yields_worst_score() {
        let (brief, output) = sample_output();
        let evaluator = QualityEvaluator::new(Arc::new(FailDriver), 2);
        let evaluation = evaluator.evaluate(&brief, &output, &[]).await;
        assert_eq!(evaluation.satisfaction(), 0);
        assert!(evaluation.issues()[0].contains("evaluation failed"));
    }
}
