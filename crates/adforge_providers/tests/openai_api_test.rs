//! Tests that make real API calls. Run with `--features api` and an
//! OPENAI_API_KEY in the environment.

use adforge_core::CompletionRequest;
use adforge_interface::CreativeDriver;
use adforge_providers::{OpenAiClient, OpenAiConfig};
use std::env;

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn openai_simple_completion() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let api_key = env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY must be set for API tests");

    let client = OpenAiClient::new(
        OpenAiConfig::builder()
            .api_key(api_key)
            .model("gpt-4o-mini".to_string())
            .build()?,
    )?;

    let request = CompletionRequest::builder()
        .prompt("Say 'test' and nothing else.".to_string())
        .max_tokens(Some(16))
        .build()?;

    let response = client.complete(&request).await?;
    assert!(!response.text.is_empty());
    println!("Response: {}", response.text);

    Ok(())
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn openai_schema_hint_yields_json() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let api_key = env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY must be set for API tests");

    let client = OpenAiClient::new(
        OpenAiConfig::builder()
            .api_key(api_key)
            .model("gpt-4o-mini".to_string())
            .build()?,
    )?;

    let request = CompletionRequest::builder()
        .prompt("Return an object with a single field `ok` set to true.".to_string())
        .response_schema(Some(serde_json::json!({
            "type": "object",
            "properties": {"ok": {"type": "boolean"}},
            "required": ["ok"],
            "additionalProperties": false
        })))
        .build()?;

    let response = client.complete(&request).await?;
    let value: serde_json::Value = serde_json::from_str(response.text.trim())?;
    assert_eq!(value["ok"], true);

    Ok(())
}
