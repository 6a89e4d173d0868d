//! End-to-end queries against a CSV dataset with a mocked narrative provider

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use insight_llm::{
    CompletionRequest, CompletionResponse, LLMProvider, Message, StopReason, TokenUsage,
};
use insight_stock::{AnalysisEngine, AnalysisOutcome, Dataset, InsightError, Narrator};
use mockall::mock;

mock! {
    Generator {}

    #[async_trait]
    impl LLMProvider for Generator {
        async fn complete(&self, request: CompletionRequest) -> insight_llm::Result<CompletionResponse>;
        fn name(&self) -> &'static str;
    }
}

const DATASET: &str = "\
symbol,companyName,industry,open,dayHigh,dayLow,lastPrice,previousClose,change,pChange,yearHigh,yearLow,totalTradedVolume,totalTradedValue,perChange365d,perChange30d
NIFTY 50,,,24100,24250,24050,24200.5,24080,120.5,0.5,26277,21281,250000000,190000000000,10.2,-1.3
BHARTIARTL,Bharti Airtel Limited,Telecom - Cellular & Fixed line services,1640,1690,1635,1685,1630,55,3.37,1700,1100,8500000,14300000000,45.3,12.4
WIPRO,Wipro Limited,Computers - Software & Consulting,250,252,246,247,251,-4,-1.59,320,230,6000000,1480000000,-25,0
ITC,ITC Limited,Diversified FMCG,450,452,449,450,450,0,0,450,450,1000000,450000000,5,5
COALINDIA,Coal India Limited,Coal,390,392,378,380,391,-11,-2.8,530,390,9000000,3420000000,-12,-6
";

fn reply(text: &str) -> CompletionResponse {
    CompletionResponse {
        message: Message::assistant(text),
        stop_reason: StopReason::EndTurn,
        usage: TokenUsage::default(),
    }
}

fn dataset() -> Arc<Dataset> {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stock_data.csv");
    std::fs::write(&path, DATASET).unwrap();
    Arc::new(Dataset::load(&path))
}

fn engine_with(mock: MockGenerator) -> AnalysisEngine {
    AnalysisEngine::new(dataset(), Narrator::new(Arc::new(mock), "t5-stockmarket"))
}

fn narrating_mock(text: &'static str) -> MockGenerator {
    let mut mock = MockGenerator::new();
    mock.expect_name().return_const("mock");
    mock.expect_complete().returning(move |_| Ok(reply(text)));
    mock
}

#[tokio::test]
async fn test_full_analysis() {
    let engine = engine_with(narrating_mock("Airtel is near its high."));
    let result = engine.try_analyze("BHARTIARTL").await.unwrap();

    assert_eq!(result.basic_info.company, "Bharti Airtel Limited");
    assert!((result.price_data.price_position - 97.5).abs() < 1e-9);
    assert!((result.trading_info.value_cr - 1430.0).abs() < 1e-9);
    assert_eq!(result.trading_info.volume, Some(8_500_000));

    let insights = &result.insights;
    assert_eq!(
        insights.growth.details,
        vec![
            "Strong yearly growth of 45.3%",
            "Robust monthly performance: +12.4%"
        ]
    );
    assert_eq!(
        insights.valuation.details,
        vec!["Trading near 52-week high, potential overvaluation"]
    );
    assert_eq!(
        insights.technical.details,
        vec!["Strongly overbought conditions", "High trading activity: ₹1430Cr"]
    );
    assert_eq!(
        insights.market.details,
        vec![
            "Monitor Telecom - Cellular & Fixed line services sector trends",
            "High volatility: +3.4% daily change"
        ]
    );
    assert_eq!(result.ai_analysis, "Airtel is near its high.");
}

#[tokio::test]
async fn test_prompt_reaches_provider() {
    let mut mock = MockGenerator::new();
    mock.expect_name().return_const("mock");
    mock.expect_complete()
        .withf(|req| {
            let prompt = req.prompt_text();
            req.model == "t5-stockmarket"
                && req.max_tokens == 300
                && req.generation.num_beams == Some(5)
                && prompt.contains("WIPRO (Wipro Limited) in the Computers - Software & Consulting sector")
                && prompt.contains("• Growth: Significant decline of -25.0%\n")
                && prompt.ends_with("Answer: ")
        })
        .times(1)
        .returning(|_| Ok(reply("Weak quarter.")));

    let outcome = engine_with(mock).analyze("WIPRO").await;
    assert!(outcome.is_success());
}

#[tokio::test]
async fn test_decline_without_monthly_momentum() {
    let engine = engine_with(narrating_mock("ok"));
    let result = engine.try_analyze("WIPRO").await.unwrap();
    assert_eq!(
        result.insights.growth.details,
        vec!["Significant decline of -25.0%"]
    );
}

#[tokio::test]
async fn test_flat_range_is_a_failure() {
    let mut mock = MockGenerator::new();
    mock.expect_name().return_const("mock");
    mock.expect_complete().never();

    let engine = engine_with(mock);
    let outcome = engine.analyze("ITC").await;
    let error = outcome.error().unwrap();
    assert!(error.contains("52-week high equals 52-week low"));

    assert!(matches!(
        engine.try_analyze("ITC").await,
        Err(InsightError::DivisionByZero { .. })
    ));
}

#[tokio::test]
async fn test_price_below_range_is_negative() {
    let engine = engine_with(narrating_mock("ok"));
    let result = engine.try_analyze("COALINDIA").await.unwrap();

    assert!((result.price_data.price_position - -7.142_857_142_857_143).abs() < 1e-9);
    assert_eq!(
        result.insights.technical.details,
        vec!["Strongly oversold conditions"]
    );
    assert_eq!(
        result.insights.strategy.details,
        vec!["Opportunity for gradual accumulation"]
    );
}

#[tokio::test]
async fn test_missing_symbol() {
    let engine = engine_with(narrating_mock("unused"));
    let outcome = engine.analyze("NOPE").await;

    match outcome {
        AnalysisOutcome::Failure(failure) => assert!(failure.error.contains("not found")),
        AnalysisOutcome::Success(_) => panic!("expected a failure"),
    }
}

#[tokio::test]
async fn test_empty_dataset_reports_missing_symbol() {
    let engine = AnalysisEngine::new(
        Arc::new(Dataset::load("/no/such/stock_data.csv")),
        Narrator::new(Arc::new(narrating_mock("unused")), "t5"),
    );
    assert!(matches!(
        engine.try_analyze("INFY").await,
        Err(InsightError::MissingSymbol(_))
    ));
}

#[tokio::test]
async fn test_index_row_uses_fallback_names() {
    let engine = engine_with(narrating_mock("Index steady."));
    let result = engine.try_analyze("NIFTY 50").await.unwrap();
    assert_eq!(result.basic_info.company, "NIFTY 50");
    assert_eq!(result.basic_info.industry, "N/A");
    assert_eq!(result.insights.market.details, vec!["Monitor N/A sector trends"]);
}

#[tokio::test]
async fn test_repeated_queries_are_identical() {
    let engine = engine_with(narrating_mock("Same every time."));
    let first = engine.try_analyze("BHARTIARTL").await.unwrap();
    let second = engine.try_analyze("BHARTIARTL").await.unwrap();

    assert_eq!(first.insights, second.insights);
    assert_eq!(first.metrics(), second.metrics());
    assert_eq!(first.ai_analysis, second.ai_analysis);
}

#[tokio::test]
async fn test_provider_timeout_is_a_failure() {
    struct Slow;

    #[async_trait]
    impl LLMProvider for Slow {
        async fn complete(&self, _request: CompletionRequest) -> insight_llm::Result<CompletionResponse> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(reply("too late"))
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    let narrator = Narrator::new(Arc::new(Slow), "t5").with_timeout(Duration::from_millis(20));
    let engine = AnalysisEngine::new(dataset(), narrator);

    let outcome = engine.analyze("BHARTIARTL").await;
    assert!(outcome.error().unwrap().contains("timed out"));
}

#[tokio::test]
async fn test_failure_json_shape() {
    let engine = engine_with(narrating_mock("unused"));
    let outcome = engine.analyze("NOPE").await;
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json.as_object().unwrap().len(), 1);
    assert!(json["error"].as_str().unwrap().contains("NOPE"));
}
