use reelsmith_core::GenerateRequest;
use reelsmith_error::{GenerationErrorKind, ReelsmithErrorKind};
use reelsmith_interface::{ScriptedGenerator, TextGenerator};

fn request(prompt: &str) -> GenerateRequest {
    GenerateRequest::builder().prompt(prompt).build().unwrap()
}

#[tokio::test]
async fn replays_in_order_and_records_prompts() {
    let generator = ScriptedGenerator::new(vec!["first".to_string(), "second".to_string()]);

    let a = generator.generate(&request("one")).await.unwrap();
    let b = generator.generate(&request("two")).await.unwrap();

    assert_eq!(a.text(), "first");
    assert_eq!(b.text(), "second");
    assert_eq!(generator.call_count(), 2);
    assert_eq!(generator.prompts(), vec!["one".to_string(), "two".to_string()]);
}

#[tokio::test]
async fn queued_errors_surface_as_generation_errors() {
    let generator = ScriptedGenerator::with_results(vec![Err(GenerationErrorKind::Status {
        status_code: 503,
        message: "overloaded".to_string(),
    })]);

    let err = generator.generate(&request("x")).await.unwrap_err();
    match err.kind() {
        ReelsmithErrorKind::Generation(e) => assert!(e.kind.is_retryable()),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn exhausted_queue_fails() {
    let generator = ScriptedGenerator::default();
    generator.push_reply("only");
    assert!(generator.generate(&request("a")).await.is_ok());
    assert!(generator.generate(&request("b")).await.is_err());
    assert_eq!(generator.call_count(), 2);
}

#[tokio::test]
async fn clones_share_state() {
    let generator = ScriptedGenerator::new(vec!["x".to_string()]);
    let observer = generator.clone();
    let shared: &dyn TextGenerator = &generator;
    shared.generate(&request("p")).await.unwrap();
    assert_eq!(observer.call_count(), 1);
    assert_eq!(observer.remaining(), 0);
}
