// Scripted responses from MockGenerativeModel.

use enikki_error::GeminiErrorKind;
use enikki_models::testing::{MockGenerativeModel, MockResponse};
use enikki_models::{GenerateContentRequest, GenerativeModel, Part, extract_text};

fn request(text: &str) -> GenerateContentRequest {
    GenerateContentRequest::from_parts(vec![Part::text(text)])
}

#[tokio::test]
async fn counts_calls_and_records_requests() -> anyhow::Result<()> {
    let mock = MockGenerativeModel::new_text("Response");

    mock.generate_content("text-model", &request("first")).await?;
    mock.generate_content("text-model", &request("second")).await?;

    assert_eq!(mock.call_count(), 2);
    let calls = mock.calls();
    assert_eq!(calls[1].model, "text-model");
    assert_eq!(calls[1].request.parts().next().and_then(Part::as_text), Some("second"));
    Ok(())
}

#[tokio::test]
async fn routes_by_model() -> anyhow::Result<()> {
    let mock = MockGenerativeModel::new_text("summary")
        .with_model("image-model", MockResponse::image(b"png", "image/png"));

    let text = mock.generate_content("text-model", &request("a")).await?;
    let image = mock.generate_content("image-model", &request("b")).await?;

    assert_eq!(extract_text(&text).as_deref(), Some("summary"));
    assert!(image.first_parts().iter().any(|p| p.as_inline_data().is_some()));
    assert_eq!(mock.calls_for("image-model"), 1);
    Ok(())
}

#[tokio::test]
async fn sequence_then_exhausted() {
    let mock = MockGenerativeModel::new_sequence(vec![
        MockResponse::Error(GeminiErrorKind::HttpError {
            status_code: 503,
            message: "Model is overloaded".to_string(),
        }),
        MockResponse::text("ok"),
    ]);

    assert!(mock.generate_content("m", &request("1")).await.is_err());
    assert!(mock.generate_content("m", &request("2")).await.is_ok());

    let err = mock.generate_content("m", &request("3")).await.unwrap_err();
    assert!(matches!(err.kind, GeminiErrorKind::ApiRequest(_)));
    assert_eq!(mock.call_count(), 3);
}
