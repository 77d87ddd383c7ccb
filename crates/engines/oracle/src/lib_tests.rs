use super::*;

struct Scripted {
    commentary: Result<&'static str, ()>,
}

#[async_trait]
impl Advisor for Scripted {
    async fn recommend_move(&self, _request: &AdviceRequest) -> Result<Suggestion, AdvisorError> {
        Err(AdvisorError::Unavailable)
    }

    async fn commentary(&self, _request: &CommentaryRequest) -> Result<String, AdvisorError> {
        self.commentary
            .map(str::to_string)
            .map_err(|_| AdvisorError::EmptyResponse)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

fn request() -> CommentaryRequest {
    CommentaryRequest {
        notation: "Nc4".to_string(),
        evaluation: 2,
    }
}

#[tokio::test]
async fn commentary_passes_through_text() {
    let advisor = Scripted {
        commentary: Ok("  \"The cavalry rides at dawn!\" "),
    };
    let text = commentary_or_fallback(&advisor, &request()).await;
    assert_eq!(text, "The cavalry rides at dawn!");
}

#[tokio::test]
async fn blank_commentary_uses_canned_line() {
    let advisor = Scripted { commentary: Ok("") };
    assert_eq!(
        commentary_or_fallback(&advisor, &request()).await,
        EMPTY_COMMENTARY
    );
}

#[tokio::test]
async fn failed_commentary_uses_canned_line() {
    let advisor = Scripted { commentary: Err(()) };
    assert_eq!(
        commentary_or_fallback(&advisor, &request()).await,
        FAILED_COMMENTARY
    );
    assert_eq!(
        commentary_or_fallback(&OfflineAdvisor, &request()).await,
        FAILED_COMMENTARY
    );
}

#[tokio::test]
async fn offline_advisor_never_recommends() {
    let request = AdviceRequest::from_state(&GameState::initial());
    assert!(matches!(
        OfflineAdvisor.recommend_move(&request).await,
        Err(AdvisorError::Unavailable)
    ));
}

#[test]
fn advice_request_lists_every_piece() {
    let request = AdviceRequest::from_state(&GameState::initial());
    assert_eq!(request.turn, Side::White);
    assert_eq!(request.pieces.len(), 32);
    assert!(request.history.is_empty());
    assert_eq!(request.pieces[4].kind, PieceKind::King);
}
