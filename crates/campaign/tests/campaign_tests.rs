//! End-to-end campaign runs with no network.

use async_trait::async_trait;
use blitz_core::{GameState, Side, Square, Winner};
use campaign::{
    render_hud, select_move, Campaign, CampaignConfig, SelectionSource, SeriesResults, Strategy,
};
use oracle_engine::{
    AdviceRequest, Advisor, AdvisorError, CommentaryRequest, OfflineAdvisor, Suggestion,
};
use random_engine::RandomEngine;
use std::sync::Arc;
use std::time::Duration;

fn sq(rank: i8, file: i8) -> Square {
    Square::new(rank, file).unwrap()
}

/// Always suggests the same move, even when it makes no sense.
struct Stubborn(Square, Square);

#[async_trait]
impl Advisor for Stubborn {
    async fn recommend_move(&self, _request: &AdviceRequest) -> Result<Suggestion, AdvisorError> {
        Ok(Suggestion {
            from: self.0,
            to: self.1,
        })
    }

    async fn commentary(&self, _request: &CommentaryRequest) -> Result<String, AdvisorError> {
        Ok(String::new())
    }

    fn name(&self) -> &str {
        "stubborn"
    }
}

#[tokio::test]
async fn offline_series_from_toml_config() {
    let config = CampaignConfig::from_toml(
        r#"
        white = "gemini"
        black = "aggressive"
        move_delay_ms = 0
        advice_timeout_ms = 50
        max_half_moves = 60
        seed = 2024
        "#,
    )
    .unwrap();

    let mut campaign = Campaign::new(config, Arc::new(OfflineAdvisor));
    let results = campaign.play_series(2).await;

    assert_eq!(results.len(), 2);
    for game in &results.games {
        assert!(game.winner.is_some());
        assert!(game.half_moves <= 60);
        assert_eq!(game.moves.len(), game.half_moves);
    }
    let total: u32 = results.by_side.iter().map(|t| t.total_games()).sum();
    assert_eq!(total, 4);
}

#[tokio::test]
async fn seeded_campaigns_replay_identically() {
    async fn play(seed: u64) -> Vec<String> {
        let config = CampaignConfig {
            white: Strategy::Random,
            black: Strategy::Aggressive,
            move_delay_ms: 0,
            max_half_moves: Some(50),
            seed: Some(seed),
            ..Default::default()
        };
        let mut campaign = Campaign::new(config, Arc::new(OfflineAdvisor));
        let end = campaign.play_game().await;
        end.history.iter().map(|m| m.notation.clone()).collect()
    }

    assert_eq!(play(11).await, play(11).await);
}

#[tokio::test]
async fn stubborn_illegal_advice_never_stalls_the_game() {
    // Always asks to move a British piece on the French turn
    let config = CampaignConfig {
        white: Strategy::Gemini,
        black: Strategy::Random,
        move_delay_ms: 0,
        max_half_moves: Some(20),
        seed: Some(5),
        ..Default::default()
    };
    let mut campaign = Campaign::new(config, Arc::new(Stubborn(sq(6, 0), sq(5, 0))));

    let end = tokio::time::timeout(Duration::from_secs(10), campaign.play_game())
        .await
        .expect("game should finish");
    assert!(end.is_game_over());
    assert!(!end.history.is_empty());
}

#[tokio::test]
async fn select_move_prefers_advice_only_for_gemini() {
    let state = GameState::initial();
    let advisor = Stubborn(sq(1, 3), sq(3, 3));
    let mut local = RandomEngine::seeded(3);

    let remote = select_move(
        &state,
        Strategy::Gemini,
        &advisor,
        &mut local,
        Duration::from_millis(100),
    )
    .await
    .unwrap();
    assert_eq!(remote.source, SelectionSource::Remote);
    assert_eq!((remote.from, remote.to), (sq(1, 3), sq(3, 3)));

    for strategy in [Strategy::Random, Strategy::Minimax, Strategy::Aggressive] {
        let pick = select_move(
            &state,
            strategy,
            &advisor,
            &mut local,
            Duration::from_millis(100),
        )
        .await
        .unwrap();
        assert_eq!(pick.source, SelectionSource::Local);
        assert!(state
            .legal_moves()
            .iter()
            .any(|c| c.from == pick.from && c.to == pick.to));
    }
}

#[tokio::test]
async fn report_round_trips_through_a_file() {
    let start = GameState::from_placement("4k3/8/8/8/8/8/8/K3R3", Side::White).unwrap();
    let config = CampaignConfig {
        white: Strategy::Gemini,
        black: Strategy::Random,
        move_delay_ms: 0,
        ..Default::default()
    };
    let mut campaign =
        Campaign::new(config, Arc::new(Stubborn(sq(0, 4), sq(7, 4)))).with_start(start);
    let results = campaign.play_series(1).await;
    assert_eq!(results.games[0].winner, Some(Winner::Side(Side::White)));

    let path = std::env::temp_dir().join(format!("blitz-report-{}.json", std::process::id()));
    results.save(&path).unwrap();
    let saved: SeriesResults =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(saved.games, results.games);
    assert_eq!(saved.by_strategy["Gemini (GM)"].wins, 1);
    assert!(results.generate_report().contains("French win"));
}

#[tokio::test]
async fn hud_tracks_published_snapshots() {
    let config = CampaignConfig {
        white: Strategy::Random,
        black: Strategy::Random,
        move_delay_ms: 0,
        seed: Some(1),
        ..Default::default()
    };
    let mut campaign = Campaign::new(config, Arc::new(OfflineAdvisor));
    let mut snapshots = campaign.subscribe();

    campaign.step().await;
    assert!(snapshots.has_changed().unwrap());
    let state = snapshots.borrow_and_update().clone();
    assert_eq!(state.history.len(), 1);

    let hud = render_hud(&state, [Strategy::Random; 2], "");
    assert!(hud.contains("British to move"));
    assert!(hud.contains(&state.history[0].notation));
}
