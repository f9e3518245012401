//! Yatzy Session Server
//!
//! Demo runner: wires a registry to in-memory collaborators and plays a
//! scripted two-player match with simulated clients, logging the traffic.

use std::sync::Arc;

use anyhow::anyhow;
use rand::Rng;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use yatzy_server::{
    game::score,
    network::{ChannelTransport, SessionRegistry},
    service::{
        leaderboard::{InMemoryLeaderboard, Leaderboard},
        move_log::InMemoryMoveLog,
    },
    PlayerId, Variant, VERSION,
};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Yatzy Session Server v{}", VERSION);

    demo_match()
}

/// Play one full two-player Ordinary match through the registry.
fn demo_match() -> anyhow::Result<()> {
    info!("=== Starting Demo Match ===");

    let transport = Arc::new(ChannelTransport::new());
    let move_log = Arc::new(InMemoryMoveLog::new());
    let leaderboard = Arc::new(InMemoryLeaderboard::new());
    let mut registry = SessionRegistry::new(
        transport.clone(),
        move_log.clone(),
        leaderboard.clone(),
    );

    let ada = PlayerId::random();
    let bo = PlayerId::random();
    let mut rx_ada = transport.register(ada);
    let mut rx_bo = transport.register(bo);

    let game_id = registry.create_or_join(ada, "Ordinary", 2, "ada")?;
    registry.create_or_join(bo, "Ordinary", 2, "bo")?;
    info!(game_id, "match started");

    let mut rng = rand::thread_rng();

    // The registry drops the session when it finishes, ending the loop.
    while let Some(session) = registry.game(game_id) {
        let seat = session.player_to_move();
        let player = session.seat(seat).ok_or_else(|| anyhow!("empty seat to move"))?;
        let id = player.id;
        let variant = session.variant();
        let dice_count = variant.config().dice_count;
        let max_rolls = variant.config().max_rolls;

        // Simulated client: full rerolls every time, no dice held.
        let mut dice = vec![0u8; dice_count];
        let kept = vec![false; dice_count];
        for _ in 0..max_rolls {
            for d in dice.iter_mut() {
                *d = rng.gen_range(1..=6);
            }
            registry.handle_roll(id, game_id, &dice, &kept)?;
        }

        // Greedy client: best-scoring open category.
        let session = registry
            .game(game_id)
            .ok_or_else(|| anyhow!("session vanished mid-turn"))?;
        let player = session.seat(seat).ok_or_else(|| anyhow!("seat vacated mid-turn"))?;
        let (label, points) = player
            .scorecard
            .cells()
            .iter()
            .filter(|c| !c.fixed && !c.is_derived)
            .map(|c| (c.label.clone(), score(&c.label, &dice, variant.base())))
            .max_by_key(|(_, s)| *s)
            .ok_or_else(|| anyhow!("no open category"))?;

        info!(seat, label = %label, points, dice = ?dice, "selecting");
        registry.handle_select(id, game_id, &label, points)?;
    }

    info!("=== Match Results ===");
    for entry in leaderboard.top(Variant::Ordinary, 10) {
        info!(username = %entry.username, score = entry.score, "final score");
    }
    info!(moves = move_log.for_game(game_id).len(), "moves logged");

    let mut delivered = 0;
    while rx_ada.try_recv().is_ok() {
        delivered += 1;
    }
    while rx_bo.try_recv().is_ok() {
        delivered += 1;
    }
    info!(delivered, "messages delivered to the two clients");

    Ok(())
}
