//! End-to-end games driven through the in-memory transport.

use std::sync::Arc;
use std::time::Duration;

use lycan_engine::{
    ConfigError, Game, GameConfig, GameError, GameStatus, KillReason, Preset, Role,
};
use lycan_protocol::{GroupId, Target, UserId};
use lycan_transport::{InputStore, MemoryTransport, Outgoing};
use tokio::sync::mpsc;

// =========================================================================
// Harness
// =========================================================================

struct Table {
    game: Game,
    inputs: Arc<InputStore>,
    outbox: mpsc::UnboundedReceiver<Outgoing>,
    group: GroupId,
}

fn config() -> GameConfig {
    GameConfig {
        witch_absence_delay_secs: (1, 1),
        ..GameConfig::default()
    }
}

/// Seats `roles` as `u1..` / `P1..`.
fn table_with(roles: &[Role], config: GameConfig) -> Table {
    let (transport, outbox) = MemoryTransport::new();
    let inputs = Arc::new(InputStore::new());
    let group = GroupId::from("table");
    let seats = roles.iter().enumerate().map(|(i, &role)| {
        (UserId::from(format!("u{}", i + 1)), format!("P{}", i + 1), role)
    });
    let game = Game::with_roles(
        group.clone(),
        seats,
        config,
        Arc::new(transport),
        Arc::clone(&inputs),
    )
    .unwrap();
    Table {
        game,
        inputs,
        outbox,
        group,
    }
}

fn table(roles: &[Role]) -> Table {
    table_with(roles, config())
}

/// Delivers `text` from `user` once the game is waiting for it.
async fn say(inputs: &InputStore, user: &str, scope: Option<&GroupId>, text: &str) {
    let user = UserId::from(user);
    for _ in 0..200_000 {
        if inputs.is_waiting(&user, scope) && inputs.put(&user, scope, text) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("{user} was never asked for input ({text:?})");
}

fn group_texts(outbox: &mut mpsc::UnboundedReceiver<Outgoing>, group: &GroupId) -> Vec<String> {
    let target = Target::Group(group.clone());
    let mut texts = Vec::new();
    while let Ok(out) = outbox.try_recv() {
        if out.target == target {
            texts.push(out.text);
        }
    }
    texts
}

// =========================================================================
// Full games
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_six_players_first_night_kills_one_civilian() {
    let mut t = table(&[
        Role::Werewolf,
        Role::Prophet,
        Role::Hunter,
        Role::Civilian,
        Role::Civilian,
        Role::Civilian,
    ]);
    let group = t.group.clone();

    let (result, ()) = tokio::join!(t.game.run(), async {
        say(&t.inputs, "u1", None, "4").await;
        say(&t.inputs, "u1", None, "/stop").await;
        say(&t.inputs, "u2", None, "/stop").await;
        say(&t.inputs, "u4", Some(&group), "/stop").await;
        // Discussion has started once the wolf is asked to speak.
        for _ in 0..200_000 {
            if t.inputs.is_waiting(&UserId::from("u1"), Some(&group)) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        t.game.terminate();
    });
    assert!(matches!(result, Err(GameError::Terminated)));

    let dead: Vec<_> = t.game.players().into_iter().filter(|p| !p.alive).collect();
    assert_eq!(dead.len(), 1);
    assert_eq!(dead[0].user_id, UserId::from("u4"));
    assert_eq!(dead[0].kill_info.as_ref().unwrap().reason, KillReason::Werewolf);
    assert!(dead[0].departed);

    let report = t.game.death_report();
    assert_eq!(report.len(), 1);
    assert_eq!(report[0].kill_info.killers, vec!["P1".to_string()]);

    let texts = group_texts(&mut t.outbox, &t.group);
    assert!(texts.iter().any(|s| s.starts_with("Day 1.") && s.contains("P4")));
    assert!(!texts.iter().any(|s| s.starts_with("Game over")));
}

#[tokio::test(start_paused = true)]
async fn test_seven_players_wolves_reach_parity_without_a_vote() {
    let mut config = config();
    config.presets.insert(7, Preset::new(3, 2, 2));
    let mut t = table_with(
        &[
            Role::Werewolf,
            Role::Werewolf,
            Role::Werewolf,
            Role::Prophet,
            Role::Guard,
            Role::Civilian,
            Role::Civilian,
        ],
        config,
    );
    let group = t.group.clone();

    let (result, ()) = tokio::join!(t.game.run(), async {
        for wolf in ["u1", "u2", "u3"] {
            say(&t.inputs, wolf, None, "6").await;
            say(&t.inputs, wolf, None, "/stop").await;
        }
        say(&t.inputs, "u4", None, "/stop").await;
        say(&t.inputs, "u5", None, "/stop").await;
        say(&t.inputs, "u6", Some(&group), "/stop").await;
    });
    assert_eq!(result.unwrap(), GameStatus::Werewolf);
    assert!(t.game.is_finished());

    let texts = group_texts(&mut t.outbox, &t.group);
    assert!(!texts.iter().any(|s| s.starts_with("Time to vote")));
    let summary = texts.last().unwrap();
    assert!(summary.starts_with("Game over: the werewolves win!"));
    assert!(summary.contains("P6 (Civilian) was killed by the werewolves by P1, P2, P3"));
}

#[tokio::test(start_paused = true)]
async fn test_vote_eliminates_the_last_wolf() {
    let mut t = table(&[
        Role::Werewolf,
        Role::Prophet,
        Role::Hunter,
        Role::Civilian,
        Role::Civilian,
        Role::Civilian,
    ]);
    let group = t.group.clone();

    let (result, ()) = tokio::join!(t.game.run(), async {
        say(&t.inputs, "u1", None, "4").await;
        say(&t.inputs, "u1", None, "/stop").await;
        say(&t.inputs, "u2", None, "1").await;
        say(&t.inputs, "u4", Some(&group), "/stop").await;
        for user in ["u1", "u2", "u3", "u5", "u6"] {
            say(&t.inputs, user, Some(&group), "/stop").await;
        }
        // Every voter's list starts with P1 except P1's own.
        say(&t.inputs, "u1", None, "/stop").await;
        for user in ["u2", "u3", "u5", "u6"] {
            say(&t.inputs, user, None, "1").await;
        }
        say(&t.inputs, "u1", Some(&group), "/stop").await;
    });
    assert_eq!(result.unwrap(), GameStatus::GoodGuy);

    let texts = group_texts(&mut t.outbox, &t.group);
    let results = texts
        .iter()
        .find(|s| s.starts_with("Vote results:"))
        .unwrap();
    assert!(results.contains("P1: 4 (P2, P3, P5, P6)"));
    assert!(results.contains("Abstained: 1"));
    assert!(texts.iter().any(|s| s.starts_with("P1 has been voted out.")));

    let report = t.game.death_report();
    let reasons: Vec<_> = report.iter().map(|r| r.kill_info.reason).collect();
    assert_eq!(reasons, vec![KillReason::Werewolf, KillReason::Vote]);
}

#[tokio::test(start_paused = true)]
async fn test_silent_table_times_out_into_a_quiet_vote() {
    let Table {
        game,
        mut outbox,
        ..
    } = table(&[
        Role::Werewolf,
        Role::Werewolf,
        Role::Witch,
        Role::Guard,
        Role::Civilian,
        Role::Civilian,
        Role::Civilian,
    ]);

    // Nobody answers anything: every phase runs into its timeout.
    let (result, texts) = tokio::join!(game.run(), async {
        let mut seen = Vec::new();
        while let Some(out) = outbox.recv().await {
            let done = out.text.starts_with("Nobody cast a vote");
            seen.push(out.text);
            if done {
                break;
            }
        }
        game.terminate();
        seen
    });
    assert!(matches!(result, Err(GameError::Terminated)));
    assert!(game.players().iter().all(|p| p.alive));
    assert!(game.death_report().is_empty());
    assert!(texts.iter().any(|s| s.contains("it was a peaceful night")));
    assert!(texts.iter().any(|s| s == "Nobody was attacked tonight."));
    assert!(texts.iter().any(|s| s == "Voting time is over; you abstained."));
}

#[tokio::test(start_paused = true)]
async fn test_jester_voted_out_wins_alone() {
    let mut t = table(&[
        Role::Werewolf,
        Role::Prophet,
        Role::Guard,
        Role::Jester,
        Role::Civilian,
        Role::Civilian,
    ]);
    let group = t.group.clone();

    let (result, ()) = tokio::join!(t.game.run(), async {
        say(&t.inputs, "u1", None, "5").await;
        say(&t.inputs, "u1", None, "/stop").await;
        say(&t.inputs, "u2", None, "/stop").await;
        say(&t.inputs, "u3", None, "/stop").await;
        say(&t.inputs, "u5", Some(&group), "/stop").await;
        for user in ["u1", "u2", "u3", "u4", "u6"] {
            say(&t.inputs, user, Some(&group), "/stop").await;
        }
        // P4 is third on the lists of P1..P3 and fourth on P6's.
        for user in ["u1", "u2", "u3"] {
            say(&t.inputs, user, None, "3").await;
        }
        say(&t.inputs, "u4", None, "/stop").await;
        say(&t.inputs, "u6", None, "4").await;
    });
    assert_eq!(result.unwrap(), GameStatus::Jester);

    let texts = group_texts(&mut t.outbox, &t.group);
    assert!(texts.last().unwrap().starts_with("Game over: the jester win!"));
}

// =========================================================================
// Construction and lifecycle
// =========================================================================

fn roster(n: usize) -> Vec<(UserId, String)> {
    (1..=n)
        .map(|i| (UserId::from(format!("u{i}")), format!("P{i}")))
        .collect()
}

#[test]
fn test_game_new_deals_a_preset() {
    let (transport, _outbox) = MemoryTransport::new();
    let game = Game::new(
        GroupId::from("g"),
        roster(8),
        GameConfig::default(),
        Arc::new(transport),
        Arc::new(InputStore::new()),
    )
    .unwrap();
    let players = game.players();
    assert_eq!(players.len(), 8);
    let wolves = players
        .iter()
        .filter(|p| matches!(p.role, Role::Werewolf | Role::WolfKing))
        .count();
    assert_eq!(wolves, 2);
    assert!(players.iter().all(|p| p.alive && !p.departed));
}

#[test]
fn test_game_new_rejects_unsupported_count() {
    let (transport, _outbox) = MemoryTransport::new();
    let err = Game::new(
        GroupId::from("g"),
        roster(4),
        GameConfig::default(),
        Arc::new(transport),
        Arc::new(InputStore::new()),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        GameError::Config(ConfigError::UnsupportedPlayerCount { count: 4, .. })
    ));
}

#[test]
fn test_game_with_roles_rejects_duplicate_player() {
    let (transport, _outbox) = MemoryTransport::new();
    let seats = vec![
        (UserId::from("u1"), "A".to_string(), Role::Werewolf),
        (UserId::from("u1"), "B".to_string(), Role::Civilian),
    ];
    let err = Game::with_roles(
        GroupId::from("g"),
        seats,
        GameConfig::default(),
        Arc::new(transport),
        Arc::new(InputStore::new()),
    )
    .unwrap_err();
    assert!(matches!(err, GameError::DuplicatePlayer(id) if id == UserId::from("u1")));
}

#[tokio::test]
async fn test_run_twice_is_rejected() {
    let t = table(&[Role::Werewolf, Role::Civilian, Role::Civilian, Role::Witch]);
    t.game.terminate();
    assert!(matches!(t.game.run().await, Err(GameError::Terminated)));
    assert!(t.game.is_finished());
    assert!(matches!(t.game.run().await, Err(GameError::AlreadyStarted)));
}

#[tokio::test(start_paused = true)]
async fn test_closed_input_store_fails_the_game() {
    let t = table(&[Role::Werewolf, Role::Prophet, Role::Civilian, Role::Civilian]);
    t.inputs.close();
    let result = t.game.run().await;
    assert!(matches!(result, Err(GameError::Mailbox(_))));
}
