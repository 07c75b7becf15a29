//! Per-frame simulation tick
//!
//! Variable timestep: motion scales with the real elapsed time of the frame.
//! Each item falls, is tested against the basket, and is either caught,
//! dropped off the bottom, or kept.

use glam::Vec2;

use super::catch::CatchZone;
use super::pieces::unlock;
use super::state::{Burst, GameEvent, GamePhase, GameState, Item, ItemKind};
use crate::layout::Layout;
use crate::tuning::Tuning;

/// Vertical position of catch bursts, fraction of screen height
const CATCH_BURST_Y: f32 = 0.9;

/// Advance every falling item by `dt` seconds
///
/// No-op unless the game is running. A bomb that takes the last life ends
/// the tick on the spot: items after it are left untouched.
pub fn tick(state: &mut GameState, tuning: &Tuning, layout: &Layout, dt: f32) {
    if !state.is_running() {
        return;
    }

    let zone = CatchZone::for_basket(layout, state.basket_x);
    let burst_origin = Vec2::new(
        layout.viewport.normalize(Vec2::new(state.basket_x, 0.0)).x,
        CATCH_BURST_Y,
    );

    let items = std::mem::take(&mut state.items);
    let mut kept = Vec::with_capacity(items.len());
    let mut halted = false;

    for mut item in items {
        if halted {
            kept.push(item);
            continue;
        }

        let new_y = item.y + item.speed * layout.fall_rate * dt;
        let pos = Vec2::new(layout.item_px_x(item.x), new_y);

        if zone.contains(pos) {
            apply_catch(state, tuning, &item, burst_origin);
            halted = state.phase == GamePhase::Lost;
            continue;
        }

        // Missed items fall away with no penalty
        if new_y < layout.cull_y {
            item.y = new_y;
            kept.push(item);
        }
    }

    state.items = kept;
}

/// Apply the effect of one caught item
fn apply_catch(state: &mut GameState, tuning: &Tuning, item: &Item, burst_origin: Vec2) {
    let (reward, burst) = match item.kind {
        ItemKind::Beer => (tuning.beer, Burst::beer(burst_origin)),
        ItemKind::Wine => (tuning.wine, Burst::wine(burst_origin)),
        ItemKind::Bomb => {
            state.lives = state.lives.saturating_sub(1);
            state.events.push(GameEvent::LifeLost {
                id: item.id,
                lives: state.lives,
            });
            if state.lives == 0 {
                state.phase = GamePhase::Lost;
                state.events.push(GameEvent::GameOver);
                log::info!("Game over (score {}, seed {})", state.score, state.seed);
            }
            return;
        }
    };

    state.score += reward.points;
    state.events.push(GameEvent::Caught {
        id: item.id,
        kind: item.kind,
        score: state.score,
    });

    let pieces = unlock(&mut state.pieces, reward.unlocks, &mut state.rng);
    if !pieces.is_empty() {
        state.events.push(GameEvent::PiecesUnlocked { pieces });
    }
    state.events.push(GameEvent::Burst(burst));

    check_puzzle_complete(state);
}

/// Fire the celebration the first time every piece is revealed
///
/// The win itself is delayed; this only raises `win_requested` for the
/// session driver to schedule.
fn check_puzzle_complete(state: &mut GameState) {
    if state.puzzle_complete || !state.pieces.is_complete() {
        return;
    }
    state.puzzle_complete = true;
    state.win_requested = true;
    state.events.push(GameEvent::PuzzleComplete);
    state.events.push(GameEvent::Burst(Burst::puzzle_complete()));
    log::info!("Puzzle complete (score {})", state.score);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::layout::Viewport;
    use proptest::prelude::*;
    use std::collections::HashSet;

    const VIEW: Viewport = Viewport {
        width: 1000.0,
        height: 800.0,
    };

    fn setup() -> (GameState, Tuning, Layout) {
        let tuning = Tuning::default();
        let layout = Layout::new(&tuning, VIEW);
        let mut state = GameState::new(12345, 0, 500.0);
        state.phase = GamePhase::Running;
        (state, tuning, layout)
    }

    /// Item that lands mid-band after a 0.1 s tick at speed 1.0 (wide: 500 px/s)
    fn push_item(state: &mut GameState, kind: ItemKind, x: f32) -> u32 {
        let id = state.next_item_id();
        state.items.push(Item {
            id,
            x,
            y: 680.0,
            kind,
            speed: 1.0,
        });
        id
    }

    #[test]
    fn test_items_fall() {
        let (mut state, tuning, layout) = setup();
        let id = state.next_item_id();
        state.items.push(Item {
            id,
            x: 20.0,
            y: -100.0,
            kind: ItemKind::Beer,
            speed: 2.0,
        });
        tick(&mut state, &tuning, &layout, 0.1);
        assert!((state.items[0].y - 0.0).abs() < 0.001);
    }

    #[test]
    fn test_beer_catch() {
        let (mut state, tuning, layout) = setup();
        push_item(&mut state, ItemKind::Beer, 50.0);

        tick(&mut state, &tuning, &layout, 0.1);

        assert!(state.items.is_empty());
        assert_eq!(state.score, 10);
        assert_eq!(state.lives, STARTING_LIVES);
        assert_eq!(state.pieces.len(), 1);
        assert!(state.pieces.iter().all(|p| p as usize >= SECONDARY_PIECES));

        let events = state.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::Caught { kind: ItemKind::Beer, score: 10, .. })));
        let burst = events
            .iter()
            .find_map(|e| match e {
                GameEvent::Burst(b) => Some(b.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(burst.particle_count, 10);
        assert_eq!(burst.origin, Vec2::new(0.5, 0.9));
    }

    #[test]
    fn test_wine_catch() {
        let (mut state, tuning, layout) = setup();
        push_item(&mut state, ItemKind::Wine, 50.0);

        tick(&mut state, &tuning, &layout, 0.1);

        assert_eq!(state.score, 50);
        assert_eq!(state.pieces.len(), 3);
        assert!(state.drain_events().iter().any(|e| matches!(e, GameEvent::Burst(b) if b.particle_count == 25)));
    }

    #[test]
    fn test_bomb_catch() {
        let (mut state, tuning, layout) = setup();
        push_item(&mut state, ItemKind::Bomb, 50.0);

        tick(&mut state, &tuning, &layout, 0.1);

        assert_eq!(state.lives, 2);
        assert_eq!(state.score, 0);
        assert!(state.pieces.is_empty());
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_last_life_ends_game() {
        let (mut state, tuning, layout) = setup();
        state.lives = 1;
        push_item(&mut state, ItemKind::Bomb, 50.0);

        tick(&mut state, &tuning, &layout, 0.1);

        assert_eq!(state.lives, 0);
        assert!(state.game_over());
        let over = state.drain_events().iter().filter(|e| **e == GameEvent::GameOver).count();
        assert_eq!(over, 1);
    }

    #[test]
    fn test_loss_halts_tick() {
        let (mut state, tuning, layout) = setup();
        state.lives = 1;
        push_item(&mut state, ItemKind::Bomb, 50.0);
        let beer = push_item(&mut state, ItemKind::Beer, 50.0);

        tick(&mut state, &tuning, &layout, 0.1);

        // Beer behind the bomb is frozen, not scored
        assert_eq!(state.score, 0);
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].id, beer);
        assert_eq!(state.items[0].y, 680.0);

        // Nothing moves once the game is over
        tick(&mut state, &tuning, &layout, 0.1);
        assert_eq!(state.items[0].y, 680.0);
        assert_eq!(state.lives, 0);
    }

    #[test]
    fn test_miss_outside_basket() {
        let (mut state, tuning, layout) = setup();
        // 10% of 1000px = 100px, basket spans 425..575
        push_item(&mut state, ItemKind::Beer, 10.0);

        tick(&mut state, &tuning, &layout, 0.1);

        assert_eq!(state.score, 0);
        assert_eq!(state.items.len(), 1);
        assert!((state.items[0].y - 730.0).abs() < 0.001);
    }

    #[test]
    fn test_culled_below_screen() {
        let (mut state, tuning, layout) = setup();
        let id = state.next_item_id();
        state.items.push(Item {
            id,
            x: 10.0,
            y: 890.0,
            kind: ItemKind::Bomb,
            speed: 1.0,
        });

        tick(&mut state, &tuning, &layout, 0.1);

        assert!(state.items.is_empty());
        assert_eq!(state.lives, STARTING_LIVES);
        assert_eq!(state.score, 0);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_not_running_is_noop() {
        let (mut state, tuning, layout) = setup();
        state.phase = GamePhase::Ready;
        push_item(&mut state, ItemKind::Beer, 50.0);
        tick(&mut state, &tuning, &layout, 0.1);
        assert_eq!(state.items[0].y, 680.0);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_final_piece_requests_win_once() {
        let (mut state, tuning, layout) = setup();
        for p in 0..15 {
            state.pieces.insert(p);
        }
        push_item(&mut state, ItemKind::Beer, 50.0);
        tick(&mut state, &tuning, &layout, 0.1);

        assert!(state.pieces.is_complete());
        assert!(state.puzzle_complete);
        assert!(state.win_requested);
        // Still playing until the delay elapses
        assert_eq!(state.phase, GamePhase::Running);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::PuzzleComplete));
        assert!(events.contains(&GameEvent::Burst(Burst::puzzle_complete())));

        // More catches after completion don't re-trigger
        state.win_requested = false;
        push_item(&mut state, ItemKind::Wine, 50.0);
        tick(&mut state, &tuning, &layout, 0.1);
        assert_eq!(state.score, 60);
        assert!(!state.win_requested);
        assert!(!state.drain_events().contains(&GameEvent::PuzzleComplete));
    }

    #[test]
    fn test_compact_fall_rate() {
        let tuning = Tuning::default();
        let layout = Layout::new(&tuning, Viewport::new(400.0, 800.0));
        let mut state = GameState::new(1, 0, 0.0);
        state.phase = GamePhase::Running;
        let id = state.next_item_id();
        state.items.push(Item {
            id,
            x: 50.0,
            y: 0.0,
            kind: ItemKind::Beer,
            speed: 1.0,
        });
        tick(&mut state, &tuning, &layout, 1.0);
        assert!((state.items[0].y - 350.0).abs() < 0.001);
    }

    fn arb_kind() -> impl Strategy<Value = ItemKind> {
        prop_oneof![Just(ItemKind::Beer), Just(ItemKind::Wine), Just(ItemKind::Bomb)]
    }

    proptest! {
        #[test]
        fn prop_tick_accounts_for_every_item(
            drops in prop::collection::vec((0.0f32..100.0, -200.0f32..900.0, arb_kind(), 1.0f32..4.0), 0..30),
            basket_x in 0.0f32..1000.0,
            lives in 1u8..=3,
            dt in 0.0f32..0.1,
        ) {
            let (mut state, tuning, layout) = setup();
            state.basket_x = basket_x;
            state.lives = lives;
            for (x, y, kind, speed) in drops {
                let id = state.next_item_id();
                state.items.push(Item { id, x, y, kind, speed });
            }
            let before: Vec<u32> = state.items.iter().map(|i| i.id).collect();

            tick(&mut state, &tuning, &layout, dt);

            let after: Vec<u32> = state.items.iter().map(|i| i.id).collect();
            let unique: HashSet<u32> = after.iter().copied().collect();
            prop_assert_eq!(unique.len(), after.len());
            prop_assert!(after.iter().all(|id| before.contains(id)));

            let events = state.drain_events();
            let mut points = 0;
            let mut bombs = 0u8;
            let mut caught = HashSet::new();
            for event in &events {
                match event {
                    GameEvent::Caught { id, kind, .. } => {
                        prop_assert!(caught.insert(*id));
                        points += match kind {
                            ItemKind::Beer => 10,
                            ItemKind::Wine => 50,
                            ItemKind::Bomb => 0,
                        };
                    }
                    GameEvent::LifeLost { id, .. } => {
                        prop_assert!(caught.insert(*id));
                        bombs += 1;
                    }
                    _ => {}
                }
            }
            // Caught items are gone
            prop_assert!(after.iter().all(|id| !caught.contains(id)));
            prop_assert_eq!(state.score, points);
            prop_assert_eq!(state.lives, lives - bombs);
            prop_assert_eq!(state.game_over(), state.lives == 0);
            let overs = events.iter().filter(|e| **e == GameEvent::GameOver).count();
            prop_assert_eq!(overs, usize::from(state.lives == 0));
        }
    }
}
