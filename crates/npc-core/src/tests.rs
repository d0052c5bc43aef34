//! Unit tests for npc-core primitives.

use crate::RandomSource;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Replays a fixed list of draws, then keeps returning the last one.
struct ScriptedRng {
    draws: Vec<usize>,
    next:  usize,
}

impl ScriptedRng {
    fn new(draws: &[usize]) -> Self {
        Self { draws: draws.to_vec(), next: 0 }
    }
}

impl RandomSource for ScriptedRng {
    fn index(&mut self, upper: usize) -> usize {
        let i = self.next.min(self.draws.len() - 1);
        self.next += 1;
        self.draws[i] % upper
    }

    fn inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        lo + self.index((hi - lo + 1) as usize) as u32
    }
}

#[cfg(test)]
mod ids {
    use crate::{ClipId, NpcId};

    #[test]
    fn index_roundtrip() {
        let id = NpcId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NpcId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_is_default() {
        assert_eq!(NpcId::default(), NpcId::INVALID);
        assert_eq!(NpcId::INVALID.0, u32::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(NpcId(7).to_string(), "NpcId(7)");
        assert_eq!(ClipId::from("Wave").to_string(), "Wave");
    }
}

#[cfg(test)]
mod geo {
    use std::f32::consts::{FRAC_PI_2, PI};

    use crate::{Position, Yaw};

    #[test]
    fn yaw_ignores_height() {
        let a = Position::new(0.0, 0.0, 0.0);
        let b = Position::new(1.0, 5.0, 0.0);
        let yaw = a.yaw_to(b).unwrap();
        assert!((yaw.radians() - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn yaw_undefined_when_stacked() {
        let a = Position::new(2.0, 0.0, 3.0);
        assert!(a.yaw_to(Position::new(2.0, 9.0, 3.0)).is_none());
    }

    #[test]
    fn lerp_takes_shortest_arc() {
        let from = Yaw::new(PI - 0.1);
        let to = Yaw::new(-PI + 0.1);
        let mid = from.lerp(to, 0.5);
        // Crossing ±π, not sweeping through 0.
        assert!(mid.radians().abs() > PI - 0.01, "got {}", mid.radians());
    }

    #[test]
    fn step_towards_stops_on_target() {
        let a = Position::ORIGIN;
        let b = Position::new(3.0, 0.0, 4.0);
        assert_eq!(a.step_towards(b, 10.0), b);
        let half = a.step_towards(b, 2.5);
        assert!((half.distance(b) - 2.5).abs() < 1e-5);
    }
}

#[cfg(test)]
mod time {
    use crate::{GameClock, Millis, Tick, WorldConfig};

    #[test]
    fn halves_put_odd_ms_second() {
        assert_eq!(Millis(4000).halves(), (Millis(2000), Millis(2000)));
        assert_eq!(Millis(1001).halves(), (Millis(500), Millis(501)));
        assert_eq!(Millis(0).halves(), (Millis(0), Millis(0)));
    }

    #[test]
    fn from_secs_f32_rounds_and_clamps() {
        assert_eq!(Millis::from_secs_f32(0.75), Millis(750));
        assert_eq!(Millis::from_secs_f32(-3.0), Millis::ZERO);
        assert_eq!(Millis::from_secs_f32(f32::NAN), Millis::ZERO);
    }

    #[test]
    fn clock_elapsed() {
        let mut clock = GameClock::new(Millis(20));
        for _ in 0..50 {
            clock.advance();
        }
        assert_eq!(clock.current_tick, Tick(50));
        assert_eq!(clock.elapsed(), Millis(1000));
    }

    #[test]
    fn config_defaults() {
        let cfg = WorldConfig { total_ticks: 10, ..WorldConfig::default() };
        assert_eq!(cfg.end_tick(), Tick(10));
        assert_eq!(cfg.make_clock().tick_ms, Millis(20));
    }
}

#[cfg(test)]
mod rng {
    use crate::{NpcId, NpcRng, RandomSource, WorldRng};

    #[test]
    fn same_seed_same_stream() {
        let mut a = NpcRng::new(42, NpcId(3));
        let mut b = NpcRng::new(42, NpcId(3));
        for _ in 0..32 {
            assert_eq!(a.index(1000), b.index(1000));
        }
    }

    #[test]
    fn npcs_get_distinct_streams() {
        let mut a = NpcRng::new(42, NpcId(0));
        let mut b = NpcRng::new(42, NpcId(1));
        let da: Vec<usize> = (0..16).map(|_| a.index(1 << 20)).collect();
        let db: Vec<usize> = (0..16).map(|_| b.index(1 << 20)).collect();
        assert_ne!(da, db);
    }

    #[test]
    fn inclusive_bounds() {
        let mut rng = WorldRng::new(7);
        for _ in 0..200 {
            let v = rng.inclusive(2, 4);
            assert!((2..=4).contains(&v));
        }
        assert_eq!(rng.inclusive(5, 5), 5);
    }
}

#[cfg(test)]
mod select {
    use super::ScriptedRng;
    use crate::{ActionSelector, NpcId, NpcRng, SelectionCursor, SortMode, select_first, select_next};

    #[test]
    fn round_robin_wraps() {
        let mut rng = ScriptedRng::new(&[0]);
        assert_eq!(select_next(SortMode::RoundRobin, 3, Some(2), false, &mut rng), 0);
        assert_eq!(select_next(SortMode::RoundRobin, 3, Some(0), false, &mut rng), 1);
    }

    #[test]
    fn reverse_wraps() {
        let mut rng = ScriptedRng::new(&[0]);
        assert_eq!(select_next(SortMode::RoundRobinReverse, 3, Some(0), false, &mut rng), 2);
        assert_eq!(select_next(SortMode::RoundRobinReverse, 3, Some(2), false, &mut rng), 1);
    }

    #[test]
    fn uninitialised_cursor_behaves_like_minus_one() {
        let mut rng = ScriptedRng::new(&[0]);
        assert_eq!(select_next(SortMode::RoundRobin, 3, None, false, &mut rng), 0);
        assert_eq!(select_next(SortMode::RoundRobinReverse, 3, None, false, &mut rng), 2);
    }

    #[test]
    fn first_per_mode() {
        let mut rng = ScriptedRng::new(&[1]);
        assert_eq!(select_first(SortMode::RoundRobin, 4, &mut rng), 0);
        assert_eq!(select_first(SortMode::RoundRobinReverse, 4, &mut rng), 3);
        assert_eq!(select_first(SortMode::Random, 4, &mut rng), 1);
    }

    #[test]
    fn round_robin_visits_every_index_once_before_repeating() {
        let mut rng = ScriptedRng::new(&[0]);
        for mode in [SortMode::RoundRobin, SortMode::RoundRobinReverse] {
            for n in 1..=9 {
                for start in 0..n {
                    let mut seen = vec![false; n];
                    let mut cur = start;
                    for _ in 0..n {
                        cur = select_next(mode, n, Some(cur), false, &mut rng);
                        assert!(!seen[cur], "{mode:?} n={n} start={start} repeated {cur}");
                        seen[cur] = true;
                    }
                    assert_eq!(cur, start);
                }
            }
        }
    }

    #[test]
    fn exclude_current_never_repeats_for_two_or_more() {
        for mode in [SortMode::RoundRobin, SortMode::RoundRobinReverse, SortMode::Random] {
            for n in 2..=8 {
                let mut rng = NpcRng::new(99, NpcId(n as u32));
                for current in 0..n {
                    for _ in 0..64 {
                        let next = select_next(mode, n, Some(current), true, &mut rng);
                        assert_ne!(next, current, "{mode:?} n={n}");
                        assert!(next < n);
                    }
                }
            }
        }
    }

    #[test]
    fn random_redraw_is_bounded() {
        // A source that always draws the current index: after the redraw cap
        // one last draw over the other slots ends the loop.
        let mut rng = ScriptedRng::new(&[1]);
        assert_eq!(select_next(SortMode::Random, 3, Some(1), true, &mut rng), 2);
        assert_eq!(rng.next as u32, 2 + crate::select::MAX_REDRAWS);
    }

    #[test]
    fn random_redraw_skips_current() {
        let mut rng = ScriptedRng::new(&[2, 2, 0]);
        assert_eq!(select_next(SortMode::Random, 3, Some(2), true, &mut rng), 0);
    }

    #[test]
    fn single_element_pool_repeats() {
        let mut rng = NpcRng::new(1, NpcId(0));
        for mode in [SortMode::RoundRobin, SortMode::RoundRobinReverse, SortMode::Random] {
            assert_eq!(select_next(mode, 1, Some(0), true, &mut rng), 0);
        }
    }

    #[test]
    fn cursor_records_and_handles_empty() {
        let sel = ActionSelector::new(SortMode::RoundRobin, false);
        let mut rng = ScriptedRng::new(&[0]);
        let mut cursor = SelectionCursor::new();
        assert_eq!(cursor.advance(sel, 0, &mut rng), None);
        assert_eq!(cursor.current(), None);
        assert_eq!(cursor.advance(sel, 3, &mut rng), Some(0));
        assert_eq!(cursor.advance(sel, 3, &mut rng), Some(1));
        assert_eq!(cursor.current(), Some(1));
        cursor.reset();
        assert_eq!(cursor.advance(sel, 3, &mut rng), Some(0));
    }

    #[test]
    fn parse_sort_modes() {
        assert_eq!(SortMode::parse("RoundRobin"), Some(SortMode::RoundRobin));
        assert_eq!(SortMode::parse(" reverse "), Some(SortMode::RoundRobinReverse));
        assert_eq!(SortMode::parse("RANDOM"), Some(SortMode::Random));
        assert_eq!(SortMode::parse("shuffle"), None);
    }
}

#[cfg(test)]
mod wait {
    use crate::{Millis, Timer, WaitError, WaitPoll, WaitScope};

    #[test]
    fn timer_elapses() {
        let mut scope = WaitScope::new();
        let token = scope.arm();
        let mut timer = Timer::start(&scope, token, Millis(100)).unwrap();
        assert_eq!(timer.poll(&scope, Millis(60)), Ok(WaitPoll::Pending { remaining: Millis(40) }));
        assert_eq!(timer.poll(&scope, Millis(60)), Ok(WaitPoll::Elapsed));
    }

    #[test]
    fn cancel_reports_remaining_and_freezes() {
        let mut scope = WaitScope::new();
        let token = scope.arm();
        let mut timer = Timer::start(&scope, token, Millis(4000)).unwrap();
        timer.poll(&scope, Millis(1500)).unwrap();
        assert!(scope.cancel());
        // Time spent parked does not count.
        assert_eq!(timer.poll(&scope, Millis(2000)), Ok(WaitPoll::Cancelled { remaining: Millis(2500) }));
        assert_eq!(timer.remaining(), Millis(2500));
    }

    #[test]
    fn cancelled_token_cannot_be_reused() {
        let mut scope = WaitScope::new();
        let token = scope.arm();
        scope.cancel();
        assert_eq!(Timer::start(&scope, token, Millis(10)).unwrap_err(), WaitError::TokenCancelled);
        let fresh = scope.arm();
        assert!(Timer::start(&scope, fresh, Millis(10)).is_ok());
        assert_eq!(Timer::start(&scope, token, Millis(10)).unwrap_err(), WaitError::StaleToken);
    }

    #[test]
    fn rearming_supersedes_old_timer() {
        let mut scope = WaitScope::new();
        let old = scope.arm();
        let mut timer = Timer::start(&scope, old, Millis(10)).unwrap();
        scope.arm();
        assert_eq!(timer.poll(&scope, Millis(1)), Err(WaitError::StaleToken));
    }

    #[test]
    fn cancel_without_arm_is_noop() {
        let mut scope = WaitScope::new();
        assert!(!scope.cancel());
        scope.arm();
        assert!(scope.cancel());
        assert!(!scope.cancel());
        assert!(scope.is_cancelled());
        scope.disarm();
        assert!(!scope.is_cancelled());
    }
}
