//! Unit tests for npc-plan.

use npc_core::{ActionSelector, NpcId, NpcRng, SortMode};

use crate::{ActionPool, ActionSpec, Timing};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn pool(n: usize, mode: SortMode, min: u32, max: u32) -> ActionPool {
    let actions = (0..n).map(|i| ActionSpec::new(format!("a{i}"))).collect();
    ActionPool::new(actions, ActionSelector::new(mode, false), Timing::Short, min, max).unwrap()
}

fn rng() -> NpcRng {
    NpcRng::new(7, NpcId(0))
}

// ── ActionPool ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod action_pool {
    use npc_core::{ClipId, Millis};

    use super::*;
    use crate::PlanError;

    #[test]
    fn round_robin_from_uninitialised_cursor() {
        let mut p = pool(3, SortMode::RoundRobin, 2, 2);
        let mut r = rng();
        assert_eq!(p.cursor(), None);
        let picks: Vec<usize> = (0..4).map(|_| p.next_action(&mut r).unwrap().0).collect();
        assert_eq!(picks, vec![0, 1, 2, 0]);
        assert_eq!(p.cursor(), Some(0));
    }

    #[test]
    fn reverse_starts_at_end() {
        let mut p = pool(3, SortMode::RoundRobinReverse, 1, 1);
        let mut r = rng();
        let picks: Vec<usize> = (0..3).map(|_| p.next_action(&mut r).unwrap().0).collect();
        assert_eq!(picks, vec![2, 1, 0]);
    }

    #[test]
    fn empty_pool_dispenses_nothing() {
        let mut p = ActionPool::empty();
        assert!(p.next_action(&mut rng()).is_none());
        assert_eq!(p.cursor(), None);
    }

    #[test]
    fn min_above_max_rejected() {
        let err = ActionPool::new(vec![], ActionSelector::default(), Timing::Short, 3, 1);
        assert!(matches!(err, Err(PlanError::InvalidCounts { min: 3, max: 1 })));
    }

    #[test]
    fn roll_stays_in_range() {
        let p = pool(2, SortMode::Random, 1, 4);
        let mut r = rng();
        for _ in 0..200 {
            let n = p.roll_action_count(&mut r);
            assert!((1..=4).contains(&n));
        }
        let fixed = pool(2, SortMode::Random, 2, 2);
        assert_eq!(fixed.roll_action_count(&mut r), 2);
    }

    #[test]
    fn duration_prefers_clip_length() {
        let p = pool(1, SortMode::RoundRobin, 1, 1);
        let with_clip = ActionSpec::new("wave").with_clip("Wave");
        let d = p.duration_for(&with_clip, |c: &ClipId| (c.as_str() == "Wave").then_some(Millis(1800)));
        assert_eq!(d, Millis(1800));
    }

    #[test]
    fn duration_falls_back_to_timing() {
        let p = pool(1, SortMode::RoundRobin, 1, 1);
        let no_clip = ActionSpec::new("think");
        assert_eq!(p.duration_for(&no_clip, |_| Some(Millis(9))), Timing::Short.delay());

        let unknown = ActionSpec::new("dance").with_clip("Missing");
        assert_eq!(p.duration_for(&unknown, |_| None), Timing::Short.delay());
    }

    #[test]
    fn timing_parse() {
        assert_eq!(Timing::parse("Long"), Some(Timing::Long));
        assert_eq!(Timing::parse(" 750 "), Some(Timing::Custom(Millis(750))));
        assert_eq!(Timing::parse("soon"), None);
        assert_eq!(Timing::Instant.delay(), Millis::ZERO);
    }
}

// ── PatrolRoute ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod route {
    use npc_core::Position;

    use super::*;
    use crate::{Checkpoint, PatrolRoute};

    fn route(n: usize, mode: SortMode) -> PatrolRoute {
        let cps = (0..n)
            .map(|i| Checkpoint::new(format!("c{i}"), Position::new(i as f32, 0.0, 0.0), ActionPool::empty()))
            .collect();
        PatrolRoute::new(cps, ActionSelector::new(mode, true))
    }

    #[test]
    fn visits_every_checkpoint_once() {
        let mut r = route(4, SortMode::RoundRobin);
        let mut g = rng();
        let mut seen: Vec<usize> = (0..4).map(|_| r.next_checkpoint(&mut g).unwrap()).collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }

    #[test]
    fn starting_at_continues_from_index() {
        let mut r = route(3, SortMode::RoundRobin).starting_at(1);
        assert_eq!(r.next_checkpoint(&mut rng()), Some(2));
    }

    #[test]
    fn random_never_repeats_checkpoint() {
        let mut r = route(2, SortMode::Random);
        let mut g = rng();
        let mut last = r.next_checkpoint(&mut g).unwrap();
        for _ in 0..100 {
            let next = r.next_checkpoint(&mut g).unwrap();
            assert_ne!(next, last);
            last = next;
        }
    }

    #[test]
    fn empty_route() {
        let mut r = PatrolRoute::empty();
        assert!(r.is_empty());
        assert_eq!(r.next_checkpoint(&mut rng()), None);
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use npc_core::{HookId, Millis, Position};

    use super::*;
    use crate::{PlanError, load_routes_reader};

    const HEADER: &str = "npc_id,checkpoint,x,y,z,route_sort,route_exclude,action,clip,pool_sort,pool_exclude,timing,min_actions,max_actions,on_start,on_end,on_arrive\n";

    fn csv(rows: &str) -> Cursor<String> {
        Cursor::new(format!("{HEADER}{rows}"))
    }

    const VILLAGE: &str = "\
0,well,0,0,0,roundrobin,false,drink,Drink,random,true,short,1,2,,drank,at_well
0,well,0,0,0,roundrobin,false,look,LookAround,random,true,short,1,2,,,at_well
0,stall,8,0,3,roundrobin,false,haggle,Talk,roundrobin,false,1200,2,2,haggle_start,,
2,bench,-4,0,1,random,true,,,roundrobin,false,instant,0,0,,,
";

    #[test]
    fn groups_rows_into_checkpoints() {
        let routes = load_routes_reader(csv(VILLAGE), 3).unwrap();
        assert_eq!(routes.len(), 3);

        let r0 = &routes[0];
        assert_eq!(r0.len(), 2);
        assert_eq!(r0.selector.mode, SortMode::RoundRobin);
        let well = r0.checkpoint(0).unwrap();
        assert_eq!(well.name, "well");
        assert_eq!(well.pool.len(), 2);
        assert_eq!(well.pool.selector, ActionSelector::new(SortMode::Random, true));
        assert_eq!(well.pool.count_range(), (1, 2));
        assert_eq!(well.on_arrive, Some(HookId::from("at_well")));
        assert_eq!(well.pool.action(0).unwrap().on_end, Some(HookId::from("drank")));
        assert_eq!(well.pool.action(1).unwrap().on_end, None);

        let stall = r0.checkpoint(1).unwrap();
        assert_eq!(stall.position, Position::new(8.0, 0.0, 3.0));
        assert_eq!(stall.pool.timing, Timing::Custom(Millis(1200)));
        assert_eq!(stall.on_arrive, None);
    }

    #[test]
    fn missing_npc_gets_empty_route() {
        let routes = load_routes_reader(csv(VILLAGE), 3).unwrap();
        assert!(routes[1].is_empty());
    }

    #[test]
    fn row_without_action_declares_empty_checkpoint() {
        let routes = load_routes_reader(csv(VILLAGE), 3).unwrap();
        let bench = routes[2].checkpoint(0).unwrap();
        assert!(bench.pool.is_empty());
        assert_eq!(routes[2].selector, ActionSelector::new(SortMode::Random, true));
    }

    #[test]
    fn invalid_sort_mode_errors() {
        let rows = "0,well,0,0,0,sideways,false,drink,Drink,random,true,short,1,2,,,\n";
        assert!(matches!(load_routes_reader(csv(rows), 1), Err(PlanError::Parse(_))));
    }

    #[test]
    fn invalid_timing_errors() {
        let rows = "0,well,0,0,0,random,false,drink,Drink,random,true,sometime,1,2,,,\n";
        assert!(matches!(load_routes_reader(csv(rows), 1), Err(PlanError::Parse(_))));
    }

    #[test]
    fn min_above_max_errors() {
        let rows = "0,well,0,0,0,random,false,drink,Drink,random,true,short,3,1,,,\n";
        assert!(matches!(load_routes_reader(csv(rows), 1), Err(PlanError::Parse(_))));
    }

    #[test]
    fn npc_out_of_range_errors() {
        let rows = "5,well,0,0,0,random,false,drink,Drink,random,true,short,1,1,,,\n";
        assert!(matches!(load_routes_reader(csv(rows), 2), Err(PlanError::Parse(_))));
    }
}
