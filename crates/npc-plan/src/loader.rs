//! CSV route loader.
//!
//! # CSV format
//!
//! One row per action.  Rows sharing `npc_id` and `checkpoint` build one
//! checkpoint; checkpoints keep the order in which they first appear.
//!
//! ```csv
//! npc_id,checkpoint,x,y,z,route_sort,route_exclude,action,clip,pool_sort,pool_exclude,timing,min_actions,max_actions,on_start,on_end,on_arrive
//! 0,well,0,0,0,roundrobin,false,drink,Drink,random,true,short,1,2,,drank,at_well
//! 0,well,0,0,0,roundrobin,false,look,LookAround,random,true,short,1,2,,,at_well
//! 0,stall,8,0,3,roundrobin,false,haggle,Talk,roundrobin,false,medium,2,2,haggle_start,,
//! ```
//!
//! Checkpoint-level columns (`x`, `y`, `z`, `on_arrive`, the pool columns) are
//! taken from the checkpoint's first row; route-level columns (`route_sort`,
//! `route_exclude`) from the NPC's first row.  A row with an empty `action`
//! declares a checkpoint without adding an action to its pool.
//!
//! Sort modes accept `roundrobin`, `reverse`, `random`.  Timings accept
//! `instant`, `short`, `medium`, `long`, or a millisecond count.
//!
//! NPCs absent from the CSV receive an empty [`PatrolRoute`].

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use npc_core::{ActionSelector, ClipId, HookId, Position, SortMode};

use crate::{ActionPool, ActionSpec, Checkpoint, PatrolRoute, PlanError, Timing};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RouteRecord {
    npc_id:        u32,
    checkpoint:    String,
    x:             f32,
    y:             f32,
    z:             f32,
    route_sort:    String,
    route_exclude: bool,
    action:        Option<String>,
    clip:          Option<String>,
    pool_sort:     String,
    pool_exclude:  bool,
    timing:        String,
    min_actions:   u32,
    max_actions:   u32,
    on_start:      Option<String>,
    on_end:        Option<String>,
    on_arrive:     Option<String>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load per-NPC `PatrolRoute`s from a CSV file.
///
/// Returns a `Vec` of length `npc_count`, indexed by `NpcId`.
pub fn load_routes_csv(path: &Path, npc_count: usize) -> Result<Vec<PatrolRoute>, PlanError> {
    let file = std::fs::File::open(path).map_err(PlanError::Io)?;
    load_routes_reader(file, npc_count)
}

/// Like [`load_routes_csv`] but accepts any `Read` source.
pub fn load_routes_reader<R: Read>(
    reader:    R,
    npc_count: usize,
) -> Result<Vec<PatrolRoute>, PlanError> {
    // ── Parse CSV rows ────────────────────────────────────────────────────
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut by_npc: HashMap<u32, Vec<RouteRecord>> = HashMap::new();

    for result in csv_reader.deserialize::<RouteRecord>() {
        let row = result.map_err(|e| PlanError::Parse(e.to_string()))?;
        if row.npc_id as usize >= npc_count {
            return Err(PlanError::Parse(format!(
                "npc_id {} out of range for {npc_count} NPCs",
                row.npc_id
            )));
        }
        by_npc.entry(row.npc_id).or_default().push(row);
    }

    // ── Build one PatrolRoute per NPC ─────────────────────────────────────
    let mut routes = Vec::with_capacity(npc_count);
    for i in 0..npc_count as u32 {
        match by_npc.remove(&i) {
            None => routes.push(PatrolRoute::empty()),
            Some(rows) => {
                let route = build_route(rows)?;
                debug!(npc = i, checkpoints = route.len(), "route loaded");
                routes.push(route);
            }
        }
    }
    Ok(routes)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn build_route(rows: Vec<RouteRecord>) -> Result<PatrolRoute, PlanError> {
    let selector = ActionSelector::new(parse_sort(&rows[0].route_sort)?, rows[0].route_exclude);

    // Group by checkpoint name, preserving first-appearance order.
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<RouteRecord>> = HashMap::new();
    for row in rows {
        if !groups.contains_key(&row.checkpoint) {
            order.push(row.checkpoint.clone());
        }
        groups.entry(row.checkpoint.clone()).or_default().push(row);
    }

    let checkpoints = order
        .into_iter()
        .filter_map(|name| groups.remove(&name).map(|rows| (name, rows)))
        .map(|(name, rows)| build_checkpoint(name, rows))
        .collect::<Result<Vec<_>, PlanError>>()?;

    Ok(PatrolRoute::new(checkpoints, selector))
}

fn build_checkpoint(name: String, rows: Vec<RouteRecord>) -> Result<Checkpoint, PlanError> {
    let head = &rows[0];
    let position = Position::new(head.x, head.y, head.z);
    let selector = ActionSelector::new(parse_sort(&head.pool_sort)?, head.pool_exclude);
    let timing = Timing::parse(&head.timing).ok_or_else(|| {
        PlanError::Parse(format!(
            "invalid timing {:?} at checkpoint {name:?}: expected instant, short, medium, long, or ms",
            head.timing
        ))
    })?;
    let (min, max) = (head.min_actions, head.max_actions);
    if min > max {
        return Err(PlanError::Parse(format!(
            "checkpoint {name:?}: min_actions {min} exceeds max_actions {max}"
        )));
    }
    let on_arrive = head.on_arrive.as_deref().map(HookId::from);

    let actions: Vec<ActionSpec> = rows
        .into_iter()
        .filter_map(|r| {
            let action = r.action?;
            Some(ActionSpec {
                name:     action,
                clip:     r.clip.map(ClipId::new),
                on_start: r.on_start.map(HookId::new),
                on_end:   r.on_end.map(HookId::new),
            })
        })
        .collect();

    let pool = ActionPool::new(actions, selector, timing, min, max)?;
    Ok(Checkpoint { name, position, pool, on_arrive })
}

fn parse_sort(s: &str) -> Result<SortMode, PlanError> {
    SortMode::parse(s).ok_or_else(|| {
        PlanError::Parse(format!(
            "invalid sort mode {s:?}: expected \"roundrobin\", \"reverse\", or \"random\""
        ))
    })
}
