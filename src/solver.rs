//! Exhaustive block placement search.
//!
//! Candidate layouts are enumerated as disjoint subsets of the open slots,
//! one subset per block kind: refractive blocks first, then reflective
//! blocks from the slots left over, then opaque blocks from what remains.
//! Subsets are combinations, so blocks of the same kind are never permuted.
//!
//! Each candidate gets its own freshly built grid and is traced; the first
//! layout that lights every target wins. There is no pruning: worst case the
//! search traces `C(n, c) * C(n - c, a) * C(n - c - a, b)` layouts.

use itertools::Itertools;
use rustc_hash::FxHashSet;

use crate::blocks::{BlockKind, Inventory};
use crate::board::Board;
use crate::geometry::{Point, Slot};
use crate::grid::Grid;
use crate::tracer::{LightModel, Tracer, DEFAULT_STEP_CAP};

/// Knobs for one search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Per-ray-thread step limit handed to the tracer.
    pub step_cap: usize,
    /// Report the best partial layout when no solution exists.
    pub diagnose: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            step_cap: DEFAULT_STEP_CAP,
            diagnose: false,
        }
    }
}

/// Best partial result of a failed search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnosis {
    /// Most targets lit by any single candidate.
    pub best_hits: usize,
    /// Number of distinct targets on the board.
    pub total_targets: usize,
    /// First layout that reached `best_hits`; `None` if no candidate lit anything.
    pub best_layout: Option<Grid>,
}

/// Outcome of a search run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    pub solution: Option<Grid>,
    /// Only present when diagnosis was requested and no solution was found.
    pub diagnosis: Option<Diagnosis>,
    /// Number of candidate layouts traced.
    pub candidates: u64,
}

impl SearchReport {
    pub fn is_solved(&self) -> bool {
        self.solution.is_some()
    }
}

/// Finds the first layout that lights every target, tracing with the default
/// step cap.
pub fn search(
    template: &Board,
    inventory: &Inventory,
    open_slots: &[Slot],
    diagnose: bool,
) -> Option<Grid> {
    let options = SearchOptions {
        diagnose,
        ..SearchOptions::default()
    };
    let tracer = Tracer::new(options.step_cap);
    let report = search_with(&tracer, template, inventory, open_slots, &options);

    if let Some(diagnosis) = &report.diagnosis {
        match &diagnosis.best_layout {
            Some(layout) => log::warn!(
                "no solution; best hit = {}/{}, best partial layout:\n{layout}",
                diagnosis.best_hits,
                diagnosis.total_targets
            ),
            None => log::warn!(
                "no solution; best hit = 0/{}",
                diagnosis.total_targets
            ),
        }
    }
    report.solution
}

/// Runs the placement search, using `model` to score each candidate.
pub fn search_with<M: LightModel + ?Sized>(
    model: &M,
    template: &Board,
    inventory: &Inventory,
    open_slots: &[Slot],
    options: &SearchOptions,
) -> SearchReport {
    let targets: FxHashSet<Point> = template.targets.iter().copied().collect();
    let total_targets = targets.len();

    let unsolved = |best_hits: usize, best_layout: Option<Grid>, candidates: u64| SearchReport {
        solution: None,
        diagnosis: options.diagnose.then(|| Diagnosis {
            best_hits,
            total_targets,
            best_layout,
        }),
        candidates,
    };

    if inventory.total() > open_slots.len() {
        log::info!(
            "inventory ({}) needs {} slots but only {} are open",
            inventory,
            inventory.total(),
            open_slots.len()
        );
        return unsolved(0, None, 0);
    }

    log::info!(
        "searching {} layouts ({}, {} open slots, {} targets)",
        search_space(open_slots.len(), inventory),
        inventory,
        open_slots.len(),
        total_targets
    );

    let mut best_hits = 0;
    let mut best_layout: Option<Grid> = None;
    let mut candidates = 0u64;

    for refract in open_slots.iter().copied().combinations(inventory.refract) {
        let after_refract = without(open_slots, &refract);

        for reflect in after_refract.iter().copied().combinations(inventory.reflect) {
            let after_reflect = without(&after_refract, &reflect);

            for opaque in after_reflect.iter().copied().combinations(inventory.opaque) {
                let layout = template.grid.with_layout(
                    placements(&refract, BlockKind::Refract)
                        .chain(placements(&reflect, BlockKind::Reflect))
                        .chain(placements(&opaque, BlockKind::Opaque)),
                );
                let candidate = template.with_grid(layout);
                let lit = model.illuminated(&candidate);
                candidates += 1;

                if lit.len() > best_hits {
                    best_hits = lit.len();
                    best_layout = Some(candidate.grid.clone());
                    log::debug!(
                        "candidate {candidates} lights {best_hits}/{total_targets}:\n{}",
                        candidate.grid
                    );
                }

                if targets.is_subset(&lit) {
                    log::info!("solved after {candidates} candidates");
                    return SearchReport {
                        solution: Some(candidate.grid),
                        diagnosis: None,
                        candidates,
                    };
                }
            }
        }
    }

    log::info!("no solution among {candidates} candidates, best hit {best_hits}/{total_targets}");
    unsolved(best_hits, best_layout, candidates)
}

/// Number of layouts the search enumerates for `open` slots, saturating at
/// `u128::MAX`.
pub fn search_space(open: usize, inventory: &Inventory) -> u128 {
    if inventory.total() > open {
        return 0;
    }
    let after_refract = open - inventory.refract;
    let after_reflect = after_refract - inventory.reflect;

    binomial(open, inventory.refract)
        .saturating_mul(binomial(after_refract, inventory.reflect))
        .saturating_mul(binomial(after_reflect, inventory.opaque))
}

fn binomial(n: usize, k: usize) -> u128 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        // exact at every step: result is C(n, i) before the update
        result = match result.checked_mul((n - i) as u128) {
            Some(product) => product / (i as u128 + 1),
            None => return u128::MAX,
        };
    }
    result
}

/// Slots of `slots` not in `taken`, order preserved.
fn without(slots: &[Slot], taken: &[Slot]) -> Vec<Slot> {
    slots
        .iter()
        .copied()
        .filter(|slot| !taken.contains(slot))
        .collect()
}

fn placements(slots: &[Slot], kind: BlockKind) -> impl Iterator<Item = (Slot, BlockKind)> + '_ {
    slots.iter().map(move |&slot| (slot, kind))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::board::board_from;
    use crate::tracer::HitSet;

    /// Traces normally and records every candidate grid it is shown.
    struct Recording {
        tracer: Tracer,
        grids: RefCell<Vec<String>>,
    }

    impl Recording {
        fn new() -> Self {
            Self {
                tracer: Tracer::default(),
                grids: RefCell::new(Vec::new()),
            }
        }

        fn grids(&self) -> Vec<String> {
            self.grids.borrow().clone()
        }
    }

    impl LightModel for Recording {
        fn illuminated(&self, board: &Board) -> HitSet {
            self.grids.borrow_mut().push(board.grid.to_string());
            self.tracer.illuminated(board)
        }
    }

    fn diagnose() -> SearchOptions {
        SearchOptions {
            diagnose: true,
            ..SearchOptions::default()
        }
    }

    #[test]
    fn test_empty_inventory_returns_unmodified_grid() {
        let board = board_from(&["o"], &[(0, 0, 1, 1)], &[(2, 2)]);
        let slots = board.grid.open_slots();
        let solution = search(&board, &Inventory::default(), &slots, false);
        assert_eq!(solution, Some(board.grid.clone()));
    }

    #[test]
    fn test_oversized_inventory_traces_nothing() {
        let board = board_from(&["o"], &[(0, 0, 1, 1)], &[(2, 2)]);
        let slots = board.grid.open_slots();
        let model = Recording::new();

        let report = search_with(&model, &board, &Inventory::new(2, 0, 0), &slots, &diagnose());

        assert!(!report.is_solved());
        assert_eq!(report.candidates, 0);
        assert!(model.grids().is_empty());
        assert_eq!(
            report.diagnosis,
            Some(Diagnosis {
                best_hits: 0,
                total_targets: 1,
                best_layout: None,
            })
        );
    }

    #[test]
    fn test_first_satisfying_layout_wins() {
        let board = board_from(&["oo"], &[(1, 2, 1, -1)], &[(1, 0)]);
        let slots = board.grid.open_slots();
        let model = Recording::new();

        let report = search_with(
            &model,
            &board,
            &Inventory::new(1, 0, 0),
            &slots,
            &SearchOptions::default(),
        );

        assert_eq!(report.solution.map(|grid| grid.to_string()), Some("oA".to_string()));
        assert_eq!(report.candidates, 2);
        assert_eq!(model.grids(), vec!["Ao", "oA"]);
    }

    #[test]
    fn test_unsolvable_board_reports_best_partial_layout() {
        let board = board_from(&["oo"], &[(1, 2, 1, -1)], &[(1, 0), (4, 2)]);
        let slots = board.grid.open_slots();

        let report = search_with(
            &Tracer::default(),
            &board,
            &Inventory::new(1, 0, 0),
            &slots,
            &diagnose(),
        );

        assert_eq!(report.solution, None);
        assert_eq!(report.candidates, 2);
        let diagnosis = report.diagnosis.expect("diagnosis requested");
        assert_eq!(diagnosis.best_hits, 1);
        assert_eq!(diagnosis.total_targets, 2);
        assert_eq!(
            diagnosis.best_layout.map(|grid| grid.to_string()),
            Some("oA".to_string())
        );
    }

    #[test]
    fn test_diagnosis_only_on_request() {
        let board = board_from(&["oo"], &[(1, 2, 1, -1)], &[(4, 2)]);
        let slots = board.grid.open_slots();

        let report = search_with(
            &Tracer::default(),
            &board,
            &Inventory::new(1, 0, 0),
            &slots,
            &SearchOptions::default(),
        );
        assert_eq!(report.solution, None);
        assert_eq!(report.diagnosis, None);
        assert_eq!(search(&board, &Inventory::new(1, 0, 0), &slots, true), None);
    }

    /// Process-wide logger that keeps every record with the thread that
    /// emitted it, so parallel tests only see their own lines.
    mod capture {
        use std::sync::{Mutex, Once};
        use std::thread::{self, ThreadId};

        use log::{Level, LevelFilter, Log, Metadata, Record};

        struct Capture {
            records: Mutex<Vec<(ThreadId, Level, String)>>,
        }

        static LOGGER: Capture = Capture {
            records: Mutex::new(Vec::new()),
        };

        impl Log for Capture {
            fn enabled(&self, _: &Metadata) -> bool {
                true
            }

            fn log(&self, record: &Record) {
                self.records.lock().unwrap().push((
                    thread::current().id(),
                    record.level(),
                    record.args().to_string(),
                ));
            }

            fn flush(&self) {}
        }

        pub fn install() {
            static INIT: Once = Once::new();
            INIT.call_once(|| {
                log::set_logger(&LOGGER).unwrap();
                log::set_max_level(LevelFilter::Info);
            });
        }

        /// Messages logged by the current thread at `level` or more severe.
        pub fn messages(level: Level) -> Vec<String> {
            let current = thread::current().id();
            LOGGER
                .records
                .lock()
                .unwrap()
                .iter()
                .filter(|(thread, lvl, _)| *thread == current && *lvl <= level)
                .map(|(_, _, message)| message.clone())
                .collect()
        }
    }

    #[test]
    fn test_requested_diagnosis_logs_best_layout_at_warn() {
        capture::install();
        let board = board_from(&["xAx", "AoA", "xAx"], &[(2, 3, 1, -1)], &[(3, 2), (6, 1)]);
        let slots = board.grid.open_slots();

        // the thread may be shared with earlier tests when run single-threaded
        let earlier = capture::messages(log::Level::Warn).len();

        assert_eq!(search(&board, &Inventory::default(), &slots, false), None);
        assert_eq!(capture::messages(log::Level::Warn).len(), earlier);

        assert_eq!(search(&board, &Inventory::default(), &slots, true), None);
        assert_eq!(
            capture::messages(log::Level::Warn)[earlier..],
            ["no solution; best hit = 1/2, best partial layout:\nxAx\nAoA\nxAx".to_string()]
        );
    }

    #[test]
    fn test_enumerates_each_disjoint_layout_once_refract_first() {
        // no lasers, so nothing can ever be solved and the whole space is walked
        let board = board_from(&["ooo"], &[], &[(1, 1)]);
        let slots = board.grid.open_slots();
        let inventory = Inventory::new(1, 0, 1);
        let model = Recording::new();

        let report = search_with(&model, &board, &inventory, &slots, &SearchOptions::default());

        assert_eq!(
            model.grids(),
            vec!["CAo", "CoA", "ACo", "oCA", "AoC", "oAC"]
        );
        assert_eq!(report.candidates as u128, search_space(slots.len(), &inventory));
    }

    #[test]
    fn test_splitter_and_absorber_layout() {
        let board = board_from(&["oo", "oo"], &[(1, 4, 1, -1)], &[(0, 3), (4, 1)]);
        let slots = board.grid.open_slots();
        let template = board.clone();

        let report = search_with(
            &Tracer::default(),
            &board,
            &Inventory::new(0, 1, 1),
            &slots,
            &diagnose(),
        );

        assert_eq!(
            report.solution.map(|grid| grid.to_string()),
            Some("Bo\noC".to_string())
        );
        assert_eq!(report.candidates, 10);
        assert_eq!(report.diagnosis, None);
        assert_eq!(board, template);
    }

    #[test]
    fn test_fixed_cells_survive_and_full_inventory_is_placed() {
        // the fixed mirror alone solves it, but the spare block must still go somewhere
        let board = board_from(&["oA", "xx"], &[(1, 2, 1, -1)], &[(1, 0)]);
        let slots = board.grid.open_slots();
        assert_eq!(slots, vec![(0, 0)]);

        let solution = search(&board, &Inventory::new(0, 0, 1), &slots, false);
        assert_eq!(
            solution.map(|grid| grid.to_string()),
            Some("CA\nxx".to_string())
        );
    }

    #[test]
    fn test_search_space_size() {
        assert_eq!(search_space(4, &Inventory::new(0, 1, 1)), 12);
        assert_eq!(search_space(9, &Inventory::new(3, 0, 1)), 9 * 56);
        assert_eq!(search_space(2, &Inventory::new(2, 1, 0)), 0);
        assert_eq!(search_space(0, &Inventory::default()), 1);
        assert_eq!(binomial(200, 100), u128::MAX);
        assert_eq!(binomial(3, 5), 0);
    }
}
