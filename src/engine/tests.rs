use std::sync::atomic::AtomicBool;

use crate::engine::auto_foundation::{self, AutoFoundationPolicy};
use crate::engine::heuristics::Heuristic;
use crate::engine::hinting;
use crate::engine::metrics::render_report;
use crate::engine::search::{self, Algorithm, SearchConfig};
use crate::game::{Card, DeckSize, GameState, Move, MoveSource, Suit};

fn card(suit: Suit, rank: u8) -> Card {
    Card { suit, rank }
}

fn empty_game(deck_size: DeckSize) -> GameState {
    GameState::from_parts(
        deck_size,
        std::array::from_fn(|_| Vec::new()),
        [None; 4],
        std::array::from_fn(|_| Vec::new()),
    )
}

fn foundation_run(suit: Suit, upto: u8) -> Vec<Card> {
    (1..=upto).map(|rank| card(suit, rank)).collect()
}

/// A 52-card position eight moves from the win: every foundation holds
/// A..J and the queens and kings wait in their own cascades.
fn near_solved_game() -> GameState {
    let foundations = std::array::from_fn(|idx| foundation_run(Suit::ALL[idx], 11));
    let mut cascades: [Vec<Card>; 8] = std::array::from_fn(|_| Vec::new());
    for (idx, suit) in Suit::ALL.into_iter().enumerate() {
        cascades[idx].push(card(suit, 13));
        cascades[idx].push(card(suit, 12));
    }
    GameState::from_parts(DeckSize::FiftyTwo, cascades, [None; 4], foundations)
}

/// Four moves from the win: only the kings remain, one per cascade.
fn kings_only_game() -> GameState {
    let foundations = std::array::from_fn(|idx| foundation_run(Suit::ALL[idx], 12));
    let mut cascades: [Vec<Card>; 8] = std::array::from_fn(|_| Vec::new());
    for (idx, suit) in Suit::ALL.into_iter().enumerate() {
        cascades[idx].push(card(suit, 13));
    }
    GameState::from_parts(DeckSize::FiftyTwo, cascades, [None; 4], foundations)
}

/// A dead position: no foundation, cascade, or free-cell move is legal.
fn stuck_game() -> GameState {
    let mut cascades: [Vec<Card>; 8] = std::array::from_fn(|_| Vec::new());
    for (idx, suit) in Suit::ALL.into_iter().enumerate() {
        cascades[idx].push(card(suit, 2));
        cascades[idx + 4].push(card(suit, 9));
    }
    let free_cells = [
        Some(card(Suit::Hearts, 10)),
        Some(card(Suit::Diamonds, 11)),
        Some(card(Suit::Clubs, 12)),
        Some(card(Suit::Spades, 13)),
    ];
    GameState::from_parts(
        DeckSize::FiftyTwo,
        cascades,
        free_cells,
        std::array::from_fn(|_| Vec::new()),
    )
}

fn replay(initial: &GameState, line: &[Move]) -> GameState {
    let mut game = initial.clone();
    for mv in line {
        assert!(game.apply_move(*mv), "replayed move must stay legal");
    }
    game
}

#[test]
fn foundation_deficit_counts_missing_cards() {
    let game = GameState::from_parts(
        DeckSize::FiftyTwo,
        std::array::from_fn(|_| Vec::new()),
        [None; 4],
        [
            foundation_run(Suit::Clubs, 3),
            foundation_run(Suit::Diamonds, 2),
            Vec::new(),
            Vec::new(),
        ],
    );
    assert_eq!(Heuristic::FoundationDeficit.evaluate(&game), 47);

    let small = empty_game(DeckSize::Twelve);
    assert_eq!(Heuristic::FoundationDeficit.evaluate(&small), 12);
}

#[test]
fn rank_distance_charges_missing_lower_ranks() {
    let mut game = empty_game(DeckSize::FiftyTwo);
    game.foundations_mut()[Suit::Diamonds.foundation_index()].push(card(Suit::Diamonds, 1));
    game.cascades_mut()[0].push(card(Suit::Clubs, 3));
    game.free_cells_mut()[1] = Some(card(Suit::Diamonds, 2));

    // 3♣ is missing A♣ and 2♣ below it; 2♦ has its ace placed already.
    assert_eq!(Heuristic::RankDistance.evaluate(&game), 3);
}

#[test]
fn blocker_aware_charges_blockers_and_gaps() {
    let mut game = empty_game(DeckSize::FiftyTwo);
    game.cascades_mut()[0].push(card(Suit::Clubs, 1));
    game.cascades_mut()[0].push(card(Suit::Diamonds, 9));
    game.cascades_mut()[0].push(card(Suit::Spades, 5));
    game.free_cells_mut()[0] = Some(card(Suit::Hearts, 2));

    // A♣ digs through two blockers: 3. 9♦ pays one blocker plus its rank
    // gap: 10. 2♥ pays its gap from the missing ace: 2. 5♠ pays its gap: 5.
    assert_eq!(Heuristic::BlockerAware.evaluate(&game), 20);
}

#[test]
fn blocker_aware_discounts_virtually_moved_blockers() {
    let mut game = empty_game(DeckSize::FiftyTwo);
    // 2♣ sits on A♣: the ace is virtually promoted first, so the deuce
    // sees no blocker above it and both cost exactly one move each.
    game.cascades_mut()[0].push(card(Suit::Clubs, 2));
    game.cascades_mut()[0].push(card(Suit::Clubs, 1));
    assert_eq!(Heuristic::BlockerAware.evaluate(&game), 2);
}

#[test]
fn shape_penalty_matches_formula() {
    let game = empty_game(DeckSize::FiftyTwo);
    // Four empty foundations at 13 * 50 each; nothing else contributes.
    assert_eq!(Heuristic::ShapePenalty.evaluate(&game), 2600);

    let mut with_cell = empty_game(DeckSize::FiftyTwo);
    with_cell.free_cells_mut()[0] = Some(card(Suit::Spades, 13));
    // Occupied cell: +100, plus +50 through the mobility term.
    assert_eq!(Heuristic::ShapePenalty.evaluate(&with_cell), 2750);

    let mut with_pair = empty_game(DeckSize::FiftyTwo);
    with_pair.cascades_mut()[0].push(card(Suit::Hearts, 5));
    with_pair.cascades_mut()[0].push(card(Suit::Hearts, 9));
    // Broken sequence +20, same color +10; the 9♥ can still relocate to an
    // empty cascade, so no mobility charge.
    assert_eq!(Heuristic::ShapePenalty.evaluate(&with_pair), 2630);
}

#[test]
fn progress_penalty_matches_formula() {
    let mut game = empty_game(DeckSize::FiftyTwo);
    game.foundations_mut()[Suit::Clubs.foundation_index()] = foundation_run(Suit::Clubs, 2);
    game.free_cells_mut()[2] = Some(card(Suit::Hearts, 7));
    game.cascades_mut()[0].push(card(Suit::Spades, 7));
    game.cascades_mut()[0].push(card(Suit::Hearts, 6));
    game.cascades_mut()[1].push(card(Suit::Diamonds, 5));
    game.cascades_mut()[1].push(card(Suit::Diamonds, 9));

    // -20 foundation progress, +5 occupied cell, +1 broken pair.
    assert_eq!(Heuristic::ProgressPenalty.evaluate(&game), -14);
}

#[test]
fn astar_solves_near_solved_deal_and_replay_reaches_terminal() {
    let initial = near_solved_game();
    let config = SearchConfig::for_algorithm(Algorithm::AStar);
    let outcome = search::solve(&initial, Algorithm::AStar, &config);

    let line = outcome.solution.expect("eight forced promotions exist");
    assert_eq!(line.len(), 8);
    assert_eq!(outcome.metrics.solution_length, 8);

    let terminal = replay(&initial, &line);
    assert!(terminal.is_solved());
    for pile in terminal.foundations() {
        assert_eq!(pile.len(), 13);
    }
}

#[test]
fn all_algorithms_solve_the_kings_only_deal() {
    let initial = kings_only_game();
    for algorithm in Algorithm::ALL {
        let config = SearchConfig::for_algorithm(algorithm);
        let outcome = search::solve(&initial, algorithm, &config);
        let line = outcome
            .solution
            .unwrap_or_else(|| panic!("{} should solve", algorithm.label()));
        assert!(replay(&initial, &line).is_solved(), "{}", algorithm.label());
    }
}

#[test]
fn bfs_budget_exhaustion_reports_exact_count() {
    let game = GameState::new_with_seed(2024, DeckSize::FiftyTwo);
    let mut config = SearchConfig::for_algorithm(Algorithm::Bfs);
    config.max_states = 200;

    let outcome = search::solve(&game, Algorithm::Bfs, &config);
    assert!(outcome.solution.is_none());
    assert_eq!(outcome.metrics.states_explored, 200);
    assert!(outcome.metrics.hit_state_limit);
    assert!(outcome.metrics.states_generated >= outcome.metrics.states_explored);
}

#[test]
fn repeated_runs_are_deterministic() {
    let game = GameState::new_with_seed(31, DeckSize::Twelve);
    let config = SearchConfig::for_algorithm(Algorithm::AStar);

    let first = search::solve(&game, Algorithm::AStar, &config);
    let second = search::solve(&game, Algorithm::AStar, &config);
    assert_eq!(first.solution, second.solution);
    assert_eq!(
        first.metrics.states_explored,
        second.metrics.states_explored
    );
    assert_eq!(
        first.metrics.states_generated,
        second.metrics.states_generated
    );

    let mut greedy_config = SearchConfig::for_algorithm(Algorithm::Greedy);
    greedy_config.max_states = 50_000;
    let third = search::solve(&game, Algorithm::Greedy, &greedy_config);
    let fourth = search::solve(&game, Algorithm::Greedy, &greedy_config);
    assert_eq!(third.solution, fourth.solution);
    assert_eq!(
        third.metrics.states_explored,
        fourth.metrics.states_explored
    );
}

#[test]
fn dfs_respects_depth_cutoff() {
    let game = GameState::new_with_seed(2024, DeckSize::FiftyTwo);
    let mut config = SearchConfig::for_algorithm(Algorithm::Dfs);
    config.max_states = 5_000;
    config.max_depth = 3;

    let outcome = search::solve(&game, Algorithm::Dfs, &config);
    assert!(outcome.solution.is_none());
    // Nodes one past the cutoff may be popped but are never expanded.
    assert!(outcome.metrics.max_depth_reached <= 4);
}

#[test]
fn ids_finds_a_one_move_win() {
    let mut game = GameState::from_parts(
        DeckSize::FiftyTwo,
        std::array::from_fn(|_| Vec::new()),
        [None; 4],
        [
            foundation_run(Suit::Clubs, 13),
            foundation_run(Suit::Diamonds, 13),
            foundation_run(Suit::Hearts, 13),
            foundation_run(Suit::Spades, 12),
        ],
    );
    game.cascades_mut()[0].push(card(Suit::Spades, 13));

    let config = SearchConfig::for_algorithm(Algorithm::Ids);
    let outcome = search::solve(&game, Algorithm::Ids, &config);
    assert_eq!(
        outcome.solution,
        Some(vec![Move::ToFoundation {
            source: MoveSource::Cascade(0),
            suit: Suit::Spades,
        }])
    );
}

#[test]
fn ids_stops_early_when_no_node_hits_the_limit() {
    let game = stuck_game();
    assert!(!game.has_legal_moves());

    let config = SearchConfig::for_algorithm(Algorithm::Ids);
    let outcome = search::solve(&game, Algorithm::Ids, &config);

    assert!(outcome.solution.is_none());
    // Pass at limit 0 cuts the root; pass at limit 1 expands it, finds no
    // children, and ends the sweep. Two pops total, not 151 passes.
    assert_eq!(outcome.metrics.states_explored, 2);
    assert!(!outcome.metrics.hit_state_limit);
}

#[test]
fn time_budget_stops_a_run_before_exploring() {
    let game = GameState::new_with_seed(77, DeckSize::FiftyTwo);
    let mut config = SearchConfig::for_algorithm(Algorithm::AStar);
    config.time_budget_ms = Some(0);

    let outcome = search::solve(&game, Algorithm::AStar, &config);
    assert!(outcome.solution.is_none());
    assert!(outcome.metrics.hit_time_limit);
    assert_eq!(outcome.metrics.states_explored, 0);
}

#[test]
fn canceled_search_returns_none() {
    let game = GameState::new_with_seed(77, DeckSize::FiftyTwo);
    let config = SearchConfig::for_algorithm(Algorithm::AStar);
    let cancel = AtomicBool::new(true);
    assert!(search::solve_cancelable(&game, Algorithm::AStar, &config, &cancel).is_none());
}

#[test]
fn normalized_hashing_still_finds_solutions() {
    let initial = near_solved_game();
    let mut config = SearchConfig::for_algorithm(Algorithm::AStar);
    config.normalize_free_cells = true;

    let outcome = search::solve(&initial, Algorithm::AStar, &config);
    let line = outcome.solution.expect("normalization keeps the win reachable");
    assert!(replay(&initial, &line).is_solved());
}

#[test]
fn config_defaults_match_per_algorithm_budgets() {
    for algorithm in [Algorithm::AStar, Algorithm::WeightedAStar, Algorithm::Greedy] {
        let config = SearchConfig::for_algorithm(algorithm);
        assert_eq!(config.max_states, 500_000);
        assert_eq!(config.max_depth, 150);
    }
    for algorithm in [Algorithm::Bfs, Algorithm::Dfs, Algorithm::Ids] {
        let config = SearchConfig::for_algorithm(algorithm);
        assert_eq!(config.max_states, 200_000);
        assert_eq!(config.max_depth, 150);
    }
    let config = SearchConfig::for_algorithm(Algorithm::WeightedAStar);
    assert_eq!(config.weight, 1.5);
    assert_eq!(config.heuristic, Heuristic::BlockerAware);
}

#[test]
fn auto_foundation_naive_promotes_chains() {
    let mut game = empty_game(DeckSize::FiftyTwo);
    game.cascades_mut()[0].push(card(Suit::Clubs, 2));
    game.cascades_mut()[0].push(card(Suit::Clubs, 1));
    game.cascades_mut()[1].push(card(Suit::Clubs, 3));
    game.free_cells_mut()[2] = Some(card(Suit::Diamonds, 1));

    let moves = auto_foundation::advance(&mut game, AutoFoundationPolicy::Naive);
    assert_eq!(moves.len(), 4);
    assert_eq!(game.foundation_top_rank(Suit::Clubs), 3);
    assert_eq!(game.foundation_top_rank(Suit::Diamonds), 1);
    assert!(game.cascades()[0].is_empty());
    assert!(game.cascades()[1].is_empty());
    assert!(game.free_cells()[2].is_none());
}

#[test]
fn auto_foundation_safe_gates_on_all_lower_ranks() {
    let mut game = GameState::from_parts(
        DeckSize::FiftyTwo,
        std::array::from_fn(|_| Vec::new()),
        [None; 4],
        [
            foundation_run(Suit::Clubs, 2),
            foundation_run(Suit::Diamonds, 1),
            foundation_run(Suit::Hearts, 1),
            foundation_run(Suit::Spades, 1),
        ],
    );
    game.cascades_mut()[0].push(card(Suit::Clubs, 3));

    // The 3♣ is legal but unsafe: rank 2 is missing from three suits.
    let mut safe_game = game.clone();
    let safe_moves = auto_foundation::advance(&mut safe_game, AutoFoundationPolicy::AllLowerPresent);
    assert!(safe_moves.is_empty());
    assert_eq!(safe_game.foundation_top_rank(Suit::Clubs), 2);

    let naive_moves = auto_foundation::advance(&mut game, AutoFoundationPolicy::Naive);
    assert_eq!(naive_moves.len(), 1);
    assert_eq!(game.foundation_top_rank(Suit::Clubs), 3);
}

#[test]
fn auto_foundation_safe_promotes_when_every_suit_keeps_pace() {
    let mut game = GameState::from_parts(
        DeckSize::FiftyTwo,
        std::array::from_fn(|_| Vec::new()),
        [None; 4],
        [
            foundation_run(Suit::Clubs, 2),
            foundation_run(Suit::Diamonds, 2),
            foundation_run(Suit::Hearts, 2),
            foundation_run(Suit::Spades, 2),
        ],
    );
    game.cascades_mut()[0].push(card(Suit::Hearts, 3));

    let moves = auto_foundation::advance(&mut game, AutoFoundationPolicy::AllLowerPresent);
    assert_eq!(moves.len(), 1);
    assert_eq!(game.foundation_top_rank(Suit::Hearts), 3);
}

#[test]
fn hint_is_first_move_of_a_fresh_solve() {
    let game = near_solved_game();
    let config = SearchConfig::for_algorithm(Algorithm::AStar);

    let expected = search::solve(&game, Algorithm::AStar, &config)
        .solution
        .expect("position is solvable")[0];
    assert_eq!(hinting::hint(&game, Algorithm::AStar, &config), Some(expected));

    // A dead position yields no hint.
    assert_eq!(hinting::hint(&stuck_game(), Algorithm::AStar, &config), None);
}

#[test]
fn report_carries_the_fixed_labels_and_moves() {
    let initial = near_solved_game();
    let config = SearchConfig::for_algorithm(Algorithm::AStar);
    let outcome = search::solve(&initial, Algorithm::AStar, &config);
    let report = render_report(
        "seed 1",
        Algorithm::AStar.label(),
        None,
        outcome.solution.as_deref(),
        &outcome.metrics,
    );

    for label in [
        "Time taken:",
        "Peak memory usage:",
        "Average memory:",
        "States explored:",
        "States generated:",
        "States per second:",
        "Maximum queue size:",
        "Maximum depth reached:",
        "Solution length: 8",
    ] {
        assert!(report.contains(label), "missing label: {label}");
    }
    assert!(report.contains("Move 1: "));
    assert!(report.contains("Move 8: "));
    assert!(report.contains("Foundation"));
}
