//! Whole-puzzle, public-API-only scenarios: the concrete end-to-end table
//! and the solver property checks, kept out of the unit test modules since
//! they only exercise the crate's public surface.

use sudoku_core::{count_solutions, parse_grid, solve, solve_str, Method, MethodUsed, Mode};

fn parse(repr: &str) -> (usize, Vec<usize>) {
    parse_grid(repr).unwrap()
}

// --- Concrete end-to-end scenarios ---

#[test]
fn scenario_1_norvig_hardest_needs_hypothesis() {
    let (s, values) = parse(
        "8........ ..36..... .7..9.2.. .5...7... ....457.. ...1...3. ..1....68 ..85...1. .9....4..",
    );
    let outcome = solve(&values, s, Method::Elimination, Mode::First);
    assert_eq!(outcome.solutions.len(), 1);
    assert_eq!(outcome.method_used, Some(MethodUsed::Backtracking));
}

#[test]
fn scenario_2_second_puzzle_has_one_solution() {
    let (s, values) = parse(
        "7...85... .81...... .43....59 ......3.1 2..4..7.. .3...7.9. .15...... ....5.2.3 ....98...",
    );
    let outcome = solve(&values, s, Method::Elimination, Mode::First);
    assert_eq!(outcome.solutions.len(), 1);
    assert!(outcome.method_used.is_some());
}

#[test]
fn scenario_3_duplicate_value_returns_none_for_all_methods() {
    let (s, values) = parse(
        "7...85..7 .81...... .43....59 ......3.1 2..4..7.. .3...7.9. .15...... ....5.2.3 ....98...",
    );
    for method in [Method::Elimination, Method::Backtracking, Method::ExactCover] {
        let outcome = solve(&values, s, method, Mode::First);
        assert_eq!(outcome.method_used, None, "{method:?} should report NONE");
    }
}

#[test]
fn scenario_4_empty_grid_mode_first_returns_one_valid_solution() {
    let outcome = solve(&[0; 81], 3, Method::Elimination, Mode::First);
    assert_eq!(outcome.solutions.len(), 1);
    assert!(outcome.solutions[0].solved());
}

#[test]
fn scenario_5_ambiguous_grid_diverges_between_first_and_all() {
    // An all-empty grid is the simplest grid with more than one solution;
    // `mode=ALL` must surface more than one, `mode=FIRST` exactly one.
    let all = solve(&[0; 16], 2, Method::Elimination, Mode::All);
    let first = solve(&[0; 16], 2, Method::Elimination, Mode::First);
    assert!(all.solutions.len() > 1);
    assert_eq!(first.solutions.len(), 1);
}

#[test]
fn scenario_6_out_of_range_value_is_rejected_before_propagation() {
    let mut values = vec![0; 81];
    values[0] = 10; // N = 9, so 10 is out of range
    let outcome = solve(&values, 3, Method::Elimination, Mode::First);
    assert_eq!(outcome.method_used, None);
    assert!(outcome.solutions.is_empty());
}

#[test]
fn a_4x4_sample_solves_to_the_expected_grid() {
    let outcome = solve_str("1234 4.2. .4.. 2..3", Method::Elimination, Mode::First).unwrap();
    assert_eq!(outcome.solutions.len(), 1);
    assert_eq!(outcome.solutions[0].to_values(), vec![1, 2, 3, 4, 4, 3, 2, 1, 3, 4, 1, 2, 2, 1, 4, 3]);
}

// --- Solver properties ---

#[test]
fn solved_cells_have_no_candidate_peers() {
    let outcome = solve(&[0; 81], 3, Method::Elimination, Mode::First);
    let grid = &outcome.solutions[0];
    let n = grid.n();
    let s = grid.s();
    for idx in 0..grid.len() {
        let value = grid.value_at(idx).unwrap();
        let (r, c) = (idx / n, idx % n);
        let peers = (0..n)
            .map(|cc| r * n + cc)
            .chain((0..n).map(|rr| rr * n + c))
            .chain({
                let (br, bc) = (r / s, c / s);
                (0..n).map(move |i| (br * s + i / s) * n + bc * s + i % s)
            });
        for peer in peers {
            if peer == idx {
                continue;
            }
            assert_ne!(grid.value_at(peer), Some(value), "peer of a solved cell shares its value");
        }
    }
}

#[test]
fn elimination_and_exact_cover_report_the_same_solution_set() {
    let (s, values) = parse(
        "8........ ..36..... .7..9.2.. .5...7... ....457.. ...1...3. ..1....68 ..85...1. .9....4..",
    );
    let elimination = solve(&values, s, Method::Elimination, Mode::First);
    let exact_cover = solve(&values, s, Method::ExactCover, Mode::First);
    assert_eq!(elimination.solutions.len(), 1);
    assert_eq!(exact_cover.solutions.len(), 1);
    assert_eq!(elimination.solutions[0].to_values(), exact_cover.solutions[0].to_values());
}

#[test]
fn elimination_and_backtracking_report_the_same_solution_set() {
    let (s, values) = parse(
        "7...85... .81...... .43....59 ......3.1 2..4..7.. .3...7.9. .15...... ....5.2.3 ....98...",
    );
    let elimination = solve(&values, s, Method::Elimination, Mode::First);
    let backtracking = solve(&values, s, Method::Backtracking, Mode::First);
    assert_eq!(elimination.solutions[0].to_values(), backtracking.solutions[0].to_values());
}

#[test]
fn unique_solution_matches_between_first_and_all() {
    let (s, values) = parse(
        "7...85... .81...... .43....59 ......3.1 2..4..7.. .3...7.9. .15...... ....5.2.3 ....98...",
    );
    let first = solve(&values, s, Method::Elimination, Mode::First);
    let all = solve(&values, s, Method::Elimination, Mode::All);
    assert_eq!(first.solutions.len(), 1);
    assert_eq!(all.solutions.len(), 1);
    assert_eq!(first.solutions[0].to_values(), all.solutions[0].to_values());
}

#[test]
fn feeding_a_solved_grid_back_in_changes_nothing() {
    let outcome = solve(&[0; 16], 2, Method::Elimination, Mode::First);
    let solved_values = outcome.solutions[0].to_values();
    let fed_back = solve(&solved_values, 2, Method::Elimination, Mode::First);
    assert_eq!(fed_back.solutions.len(), 1);
    assert_eq!(fed_back.solutions[0].solved_count(), 16);
    assert_eq!(fed_back.solutions[0].to_values(), solved_values);
    assert_eq!(fed_back.method_used, Some(MethodUsed::EliminationOnly));
}

#[test]
fn inconsistent_given_returns_none_from_every_method() {
    let mut given = vec![0; 16];
    given[0] = 1;
    given[1] = 1; // same row, same value
    for method in [Method::Elimination, Method::Backtracking, Method::ExactCover] {
        let outcome = solve(&given, 2, method, Mode::First);
        assert_eq!(outcome.method_used, None);
    }
}

#[test]
fn count_solutions_caps_on_a_grid_with_many_solutions() {
    assert_eq!(count_solutions(&[0; 16], 2, 5), 5);
}
