// Avaliação paralela dos lances da raiz com rayon

use crate::core::*;
use crate::search::alpha_beta::{minimax, SearchContext};
use crate::search::evaluation::{EvalKey, Evaluation};
use crate::search::move_ordering::order_moves;
use crate::search::{CancelToken, SearchConfig, SearchOutcome, SearchStats};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::Instant;
use tracing::{debug, trace, warn};

/// Pools rayon por número de threads, partilhados por todas as buscas do processo.
static POOLS: OnceLock<Mutex<HashMap<usize, Arc<ThreadPool>>>> = OnceLock::new();

/// Pool com `threads` threads, criado na primeira busca que o pede.
fn thread_pool(threads: usize) -> Result<Arc<ThreadPool>, ThreadPoolBuildError> {
    let mut pools = POOLS
        .get_or_init(|| Mutex::new(HashMap::new()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    if let Some(pool) = pools.get(&threads) {
        return Ok(Arc::clone(pool));
    }
    let pool = Arc::new(ThreadPoolBuilder::new().num_threads(threads).build()?);
    debug!("built a {}-thread search pool", threads);
    pools.insert(threads, Arc::clone(&pool));
    Ok(pool)
}

/// Avalia cada lance jogável da raiz numa cópia própria da partida.
///
/// Cada lance é uma tarefa rayon independente; a única partilha entre tarefas é
/// o contador de nós e o sinal de cancelamento. Se o sinal for dado, as tarefas
/// em curso terminam no próximo nó e o resultado fica marcado como cancelado.
pub fn evaluate_moves(game: &Game, config: &SearchConfig, cancel: &CancelToken) -> SearchOutcome {
    let start = Instant::now();
    let side = game.side_to_move();

    let mut root_moves = game.playable_moves();
    if config.order_moves {
        order_moves(game, &mut root_moves);
    }
    debug!(
        "search started: {} root moves, depth {}, {} threads",
        root_moves.len(),
        config.max_depth,
        config.threads
    );

    let nodes = AtomicU64::new(0);
    let ctx = SearchContext { config, cancel, nodes: &nodes };

    let evaluate_root = |mv: &Move| -> Option<(Move, Evaluation)> {
        if cancel.is_cancelled() {
            return None;
        }
        let mut child = game.clone();
        if !child.apply(*mv, false) {
            return None;
        }
        let mut eval = minimax(&child, 1, EvalKey::MIN, EvalKey::MAX, &ctx)?;
        eval.line.insert(0, *mv);
        trace!("root {:?}: score {} mate {:?}", mv, eval.score, eval.mate());
        Some((*mv, eval))
    };

    let evaluations: Vec<(Move, Evaluation)> = if config.threads <= 1 {
        root_moves.iter().filter_map(evaluate_root).collect()
    } else {
        match thread_pool(config.threads) {
            Ok(pool) => pool.install(|| root_moves.par_iter().filter_map(&evaluate_root).collect()),
            Err(err) => {
                warn!("could not build a {}-thread pool ({}), using the global pool", config.threads, err);
                root_moves.par_iter().filter_map(&evaluate_root).collect()
            }
        }
    };

    let cancelled = cancel.is_cancelled();
    let stats = SearchStats {
        nodes: nodes.load(Ordering::Relaxed),
        elapsed: start.elapsed(),
        root_moves: root_moves.len(),
        completed: evaluations.len(),
    };
    debug!(
        "search finished: {}/{} root moves, {} nodes in {:?}{}",
        stats.completed,
        stats.root_moves,
        stats.nodes,
        stats.elapsed,
        if cancelled { " (cancelled)" } else { "" }
    );

    SearchOutcome { side, evaluations, cancelled, stats }
}

/// Busca completa: devolve o melhor lance, se houver um confirmado.
pub fn best_move(game: &Game, config: &SearchConfig) -> Option<(Move, Evaluation)> {
    let outcome = evaluate_moves(game, config, &CancelToken::new());
    outcome.best().map(|(mv, eval)| (mv, eval.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(depth: u32, threads: usize, alpha_beta: bool) -> SearchConfig {
        SearchConfig { max_depth: depth, threads, alpha_beta, order_moves: true }
    }

    #[test]
    fn test_sente_mate_in_one() {
        let game = Game::from_sfen(Ruleset::shogi(), "4k4/1R7/R8/9/9/9/9/9/4K4 b -").unwrap();
        let (mv, eval) = best_move(&game, &config(1, 2, true)).unwrap();
        assert_eq!(eval.mate(), Some((Side::Gote, 1)));
        assert_eq!(mv.from, Some(Square::new(0, 6)));
        assert_eq!(mv.to, Square::new(0, 8));
        // Empate entre promover e não promover resolve-se pela ordem dos lances
        assert!(!mv.promote);
    }

    #[test]
    fn test_gote_mate_in_one() {
        let game = Game::from_sfen(Ruleset::shogi(), "4k4/9/9/9/9/9/r8/1r7/4K4 w -").unwrap();
        let (mv, eval) = best_move(&game, &config(1, 2, true)).unwrap();
        assert_eq!(eval.mate(), Some((Side::Sente, 1)));
        assert_eq!(mv.to, Square::new(0, 0));
    }

    #[test]
    fn test_prefers_faster_mate() {
        let game = Game::from_sfen(Ruleset::shogi(), "4k4/1R7/R8/9/9/9/9/9/4K4 b -").unwrap();
        let (_, eval) = best_move(&game, &config(3, 4, true)).unwrap();
        assert_eq!(eval.mate(), Some((Side::Gote, 1)));
    }

    #[test]
    fn test_alpha_beta_matches_plain_minimax() {
        for (ruleset, text, depth) in [
            (Ruleset::minishogi(), crate::core::ruleset::MINISHOGI_START, 3),
            (Ruleset::shogi(), "4k4/1R7/R8/9/9/9/9/9/4K4 b -", 3),
            (Ruleset::shogi(), "4k4/9/4p4/9/9/9/2B6/9/4K4 b G", 2),
        ] {
            let game = Game::from_sfen(ruleset, text).unwrap();
            let cancel = CancelToken::new();
            let pruned = evaluate_moves(&game, &config(depth, 2, true), &cancel);
            let plain = evaluate_moves(&game, &config(depth, 2, false), &cancel);

            assert_eq!(pruned.evaluations.len(), plain.evaluations.len());
            for (mv, eval) in &pruned.evaluations {
                let (_, other) = plain.evaluations.iter().find(|(m, _)| m == mv).unwrap();
                assert_eq!(eval.key(), other.key(), "{} {:?}", text, mv);
            }
            let best_pruned = pruned.best().map(|(mv, e)| (mv, e.key()));
            let best_plain = plain.best().map(|(mv, e)| (mv, e.key()));
            assert_eq!(best_pruned, best_plain);
            assert!(pruned.stats.nodes <= plain.stats.nodes);
        }
    }

    #[test]
    fn test_thread_count_does_not_change_result() {
        let game = Game::new(Ruleset::minishogi()).unwrap();
        let single = evaluate_moves(&game, &config(2, 1, true), &CancelToken::new());
        let many = evaluate_moves(&game, &config(2, 4, true), &CancelToken::new());
        assert_eq!(single.best_move(), many.best_move());
        assert_eq!(single.stats.completed, single.stats.root_moves);
    }

    #[test]
    fn test_cancelled_search_has_no_best_move() {
        let game = Game::new(Ruleset::shogi()).unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();
        let outcome = evaluate_moves(&game, &config(4, 2, true), &cancel);
        assert!(outcome.cancelled);
        assert!(outcome.evaluations.is_empty());
        assert!(outcome.best_move().is_none());
    }

    #[test]
    fn test_cancelled_partial_set_is_unconfirmed() {
        let game = Game::from_sfen(Ruleset::shogi(), "4k4/1R7/R8/9/9/9/9/9/4K4 b -").unwrap();
        let mut outcome = evaluate_moves(&game, &config(1, 2, true), &CancelToken::new());
        let confirmed = outcome.best_move();
        assert!(confirmed.is_some());

        outcome.cancelled = true;
        assert!(outcome.best_move().is_none());
        assert_eq!(outcome.best_unconfirmed().map(|(mv, _)| mv), confirmed);
    }

    #[test]
    fn test_pool_is_reused_between_searches() {
        let first = thread_pool(3).unwrap();
        let second = thread_pool(3).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.current_num_threads(), 3);
        assert!(!Arc::ptr_eq(&first, &thread_pool(2).unwrap()));
    }

    #[test]
    fn test_terminal_root_has_no_moves() {
        let mut game = Game::from_sfen(Ruleset::shogi(), "4k4/1R7/R8/9/9/9/9/9/4K4 b -").unwrap();
        let mate = game.parse_usi_move("9c9a").unwrap();
        assert!(game.play(mate));
        let outcome = evaluate_moves(&game, &config(2, 2, true), &CancelToken::new());
        assert!(!outcome.cancelled);
        assert!(outcome.best_move().is_none());
    }
}
