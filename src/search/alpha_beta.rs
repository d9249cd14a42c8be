use crate::core::*;
use crate::search::evaluation::{evaluate, is_better, terminal_evaluation, EvalKey, Evaluation};
use crate::search::move_ordering::order_moves;
use crate::search::{CancelToken, SearchConfig};
use std::sync::atomic::{AtomicU64, Ordering};

/// Estado partilhado por todas as threads de uma pesquisa.
pub struct SearchContext<'a> {
    pub config: &'a SearchConfig,
    pub cancel: &'a CancelToken,
    pub nodes: &'a AtomicU64,
}

/// Minimax com poda alfa-beta sobre cópias da partida.
///
/// `ply` conta os meios-lances já jogados desde a raiz. Devolve `None` assim
/// que a pesquisa é cancelada.
pub fn minimax(game: &Game, ply: u32, mut alpha: EvalKey, mut beta: EvalKey, ctx: &SearchContext) -> Option<Evaluation> {
    if ctx.cancel.is_cancelled() {
        return None;
    }
    ctx.nodes.fetch_add(1, Ordering::Relaxed);

    if let Some(eval) = terminal_evaluation(game.state(), ply) {
        return Some(eval);
    }
    if ply >= ctx.config.max_depth {
        return Some(Evaluation::static_score(evaluate(game)));
    }

    let side = game.side_to_move();
    let mut moves = game.playable_moves();
    if ctx.config.order_moves {
        order_moves(game, &mut moves);
    }

    let mut best: Option<Evaluation> = None;
    for mv in moves {
        let mut child = game.clone();
        if !child.apply(mv, false) {
            continue;
        }
        let mut eval = minimax(&child, ply + 1, alpha, beta, ctx)?;
        eval.line.insert(0, mv);
        let key = eval.key();

        if best.as_ref().map_or(true, |b| is_better(&eval, b, side)) {
            best = Some(eval);
        }

        if ctx.config.alpha_beta {
            // Comparar chaves, e não pontuações, impede que um corte esconda um mate mais rápido
            match side {
                Side::Sente => {
                    if key.compare(&beta).is_ge() {
                        break;
                    }
                    if key.compare(&alpha).is_gt() {
                        alpha = key;
                    }
                }
                Side::Gote => {
                    if key.compare(&alpha).is_le() {
                        break;
                    }
                    if key.compare(&beta).is_lt() {
                        beta = key;
                    }
                }
            }
        }
    }

    Some(best.unwrap_or_else(|| Evaluation::static_score(evaluate(game))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(game: &Game, config: &SearchConfig) -> Option<Evaluation> {
        let cancel = CancelToken::new();
        let nodes = AtomicU64::new(0);
        let ctx = SearchContext { config, cancel: &cancel, nodes: &nodes };
        minimax(game, 0, EvalKey::MIN, EvalKey::MAX, &ctx)
    }

    #[test]
    fn test_static_evaluation_at_depth_limit() {
        let game = Game::from_sfen(Ruleset::shogi(), "4k4/9/9/9/9/9/9/9/4K4 b G").unwrap();
        let config = SearchConfig { max_depth: 0, ..SearchConfig::default() };
        let eval = run(&game, &config).unwrap();
        assert_eq!(eval.score, 11.0);
        assert!(eval.line.is_empty());
    }

    #[test]
    fn test_finds_mate_in_one_with_line() {
        let game = Game::from_sfen(Ruleset::shogi(), "4k4/1R7/R8/9/9/9/9/9/4K4 b -").unwrap();
        let config = SearchConfig { max_depth: 2, threads: 1, ..SearchConfig::default() };
        let eval = run(&game, &config).unwrap();
        assert_eq!(eval.mate(), Some((Side::Gote, 1)));
        assert_eq!(eval.line.len(), 1);
        assert_eq!(eval.line[0].to, Square::new(0, 8));
    }

    #[test]
    fn test_cancelled_search_returns_none() {
        let game = Game::new(Ruleset::minishogi()).unwrap();
        let config = SearchConfig::default();
        let cancel = CancelToken::new();
        cancel.cancel();
        let nodes = AtomicU64::new(0);
        let ctx = SearchContext { config: &config, cancel: &cancel, nodes: &nodes };
        assert!(minimax(&game, 0, EvalKey::MIN, EvalKey::MAX, &ctx).is_none());
        assert_eq!(nodes.load(Ordering::Relaxed), 0);
    }
}
