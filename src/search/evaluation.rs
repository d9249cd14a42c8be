// Avaliação estática, resultado de pesquisa e ordem total entre avaliações

use std::cmp::Ordering;

use crate::core::{Game, GameState, Move, Side};

/// Resultado de avaliar um lance: pontuação material (Sente positivo) e
/// informação de mate com a distância em meios-lances a partir da raiz.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub score: f64,
    pub sente_mated: bool,
    pub gote_mated: bool,
    pub sente_mate_depth: u32,
    pub gote_mate_depth: u32,
    /// Variante principal, a começar no lance avaliado
    pub line: Vec<Move>,
}

impl Evaluation {
    pub fn static_score(score: f64) -> Self {
        Self {
            score,
            sente_mated: false,
            gote_mated: false,
            sente_mate_depth: 0,
            gote_mate_depth: 0,
            line: Vec::new(),
        }
    }

    pub fn draw() -> Self {
        Self::static_score(0.0)
    }

    /// `loser` perde a partida `depth` meios-lances depois da raiz.
    pub fn mated(loser: Side, depth: u32) -> Self {
        match loser {
            Side::Sente => Self {
                score: f64::NEG_INFINITY,
                sente_mated: true,
                sente_mate_depth: depth,
                ..Self::static_score(0.0)
            },
            Side::Gote => Self {
                score: f64::INFINITY,
                gote_mated: true,
                gote_mate_depth: depth,
                ..Self::static_score(0.0)
            },
        }
    }

    /// Lado que leva mate e a que distância.
    pub fn mate(&self) -> Option<(Side, u32)> {
        if self.gote_mated {
            Some((Side::Gote, self.gote_mate_depth))
        } else if self.sente_mated {
            Some((Side::Sente, self.sente_mate_depth))
        } else {
            None
        }
    }

    /// Chave na ordem total usada pelo alfa-beta e pela escolha do melhor lance.
    pub fn key(&self) -> EvalKey {
        match self.mate() {
            // Mate mais rápido vale mais para quem o dá
            Some((Side::Gote, depth)) => EvalKey { tier: 1, value: -(depth as f64) },
            Some((Side::Sente, depth)) => EvalKey { tier: -1, value: depth as f64 },
            None => EvalKey { tier: 0, value: self.score },
        }
    }
}

/// Ordem total do ponto de vista de Sente: qualquer mate de Gote acima de qualquer
/// pontuação finita, e qualquer pontuação acima de um mate de Sente.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct EvalKey {
    tier: i8,
    value: f64,
}

impl EvalKey {
    pub const MIN: EvalKey = EvalKey { tier: -2, value: 0.0 };
    pub const MAX: EvalKey = EvalKey { tier: 2, value: 0.0 };

    pub fn compare(&self, other: &EvalKey) -> Ordering {
        self.partial_cmp(other).unwrap_or(Ordering::Equal)
    }
}

/// `candidate` é estritamente melhor do que `current` para `side`.
pub fn is_better(candidate: &Evaluation, current: &Evaluation, side: Side) -> bool {
    let ordering = candidate.key().compare(&current.key());
    match side {
        Side::Sente => ordering == Ordering::Greater,
        Side::Gote => ordering == Ordering::Less,
    }
}

/// Melhor lance para `side`. Empates resolvem-se pela ordem dos lances, por isso o
/// resultado não depende da ordem em que as avaliações chegaram.
pub fn pick_best(side: Side, evaluations: &[(Move, Evaluation)]) -> Option<(Move, &Evaluation)> {
    evaluations
        .iter()
        .min_by(|(move_a, eval_a), (move_b, eval_b)| {
            let by_key = eval_a.key().compare(&eval_b.key());
            let by_key = match side {
                Side::Sente => by_key.reverse(),
                Side::Gote => by_key,
            };
            by_key.then_with(|| move_a.cmp(move_b))
        })
        .map(|(mv, eval)| (*mv, eval))
}

/// Avaliação de um estado terminal a `ply` meios-lances da raiz.
/// Afogamento e xeque perpétuo contam como derrota, tal como o mate.
pub fn terminal_evaluation(state: GameState, ply: u32) -> Option<Evaluation> {
    if !state.is_terminal() {
        return None;
    }
    Some(match state.loser() {
        Some(loser) => Evaluation::mated(loser, ply),
        None => Evaluation::draw(),
    })
}

/// Soma do material no tabuleiro e nas reservas; o rei vale zero.
pub fn evaluate(game: &Game) -> f64 {
    game.board().material() + game.hand(Side::Sente).material() - game.hand(Side::Gote).material()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PieceKind, Ruleset, Square};

    #[test]
    fn test_start_position_is_balanced() {
        let game = Game::new(Ruleset::shogi()).unwrap();
        assert_eq!(evaluate(&game), 0.0);
    }

    #[test]
    fn test_hand_counts_as_material() {
        let game = Game::from_sfen(Ruleset::shogi(), "4k4/9/9/9/9/9/9/9/4K4 b Rp").unwrap();
        assert_eq!(evaluate(&game), 18.0);
    }

    #[test]
    fn test_key_orders_mates_and_scores() {
        let fast = Evaluation::mated(Side::Gote, 1);
        let slow = Evaluation::mated(Side::Gote, 3);
        let up = Evaluation::static_score(50.0);
        let lost = Evaluation::mated(Side::Sente, 2);

        assert!(is_better(&fast, &slow, Side::Sente));
        assert!(is_better(&slow, &up, Side::Sente));
        assert!(is_better(&up, &lost, Side::Sente));
        // Gote prefere adiar o próprio mate
        assert!(is_better(&slow, &fast, Side::Gote));
        assert!(is_better(&lost, &up, Side::Gote));
        assert!(EvalKey::MIN < lost.key() && fast.key() < EvalKey::MAX);
    }

    #[test]
    fn test_pick_best_is_order_independent() {
        let a = Move::drop(PieceKind::Pawn, Square::new(1, 1));
        let b = Move::drop(PieceKind::Pawn, Square::new(2, 2));
        let c = Move::drop(PieceKind::Gold, Square::new(3, 3));
        let mut evaluations = vec![
            (c, Evaluation::static_score(1.0)),
            (b, Evaluation::static_score(5.0)),
            (a, Evaluation::static_score(5.0)),
        ];
        let first = pick_best(Side::Sente, &evaluations).map(|(mv, _)| mv);
        evaluations.reverse();
        let second = pick_best(Side::Sente, &evaluations).map(|(mv, _)| mv);
        assert_eq!(first, Some(a));
        assert_eq!(first, second);
        assert_eq!(pick_best(Side::Gote, &evaluations).map(|(mv, _)| mv), Some(c));
        assert!(pick_best(Side::Sente, &[]).is_none());
    }

    #[test]
    fn test_terminal_evaluations() {
        assert!(terminal_evaluation(GameState::CheckSente, 2).is_none());
        let eval = terminal_evaluation(GameState::StalemateGote, 2).unwrap();
        assert_eq!(eval.mate(), Some((Side::Gote, 2)));
        let eval = terminal_evaluation(GameState::DrawRepetition, 2).unwrap();
        assert_eq!(eval.score, 0.0);
        assert!(eval.mate().is_none());
    }
}
