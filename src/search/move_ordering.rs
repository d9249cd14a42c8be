use crate::core::*;

/// Ordena lances para maximizar podas Alpha-Beta. A ordenação é estável,
/// por isso lances com a mesma pontuação mantêm a ordem de geração.
pub fn order_moves(game: &Game, moves: &mut [Move]) {
    moves.sort_by_key(|mv| std::cmp::Reverse(score_move(game, mv)));
}

/// Pontua lance para ordenação (quanto maior, melhor)
fn score_move(game: &Game, mv: &Move) -> i32 {
    let mut score = 0;

    // MVV-LVA: vítima mais valiosa, atacante menos valioso
    if let Some(victim) = game.board().get(mv.to) {
        score += (victim.kind.value() * 100.0) as i32 - (mv.kind.value() * 10.0) as i32 + 10_000;
    }

    // Promoções: ganho material da peça promovida
    if mv.promote {
        if let Some(promoted) = mv.kind.promoted() {
            score += ((promoted.value() - mv.kind.value()) * 100.0) as i32;
        }
    }

    // Largadas por último
    if mv.is_drop() {
        score -= 100;
    }

    score
}
