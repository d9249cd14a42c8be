// Ficheiro: src/core/game.rs
// Descrição: Máquina de estados do jogo: execução de lances, promoções, reservas,
// repetições e classificação do estado (xeque, mate, afogamento, empates).

use std::collections::HashMap;

use tracing::debug;

use super::board::{Board, MAX_DIM};
use super::error::{SetupError, SetupResult};
use super::ruleset::{RepetitionRule, Ruleset};
use super::sfen;
use super::types::{Hand, Move, MoveRecord, Piece, PieceKind, Side, Source, Square};
use crate::moves::{is_in_check, legal_moves};

/// Estado da partida. `CheckX`, `CheckMateX` e `StalemateX` nomeiam o lado em xeque,
/// derrotado ou sem lances; `PerpetualCheckX` nomeia quem deu xeque perpétuo e perde.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameState {
    StandardPlay,
    CheckSente,
    CheckGote,
    CheckMateSente,
    CheckMateGote,
    StalemateSente,
    StalemateGote,
    DrawRepetition,
    PerpetualCheckSente,
    PerpetualCheckGote,
    DrawFiftyMove,
    DrawThreeFold,
    DrawInsufficientMaterial,
}

impl GameState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameState::StandardPlay | GameState::CheckSente | GameState::CheckGote)
    }

    /// Lado que perdeu, se a partida acabou com vencedor.
    pub fn loser(self) -> Option<Side> {
        match self {
            GameState::CheckMateSente | GameState::StalemateSente | GameState::PerpetualCheckSente => Some(Side::Sente),
            GameState::CheckMateGote | GameState::StalemateGote | GameState::PerpetualCheckGote => Some(Side::Gote),
            _ => None,
        }
    }

    pub fn is_draw(self) -> bool {
        self.is_terminal() && self.loser().is_none()
    }

    fn check(side: Side) -> Self {
        match side {
            Side::Sente => GameState::CheckSente,
            Side::Gote => GameState::CheckGote,
        }
    }

    fn checkmate(side: Side) -> Self {
        match side {
            Side::Sente => GameState::CheckMateSente,
            Side::Gote => GameState::CheckMateGote,
        }
    }

    fn stalemate(side: Side) -> Self {
        match side {
            Side::Sente => GameState::StalemateSente,
            Side::Gote => GameState::StalemateGote,
        }
    }

    fn perpetual_check(side: Side) -> Self {
        match side {
            Side::Sente => GameState::PerpetualCheckSente,
            Side::Gote => GameState::PerpetualCheckGote,
        }
    }
}

/// Decisão de promoção injetada pelo chamador (interface, jogador automático, testes).
pub trait PromotionDecider {
    fn should_promote(&self, piece: Piece, from: Square, to: Square) -> bool;
}

impl PromotionDecider for bool {
    fn should_promote(&self, _: Piece, _: Square, _: Square) -> bool {
        *self
    }
}

impl<F> PromotionDecider for F
where
    F: Fn(Piece, Square, Square) -> bool,
{
    fn should_promote(&self, piece: Piece, from: Square, to: Square) -> bool {
        self(piece, from, to)
    }
}

pub struct AlwaysPromote;
pub struct NeverPromote;

impl PromotionDecider for AlwaysPromote {
    fn should_promote(&self, _: Piece, _: Square, _: Square) -> bool {
        true
    }
}

impl PromotionDecider for NeverPromote {
    fn should_promote(&self, _: Piece, _: Square, _: Square) -> bool {
        false
    }
}

/// Partida completa. Só `execute_move` altera o tabuleiro, as reservas e o estado.
#[derive(Debug, Clone)]
pub struct Game {
    ruleset: Ruleset,
    board: Board,
    hands: [Hand; 2],
    side_to_move: Side,
    state: GameState,
    /// Lances legais do lado a jogar, sem ramos de promoção
    legal: Vec<Move>,
    history: Vec<MoveRecord>,
    repetitions: HashMap<String, u32>,
    signature: String,
    stale_plies: u16,
    initial_sfen: String,
}

impl Game {
    /// Posição inicial do ruleset.
    pub fn new(ruleset: Ruleset) -> SetupResult<Self> {
        Self::from_sfen(ruleset, ruleset.start_sfen)
    }

    /// Constrói uma partida a partir de SFEN, validando reis e peças mortas.
    pub fn from_sfen(ruleset: Ruleset, text: &str) -> SetupResult<Self> {
        let dims = 1..=MAX_DIM;
        if !dims.contains(&ruleset.width) || !dims.contains(&ruleset.height) {
            return Err(SetupError::UnsupportedSize { width: ruleset.width, height: ruleset.height, max: MAX_DIM });
        }
        let position = sfen::parse(text, ruleset.width, ruleset.height)?;

        for side in [Side::Sente, Side::Gote] {
            match position.board.count_kings(side) {
                0 => return Err(SetupError::MissingKing(side)),
                1 => {}
                _ => return Err(SetupError::TooManyKings(side)),
            }
        }
        if let Some((square, piece)) = position
            .board
            .pieces()
            .find(|(sq, p)| ruleset.is_dead_square(p.kind, p.side, *sq))
        {
            return Err(SetupError::DeadPiece { kind: piece.kind, square });
        }

        let mut game = Self {
            ruleset,
            board: position.board,
            hands: position.hands,
            side_to_move: position.side_to_move,
            state: GameState::StandardPlay,
            legal: Vec::new(),
            history: Vec::new(),
            repetitions: HashMap::new(),
            signature: String::new(),
            stale_plies: 0,
            initial_sfen: String::new(),
        };
        game.initial_sfen = game.to_sfen();
        game.refresh();
        Ok(game)
    }

    pub fn ruleset(&self) -> &Ruleset {
        &self.ruleset
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn hand(&self, side: Side) -> &Hand {
        &self.hands[side.index()]
    }

    pub fn hands(&self) -> &[Hand; 2] {
        &self.hands
    }

    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn initial_sfen(&self) -> &str {
        &self.initial_sfen
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Quantas vezes a posição atual (com marcador de xeque) já ocorreu.
    pub fn repetition_count(&self) -> u32 {
        self.repetitions.get(&self.signature).copied().unwrap_or(0)
    }

    pub fn stale_plies(&self) -> u16 {
        self.stale_plies
    }

    pub fn to_sfen(&self) -> String {
        sfen::format(&self.board, self.side_to_move, &self.hands)
    }

    /// Lances legais do lado a jogar, sem ramos de promoção.
    pub fn legal_moves(&self) -> &[Move] {
        &self.legal
    }

    /// Lances jogáveis, expandidos com as escolhas de promoção possíveis.
    pub fn playable_moves(&self) -> Vec<Move> {
        if self.state.is_terminal() {
            return Vec::new();
        }
        let side = self.side_to_move;
        let mut moves = Vec::with_capacity(self.legal.len() + 8);
        for &mv in &self.legal {
            let Some(from) = mv.from else {
                moves.push(mv);
                continue;
            };
            if !self.ruleset.can_promote(mv.kind, side, from, mv.to) {
                moves.push(mv);
            } else if self.ruleset.is_dead_square(mv.kind, side, mv.to) {
                moves.push(Move { promote: true, ..mv });
            } else {
                moves.push(mv);
                moves.push(Move { promote: true, ..mv });
            }
        }
        moves
    }

    /// O lance, incluindo a escolha de promoção, é jogável agora.
    pub fn is_legal(&self, mv: &Move) -> bool {
        if self.state.is_terminal() || !self.legal.contains(&Move { promote: false, ..*mv }) {
            return false;
        }
        let Some(from) = mv.from else {
            return !mv.promote;
        };
        let side = self.side_to_move;
        if mv.promote {
            self.ruleset.can_promote(mv.kind, side, from, mv.to)
        } else {
            !self.ruleset.is_dead_square(mv.kind, side, mv.to)
        }
    }

    /// Joga um lance validado e regista-o no histórico.
    pub fn play(&mut self, mv: Move) -> bool {
        self.apply(mv, true)
    }

    /// Joga um lance validado; `record_history == false` é usado pela pesquisa.
    pub fn apply(&mut self, mv: Move, record_history: bool) -> bool {
        if !self.is_legal(&mv) {
            debug!("rejected {:?}: not a playable move", mv);
            return false;
        }
        self.execute_move(mv.source(), mv.to, false, &mv.promote, record_history)
    }

    /// Executa um pedido de lance. Devolve `false` sem alterar nada se o lance for recusado.
    ///
    /// Com `forced == true` a verificação de legalidade é saltada, mas nunca se aceita
    /// mexer peças adversárias, capturar um rei ou largar peças que não estão na reserva.
    pub fn execute_move(
        &mut self,
        source: Source,
        destination: Square,
        forced: bool,
        promotion: &dyn PromotionDecider,
        record_history: bool,
    ) -> bool {
        if self.state.is_terminal() {
            debug!("rejected move: game is over ({:?})", self.state);
            return false;
        }
        if !self.board.contains(destination) {
            debug!("rejected move: {:?} is off the board", destination);
            return false;
        }
        let side = self.side_to_move;
        let target = self.board.get(destination);
        if let Some(occupant) = target {
            if occupant.side == side || occupant.kind == PieceKind::King {
                debug!("rejected move: cannot capture {:?} at {:?}", occupant, destination);
                return false;
            }
        }

        let record = match source {
            Source::Board(from) => {
                let Some(piece) = self.board.get(from).filter(|p| p.side == side) else {
                    debug!("rejected move: no {} piece at {:?}", side, from);
                    return false;
                };
                if !forced && !self.legal.contains(&Move::board(piece.kind, from, destination, false)) {
                    debug!("rejected move: {:?} -> {:?} is illegal", from, destination);
                    return false;
                }

                let mut kind = piece.kind;
                let mut promoted = false;
                if self.ruleset.can_promote(kind, side, from, destination) {
                    let must = self.ruleset.is_dead_square(kind, side, destination);
                    if must || promotion.should_promote(piece, from, destination) {
                        if let Some(next) = kind.promoted() {
                            kind = next;
                            promoted = true;
                        }
                    }
                }

                if let Some(captured) = target {
                    if self.ruleset.drops {
                        self.hands[side.index()].add(captured.kind.demoted());
                    }
                }
                self.board.set(from, None);
                self.board.set(destination, Some(Piece::new(kind, side)));

                MoveRecord {
                    side,
                    kind: piece.kind,
                    from: Some(from),
                    to: destination,
                    promoted,
                    captured: target.map(|p| p.kind),
                }
            }
            Source::Drop(kind) => {
                if !self.ruleset.drops || target.is_some() || self.hands[side.index()].count(kind) == 0 {
                    debug!("rejected drop of {:?} at {:?}", kind, destination);
                    return false;
                }
                if self.ruleset.is_dead_square(kind, side, destination) {
                    debug!("rejected drop of {:?} at {:?}: piece could never move", kind, destination);
                    return false;
                }
                if !forced && !self.legal.contains(&Move::drop(kind, destination)) {
                    debug!("rejected drop of {:?} at {:?}: illegal", kind, destination);
                    return false;
                }
                if !self.hands[side.index()].take(kind) {
                    return false;
                }
                self.board.set(destination, Some(Piece::new(kind, side)));

                MoveRecord { side, kind, from: None, to: destination, promoted: false, captured: None }
            }
        };

        let irreversible = record.dropped()
            || record.promoted
            || record.captured.is_some()
            || record.kind == PieceKind::Pawn;
        self.stale_plies = if irreversible { 0 } else { self.stale_plies.saturating_add(1) };

        if record_history {
            self.history.push(record);
        }
        self.side_to_move = side.opponent();
        self.refresh();
        true
    }

    /// Recalcula lances legais, assinatura e estado depois de cada alteração.
    fn refresh(&mut self) {
        let side = self.side_to_move;
        self.legal = legal_moves(&self.board, &self.hands, side, &self.ruleset);
        let in_check = is_in_check(&self.board, side);

        self.signature = sfen::signature(&self.board, side, &self.hands, in_check);
        let count = {
            let entry = self.repetitions.entry(self.signature.clone()).or_insert(0);
            *entry += 1;
            *entry
        };
        self.state = self.classify(in_check, count);
    }

    fn classify(&self, in_check: bool, count: u32) -> GameState {
        let side = self.side_to_move;

        // Sem lances de tabuleiro nem largadas: mate ou afogamento
        if self.legal.is_empty() {
            return if in_check { GameState::checkmate(side) } else { GameState::stalemate(side) };
        }

        if count >= self.ruleset.repetition.threshold() {
            return match self.ruleset.repetition {
                // Quem está a jogar está em xeque: o adversário deu o xeque perpétuo
                RepetitionRule::Sennichite if in_check => GameState::perpetual_check(side.opponent()),
                RepetitionRule::Sennichite => GameState::DrawRepetition,
                RepetitionRule::ThreeFold => GameState::DrawThreeFold,
            };
        }

        if self.ruleset.stale_ply_limit.is_some_and(|limit| self.stale_plies >= limit) {
            return GameState::DrawFiftyMove;
        }

        if self.ruleset.insufficient_material
            && self.hands.iter().all(Hand::is_empty)
            && self.board.pieces().all(|(_, p)| p.kind == PieceKind::King)
        {
            return GameState::DrawInsufficientMaterial;
        }

        if in_check {
            GameState::check(side)
        } else {
            GameState::StandardPlay
        }
    }

    /// Converte texto USI ("7g7f", "8h2b+", "P*5e") num lance jogável.
    pub fn parse_usi_move(&self, text: &str) -> Option<Move> {
        let (width, height) = (self.ruleset.width, self.ruleset.height);
        let mv = if let Some((letter, square)) = text.split_once('*') {
            let mut letters = letter.chars();
            let kind = PieceKind::from_letter(letters.next()?)?;
            if letters.next().is_some() {
                return None;
            }
            Move::drop(kind, Square::from_usi(square, width, height)?)
        } else {
            let (body, promote) = match text.strip_suffix('+') {
                Some(body) => (body, true),
                None => (text, false),
            };
            if body.len() != 4 || !body.is_ascii() {
                return None;
            }
            let from = Square::from_usi(&body[..2], width, height)?;
            let to = Square::from_usi(&body[2..], width, height)?;
            let piece = self.board.get(from)?;
            Move::board(piece.kind, from, to, promote)
        };
        self.is_legal(&mv).then_some(mv)
    }

    pub fn move_to_usi(&self, mv: &Move) -> String {
        mv.to_usi(self.ruleset.width, self.ruleset.height)
    }
}

impl PartialEq for Game {
    /// Duas partidas são iguais se a posição e o estado coincidirem; o histórico não conta.
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board
            && self.hands == other.hands
            && self.side_to_move == other.side_to_move
            && self.state == other.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shogi(text: &str) -> Game {
        Game::from_sfen(Ruleset::shogi(), text).unwrap()
    }

    fn usi(game: &Game, text: &str) -> Move {
        game.parse_usi_move(text).unwrap_or_else(|| panic!("{} should be legal", text))
    }

    #[test]
    fn test_new_game() {
        let game = Game::new(Ruleset::shogi()).unwrap();
        assert_eq!(game.state(), GameState::StandardPlay);
        assert_eq!(game.side_to_move(), Side::Sente);
        assert_eq!(game.legal_moves().len(), 30);
        assert_eq!(game.repetition_count(), 1);
        assert_eq!(game.initial_sfen(), crate::core::ruleset::SHOGI_START);
    }

    #[test]
    fn test_setup_errors() {
        assert_eq!(
            Game::from_sfen(Ruleset::shogi(), "9/9/9/9/9/9/9/9/4K4 b -").err(),
            Some(SetupError::MissingKing(Side::Gote))
        );
        assert_eq!(
            Game::from_sfen(Ruleset::shogi(), "4k4/9/9/9/9/9/9/9/3KK4 b -").err(),
            Some(SetupError::TooManyKings(Side::Sente))
        );
        assert!(matches!(
            Game::from_sfen(Ruleset::shogi(), "4k3P/9/9/9/9/9/9/9/4K4 b -"),
            Err(SetupError::DeadPiece { kind: PieceKind::Pawn, .. })
        ));
        assert!(matches!(
            Game::from_sfen(Ruleset::shogi(), "4k4 b -"),
            Err(SetupError::Format(_))
        ));
    }

    #[test]
    fn test_oversized_ruleset_is_rejected() {
        let wide = Ruleset { width: 10, ..Ruleset::shogi() };
        assert_eq!(
            Game::from_sfen(wide, "4k5/10/10/10/10/10/10/10/4K5 b -").err(),
            Some(SetupError::UnsupportedSize { width: 10, height: 9, max: 9 })
        );
        let empty = Ruleset { height: 0, ..Ruleset::minishogi() };
        assert!(matches!(Game::new(empty), Err(SetupError::UnsupportedSize { height: 0, .. })));
        assert!(Game::new(Ruleset { name: "custom", ..Ruleset::shogi() }).is_ok());
    }

    #[test]
    fn test_capture_goes_to_hand_demoted() {
        // Torre promovida de Gote em 5e, prata de Sente em 4f pode capturá-la
        let mut game = shogi("4k4/9/9/9/4+r4/5S3/9/9/4K4 b -");
        let capture = usi(&game, "4f5e");
        assert!(game.play(capture));
        assert_eq!(game.hand(Side::Sente).count(PieceKind::Rook), 1);
        assert_eq!(game.side_to_move(), Side::Gote);
        let record = game.history()[0];
        assert_eq!(record.captured, Some(PieceKind::Dragon));
        assert!(!record.dropped());
    }

    #[test]
    fn test_forced_promotion_on_last_rank() {
        let mut game = shogi("k8/9/4P4/9/9/9/9/9/4K4 b -");
        let pawn_from = Square::new(4, 6);
        // Zona de promoção, mas a promoção é opcional
        assert!(game.is_legal(&Move::board(PieceKind::Pawn, pawn_from, Square::new(4, 7), false)));
        assert!(game.execute_move(Source::Board(pawn_from), Square::new(4, 7), false, &false, true));
        assert_eq!(game.board().get(Square::new(4, 7)).map(|p| p.kind), Some(PieceKind::Pawn));

        let mut game = shogi("k8/4P4/9/9/9/9/9/9/4K4 b -");
        assert!(!game.is_legal(&Move::board(PieceKind::Pawn, Square::new(4, 7), Square::new(4, 8), false)));
        // Sem promoção não é jogável, e o pedido direto promove à força
        assert!(game.execute_move(Source::Board(Square::new(4, 7)), Square::new(4, 8), false, &NeverPromote, true));
        assert_eq!(game.board().get(Square::new(4, 8)).map(|p| p.kind), Some(PieceKind::PromotedPawn));
        assert!(game.history()[0].promoted);
    }

    #[test]
    fn test_optional_promotion_uses_decider() {
        let text = "k8/9/9/9/9/9/9/1B7/4K4 b -";
        let mut game = shogi(text);
        let mv = usi(&game, "8h3c");
        assert!(!mv.promote);
        let asked = std::cell::Cell::new(false);
        let decider = |piece: Piece, _: Square, _: Square| {
            asked.set(true);
            piece.kind == PieceKind::Bishop
        };
        assert!(game.execute_move(mv.source(), mv.to, false, &decider, true));
        assert!(asked.get());
        assert_eq!(game.board().get(mv.to).map(|p| p.kind), Some(PieceKind::Horse));

        let mut game = shogi(text);
        assert!(game.play(usi(&game, "8h3c")));
        assert_eq!(game.board().get(mv.to).map(|p| p.kind), Some(PieceKind::Bishop));
    }

    #[test]
    fn test_playable_moves_branch_on_promotion() {
        let game = shogi("k8/9/9/9/9/9/9/1B7/4K4 b -");
        let playable = game.playable_moves();
        let into_zone = playable
            .iter()
            .filter(|m| m.kind == PieceKind::Bishop && !m.promote && m.to.rank >= 6)
            .count();
        let promoted = playable.iter().filter(|m| m.promote).count();
        assert_eq!(into_zone, promoted);
        assert!(promoted > 0);
    }

    #[test]
    fn test_illegal_requests_leave_game_untouched() {
        let mut game = Game::new(Ruleset::shogi()).unwrap();
        let before = game.clone();
        // Peça adversária, casa vazia, destino fora do alcance, reserva vazia
        assert!(!game.execute_move(Source::Board(Square::new(0, 6)), Square::new(0, 5), false, &false, true));
        assert!(!game.execute_move(Source::Board(Square::new(4, 4)), Square::new(4, 5), false, &false, true));
        assert!(!game.execute_move(Source::Board(Square::new(2, 2)), Square::new(2, 4), false, &false, true));
        assert!(!game.execute_move(Source::Drop(PieceKind::Pawn), Square::new(4, 4), false, &false, true));
        assert!(!game.execute_move(Source::Drop(PieceKind::Pawn), Square::new(4, 4), true, &false, true));
        assert!(game == before);
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_king_capture_is_refused_even_when_forced() {
        let mut game = shogi("4k4/4R4/9/9/9/9/9/9/4K4 w -");
        // Gote está em xeque; a torre de Sente não pode "capturar" o rei fora de vez
        assert_eq!(game.state(), GameState::CheckGote);
        let mut other = shogi("4k4/4R4/9/9/9/9/9/9/4K4 b -");
        assert!(!other.execute_move(Source::Board(Square::new(4, 7)), Square::new(4, 8), true, &false, true));
        assert!(game.play(usi(&game, "5a5b")));
    }

    #[test]
    fn test_two_rook_mate() {
        // Torres em 8b e 9c; a torre de 9c vai para 9a
        let mut game = shogi("4k4/1R7/R8/9/9/9/9/9/4K4 b -");
        assert!(game.play(usi(&game, "9c9a")));
        assert_eq!(game.state(), GameState::CheckMateGote);
        assert_eq!(game.state().loser(), Some(Side::Gote));
        // Estado terminal é absorvente
        let any = Move::board(PieceKind::King, Square::new(4, 8), Square::new(3, 7), false);
        assert!(!game.play(any));
        assert!(!game.execute_move(any.source(), any.to, true, &false, true));
    }

    #[test]
    fn test_stalemate_is_not_checkmate() {
        // Rei de Gote em 1a sem lances e sem estar em xeque
        let mut game = shogi("8k/6G2/9/7G1/9/9/9/9/K8 b -");
        assert!(game.play(usi(&game, "2d2c")));
        assert_eq!(game.state(), GameState::StalemateGote);
        assert!(!is_in_check(game.board(), Side::Gote));
    }

    #[test]
    fn test_drop_escape_prevents_mate() {
        // Mesmo mate de torres, mas Gote tem um ouro para interpor
        let mut game = shogi("4k4/1R7/R8/9/9/9/9/9/4K4 b g");
        assert!(game.play(usi(&game, "9c9a")));
        assert_eq!(game.state(), GameState::CheckGote);
        assert!(game.legal_moves().iter().all(Move::is_drop));
    }

    #[test]
    fn test_repetition_draw_after_four_occurrences() {
        let mut game = shogi("4k4/9/9/9/9/9/9/9/4K4 b -");
        let cycle = ["5i4i", "5a4a", "4i5i", "4a5a"];
        for round in 0..3 {
            for text in cycle {
                assert_eq!(game.state(), GameState::StandardPlay, "round {}", round);
                assert!(game.play(usi(&game, text)));
            }
        }
        assert_eq!(game.repetition_count(), 4);
        assert_eq!(game.state(), GameState::DrawRepetition);
        assert!(game.state().is_draw());
    }

    #[test]
    fn test_perpetual_check_loses() {
        // A torre de Sente dá xeque a cada ida e volta do rei de Gote
        let mut game = shogi("k8/9/9/9/9/9/9/9/R3K4 w -");
        assert_eq!(game.state(), GameState::CheckGote);
        let cycle = ["9a8a", "9i8i", "8a9a", "8i9i"];
        for _ in 0..3 {
            for text in cycle {
                assert!(game.play(usi(&game, text)));
            }
        }
        assert_eq!(game.state(), GameState::PerpetualCheckSente);
        assert_eq!(game.state().loser(), Some(Side::Sente));
    }

    #[test]
    fn test_three_fold_and_fifty_move_variants() {
        let rules = Ruleset { repetition: RepetitionRule::ThreeFold, ..Ruleset::shogi() };
        let mut game = Game::from_sfen(rules, "4k4/9/9/9/9/9/9/9/4K4 b -").unwrap();
        let cycle = ["5i4i", "5a4a", "4i5i", "4a5a"];
        for _ in 0..2 {
            for text in cycle {
                assert!(game.play(usi(&game, text)));
            }
        }
        assert_eq!(game.state(), GameState::DrawThreeFold);

        let rules = Ruleset { stale_ply_limit: Some(3), ..Ruleset::shogi() };
        let mut game = Game::from_sfen(rules, "4k4/9/9/9/9/9/9/9/4K4 b -").unwrap();
        for text in ["5i4i", "5a4a"] {
            assert!(game.play(usi(&game, text)));
            assert!(!game.state().is_terminal());
        }
        assert!(game.play(usi(&game, "4i3i")));
        assert_eq!(game.state(), GameState::DrawFiftyMove);
    }

    #[test]
    fn test_insufficient_material() {
        // O rei de Sente captura o último peão; sem largadas a reserva fica vazia
        let rules = Ruleset { insufficient_material: true, drops: false, ..Ruleset::shogi() };
        let mut bare = Game::from_sfen(rules, "4k4/9/9/9/9/9/9/4p4/4K4 b -").unwrap();
        assert_eq!(bare.state(), GameState::CheckSente);
        assert!(bare.play(usi(&bare, "5i5h")));
        assert_eq!(bare.state(), GameState::DrawInsufficientMaterial);

        // Com largadas o peão capturado continua em jogo
        let rules = Ruleset { insufficient_material: true, ..Ruleset::shogi() };
        let mut game = Game::from_sfen(rules, "4k4/9/9/9/9/9/9/4p4/4K4 b -").unwrap();
        assert!(game.play(usi(&game, "5i5h")));
        assert_eq!(game.state(), GameState::StandardPlay);
    }

    #[test]
    fn test_usi_parsing() {
        let game = Game::new(Ruleset::shogi()).unwrap();
        let mv = usi(&game, "7g7f");
        assert_eq!(mv.kind, PieceKind::Pawn);
        assert_eq!(game.move_to_usi(&mv), "7g7f");
        assert!(game.parse_usi_move("7g7e").is_none());
        assert!(game.parse_usi_move("P*5e").is_none());
        assert!(game.parse_usi_move("7g7f+").is_none());
        assert!(game.parse_usi_move("xx").is_none());

        let game = shogi("4k4/9/9/9/9/9/9/9/4K4 b P");
        assert_eq!(usi(&game, "P*5e"), Move::drop(PieceKind::Pawn, Square::new(4, 4)));
    }
}
