// Ficheiro: src/core/ruleset.rs
// Descrição: Parâmetros da variante em jogo (dimensões, promoção, largadas, empates).

use super::types::{PieceKind, Side, Square};

/// Regra de repetição de posições.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepetitionRule {
    /// Quatro ocorrências: empate, ou derrota de quem deu xeque em todas elas
    Sennichite,
    /// Três ocorrências: empate simples
    ThreeFold,
}

impl RepetitionRule {
    pub fn threshold(self) -> u32 {
        match self {
            RepetitionRule::Sennichite => 4,
            RepetitionRule::ThreeFold => 3,
        }
    }
}

/// Configuração de uma variante. Valores próprios constroem-se a partir
/// de um preset: `Ruleset { drops: false, ..Ruleset::shogi() }`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ruleset {
    pub name: &'static str,
    pub width: u8,
    pub height: u8,
    /// Número de fileiras do fundo adversário onde se pode promover
    pub promotion_zone: u8,
    /// Peças capturadas vão para a reserva e podem ser largadas
    pub drops: bool,
    pub repetition: RepetitionRule,
    /// Meios-lances sem captura, largada, promoção ou lance de peão até ao empate
    pub stale_ply_limit: Option<u16>,
    /// Apenas os dois reis e reservas vazias terminam em empate
    pub insufficient_material: bool,
    pub start_sfen: &'static str,
}

pub const SHOGI_START: &str = "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b -";
pub const MINISHOGI_START: &str = "rbsgk/4p/5/P4/KGSBR b -";

impl Ruleset {
    pub const fn shogi() -> Self {
        Self {
            name: "shogi",
            width: 9,
            height: 9,
            promotion_zone: 3,
            drops: true,
            repetition: RepetitionRule::Sennichite,
            stale_ply_limit: None,
            insufficient_material: false,
            start_sfen: SHOGI_START,
        }
    }

    pub const fn minishogi() -> Self {
        Self {
            name: "minishogi",
            width: 5,
            height: 5,
            promotion_zone: 1,
            drops: true,
            repetition: RepetitionRule::Sennichite,
            stale_ply_limit: None,
            insufficient_material: false,
            start_sfen: MINISHOGI_START,
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "shogi" => Some(Self::shogi()),
            "minishogi" => Some(Self::minishogi()),
            _ => None,
        }
    }

    /// Fileiras que ainda restam à frente de uma peça de `side` em `square`.
    #[inline]
    pub fn ranks_ahead(&self, side: Side, square: Square) -> u8 {
        match side {
            Side::Sente => self.height - 1 - square.rank,
            Side::Gote => square.rank,
        }
    }

    #[inline]
    pub fn in_promotion_zone(&self, side: Side, square: Square) -> bool {
        self.ranks_ahead(side, square) < self.promotion_zone
    }

    /// Uma peça nesta casa nunca mais teria lance (peão/lança na última fileira, cavalo nas duas últimas).
    #[inline]
    pub fn is_dead_square(&self, kind: PieceKind, side: Side, square: Square) -> bool {
        self.ranks_ahead(side, square) < kind.rule().needs_ranks_ahead
    }

    /// O lance `from -> to` permite promover esta peça.
    pub fn can_promote(&self, kind: PieceKind, side: Side, from: Square, to: Square) -> bool {
        kind.promoted().is_some()
            && (self.in_promotion_zone(side, from) || self.in_promotion_zone(side, to))
    }
}

impl Default for Ruleset {
    fn default() -> Self {
        Self::shogi()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_promotion_zone_is_mirrored() {
        let rules = Ruleset::shogi();
        assert!(rules.in_promotion_zone(Side::Sente, Square::new(0, 6)));
        assert!(!rules.in_promotion_zone(Side::Sente, Square::new(0, 5)));
        assert!(rules.in_promotion_zone(Side::Gote, Square::new(0, 2)));
        assert!(!rules.in_promotion_zone(Side::Gote, Square::new(0, 3)));
    }

    #[test]
    fn test_dead_squares() {
        let rules = Ruleset::shogi();
        assert!(rules.is_dead_square(PieceKind::Pawn, Side::Sente, Square::new(4, 8)));
        assert!(!rules.is_dead_square(PieceKind::Pawn, Side::Sente, Square::new(4, 7)));
        assert!(rules.is_dead_square(PieceKind::Knight, Side::Gote, Square::new(4, 1)));
        assert!(!rules.is_dead_square(PieceKind::Knight, Side::Gote, Square::new(4, 2)));
        assert!(!rules.is_dead_square(PieceKind::Gold, Side::Sente, Square::new(4, 8)));
    }

    #[test]
    fn test_promotion_from_or_to_zone() {
        let rules = Ruleset::shogi();
        // Saída da zona também conta
        assert!(rules.can_promote(PieceKind::Silver, Side::Sente, Square::new(3, 6), Square::new(3, 5)));
        assert!(!rules.can_promote(PieceKind::Gold, Side::Sente, Square::new(3, 6), Square::new(3, 7)));
        assert!(!rules.can_promote(PieceKind::Rook, Side::Gote, Square::new(3, 6), Square::new(3, 5)));
    }

    #[test]
    fn test_presets_by_name() {
        assert_eq!(Ruleset::by_name("minishogi").map(|r| r.width), Some(5));
        assert!(Ruleset::by_name("chess").is_none());
    }
}
