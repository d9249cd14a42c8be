pub mod alpha_beta;
pub mod evaluation;
pub mod move_ordering;
pub mod parallel_search;
pub mod search_thread;

pub use alpha_beta::*;
pub use evaluation::*;
pub use move_ordering::*;
pub use parallel_search::*;
pub use search_thread::*;

use crate::core::{Move, Side};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Configuração da busca
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Meios-lances a explorar, contando o lance da raiz
    pub max_depth: u32,
    pub threads: usize,
    pub alpha_beta: bool,
    pub order_moves: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            threads: num_cpus::get().max(1),
            alpha_beta: true,
            order_moves: true,
        }
    }
}

impl SearchConfig {
    pub fn with_depth(max_depth: u32) -> Self {
        Self { max_depth, ..Self::default() }
    }
}

/// Sinal de cancelamento partilhado entre o chamador e as threads de busca.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Estatísticas da busca
#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    pub nodes: u64,
    pub elapsed: Duration,
    pub root_moves: usize,
    pub completed: usize,
}

impl SearchStats {
    pub fn nodes_per_second(&self) -> u64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            (self.nodes as f64 / secs) as u64
        } else {
            0
        }
    }
}

/// Resultado da busca na raiz: uma avaliação por lance concluído.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub side: Side,
    pub evaluations: Vec<(Move, Evaluation)>,
    pub cancelled: bool,
    pub stats: SearchStats,
}

impl SearchOutcome {
    /// Melhor lance confirmado. Uma busca cancelada nunca confirma lance.
    pub fn best(&self) -> Option<(Move, &Evaluation)> {
        if self.cancelled {
            return None;
        }
        pick_best(self.side, &self.evaluations)
    }

    pub fn best_move(&self) -> Option<Move> {
        self.best().map(|(mv, _)| mv)
    }

    /// Melhor dos lances já avaliados, mesmo que a busca tenha sido cancelada.
    /// Não é uma decisão da busca: serve só a protocolos que exigem resposta depois de parar.
    pub fn best_unconfirmed(&self) -> Option<(Move, &Evaluation)> {
        pick_best(self.side, &self.evaluations)
    }
}
