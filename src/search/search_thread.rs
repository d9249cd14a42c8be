// Busca em segundo plano: uma thread dedicada entrega o resultado por canal

use crate::core::Game;
use crate::search::{evaluate_moves, CancelToken, SearchConfig, SearchOutcome};
use crossbeam::channel::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

/// Busca a correr noutra thread sobre uma cópia da partida.
pub struct SearchHandle {
    cancel: CancelToken,
    receiver: Receiver<SearchOutcome>,
    thread: Option<JoinHandle<()>>,
}

impl SearchHandle {
    pub fn spawn(game: Game, config: SearchConfig) -> Self {
        let cancel = CancelToken::new();
        let (sender, receiver) = channel::bounded(1);
        let token = cancel.clone();
        let thread = thread::spawn(move || {
            let outcome = evaluate_moves(&game, &config, &token);
            // O recetor pode já ter sido largado
            let _ = sender.send(outcome);
        });
        Self { cancel, receiver, thread: Some(thread) }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Resultado, se a busca já terminou.
    pub fn try_outcome(&self) -> Option<SearchOutcome> {
        match self.receiver.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Espera pelo fim da busca.
    pub fn wait(mut self) -> Option<SearchOutcome> {
        let outcome = self.receiver.recv().ok();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        outcome
    }

    /// Cancela e espera pelo resultado parcial.
    pub fn stop(self) -> Option<SearchOutcome> {
        self.cancel();
        self.wait()
    }
}

impl Drop for SearchHandle {
    fn drop(&mut self) {
        if let Some(thread) = self.thread.take() {
            self.cancel.cancel();
            let _ = thread.join();
        }
    }
}
