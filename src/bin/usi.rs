// Interface USI (Universal Shogi Interface) para o motor Kyokumen

use kyokumen::search::*;
use kyokumen::*;
use std::io::{self, BufRead};
use std::thread;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

struct USIEngine {
    ruleset: Ruleset,
    game: Game,
    config: SearchConfig,
    cancel: Option<CancelToken>,
    search_thread: Option<thread::JoinHandle<()>>,
}

impl USIEngine {
    fn new(ruleset: Ruleset) -> Result<Self, SetupError> {
        Ok(USIEngine {
            ruleset,
            game: Game::new(ruleset)?,
            config: SearchConfig::default(),
            cancel: None,
            search_thread: None,
        })
    }

    fn run(&mut self) {
        let stdin = io::stdin();

        for line in stdin.lock().lines() {
            let Ok(input) = line else {
                break;
            };
            let parts: Vec<&str> = input.split_whitespace().collect();

            if parts.is_empty() {
                continue;
            }

            match parts[0] {
                "usi" => self.handle_usi(),
                "isready" => println!("readyok"),
                "setoption" => self.handle_setoption(&parts),
                "usinewgame" => self.handle_new_game(),
                "position" => self.handle_position(&parts),
                "go" => self.handle_go(&parts),
                "stop" => self.handle_stop(),
                "quit" => break,
                other => debug!("ignoring unknown command '{}'", other),
            }
        }
        self.handle_stop();
    }

    fn handle_usi(&self) {
        println!("id name Kyokumen {}", env!("CARGO_PKG_VERSION"));
        println!("id author Pedro Contessoto");

        println!("option name Threads type spin default {} min 1 max 128", num_cpus::get());
        println!("option name Depth type spin default {} min 1 max 16", self.config.max_depth);
        println!("option name Variant type combo default {} var shogi var minishogi", self.ruleset.name);

        println!("usiok");
    }

    /// `setoption name <nome> value <valor>`
    fn handle_setoption(&mut self, parts: &[&str]) {
        let name = parts.iter().skip_while(|p| **p != "name").nth(1).copied();
        let value = parts.iter().skip_while(|p| **p != "value").nth(1).copied();
        match (name, value) {
            (Some("Threads"), Some(v)) => match v.parse::<usize>() {
                Ok(n) => self.config.threads = n.max(1),
                Err(_) => warn!("invalid Threads value '{}'", v),
            },
            (Some("Depth"), Some(v)) => match v.parse::<u32>() {
                Ok(d) => self.config.max_depth = d.max(1),
                Err(_) => warn!("invalid Depth value '{}'", v),
            },
            (Some("Variant"), Some(v)) => match Ruleset::by_name(v) {
                Some(ruleset) => {
                    self.ruleset = ruleset;
                    self.handle_new_game();
                }
                None => warn!("unknown variant '{}'", v),
            },
            _ => debug!("ignoring setoption {:?}", parts),
        }
    }

    fn handle_new_game(&mut self) {
        self.handle_stop();
        match Game::new(self.ruleset) {
            Ok(game) => self.game = game,
            Err(e) => println!("info string invalid start position: {}", e),
        }
    }

    fn handle_position(&mut self, parts: &[&str]) {
        if parts.len() < 2 {
            return;
        }
        self.handle_stop();

        let mut idx = 1;

        let game = match parts[idx] {
            "startpos" => {
                idx += 1;
                Game::new(self.ruleset)
            }
            "sfen" => {
                idx += 1;
                let mut sfen_parts = Vec::new();

                // Coleta partes do SFEN até "moves" ou fim
                while idx < parts.len() && parts[idx] != "moves" {
                    sfen_parts.push(parts[idx]);
                    idx += 1;
                }
                Game::from_sfen(self.ruleset, &sfen_parts.join(" "))
            }
            _ => return,
        };
        match game {
            Ok(game) => self.game = game,
            Err(e) => {
                println!("info string invalid position: {}", e);
                return;
            }
        }

        // Processa lances se houver
        if idx < parts.len() && parts[idx] == "moves" {
            for text in &parts[idx + 1..] {
                match self.game.parse_usi_move(text) {
                    Some(mv) => {
                        self.game.play(mv);
                    }
                    None => {
                        println!("info string illegal move {}", text);
                        break;
                    }
                }
            }
        }
    }

    fn handle_go(&mut self, parts: &[&str]) {
        // Para busca anterior se existir
        self.handle_stop();

        let mut config = self.config.clone();
        let mut idx = 1;
        while idx < parts.len() {
            match parts[idx] {
                "depth" => {
                    if let Some(d) = parts.get(idx + 1).and_then(|v| v.parse::<u32>().ok()) {
                        config.max_depth = d.max(1);
                    }
                    idx += 2;
                }
                _ => idx += 1,
            }
        }

        // Inicia busca em thread separada
        let handle = SearchHandle::spawn(self.game.clone(), config.clone());
        self.cancel = Some(handle.cancel_token());

        let game = self.game.clone();
        let search_thread = thread::spawn(move || {
            let Some(outcome) = handle.wait() else {
                println!("bestmove resign");
                return;
            };
            report(&game, &config, &outcome);
        });

        self.search_thread = Some(search_thread);
    }

    fn handle_stop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }

        if let Some(thread) = self.search_thread.take() {
            let _ = thread.join();
        }
    }
}

/// Imprime a linha `info` e o `bestmove`.
fn report(game: &Game, config: &SearchConfig, outcome: &SearchOutcome) {
    // O USI obriga a responder `bestmove` a cada `stop`; uma busca cancelada não tem
    // decisão, por isso responde-se com o melhor lance parcial ou `resign`.
    let best = if outcome.cancelled { outcome.best_unconfirmed() } else { outcome.best() };
    let Some((mv, eval)) = best else {
        println!("bestmove resign");
        return;
    };

    let score = match eval.mate() {
        Some((loser, depth)) if loser == outcome.side => format!("mate -{}", depth),
        Some((_, depth)) => format!("mate {}", depth),
        None => {
            let cp = match outcome.side {
                Side::Sente => eval.score,
                Side::Gote => -eval.score,
            };
            format!("cp {}", (cp * 100.0).round() as i64)
        }
    };
    let pv: Vec<String> = eval.line.iter().map(|m| m.to_usi(game.ruleset().width, game.ruleset().height)).collect();
    println!(
        "info depth {} nodes {} nps {} time {} score {} pv {}",
        config.max_depth,
        outcome.stats.nodes,
        outcome.stats.nodes_per_second(),
        outcome.stats.elapsed.as_millis(),
        score,
        pv.join(" ")
    );
    if outcome.cancelled {
        println!("info string search stopped after {}/{} root moves", outcome.stats.completed, outcome.stats.root_moves);
    }
    println!("bestmove {}", game.move_to_usi(&mv));
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    match USIEngine::new(Ruleset::shogi()) {
        Ok(mut engine) => engine.run(),
        Err(e) => eprintln!("❌ Erro ao montar a posição inicial: {}", e),
    }
}
