// Kyokumen - partida de demonstração do motor contra si próprio
use clap::Parser;
use kyokumen::search::{evaluate_moves, CancelToken, SearchConfig};
use kyokumen::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "kyokumen", about = "Partida de demonstração do motor de shogi kyokumen contra si próprio")]
struct Args {
    /// Variante: shogi ou minishogi
    #[arg(long, default_value = "minishogi")]
    variant: String,

    /// Posição inicial em SFEN (por omissão a posição inicial da variante)
    #[arg(long)]
    sfen: Option<String>,

    /// Profundidade da busca em meios-lances
    #[arg(long, default_value_t = 3)]
    depth: u32,

    /// Threads da busca (por omissão, todos os núcleos)
    #[arg(long)]
    threads: Option<usize>,

    /// Limite de meios-lances da partida
    #[arg(long, default_value_t = 200)]
    max_plies: u32,

    /// Meios-lances aleatórios de abertura
    #[arg(long, default_value_t = 0)]
    random_plies: u32,

    /// Semente do gerador aleatório
    #[arg(long)]
    seed: Option<u64>,
}

/// Monta a partida pedida na linha de comandos. O erro já vem na mensagem para o utilizador.
fn load_game(args: &Args) -> Result<Game, String> {
    let Some(ruleset) = Ruleset::by_name(&args.variant) else {
        return Err(format!("Variante desconhecida '{}', use shogi ou minishogi", args.variant));
    };
    let game = match &args.sfen {
        Some(text) => Game::from_sfen(ruleset, text),
        None => Game::new(ruleset),
    };
    game.map_err(|e| format!("Erro ao carregar posição: {}", e))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut game = match load_game(&args) {
        Ok(game) => game,
        Err(message) => {
            eprintln!("❌ {}", message);
            return ExitCode::FAILURE;
        }
    };
    let ruleset = *game.ruleset();

    let mut config = SearchConfig::with_depth(args.depth);
    if let Some(threads) = args.threads {
        config.threads = threads.max(1);
    }
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    println!("=== {} (profundidade {}, {} threads) ===", ruleset.name, config.max_depth, config.threads);
    println!("SFEN: {}\n", game.to_sfen());

    let total = Instant::now();
    let mut ply = 0;
    while ply < args.max_plies && !game.state().is_terminal() {
        let side = game.side_to_move();

        let mv = if ply < args.random_plies {
            let moves = game.playable_moves();
            moves[rng.gen_range(0..moves.len())]
        } else {
            let outcome = evaluate_moves(&game, &config, &CancelToken::new());
            let Some((mv, eval)) = outcome.best() else {
                break;
            };
            let verdict = match eval.mate() {
                Some((loser, depth)) => format!("mate de {} em {}", loser, depth),
                None => format!("{:+.1}", eval.score),
            };
            println!(
                "{:>3}. {} {:<6} {:<14} {} nós, {} nps",
                ply + 1,
                side,
                game.move_to_usi(&mv),
                verdict,
                outcome.stats.nodes,
                outcome.stats.nodes_per_second()
            );
            mv
        };

        if !game.play(mv) {
            eprintln!("❌ O motor produziu um lance ilegal: {}", game.move_to_usi(&mv));
            return ExitCode::FAILURE;
        }
        ply += 1;
    }

    println!("\nEstado final: {:?}", game.state());
    println!("SFEN: {}", game.to_sfen());
    println!("⏱️  {} meios-lances em {:.2?}", game.history().len(), total.elapsed());
    ExitCode::SUCCESS
}
