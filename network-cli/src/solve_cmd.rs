//! Solve command - ask the engine for a move in a prepared position

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};

use network_core::{AiConfig, MachinePlayer, Move, Player, SearchStats, Side};

#[derive(Args)]
pub struct SolveArgs {
    /// Problem JSON file
    #[arg(value_name = "FILE")]
    pub problem: PathBuf,

    /// Override the problem's search depth
    #[arg(long)]
    pub depth: Option<u32>,

    /// Output the answer as JSON
    #[arg(long)]
    pub json: bool,
}

/// One setup move, e.g. `{"side": "white", "move": "step 4 4 2 2"}`
#[derive(Clone, Debug, Deserialize)]
pub struct SetupMove {
    pub side: Side,
    #[serde(rename = "move")]
    pub mv: String,
}

/// A position given as setup moves, plus the side to move.
///
/// Setup moves are replayed in the order listed, so a step that frees a
/// square may be followed by the other side taking it. Sides need not
/// alternate.
#[derive(Clone, Debug, Deserialize)]
pub struct Problem {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub moves: Vec<SetupMove>,
    pub to_move: Side,
    #[serde(default)]
    pub depth: Option<u32>,
}

impl Problem {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read problem: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse problem: {}", path.display()))
    }

    /// Setup moves parsed, in file order
    fn setup_moves(&self) -> Result<Vec<(Side, Move)>> {
        self.moves
            .iter()
            .map(|setup| -> Result<(Side, Move)> {
                let mv = setup
                    .mv
                    .parse::<Move>()
                    .with_context(|| format!("Bad {} setup move {:?}", setup.side, setup.mv))?;
                Ok((setup.side, mv))
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
struct Answer {
    side: Side,
    #[serde(rename = "move")]
    mv: Option<String>,
    stats: SearchStats,
}

/// Run solve command
pub fn run(args: SolveArgs, seed: Option<u64>) -> Result<()> {
    let problem = Problem::load(&args.problem)?;
    let depth = args.depth.or(problem.depth).unwrap_or(AiConfig::default().depth);

    tracing::info!(
        problem = problem.name.as_deref().unwrap_or("unnamed"),
        side = %problem.to_move,
        depth,
        "Solving"
    );

    let mut config = AiConfig::default().with_depth(depth);
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    let mut player = setup_player(&problem, &config)?;

    if !args.json {
        println!("{}", player.board());
    }

    let (mv, stats) = player.choose_move_with_stats();
    let answer = Answer {
        side: problem.to_move,
        mv: mv.map(|mv| mv.to_string()),
        stats,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&answer)?);
    } else {
        match &answer.mv {
            Some(mv) => println!("{} plays: {}", answer.side, mv),
            None => println!("{} has no legal move", answer.side),
        }
        println!(
            "depth {}  nodes {}  leaves {}  cutoffs {}  score {:.1}",
            stats.depth, stats.nodes, stats.leaves, stats.cutoffs, stats.score
        );
    }

    Ok(())
}

/// Machine player for the side to move with every setup move recorded
pub fn setup_player(problem: &Problem, config: &AiConfig) -> Result<MachinePlayer> {
    let mut player = config.build_player(problem.to_move);
    for (side, mv) in problem.setup_moves()? {
        let accepted = if side == problem.to_move {
            player.force_move(mv)
        } else {
            player.opponent_move(mv)
        };
        if !accepted {
            bail!("Illegal {} setup move: {}", side, mv);
        }
    }
    Ok(player)
}
