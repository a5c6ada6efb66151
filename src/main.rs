//! Console front end: human plays White, the engine answers as Black.
//!
//! Usage:
//!     parlor_chess [depth]
//!
//! Moves are entered in coordinate notation ("e2e4", "e7e8q"). The
//! optional depth argument sets the search depth in plies.

use std::io::{self, BufRead, Write};

use parlor_chess::{
    Color, Game, GameStatus, Move, MoveFlag, PieceKind, SearchConfig, Square,
};

fn parse_move(text: &str) -> Option<Move> {
    if text.len() < 4 || text.len() > 5 {
        return None;
    }
    let from = Square::from_algebraic(&text[0..2])?;
    let to = Square::from_algebraic(&text[2..4])?;
    let promotion = match text.chars().nth(4) {
        Some(c) => Some(PieceKind::from_promotion_char(c)?),
        None => None,
    };
    Some(Move { from, to, promotion, flag: MoveFlag::Normal })
}

fn print_help() {
    println!("Enter moves in coordinate notation, e.g. e2e4 or e7e8q.");
    println!("Commands: undo, resign, help, quit");
}

fn announce(status: GameStatus, mover: Color) {
    match status {
        GameStatus::Checkmate => println!("Checkmate. {mover} wins."),
        GameStatus::Stalemate => println!("Stalemate. Draw."),
        GameStatus::Draw => println!("Draw by the fifty-move rule."),
        GameStatus::Check => println!("Check."),
        GameStatus::InProgress => {}
    }
}

fn main() -> io::Result<()> {
    let depth = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(SearchConfig::default().search_depth);
    let mut game = Game::with_config(SearchConfig { search_depth: depth });

    println!("parlor_chess (search depth {depth})");
    print_help();

    let stdin = io::stdin();
    let mut input = String::new();
    loop {
        println!("{}", game.board());
        if game.status().is_game_over() {
            announce(game.status(), game.side_to_move().opponent());
            break;
        }

        print!("{} to move> ", game.side_to_move());
        io::stdout().flush()?;
        input.clear();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        match input.trim() {
            "quit" => break,
            "help" => print_help(),
            "resign" => {
                println!("{} resigns. {} wins.", game.side_to_move(), game.side_to_move().opponent());
                break;
            }
            "undo" => {
                // Two plies, so the human is back on move.
                if game.undo() && game.undo() {
                    println!("Took back the last full move.");
                } else {
                    println!("Nothing to undo.");
                }
            }
            text => {
                let Some(mv) = parse_move(text) else {
                    println!("Could not read '{text}'. Type 'help' for the format.");
                    continue;
                };
                let status = match game.make_move(mv) {
                    Ok(status) => status,
                    Err(err) => {
                        println!("{err}");
                        continue;
                    }
                };
                if status.is_game_over() {
                    // The top of the loop reprints the board and announces.
                    continue;
                }
                announce(status, Color::White);

                println!("Thinking...");
                match game.play_computer_move(Color::Black) {
                    Ok((reply, status)) => {
                        println!("Computer plays {reply}.");
                        if !status.is_game_over() {
                            announce(status, Color::Black);
                        }
                    }
                    Err(err) => {
                        println!("{err}");
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}
