// Input controller
// Translates pointer/key intents into explicit game-state transitions

use crate::stk_game::{Game, Reveal, clamp_mines};

/// A single player intent, decoded from a mouse or key event by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Left click on the cell at (x, y)
    RevealCell(usize, usize),
    /// Right click on the cell at (x, y)
    FlagCell(usize, usize),
    /// Click on the mine-count input box
    FocusInput,
    /// Click anywhere that leaves the input box
    Defocus,
    /// Digit typed while the input box is active
    InputDigit(char),
    /// Backspace while the input box is active
    InputBackspace,
    /// Start button or Enter: apply the entered mine count
    CommitMineCount,
    /// End the round voluntarily and bank the score
    CashOut,
    /// Esc or terminal quit
    Quit,
}

/// What the UI must show after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Mine opened at (x, y): redraw, hold briefly, then the UI calls reset
    MineHit(usize, usize),
    /// Round banked with this final score; board already reset
    CashedOut(u32),
    /// Board replaced with a fresh round (mine-count commit)
    NewRound,
    Quit,
}

/// State of the mine-count text box
#[derive(Debug, Default)]
pub struct MineInput {
    pub text: String,
    pub active: bool,
}

impl MineInput {
    /// Parse the entered text as a mine count, clamped to the playable range
    /// Empty or non-numeric text yields None and the prior count stays in force
    pub fn parse(&self) -> Option<usize> {
        self.text.trim().parse::<usize>().ok().map(clamp_mines)
    }

    fn push_digit(&mut self, c: char) {
        if self.active && c.is_ascii_digit() && self.text.len() < 3 {
            self.text.push(c);
        }
    }
}

/// Apply one action to the game and input box, reporting the visible effect
/// Board actions are inert while the round is over (the loss-pause window)
pub fn step(game: &mut Game, input: &mut MineInput, action: Action) -> Effect {
    match action {
        Action::RevealCell(x, y) => match game.reveal(x, y) {
            Reveal::Mine => Effect::MineHit(x, y),
            Reveal::Safe | Reveal::Ignored => Effect::None,
        },
        Action::FlagCell(x, y) => {
            game.toggle_flag(x, y);
            Effect::None
        }
        Action::FocusInput => {
            input.active = true;
            Effect::None
        }
        Action::Defocus => {
            input.active = false;
            Effect::None
        }
        Action::InputDigit(c) => {
            input.push_digit(c);
            Effect::None
        }
        Action::InputBackspace => {
            if input.active {
                input.text.pop();
            }
            Effect::None
        }
        Action::CommitMineCount => match input.parse() {
            Some(n) => {
                game.mines = n;
                game.reset();
                input.text.clear();
                input.active = false;
                Effect::NewRound
            }
            // Invalid text: keep the prior mine count, leave the text for editing
            None => Effect::None,
        },
        Action::CashOut => {
            if game.game_over {
                return Effect::None;
            }
            let banked = game.score;
            game.reset();
            Effect::CashedOut(banked)
        }
        Action::Quit => Effect::Quit,
    }
}

#[cfg(test)]
mod controller_tests {
    use super::*;
    use crate::stk_game::{COLS, DEFAULT_MINES, REVEAL_SCORE, ROWS};

    fn safe_cell(g: &Game) -> (usize, usize) {
        (0..ROWS * COLS)
            .find(|&i| !g.cells[i].is_mine)
            .map(|i| (i % COLS, i / COLS))
            .unwrap()
    }

    fn mine_cell(g: &Game) -> (usize, usize) {
        (0..ROWS * COLS)
            .find(|&i| g.cells[i].is_mine)
            .map(|i| (i % COLS, i / COLS))
            .unwrap()
    }

    #[test]
    fn typing_requires_focus() {
        let mut game = Game::new(DEFAULT_MINES);
        let mut input = MineInput::default();
        step(&mut game, &mut input, Action::InputDigit('7'));
        assert_eq!(input.text, "");
        step(&mut game, &mut input, Action::FocusInput);
        step(&mut game, &mut input, Action::InputDigit('7'));
        step(&mut game, &mut input, Action::InputDigit('x'));
        assert_eq!(input.text, "7");
        step(&mut game, &mut input, Action::InputBackspace);
        assert_eq!(input.text, "");
        step(&mut game, &mut input, Action::Defocus);
        assert!(!input.active);
    }

    #[test]
    fn commit_applies_clamped_count_and_starts_fresh_round() {
        let mut game = Game::new(DEFAULT_MINES);
        let mut input = MineInput {
            text: "99".to_string(),
            active: true,
        };
        assert_eq!(step(&mut game, &mut input, Action::CommitMineCount), Effect::NewRound);
        assert_eq!(game.mines, ROWS * COLS - 1);
        assert_eq!(game.mine_count(), ROWS * COLS - 1);
        assert_eq!(game.score, 0);
        assert_eq!(input.text, "");
        assert!(!input.active);

        input.text = "0".to_string();
        step(&mut game, &mut input, Action::CommitMineCount);
        assert_eq!(game.mines, 1);
    }

    #[test]
    fn commit_with_invalid_text_keeps_prior_count() {
        let mut game = Game::new(DEFAULT_MINES);
        let mut input = MineInput {
            text: "".to_string(),
            active: true,
        };
        assert_eq!(step(&mut game, &mut input, Action::CommitMineCount), Effect::None);
        assert_eq!(game.mines, DEFAULT_MINES);
        assert!(input.active);
    }

    #[test]
    fn mine_hit_reports_cell_then_reset_restores_board() {
        let mut game = Game::new(DEFAULT_MINES);
        let mut input = MineInput::default();
        let (mx, my) = mine_cell(&game);
        assert_eq!(
            step(&mut game, &mut input, Action::RevealCell(mx, my)),
            Effect::MineHit(mx, my)
        );
        assert!(game.game_over);
        // the pause window: further board actions change nothing
        let (sx, sy) = safe_cell(&game);
        assert_eq!(step(&mut game, &mut input, Action::RevealCell(sx, sy)), Effect::None);
        assert_eq!(step(&mut game, &mut input, Action::CashOut), Effect::None);
        game.reset();
        assert_eq!(game.score, 0);
        assert!(!game.game_over);
    }

    #[test]
    fn cash_out_banks_score_and_resets() {
        let mut game = Game::new(DEFAULT_MINES);
        let mut input = MineInput::default();
        let (sx, sy) = safe_cell(&game);
        step(&mut game, &mut input, Action::RevealCell(sx, sy));
        assert_eq!(game.score, REVEAL_SCORE);
        assert_eq!(
            step(&mut game, &mut input, Action::CashOut),
            Effect::CashedOut(REVEAL_SCORE)
        );
        assert_eq!(game.score, 0);
        assert!(game.cells.iter().all(|c| !c.is_revealed));
    }

    #[test]
    fn flag_action_blocks_reveal_until_cleared() {
        let mut game = Game::new(DEFAULT_MINES);
        let mut input = MineInput::default();
        let (sx, sy) = safe_cell(&game);
        step(&mut game, &mut input, Action::FlagCell(sx, sy));
        assert_eq!(step(&mut game, &mut input, Action::RevealCell(sx, sy)), Effect::None);
        assert_eq!(game.score, 0);
        step(&mut game, &mut input, Action::FlagCell(sx, sy));
        step(&mut game, &mut input, Action::RevealCell(sx, sy));
        assert_eq!(game.score, REVEAL_SCORE);
    }
}
