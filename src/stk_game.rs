// Core game logic and configuration management
// Handles the board, mine placement, scoring, and configuration persistence

use directories::ProjectDirs;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Board dimensions are fixed; only the mine count varies
pub const ROWS: usize = 5;
pub const COLS: usize = 5;

/// Points awarded for each safe reveal
pub const REVEAL_SCORE: u32 = 10;

/// Mine count used before the player enters one
pub const DEFAULT_MINES: usize = 3;

/// Clamp a requested mine count into the playable range
/// At least one mine, and at least one safe cell to reveal
pub fn clamp_mines(n: usize) -> usize {
    n.clamp(1, ROWS * COLS - 1)
}

/// A single cell on the board
#[derive(Clone, Copy, Default)]
pub struct Cell {
    pub is_mine: bool,
    pub is_revealed: bool,
    pub is_flagged: bool,
}

/// Outcome of a reveal attempt, reported to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reveal {
    /// Cell was flagged, already open, or the round is over
    Ignored,
    /// Safe cell opened, score increased
    Safe,
    /// Mine opened, round over
    Mine,
}

/// Main game state
#[derive(Clone)]
pub struct Game {
    pub mines: usize,      // Configured mine count
    pub cells: Vec<Cell>,  // ROWS * COLS cells, row-major
    pub score: u32,        // Accumulated reveal score
    pub game_over: bool,   // Set when a mine is opened
}

impl Game {
    /// Create a fresh board with `mines` mines already placed
    pub fn new(mines: usize) -> Self {
        let mut g = Game {
            mines: clamp_mines(mines),
            cells: vec![Cell::default(); ROWS * COLS],
            score: 0,
            game_over: false,
        };
        g.place_mines();
        g
    }

    /// Convert (x, y) coordinates to flat array index
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * COLS + x
    }

    /// Randomly mark `self.mines` distinct cells as mined
    /// Rejection sampling; fine on a 25-cell board even near full
    fn place_mines(&mut self) {
        let mut rng = thread_rng();
        let n = ROWS * COLS;
        let mut placed = 0;
        while placed < self.mines {
            let i = rng.gen_range(0..n);
            if !self.cells[i].is_mine {
                self.cells[i].is_mine = true;
                placed += 1;
            }
        }
    }

    /// Reveal the cell at (x, y)
    /// Flagged and already-open cells are untouched; a mine ends the round
    pub fn reveal(&mut self, x: usize, y: usize) -> Reveal {
        let idx = self.index(x, y);
        if self.game_over || self.cells[idx].is_revealed || self.cells[idx].is_flagged {
            return Reveal::Ignored;
        }
        self.cells[idx].is_revealed = true;
        if self.cells[idx].is_mine {
            self.game_over = true;
            Reveal::Mine
        } else {
            self.score += REVEAL_SCORE;
            Reveal::Safe
        }
    }

    /// Toggle the flag on an unrevealed cell
    pub fn toggle_flag(&mut self, x: usize, y: usize) {
        let idx = self.index(x, y);
        if self.game_over || self.cells[idx].is_revealed {
            return;
        }
        self.cells[idx].is_flagged = !self.cells[idx].is_flagged;
    }

    /// Replace the board wholesale: fresh cells, new mines, score back to zero
    pub fn reset(&mut self) {
        *self = Game::new(self.mines);
    }

    /// Number of cells currently marked as mines
    pub fn mine_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_mine).count()
    }
}

/// User configuration
/// Persisted to disk as TOML
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_mines: usize, // Mine count used for the first round and remembered across runs
    pub ascii_icons: bool,    // Use ASCII fallback icons
    pub language: String,     // Language code ("en" or "zh")
}

impl Default for Config {
    fn default() -> Self {
        // Auto-detect system language on first run
        let system_lang = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
        let lang = if system_lang.to_lowercase().starts_with("zh") {
            "zh".to_string()
        } else {
            "en".to_string()
        };

        Config {
            default_mines: DEFAULT_MINES,
            ascii_icons: false,
            language: lang,
        }
    }
}

/// Get the configuration file path
/// Uses platform-specific config directory (e.g., ~/.config/stkmines/stkmines.toml on Linux)
/// Falls back to current directory if ProjectDirs is unavailable
pub fn config_path() -> Option<PathBuf> {
    if let Ok(exe) = env::current_exe() {
        if let Some(name) = exe.file_stem().and_then(|s| s.to_str()) {
            if let Some(proj) = ProjectDirs::from("com", "xhbl", name) {
                let mut path = proj.config_dir().to_path_buf();
                path.push(format!("{}.toml", name));
                return Some(path);
            } else {
                // fallback to current directory
                if let Ok(mut path) = env::current_dir() {
                    path.push(format!("{}.toml", name));
                    return Some(path);
                }
            }
        }
    }
    None
}

/// Load configuration from disk, or create default if not found
/// Out-of-range saved mine counts are clamped on load
pub fn load_or_create_config() -> Config {
    if let Some(path) = config_path() {
        if path.exists() {
            if let Ok(s) = fs::read_to_string(&path) {
                if let Ok(mut cfg) = toml::from_str::<Config>(&s) {
                    cfg.default_mines = clamp_mines(cfg.default_mines);
                    return cfg;
                }
            }
        }
        let cfg = Config::default();
        if let Ok(s) = toml::to_string(&cfg) {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = fs::write(&path, s);
        }
        return cfg;
    }
    Config::default()
}

/// Save configuration to disk as TOML
pub fn save_config(cfg: &Config) {
    if let Some(path) = config_path() {
        if let Ok(s) = toml::to_string(cfg) {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = fs::write(&path, s);
        }
    }
}

#[cfg(test)]
mod game_tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn new_board_starts_clean() {
        let g = Game::new(DEFAULT_MINES);
        assert_eq!(g.score, 0);
        assert!(!g.game_over);
        assert!(g.cells.iter().all(|c| !c.is_revealed && !c.is_flagged));
    }

    #[test]
    fn reveal_flagged_cell_is_noop() {
        let mut g = Game::new(DEFAULT_MINES);
        g.toggle_flag(2, 2);
        assert_eq!(g.reveal(2, 2), Reveal::Ignored);
        assert!(!g.cells[g.index(2, 2)].is_revealed);
        assert_eq!(g.score, 0);
    }

    #[test]
    fn reveal_mine_ends_round_and_reset_clears() {
        let mut g = Game::new(DEFAULT_MINES);
        let (mx, my) = (0..ROWS * COLS)
            .find(|&i| g.cells[i].is_mine)
            .map(|i| (i % COLS, i / COLS))
            .unwrap();
        assert_eq!(g.reveal(mx, my), Reveal::Mine);
        assert!(g.game_over);
        // board actions are inert once the round is over
        assert_eq!(g.reveal(if mx == 0 { 1 } else { 0 }, my), Reveal::Ignored);
        g.reset();
        assert!(!g.game_over);
        assert_eq!(g.score, 0);
        assert_eq!(g.mine_count(), DEFAULT_MINES);
        assert!(g.cells.iter().all(|c| !c.is_revealed));
    }

    #[test]
    fn safe_reveal_scores_fixed_amount() {
        let mut g = Game::new(1);
        let (sx, sy) = (0..ROWS * COLS)
            .find(|&i| !g.cells[i].is_mine)
            .map(|i| (i % COLS, i / COLS))
            .unwrap();
        assert_eq!(g.reveal(sx, sy), Reveal::Safe);
        assert_eq!(g.score, REVEAL_SCORE);
        // revealing the same cell again does not score twice
        assert_eq!(g.reveal(sx, sy), Reveal::Ignored);
        assert_eq!(g.score, REVEAL_SCORE);
    }

    #[test]
    fn revealing_every_safe_cell_on_three_mine_board_scores_220() {
        let mut g = Game::new(3);
        for y in 0..ROWS {
            for x in 0..COLS {
                if !g.cells[g.index(x, y)].is_mine {
                    g.reveal(x, y);
                }
            }
        }
        assert_eq!(g.score, 22 * REVEAL_SCORE);
        assert!(!g.game_over);
    }

    #[test]
    fn flag_toggles_only_unrevealed_cells() {
        let mut g = Game::new(1);
        let (sx, sy) = (0..ROWS * COLS)
            .find(|&i| !g.cells[i].is_mine)
            .map(|i| (i % COLS, i / COLS))
            .unwrap();
        g.toggle_flag(sx, sy);
        assert!(g.cells[g.index(sx, sy)].is_flagged);
        g.toggle_flag(sx, sy);
        assert!(!g.cells[g.index(sx, sy)].is_flagged);
        g.reveal(sx, sy);
        g.toggle_flag(sx, sy);
        assert!(!g.cells[g.index(sx, sy)].is_flagged);
    }

    proptest! {
        #[test]
        fn placement_marks_exactly_n_cells(n in 1..=(ROWS * COLS - 1)) {
            let g = Game::new(n);
            prop_assert_eq!(g.mine_count(), n);
            prop_assert_eq!(
                g.cells.iter().filter(|c| !c.is_mine).count(),
                ROWS * COLS - n
            );
        }

        #[test]
        fn clamp_coerces_into_playable_range(n in 0..10_000usize) {
            let c = clamp_mines(n);
            prop_assert!(c >= 1 && c <= ROWS * COLS - 1);
            if (1..=ROWS * COLS - 1).contains(&n) {
                prop_assert_eq!(c, n);
            }
        }
    }
}
