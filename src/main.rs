// Entry point for the mines click game
// Initializes configuration, language settings, and launches the main UI

use std::error::Error;

// Module declarations
mod stk_color; // Cross-platform color matching utilities
mod stk_game;  // Core game logic and configuration
mod stk_input; // Tagged player actions and state transitions
mod stk_lang;  // Multi-language string resources
mod stk_ui;    // Terminal UI rendering and event handling

use stk_game::load_or_create_config;
use stk_lang::Lang;
use stk_ui::run as run_ui;

fn main() -> Result<(), Box<dyn Error>> {
    // Load or create user configuration (mine count, preferences)
    let mut cfg = load_or_create_config();

    // Initialize language resources based on saved or system language
    let lang = Lang::new(&cfg.language);

    // Launch the main UI loop
    run_ui(&mut cfg, &lang)
}
