use ratatui::style::Color;
use term_color_support::ColorSupport;

/// Cell-state and chrome colors for the board, resolved once at startup
/// against the terminal's color capabilities.
pub struct Palette {
    pub mine_bg: Color,   // revealed mine
    pub safe_bg: Color,   // revealed safe cell
    pub flag_bg: Color,   // flagged cell
    pub hidden_bg: Color, // unrevealed cell
    pub board_bg: Color,  // gaps between cells
    pub accent_fg: Color, // key labels, start button
    pub focus_bg: Color,  // active input box
    pub press_bg: Color,  // pressed button
}

impl Palette {
    pub fn detect() -> Self {
        Palette {
            mine_bg: wtmatch(Color::Red),
            safe_bg: wtmatch(Color::Green),
            flag_bg: wtmatch(Color::Blue),
            hidden_bg: wtmatch(Color::Gray),
            board_bg: wtmatch(Color::DarkGray),
            accent_fg: wtmatch(Color::Yellow),
            focus_bg: wtmatch(Color::LightBlue),
            press_bg: wtmatch(Color::LightGreen),
        }
    }
}

/// Adjust an ANSI color to match the Windows Terminal (Campbell) visual style
/// based on the current terminal's color capabilities.
fn wtmatch(color: Color) -> Color {
    let support = ColorSupport::stdout();

    // Campbell RGB values with a stable 256-palette fallback index,
    // limited to the colors the game actually draws.
    // Format: Some(((R, G, B), ANSI_256_Index))
    let mapping = match color {
        Color::Red =>        Some(((197, 15, 31), 160)),
        Color::Green =>      Some(((19, 161, 14), 28)),
        Color::Blue =>       Some(((0, 55, 218), 20)),
        Color::Yellow =>     Some(((193, 156, 0), 178)),
        Color::Gray =>       Some(((204, 204, 204), 250)),
        Color::DarkGray =>   Some(((118, 118, 118), 243)),
        Color::LightBlue =>  Some(((59, 120, 255), 63)),
        Color::LightGreen => Some(((22, 198, 12), 46)),
        _ => None, // anything else is drawn as-is
    };

    match mapping {
        Some((rgb, index256)) => {
            if support.has_16m {
                Color::Rgb(rgb.0, rgb.1, rgb.2)
            } else if support.has_256 {
                Color::Indexed(index256)
            } else {
                color
            }
        }
        None => color,
    }
}
