use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Span, Spans, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use std::error::Error;
use std::io;
use std::time::{Duration, Instant};

use crate::stk_color::Palette;
use crate::stk_game::{COLS, Config, Game, ROWS, save_config};
use crate::stk_input::{Action, Effect, MineInput, step};
use crate::stk_lang::Lang;
use unicode_width::UnicodeWidthStr;

// Hold on the final frame after a mine before the board resets
const LOSS_PAUSE: Duration = Duration::from_millis(1000);

// Group runtime UI variables into a single structure to simplify passing them around
#[derive(Debug, Default)]
struct UiState {
    input_rect: Option<Rect>,
    start_rect: Option<Rect>,
    // show the start button pressed for a moment after a click
    start_pressed: Option<Instant>,
    // flash the input box when commit is attempted with invalid text
    input_flash: Option<Instant>,
    hover_cell: Option<(usize, usize)>,
    // banked score shown in the cash-out modal
    cashout: Option<u32>,
    // set when a mine was opened; cleared (and the board reset) after LOSS_PAUSE
    loss_since: Option<Instant>,
    modal_rect: Option<Rect>,
    modal_close_rect: Option<Rect>,
    modal_close_hovered: bool,
    modal_close_pressed: bool,
}

impl UiState {
    fn clear_modal(&mut self) {
        self.cashout = None;
        self.modal_rect = None;
        self.modal_close_rect = None;
        self.modal_close_hovered = false;
        self.modal_close_pressed = false;
    }
}

fn in_rect(r: Rect, col: u16, row: u16) -> bool {
    col >= r.x
        && col <= r.x + r.width.saturating_sub(1)
        && row >= r.y
        && row <= r.y + r.height.saturating_sub(1)
}

/// Map an absolute terminal position to a board cell, if any
/// Cells are two columns wide inside the bordered board block
fn cell_at(board: Rect, col: u16, row: u16) -> Option<(usize, usize)> {
    let inner = Rect::new(board.x + 1, board.y + 1, board.width.saturating_sub(2), board.height.saturating_sub(2));
    if !in_rect(inner, col, row) {
        return None;
    }
    let cx = ((col - inner.x) / 2) as usize;
    let cy = (row - inner.y) as usize;
    if cx < COLS && cy < ROWS { Some((cx, cy)) } else { None }
}

pub fn run(cfg: &mut Config, lang: &Lang) -> Result<(), Box<dyn Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnableMouseCapture, terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut game = Game::new(cfg.default_mines);
    let mut input = MineInput::default();
    let mut ui = UiState::default();
    let mut board_rect: Option<Rect> = None;
    let mut exit_requested = false;

    let assets = lang.assets.clone();
    let pal = Palette::detect();

    // Glyph computation helper: compute glyphs based on ascii_icons setting
    let make_glyphs = |ascii: bool| {
        (
            if ascii { "*" } else { "☼" },  // mine
            if ascii { "F" } else { "⚑" }, // flag
        )
    };
    let (glyph_mine, glyph_flag) = make_glyphs(cfg.ascii_icons);

    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| {
            let size = f.size();
            let min_twidth = 60u16;
            let min_theight = (ROWS as u16) + 8;
            // If terminal too small, render a centered warning and skip normal UI
            if size.width < min_twidth || size.height < min_theight {
                let warn_lines = vec![
                    Spans::from(Span::raw(assets.tsmsg_line1)),
                    Spans::from(Span::raw(
                        assets.tsmsg_line2.replacen("{}", &min_twidth.to_string(), 1).replacen("{}", &min_theight.to_string(), 1),
                    )),
                ];
                let warn = Paragraph::new(Text::from(warn_lines))
                    .block(Block::default().borders(Borders::ALL).title(assets.tsmsg_title))
                    .alignment(Alignment::Center);
                f.render_widget(Clear, size);
                let w = 40u16.min(size.width.saturating_sub(2));
                let h = 5u16.min(size.height.saturating_sub(2));
                f.render_widget(warn, center_rect(w, h, size));
                return;
            }

            // layout: top status row, center board, bottom control row
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(0)
                .constraints([Constraint::Length(3), Constraint::Min(ROWS as u16 + 2), Constraint::Length(3)].as_ref())
                .split(size);

            // status row (left score/mines + right-aligned key hints)
            let left_text = format!(
                " {}: {}   {}: {} ",
                assets.status_score, game.score, assets.status_mines, game.mines
            );
            let key_fg = Style::default().fg(pal.accent_fg).add_modifier(Modifier::BOLD);
            let right_parts = [("C", assets.key_cashout), ("Esc", assets.key_exit)];
            let right_w: usize = right_parts.iter().map(|(k, r)| k.width() + 2 + r.width()).sum::<usize>() + 3;
            let inner_w = chunks[0].width.saturating_sub(2) as usize;
            let left_w = left_text.as_str().width();
            let mid_spaces = if inner_w > left_w + right_w + 1 { inner_w - left_w - right_w - 1 } else { 1 };
            let mut status_spans: Vec<Span> = Vec::new();
            status_spans.push(Span::raw(left_text));
            status_spans.push(Span::raw(" ".repeat(mid_spaces)));
            for (i, (k, r)) in right_parts.iter().enumerate() {
                if i > 0 {
                    status_spans.push(Span::raw("   "));
                }
                status_spans.push(Span::styled(k.to_string(), key_fg));
                status_spans.push(Span::raw(format!(": {}", r)));
            }
            status_spans.push(Span::raw(" "));
            let status = Paragraph::new(Spans::from(status_spans))
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Left);
            f.render_widget(status, chunks[0]);

            // board area
            let board_area = center_rect(((COLS * 2) as u16) + 3, (ROWS as u16) + 2, chunks[1]);
            board_rect = Some(board_area);
            let mut lines = vec![];
            for y in 0..ROWS {
                let mut spans = vec![];
                for x in 0..COLS {
                    let cell = game.cells[game.index(x, y)];
                    let mut s = " ".to_string();
                    let mut style = Style::default().bg(pal.hidden_bg);
                    if cell.is_revealed {
                        if cell.is_mine {
                            s = glyph_mine.to_string();
                            style = Style::default().bg(pal.mine_bg).fg(Color::Black);
                        } else {
                            style = Style::default().bg(pal.safe_bg);
                        }
                    } else if cell.is_flagged {
                        s = glyph_flag.to_string();
                        style = Style::default().bg(pal.flag_bg).fg(Color::White);
                    } else if ui.hover_cell == Some((x, y)) && !game.game_over {
                        style = style.bg(pal.focus_bg);
                    }
                    // one board-colored column between cells keeps a visible border per cell
                    spans.push(Span::styled(" ", Style::default().bg(pal.board_bg)));
                    spans.push(Span::styled(s, style));
                }
                spans.push(Span::styled(" ", Style::default().bg(pal.board_bg)));
                lines.push(Spans::from(spans));
            }
            let board = Paragraph::new(Text::from(lines))
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Left);
            f.render_widget(board, board_area);

            // control row: prompt, input box, start button
            let inner = Rect::new(chunks[2].x + 1, chunks[2].y + 1, chunks[2].width.saturating_sub(2), 1);
            let field_w = 4usize;
            let mut input_style = if input.active {
                Style::default().bg(pal.focus_bg).fg(Color::Black)
            } else {
                Style::default().bg(pal.board_bg).fg(Color::White)
            };
            if let Some(t0) = ui.input_flash {
                if t0.elapsed() < Duration::from_millis(600) {
                    input_style = Style::default().bg(pal.mine_bg).fg(Color::White).add_modifier(Modifier::BOLD);
                }
            }
            let start_style = if ui.start_pressed.is_some() {
                Style::default().bg(pal.press_bg).fg(Color::Black).add_modifier(Modifier::BOLD)
            } else {
                Style::default().bg(Color::Gray).fg(Color::Black).add_modifier(Modifier::BOLD)
            };
            let ctrl_spans = vec![
                Span::raw(" "),
                Span::raw(assets.prompt_mines),
                Span::raw(" "),
                Span::styled(format!("{:<width$}", input.text, width = field_w), input_style),
                Span::raw(" "),
                Span::styled(assets.btn_start, start_style),
            ];
            // rects for mouse hit-testing, matching the span offsets above
            let input_x = inner.x + 1 + assets.prompt_mines.width() as u16 + 1;
            ui.input_rect = Some(Rect::new(input_x, inner.y, field_w as u16, 1));
            let start_x = input_x + field_w as u16 + 1;
            ui.start_rect = Some(Rect::new(start_x, inner.y, assets.btn_start.width() as u16, 1));
            let ctrl = Paragraph::new(Spans::from(ctrl_spans))
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Left);
            f.render_widget(ctrl, chunks[2]);

            // loss banner: shown for the pause between the mine reveal and the reset
            if ui.loss_since.is_some() {
                let lb = bottom_centered_block(44, 5, size);
                f.render_widget(Clear, lb);
                f.render_widget(Block::default().borders(Borders::ALL).title(assets.loss_title), lb);
                let lb_inner = Rect::new(lb.x + 1, lb.y + 1, lb.width.saturating_sub(2), lb.height.saturating_sub(2));
                let p = Paragraph::new(Text::from(vec![
                    Spans::from(Span::raw("")),
                    Spans::from(Span::raw(assets.loss_message)),
                ]))
                .alignment(Alignment::Center);
                f.render_widget(p, lb_inner);
            }

            // cash-out modal
            ui.modal_rect = None;
            ui.modal_close_rect = None;
            if let Some(banked) = ui.cashout {
                let mrect = bottom_centered_block(40, 7, size);
                ui.modal_rect = Some(mrect);
                f.render_widget(Clear, mrect);
                f.render_widget(Block::default().borders(Borders::ALL).title(assets.cashout_title), mrect);
                let minner = Rect::new(mrect.x + 1, mrect.y + 1, mrect.width.saturating_sub(2), mrect.height.saturating_sub(2));
                let lines = vec![
                    Spans::from(Span::raw("")),
                    Spans::from(Span::raw(assets.cashout_score_fmt.replacen("{}", &banked.to_string(), 1))),
                ];
                let p = Paragraph::new(Text::from(lines)).alignment(Alignment::Center);
                f.render_widget(p, minner);
                // close button
                let btn_w = assets.btn_close.width() as u16;
                let bx = minner.x + (minner.width.saturating_sub(btn_w)) / 2;
                let by = minner.y + minner.height.saturating_sub(1);
                let btn_rect = Rect::new(bx, by, btn_w, 1);
                ui.modal_close_rect = Some(btn_rect);
                let mut btn_style = Style::default().bg(Color::Gray).fg(Color::Black).add_modifier(Modifier::BOLD);
                if ui.modal_close_pressed {
                    btn_style = Style::default().bg(pal.press_bg).fg(Color::Black).add_modifier(Modifier::BOLD);
                } else if ui.modal_close_hovered {
                    btn_style = Style::default().bg(Color::White).fg(Color::Black).add_modifier(Modifier::BOLD);
                }
                let btn = Paragraph::new(Spans::from(Span::styled(assets.btn_close, btn_style))).alignment(Alignment::Center);
                f.render_widget(btn, btn_rect);
            }
        })?;

        // apply one decoded action and surface its effect to the ui state
        let mut apply = |action: Action, game: &mut Game, input: &mut MineInput, ui: &mut UiState, cfg: &mut Config| {
            let attempted_commit = action == Action::CommitMineCount;
            match step(game, input, action) {
                Effect::MineHit(_, _) => ui.loss_since = Some(Instant::now()),
                Effect::CashedOut(banked) => ui.cashout = Some(banked),
                Effect::NewRound => {
                    // remember the last committed count across runs
                    cfg.default_mines = game.mines;
                    save_config(cfg);
                    ui.hover_cell = None;
                }
                Effect::Quit => exit_requested = true,
                Effect::None => {
                    if attempted_commit {
                        ui.input_flash = Some(Instant::now());
                    }
                }
            }
        };

        let timeout = tick_rate.checked_sub(last_tick.elapsed()).unwrap_or_else(|| Duration::from_secs(0));
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(KeyEvent { code, kind, .. }) => {
                    if kind == KeyEventKind::Press {
                        if code == KeyCode::Esc {
                            apply(Action::Quit, &mut game, &mut input, &mut ui, cfg);
                        } else if ui.cashout.is_some() {
                            // any key dismisses the cash-out modal
                            ui.clear_modal();
                        } else if ui.loss_since.is_some() {
                            // swallow input during the loss pause
                        } else {
                            match code {
                                KeyCode::Char(c) if input.active && c.is_ascii_digit() => {
                                    apply(Action::InputDigit(c), &mut game, &mut input, &mut ui, cfg);
                                }
                                KeyCode::Backspace if input.active => {
                                    apply(Action::InputBackspace, &mut game, &mut input, &mut ui, cfg);
                                }
                                KeyCode::Enter if input.active => {
                                    apply(Action::CommitMineCount, &mut game, &mut input, &mut ui, cfg);
                                }
                                KeyCode::Char('c') | KeyCode::Char('C') => {
                                    apply(Action::CashOut, &mut game, &mut input, &mut ui, cfg);
                                }
                                _ => {}
                            }
                        }
                    }
                }
                Event::Mouse(me) => {
                    if let Some(mrect) = ui.modal_rect {
                        // modal open: only the close button reacts
                        match me.kind {
                            MouseEventKind::Moved => {
                                ui.modal_close_hovered = ui
                                    .modal_close_rect
                                    .map(|btn| in_rect(btn, me.column, me.row))
                                    .unwrap_or(false);
                            }
                            MouseEventKind::Down(MouseButton::Left) => {
                                if let Some(btn) = ui.modal_close_rect {
                                    if in_rect(btn, me.column, me.row) {
                                        ui.modal_close_pressed = true;
                                    }
                                } else if !in_rect(mrect, me.column, me.row) {
                                    ui.clear_modal();
                                }
                            }
                            MouseEventKind::Up(MouseButton::Left) => {
                                if ui.modal_close_pressed {
                                    if let Some(btn) = ui.modal_close_rect {
                                        if in_rect(btn, me.column, me.row) {
                                            ui.clear_modal();
                                        }
                                    }
                                    ui.modal_close_pressed = false;
                                }
                            }
                            _ => {}
                        }
                    } else if ui.loss_since.is_some() {
                        // swallow input during the loss pause
                    } else {
                        match me.kind {
                            MouseEventKind::Moved => {
                                ui.hover_cell = board_rect.and_then(|b| cell_at(b, me.column, me.row));
                            }
                            MouseEventKind::Down(MouseButton::Left) => {
                                // a click focuses the input box or leaves it, then may also hit
                                // the start button or a cell (mirrors the single event branch
                                // of the original dispatch)
                                let on_input = ui.input_rect.map(|r| in_rect(r, me.column, me.row)).unwrap_or(false);
                                apply(
                                    if on_input { Action::FocusInput } else { Action::Defocus },
                                    &mut game, &mut input, &mut ui, cfg,
                                );
                                if ui.start_rect.map(|r| in_rect(r, me.column, me.row)).unwrap_or(false) {
                                    ui.start_pressed = Some(Instant::now());
                                    apply(Action::CommitMineCount, &mut game, &mut input, &mut ui, cfg);
                                } else if let Some((cx, cy)) = board_rect.and_then(|b| cell_at(b, me.column, me.row)) {
                                    apply(Action::RevealCell(cx, cy), &mut game, &mut input, &mut ui, cfg);
                                }
                            }
                            MouseEventKind::Down(MouseButton::Right) => {
                                if let Some((cx, cy)) = board_rect.and_then(|b| cell_at(b, me.column, me.row)) {
                                    apply(Action::FlagCell(cx, cy), &mut game, &mut input, &mut ui, cfg);
                                }
                            }
                            _ => {}
                        }
                    }
                }
                _ => {}
            }
        }
        if exit_requested {
            break;
        }

        // finish the loss pause: replace the board wholesale
        if let Some(t0) = ui.loss_since {
            if t0.elapsed() >= LOSS_PAUSE {
                game.reset();
                ui.loss_since = None;
                ui.hover_cell = None;
            }
        }

        // clear click feedback after short duration
        if let Some(t0) = ui.start_pressed {
            if t0.elapsed() > Duration::from_millis(200) {
                ui.start_pressed = None;
            }
        }
        if let Some(t0) = ui.input_flash {
            if t0.elapsed() > Duration::from_millis(600) {
                ui.input_flash = None;
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }

    save_config(cfg);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn center_rect(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn bottom_centered_block(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + r.height.saturating_sub(height);
    Rect::new(x, y, width, height)
}
