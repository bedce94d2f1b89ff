//! Terminal rendering of session snapshots
//!
//! Nothing here touches game state. Each frame is drawn from a
//! [`Snapshot`] by mapping board pixels onto terminal cells.
//!
//! Layout (rows):
//! - 0: HUD
//! - 1: top border
//! - 2..rows-2: play field
//! - rows-2: bottom border
//! - rows-1: key hints

mod screens;

pub use screens::{draw_high_scores, draw_menu, draw_name_prompt};

use std::io::{self, Write};

use crossterm::{
    QueueableCommand, cursor,
    style::{self, Color, Print},
    terminal,
};
use glam::IVec2;

use crate::session::{EntityView, Snapshot};
use crate::sim::{Life, SimConfig};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_GROUND: Color = Color::DarkGreen;
const C_HUD: Color = Color::Yellow;
const C_HUD_DIM: Color = Color::DarkGrey;
const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_EXPLOSION: Color = Color::Red;
const C_SHOT: Color = Color::Cyan;
const C_BOMB: Color = Color::Magenta;
const C_HINT: Color = Color::DarkGrey;

// ── Sprites ───────────────────────────────────────────────────────────────────

const ENEMY_SPRITE: &str = "<O>";
const ENEMY_EXPLODING: &str = "\\*/";
const PLAYER_SPRITE: &str = "/A\\";
const PLAYER_EXPLODING: &str = "*#*";
const SHOT_SPRITE: &str = "|";
const BOMB_SPRITE: &str = "!";

/// Rows used by HUD, borders and hint line
const CHROME_ROWS: u16 = 4;

/// Mapping from board pixels to terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Terminal size in cells
    pub cols: u16,
    pub rows: u16,
    board: IVec2,
    ground: i32,
    enemy_size: IVec2,
    player_size: IVec2,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16, config: &SimConfig) -> Self {
        Self {
            cols,
            rows,
            board: IVec2::new(config.board_width.max(1), config.board_height.max(1)),
            ground: config.ground,
            enemy_size: config.enemy_size(),
            player_size: config.player_size(),
        }
    }

    /// Play field width in cells (inside the side walls)
    pub fn field_cols(&self) -> u16 {
        self.cols.saturating_sub(2).max(1)
    }

    /// Play field height in cells
    pub fn field_rows(&self) -> u16 {
        self.rows.saturating_sub(CHROME_ROWS).max(1)
    }

    /// Terminal cell for a board position, `None` when off the board
    pub fn to_cell(&self, pos: IVec2) -> Option<(u16, u16)> {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.board.x || pos.y >= self.board.y {
            return None;
        }
        let col = pos.x as i64 * self.field_cols() as i64 / self.board.x as i64;
        let row = pos.y as i64 * self.field_rows() as i64 / self.board.y as i64;
        Some((1 + col as u16, 2 + row as u16))
    }

    /// Where to start printing `width` cells centred on `center`, kept inside the walls
    pub fn sprite_origin(&self, center: IVec2, width: u16) -> Option<(u16, u16)> {
        let (col, row) = self.to_cell(center)?;
        let last = self.cols.saturating_sub(1).saturating_sub(width).max(1);
        let start = col.saturating_sub(width / 2).clamp(1, last);
        Some((start, row))
    }

    /// Row the ground line is drawn on
    pub fn ground_row(&self) -> u16 {
        let ground = self.ground.clamp(0, self.board.y - 1);
        self.to_cell(IVec2::new(0, ground)).map_or(self.rows, |(_, row)| row)
    }
}

/// Extra HUD values that do not live in the snapshot
#[derive(Debug, Clone, Copy, Default)]
pub struct Hud {
    pub high_score: u32,
    pub show_speed: bool,
}

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    view: &Viewport,
    snap: &Snapshot,
    hud: &Hud,
) -> io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, view)?;
    draw_ground(out, view)?;
    draw_hud(out, view, snap, hud)?;

    for enemy in &snap.enemies {
        draw_enemy(out, view, enemy)?;
    }
    for bomb in snap.bombs.iter().flatten() {
        draw_at(out, view, *bomb, BOMB_SPRITE, C_BOMB)?;
    }
    if let Some(shot) = snap.shot {
        draw_at(out, view, shot, SHOT_SPRITE, C_SHOT)?;
    }
    draw_player(out, view, &snap.player)?;
    draw_hint(out, view)?;

    if !snap.running {
        draw_game_over(out, view, snap)?;
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.rows.saturating_sub(1)))?;
    out.flush()
}

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> io::Result<()> {
    let inner = view.cols.saturating_sub(2) as usize;
    let bottom = view.rows.saturating_sub(2);

    out.queue(style::SetForegroundColor(C_BORDER))?;
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(inner))))?;
    out.queue(cursor::MoveTo(0, bottom))?;
    out.queue(Print(format!("└{}┘", "─".repeat(inner))))?;

    for row in 2..bottom {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

fn draw_ground<W: Write>(out: &mut W, view: &Viewport) -> io::Result<()> {
    let row = view.ground_row();
    if row >= view.rows.saturating_sub(2) {
        return Ok(());
    }
    out.queue(style::SetForegroundColor(C_GROUND))?;
    out.queue(cursor::MoveTo(1, row))?;
    out.queue(Print("▁".repeat(view.field_cols() as usize)))?;
    Ok(())
}

fn draw_hud<W: Write>(out: &mut W, view: &Viewport, snap: &Snapshot, hud: &Hud) -> io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(format!("Score:{:>5}", snap.score)))?;
    if hud.high_score > 0 {
        out.queue(style::SetForegroundColor(C_HUD_DIM))?;
        out.queue(Print(format!("  Hi:{:>5}", hud.high_score.max(snap.score))))?;
    }

    let mut right = format!("Wave {}", snap.wave + 1);
    if hud.show_speed {
        right = format!("{}ms  {}", snap.tick_interval_ms, right);
    }
    let rx = view.cols.saturating_sub(right.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(right))?;
    Ok(())
}

fn draw_enemy<W: Write>(out: &mut W, view: &Viewport, enemy: &EntityView) -> io::Result<()> {
    let (sprite, color) = match enemy.life {
        Life::Alive => (ENEMY_SPRITE, C_ENEMY),
        Life::Exploding => (ENEMY_EXPLODING, C_EXPLOSION),
        Life::Gone => return Ok(()),
    };
    draw_at(out, view, enemy.pos + view.enemy_size / 2, sprite, color)
}

fn draw_player<W: Write>(out: &mut W, view: &Viewport, player: &EntityView) -> io::Result<()> {
    let (sprite, color) = match player.life {
        Life::Alive => (PLAYER_SPRITE, C_PLAYER),
        Life::Exploding => (PLAYER_EXPLODING, C_EXPLOSION),
        Life::Gone => return Ok(()),
    };
    draw_at(out, view, player.pos + view.player_size / 2, sprite, color)
}

/// Print a sprite centred on a board position; off-board positions are skipped
fn draw_at<W: Write>(
    out: &mut W,
    view: &Viewport,
    center: IVec2,
    sprite: &str,
    color: Color,
) -> io::Result<()> {
    let Some((col, row)) = view.sprite_origin(center, sprite.chars().count() as u16) else {
        return Ok(());
    };
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(sprite))?;
    Ok(())
}

fn draw_hint<W: Write>(out: &mut W, view: &Viewport) -> io::Result<()> {
    out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   SPACE : Shoot   Q : Quit"))?;
    Ok(())
}

fn draw_game_over<W: Write>(out: &mut W, view: &Viewport, snap: &Snapshot) -> io::Result<()> {
    let lines = [
        "╔══════════════════╗".to_string(),
        "║    GAME  OVER    ║".to_string(),
        format!("║  Score: {:<8} ║", snap.score),
        "║  press any key   ║".to_string(),
        "╚══════════════════╝".to_string(),
    ];
    let top = (view.rows / 2).saturating_sub(lines.len() as u16 / 2);
    out.queue(style::SetForegroundColor(C_EXPLOSION))?;
    for (i, line) in lines.iter().enumerate() {
        out.queue(cursor::MoveTo(centered(view.cols, line), top + i as u16))?;
        out.queue(Print(line))?;
    }
    Ok(())
}

/// Column that centres `text` in a terminal `cols` wide
pub fn centered(cols: u16, text: &str) -> u16 {
    (cols / 2).saturating_sub(text.chars().count() as u16 / 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;

    fn view() -> Viewport {
        // 80 field columns, 20 field rows over an 800x600 board
        Viewport::new(82, 24, &SimConfig::default())
    }

    #[test]
    fn test_cell_mapping() {
        let view = view();
        assert_eq!(view.field_cols(), 80);
        assert_eq!(view.field_rows(), 20);
        assert_eq!(view.to_cell(IVec2::new(0, 0)), Some((1, 2)));
        assert_eq!(view.to_cell(IVec2::new(799, 599)), Some((80, 21)));
        assert_eq!(view.to_cell(IVec2::new(400, 300)), Some((41, 12)));
        assert_eq!(view.to_cell(IVec2::new(-1, 10)), None);
        assert_eq!(view.to_cell(IVec2::new(10, 600)), None);
    }

    #[test]
    fn test_sprites_stay_inside_walls() {
        let view = view();
        assert_eq!(view.sprite_origin(IVec2::new(0, 0), 3), Some((1, 2)));
        assert_eq!(view.sprite_origin(IVec2::new(799, 0), 3), Some((78, 2)));
        assert_eq!(view.sprite_origin(IVec2::new(400, 0), 3), Some((40, 2)));
    }

    #[test]
    fn test_ground_row() {
        // 540 * 20 / 600 = 18
        assert_eq!(view().ground_row(), 20);
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let view = Viewport::new(1, 1, &SimConfig::default());
        let snap = Session::start(SimConfig::default(), 1).unwrap().snapshot();
        let mut buf = Vec::new();
        render(&mut buf, &view, &snap, &Hud::default()).unwrap();
        assert!(!buf.is_empty());
    }

    #[test]
    fn test_frame_draws_every_live_enemy() {
        let snap = Session::start(SimConfig::default(), 1).unwrap().snapshot();
        let mut buf = Vec::new();
        render(&mut buf, &view(), &snap, &Hud::default()).unwrap();
        let text = String::from_utf8_lossy(&buf);
        assert_eq!(text.matches(ENEMY_SPRITE).count(), snap.enemies.len());
        assert_eq!(text.matches(PLAYER_SPRITE).count(), 1);
        assert!(!text.contains("GAME  OVER"));
    }

    #[test]
    fn test_centered() {
        assert_eq!(centered(80, "abcd"), 38);
        assert_eq!(centered(2, "abcdef"), 0);
    }
}
