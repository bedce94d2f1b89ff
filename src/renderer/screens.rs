//! Full-screen pages shown between sessions

use std::io::{self, Write};

use crossterm::{
    QueueableCommand, cursor,
    style::{self, Color, Print},
    terminal,
};

use super::centered;
use crate::highscores::{HighScores, MAX_NAME_LEN};

/// Title page with the current best score
pub fn draw_menu<W: Write>(out: &mut W, size: (u16, u16), scores: &HighScores) -> io::Result<()> {
    let (cols, rows) = size;
    let cy = rows / 2;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let title = "★  SPACE  INVADERS  ★";
    out.queue(cursor::MoveTo(centered(cols, title), cy.saturating_sub(5)))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    if let Some(best) = scores.top_score() {
        let best = format!("Best Score: {}", best);
        out.queue(cursor::MoveTo(centered(cols, &best), cy.saturating_sub(3)))?;
        out.queue(style::SetForegroundColor(Color::Yellow))?;
        out.queue(Print(&best))?;
    }

    let options: &[(&str, &str)] = &[
        ("ENTER", "Start game"),
        ("H", "High scores"),
        ("Q", "Quit"),
    ];
    for (i, (key, label)) in options.iter().enumerate() {
        let row = cy.saturating_sub(1) + i as u16;
        out.queue(cursor::MoveTo(centered(cols, "[ENTER] Start game"), row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", key)))?;
        out.queue(style::SetForegroundColor(Color::White))?;
        out.queue(Print(*label))?;
    }

    let hint = "← → / A D : Move   SPACE : Shoot";
    out.queue(cursor::MoveTo(centered(cols, hint), cy + 4))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print(hint))?;

    out.queue(style::ResetColor)?;
    out.flush()
}

/// Leaderboard page; `highlight` is a 1-based rank to mark
pub fn draw_high_scores<W: Write>(
    out: &mut W,
    size: (u16, u16),
    scores: &HighScores,
    highlight: Option<usize>,
) -> io::Result<()> {
    let (cols, rows) = size;
    let top = (rows / 2).saturating_sub(7);
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let title = "HIGH SCORES";
    out.queue(cursor::MoveTo(centered(cols, title), top))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    if scores.is_empty() {
        let empty = "No scores yet";
        out.queue(cursor::MoveTo(centered(cols, empty), top + 2))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(empty))?;
    }

    for (i, entry) in scores.entries.iter().enumerate() {
        let line = format_rank(i + 1, &entry.name, entry.score);
        let color = if highlight == Some(i + 1) {
            Color::Yellow
        } else {
            Color::White
        };
        out.queue(cursor::MoveTo(centered(cols, &line), top + 2 + i as u16))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(&line))?;
    }

    let hint = "press any key";
    out.queue(cursor::MoveTo(centered(cols, hint), top + 14))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print(hint))?;

    out.queue(style::ResetColor)?;
    out.flush()
}

/// Name entry after a qualifying score
pub fn draw_name_prompt<W: Write>(
    out: &mut W,
    size: (u16, u16),
    score: u32,
    rank: usize,
    name: &str,
) -> io::Result<()> {
    let (cols, rows) = size;
    let cy = rows / 2;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let banner = format!("NEW HIGH SCORE #{}: {}", rank, score);
    out.queue(cursor::MoveTo(centered(cols, &banner), cy.saturating_sub(2)))?;
    out.queue(style::SetForegroundColor(Color::Yellow))?;
    out.queue(Print(&banner))?;

    let field = format!("Name: {:_<width$}", name, width = MAX_NAME_LEN);
    out.queue(cursor::MoveTo(centered(cols, &field), cy))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(&field))?;

    let hint = "ENTER : Save   ESC : Skip";
    out.queue(cursor::MoveTo(centered(cols, hint), cy + 2))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print(hint))?;

    out.queue(style::ResetColor)?;
    out.flush()
}

fn format_rank(rank: usize, name: &str, score: u32) -> String {
    format!("{:>2}. {:<width$} {:>6}", rank, name, score, width = MAX_NAME_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_lines_align() {
        let a = format_rank(1, "amy", 120);
        let b = format_rank(10, "bartholomew", 7);
        assert_eq!(a.chars().count(), b.chars().count());
        assert!(a.starts_with(" 1. amy"));
        assert!(a.ends_with("   120"));
    }

    #[test]
    fn test_high_score_page_lists_entries() {
        let scores = HighScores::parse("amy:9\nzed:3\n");
        let mut buf = Vec::new();
        draw_high_scores(&mut buf, (80, 24), &scores, Some(2)).unwrap();
        let text = String::from_utf8_lossy(&buf);
        assert!(text.contains("amy"));
        assert!(text.contains("zed"));
        assert!(!text.contains("No scores yet"));
    }

    #[test]
    fn test_name_prompt_pads_field() {
        let mut buf = Vec::new();
        draw_name_prompt(&mut buf, (80, 24), 12, 3, "kim").unwrap();
        let text = String::from_utf8_lossy(&buf);
        assert!(text.contains("Name: kim_____________"));
        assert!(text.contains("#3: 12"));
    }
}
