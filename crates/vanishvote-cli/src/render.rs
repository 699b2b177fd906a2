use chrono::{DateTime, Utc};
use std::fmt;
use vanishvote_core::{Phase, PollSnapshot, PollView, Theme};
use vanishvote_models::{Poll, ReactionKind};

const RESET: &str = "\x1b[0m";
const BAR_WIDTH: usize = 20;

fn accent(theme: Theme) -> &'static str {
    if theme.is_dark() {
        "\x1b[96m"
    } else {
        "\x1b[34m"
    }
}

fn muted(theme: Theme) -> &'static str {
    if theme.is_dark() {
        "\x1b[37m"
    } else {
        "\x1b[90m"
    }
}

fn bar(percentage: u8) -> String {
    let filled = usize::from(percentage) * BAR_WIDTH / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

/// The poll screen at `now`: the load error alone, or the full poll.
pub struct ViewScreen<'a> {
    pub view: &'a PollView,
    pub now: DateTime<Utc>,
    pub theme: Theme,
}

impl fmt::Display for ViewScreen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.view.phase(self.now) {
            Phase::Error(e) => writeln!(f, "{e}"),
            Phase::Loading => writeln!(f, "Loading poll..."),
            _ => match self.view.snapshot(self.now) {
                Some(snapshot) => write_poll(f, &snapshot, self.theme),
                None => Ok(()),
            },
        }
    }
}

fn write_poll(f: &mut fmt::Formatter<'_>, snapshot: &PollSnapshot, theme: Theme) -> fmt::Result {
    let accent = accent(theme);
    let muted = muted(theme);

    writeln!(f, "{accent}{}{RESET}", snapshot.question)?;
    writeln!(f, "{muted}{}{RESET}", snapshot.expiry)?;
    match snapshot.phase {
        Phase::Expired => writeln!(f, "This poll has expired. Final results:")?,
        Phase::Voted => writeln!(f, "You voted on this poll.")?,
        Phase::Loading | Phase::Error(_) | Phase::Votable => {}
    }
    writeln!(f)?;

    for (index, row) in snapshot.options.iter().enumerate() {
        let marker = if row.selected { '>' } else { ' ' };
        match row.percentage {
            Some(p) => writeln!(
                f,
                "{marker} {}. {:<24} {accent}{}{RESET} {p:>3}%",
                index + 1,
                row.text,
                bar(p)
            )?,
            None => writeln!(f, "{marker} {}. {}", index + 1, row.text)?,
        }
    }
    match snapshot.total_votes {
        Some(total) => writeln!(f, "{muted}{total} vote(s){RESET}")?,
        None => writeln!(f, "{muted}Results are hidden until you vote{RESET}")?,
    }

    writeln!(f)?;
    for (i, kind) in ReactionKind::ALL.iter().enumerate() {
        if i > 0 {
            f.write_str("  ")?;
        }
        write!(f, "{kind}: {}", snapshot.reactions.count(*kind))?;
    }
    writeln!(f)?;

    if !snapshot.comments.is_empty() {
        writeln!(f, "\nComments ({}):", snapshot.comments.len())?;
        for comment in &snapshot.comments {
            writeln!(f, "  {} {muted}({}){RESET}", comment.text, comment.age)?;
        }
    }

    if let Some(notice) = &snapshot.notice {
        writeln!(f, "\n! {notice}")?;
    }
    Ok(())
}

pub struct Created<'a> {
    pub poll: &'a Poll,
    pub share_url: &'a str,
    pub theme: Theme,
}

impl fmt::Display for Created<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let accent = accent(self.theme);
        writeln!(f, "Poll created: {accent}{}{RESET}", self.poll.question)?;
        writeln!(f, "id:      {}", self.poll.id)?;
        writeln!(f, "expires: {}", self.poll.expires_at.to_rfc3339())?;
        writeln!(f, "share:   {}", self.share_url)
    }
}
