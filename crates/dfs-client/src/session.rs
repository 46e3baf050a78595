//! State of one interactive optimizer session.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use thiserror::Error;
use tracing::error;

use dfs_common::api::{Lineup, MAX_WEEK, OptimizeRequest};
use dfs_common::selection::PlayerSelection;

use crate::client::{ClientError, OPTIMIZE_FAILED_MESSAGE, OptimizerClient};
use crate::render::{render_lineup, render_side_panel, render_tabs};

pub const HELP: &str = "\
Commands:
  week <n|clear>      set or clear the week
  dst <team|clear>    lock a defense by nickname, e.g. ravens
  one-te <on|off>     play exactly one tight end
  exclude <player>    toggle a player out of every lineup
  include <player>    toggle a player into every lineup
  tab <n>             show lineup n
  optimize            request new lineups
  show                redraw the current lineup
  help                show this text
  quit                leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Week(Option<u32>),
    Dst(Option<String>),
    OneTe(bool),
    Exclude(String),
    Include(String),
    Tab(usize),
    Optimize,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}', try 'help'")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("week must be a number between 1 and {MAX_WEEK}")]
    InvalidWeek,
    #[error("expected 'on' or 'off'")]
    InvalidToggle,
    #[error("tab must be a lineup number")]
    InvalidTab,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        let arg = |name: &'static str| {
            if rest.is_empty() {
                Err(CommandError::MissingArgument(name))
            } else {
                Ok(rest)
            }
        };

        match verb.to_ascii_lowercase().as_str() {
            "week" => match arg("week")? {
                "clear" => Ok(Command::Week(None)),
                value => value
                    .parse::<u32>()
                    .ok()
                    .filter(|week| (1..=MAX_WEEK).contains(week))
                    .map(|week| Command::Week(Some(week)))
                    .ok_or(CommandError::InvalidWeek),
            },
            "dst" => match arg("dst")? {
                "clear" => Ok(Command::Dst(None)),
                value => Ok(Command::Dst(Some(value.to_string()))),
            },
            "one-te" | "one_te" => match arg("one-te")?.to_ascii_lowercase().as_str() {
                "on" | "true" | "yes" => Ok(Command::OneTe(true)),
                "off" | "false" | "no" => Ok(Command::OneTe(false)),
                _ => Err(CommandError::InvalidToggle),
            },
            "exclude" | "x" => Ok(Command::Exclude(arg("exclude")?.to_string())),
            "include" | "+" => Ok(Command::Include(arg("include")?.to_string())),
            "tab" => arg("tab")?
                .parse::<usize>()
                .ok()
                .filter(|n| *n >= 1)
                .map(|n| Command::Tab(n - 1))
                .ok_or(CommandError::InvalidTab),
            "optimize" | "run" => Ok(Command::Optimize),
            "show" | "" => Ok(Command::Show),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Form values, selection and last results of the lineup screen.
#[derive(Debug, Default)]
pub struct Session {
    pub week: Option<u32>,
    pub dst: Option<String>,
    pub one_te: bool,
    selection: PlayerSelection,
    lineups: Vec<Lineup>,
    active_tab: usize,
    busy: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &PlayerSelection {
        &self.selection
    }

    pub fn lineups(&self) -> &[Lineup] {
        &self.lineups
    }

    pub fn active_tab(&self) -> usize {
        self.active_tab
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Toggle exclusion. Names are matched case-insensitively against the players on
    /// screen so the stored name is the canonical one.
    pub fn toggle_exclude(&mut self, name: &str) {
        let name = self.canonical_name(name);
        self.selection.toggle_exclude(&name);
    }

    pub fn toggle_include(&mut self, name: &str) {
        let name = self.canonical_name(name);
        self.selection.toggle_include(&name);
    }

    fn canonical_name(&self, name: &str) -> String {
        let name = name.trim();
        self.lineups
            .iter()
            .flat_map(|lineup| &lineup.players)
            .map(|player| player.player.as_str())
            .chain(self.selection.excluded().iter().map(String::as_str))
            .chain(self.selection.included().iter().map(String::as_str))
            .find(|candidate| candidate.eq_ignore_ascii_case(name))
            .unwrap_or(name)
            .to_string()
    }

    /// Switch tabs; out-of-range tabs are ignored.
    pub fn select_tab(&mut self, index: usize) -> bool {
        if index < self.lineups.len() {
            self.active_tab = index;
            true
        } else {
            false
        }
    }

    pub fn request(&self) -> OptimizeRequest {
        OptimizeRequest::from_form(self.week, self.dst.as_deref(), self.one_te, &self.selection)
    }

    /// Mark the session busy and return the request to send, or `None` while a previous
    /// request is still outstanding.
    pub fn begin_optimize(&mut self) -> Option<OptimizeRequest> {
        if self.busy {
            return None;
        }
        self.busy = true;
        Some(self.request())
    }

    /// Store new lineups or turn a failure into the user-facing message.
    /// Earlier lineups stay on screen when the request fails.
    pub fn finish_optimize(
        &mut self,
        result: Result<Vec<Lineup>, ClientError>,
    ) -> Result<(), &'static str> {
        self.busy = false;
        match result {
            Ok(lineups) => {
                self.lineups = lineups;
                self.active_tab = 0;
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "optimize request failed");
                Err(OPTIMIZE_FAILED_MESSAGE)
            }
        }
    }

    /// Tabs, the active lineup table and the selection panel.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(lineup) = self.lineups.get(self.active_tab) {
            out.push_str(&render_tabs(self.lineups.len(), self.active_tab));
            out.push_str("\n\n");
            out.push_str(&render_lineup(lineup, &self.selection));
        } else {
            out.push_str("No lineups yet. Type 'optimize' to build some.\n");
        }
        out.push('\n');
        out.push_str(&render_side_panel(&self.selection));
        out
    }

    pub fn form_summary(&self) -> String {
        format!(
            "week: {}  dst: {}  one TE: {}",
            self.week
                .map(|w| w.to_string())
                .unwrap_or_else(|| "latest".into()),
            self.dst.as_deref().unwrap_or("-"),
            if self.one_te { "on" } else { "off" },
        )
    }

    /// Apply one parsed command. Returns `false` once the user quits.
    pub async fn apply<W: Write>(
        &mut self,
        command: Command,
        client: &OptimizerClient,
        out: &mut W,
    ) -> io::Result<bool> {
        match command {
            Command::Week(week) => {
                self.week = week;
                writeln!(out, "{}", self.form_summary())?;
            }
            Command::Dst(dst) => {
                self.dst = dst;
                writeln!(out, "{}", self.form_summary())?;
            }
            Command::OneTe(one_te) => {
                self.one_te = one_te;
                writeln!(out, "{}", self.form_summary())?;
            }
            Command::Exclude(name) => {
                self.toggle_exclude(&name);
                write!(out, "{}", render_side_panel(&self.selection))?;
            }
            Command::Include(name) => {
                self.toggle_include(&name);
                write!(out, "{}", render_side_panel(&self.selection))?;
            }
            Command::Tab(index) => {
                if self.select_tab(index) {
                    write!(out, "{}", self.render())?;
                } else {
                    writeln!(out, "no lineup {}", index + 1)?;
                }
            }
            Command::Optimize => match self.begin_optimize() {
                Some(request) => {
                    writeln!(out, "Optimizing...")?;
                    out.flush()?;
                    let result = client.optimize(&request).await;
                    match self.finish_optimize(result) {
                        Ok(()) => write!(out, "{}", self.render())?,
                        Err(message) => writeln!(out, "{message}")?,
                    }
                }
                None => writeln!(out, "An optimization is already running.")?,
            },
            Command::Show => write!(out, "{}", self.render())?,
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }
}

/// Read commands line by line until `quit` or end of input.
pub async fn run_interactive<R: BufRead, W: Write>(
    client: &OptimizerClient,
    session: &mut Session,
    input: R,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out, "DFS lineup optimizer at {}", client.base_url())?;
    writeln!(out, "{HELP}")?;

    for line in input.lines() {
        let line = line?;
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                writeln!(out, "{err}")?;
                continue;
            }
        };
        if !session.apply(command, client, out).await? {
            break;
        }
        out.flush()?;
    }
    Ok(())
}
