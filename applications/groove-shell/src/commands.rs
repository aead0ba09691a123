//! Shell command parsing
//!
//! One command per input line. Lines starting with `{` are raw server
//! socket messages.

use anyhow::{anyhow, bail, Context};
use groove_core::CollectionPath;
use groove_playback::Action;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Dispatch a user action
    Dispatch(Action),
    /// The media element finished the current track
    Ended,
    /// Back button press
    Back,
    /// Print the current state
    Show,
    /// Socket opened
    Connect,
    /// Socket closed
    Disconnect,
    /// Raw server message
    Receive(String),
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  append PATH          enqueue a collection subtree
  play-now PATH        enqueue in front and play
  remove ITEM PATH     remove PATH from queue item ITEM
  select ITEM PATH     make PATH in item ITEM current
  pick PATH            play a track straight from the collection
  next | prev | back   navigate
  play | pause | toggle
  repeat on|off
  volume LEVEL         0.0 - 1.0
  mute
  seek SECONDS
  time SECONDS         report playback time
  ended                report end of track
  clear                empty the playlist
  show                 print player state
  connect | disconnect server socket state
  {...}                raw server message
  help | quit";

fn path(arg: Option<&str>) -> anyhow::Result<CollectionPath> {
    let arg = arg.ok_or_else(|| anyhow!("missing PATH"))?;
    Ok(arg.parse()?)
}

fn number<T: std::str::FromStr>(arg: Option<&str>, what: &str) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let arg = arg.ok_or_else(|| anyhow!("missing {what}"))?;
    arg.parse().with_context(|| format!("invalid {what}: {arg}"))
}

/// Parse one input line; `None` for blank lines
pub fn parse(line: &str) -> anyhow::Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    if line.starts_with('{') {
        return Ok(Some(Command::Receive(line.to_string())));
    }

    let (name, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    let first = (!rest.is_empty()).then_some(rest);

    // ITEM PATH; the path may contain spaces
    let item_and_path = || -> anyhow::Result<(usize, CollectionPath)> {
        let (item, path_arg) = rest.split_once(' ').unwrap_or((rest, ""));
        let item_index = number(Some(item).filter(|s| !s.is_empty()), "ITEM")?;
        Ok((item_index, path(Some(path_arg.trim()).filter(|s| !s.is_empty()))?))
    };

    let command = match name {
        "append" => Command::Dispatch(Action::PlaylistAppend { path: path(first)? }),
        "play-now" => Command::Dispatch(Action::PlaylistPlayNow { path: path(first)? }),
        "remove" => {
            let (item_index, path) = item_and_path()?;
            Command::Dispatch(Action::PlaylistRemove { item_index, path })
        }
        "select" => {
            let (item_index, path) = item_and_path()?;
            Command::Dispatch(Action::PlaylistSetCurrent { item_index, path })
        }
        "pick" => Command::Dispatch(Action::SetCurrentTrack { path: path(first)? }),
        "next" => Command::Dispatch(Action::PlaylistNext),
        "prev" => Command::Dispatch(Action::PlaylistPrev),
        "back" => Command::Back,
        "play" => Command::Dispatch(Action::Play),
        "pause" => Command::Dispatch(Action::Pause),
        "toggle" => Command::Dispatch(Action::TogglePlay),
        "repeat" => {
            let repeat = match first {
                Some("on") => true,
                Some("off") => false,
                other => bail!("repeat expects on|off, got {other:?}"),
            };
            Command::Dispatch(Action::SetRepeat { repeat })
        }
        "volume" => Command::Dispatch(Action::SetVolume {
            volume: number(first, "LEVEL")?,
        }),
        "mute" => Command::Dispatch(Action::ToggleMute),
        "seek" => Command::Dispatch(Action::Seek {
            position: number(first, "SECONDS")?,
        }),
        "time" => Command::Dispatch(Action::TimeUpdate {
            current_time: number(first, "SECONDS")?,
        }),
        "ended" => Command::Ended,
        "clear" => Command::Dispatch(Action::PlaylistClear),
        "show" => Command::Show,
        "connect" => Command::Connect,
        "disconnect" => Command::Disconnect,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => bail!("unknown command {other:?}, try help"),
    };

    Ok(Some(command))
}
